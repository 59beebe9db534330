//! Loss statistics over an EP curve
//!
//! Average annual loss (AAL) is the area under the EP curve from the
//! attachment point to the largest simulated loss, integrated with the
//! trapezoidal rule over the curve's own grid. Loss dispersion for the risk
//! load comes from one of two bases, selected with [`DispersionBasis`].

use crate::curve::{EpCurve, EpPoint};
use crate::error::{PricingError, Result};
use crate::sample::{sample_std_dev, LossSample};
use serde::{Deserialize, Serialize};

/// Source of the loss standard deviation used in the risk load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispersionBasis {
    /// Sample standard deviation of the curve amounts at or above the
    /// attachment point.
    ///
    /// NOTE: this measures the spread of the curve's x-axis grid, not of the
    /// simulated losses. It is the established pricing definition and every
    /// published premium depends on it, so it stays the default; it is a
    /// modeling simplification that should be revisited.
    #[default]
    CurveGrid,
    /// Sample standard deviation of the raw simulated losses
    LossSample,
}

/// AAL and loss dispersion feeding the premium calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossStatistics {
    pub aal: f64,
    pub loss_std_dev: f64,
    /// Curve points at or above the attachment point
    pub points_used: usize,
}

impl LossStatistics {
    pub fn zero() -> Self {
        Self {
            aal: 0.0,
            loss_std_dev: 0.0,
            points_used: 0,
        }
    }

    /// Default statistics: trapezoidal AAL and curve-grid dispersion
    pub fn from_curve(curve: &EpCurve, attachment: f64) -> Result<Self> {
        Self::compute(curve, None, attachment, DispersionBasis::CurveGrid)
    }

    /// Statistics with the chosen dispersion basis.
    ///
    /// `sample` is only read for [`DispersionBasis::LossSample`] and must be
    /// the sample the curve was built from: its largest loss has to equal the
    /// curve's last amount.
    ///
    /// Fails with `InvalidInput` for an empty curve, a negative or non-finite
    /// attachment, or a missing or mismatched sample. An attachment beyond
    /// every curve amount and a degenerate curve both give the zero result.
    pub fn compute(
        curve: &EpCurve,
        sample: Option<&LossSample>,
        attachment: f64,
        basis: DispersionBasis,
    ) -> Result<Self> {
        if curve.is_empty() {
            return Err(PricingError::input("cannot compute loss statistics on an empty EP curve"));
        }
        if !attachment.is_finite() || attachment < 0.0 {
            return Err(PricingError::input(format!(
                "attachment point must be a finite non-negative amount, got {}",
                attachment
            )));
        }
        if basis == DispersionBasis::LossSample {
            let sample = sample.ok_or_else(|| {
                PricingError::input("loss-sample dispersion requires the loss sample")
            })?;
            if sample.max() != curve.max_amount() {
                return Err(PricingError::input(format!(
                    "loss sample (max {}) does not match the EP curve (max {})",
                    sample.max(),
                    curve.max_amount()
                )));
            }
        }

        if curve.is_degenerate() {
            log::debug!("degenerate EP curve, loss statistics are zero");
            return Ok(Self::zero());
        }

        let layer = attached_points(curve, attachment);
        if layer.is_empty() {
            log::debug!(
                "attachment {} lies beyond the largest loss {}, loss statistics are zero",
                attachment,
                curve.max_amount()
            );
            return Ok(Self::zero());
        }

        let loss_std_dev = match (basis, sample) {
            (DispersionBasis::LossSample, Some(sample)) => sample.std_dev(),
            _ => grid_std_dev(layer),
        };

        Ok(Self {
            aal: trapezoid(layer),
            loss_std_dev,
            points_used: layer.len(),
        })
    }
}

/// Trapezoidal AAL above `attachment`
pub fn average_annual_loss(curve: &EpCurve, attachment: f64) -> Result<f64> {
    LossStatistics::from_curve(curve, attachment).map(|s| s.aal)
}

/// Points with amount at or above the attachment; amounts are sorted so this is a suffix
fn attached_points(curve: &EpCurve, attachment: f64) -> &[EpPoint] {
    let points = curve.points();
    let start = points.partition_point(|p| p.amount < attachment);
    &points[start..]
}

fn trapezoid(points: &[EpPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| (w[1].amount - w[0].amount) * (w[0].probability + w[1].probability) / 2.0)
        .sum()
}

fn grid_std_dev(points: &[EpPoint]) -> f64 {
    let amounts: Vec<f64> = points.iter().map(|p| p.amount).collect();
    sample_std_dev(&amounts)
}
