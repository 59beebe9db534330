//! Pricing engine: sample → EP curve → loss statistics → premium

use crate::curve::{CountingMethod, EpCurve, EpCurveBuilder, DEFAULT_RESOLUTION};
use crate::error::{PricingError, Result};
use crate::premium::{self, PremiumResult, RateParameters};
use crate::sample::LossSample;
use crate::statistics::{DispersionBasis, LossStatistics};
use serde::{Deserialize, Serialize};

/// Configuration for a pricing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Number of EP curve points
    pub resolution: usize,

    /// Attachment point (insured policy amount) where AAL integration starts
    pub attachment: f64,

    /// Exceedance counting strategy for the curve builder
    pub counting: CountingMethod,

    /// Dispersion measure behind the risk load
    pub dispersion: DispersionBasis,

    /// Count EP curve thresholds on the rayon pool
    pub parallel: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            attachment: 0.0,
            counting: CountingMethod::Sorted,
            dispersion: DispersionBasis::CurveGrid,
            parallel: false,
        }
    }
}

impl PricingConfig {
    pub fn with_attachment(mut self, attachment: f64) -> Self {
        self.attachment = attachment;
        self
    }

    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_dispersion(mut self, dispersion: DispersionBasis) -> Self {
        self.dispersion = dispersion;
        self
    }
}

/// Every intermediate of one pricing run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingResult {
    pub curve: EpCurve,
    pub statistics: LossStatistics,
    pub premium: PremiumResult,
}

impl PricingResult {
    pub fn average_rate(&self) -> f64 {
        self.premium.average_rate
    }
}

/// Main pricing engine
#[derive(Debug, Clone)]
pub struct PricingEngine {
    params: RateParameters,
    config: PricingConfig,
}

impl PricingEngine {
    /// Create an engine; fails with `InvalidConfiguration` for unusable rate parameters
    pub fn new(params: RateParameters, config: PricingConfig) -> Result<Self> {
        params.validate()?;
        if !config.attachment.is_finite() || config.attachment < 0.0 {
            return Err(PricingError::input(format!(
                "attachment point must be a finite non-negative amount, got {}",
                config.attachment
            )));
        }
        Ok(Self { params, config })
    }

    pub fn params(&self) -> &RateParameters {
        &self.params
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn curve_builder(&self) -> EpCurveBuilder {
        EpCurveBuilder::new(self.config.resolution)
            .counting(self.config.counting)
            .parallel(self.config.parallel)
    }

    /// EP curve for a sample at the configured resolution
    pub fn curve(&self, sample: &LossSample) -> Result<EpCurve> {
        self.curve_builder().build(sample)
    }

    /// Price one loss sample
    pub fn price(&self, sample: &LossSample) -> Result<PricingResult> {
        let curve = self.curve(sample)?;
        let statistics = LossStatistics::compute(
            &curve,
            Some(sample),
            self.config.attachment,
            self.config.dispersion,
        )?;
        let premium = premium::premium_for(&statistics, &self.params)?;

        log::debug!(
            "priced {} years: AAL={:.4} sd={:.4} rate={:.4}",
            sample.len(),
            statistics.aal,
            statistics.loss_std_dev,
            premium.average_rate
        );

        Ok(PricingResult {
            curve,
            statistics,
            premium,
        })
    }
}
