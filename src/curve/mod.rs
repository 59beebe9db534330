//! Exceedance-probability (EP) curves
//!
//! An EP curve maps a loss amount to the fraction of simulated years whose
//! loss strictly exceeds it. Amounts are an even grid from zero to the
//! largest simulated loss, so probabilities fall from at most 1 to 0.

mod builder;

pub use builder::{EpCurveBuilder, CountingMethod, DEFAULT_RESOLUTION};

use serde::{Deserialize, Serialize};

/// One point of an EP curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpPoint {
    pub amount: f64,
    pub probability: f64,
}

/// Exceedance-probability curve
///
/// Amounts are non-decreasing and probabilities non-increasing. Built by
/// [`EpCurveBuilder`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpCurve {
    points: Vec<EpPoint>,
}

impl EpCurve {
    pub(crate) fn from_points(points: Vec<EpPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[EpPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.amount)
    }

    pub fn probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.probability)
    }

    /// Largest amount on the grid (the largest simulated loss)
    pub fn max_amount(&self) -> f64 {
        self.points.last().map(|p| p.amount).unwrap_or(0.0)
    }

    /// Grid spacing between consecutive amounts
    pub fn step(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.max_amount() / (self.points.len() - 1) as f64
    }

    /// True when the sample had no positive loss: the whole curve sits at
    /// amount zero with probability zero.
    pub fn is_degenerate(&self) -> bool {
        self.max_amount() <= 0.0
    }

    /// Exceedance probability read off the curve at `amount`.
    ///
    /// Step lookup: the probability of the largest grid amount not above
    /// `amount`. Past the end of the curve nothing is exceeded.
    pub fn exceedance_probability(&self, amount: f64) -> f64 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if amount > self.max_amount() {
            return 0.0;
        }
        let idx = self.points.partition_point(|p| p.amount <= amount);
        if idx == 0 {
            first.probability
        } else {
            self.points[idx - 1].probability
        }
    }

    /// Probable maximum loss at a return period in years.
    ///
    /// Smallest grid amount whose exceedance probability is at most
    /// `1 / return_period_years`. `None` for return periods below one year or
    /// when the curve never falls that low.
    pub fn probable_maximum_loss(&self, return_period_years: f64) -> Option<f64> {
        if !return_period_years.is_finite() || return_period_years < 1.0 {
            return None;
        }
        let threshold = 1.0 / return_period_years;
        self.points
            .iter()
            .find(|p| p.probability <= threshold)
            .map(|p| p.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::LossSample;

    fn curve(losses: Vec<f64>, k: usize) -> EpCurve {
        let sample = LossSample::new(losses).unwrap();
        EpCurveBuilder::new(k).build(&sample).unwrap()
    }

    #[test]
    fn test_lookup_between_grid_points() {
        // Grid: 0, 25, 50, 75, 100
        let c = curve(vec![10.0, 30.0, 60.0, 100.0], 5);
        assert_eq!(c.exceedance_probability(0.0), 1.0);
        assert_eq!(c.exceedance_probability(30.0), 0.75); // reads the 25 point
        assert_eq!(c.exceedance_probability(99.0), 0.25); // reads the 75 point
        assert_eq!(c.exceedance_probability(100.0), 0.0);
        assert_eq!(c.exceedance_probability(150.0), 0.0);
        assert_eq!(c.exceedance_probability(-5.0), 1.0);
    }

    #[test]
    fn test_step_and_max() {
        let c = curve(vec![0.0, 90.0], 10);
        assert_eq!(c.len(), 10);
        assert_eq!(c.max_amount(), 90.0);
        assert!((c.step() - 10.0).abs() < 1e-12);
        assert!(!c.is_degenerate());
    }

    #[test]
    fn test_probable_maximum_loss() {
        // 10 years, losses 1..=10; grid 0..10 step 1
        let c = curve((1..=10).map(f64::from).collect(), 11);
        // 1-in-5: exceedance <= 0.2 first reached at amount 8
        assert_eq!(c.probable_maximum_loss(5.0), Some(8.0));
        // 1-in-1: probability <= 1 everywhere, so the first point
        assert_eq!(c.probable_maximum_loss(1.0), Some(0.0));
        assert_eq!(c.probable_maximum_loss(0.5), None);
        assert_eq!(c.probable_maximum_loss(f64::NAN), None);
    }
}
