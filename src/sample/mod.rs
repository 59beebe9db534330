//! Simulated annual loss samples
//!
//! A [`LossSample`] is the only input the pricing core takes from upstream
//! hazard models. It can be built from any vector of losses, loaded from CSV,
//! or drawn from the bundled frequency/severity sampler.

mod sampler;
pub mod loader;

pub use sampler::{LossSampler, CompoundLossSampler, SeverityModel};
pub use loader::{load_losses, load_losses_from_reader};

use crate::error::{PricingError, Result};
use serde::Serialize;

/// Minimum number of simulated years (needed for a sample variance)
pub const MIN_SAMPLE_SIZE: usize = 2;

/// Validated, immutable sample of simulated annual losses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LossSample {
    losses: Vec<f64>,
}

impl LossSample {
    /// Validate and wrap a vector of annual losses.
    ///
    /// Fails with `InvalidInput` if there are fewer than two values or any value
    /// is negative or not finite.
    pub fn new(losses: Vec<f64>) -> Result<Self> {
        if losses.len() < MIN_SAMPLE_SIZE {
            return Err(PricingError::input(format!(
                "loss sample needs at least {} values, got {}",
                MIN_SAMPLE_SIZE,
                losses.len()
            )));
        }

        if let Some((idx, &bad)) = losses
            .iter()
            .enumerate()
            .find(|(_, x)| !x.is_finite() || **x < 0.0)
        {
            return Err(PricingError::input(format!(
                "loss sample value {} at index {} is not a finite non-negative amount",
                bad, idx
            )));
        }

        Ok(Self { losses })
    }

    pub fn len(&self) -> usize {
        self.losses.len()
    }

    /// Always false for a validated sample; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.losses
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.losses.iter()
    }

    /// Largest simulated loss
    pub fn max(&self) -> f64 {
        self.losses.iter().copied().fold(0.0, f64::max)
    }

    pub fn mean(&self) -> f64 {
        self.losses.iter().sum::<f64>() / self.losses.len() as f64
    }

    /// Sample standard deviation (N-1 denominator) of the raw losses
    pub fn std_dev(&self) -> f64 {
        sample_std_dev(&self.losses)
    }

    /// True when every simulated year is loss free
    pub fn is_all_zero(&self) -> bool {
        self.losses.iter().all(|&x| x == 0.0)
    }

    /// Sample with every loss reduced by `payout`, floored at zero.
    ///
    /// Fails with `InvalidInput` if `payout` is negative or not finite.
    pub fn mitigated(&self, payout: f64) -> Result<Self> {
        if !payout.is_finite() || payout < 0.0 {
            return Err(PricingError::input(format!(
                "mitigation payout must be a finite non-negative amount, got {}",
                payout
            )));
        }

        Ok(Self {
            losses: self.losses.iter().map(|&x| (x - payout).max(0.0)).collect(),
        })
    }
}

/// Sample standard deviation with N-1 denominator; zero for fewer than two values.
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    // Work relative to the largest magnitude so sums of huge losses stay finite
    let scale = values.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if scale == 0.0 {
        return 0.0;
    }
    let mean = values.iter().map(|x| x / scale).sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|x| (x / scale - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    variance.sqrt() * scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_short_sample() {
        let err = LossSample::new(vec![1.0]).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));

        assert!(LossSample::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(matches!(
            LossSample::new(vec![1.0, -0.5, 2.0]),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            LossSample::new(vec![1.0, f64::NAN]),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(LossSample::new(vec![0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_zero_losses_are_valid() {
        let sample = LossSample::new(vec![0.0; 10]).unwrap();
        assert!(sample.is_all_zero());
        assert_eq!(sample.max(), 0.0);
        assert_eq!(sample.std_dev(), 0.0);
    }

    #[test]
    fn test_summary_statistics() {
        let sample = LossSample::new(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_relative_eq!(sample.mean(), 5.0);
        assert_eq!(sample.max(), 9.0);
        // Sum of squared deviations is 32, so s^2 = 32/7
        assert_relative_eq!(sample.std_dev(), (32.0_f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_std_dev_of_huge_losses_is_finite() {
        let half = f64::MAX / 2.0;
        let sample = LossSample::new(vec![half, half, half]).unwrap();
        assert_eq!(sample.std_dev(), 0.0);

        let spread = LossSample::new(vec![0.0, half]).unwrap();
        assert!(spread.std_dev().is_finite());
        assert_relative_eq!(spread.std_dev(), half / 2.0_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn test_mitigation_floors_at_zero() {
        let sample = LossSample::new(vec![0.0, 50.0, 100.0, 250.0]).unwrap();
        let mitigated = sample.mitigated(75.0).unwrap();
        assert_eq!(mitigated.as_slice(), &[0.0, 0.0, 25.0, 175.0]);

        // Baseline untouched
        assert_eq!(sample.as_slice(), &[0.0, 50.0, 100.0, 250.0]);
    }

    #[test]
    fn test_mitigation_rejects_negative_payout() {
        let sample = LossSample::new(vec![1.0, 2.0]).unwrap();
        assert!(matches!(sample.mitigated(-1.0), Err(PricingError::InvalidInput(_))));
        assert!(sample.mitigated(f64::NAN).is_err());
        assert_eq!(sample.mitigated(0.0).unwrap(), sample);
    }
}
