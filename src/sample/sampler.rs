//! Frequency/severity Monte Carlo sampler
//!
//! Optional upstream collaborator: the pricing core accepts any
//! [`LossSample`], this just makes reproducible ones for demos and tests.

use super::LossSample;
use crate::error::{PricingError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, LogNormal, Pareto, Poisson};
use serde::{Deserialize, Serialize};

/// Per-event loss severity distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeverityModel {
    /// Log-normal severity; ln-space params.
    /// E[X] = exp(mu + sigma²/2).
    LogNormal { mu: f64, sigma: f64 },
    /// Pareto severity: `scale` = minimum loss, `shape` = tail index α.
    /// E[X] = scale * shape / (shape − 1)  (requires shape > 1).
    Pareto { scale: f64, shape: f64 },
}

enum Severity {
    LogNormal(LogNormal<f64>),
    Pareto(Pareto<f64>),
}

impl Severity {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Severity::LogNormal(d) => d.sample(rng),
            Severity::Pareto(d) => d.sample(rng),
        }
    }
}

impl SeverityModel {
    fn build(&self) -> Result<Severity> {
        match *self {
            SeverityModel::LogNormal { mu, sigma } => LogNormal::new(mu, sigma)
                .map(Severity::LogNormal)
                .map_err(|e| PricingError::config(format!("log-normal severity: {}", e))),
            SeverityModel::Pareto { scale, shape } => Pareto::new(scale, shape)
                .map(Severity::Pareto)
                .map_err(|e| PricingError::config(format!("pareto severity: {}", e))),
        }
    }
}

/// Source of simulated annual losses
pub trait LossSampler {
    /// Draw `years` simulated annual losses
    fn sample_years<R: Rng + ?Sized>(&self, years: usize, rng: &mut R) -> Result<LossSample>;

    /// Draw from a ChaCha20 stream seeded with `seed`; same seed, same sample
    fn sample_seeded(&self, years: usize, seed: u64) -> Result<LossSample> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        self.sample_years(years, &mut rng)
    }
}

/// Compound Poisson annual loss: Poisson event count, i.i.d. severities summed per year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundLossSampler {
    /// Poisson λ: expected number of loss events per year
    pub annual_frequency: f64,
    pub severity: SeverityModel,
    /// Optional cap on the aggregate annual loss
    #[serde(default)]
    pub annual_limit: Option<f64>,
}

impl CompoundLossSampler {
    pub fn new(annual_frequency: f64, severity: SeverityModel) -> Self {
        Self {
            annual_frequency,
            severity,
            annual_limit: None,
        }
    }

    /// Cap each simulated year's aggregate loss at `limit`
    pub fn with_annual_limit(mut self, limit: f64) -> Self {
        self.annual_limit = Some(limit);
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.annual_frequency.is_finite() || self.annual_frequency <= 0.0 {
            return Err(PricingError::config(format!(
                "annual frequency must be positive, got {}",
                self.annual_frequency
            )));
        }
        if let Some(limit) = self.annual_limit {
            if !limit.is_finite() || limit < 0.0 {
                return Err(PricingError::config(format!(
                    "annual limit must be a finite non-negative amount, got {}",
                    limit
                )));
            }
        }
        Ok(())
    }
}

impl LossSampler for CompoundLossSampler {
    fn sample_years<R: Rng + ?Sized>(&self, years: usize, rng: &mut R) -> Result<LossSample> {
        self.validate()?;
        let frequency = Poisson::new(self.annual_frequency)
            .map_err(|e| PricingError::config(format!("poisson frequency: {}", e)))?;
        let severity = self.severity.build()?;
        let limit = self.annual_limit.unwrap_or(f64::INFINITY);

        let losses = (0..years)
            .map(|_| {
                let events = frequency.sample(rng) as u64;
                let total: f64 = (0..events).map(|_| severity.sample(rng)).sum();
                total.min(limit)
            })
            .collect();

        LossSample::new(losses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler() -> CompoundLossSampler {
        CompoundLossSampler::new(0.3, SeverityModel::LogNormal { mu: 10.0, sigma: 1.2 })
    }

    #[test]
    fn test_seed_reproduces_sample() {
        let a = sampler().sample_seeded(500, 42).unwrap();
        let b = sampler().sample_seeded(500, 42).unwrap();
        let c = sampler().sample_seeded(500, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_frequency_drives_zero_years() {
        let sample = sampler().sample_seeded(10_000, 7).unwrap();
        let zero_years = sample.iter().filter(|&&x| x == 0.0).count() as f64;
        // P(no event) = exp(-0.3) ≈ 0.741
        let frac = zero_years / sample.len() as f64;
        assert!((frac - (-0.3_f64).exp()).abs() < 0.02, "zero-year fraction {}", frac);
    }

    #[test]
    fn test_annual_limit_caps_losses() {
        let severity = SeverityModel::Pareto { scale: 1_000.0, shape: 1.5 };
        let capped = CompoundLossSampler::new(2.0, severity)
            .with_annual_limit(5_000.0)
            .sample_seeded(2_000, 1)
            .unwrap();
        assert!(capped.max() <= 5_000.0);
        assert!(capped.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn test_invalid_parameters() {
        let bad_freq =
            CompoundLossSampler::new(0.0, SeverityModel::LogNormal { mu: 0.0, sigma: 1.0 });
        assert!(matches!(
            bad_freq.sample_seeded(10, 1),
            Err(PricingError::InvalidConfiguration(_))
        ));

        let bad_severity =
            CompoundLossSampler::new(1.0, SeverityModel::Pareto { scale: -1.0, shape: 2.0 });
        assert!(matches!(
            bad_severity.sample_seeded(10, 1),
            Err(PricingError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_too_few_years_is_invalid_input() {
        assert!(matches!(sampler().sample_seeded(1, 1), Err(PricingError::InvalidInput(_))));
    }
}
