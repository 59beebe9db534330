//! EP curve construction from a loss sample

use super::{EpCurve, EpPoint};
use crate::error::{PricingError, Result};
use crate::sample::LossSample;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default number of curve points
pub const DEFAULT_RESOLUTION: usize = 1000;

/// How exceedances are counted per threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMethod {
    /// Scan the full sample for every threshold: O(k·N)
    Naive,
    /// Sort once, binary search per threshold: O(N log N + k log N)
    #[default]
    Sorted,
}

/// Builds an [`EpCurve`] of a fixed resolution from a [`LossSample`]
#[derive(Debug, Clone)]
pub struct EpCurveBuilder {
    resolution: usize,
    counting: CountingMethod,
    parallel: bool,
}

impl Default for EpCurveBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_RESOLUTION)
    }
}

impl EpCurveBuilder {
    /// Builder producing `resolution` evenly spaced points
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            counting: CountingMethod::default(),
            parallel: false,
        }
    }

    pub fn counting(mut self, counting: CountingMethod) -> Self {
        self.counting = counting;
        self
    }

    /// Count thresholds on the rayon pool; output is identical to the sequential build
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Build the curve.
    ///
    /// Amounts run evenly from 0 to `max(sample)` inclusive. Fails with
    /// `InvalidInput` when the resolution is below 2.
    pub fn build(&self, sample: &LossSample) -> Result<EpCurve> {
        if self.resolution < 2 {
            return Err(PricingError::input(format!(
                "EP curve resolution must be at least 2, got {}",
                self.resolution
            )));
        }

        let max = sample.max();
        let n = sample.len() as f64;
        let last = self.resolution - 1;
        let amount_at = |i: usize| -> f64 {
            if i == last {
                max
            } else {
                // Fraction first: max * i overflows for losses near f64::MAX
                max * (i as f64 / last as f64)
            }
        };

        let points = match self.counting {
            CountingMethod::Naive => {
                let losses = sample.as_slice();
                let exceed = |amount: f64| losses.iter().filter(|&&x| x > amount).count();
                self.count_points(amount_at, exceed, n)
            }
            CountingMethod::Sorted => {
                let mut sorted = sample.as_slice().to_vec();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let exceed = |amount: f64| sorted.len() - sorted.partition_point(|&x| x <= amount);
                self.count_points(amount_at, exceed, n)
            }
        };

        if max <= 0.0 {
            log::debug!("loss sample has no positive loss, EP curve is degenerate");
        }
        log::debug!(
            "built EP curve: {} points over [0, {}] from {} years ({:?})",
            points.len(),
            max,
            sample.len(),
            self.counting
        );

        Ok(EpCurve::from_points(points))
    }

    fn count_points<A, E>(&self, amount_at: A, exceed: E, n: f64) -> Vec<EpPoint>
    where
        A: Fn(usize) -> f64 + Sync,
        E: Fn(f64) -> usize + Sync,
    {
        let point = |i: usize| {
            let amount = amount_at(i);
            EpPoint {
                amount,
                probability: exceed(amount) as f64 / n,
            }
        };

        if self.parallel {
            (0..self.resolution).into_par_iter().map(point).collect()
        } else {
            (0..self.resolution).map(point).collect()
        }
    }
}
