//! Premium rebate from a loss-mitigation payout
//!
//! A mitigation investment that pays `M` per year in a loss year lowers every
//! simulated loss by `M` (floored at zero). The rebate is the premium saved
//! by pricing the mitigated sample instead of the baseline.

use super::engine::PricingEngine;
use crate::error::Result;
use crate::premium::PremiumResult;
use crate::sample::LossSample;
use rayon::prelude::*;
use serde::Serialize;

/// Baseline vs mitigated premium for one payout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RebateResult {
    pub mitigation_payout: f64,
    pub baseline_premium: f64,
    pub mitigated_premium: f64,
    /// baseline_premium - mitigated_premium
    pub rebate_amount: f64,
    pub baseline: PremiumResult,
    pub mitigated: PremiumResult,
}

impl RebateResult {
    fn from_premiums(
        mitigation_payout: f64,
        baseline: PremiumResult,
        mitigated: PremiumResult,
    ) -> Self {
        let rebate_amount = baseline.average_rate - mitigated.average_rate;
        if rebate_amount < 0.0 {
            // Premium is non-increasing in the payout; only rounding lands here
            log::warn!(
                "mitigation payout {} raised the premium by {:e}",
                mitigation_payout,
                -rebate_amount
            );
        }

        Self {
            mitigation_payout,
            baseline_premium: baseline.average_rate,
            mitigated_premium: mitigated.average_rate,
            rebate_amount,
            baseline,
            mitigated,
        }
    }
}

impl PricingEngine {
    /// Rebate for a single mitigation payout.
    ///
    /// Baseline and mitigated samples are priced with identical settings on
    /// the rayon pool. Fails with `InvalidInput` for a negative or non-finite
    /// payout; pricing errors propagate unchanged.
    pub fn rebate(&self, sample: &LossSample, payout: f64) -> Result<RebateResult> {
        let mitigated_sample = sample.mitigated(payout)?;
        let (baseline, mitigated) =
            rayon::join(|| self.price(sample), || self.price(&mitigated_sample));

        Ok(RebateResult::from_premiums(payout, baseline?.premium, mitigated?.premium))
    }

    /// Rebates for a list of payouts, baseline priced once.
    ///
    /// Payouts are evaluated in parallel; results keep the input order.
    pub fn rebate_schedule(
        &self,
        sample: &LossSample,
        payouts: &[f64],
    ) -> Result<Vec<RebateResult>> {
        let baseline = self.price(sample)?.premium;

        payouts
            .par_iter()
            .map(|&payout| -> Result<RebateResult> {
                let mitigated = self.price(&sample.mitigated(payout)?)?.premium;
                Ok(RebateResult::from_premiums(payout, baseline, mitigated))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;
    use crate::premium::RateParameters;
    use crate::pricing::PricingConfig;
    use proptest::prelude::*;

    fn engine(config: PricingConfig) -> PricingEngine {
        PricingEngine::new(RateParameters::default(), config).unwrap()
    }

    fn spread_sample() -> LossSample {
        LossSample::new((0..1000u32).map(|i| ((i * 37) % 1000) as f64 / 10.0).collect()).unwrap()
    }

    #[test]
    fn test_rebate_is_premium_difference() {
        let engine = engine(PricingConfig::default().with_resolution(10_000));
        let sample = spread_sample();
        let result = engine.rebate(&sample, 15.0).unwrap();

        assert_eq!(result.baseline, engine.price(&sample).unwrap().premium);
        assert_eq!(
            result.mitigated,
            engine.price(&sample.mitigated(15.0).unwrap()).unwrap().premium
        );
        assert_eq!(result.rebate_amount, result.baseline_premium - result.mitigated_premium);
        assert!(result.rebate_amount > 0.0);
        assert!(result.mitigated.aal < result.baseline.aal);
    }

    #[test]
    fn test_zero_payout_has_no_rebate() {
        let result = engine(PricingConfig::default()).rebate(&spread_sample(), 0.0).unwrap();
        assert_eq!(result.rebate_amount, 0.0);
        assert_eq!(result.baseline, result.mitigated);
    }

    #[test]
    fn test_full_mitigation_leaves_fixed_expense() {
        let params = RateParameters::default();
        let result = engine(PricingConfig::default()).rebate(&spread_sample(), 1_000.0).unwrap();
        assert_eq!(
            result.mitigated_premium,
            params.fixed_expense / (1.0 - params.variable_load_fraction())
        );
        assert!(result.rebate_amount > 0.0);
    }

    #[test]
    fn test_negative_payout_is_invalid_input() {
        let err = engine(PricingConfig::default()).rebate(&spread_sample(), -1.0).unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));

        let err = engine(PricingConfig::default())
            .rebate_schedule(&spread_sample(), &[0.0, f64::NAN])
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }

    #[test]
    fn test_schedule_matches_single_rebates() {
        let engine = engine(PricingConfig::default().with_attachment(10.0));
        let sample = spread_sample();
        let payouts = [0.0, 5.0, 12.5, 40.0, 80.0];
        let schedule = engine.rebate_schedule(&sample, &payouts).unwrap();

        assert_eq!(schedule.len(), payouts.len());
        for (result, &payout) in schedule.iter().zip(payouts.iter()) {
            assert_eq!(*result, engine.rebate(&sample, payout).unwrap());
        }
    }

    #[test]
    fn test_premium_falls_with_payout_on_fine_grid() {
        let engine = engine(PricingConfig::default().with_resolution(10_000));
        let schedule = engine
            .rebate_schedule(&spread_sample(), &[0.0, 10.0, 20.0, 40.0, 90.0])
            .unwrap();
        for pair in schedule.windows(2) {
            assert!(pair[1].mitigated_premium < pair[0].mitigated_premium);
            assert!(pair[1].rebate_amount > pair[0].rebate_amount);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        // Shrinking every loss shrinks the grid with it, so no exceedance
        // count rises and the attached suffix never grows.
        #[test]
        fn test_rebate_monotonicity(
            losses in prop::collection::vec(0.0f64..1e4, 2..100),
            k in 2usize..200,
            attachment in 0.0f64..1e4,
            m1 in 0.0f64..1e4,
            extra in 0.0f64..1e4,
            loss_sample_basis in any::<bool>()
        ) {
            let dispersion = if loss_sample_basis {
                crate::statistics::DispersionBasis::LossSample
            } else {
                crate::statistics::DispersionBasis::CurveGrid
            };
            let engine = engine(
                PricingConfig::default()
                    .with_resolution(k)
                    .with_attachment(attachment)
                    .with_dispersion(dispersion),
            );
            let sample = LossSample::new(losses).unwrap();
            let first = sample.mitigated(m1).unwrap();
            let second = sample.mitigated(m1 + extra).unwrap();

            let p1 = engine.price(&first).unwrap().average_rate();
            let p2 = engine.price(&second).unwrap().average_rate();
            prop_assert!(p2 <= p1 * (1.0 + 1e-12), "premium rose from {} to {}", p1, p2);
        }
    }
}
