//! Premium rate calculation
//!
//! Loaded rate on top of the loss statistics:
//!
//! ```text
//! reluctance   = (target_yield * confidence_z) / (1 + target_yield)
//! pure_premium = AAL / exposure_units
//! risk_load    = reluctance * loss_std_dev / exposure_units
//! average_rate = (pure_premium + risk_load + fixed_expense) / (1 - variable_load)
//! ```

mod params;

pub use params::{
    RateParameters, DEFAULT_COMMISSION_RATE, DEFAULT_CONFIDENCE_Z, DEFAULT_EXPOSURE_UNITS,
    DEFAULT_FIXED_EXPENSE, DEFAULT_PREMIUM_TAX_RATE, DEFAULT_TARGET_YIELD,
    DEFAULT_TREND_ADJUSTMENT, DEFAULT_UNDERWRITING_PROFIT_RATE,
};

use crate::error::{PricingError, Result};
use crate::statistics::LossStatistics;
use serde::{Deserialize, Serialize};

/// Average premium rate and the components that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumResult {
    /// Gross average annual rate per exposure unit
    pub average_rate: f64,
    pub aal: f64,
    pub loss_std_dev: f64,
    pub pure_premium: f64,
    pub risk_load: f64,
    pub reluctance: f64,
    pub variable_load_fraction: f64,
}

/// Average rate from AAL, loss standard deviation and rate parameters.
///
/// Fails with `InvalidConfiguration` for unusable parameters (see
/// [`RateParameters::validate`]) and `InvalidInput` for a negative or
/// non-finite AAL or standard deviation.
pub fn average_rate(aal: f64, loss_std_dev: f64, params: &RateParameters) -> Result<PremiumResult> {
    params.validate()?;
    for (name, value) in [("AAL", aal), ("loss standard deviation", loss_std_dev)] {
        if !value.is_finite() || value < 0.0 {
            return Err(PricingError::input(format!(
                "{} must be a finite non-negative amount, got {}",
                name, value
            )));
        }
    }

    let reluctance = params.reluctance();
    let pure_premium = aal / params.exposure_units;
    let risk_load = (reluctance * loss_std_dev) / params.exposure_units;
    let variable_load_fraction = params.variable_load_fraction();
    let average_rate =
        (pure_premium + risk_load + params.fixed_expense) / (1.0 - variable_load_fraction);

    Ok(PremiumResult {
        average_rate,
        aal,
        loss_std_dev,
        pure_premium,
        risk_load,
        reluctance,
        variable_load_fraction,
    })
}

/// [`average_rate`] from computed loss statistics
pub fn premium_for(stats: &LossStatistics, params: &RateParameters) -> Result<PremiumResult> {
    average_rate(stats.aal, stats.loss_std_dev, params)
}
