//! Rate parameters for the premium formula
//!
//! Loaded from JSON; any field left out takes the pricing default, so
//! `{}` is a valid parameter file.

use crate::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TARGET_YIELD: f64 = 0.10;
/// One-tailed 95th percentile
pub const DEFAULT_CONFIDENCE_Z: f64 = 1.645;
pub const DEFAULT_COMMISSION_RATE: f64 = 0.20;
pub const DEFAULT_PREMIUM_TAX_RATE: f64 = 0.04;
pub const DEFAULT_UNDERWRITING_PROFIT_RATE: f64 = 0.05;
pub const DEFAULT_TREND_ADJUSTMENT: f64 = 0.0;
pub const DEFAULT_FIXED_EXPENSE: f64 = 25.0;
pub const DEFAULT_EXPOSURE_UNITS: f64 = 1.0;

/// Actuarial constants for one rate calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateParameters {
    /// Investor target yield (fraction)
    #[serde(default = "default_target_yield")]
    pub target_yield: f64,

    /// Confidence z-score scaling the risk load
    #[serde(default = "default_confidence_z")]
    pub confidence_z: f64,

    /// Fraction of gross premium
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,

    /// Fraction of gross premium
    #[serde(default = "default_premium_tax_rate")]
    pub premium_tax_rate: f64,

    /// Fraction of gross premium
    #[serde(default = "default_underwriting_profit_rate")]
    pub underwriting_profit_rate: f64,

    /// Loss trend loading (fraction of gross premium)
    #[serde(default = "default_trend_adjustment")]
    pub trend_adjustment: f64,

    /// Fixed expense per exposure unit (monetary)
    #[serde(default = "default_fixed_expense")]
    pub fixed_expense: f64,

    /// Number of insured units sharing the loss
    #[serde(default = "default_exposure_units")]
    pub exposure_units: f64,
}

fn default_target_yield() -> f64 {
    DEFAULT_TARGET_YIELD
}

fn default_confidence_z() -> f64 {
    DEFAULT_CONFIDENCE_Z
}

fn default_commission_rate() -> f64 {
    DEFAULT_COMMISSION_RATE
}

fn default_premium_tax_rate() -> f64 {
    DEFAULT_PREMIUM_TAX_RATE
}

fn default_underwriting_profit_rate() -> f64 {
    DEFAULT_UNDERWRITING_PROFIT_RATE
}

fn default_trend_adjustment() -> f64 {
    DEFAULT_TREND_ADJUSTMENT
}

fn default_fixed_expense() -> f64 {
    DEFAULT_FIXED_EXPENSE
}

fn default_exposure_units() -> f64 {
    DEFAULT_EXPOSURE_UNITS
}

impl Default for RateParameters {
    fn default() -> Self {
        Self {
            target_yield: DEFAULT_TARGET_YIELD,
            confidence_z: DEFAULT_CONFIDENCE_Z,
            commission_rate: DEFAULT_COMMISSION_RATE,
            premium_tax_rate: DEFAULT_PREMIUM_TAX_RATE,
            underwriting_profit_rate: DEFAULT_UNDERWRITING_PROFIT_RATE,
            trend_adjustment: DEFAULT_TREND_ADJUSTMENT,
            fixed_expense: DEFAULT_FIXED_EXPENSE,
            exposure_units: DEFAULT_EXPOSURE_UNITS,
        }
    }
}

impl RateParameters {
    /// Load parameters from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse parameters from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Reluctance factor: (yield · z) / (1 + yield)
    pub fn reluctance(&self) -> f64 {
        (self.target_yield * self.confidence_z) / (1.0 + self.target_yield)
    }

    /// Share of gross premium consumed by commission, tax, profit and trend
    pub fn variable_load_fraction(&self) -> f64 {
        self.commission_rate
            + self.premium_tax_rate
            + self.underwriting_profit_rate
            + self.trend_adjustment
    }

    /// Check the parameters can produce a finite rate.
    ///
    /// Fails with `InvalidConfiguration` if any field is not finite, the
    /// exposure is not positive, the target yield is at or below -1, or the
    /// variable load consumes the whole premium.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("target_yield", self.target_yield),
            ("confidence_z", self.confidence_z),
            ("commission_rate", self.commission_rate),
            ("premium_tax_rate", self.premium_tax_rate),
            ("underwriting_profit_rate", self.underwriting_profit_rate),
            ("trend_adjustment", self.trend_adjustment),
            ("fixed_expense", self.fixed_expense),
            ("exposure_units", self.exposure_units),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PricingError::config(format!("{} must be finite, got {}", name, value)));
        }

        if self.exposure_units <= 0.0 {
            return Err(PricingError::config(format!(
                "exposure_units must be positive, got {}",
                self.exposure_units
            )));
        }

        if self.target_yield <= -1.0 {
            return Err(PricingError::config(format!(
                "target_yield must be above -1, got {}",
                self.target_yield
            )));
        }

        let variable = self.variable_load_fraction();
        if variable >= 1.0 {
            return Err(PricingError::config(format!(
                "variable expense and profit load {} leaves no premium to cover losses",
                variable
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let p = RateParameters::default();
        assert_eq!(p.confidence_z, 1.645);
        assert_eq!(p.fixed_expense, 25.0);
        assert_eq!(p.exposure_units, 1.0);
        assert_relative_eq!(p.variable_load_fraction(), 0.29, epsilon = 1e-12);
        assert_relative_eq!(p.reluctance(), 0.1645 / 1.1, epsilon = 1e-12);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let p = RateParameters::from_json_str(r#"{ "fixed_expense": 10.0, "exposure_units": 4 }"#)
            .unwrap();
        assert_eq!(p.fixed_expense, 10.0);
        assert_eq!(p.exposure_units, 4.0);
        assert_eq!(p.commission_rate, DEFAULT_COMMISSION_RATE);

        assert_eq!(RateParameters::from_json_str("{}").unwrap(), RateParameters::default());
    }

    #[test]
    fn test_json_rejects_invalid_configuration() {
        let err = RateParameters::from_json_str(r#"{ "commission_rate": 0.95 }"#).unwrap_err();
        assert!(matches!(err, PricingError::InvalidConfiguration(_)));

        let err = RateParameters::from_json_str(r#"{ "target_yield": "high" }"#).unwrap_err();
        assert!(matches!(err, PricingError::Json(_)));
    }

    #[test]
    fn test_validate() {
        let full_load = RateParameters {
            commission_rate: 0.5,
            premium_tax_rate: 0.25,
            underwriting_profit_rate: 0.25,
            trend_adjustment: 0.0,
            ..Default::default()
        };
        assert!(matches!(full_load.validate(), Err(PricingError::InvalidConfiguration(_))));

        let no_exposure = RateParameters { exposure_units: 0.0, ..Default::default() };
        assert!(no_exposure.validate().is_err());

        let nan_z = RateParameters { confidence_z: f64::NAN, ..Default::default() };
        assert!(nan_z.validate().is_err());

        let bad_yield = RateParameters { target_yield: -1.0, ..Default::default() };
        assert!(bad_yield.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RateParameters::from_json_path("no/such/params.json").unwrap_err();
        assert!(matches!(err, PricingError::Io(_)));
    }
}
