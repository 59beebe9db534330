//! CAT Premium - exceedance-probability pricing for famine catastrophe bonds
//!
//! This library provides:
//! - Validated simulated loss samples (CSV loading, seeded frequency/severity sampling)
//! - Exceedance-probability (EP) curve construction
//! - Average annual loss and loss dispersion above an attachment point
//! - Risk-loaded, expense-loaded average premium rates
//! - Premium rebates from loss-mitigation payouts

pub mod error;
pub mod sample;
pub mod curve;
pub mod statistics;
pub mod premium;
pub mod pricing;

// Re-export commonly used types
pub use error::{PricingError, Result};
pub use sample::{LossSample, LossSampler, CompoundLossSampler, SeverityModel};
pub use curve::{EpCurve, EpPoint, EpCurveBuilder, CountingMethod};
pub use statistics::{LossStatistics, DispersionBasis};
pub use premium::{RateParameters, PremiumResult};
pub use pricing::{PricingEngine, PricingConfig, PricingResult, RebateResult};
