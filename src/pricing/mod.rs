//! End-to-end pricing: EP curve, loss statistics, premium rate and rebates

mod engine;
mod rebate;

pub use engine::{PricingEngine, PricingConfig, PricingResult};
pub use rebate::RebateResult;
