//! Compliance thresholds for the export gate
//!
//! The self-sufficiency deadline is a regulatory rule of the
//! Gründungszuschuss and is not part of [`ComplianceRules`]. The remaining
//! thresholds only drive warnings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Latest plan month in which the business must reach non-negative profit
pub const SELF_SUFFICIENCY_DEADLINE_MONTH: u32 = 6;

/// Warning thresholds for the liquidity analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRules {
    /// Recommended reserve in months of average operating outflow
    #[serde(default = "default_reserve_months")]
    pub reserve_months: Decimal,

    /// Warn when the actual reserve is below this share of the recommended one
    #[serde(default = "default_low_reserve_ratio")]
    pub low_reserve_ratio: Decimal,

    /// Warn when balance volatility exceeds this share of the average balance
    #[serde(default = "default_volatility_ratio")]
    pub volatility_ratio: Decimal,

    /// Warn when the quarterly revenue swing exceeds this many percent
    #[serde(default = "default_seasonal_swing_percent")]
    pub seasonal_swing_percent: Decimal,
}

fn default_reserve_months() -> Decimal { dec!(3) }
fn default_low_reserve_ratio() -> Decimal { dec!(0.5) }
fn default_volatility_ratio() -> Decimal { dec!(0.3) }
fn default_seasonal_swing_percent() -> Decimal { dec!(30) }

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            reserve_months: dec!(3),
            low_reserve_ratio: dec!(0.5),       // 50% of recommended
            volatility_ratio: dec!(0.3),        // 30% of average cash
            seasonal_swing_percent: dec!(30),   // 30% between quarters
        }
    }
}
