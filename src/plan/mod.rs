//! Normalized business plan
//!
//! A [`Plan`] holds validated domain values only. Loosely formatted caller
//! data enters through [`PlanInput`] and is normalized into a plan.

pub mod input;

pub use input::{
    CapitalInput, CostCategoryInput, CostInput, FinancingSourceInput, InputIssue, PaymentTermsInput, PlanInput,
    RevenueStreamInput, SeasonalityInput, WithdrawalInput,
};

use crate::assumptions::{Industry, SeasonalityTable};
use crate::finance::{CapitalRequirement, CostPlan, FinancingSource, PrivateWithdrawal, RevenueStream};
use crate::projection::PaymentTerms;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Seasonal revenue pattern selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seasonality {
    /// Explicit quarterly multipliers (Q1..Q4); take precedence over the industry table
    #[serde(default)]
    pub quarterly: Option<[Decimal; 4]>,

    /// Fall back to the industry pattern when no explicit multipliers are given
    #[serde(default = "default_true")]
    pub use_industry_default: bool,
}

fn default_true() -> bool { true }

impl Default for Seasonality {
    fn default() -> Self {
        Self {
            quarterly: None,
            use_industry_default: true,
        }
    }
}

impl Seasonality {
    /// Multipliers to apply, if any
    pub fn resolve(&self, industry: Industry, table: &SeasonalityTable) -> Option<[Decimal; 4]> {
        self.quarterly.or_else(|| {
            if self.use_industry_default {
                table.pattern(industry)
            } else {
                None
            }
        })
    }
}

/// A complete, normalized business plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub capital: CapitalRequirement,
    pub financing_sources: Vec<FinancingSource>,
    pub withdrawal: PrivateWithdrawal,
    pub revenue_streams: Vec<RevenueStream>,
    pub industry: Industry,
    /// Months the business has been operating (0 for a new founding)
    pub business_age_months: u32,
    pub costs: CostPlan,
    pub payment_terms: PaymentTerms,
    pub seasonality: Seasonality,
    /// Founder-stated self-sufficiency month. Reported alongside the month
    /// derived from the cost plan; it can only delay, never replace, that month.
    pub self_sufficiency_month: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_seasonality_resolution() {
        let table = SeasonalityTable::default();

        let default = Seasonality::default();
        assert_eq!(default.resolve(Industry::Consulting, &table), None);
        assert_eq!(
            default.resolve(Industry::Tourism, &table),
            Some([dec!(0.60), dec!(1.15), dec!(1.55), dec!(0.70)])
        );

        let explicit = Seasonality {
            quarterly: Some([dec!(1.1), dec!(0.9), dec!(1.1), dec!(0.9)]),
            ..Default::default()
        };
        assert_eq!(
            explicit.resolve(Industry::Tourism, &table),
            Some([dec!(1.1), dec!(0.9), dec!(1.1), dec!(0.9)])
        );

        let disabled = Seasonality {
            quarterly: None,
            use_industry_default: false,
        };
        assert_eq!(disabled.resolve(Industry::Tourism, &table), None);
    }
}
