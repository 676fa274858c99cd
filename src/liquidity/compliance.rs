//! Export gate for the business plan
//!
//! Blockers prevent the plan from being exported; warnings are shown to the
//! founder but do not stop the export. Rules run in a fixed order so the
//! result is stable.

use super::analyzer::LiquidityAnalysis;
use crate::assumptions::{ComplianceRules, SELF_SUFFICIENCY_DEADLINE_MONTH};
use crate::money::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocker,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    NegativeLiquidity,
    InsufficientStartupCapital,
    SelfSufficiencyDeadline,
    LowReserve,
    HighVolatility,
    SeasonalSwing,
    FinancingGap,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::NegativeLiquidity => "NEGATIVE_LIQUIDITY",
            IssueCode::InsufficientStartupCapital => "INSUFFICIENT_STARTUP_CAPITAL",
            IssueCode::SelfSufficiencyDeadline => "SELF_SUFFICIENCY_DEADLINE",
            IssueCode::LowReserve => "LOW_RESERVE",
            IssueCode::HighVolatility => "HIGH_VOLATILITY",
            IssueCode::SeasonalSwing => "SEASONAL_SWING",
            IssueCode::FinancingGap => "FINANCING_GAP",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceIssue {
    pub severity: Severity,
    pub code: IssueCode,
    pub message: String,
}

/// Boolean view of every rule outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceFlags {
    pub negative_liquidity: bool,
    pub insufficient_startup_capital: bool,
    pub misses_self_sufficiency_deadline: bool,
    pub low_reserve: bool,
    pub high_volatility: bool,
    pub seasonal_swing: bool,
    pub financing_gap: bool,
}

/// Plan facts the validator needs besides the liquidity analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationContext {
    /// First month with non-negative profit; `None` when never reached
    pub self_sufficiency_month: Option<u32>,
    pub seasonal_swing_percent: Decimal,
    pub financing_gap: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceResult {
    pub blockers: Vec<ComplianceIssue>,
    pub warnings: Vec<ComplianceIssue>,
    pub flags: ComplianceFlags,
    pub is_export_ready: bool,
}

impl ComplianceResult {
    pub fn has_issue(&self, code: IssueCode) -> bool {
        self.blockers.iter().chain(self.warnings.iter()).any(|i| i.code == code)
    }

    fn block(&mut self, code: IssueCode, message: String) {
        self.blockers.push(ComplianceIssue {
            severity: Severity::Blocker,
            code,
            message,
        });
    }

    fn warn(&mut self, code: IssueCode, message: String) {
        self.warnings.push(ComplianceIssue {
            severity: Severity::Warning,
            code,
            message,
        });
    }
}

/// Apply all rules in order
pub fn validate(
    analysis: &LiquidityAnalysis,
    context: &ValidationContext,
    rules: &ComplianceRules,
) -> ComplianceResult {
    let mut result = ComplianceResult {
        blockers: Vec::new(),
        warnings: Vec::new(),
        flags: ComplianceFlags::default(),
        is_export_ready: false,
    };

    if analysis.has_negative_liquidity {
        result.flags.negative_liquidity = true;
        result.block(
            IssueCode::NegativeLiquidity,
            format!(
                "The bank balance turns negative in {} month(s); lowest balance {} € in month {}",
                analysis.negative_months, analysis.minimum_cash, analysis.minimum_cash_month
            ),
        );
    }

    if analysis.minimum_cash < -analysis.recommended_reserve {
        result.flags.insufficient_startup_capital = true;
        result.block(
            IssueCode::InsufficientStartupCapital,
            format!(
                "Start-up capital is insufficient: the deficit of {} € exceeds the recommended reserve of {} €",
                -analysis.minimum_cash, analysis.recommended_reserve
            ),
        );
    }

    match context.self_sufficiency_month {
        Some(month) if month > SELF_SUFFICIENCY_DEADLINE_MONTH => {
            result.flags.misses_self_sufficiency_deadline = true;
            result.block(
                IssueCode::SelfSufficiencyDeadline,
                format!(
                    "Self-sufficiency is reached in month {}; the Gründungszuschuss requires month {} at the latest",
                    month, SELF_SUFFICIENCY_DEADLINE_MONTH
                ),
            );
        }
        Some(_) => {}
        None => {
            result.flags.misses_self_sufficiency_deadline = true;
            result.block(
                IssueCode::SelfSufficiencyDeadline,
                format!(
                    "Self-sufficiency is not reached in the first year; the Gründungszuschuss requires month {} at the latest",
                    SELF_SUFFICIENCY_DEADLINE_MONTH
                ),
            );
        }
    }

    if analysis.is_reserve_low(rules) {
        result.flags.low_reserve = true;
        result.warn(
            IssueCode::LowReserve,
            format!(
                "Liquidity reserve of {} € is below {}% of the recommended {} €",
                analysis.actual_reserve,
                (rules.low_reserve_ratio * Decimal::ONE_HUNDRED).normalize(),
                analysis.recommended_reserve
            ),
        );
    }

    if analysis.is_volatile(rules) {
        result.flags.high_volatility = true;
        result.warn(
            IssueCode::HighVolatility,
            format!(
                "Month-end balances fluctuate strongly (standard deviation {} € at an average of {} €)",
                analysis.volatility, analysis.average_cash
            ),
        );
    }

    if context.seasonal_swing_percent > rules.seasonal_swing_percent {
        result.flags.seasonal_swing = true;
        result.warn(
            IssueCode::SeasonalSwing,
            format!(
                "Quarterly revenue swings by {}%; plan the reserve for the weak season",
                context.seasonal_swing_percent
            ),
        );
    }

    if context.financing_gap.is_positive() {
        result.flags.financing_gap = true;
        result.warn(
            IssueCode::FinancingGap,
            format!(
                "Financing covers the capital requirement only partly; {} € are still open",
                context.financing_gap
            ),
        );
    }

    result.is_export_ready = result.blockers.is_empty();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn healthy_analysis() -> LiquidityAnalysis {
        LiquidityAnalysis {
            minimum_cash: Amount::euros(12_000),
            minimum_cash_month: 4,
            average_cash: Amount::euros(18_000),
            negative_months: 0,
            has_negative_liquidity: false,
            volatility: Amount::euros(3_000),
            average_operating_outflow: Amount::euros(4_000),
            recommended_reserve: Amount::euros(12_000),
            actual_reserve: Amount::euros(12_000),
            reserve_shortfall: Amount::ZERO,
        }
    }

    fn context(month: Option<u32>) -> ValidationContext {
        ValidationContext {
            self_sufficiency_month: month,
            seasonal_swing_percent: Decimal::ZERO,
            financing_gap: Amount::ZERO,
        }
    }

    #[test]
    fn test_clean_plan_is_export_ready() {
        let result = validate(&healthy_analysis(), &context(Some(4)), &ComplianceRules::default());

        assert!(result.is_export_ready);
        assert!(result.blockers.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.flags, ComplianceFlags::default());
    }

    #[test]
    fn test_self_sufficiency_month_seven_blocks() {
        let result = validate(&healthy_analysis(), &context(Some(7)), &ComplianceRules::default());

        assert!(!result.is_export_ready);
        assert_eq!(result.blockers.len(), 1);
        assert_eq!(result.blockers[0].code, IssueCode::SelfSufficiencyDeadline);
        assert!(result.blockers[0].message.contains("month 7"));
    }

    #[test]
    fn test_self_sufficiency_month_six_passes() {
        let result = validate(&healthy_analysis(), &context(Some(6)), &ComplianceRules::default());
        assert!(!result.has_issue(IssueCode::SelfSufficiencyDeadline));
        assert!(result.is_export_ready);
    }

    #[test]
    fn test_never_self_sufficient_blocks() {
        let result = validate(&healthy_analysis(), &context(None), &ComplianceRules::default());
        assert!(result.flags.misses_self_sufficiency_deadline);
        assert!(!result.is_export_ready);
    }

    #[test]
    fn test_negative_liquidity_blockers_in_order() {
        let analysis = LiquidityAnalysis {
            minimum_cash: Amount::euros(-15_000),
            minimum_cash_month: 5,
            negative_months: 8,
            has_negative_liquidity: true,
            actual_reserve: Amount::ZERO,
            reserve_shortfall: Amount::euros(12_000),
            ..healthy_analysis()
        };
        let result = validate(&analysis, &context(Some(7)), &ComplianceRules::default());

        let codes: Vec<IssueCode> = result.blockers.iter().map(|b| b.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::NegativeLiquidity,
                IssueCode::InsufficientStartupCapital,
                IssueCode::SelfSufficiencyDeadline,
            ]
        );
        assert!(result.blockers.iter().all(|b| b.severity == Severity::Blocker));
        assert!(result.flags.low_reserve);
    }

    #[test]
    fn test_small_dip_is_not_insufficient_capital() {
        let analysis = LiquidityAnalysis {
            minimum_cash: Amount::euros(-500),
            has_negative_liquidity: true,
            negative_months: 1,
            ..healthy_analysis()
        };
        let result = validate(&analysis, &context(Some(3)), &ComplianceRules::default());

        assert!(result.flags.negative_liquidity);
        assert!(!result.flags.insufficient_startup_capital);
    }

    #[test]
    fn test_warnings_do_not_block() {
        let analysis = LiquidityAnalysis {
            volatility: Amount::euros(9_000),
            actual_reserve: Amount::euros(4_000),
            ..healthy_analysis()
        };
        let ctx = ValidationContext {
            self_sufficiency_month: Some(2),
            seasonal_swing_percent: dec!(95.00),
            financing_gap: Amount::euros(2_500),
        };
        let result = validate(&analysis, &ctx, &ComplianceRules::default());

        let codes: Vec<IssueCode> = result.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::LowReserve,
                IssueCode::HighVolatility,
                IssueCode::SeasonalSwing,
                IssueCode::FinancingGap,
            ]
        );
        assert!(result.is_export_ready);
    }

    #[test]
    fn test_issue_code_serialization() {
        let json = serde_json::to_string(&IssueCode::InsufficientStartupCapital).unwrap();
        assert_eq!(json, "\"INSUFFICIENT_STARTUP_CAPITAL\"");
        assert_eq!(IssueCode::LowReserve.to_string(), "LOW_RESERVE");
    }
}
