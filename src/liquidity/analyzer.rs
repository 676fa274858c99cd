//! Liquidity risk metrics over a simulated cash flow

use crate::assumptions::ComplianceRules;
use crate::money::{safe_div, Amount, AMOUNT_LIMIT};
use crate::projection::CashFlowProjection;
use rust_decimal::{Decimal, MathematicalOps};
use serde::Serialize;

/// Liquidity metrics of a projection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiquidityAnalysis {
    pub minimum_cash: Amount,
    pub minimum_cash_month: u32,
    pub average_cash: Amount,
    pub negative_months: u32,
    pub has_negative_liquidity: bool,
    /// Population standard deviation of month-end balances
    pub volatility: Amount,
    pub average_operating_outflow: Amount,
    /// `reserve_months × average_operating_outflow`
    pub recommended_reserve: Amount,
    /// Lowest month-end balance, floored at zero
    pub actual_reserve: Amount,
    pub reserve_shortfall: Amount,
}

impl LiquidityAnalysis {
    pub fn analyze(projection: &CashFlowProjection, rules: &ComplianceRules) -> Self {
        let count = Decimal::from(projection.months.len() as u64);
        let balances: Vec<Decimal> = projection.ending_balances().map(Amount::value).collect();

        let mean = safe_div(balances.iter().copied().sum(), count);
        let squared_deviations = balances.iter().try_fold(Decimal::ZERO, |acc, b| {
            let deviation = *b - mean;
            deviation.checked_mul(deviation).and_then(|sq| acc.checked_add(sq))
        });
        let volatility = match squared_deviations {
            Some(total) => Amount::new(safe_div(total, count).sqrt().unwrap_or(Decimal::ZERO)),
            None => Amount::new(AMOUNT_LIMIT),
        };

        let average_operating_outflow = projection.total_operating_outflow().divided_by(count);
        let recommended_reserve = average_operating_outflow.times(rules.reserve_months);
        let actual_reserve = projection.minimum_cash.clamp_non_negative();

        Self {
            minimum_cash: projection.minimum_cash,
            minimum_cash_month: projection.minimum_cash_month,
            average_cash: Amount::new(mean),
            negative_months: projection.negative_months().len() as u32,
            has_negative_liquidity: projection.has_negative_liquidity(),
            volatility,
            average_operating_outflow,
            recommended_reserve,
            actual_reserve,
            reserve_shortfall: (recommended_reserve - actual_reserve).clamp_non_negative(),
        }
    }

    /// Actual reserve below `low_reserve_ratio` of the recommended one
    pub fn is_reserve_low(&self, rules: &ComplianceRules) -> bool {
        self.recommended_reserve.is_positive()
            && self.actual_reserve < self.recommended_reserve.times(rules.low_reserve_ratio)
    }

    /// Volatility above `volatility_ratio` of a positive average balance
    pub fn is_volatile(&self, rules: &ComplianceRules) -> bool {
        self.average_cash.is_positive() && self.volatility > self.average_cash.times(rules.volatility_ratio)
    }
}
