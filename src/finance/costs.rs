//! Cost planning (Kostenplanung)
//!
//! Fixed costs arrive as named monthly categories; variable costs as one
//! annual total per plan year. Variable costs are turned into a share of
//! revenue so they can follow the revenue curve month by month.

use crate::money::{round_half_up, safe_div, Amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::revenue::MONTHS_IN_YEAR;

/// One fixed cost category (rent, insurance, software, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCategory {
    pub name: String,
    pub monthly: Amount,
}

impl CostCategory {
    pub fn new(name: &str, monthly: Amount) -> Self {
        Self {
            name: name.to_string(),
            monthly,
        }
    }
}

/// Fixed cost categories plus variable-cost totals for years 1–3
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostPlan {
    pub fixed: Vec<CostCategory>,
    /// Variable costs per plan year (index 0 = year 1)
    pub variable_annual: [Amount; 3],
}

impl CostPlan {
    pub fn fixed_monthly(&self) -> Amount {
        self.fixed.iter().map(|c| c.monthly).sum()
    }

    pub fn fixed_annual(&self) -> Amount {
        self.fixed_monthly().times(Decimal::from(MONTHS_IN_YEAR as u32))
    }

    /// Variable costs of plan year 1..=3; zero outside that range
    pub fn variable_annual(&self, year: u8) -> Amount {
        match year {
            1..=3 => self.variable_annual[usize::from(year - 1)],
            _ => Amount::ZERO,
        }
    }

    /// Fixed plus variable costs of a plan year
    pub fn annual_total(&self, year: u8) -> Amount {
        if !(1..=3).contains(&year) {
            return Amount::ZERO;
        }
        self.fixed_annual() + self.variable_annual(year)
    }

    /// Variable costs as a fraction of that year's revenue (0 when revenue is 0)
    pub fn variable_cost_share(&self, year: u8, revenue: Amount) -> Decimal {
        safe_div(self.variable_annual(year).value(), revenue.value())
    }

    /// `revenue(m) − fixed − share × revenue(m)` for each month of year 1
    pub fn monthly_profit_year1(&self, monthly_revenue: &[Amount; MONTHS_IN_YEAR]) -> [Amount; MONTHS_IN_YEAR] {
        let revenue_year1: Amount = monthly_revenue.iter().sum();
        let share = self.variable_cost_share(1, revenue_year1);
        let fixed = self.fixed_monthly();

        let mut profit = [Amount::ZERO; MONTHS_IN_YEAR];
        for (slot, revenue) in profit.iter_mut().zip(monthly_revenue.iter()) {
            *slot = *revenue - fixed - revenue.times(share);
        }
        profit
    }

    /// First plan month (1-based) with non-negative profit, if any in year 1
    pub fn self_sufficiency_month(&self, monthly_revenue: &[Amount; MONTHS_IN_YEAR]) -> Option<u32> {
        self.monthly_profit_year1(monthly_revenue)
            .iter()
            .position(|p| !p.is_negative())
            .map(|index| index as u32 + 1)
    }

    /// Totals for years 1–3 against the matching revenues
    pub fn summarize(&self, monthly_revenue: &[Amount; MONTHS_IN_YEAR], annual_revenue: &[Amount; 3]) -> CostSummary {
        let years = [1u8, 2, 3];
        CostSummary {
            fixed_monthly: self.fixed_monthly(),
            fixed_annual: self.fixed_annual(),
            variable_annual: self.variable_annual,
            annual_total: years.map(|y| self.annual_total(y)),
            variable_cost_share_percent: years.map(|y| {
                let share = self.variable_cost_share(y, annual_revenue[usize::from(y - 1)]);
                round_half_up(share * Decimal::ONE_HUNDRED, 2)
            }),
            monthly_profit_year1: self.monthly_profit_year1(monthly_revenue),
            self_sufficiency_month: self.self_sufficiency_month(monthly_revenue),
        }
    }
}

/// Cost figures reported with an evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSummary {
    pub fixed_monthly: Amount,
    pub fixed_annual: Amount,
    pub variable_annual: [Amount; 3],
    pub annual_total: [Amount; 3],
    pub variable_cost_share_percent: [Decimal; 3],
    pub monthly_profit_year1: [Amount; MONTHS_IN_YEAR],
    /// Derived from the profit series; `None` when year 1 never breaks even
    pub self_sufficiency_month: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan() -> CostPlan {
        CostPlan {
            fixed: vec![
                CostCategory::new("Miete", Amount::euros(1_200)),
                CostCategory::new("Versicherungen", Amount::euros(300)),
                CostCategory::new("Software", Amount::new(dec!(99.90))),
            ],
            variable_annual: [Amount::euros(12_000), Amount::euros(15_000), Amount::euros(18_000)],
        }
    }

    #[test]
    fn test_fixed_totals() {
        let plan = plan();
        assert_eq!(plan.fixed_monthly().value(), dec!(1599.90));
        assert_eq!(plan.fixed_annual().value(), dec!(19198.80));
        assert_eq!(plan.annual_total(2).value(), dec!(34198.80));
        assert_eq!(plan.annual_total(4), Amount::ZERO);
    }

    #[test]
    fn test_variable_cost_share() {
        let plan = plan();
        assert_eq!(plan.variable_cost_share(1, Amount::euros(60_000)), dec!(0.2));
        assert_eq!(plan.variable_cost_share(1, Amount::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_self_sufficiency_month() {
        // Fixed 3000, variable 20% of revenue: break-even at 3750
        let plan = CostPlan {
            fixed: vec![CostCategory::new("Fixkosten", Amount::euros(3_000))],
            variable_annual: [Amount::euros(12_000), Amount::ZERO, Amount::ZERO],
        };
        let revenue = [2_000, 2_500, 3_000, 3_500, 3_750, 6_000, 6_000, 6_000, 6_000, 5_250, 8_000, 8_000]
            .map(Amount::euros);
        assert_eq!(revenue.iter().copied().sum::<Amount>(), Amount::euros(60_000));

        let profit = plan.monthly_profit_year1(&revenue);
        assert_eq!(profit[0], Amount::euros(-1_400));
        assert_eq!(profit[4], Amount::ZERO);
        assert_eq!(plan.self_sufficiency_month(&revenue), Some(5));
    }

    #[test]
    fn test_never_self_sufficient() {
        let plan = CostPlan {
            fixed: vec![CostCategory::new("Fixkosten", Amount::euros(4_000))],
            ..Default::default()
        };
        let revenue = [Amount::euros(3_000); 12];
        assert_eq!(plan.self_sufficiency_month(&revenue), None);
    }

    #[test]
    fn test_summary() {
        let plan = plan();
        let revenue = [Amount::euros(5_000); 12];
        let summary = plan.summarize(&revenue, &[Amount::euros(60_000), Amount::euros(75_000), Amount::ZERO]);

        assert_eq!(summary.variable_cost_share_percent, [dec!(20.00), dec!(20.00), Decimal::ZERO]);
        // 5000 − 1599.90 − 1000
        assert_eq!(summary.monthly_profit_year1[0].value(), dec!(2400.10));
        assert_eq!(summary.self_sufficiency_month, Some(1));
    }
}
