//! Private withdrawal (Privatentnahme)
//!
//! The founder's living costs by category, optionally scaled to the local
//! cost of living, plus a savings rate. The result is the constant monthly
//! amount the business has to pay out.

use crate::assumptions::{Assumptions, CategorySensitivity, HouseholdType};
use crate::money::{percent, Amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly living costs by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LivingCosts {
    pub housing: Amount,
    pub food: Amount,
    pub mobility: Amount,
    pub insurance: Amount,
    pub communication: Amount,
    pub other: Amount,
}

impl LivingCosts {
    pub fn subtotal(&self) -> Amount {
        self.housing + self.food + self.mobility + self.insurance + self.communication + self.other
    }

    /// Scale each category by its blended regional factor
    pub fn adjusted_for_region(&self, multiplier: Decimal, sensitivity: &CategorySensitivity) -> Self {
        let scale = |amount: Amount, weight: Decimal| amount.times(CategorySensitivity::factor(multiplier, weight));
        Self {
            housing: scale(self.housing, sensitivity.housing),
            food: scale(self.food, sensitivity.food),
            mobility: scale(self.mobility, sensitivity.mobility),
            insurance: scale(self.insurance, sensitivity.insurance),
            communication: scale(self.communication, sensitivity.communication),
            other: scale(self.other, sensitivity.other),
        }
    }
}

/// Monthly withdrawal with savings on top
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WithdrawalTotal {
    pub subtotal: Amount,
    pub savings: Amount,
    pub monthly: Amount,
    pub annual: Amount,
}

/// Private withdrawal inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivateWithdrawal {
    pub categories: LivingCosts,
    /// Savings on top of living costs, percent of the subtotal
    pub savings_rate_percent: Decimal,
    pub city: Option<String>,
    pub household: HouseholdType,
    /// Net household income, when known, for the expense-to-income check
    pub net_income: Option<Amount>,
    pub apply_regional_adjustment: bool,
}

impl PrivateWithdrawal {
    /// Totals for the given categories and savings rate
    pub fn total_for(categories: &LivingCosts, savings_rate_percent: Decimal) -> WithdrawalTotal {
        let subtotal = categories.subtotal();
        let savings = subtotal.times(savings_rate_percent / Decimal::ONE_HUNDRED);
        let monthly = subtotal + savings;
        WithdrawalTotal {
            subtotal,
            savings,
            monthly,
            annual: monthly.times(Decimal::from(12)),
        }
    }

    /// Totals of the categories as entered
    pub fn total(&self) -> WithdrawalTotal {
        Self::total_for(&self.categories, self.savings_rate_percent)
    }

    /// Categories after the regional adjustment, when enabled
    pub fn effective_categories(&self, assumptions: &Assumptions) -> LivingCosts {
        if !self.apply_regional_adjustment {
            return self.categories;
        }
        let multiplier = assumptions.cost_of_living.multiplier(self.city.as_deref());
        self.categories.adjusted_for_region(multiplier, &assumptions.sensitivity)
    }

    /// Monthly amount paid out of the business
    pub fn monthly_amount(&self, assumptions: &Assumptions) -> Amount {
        Self::total_for(&self.effective_categories(assumptions), self.savings_rate_percent).monthly
    }

    pub fn summarize(&self, assumptions: &Assumptions) -> WithdrawalSummary {
        let multiplier = assumptions.cost_of_living.multiplier(self.city.as_deref());
        let categories = self.effective_categories(assumptions);
        let total = Self::total_for(&categories, self.savings_rate_percent);
        let thresholds = &assumptions.sustainability;

        let mut warnings = Vec::new();
        let housing_ratio = categories.housing.percent_of(total.subtotal);
        let mut sustainability = Sustainability::Sustainable;

        if housing_ratio > thresholds.housing_unsustainable {
            sustainability = sustainability.worst(Sustainability::Unsustainable);
            warnings.push(format!(
                "Housing takes {}% of living costs (more than {}%)",
                housing_ratio, thresholds.housing_unsustainable
            ));
        } else if housing_ratio > thresholds.housing_tight {
            sustainability = sustainability.worst(Sustainability::Tight);
            warnings.push(format!(
                "Housing takes {}% of living costs (more than {}%)",
                housing_ratio, thresholds.housing_tight
            ));
        }

        if self.savings_rate_percent < thresholds.savings_min {
            warnings.push(format!(
                "Savings rate of {}% leaves no room for pension and emergencies (minimum {}%)",
                self.savings_rate_percent.normalize(),
                thresholds.savings_min
            ));
        } else if self.savings_rate_percent > thresholds.savings_max {
            warnings.push(format!(
                "Savings rate of {}% puts unnecessary strain on the business (maximum {}%)",
                self.savings_rate_percent.normalize(),
                thresholds.savings_max
            ));
        }

        let expense_to_income_percent = self
            .net_income
            .filter(|income| income.is_positive())
            .map(|income| total.monthly.percent_of(income));
        if let Some(ratio) = expense_to_income_percent {
            if ratio > thresholds.income_unsustainable {
                sustainability = sustainability.worst(Sustainability::Unsustainable);
                warnings.push(format!("Living costs consume {}% of net income", ratio));
            } else if ratio > thresholds.income_tight {
                sustainability = sustainability.worst(Sustainability::Tight);
                warnings.push(format!("Living costs consume {}% of net income", ratio));
            }
        }

        WithdrawalSummary {
            categories,
            total,
            regional_multiplier: multiplier,
            regional_adjustment_applied: self.apply_regional_adjustment,
            housing_ratio_percent: housing_ratio,
            expense_to_income_percent,
            sustainability,
            benchmark: BenchmarkComparison::compare(total.monthly, self.household, assumptions),
            warnings,
        }
    }
}

/// Classification of a living-cost budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sustainability {
    Sustainable,
    Tight,
    Unsustainable,
}

impl Sustainability {
    fn worst(self, other: Sustainability) -> Sustainability {
        self.max(other)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkPosition {
    Below,
    Average,
    Above,
}

/// Withdrawal compared to the average spending of the household type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    pub household: HouseholdType,
    pub benchmark_monthly: Amount,
    /// Signed deviation from the benchmark in percent
    pub deviation_percent: Decimal,
    pub position: BenchmarkPosition,
}

impl BenchmarkComparison {
    pub fn compare(monthly: Amount, household: HouseholdType, assumptions: &Assumptions) -> Self {
        let benchmark = assumptions.households.average(household);
        let band = assumptions.households.deviation_band_percent;
        let deviation_percent = percent(monthly.value() - benchmark, benchmark);

        let position = if deviation_percent < -band {
            BenchmarkPosition::Below
        } else if deviation_percent > band {
            BenchmarkPosition::Above
        } else {
            BenchmarkPosition::Average
        };

        Self {
            household,
            benchmark_monthly: Amount::new(benchmark),
            deviation_percent,
            position,
        }
    }
}

/// Withdrawal figures reported with an evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithdrawalSummary {
    /// Categories as used for the totals (after any regional adjustment)
    pub categories: LivingCosts,
    pub total: WithdrawalTotal,
    pub regional_multiplier: Decimal,
    pub regional_adjustment_applied: bool,
    pub housing_ratio_percent: Decimal,
    pub expense_to_income_percent: Option<Decimal>,
    pub sustainability: Sustainability,
    pub benchmark: BenchmarkComparison,
    pub warnings: Vec<String>,
}
