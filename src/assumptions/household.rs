//! Household benchmarks and sustainability thresholds for private withdrawals

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Household type used to pick a spending benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdType {
    #[default]
    Single,
    Partner,
    Family,
}

impl HouseholdType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "partner" | "couple" | "paar" => HouseholdType::Partner,
            "family" | "familie" => HouseholdType::Family,
            _ => HouseholdType::Single,
        }
    }
}

/// Average monthly consumption spending by household type (euros)
#[derive(Debug, Clone)]
pub struct HouseholdBenchmarks {
    averages: Vec<(HouseholdType, Decimal)>,
    /// Deviation (percent) beyond which a withdrawal counts as below/above average
    pub deviation_band_percent: Decimal,
}

impl Default for HouseholdBenchmarks {
    fn default() -> Self {
        Self {
            averages: vec![
                (HouseholdType::Single, dec!(1800)),
                (HouseholdType::Partner, dec!(3000)),
                (HouseholdType::Family, dec!(3900)),
            ],
            deviation_band_percent: dec!(20),
        }
    }
}

impl HouseholdBenchmarks {
    pub fn average(&self, household: HouseholdType) -> Decimal {
        self.averages
            .iter()
            .find(|(h, _)| *h == household)
            .map(|(_, a)| *a)
            .unwrap_or(dec!(1800))
    }
}

/// Ratio thresholds (percent) for classifying a living-cost budget
#[derive(Debug, Clone)]
pub struct SustainabilityThresholds {
    /// Housing share of expenses above this is tight
    pub housing_tight: Decimal,
    /// Housing share of expenses above this is unsustainable
    pub housing_unsustainable: Decimal,
    /// Savings rate below this triggers a warning
    pub savings_min: Decimal,
    /// Savings rate above this triggers a warning
    pub savings_max: Decimal,
    /// Expenses as share of income above this is tight
    pub income_tight: Decimal,
    /// Expenses as share of income above this is unsustainable
    pub income_unsustainable: Decimal,
}

impl Default for SustainabilityThresholds {
    fn default() -> Self {
        Self {
            housing_tight: dec!(40),
            housing_unsustainable: dec!(50),
            savings_min: dec!(5),
            savings_max: dec!(30),
            income_tight: dec!(80),
            income_unsustainable: dec!(90),
        }
    }
}
