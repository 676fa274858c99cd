//! Capital requirement (Kapitalbedarf)
//!
//! Every category defaults to zero: a category the founder has not filled in
//! yet contributes nothing to the total. This is the stated contract of
//! [`CapitalRequirement::default`], not a side effect of missing data.

use crate::money::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Start-up capital needs by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalRequirement {
    /// Machines, vehicles, IT hardware
    pub equipment: Amount,
    /// Initial stock of goods and materials
    pub goods_materials: Amount,
    /// Shop fitting, renovation, furniture
    pub fixtures: Amount,
    /// Launch marketing (website, opening campaign)
    pub startup_marketing: Amount,
    /// Cash held back for running costs until revenue arrives
    pub working_capital_reserve: Amount,
    /// Number of months of private living costs held as a buffer
    pub living_cost_buffer_months: u32,
    /// Monthly living costs the buffer is sized on
    pub monthly_living_costs: Amount,
}

impl CapitalRequirement {
    /// `buffer_months × monthly_living_costs`
    pub fn living_cost_buffer(&self) -> Amount {
        self.monthly_living_costs
            .times(Decimal::from(self.living_cost_buffer_months))
    }

    /// Capital that is actually spent (investments and launch costs).
    /// The working-capital reserve and the living-cost buffer are held, not spent.
    pub fn investment_total(&self) -> Amount {
        self.equipment + self.goods_materials + self.fixtures + self.startup_marketing
    }

    /// Total capital requirement across all categories
    pub fn total(&self) -> Amount {
        self.investment_total() + self.working_capital_reserve + self.living_cost_buffer()
    }

    /// Category breakdown in presentation order
    pub fn breakdown(&self) -> Vec<(&'static str, Amount)> {
        vec![
            ("equipment", self.equipment),
            ("goods_materials", self.goods_materials),
            ("fixtures", self.fixtures),
            ("startup_marketing", self.startup_marketing),
            ("working_capital_reserve", self.working_capital_reserve),
            ("living_cost_buffer", self.living_cost_buffer()),
        ]
    }
}
