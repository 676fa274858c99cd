//! Planning assumptions: regional, industry, household and compliance tables

pub mod household;
pub mod industry;
pub mod regional;
pub mod rules;

pub use household::{HouseholdBenchmarks, HouseholdType, SustainabilityThresholds};
pub use industry::{GrowthCeilings, Industry, RevenueBands, SeasonalityTable};
pub use regional::{CategorySensitivity, CostOfLivingTable};
pub use rules::{ComplianceRules, SELF_SUFFICIENCY_DEADLINE_MONTH};

/// All assumption tables used by an evaluation
#[derive(Debug, Clone, Default)]
pub struct Assumptions {
    pub cost_of_living: CostOfLivingTable,
    pub sensitivity: CategorySensitivity,
    pub households: HouseholdBenchmarks,
    pub sustainability: SustainabilityThresholds,
    pub growth: GrowthCeilings,
    pub seasonality: SeasonalityTable,
    pub revenue_bands: RevenueBands,
}
