//! Business-plan finance components
//!
//! Each component is a pure calculation over founder-supplied data and can be
//! used on its own; [`crate::evaluation`] wires them together.

pub mod capital;
pub mod costs;
pub mod financing;
pub mod loan;
pub mod revenue;
pub mod withdrawal;

pub use capital::CapitalRequirement;
pub use costs::{CostCategory, CostPlan, CostSummary};
pub use financing::{FinancingKind, FinancingSource, FinancingStatus, FinancingStructure};
pub use loan::{aggregate_debt_service, annuity_payment, debt_service_in_month, LoanPayment, LoanTerms, ScheduleRow};
pub use revenue::{
    annual_revenue, growth_rates, monthly_revenue_year1, GrowthRates, RealismAssessment, RevenueProjection,
    RevenueStream, StreamKind,
};
pub use withdrawal::{
    BenchmarkComparison, BenchmarkPosition, LivingCosts, PrivateWithdrawal, Sustainability, WithdrawalSummary,
    WithdrawalTotal,
};
