//! Founder Finance - Financial planning and liquidity engine for German founder business plans
//!
//! This library provides:
//! - Exact decimal currency arithmetic and locale-tolerant input normalization
//! - Capital requirement, financing structure and loan amortization
//! - Revenue projection with growth realism checks, cost planning and private withdrawals
//! - Month-by-month cash-flow simulation with payment delays and seasonality
//! - Liquidity risk analysis and the compliance gate for grant applications

pub mod assumptions;
pub mod error;
pub mod evaluation;
pub mod finance;
pub mod liquidity;
pub mod money;
pub mod plan;
pub mod projection;

// Re-export commonly used types
pub use assumptions::Assumptions;
pub use error::{PlanError, Result};
pub use evaluation::{evaluate, evaluate_plan, evaluate_scenarios, PlanEvaluation};
pub use money::Amount;
pub use plan::{Plan, PlanInput};
pub use projection::{CashFlowSimulator, SimulationConfig};
