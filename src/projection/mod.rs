//! Cash-flow projection engine
//!
//! Simulates the business bank account month by month: delayed customer
//! payments in, operating costs, investments, debt service and the private
//! withdrawal out.

mod cashflows;
mod config;
mod engine;

pub use cashflows::{CashFlowMonth, CashFlowProjection};
pub use config::{PaymentTerms, SimulationConfig, MAX_HORIZON_MONTHS, MIN_HORIZON_MONTHS};
pub use engine::{CashFlowSimulator, SimulationInput, INVESTMENT_SPREAD_MONTHS};
