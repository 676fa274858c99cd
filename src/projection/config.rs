//! Simulation settings and payment timing

use crate::assumptions::ComplianceRules;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_HORIZON_MONTHS: u32 = 12;
pub const MAX_HORIZON_MONTHS: u32 = 36;

/// Days per month used to turn payment terms into whole-month delays
const DAYS_PER_MONTH: u32 = 30;

/// Configuration for a cash-flow simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of months to simulate (clamped to 12..=36)
    #[serde(default = "default_months")]
    pub months: u32,

    /// Calendar start of month 1; enables calendar periods and
    /// calendar-quarter seasonality
    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub rules: ComplianceRules,
}

fn default_months() -> u32 { 12 }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            months: 12,
            start_date: None,
            rules: ComplianceRules::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_months(months: u32) -> Self {
        Self {
            months,
            ..Default::default()
        }
    }

    /// Simulated months after clamping
    pub fn horizon(&self) -> u32 {
        self.months.clamp(MIN_HORIZON_MONTHS, MAX_HORIZON_MONTHS)
    }
}

/// When customers pay and when suppliers get paid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerms {
    #[serde(default = "default_customer_payment_days")]
    pub customer_payment_days: u32,

    #[serde(default)]
    pub supplier_payment_days: u32,

    /// Explicit delay in months for variable costs; overrides `supplier_payment_days`
    #[serde(default)]
    pub variable_cost_payment_delay: Option<u32>,
}

fn default_customer_payment_days() -> u32 { 45 }

impl Default for PaymentTerms {
    fn default() -> Self {
        Self {
            customer_payment_days: 45,     // typical B2B invoice term
            supplier_payment_days: 0,      // suppliers paid on delivery
            variable_cost_payment_delay: None,
        }
    }
}

impl PaymentTerms {
    /// `ceil(customer_payment_days / 30)`
    pub fn customer_delay_months(&self) -> u32 {
        self.customer_payment_days.div_ceil(DAYS_PER_MONTH)
    }

    /// Explicit variable-cost delay, else `ceil(supplier_payment_days / 30)`
    pub fn variable_delay_months(&self) -> u32 {
        self.variable_cost_payment_delay
            .unwrap_or_else(|| self.supplier_payment_days.div_ceil(DAYS_PER_MONTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizon_is_clamped() {
        assert_eq!(SimulationConfig::with_months(6).horizon(), 12);
        assert_eq!(SimulationConfig::with_months(24).horizon(), 24);
        assert_eq!(SimulationConfig::with_months(60).horizon(), 36);
    }

    #[test]
    fn test_payment_delays() {
        let terms = PaymentTerms::default();
        assert_eq!(terms.customer_delay_months(), 2);
        assert_eq!(terms.variable_delay_months(), 0);

        let terms = PaymentTerms {
            customer_payment_days: 30,
            supplier_payment_days: 14,
            variable_cost_payment_delay: None,
        };
        assert_eq!(terms.customer_delay_months(), 1);
        assert_eq!(terms.variable_delay_months(), 1);

        let terms = PaymentTerms {
            variable_cost_payment_delay: Some(0),
            ..terms
        };
        assert_eq!(terms.variable_delay_months(), 0);
    }

    #[test]
    fn test_config_from_json() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"months": 24, "start_date": "2027-04-01"}"#).unwrap();
        assert_eq!(config.horizon(), 24);
        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2027, 4, 1));
        assert_eq!(config.rules, ComplianceRules::default());
    }
}
