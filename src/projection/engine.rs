//! Month-by-month cash-flow simulation

use super::cashflows::{CashFlowMonth, CashFlowProjection};
use super::config::{PaymentTerms, SimulationConfig};
use crate::finance::loan::{debt_service_in_month, LoanTerms};
use crate::finance::revenue::MONTHS_IN_YEAR;
use crate::money::{round_half_up, safe_div, Amount};
use chrono::{Datelike, Months, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

/// Investment spending is spread over the first months of the plan
pub const INVESTMENT_SPREAD_MONTHS: u32 = 3;

/// Everything the simulator needs, already normalized and aggregated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationInput {
    /// Opening balance of month 1
    pub total_financing: Amount,
    /// Capital actually spent on investments and launch costs
    pub investment_total: Amount,
    pub monthly_revenue_year1: [Amount; MONTHS_IN_YEAR],
    /// Annual revenue of years 1–3
    pub annual_revenue: [Amount; 3],
    pub fixed_costs_monthly: Amount,
    /// Variable costs as a fraction of revenue, per plan year
    pub variable_cost_shares: [Decimal; 3],
    pub loans: Vec<LoanTerms>,
    pub private_withdrawal_monthly: Amount,
    pub payment_terms: PaymentTerms,
    /// Quarterly revenue multipliers (Q1..Q4)
    pub seasonality: Option<[Decimal; 4]>,
}

/// Cash-flow simulator
pub struct CashFlowSimulator {
    config: SimulationConfig,
}

impl CashFlowSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run the simulation. Pure: identical inputs give identical output.
    pub fn simulate(&self, input: &SimulationInput) -> CashFlowProjection {
        let horizon = self.config.horizon();
        let customer_delay = input.payment_terms.customer_delay_months();
        let variable_delay = input.payment_terms.variable_delay_months();
        let start = self.config.start_date.and_then(first_of_month);

        let periods: Vec<Option<NaiveDate>> = (1..=horizon)
            .map(|m| start.and_then(|s| s.checked_add_months(Months::new(m - 1))))
            .collect();

        // Revenue earned per month, seasonality applied
        let generated: Vec<Amount> = (1..=horizon)
            .map(|m| {
                let base = base_revenue(input, m);
                match input.seasonality {
                    Some(multipliers) => {
                        let quarter = quarter_index(m, periods[(m - 1) as usize]);
                        base.times(multipliers[quarter])
                    }
                    None => base,
                }
            })
            .collect();

        // Customer payments arrive `customer_delay` months later
        let inflows: Vec<Amount> = (1..=horizon)
            .map(|m| shifted(&generated, m, customer_delay))
            .collect();

        let investment_per_month = input
            .investment_total
            .divided_by(Decimal::from(INVESTMENT_SPREAD_MONTHS));

        let mut months = Vec::with_capacity(horizon as usize);
        let mut beginning_cash = input.total_financing;
        let mut minimum_cash = Amount::ZERO;
        let mut minimum_cash_month = 0;

        for m in 1..=horizon {
            let index = (m - 1) as usize;
            let revenue_inflow = inflows[index];

            let variable_outflow = if m > variable_delay {
                let source_month = m - variable_delay;
                let share = input.variable_cost_shares[plan_year_index(source_month)];
                inflows[(source_month - 1) as usize].times(share)
            } else {
                Amount::ZERO
            };
            let operating_outflow = input.fixed_costs_monthly + variable_outflow;

            let investment_outflow = match m {
                m if m < INVESTMENT_SPREAD_MONTHS => investment_per_month,
                INVESTMENT_SPREAD_MONTHS => {
                    input.investment_total
                        - investment_per_month.times(Decimal::from(INVESTMENT_SPREAD_MONTHS - 1))
                }
                _ => Amount::ZERO,
            };

            let debt_service_outflow = debt_service_in_month(&input.loans, m);
            let private_withdrawal = input.private_withdrawal_monthly;

            let net_cash_flow = revenue_inflow
                - operating_outflow
                - investment_outflow
                - debt_service_outflow
                - private_withdrawal;
            let ending_cash = beginning_cash + net_cash_flow;

            if m == 1 || ending_cash < minimum_cash {
                minimum_cash = ending_cash;
                minimum_cash_month = m;
            }

            months.push(CashFlowMonth {
                month: m,
                period: periods[index],
                beginning_cash,
                revenue_generated: generated[index],
                revenue_inflow,
                financing_inflow: if m == 1 { input.total_financing } else { Amount::ZERO },
                operating_outflow,
                investment_outflow,
                debt_service_outflow,
                private_withdrawal,
                net_cash_flow,
                ending_cash,
            });

            beginning_cash = ending_cash;
        }

        let seasonal_swing_percent = input.seasonality.map(swing_percent).unwrap_or(Decimal::ZERO);

        debug!(
            "Simulated {} months: minimum cash {} in month {}, ending cash {}",
            horizon, minimum_cash, minimum_cash_month, beginning_cash
        );

        CashFlowProjection {
            months,
            minimum_cash,
            minimum_cash_month,
            customer_delay_months: customer_delay,
            variable_delay_months: variable_delay,
            seasonal_multipliers: input.seasonality,
            seasonal_swing_percent,
        }
    }
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// 0-based plan year of a 1-based plan month, capped at year 3
fn plan_year_index(month: u32) -> usize {
    (((month - 1) / MONTHS_IN_YEAR as u32) as usize).min(2)
}

/// Quarter (0..=3) from the calendar month if known, else from the plan month
fn quarter_index(month: u32, period: Option<NaiveDate>) -> usize {
    let month0 = match period {
        Some(date) => date.month0(),
        None => (month - 1) % MONTHS_IN_YEAR as u32,
    };
    (month0 / 3) as usize
}

/// Revenue before seasonality. Year 1 uses the monthly plan; later years
/// split the annual figure evenly with the residue in the twelfth month.
fn base_revenue(input: &SimulationInput, month: u32) -> Amount {
    let year = plan_year_index(month);
    if year == 0 {
        return input.monthly_revenue_year1[(month - 1) as usize];
    }
    let annual = input.annual_revenue[year];
    let per_month = annual.divided_by(Decimal::from(MONTHS_IN_YEAR as u32));
    if (month - 1) % MONTHS_IN_YEAR as u32 == MONTHS_IN_YEAR as u32 - 1 {
        annual - per_month.times(Decimal::from(MONTHS_IN_YEAR as u32 - 1))
    } else {
        per_month
    }
}

/// Value of `series` at month `m − delay`; zero before month 1
fn shifted(series: &[Amount], month: u32, delay: u32) -> Amount {
    if month <= delay {
        return Amount::ZERO;
    }
    series
        .get((month - delay - 1) as usize)
        .copied()
        .unwrap_or(Amount::ZERO)
}

/// `(max − min) / mean × 100` over the quarterly multipliers
fn swing_percent(multipliers: [Decimal; 4]) -> Decimal {
    let max = multipliers.iter().copied().fold(Decimal::MIN, Decimal::max);
    let min = multipliers.iter().copied().fold(Decimal::MAX, Decimal::min);
    let mean = multipliers.iter().copied().sum::<Decimal>() / Decimal::from(4);
    round_half_up(safe_div(max - min, mean) * Decimal::ONE_HUNDRED, 2)
}
