//! Cash-flow rows and projection result

use crate::error::Result;
use crate::money::Amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;

const CSV_HEADER: [&str; 12] = [
    "month",
    "period",
    "beginning_cash",
    "revenue_generated",
    "revenue_inflow",
    "financing_inflow",
    "operating_outflow",
    "investment_outflow",
    "debt_service_outflow",
    "private_withdrawal",
    "net_cash_flow",
    "ending_cash",
];

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowMonth {
    /// Plan month, 1-based
    pub month: u32,
    /// First day of the calendar month, when a start date is configured
    pub period: Option<NaiveDate>,
    pub beginning_cash: Amount,
    /// Revenue earned this month (after seasonality, before payment delay)
    pub revenue_generated: Amount,
    /// Customer payments received this month
    pub revenue_inflow: Amount,
    /// Financing recognized this month (memo; already part of the opening balance)
    pub financing_inflow: Amount,
    pub operating_outflow: Amount,
    pub investment_outflow: Amount,
    pub debt_service_outflow: Amount,
    pub private_withdrawal: Amount,
    pub net_cash_flow: Amount,
    pub ending_cash: Amount,
}

impl CashFlowMonth {
    pub fn total_outflow(&self) -> Amount {
        self.operating_outflow + self.investment_outflow + self.debt_service_outflow + self.private_withdrawal
    }
}

/// Result of a cash-flow simulation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowProjection {
    pub months: Vec<CashFlowMonth>,
    pub minimum_cash: Amount,
    /// First month in which `minimum_cash` occurs
    pub minimum_cash_month: u32,
    pub customer_delay_months: u32,
    pub variable_delay_months: u32,
    /// Quarterly multipliers applied to generated revenue
    pub seasonal_multipliers: Option<[Decimal; 4]>,
    /// Spread between strongest and weakest quarter relative to the mean, in percent
    pub seasonal_swing_percent: Decimal,
}

impl CashFlowProjection {
    pub fn horizon(&self) -> u32 {
        self.months.len() as u32
    }

    pub fn ending_balances(&self) -> impl Iterator<Item = Amount> + '_ {
        self.months.iter().map(|m| m.ending_cash)
    }

    pub fn has_negative_liquidity(&self) -> bool {
        self.minimum_cash.is_negative()
    }

    pub fn negative_months(&self) -> Vec<u32> {
        self.months
            .iter()
            .filter(|m| m.ending_cash.is_negative())
            .map(|m| m.month)
            .collect()
    }

    pub fn total_revenue_inflow(&self) -> Amount {
        self.months.iter().map(|m| m.revenue_inflow).sum()
    }

    pub fn total_operating_outflow(&self) -> Amount {
        self.months.iter().map(|m| m.operating_outflow).sum()
    }

    pub fn ending_cash(&self) -> Amount {
        self.months.last().map(|m| m.ending_cash).unwrap_or(Amount::ZERO)
    }

    /// Write one CSV row per month; periods as `YYYY-MM`, amounts at cent scale
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(CSV_HEADER)?;
        for m in &self.months {
            csv.write_record([
                m.month.to_string(),
                m.period.map(|p| p.format("%Y-%m").to_string()).unwrap_or_default(),
                m.beginning_cash.to_string(),
                m.revenue_generated.to_string(),
                m.revenue_inflow.to_string(),
                m.financing_inflow.to_string(),
                m.operating_outflow.to_string(),
                m.investment_outflow.to_string(),
                m.debt_service_outflow.to_string(),
                m.private_withdrawal.to_string(),
                m.net_cash_flow.to_string(),
                m.ending_cash.to_string(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_export() {
        let month = CashFlowMonth {
            month: 1,
            period: NaiveDate::from_ymd_opt(2027, 3, 1),
            beginning_cash: Amount::euros(10_000),
            revenue_generated: Amount::euros(2_000),
            revenue_inflow: Amount::ZERO,
            financing_inflow: Amount::euros(10_000),
            operating_outflow: Amount::euros(1_500),
            investment_outflow: Amount::ZERO,
            debt_service_outflow: Amount::ZERO,
            private_withdrawal: Amount::euros(1_000),
            net_cash_flow: Amount::euros(-2_500),
            ending_cash: Amount::euros(7_500),
        };
        let projection = CashFlowProjection {
            months: vec![month],
            minimum_cash: Amount::euros(7_500),
            minimum_cash_month: 1,
            customer_delay_months: 2,
            variable_delay_months: 0,
            seasonal_multipliers: None,
            seasonal_swing_percent: Decimal::ZERO,
        };

        let mut out = Vec::new();
        projection.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("month,period,beginning_cash"));
        assert_eq!(
            lines[1],
            "1,2027-03,10000.00,2000.00,0.00,10000.00,1500.00,0.00,0.00,1000.00,-2500.00,7500.00"
        );
    }
}
