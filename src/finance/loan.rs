//! Loan amortization
//!
//! Constant monthly debt service from the annuity formula
//! `P·r(1+r)^n / ((1+r)^n − 1)` with `r` the monthly rate. Interest-free loans
//! repay straight-line. Start-up loans may begin with interest-only grace
//! months, after which the annuity runs over the remaining term.

use crate::money::{safe_div, Amount};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

const MONTHS_PER_YEAR: u32 = 12;

/// Terms of a single loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Amount,
    /// Nominal annual interest rate in percent (5 = 5% p.a.)
    pub annual_rate_percent: Decimal,
    pub term_months: u32,
    /// Interest-only months at the start of the term
    #[serde(default)]
    pub grace_months: u32,
}

/// Payment summary of a loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanPayment {
    /// Annuity payment once amortization has started
    pub monthly_payment: Amount,
    pub total_interest: Amount,
    pub total_payments: Amount,
}

/// One month of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Amount,
    pub interest: Amount,
    pub principal: Amount,
    pub remaining_balance: Amount,
}

impl LoanTerms {
    pub fn new(principal: Amount, annual_rate_percent: Decimal, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_months,
            grace_months: 0,
        }
    }

    pub fn with_grace_months(mut self, grace_months: u32) -> Self {
        self.grace_months = grace_months;
        self
    }

    /// Monthly interest rate as a fraction (5% p.a. → 0.0041666…)
    pub fn monthly_rate(&self) -> Decimal {
        self.annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR)
    }

    /// Grace months leave at least the last term month for repayment
    fn effective_grace(&self) -> u32 {
        self.grace_months.min(self.term_months.saturating_sub(1))
    }

    fn amortization_months(&self) -> u32 {
        self.term_months - self.effective_grace()
    }

    /// Interest paid during each grace month
    fn grace_interest(&self) -> Amount {
        self.principal.times(self.monthly_rate())
    }

    /// Monthly payment, total interest and total payments over the term
    pub fn payment(&self) -> LoanPayment {
        if !self.principal.is_positive() || self.term_months == 0 {
            return LoanPayment {
                monthly_payment: Amount::ZERO,
                total_interest: Amount::ZERO,
                total_payments: Amount::ZERO,
            };
        }

        let amortizing = self.amortization_months();
        let monthly_payment = annuity_payment(self.principal, self.annual_rate_percent, amortizing);

        let grace = self.effective_grace();
        let total_payments = monthly_payment.times(Decimal::from(amortizing))
            + self.grace_interest().times(Decimal::from(grace));

        LoanPayment {
            monthly_payment,
            total_interest: total_payments - self.principal,
            total_payments,
        }
    }

    /// Month-by-month breakdown for the first `months_to_compute` months.
    ///
    /// The last term month repays whatever balance is left, so the balance ends
    /// at exactly zero and the principal portions sum to the original principal.
    /// Months after the term produce zero rows.
    pub fn schedule(&self, months_to_compute: u32) -> Vec<ScheduleRow> {
        let rate = self.monthly_rate();
        let grace = self.effective_grace();
        let annuity = self.payment().monthly_payment;
        let mut balance = self.principal.clamp_non_negative();
        let mut rows = Vec::with_capacity(months_to_compute as usize);

        for month in 1..=months_to_compute {
            if month > self.term_months || balance.is_zero() {
                rows.push(ScheduleRow {
                    month,
                    payment: Amount::ZERO,
                    interest: Amount::ZERO,
                    principal: Amount::ZERO,
                    remaining_balance: Amount::ZERO,
                });
                continue;
            }

            let interest = balance.times(rate);
            let (payment, principal) = if month <= grace {
                (interest, Amount::ZERO)
            } else {
                let scheduled_principal = annuity - interest;
                if month == self.term_months || scheduled_principal > balance {
                    (interest + balance, balance)
                } else {
                    (annuity, scheduled_principal)
                }
            };

            balance = (balance - principal).clamp_non_negative();

            rows.push(ScheduleRow {
                month,
                payment,
                interest,
                principal,
                remaining_balance: balance,
            });
        }

        rows
    }

    /// Amount due in a given month of the term (1-based)
    pub fn debt_service_for_month(&self, month: u32) -> Amount {
        if month == 0 || month > self.term_months {
            return Amount::ZERO;
        }
        self.schedule(month)
            .last()
            .map(|row| row.payment)
            .unwrap_or(Amount::ZERO)
    }
}

/// Annuity payment for a fully amortizing loan, rounded half-up to cents.
/// A zero rate falls back to straight-line repayment; a zero term yields zero.
pub fn annuity_payment(principal: Amount, annual_rate_percent: Decimal, term_months: u32) -> Amount {
    if term_months == 0 || !principal.is_positive() {
        return Amount::ZERO;
    }

    let n = Decimal::from(term_months);
    let r = annual_rate_percent / Decimal::ONE_HUNDRED / Decimal::from(MONTHS_PER_YEAR);

    if r.is_zero() {
        return principal.divided_by(n);
    }

    // Past the representable range the factor has converged to `r`
    let Some(growth) = (Decimal::ONE + r).checked_powu(u64::from(term_months)) else {
        return principal.times(r);
    };
    let Some(scaled) = r.checked_mul(growth) else {
        return principal.times(r);
    };
    principal.times(safe_div(scaled, growth - Decimal::ONE))
}

/// Combined monthly debt service of several loans: the sum of each loan's
/// independently computed annuity payment
pub fn aggregate_debt_service(loans: &[LoanTerms]) -> Amount {
    loans.iter().map(|loan| loan.payment().monthly_payment).sum()
}

/// Combined debt service due in a specific plan month, honouring grace
/// periods, final-payment adjustment and loans that have run out
pub fn debt_service_in_month(loans: &[LoanTerms], month: u32) -> Amount {
    loans.iter().map(|loan| loan.debt_service_for_month(month)).sum()
}
