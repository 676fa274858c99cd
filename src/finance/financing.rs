//! Financing structure (Finanzierungsplan)
//!
//! Sources are classified as equity-like (own funds, grants, silent
//! participations, crowdfunding) or debt-like (loans, family money, other).

use super::loan::LoanTerms;
use crate::money::{percent, Amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of financing source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FinancingKind {
    Equity,
    Grant,
    BankLoan,
    SubsidizedLoan,
    Participation,
    Crowdfunding,
    FriendsFamily,
    #[default]
    Other,
}

impl FinancingKind {
    /// Equity-classified kinds; everything else counts as debt
    pub fn is_equity(self) -> bool {
        matches!(
            self,
            FinancingKind::Equity
                | FinancingKind::Grant
                | FinancingKind::Participation
                | FinancingKind::Crowdfunding
        )
    }

    pub fn is_debt(self) -> bool {
        !self.is_equity()
    }

    /// Map a free-text tag; unknown tags become `Other`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "equity" | "eigenkapital" | "own_funds" => FinancingKind::Equity,
            "grant" | "zuschuss" | "foerderung" => FinancingKind::Grant,
            "bank_loan" | "bankkredit" | "loan" => FinancingKind::BankLoan,
            "subsidized_loan" | "foerderkredit" | "kfw" => FinancingKind::SubsidizedLoan,
            "participation" | "beteiligung" => FinancingKind::Participation,
            "crowdfunding" => FinancingKind::Crowdfunding,
            "friends_family" | "family" | "privatdarlehen" => FinancingKind::FriendsFamily,
            _ => FinancingKind::Other,
        }
    }
}

/// How far a source has progressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FinancingStatus {
    #[default]
    Planned,
    Applied,
    Approved,
}

impl FinancingStatus {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "applied" | "beantragt" => FinancingStatus::Applied,
            "approved" | "confirmed" | "zugesagt" | "bewilligt" => FinancingStatus::Approved,
            _ => FinancingStatus::Planned,
        }
    }
}

/// One financing source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingSource {
    pub kind: FinancingKind,
    pub label: String,
    pub amount: Amount,
    /// Annual interest rate in percent
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
    #[serde(default)]
    pub term_months: Option<u32>,
    #[serde(default)]
    pub grace_months: Option<u32>,
    #[serde(default)]
    pub status: FinancingStatus,
}

impl FinancingSource {
    pub fn new(kind: FinancingKind, label: &str, amount: Amount) -> Self {
        Self {
            kind,
            label: label.to_string(),
            amount,
            interest_rate: None,
            term_months: None,
            grace_months: None,
            status: FinancingStatus::Planned,
        }
    }

    /// Debt source with a repayment term and rate
    pub fn loan(kind: FinancingKind, label: &str, amount: Amount, rate: Decimal, term_months: u32) -> Self {
        Self {
            interest_rate: Some(rate),
            term_months: Some(term_months),
            ..Self::new(kind, label, amount)
        }
    }

    /// Repayment terms, for debt sources with a positive term.
    /// A missing rate means interest-free.
    pub fn loan_terms(&self) -> Option<LoanTerms> {
        if !self.kind.is_debt() || !self.amount.is_positive() {
            return None;
        }
        let term = self.term_months.filter(|t| *t > 0)?;
        Some(
            LoanTerms::new(self.amount, self.interest_rate.unwrap_or(Decimal::ZERO), term)
                .with_grace_months(self.grace_months.unwrap_or(0)),
        )
    }
}

/// Aggregated view of all financing sources against the capital requirement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancingStructure {
    pub capital_requirement: Amount,
    pub equity_total: Amount,
    pub debt_total: Amount,
    pub total_financing: Amount,
    pub equity_percent: Decimal,
    pub debt_percent: Decimal,
    /// Capital requirement − total financing (positive = shortfall, negative = surplus)
    pub financing_gap: Amount,
    /// Sum of approved sources
    pub secured_total: Amount,
}

impl FinancingStructure {
    /// Always returns a structure, also for an empty source list
    pub fn calculate(sources: &[FinancingSource], capital_requirement: Amount) -> Self {
        let equity_total: Amount = sources
            .iter()
            .filter(|s| s.kind.is_equity())
            .map(|s| s.amount)
            .sum();
        let debt_total: Amount = sources
            .iter()
            .filter(|s| s.kind.is_debt())
            .map(|s| s.amount)
            .sum();
        let secured_total: Amount = sources
            .iter()
            .filter(|s| s.status == FinancingStatus::Approved)
            .map(|s| s.amount)
            .sum();
        let total_financing = equity_total + debt_total;

        Self {
            capital_requirement,
            equity_total,
            debt_total,
            total_financing,
            equity_percent: percent(equity_total.value(), total_financing.value()),
            debt_percent: percent(debt_total.value(), total_financing.value()),
            financing_gap: capital_requirement - total_financing,
            secured_total,
        }
    }

    pub fn has_shortfall(&self) -> bool {
        self.financing_gap.is_positive()
    }
}
