//! Liquidity analysis and the compliance gate

pub mod analyzer;
pub mod compliance;

pub use analyzer::LiquidityAnalysis;
pub use compliance::{
    validate, ComplianceFlags, ComplianceIssue, ComplianceResult, IssueCode, Severity, ValidationContext,
};
