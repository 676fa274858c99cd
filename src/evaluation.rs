//! Plan evaluation pipeline
//!
//! Runs every component in dependency order and bundles the results:
//! normalization, capital, financing, loans, revenue, costs and withdrawal,
//! then the cash-flow simulation, the liquidity analysis and the export gate.

use crate::assumptions::Assumptions;
use crate::finance::{
    aggregate_debt_service, CostSummary, FinancingStructure, LoanPayment, LoanTerms,
    RevenueProjection, WithdrawalSummary,
};
use crate::liquidity::{validate, ComplianceResult, LiquidityAnalysis, ValidationContext};
use crate::money::Amount;
use crate::plan::{InputIssue, Plan, PlanInput};
use crate::projection::{CashFlowProjection, CashFlowSimulator, SimulationConfig, SimulationInput};
use log::info;
use rayon::prelude::*;
use serde::Serialize;

/// Payment figures of one loan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanSummary {
    pub label: String,
    pub terms: LoanTerms,
    pub payment: LoanPayment,
}

/// Everything the document layer needs from one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanEvaluation {
    pub capital_requirement: Amount,
    pub capital_breakdown: Vec<(&'static str, Amount)>,
    pub financing: FinancingStructure,
    pub loans: Vec<LoanSummary>,
    pub monthly_debt_service: Amount,
    pub revenue: RevenueProjection,
    pub costs: CostSummary,
    pub withdrawal: WithdrawalSummary,
    /// Self-sufficiency month used for the deadline check: derived from the
    /// revenue and cost projection, pushed back by a later stated month
    pub self_sufficiency_month: Option<u32>,
    /// Month the founder stated, reported as given
    pub stated_self_sufficiency_month: Option<u32>,
    pub cash_flow: CashFlowProjection,
    pub liquidity: LiquidityAnalysis,
    pub compliance: ComplianceResult,
    pub input_issues: Vec<InputIssue>,
}

impl PlanEvaluation {
    pub fn is_export_ready(&self) -> bool {
        self.compliance.is_export_ready
    }
}

/// Normalize raw input and evaluate it with the default assumption tables
pub fn evaluate(input: &PlanInput, config: &SimulationConfig) -> PlanEvaluation {
    let (plan, issues) = input.normalize();
    let mut evaluation = evaluate_plan(&plan, config, &Assumptions::default());
    evaluation.input_issues = issues;
    evaluation
}

/// Evaluate a normalized plan
pub fn evaluate_plan(plan: &Plan, config: &SimulationConfig, assumptions: &Assumptions) -> PlanEvaluation {
    let capital_requirement = plan.capital.total();
    let financing = FinancingStructure::calculate(&plan.financing_sources, capital_requirement);

    let loans: Vec<LoanSummary> = plan
        .financing_sources
        .iter()
        .filter_map(|source| {
            source.loan_terms().map(|terms| LoanSummary {
                label: source.label.clone(),
                payment: terms.payment(),
                terms,
            })
        })
        .collect();
    let loan_terms: Vec<LoanTerms> = loans.iter().map(|loan| loan.terms.clone()).collect();

    let revenue = RevenueProjection::project(
        &plan.revenue_streams,
        plan.industry,
        plan.business_age_months,
        assumptions,
    );
    let costs = plan.costs.summarize(&revenue.monthly_year1, &revenue.annual);
    let withdrawal = plan.withdrawal.summarize(assumptions);

    let self_sufficiency_month = gated_self_sufficiency_month(costs.self_sufficiency_month, plan.self_sufficiency_month);

    let variable_cost_shares = [1u8, 2, 3].map(|year| {
        plan.costs
            .variable_cost_share(year, revenue.annual[usize::from(year - 1)])
    });

    let simulation_input = SimulationInput {
        total_financing: financing.total_financing,
        investment_total: plan.capital.investment_total(),
        monthly_revenue_year1: revenue.monthly_year1,
        annual_revenue: revenue.annual,
        fixed_costs_monthly: plan.costs.fixed_monthly(),
        variable_cost_shares,
        loans: loan_terms.clone(),
        private_withdrawal_monthly: withdrawal.total.monthly,
        payment_terms: plan.payment_terms.clone(),
        seasonality: plan.seasonality.resolve(plan.industry, &assumptions.seasonality),
    };
    let cash_flow = CashFlowSimulator::new(config.clone()).simulate(&simulation_input);

    let liquidity = LiquidityAnalysis::analyze(&cash_flow, &config.rules);
    let context = ValidationContext {
        self_sufficiency_month,
        seasonal_swing_percent: cash_flow.seasonal_swing_percent,
        financing_gap: financing.financing_gap,
    };
    let compliance = validate(&liquidity, &context, &config.rules);

    info!(
        "Evaluated plan: capital {} / financing {}, minimum cash {} in month {}, {} blocker(s), {} warning(s)",
        capital_requirement,
        financing.total_financing,
        liquidity.minimum_cash,
        liquidity.minimum_cash_month,
        compliance.blockers.len(),
        compliance.warnings.len()
    );

    PlanEvaluation {
        capital_requirement,
        capital_breakdown: plan.capital.breakdown(),
        financing,
        monthly_debt_service: aggregate_debt_service(&loan_terms),
        loans,
        revenue,
        costs,
        withdrawal,
        self_sufficiency_month,
        stated_self_sufficiency_month: plan.self_sufficiency_month,
        cash_flow,
        liquidity,
        compliance,
        input_issues: Vec::new(),
    }
}

/// The month the deadline is checked against. A stated month can only move
/// it later; it never stands in for a projection that is not self-sufficient.
fn gated_self_sufficiency_month(derived: Option<u32>, stated: Option<u32>) -> Option<u32> {
    derived.map(|month| stated.map_or(month, |s| s.max(month)))
}

/// Evaluate several what-if plans in parallel; results keep the input order
pub fn evaluate_scenarios(inputs: &[PlanInput], config: &SimulationConfig) -> Vec<PlanEvaluation> {
    inputs.par_iter().map(|input| evaluate(input, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liquidity::IssueCode;
    use crate::money::AMOUNT_LIMIT;
    use rust_decimal_macros::dec;

    const HEALTHY: &str = r#"{
        "capital": {
            "equipment": 15000, "goods_materials": 5000, "fixtures": 8000, "startup_marketing": 3200,
            "working_capital_reserve": 10000, "living_cost_buffer_months": 4, "monthly_living_costs": 1750
        },
        "financing_sources": [
            {"kind": "equity", "label": "Ersparnisse", "amount": 35000, "status": "approved"},
            {"kind": "bank_loan", "label": "Hausbank", "amount": 20000, "interest_rate": 5, "term_months": 60}
        ],
        "withdrawal": {"housing": 800, "food": 400, "mobility": 200, "insurance": 250, "communication": 50, "other": 100},
        "revenue_streams": [{
            "name": "Beratung", "kind": "service", "unit_price": 100,
            "monthly_quantities": [40, 45, 50, 60, 70, 80, 90, 100, 110, 115, 120, 125],
            "quantity_year2": 1300, "quantity_year3": 1500
        }],
        "industry": "consulting",
        "costs": {"fixed": [{"name": "Miete und Nebenkosten", "monthly": 3000}], "variable_year1": 20100}
    }"#;

    const UNDERFUNDED: &str = r#"{
        "capital": {"equipment": 40000, "working_capital_reserve": 20000},
        "financing_sources": [{"kind": "equity", "label": "Ersparnisse", "amount": 25000}],
        "withdrawal": {"housing": 900, "food": 500, "other": 600},
        "revenue_streams": [{
            "name": "Laden", "unit_price": 3000,
            "monthly_quantities": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            "quantity_year2": 12, "quantity_year3": 12
        }],
        "costs": {"fixed": [{"name": "Fixkosten", "monthly": 4000}]}
    }"#;

    fn input(json: &str) -> PlanInput {
        PlanInput::from_json(json).unwrap()
    }

    #[test]
    fn test_healthy_plan() {
        let evaluation = evaluate(&input(HEALTHY), &SimulationConfig::default());

        assert_eq!(evaluation.capital_requirement, Amount::euros(48_200));
        assert_eq!(evaluation.financing.total_financing, Amount::euros(55_000));
        assert_eq!(evaluation.financing.secured_total, Amount::euros(35_000));
        assert_eq!(evaluation.monthly_debt_service.value(), dec!(377.42));
        assert_eq!(evaluation.revenue.annual[0], Amount::euros(100_500));
        assert_eq!(evaluation.withdrawal.total.monthly, Amount::euros(1_800));

        assert!(!evaluation.liquidity.has_negative_liquidity);
        assert_eq!(evaluation.liquidity.minimum_cash.value(), dec!(8335.48));
        assert_eq!(evaluation.liquidity.minimum_cash_month, 6);

        // 4000 − 3000 − 800 ≥ 0 already in month 1
        assert_eq!(evaluation.self_sufficiency_month, Some(1));
        assert!(evaluation.is_export_ready());
        assert!(evaluation.input_issues.is_empty());
    }

    #[test]
    fn test_underfunded_plan() {
        let evaluation = evaluate(&input(UNDERFUNDED), &SimulationConfig::default());

        assert_eq!(evaluation.capital_requirement, Amount::euros(60_000));
        assert_eq!(evaluation.financing.financing_gap, Amount::euros(35_000));
        assert_eq!(evaluation.revenue.annual[0], Amount::euros(36_000));
        assert_eq!(evaluation.costs.fixed_annual, Amount::euros(48_000));

        assert!(evaluation.liquidity.has_negative_liquidity);
        assert!(evaluation.compliance.has_issue(IssueCode::NegativeLiquidity));
        assert!(evaluation.compliance.has_issue(IssueCode::SelfSufficiencyDeadline));
        assert!(evaluation.compliance.has_issue(IssueCode::FinancingGap));
        assert!(!evaluation.is_export_ready());
    }

    #[test]
    fn test_later_stated_month_tightens_deadline() {
        let mut plan_input = input(HEALTHY);
        plan_input.self_sufficiency_month = Some(7i64.into());
        let evaluation = evaluate(&plan_input, &SimulationConfig::default());

        assert_eq!(evaluation.self_sufficiency_month, Some(7));
        assert_eq!(evaluation.stated_self_sufficiency_month, Some(7));
        assert!(!evaluation.is_export_ready());
        assert!(evaluation.compliance.blockers[0].message.contains("month 7"));
    }

    #[test]
    fn test_stated_month_cannot_relax_deadline() {
        // €1,000 revenue against €3,000 fixed costs: never profitable
        let mut plan_input = input(
            r#"{
                "financing_sources": [{"kind": "equity", "label": "Ersparnisse", "amount": 100000}],
                "revenue_streams": [{
                    "name": "Laden", "unit_price": 1000,
                    "monthly_quantities": [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
                    "quantity_year2": 12, "quantity_year3": 12
                }],
                "costs": {"fixed": [{"name": "Fixkosten", "monthly": 3000}]}
            }"#,
        );
        let config = SimulationConfig::default();

        let derived = evaluate(&plan_input, &config);
        assert_eq!(derived.self_sufficiency_month, None);
        assert!(!derived.is_export_ready());

        plan_input.self_sufficiency_month = Some(2i64.into());
        let stated = evaluate(&plan_input, &config);
        assert_eq!(stated.stated_self_sufficiency_month, Some(2));
        assert_eq!(stated.self_sufficiency_month, None);
        assert!(stated.compliance.has_issue(IssueCode::SelfSufficiencyDeadline));
        assert!(!stated.is_export_ready());

        // A derived month stays in force against an earlier statement
        assert_eq!(gated_self_sufficiency_month(Some(4), Some(2)), Some(4));
        assert_eq!(gated_self_sufficiency_month(Some(4), None), Some(4));
        assert_eq!(gated_self_sufficiency_month(None, Some(2)), None);
    }

    #[test]
    fn test_oversized_values_degrade_gracefully() {
        let mut plan_input = input(HEALTHY);
        plan_input.revenue_streams[0].unit_price = Some("100000000000000000000".into());
        plan_input.revenue_streams[0].monthly_quantities = vec![10_000_000_000i64.into()];
        let evaluation = evaluate(&plan_input, &SimulationConfig::default());

        assert_eq!(evaluation.input_issues.len(), 1);
        assert_eq!(evaluation.input_issues[0].field, "revenue_streams[0].unit_price");
        assert_eq!(evaluation.revenue.monthly_year1[0], Amount::ZERO);

        // Within the input limit, products beyond the amount range saturate
        let mut plan_input = input(HEALTHY);
        plan_input.revenue_streams[0].unit_price = Some(1_000_000_000_000i64.into());
        plan_input.revenue_streams[0].quantity_year2 = Some(1_000_000_000_000i64.into());
        let evaluation = evaluate(&plan_input, &SimulationConfig::with_months(36));

        assert!(evaluation.input_issues.is_empty());
        assert_eq!(evaluation.revenue.annual[1].value(), AMOUNT_LIMIT);
        assert_eq!(evaluation.cash_flow.months.len(), 36);
    }

    #[test]
    fn test_input_issues_are_reported() {
        let mut plan_input = input(HEALTHY);
        plan_input.capital.fixtures = Some("acht".into());
        let evaluation = evaluate(&plan_input, &SimulationConfig::default());

        assert_eq!(evaluation.input_issues.len(), 1);
        assert_eq!(evaluation.input_issues[0].field, "capital.fixtures");
        assert_eq!(evaluation.capital_requirement, Amount::euros(40_200));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let plan_input = input(HEALTHY);
        let config = SimulationConfig::with_months(36);
        assert_eq!(evaluate(&plan_input, &config), evaluate(&plan_input, &config));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut inputs = vec![input(HEALTHY), input(UNDERFUNDED)];
        for equity in [15_000i64, 25_000, 40_000] {
            let mut scenario = input(UNDERFUNDED);
            scenario.financing_sources[0].amount = Some(equity.into());
            inputs.push(scenario);
        }
        let config = SimulationConfig::with_months(24);

        let parallel = evaluate_scenarios(&inputs, &config);
        let sequential: Vec<PlanEvaluation> = inputs.iter().map(|i| evaluate(i, &config)).collect();

        assert_eq!(parallel.len(), inputs.len());
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_sample_plans() {
        let config = SimulationConfig::default();

        let healthy = evaluate(&input(include_str!("../data/healthy_plan.json")), &config);
        assert!(healthy.input_issues.is_empty());
        assert_eq!(healthy.capital_requirement, Amount::euros(48_200));
        assert_eq!(healthy.liquidity.minimum_cash.value(), dec!(8335.48));
        assert!(healthy.is_export_ready());

        let underfunded = evaluate(&input(include_str!("../data/underfunded_plan.json")), &config);
        assert!(underfunded.input_issues.is_empty());
        assert_eq!(underfunded.capital_requirement, Amount::euros(60_000));
        assert_eq!(underfunded.withdrawal.total.monthly, Amount::euros(2_000));
        assert!(underfunded.liquidity.has_negative_liquidity);
        assert!(!underfunded.is_export_ready());

        let cafe = evaluate(&input(include_str!("../data/seasonal_cafe_plan.json")), &config);
        assert!(cafe.input_issues.is_empty());
        assert!(cafe.cash_flow.seasonal_multipliers.is_some());
        assert!(cafe.compliance.has_issue(IssueCode::SeasonalSwing));
    }

    #[test]
    fn test_evaluation_serializes() {
        let evaluation = evaluate(&input(HEALTHY), &SimulationConfig::default());
        let json = serde_json::to_value(&evaluation).unwrap();

        assert_eq!(json["capital_requirement"], "48200.00");
        assert_eq!(json["compliance"]["is_export_ready"], true);
        assert_eq!(json["cash_flow"]["months"].as_array().unwrap().len(), 12);
    }
}
