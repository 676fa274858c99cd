//! Caller-facing plan input
//!
//! Every field is optional and every number is a [`RawNumber`], so a plan
//! that is still being collected can be evaluated at any time. A field that
//! cannot be normalized falls back to zero (or its default) and is reported
//! as an [`InputIssue`]; it never aborts the evaluation.

use super::{Plan, Seasonality};
use crate::assumptions::{HouseholdType, Industry};
use crate::error::PlanError;
use crate::finance::{
    CapitalRequirement, CostCategory, CostPlan, FinancingKind, FinancingSource, FinancingStatus, LivingCosts,
    PrivateWithdrawal, RevenueStream, StreamKind,
};
use crate::money::{
    normalize_amount, normalize_count, normalize_decimal, normalize_fixed, normalize_non_negative, Amount, RawNumber,
};
use crate::projection::PaymentTerms;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A field that could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIssue {
    /// Path of the field, e.g. `financing_sources[0].amount`
    pub field: String,
    pub reason: String,
}

impl From<PlanError> for InputIssue {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::InvalidInput { field, reason } => Self { field, reason },
            other => Self {
                field: String::new(),
                reason: other.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapitalInput {
    pub equipment: Option<RawNumber>,
    pub goods_materials: Option<RawNumber>,
    pub fixtures: Option<RawNumber>,
    pub startup_marketing: Option<RawNumber>,
    pub working_capital_reserve: Option<RawNumber>,
    pub living_cost_buffer_months: Option<RawNumber>,
    pub monthly_living_costs: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingSourceInput {
    pub kind: String,
    pub label: String,
    pub amount: Option<RawNumber>,
    /// Annual interest rate in percent
    pub interest_rate: Option<RawNumber>,
    pub term_months: Option<RawNumber>,
    pub grace_months: Option<RawNumber>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WithdrawalInput {
    pub housing: Option<RawNumber>,
    pub food: Option<RawNumber>,
    pub mobility: Option<RawNumber>,
    pub insurance: Option<RawNumber>,
    pub communication: Option<RawNumber>,
    pub other: Option<RawNumber>,
    /// Percent of living costs saved on top
    pub savings_rate: Option<RawNumber>,
    pub city: Option<String>,
    pub household: Option<String>,
    pub net_income: Option<RawNumber>,
    pub apply_regional_adjustment: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueStreamInput {
    pub name: String,
    pub kind: Option<String>,
    pub unit_price: Option<RawNumber>,
    pub monthly_quantities: Vec<RawNumber>,
    pub quantity_year2: Option<RawNumber>,
    pub quantity_year3: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostCategoryInput {
    pub name: String,
    pub monthly: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInput {
    pub fixed: Vec<CostCategoryInput>,
    pub variable_year1: Option<RawNumber>,
    pub variable_year2: Option<RawNumber>,
    pub variable_year3: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentTermsInput {
    pub customer_payment_days: Option<RawNumber>,
    pub supplier_payment_days: Option<RawNumber>,
    pub variable_cost_payment_delay: Option<RawNumber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalityInput {
    /// Four quarterly multipliers
    pub quarterly: Option<Vec<RawNumber>>,
    pub use_industry_default: Option<bool>,
}

/// Plan data as supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanInput {
    pub capital: CapitalInput,
    pub financing_sources: Vec<FinancingSourceInput>,
    pub withdrawal: WithdrawalInput,
    pub revenue_streams: Vec<RevenueStreamInput>,
    pub industry: Option<String>,
    pub business_age_months: Option<RawNumber>,
    pub costs: CostInput,
    pub payment_terms: Option<PaymentTermsInput>,
    pub seasonality: Option<SeasonalityInput>,
    pub self_sufficiency_month: Option<RawNumber>,
}

impl PlanInput {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Normalize into a [`Plan`], collecting every field that had to fall back
    pub fn normalize(&self) -> (Plan, Vec<InputIssue>) {
        let mut n = Normalizer::default();

        let capital = self.normalize_capital(&mut n);
        let financing_sources = self
            .financing_sources
            .iter()
            .enumerate()
            .map(|(i, source)| normalize_source(&mut n, &format!("financing_sources[{}]", i), source))
            .collect();
        let withdrawal = normalize_withdrawal(&mut n, &self.withdrawal);
        let revenue_streams = self
            .revenue_streams
            .iter()
            .enumerate()
            .map(|(i, stream)| normalize_stream(&mut n, &format!("revenue_streams[{}]", i), stream))
            .collect();
        let costs = normalize_costs(&mut n, &self.costs);

        let payment_terms = match &self.payment_terms {
            Some(terms) => normalize_payment_terms(&mut n, terms),
            None => PaymentTerms::default(),
        };
        let seasonality = match &self.seasonality {
            Some(seasonality) => normalize_seasonality(&mut n, seasonality),
            None => Seasonality::default(),
        };

        let plan = Plan {
            capital,
            financing_sources,
            withdrawal,
            revenue_streams,
            industry: self.industry.as_deref().map(Industry::from_tag).unwrap_or_default(),
            business_age_months: n.count("business_age_months", &self.business_age_months),
            costs,
            payment_terms,
            seasonality,
            self_sufficiency_month: n.optional_count("self_sufficiency_month", &self.self_sufficiency_month),
        };

        (plan, n.issues)
    }

    fn normalize_capital(&self, n: &mut Normalizer) -> CapitalRequirement {
        let c = &self.capital;
        CapitalRequirement {
            equipment: n.amount("capital.equipment", &c.equipment),
            goods_materials: n.amount("capital.goods_materials", &c.goods_materials),
            fixtures: n.amount("capital.fixtures", &c.fixtures),
            startup_marketing: n.amount("capital.startup_marketing", &c.startup_marketing),
            working_capital_reserve: n.amount("capital.working_capital_reserve", &c.working_capital_reserve),
            living_cost_buffer_months: n.count("capital.living_cost_buffer_months", &c.living_cost_buffer_months),
            monthly_living_costs: n.amount("capital.monthly_living_costs", &c.monthly_living_costs),
        }
    }
}

fn normalize_source(n: &mut Normalizer, path: &str, input: &FinancingSourceInput) -> FinancingSource {
    FinancingSource {
        kind: FinancingKind::from_tag(&input.kind),
        label: input.label.clone(),
        amount: n.amount(&format!("{}.amount", path), &input.amount),
        interest_rate: n.optional_non_negative(&format!("{}.interest_rate", path), &input.interest_rate),
        term_months: n.optional_count(&format!("{}.term_months", path), &input.term_months),
        grace_months: n.optional_count(&format!("{}.grace_months", path), &input.grace_months),
        status: input
            .status
            .as_deref()
            .map(FinancingStatus::from_tag)
            .unwrap_or_default(),
    }
}

fn normalize_withdrawal(n: &mut Normalizer, input: &WithdrawalInput) -> PrivateWithdrawal {
    PrivateWithdrawal {
        categories: LivingCosts {
            housing: n.amount("withdrawal.housing", &input.housing),
            food: n.amount("withdrawal.food", &input.food),
            mobility: n.amount("withdrawal.mobility", &input.mobility),
            insurance: n.amount("withdrawal.insurance", &input.insurance),
            communication: n.amount("withdrawal.communication", &input.communication),
            other: n.amount("withdrawal.other", &input.other),
        },
        savings_rate_percent: n.non_negative("withdrawal.savings_rate", &input.savings_rate),
        city: input.city.clone(),
        household: input
            .household
            .as_deref()
            .map(HouseholdType::from_tag)
            .unwrap_or_default(),
        net_income: n.optional_amount("withdrawal.net_income", &input.net_income),
        apply_regional_adjustment: input.apply_regional_adjustment,
    }
}

fn normalize_stream(n: &mut Normalizer, path: &str, input: &RevenueStreamInput) -> RevenueStream {
    let quantities: Vec<Decimal> = input
        .monthly_quantities
        .iter()
        .enumerate()
        .map(|(i, raw)| n.non_negative(&format!("{}.monthly_quantities[{}]", path, i), &Some(raw.clone())))
        .collect();

    RevenueStream::new(
        &input.name,
        input.kind.as_deref().map(StreamKind::from_tag).unwrap_or_default(),
        n.amount(&format!("{}.unit_price", path), &input.unit_price),
        &quantities,
        n.non_negative(&format!("{}.quantity_year2", path), &input.quantity_year2),
        n.non_negative(&format!("{}.quantity_year3", path), &input.quantity_year3),
    )
}

fn normalize_costs(n: &mut Normalizer, input: &CostInput) -> CostPlan {
    let fixed = input
        .fixed
        .iter()
        .enumerate()
        .map(|(i, category)| {
            CostCategory::new(
                &category.name,
                n.amount(&format!("costs.fixed[{}].monthly", i), &category.monthly),
            )
        })
        .collect();

    CostPlan {
        fixed,
        variable_annual: [
            n.amount("costs.variable_year1", &input.variable_year1),
            n.amount("costs.variable_year2", &input.variable_year2),
            n.amount("costs.variable_year3", &input.variable_year3),
        ],
    }
}

fn normalize_payment_terms(n: &mut Normalizer, input: &PaymentTermsInput) -> PaymentTerms {
    let defaults = PaymentTerms::default();
    PaymentTerms {
        customer_payment_days: n
            .optional_count("payment_terms.customer_payment_days", &input.customer_payment_days)
            .unwrap_or(defaults.customer_payment_days),
        supplier_payment_days: n
            .optional_count("payment_terms.supplier_payment_days", &input.supplier_payment_days)
            .unwrap_or(defaults.supplier_payment_days),
        variable_cost_payment_delay: n.optional_count(
            "payment_terms.variable_cost_payment_delay",
            &input.variable_cost_payment_delay,
        ),
    }
}

fn normalize_seasonality(n: &mut Normalizer, input: &SeasonalityInput) -> Seasonality {
    let quarterly = input
        .quarterly
        .as_ref()
        .and_then(|values| match normalize_fixed::<4>("seasonality.quarterly", values) {
            Ok(multipliers) => Some(multipliers),
            Err(err) => {
                n.record(err);
                None
            }
        });

    Seasonality {
        quarterly,
        use_industry_default: input.use_industry_default.unwrap_or(true),
    }
}

/// Collects issues while turning raw values into domain values
#[derive(Default)]
struct Normalizer {
    issues: Vec<InputIssue>,
}

impl Normalizer {
    fn record(&mut self, err: PlanError) {
        warn!("Input normalization fell back to default: {}", err);
        self.issues.push(err.into());
    }

    fn amount(&mut self, field: &str, raw: &Option<RawNumber>) -> Amount {
        self.optional_amount(field, raw).unwrap_or(Amount::ZERO)
    }

    fn optional_amount(&mut self, field: &str, raw: &Option<RawNumber>) -> Option<Amount> {
        let raw = raw.as_ref()?;
        match normalize_amount(field, raw) {
            Ok(amount) => Some(amount),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    fn non_negative(&mut self, field: &str, raw: &Option<RawNumber>) -> Decimal {
        self.optional_non_negative(field, raw).unwrap_or(Decimal::ZERO)
    }

    fn optional_non_negative(&mut self, field: &str, raw: &Option<RawNumber>) -> Option<Decimal> {
        let raw = raw.as_ref()?;
        match normalize_non_negative(field, raw) {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    fn count(&mut self, field: &str, raw: &Option<RawNumber>) -> u32 {
        self.optional_count(field, raw).unwrap_or(0)
    }

    fn optional_count(&mut self, field: &str, raw: &Option<RawNumber>) -> Option<u32> {
        let raw = raw.as_ref()?;
        match normalize_count(field, raw) {
            Ok(value) => Some(value),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }
}

/// Parse a decimal the way plan fields are parsed; used by the binaries for flags
pub fn parse_decimal(field: &str, text: &str) -> crate::Result<Decimal> {
    normalize_decimal(field, &RawNumber::from(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const PLAN_JSON: &str = r#"{
        "capital": {
            "equipment": "15.000 €",
            "goods_materials": 5000,
            "fixtures": "8000",
            "startup_marketing": "3.200,00",
            "working_capital_reserve": 10000,
            "living_cost_buffer_months": 4,
            "monthly_living_costs": "1,750.00"
        },
        "financing_sources": [
            {"kind": "equity", "label": "Ersparnisse", "amount": "35.000", "status": "zugesagt"},
            {"kind": "bank_loan", "label": "Hausbank", "amount": 20000, "interest_rate": "5,0 %", "term_months": 60}
        ],
        "withdrawal": {"housing": 800, "food": 400, "other": 600, "savings_rate": "0"},
        "revenue_streams": [
            {"name": "Beratung", "kind": "service", "unit_price": "100", "monthly_quantities": [40, 45, "50"],
             "quantity_year2": 1300, "quantity_year3": "1.500"}
        ],
        "industry": "Beratung",
        "costs": {"fixed": [{"name": "Miete", "monthly": "3.000"}], "variable_year1": 2700}
    }"#;

    #[test]
    fn test_normalize_full_plan() {
        let input = PlanInput::from_json(PLAN_JSON).unwrap();
        let (plan, issues) = input.normalize();

        assert!(issues.is_empty(), "unexpected issues: {:?}", issues);
        assert_eq!(plan.capital.total(), Amount::euros(48_200));
        assert_eq!(plan.financing_sources.len(), 2);
        assert_eq!(plan.financing_sources[0].status, FinancingStatus::Approved);
        assert_eq!(plan.financing_sources[1].interest_rate, Some(dec!(5.0)));
        assert_eq!(plan.financing_sources[1].term_months, Some(60));
        assert_eq!(plan.withdrawal.total().monthly, Amount::euros(1_800));
        assert_eq!(plan.revenue_streams[0].monthly_quantities_year1[2], dec!(50));
        assert_eq!(plan.revenue_streams[0].monthly_quantities_year1[3], Decimal::ZERO);
        assert_eq!(plan.revenue_streams[0].quantity_year3, dec!(1500));
        assert_eq!(plan.industry, Industry::Consulting);
        assert_eq!(plan.costs.fixed_monthly(), Amount::euros(3_000));
        assert_eq!(plan.payment_terms, PaymentTerms::default());
        assert_eq!(plan.self_sufficiency_month, None);
    }

    #[test]
    fn test_empty_input_normalizes_to_defaults() {
        let (plan, issues) = PlanInput::from_json("{}").unwrap().normalize();
        assert!(issues.is_empty());
        assert_eq!(plan, Plan::default());
    }

    #[test]
    fn test_garbage_falls_back_to_zero() {
        let input = PlanInput::from_json(
            r#"{
                "capital": {"equipment": "viel Geld", "fixtures": 2000},
                "financing_sources": [{"kind": "equity", "amount": -500}],
                "self_sufficiency_month": "5,5"
            }"#,
        )
        .unwrap();
        let (plan, issues) = input.normalize();

        assert_eq!(plan.capital.equipment, Amount::ZERO);
        assert_eq!(plan.capital.fixtures, Amount::euros(2_000));
        assert_eq!(plan.financing_sources[0].amount, Amount::ZERO);
        assert_eq!(plan.self_sufficiency_month, None);

        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["capital.equipment", "financing_sources[0].amount", "self_sufficiency_month"]
        );
    }

    #[test]
    fn test_payment_terms_override() {
        let input = PlanInput::from_json(
            r#"{"payment_terms": {"customer_payment_days": "14", "variable_cost_payment_delay": 1}}"#,
        )
        .unwrap();
        let (plan, _) = input.normalize();

        assert_eq!(plan.payment_terms.customer_delay_months(), 1);
        assert_eq!(plan.payment_terms.supplier_payment_days, 0);
        assert_eq!(plan.payment_terms.variable_delay_months(), 1);
    }

    #[test]
    fn test_seasonality_needs_four_quarters() {
        let input = PlanInput::from_json(r#"{"seasonality": {"quarterly": [1, 1, 1]}}"#).unwrap();
        let (plan, issues) = input.normalize();

        assert_eq!(plan.seasonality.quarterly, None);
        assert_eq!(issues[0].field, "seasonality.quarterly");

        let input =
            PlanInput::from_json(r#"{"seasonality": {"quarterly": ["0,9", 1.1, 1, 1], "use_industry_default": false}}"#)
                .unwrap();
        let (plan, issues) = input.normalize();
        assert!(issues.is_empty());
        assert_eq!(plan.seasonality.quarterly, Some([dec!(0.9), dec!(1.1), dec!(1), dec!(1)]));
        assert!(!plan.seasonality.use_industry_default);
    }
}
