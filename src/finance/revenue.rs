//! Revenue projection (Umsatzplanung)
//!
//! Year 1 is planned month by month per stream; years 2 and 3 carry one
//! annual quantity per stream. Growth figures and the realism check are
//! advisory: they produce warnings and recommendations, never blockers.

use crate::assumptions::{Assumptions, GrowthCeilings, Industry, RevenueBands};
use crate::money::{percent, round_half_up, safe_div, Amount};
use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

pub const MONTHS_IN_YEAR: usize = 12;

/// Kind of revenue stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    Product,
    Service,
    Subscription,
    Project,
    Commission,
    #[default]
    Other,
}

impl StreamKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "product" | "produkt" | "ware" => StreamKind::Product,
            "service" | "dienstleistung" | "hourly" | "stunden" => StreamKind::Service,
            "subscription" | "abo" | "abonnement" => StreamKind::Subscription,
            "project" | "projekt" => StreamKind::Project,
            "commission" | "provision" => StreamKind::Commission,
            _ => StreamKind::Other,
        }
    }
}

/// A single revenue stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueStream {
    pub name: String,
    pub kind: StreamKind,
    pub unit_price: Amount,
    /// Units sold in each month of year 1
    pub monthly_quantities_year1: [Decimal; MONTHS_IN_YEAR],
    /// Units sold over the whole of year 2
    pub quantity_year2: Decimal,
    /// Units sold over the whole of year 3
    pub quantity_year3: Decimal,
}

impl RevenueStream {
    /// Build a stream; year-1 quantities are zero-padded (or truncated) to 12 months
    pub fn new(
        name: &str,
        kind: StreamKind,
        unit_price: Amount,
        monthly_quantities: &[Decimal],
        quantity_year2: Decimal,
        quantity_year3: Decimal,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            unit_price,
            monthly_quantities_year1: pad_months(monthly_quantities),
            quantity_year2,
            quantity_year3,
        }
    }

    /// Revenue of this stream in month `index` (0-based) of year 1
    pub fn month_revenue(&self, index: usize) -> Amount {
        self.monthly_quantities_year1
            .get(index)
            .map(|q| self.unit_price.times(*q))
            .unwrap_or(Amount::ZERO)
    }

    /// Annual revenue of this stream (year 1..=3; other years yield zero)
    pub fn annual_revenue(&self, year: u8) -> Amount {
        match year {
            1 => (0..MONTHS_IN_YEAR).map(|m| self.month_revenue(m)).sum(),
            2 => self.unit_price.times(self.quantity_year2),
            3 => self.unit_price.times(self.quantity_year3),
            _ => Amount::ZERO,
        }
    }
}

/// Zero-pad or truncate to exactly twelve months
pub fn pad_months(values: &[Decimal]) -> [Decimal; MONTHS_IN_YEAR] {
    let mut months = [Decimal::ZERO; MONTHS_IN_YEAR];
    for (slot, value) in months.iter_mut().zip(values.iter()) {
        *slot = *value;
    }
    months
}

/// Revenue per month of year 1, summed across streams. Always 12 entries.
pub fn monthly_revenue_year1(streams: &[RevenueStream]) -> [Amount; MONTHS_IN_YEAR] {
    let mut months = [Amount::ZERO; MONTHS_IN_YEAR];
    for (index, slot) in months.iter_mut().enumerate() {
        *slot = streams.iter().map(|s| s.month_revenue(index)).sum();
    }
    months
}

/// Revenue of a plan year (1..=3) summed across streams
pub fn annual_revenue(streams: &[RevenueStream], year: u8) -> Amount {
    streams.iter().map(|s| s.annual_revenue(year)).sum()
}

/// Year-over-year growth and two-year CAGR, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthRates {
    pub year1_to_year2: Decimal,
    pub year2_to_year3: Decimal,
    pub cagr: Decimal,
}

/// Growth figures for revenues of years 1–3. Zero base years yield zero growth.
pub fn growth_rates(annual: &[Amount; 3]) -> GrowthRates {
    let [r1, r2, r3] = annual.map(Amount::value);

    let growth = |from: Decimal, to: Decimal| percent(to - from, from);

    let cagr = if r1.is_zero() {
        Decimal::ZERO
    } else {
        let multiple = safe_div(r3, r1);
        let root = multiple.sqrt().unwrap_or(Decimal::ONE);
        round_half_up((root - Decimal::ONE) * Decimal::ONE_HUNDRED, 2)
    };

    GrowthRates {
        year1_to_year2: growth(r1, r2),
        year2_to_year3: growth(r2, r3),
        cagr,
    }
}

/// Advisory realism signals for a revenue plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealismAssessment {
    pub industry: Industry,
    /// Growth ceiling applied (percent per year)
    pub growth_ceiling: Decimal,
    pub exceeds_ceiling_year2: bool,
    pub exceeds_ceiling_year3: bool,
    /// Both year-over-year growth figures above 100%
    pub hockey_stick: bool,
    pub revenue_too_low: bool,
    pub revenue_too_high: bool,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RealismAssessment {
    pub fn is_plausible(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Check growth and absolute revenue against industry norms
pub fn assess_realism(
    annual: &[Amount; 3],
    growth: &GrowthRates,
    industry: Industry,
    business_age_months: u32,
    ceilings: &GrowthCeilings,
    bands: &RevenueBands,
) -> RealismAssessment {
    let ceiling = ceilings.ceiling(industry, business_age_months);
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    let exceeds_ceiling_year2 = growth.year1_to_year2 > ceiling;
    let exceeds_ceiling_year3 = growth.year2_to_year3 > ceiling;

    if exceeds_ceiling_year2 {
        warnings.push(format!(
            "Revenue growth from year 1 to year 2 ({}%) exceeds the typical ceiling of {}% for this industry",
            growth.year1_to_year2, ceiling.normalize()
        ));
    }
    if exceeds_ceiling_year3 {
        warnings.push(format!(
            "Revenue growth from year 2 to year 3 ({}%) exceeds the typical ceiling of {}% for this industry",
            growth.year2_to_year3, ceiling.normalize()
        ));
    }
    if exceeds_ceiling_year2 || exceeds_ceiling_year3 {
        recommendations.push(
            "Back the growth assumption with signed contracts, a waiting list or capacity planning".to_string(),
        );
    }

    let hockey_stick = growth.year1_to_year2 > bands.hockey_stick_percent
        && growth.year2_to_year3 > bands.hockey_stick_percent;
    if hockey_stick {
        warnings.push(format!(
            "Hockey-stick pattern: revenue more than doubles twice in a row ({}% and {}%)",
            growth.year1_to_year2, growth.year2_to_year3
        ));
        recommendations.push(
            "Plan a flatter ramp-up; reviewers reject plans that double revenue every year without evidence"
                .to_string(),
        );
    }

    let year1 = annual[0].value();
    let revenue_too_low = year1 < bands.min_sustainable_year1;
    let revenue_too_high = year1 > bands.max_plausible_year1;
    if revenue_too_low {
        warnings.push(format!(
            "First-year revenue of {} € is too low to sustain full-time self-employment (minimum {} €)",
            annual[0], bands.min_sustainable_year1
        ));
        recommendations.push("Check prices and sales volume, or add a further revenue stream".to_string());
    }
    if revenue_too_high {
        warnings.push(format!(
            "First-year revenue of {} € is implausibly high for a business that has not launched yet (above {} €)",
            annual[0], bands.max_plausible_year1
        ));
        recommendations.push("Substantiate first-year sales with letters of intent or pre-orders".to_string());
    }

    RealismAssessment {
        industry,
        growth_ceiling: ceiling,
        exceeds_ceiling_year2,
        exceeds_ceiling_year3,
        hockey_stick,
        revenue_too_low,
        revenue_too_high,
        warnings,
        recommendations,
    }
}

/// Share of one stream in year-1 revenue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamShare {
    pub name: String,
    pub revenue_year1: Amount,
    pub share_percent: Decimal,
}

/// Complete revenue projection for years 1–3
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueProjection {
    pub monthly_year1: [Amount; MONTHS_IN_YEAR],
    pub quarterly_year1: [Amount; 4],
    /// Annual revenue for years 1, 2 and 3
    pub annual: [Amount; 3],
    pub growth: GrowthRates,
    pub stream_shares: Vec<StreamShare>,
    pub realism: RealismAssessment,
}

impl RevenueProjection {
    pub fn project(
        streams: &[RevenueStream],
        industry: Industry,
        business_age_months: u32,
        assumptions: &Assumptions,
    ) -> Self {
        let monthly_year1 = monthly_revenue_year1(streams);
        let annual = [
            monthly_year1.iter().sum(),
            annual_revenue(streams, 2),
            annual_revenue(streams, 3),
        ];
        let growth = growth_rates(&annual);
        let realism = assess_realism(
            &annual,
            &growth,
            industry,
            business_age_months,
            &assumptions.growth,
            &assumptions.revenue_bands,
        );

        let mut quarterly_year1 = [Amount::ZERO; 4];
        for (index, revenue) in monthly_year1.iter().enumerate() {
            quarterly_year1[index / 3] += *revenue;
        }

        let stream_shares = streams
            .iter()
            .map(|s| {
                let revenue_year1 = s.annual_revenue(1);
                StreamShare {
                    name: s.name.clone(),
                    revenue_year1,
                    share_percent: revenue_year1.percent_of(annual[0]),
                }
            })
            .collect();

        debug!(
            "Revenue projection: {} streams, year totals {} / {} / {}",
            streams.len(),
            annual[0],
            annual[1],
            annual[2]
        );

        Self {
            monthly_year1,
            quarterly_year1,
            annual,
            growth,
            stream_shares,
            realism,
        }
    }
}
