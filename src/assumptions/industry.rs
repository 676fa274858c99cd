//! Industry-keyed planning assumptions
//!
//! Includes growth-rate ceilings for the realism check, seasonal revenue
//! patterns, and absolute sanity bands for first-year revenue

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Industry classification used to key the assumption tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    LocalServices,
    Craft,
    Retail,
    Gastronomy,
    Tourism,
    Consulting,
    Healthcare,
    Creative,
    ECommerce,
    Software,
    #[default]
    Other,
}

impl Industry {
    /// Map a free-text industry tag onto the table key.
    /// Unknown tags fall back to `Other`.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase().replace(['-', ' '], "_");
        match tag.as_str() {
            "local_services" | "services" | "dienstleistung" => Industry::LocalServices,
            "craft" | "handwerk" | "construction" | "bau" => Industry::Craft,
            "retail" | "einzelhandel" | "handel" => Industry::Retail,
            "gastronomy" | "gastronomie" | "restaurant" | "cafe" => Industry::Gastronomy,
            "tourism" | "tourismus" | "hotel" => Industry::Tourism,
            "consulting" | "beratung" => Industry::Consulting,
            "healthcare" | "gesundheit" | "pflege" => Industry::Healthcare,
            "creative" | "kreativ" | "design" | "media" => Industry::Creative,
            "e_commerce" | "ecommerce" | "onlinehandel" => Industry::ECommerce,
            "software" | "saas" | "it" => Industry::Software,
            _ => Industry::Other,
        }
    }
}

/// Maximum plausible year-over-year revenue growth (percent) by industry
#[derive(Debug, Clone)]
pub struct GrowthCeilings {
    ceilings: Vec<(Industry, Decimal)>,
    /// Businesses younger than this many months get the young-business factor
    pub young_business_months: u32,
    /// Multiplier applied to the ceiling for young businesses
    pub young_business_factor: Decimal,
}

impl Default for GrowthCeilings {
    fn default() -> Self {
        Self {
            // Conservative for local services, generous for scalable models
            ceilings: vec![
                (Industry::LocalServices, dec!(25)),
                (Industry::Craft, dec!(30)),
                (Industry::Retail, dec!(35)),
                (Industry::Gastronomy, dec!(30)),
                (Industry::Tourism, dec!(35)),
                (Industry::Consulting, dec!(50)),
                (Industry::Healthcare, dec!(30)),
                (Industry::Creative, dec!(50)),
                (Industry::ECommerce, dec!(150)),
                (Industry::Software, dec!(200)),
                (Industry::Other, dec!(50)),
            ],
            young_business_months: 24,
            young_business_factor: dec!(1.5), // +50% headroom in the first two years
        }
    }
}

impl GrowthCeilings {
    /// Growth ceiling in percent, adjusted upward for young businesses
    pub fn ceiling(&self, industry: Industry, business_age_months: u32) -> Decimal {
        let base = self
            .ceilings
            .iter()
            .find(|(i, _)| *i == industry)
            .map(|(_, c)| *c)
            .unwrap_or(dec!(50));

        if business_age_months < self.young_business_months {
            base * self.young_business_factor
        } else {
            base
        }
    }
}

/// Quarterly revenue multipliers for industries with known seasonal patterns
#[derive(Debug, Clone)]
pub struct SeasonalityTable {
    patterns: Vec<(Industry, [Decimal; 4])>,
}

impl Default for SeasonalityTable {
    fn default() -> Self {
        // Each pattern averages to 1.0 so annual revenue is preserved
        Self {
            patterns: vec![
                (Industry::Gastronomy, [dec!(0.85), dec!(1.05), dec!(1.20), dec!(0.90)]),
                (Industry::Tourism, [dec!(0.60), dec!(1.15), dec!(1.55), dec!(0.70)]),
                (Industry::Retail, [dec!(0.90), dec!(0.95), dec!(0.90), dec!(1.25)]),
                (Industry::Craft, [dec!(0.80), dec!(1.10), dec!(1.15), dec!(0.95)]),
            ],
        }
    }
}

impl SeasonalityTable {
    /// Quarterly multipliers for an industry, `None` when it has no known pattern
    pub fn pattern(&self, industry: Industry) -> Option<[Decimal; 4]> {
        self.patterns
            .iter()
            .find(|(i, _)| *i == industry)
            .map(|(_, p)| *p)
    }
}

/// Absolute sanity bands for first-year revenue (euros)
#[derive(Debug, Clone)]
pub struct RevenueBands {
    /// Below this the business cannot sustain full-time self-employment
    pub min_sustainable_year1: Decimal,
    /// Above this a pre-launch plan is implausible without evidence
    pub max_plausible_year1: Decimal,
    /// Year-over-year growth above this (percent) in both years is a hockey stick
    pub hockey_stick_percent: Decimal,
}

impl Default for RevenueBands {
    fn default() -> Self {
        Self {
            min_sustainable_year1: dec!(20000),
            max_plausible_year1: dec!(500000),
            hockey_stick_percent: dec!(100),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_tags() {
        assert_eq!(Industry::from_tag("Software"), Industry::Software);
        assert_eq!(Industry::from_tag("e-commerce"), Industry::ECommerce);
        assert_eq!(Industry::from_tag("Handwerk"), Industry::Craft);
        assert_eq!(Industry::from_tag("local services"), Industry::LocalServices);
        assert_eq!(Industry::from_tag("space mining"), Industry::Other);
    }

    #[test]
    fn test_growth_ceilings() {
        let table = GrowthCeilings::default();

        // Established business uses the base ceiling
        assert_eq!(table.ceiling(Industry::LocalServices, 36), dec!(25));
        assert_eq!(table.ceiling(Industry::Software, 24), dec!(200));

        // Young business gets 50% more headroom
        assert_eq!(table.ceiling(Industry::LocalServices, 0), dec!(37.5));
        assert_eq!(table.ceiling(Industry::Software, 23), dec!(300));

        // Local services stay far below software
        assert!(table.ceiling(Industry::LocalServices, 0) < table.ceiling(Industry::Software, 0));
    }

    #[test]
    fn test_seasonality_patterns_average_to_one() {
        let table = SeasonalityTable::default();
        for industry in [Industry::Gastronomy, Industry::Tourism, Industry::Retail, Industry::Craft] {
            let pattern = table.pattern(industry).unwrap();
            let sum: Decimal = pattern.iter().sum();
            assert_eq!(sum, dec!(4));
        }
        assert!(table.pattern(Industry::Software).is_none());
    }
}
