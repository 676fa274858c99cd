//! Regional cost-of-living assumptions
//!
//! A city-keyed multiplier scales the national baseline of living costs.
//! Each expense category reacts to it differently: rent follows the local
//! market fully, groceries and transport only partly, insurance and phone
//! contracts are priced nationally.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Cost-of-living multipliers by city (1.0 = national average)
#[derive(Debug, Clone)]
pub struct CostOfLivingTable {
    multipliers: Vec<(&'static str, Decimal)>,
}

impl Default for CostOfLivingTable {
    fn default() -> Self {
        // Keys are normalized: lowercase, umlauts transliterated
        Self {
            multipliers: vec![
                ("muenchen", dec!(1.35)),
                ("frankfurt", dec!(1.25)),
                ("hamburg", dec!(1.20)),
                ("stuttgart", dec!(1.20)),
                ("duesseldorf", dec!(1.15)),
                ("koeln", dec!(1.15)),
                ("berlin", dec!(1.10)),
                ("bonn", dec!(1.05)),
                ("hannover", dec!(1.00)),
                ("nuernberg", dec!(1.00)),
                ("bremen", dec!(0.98)),
                ("dortmund", dec!(0.95)),
                ("essen", dec!(0.95)),
                ("dresden", dec!(0.92)),
                ("leipzig", dec!(0.90)),
                ("rostock", dec!(0.90)),
                ("erfurt", dec!(0.88)),
                ("magdeburg", dec!(0.85)),
                ("chemnitz", dec!(0.82)),
            ],
        }
    }
}

impl CostOfLivingTable {
    /// Multiplier for a city; unknown or missing cities use the national average
    pub fn multiplier(&self, city: Option<&str>) -> Decimal {
        let Some(city) = city else {
            return Decimal::ONE;
        };
        let key = normalize_city(city);
        self.multipliers
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, m)| *m)
            .unwrap_or(Decimal::ONE)
    }
}

/// Lowercase, transliterate umlauts and map common English names
fn normalize_city(city: &str) -> String {
    let key = city
        .trim()
        .to_lowercase()
        .replace('ä', "ae")
        .replace('ö', "oe")
        .replace('ü', "ue")
        .replace('ß', "ss");

    match key.as_str() {
        "munich" => "muenchen".to_string(),
        "cologne" => "koeln".to_string(),
        "nuremberg" => "nuernberg".to_string(),
        "frankfurt am main" | "frankfurt/main" => "frankfurt".to_string(),
        _ => key,
    }
}

/// How strongly each living-cost category follows the regional multiplier
/// (1.0 = fully, 0.0 = nationally uniform)
#[derive(Debug, Clone)]
pub struct CategorySensitivity {
    pub housing: Decimal,
    pub food: Decimal,
    pub mobility: Decimal,
    pub insurance: Decimal,
    pub communication: Decimal,
    pub other: Decimal,
}

impl Default for CategorySensitivity {
    fn default() -> Self {
        Self {
            housing: dec!(1.0),       // rent tracks the local market
            food: dec!(0.5),
            mobility: dec!(0.6),
            insurance: dec!(0.0),     // national tariffs
            communication: dec!(0.0), // national tariffs
            other: dec!(0.7),
        }
    }
}

impl CategorySensitivity {
    /// Blended factor `1 + (multiplier − 1) × weight`
    pub fn factor(multiplier: Decimal, weight: Decimal) -> Decimal {
        Decimal::ONE + (multiplier - Decimal::ONE) * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_lookup() {
        let table = CostOfLivingTable::default();

        assert_eq!(table.multiplier(Some("München")), dec!(1.35));
        assert_eq!(table.multiplier(Some("munich")), dec!(1.35));
        assert_eq!(table.multiplier(Some("  Köln ")), dec!(1.15));
        assert_eq!(table.multiplier(Some("Leipzig")), dec!(0.90));

        // Unknown and missing cities use the national average
        assert_eq!(table.multiplier(Some("Kleinkleckersdorf")), Decimal::ONE);
        assert_eq!(table.multiplier(None), Decimal::ONE);
    }

    #[test]
    fn test_blended_factor() {
        // Munich food: 1 + 0.35 × 0.5
        assert_eq!(CategorySensitivity::factor(dec!(1.35), dec!(0.5)), dec!(1.175));
        // Uniform categories never move
        assert_eq!(CategorySensitivity::factor(dec!(1.35), dec!(0.0)), Decimal::ONE);
        // Cheaper regions scale down
        assert_eq!(CategorySensitivity::factor(dec!(0.90), dec!(0.6)), dec!(0.94));
    }
}
