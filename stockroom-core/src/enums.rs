//! Enum types for stockroom records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// ============================================================================
// PRODUCT CATEGORY
// ============================================================================

/// Fixed set of product categories.
///
/// Sub-category variants serialize as `"<parent>-<sub>"`, the form the
/// browser client sends when a product is created from a sub-category page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Category {
    #[serde(rename = "Test and Measurements")]
    TestAndMeasurements,
    #[serde(rename = "Test and Measurements-Power Supplies")]
    PowerSupplies,
    #[serde(rename = "Test and Measurements-Function Generators")]
    FunctionGenerators,
    #[serde(rename = "Test and Measurements-Battery Chargers")]
    BatteryChargers,
    #[serde(rename = "Bio-Medical Instruments")]
    BioMedicalInstruments,
    #[serde(rename = "Defense Product")]
    DefenseProduct,
    #[serde(rename = "ISRO")]
    Isro,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::TestAndMeasurements,
        Category::PowerSupplies,
        Category::FunctionGenerators,
        Category::BatteryChargers,
        Category::BioMedicalInstruments,
        Category::DefenseProduct,
        Category::Isro,
    ];

    /// Wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TestAndMeasurements => "Test and Measurements",
            Category::PowerSupplies => "Test and Measurements-Power Supplies",
            Category::FunctionGenerators => "Test and Measurements-Function Generators",
            Category::BatteryChargers => "Test and Measurements-Battery Chargers",
            Category::BioMedicalInstruments => "Bio-Medical Instruments",
            Category::DefenseProduct => "Defense Product",
            Category::Isro => "ISRO",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .iter()
            .find(|c| c.as_str() == trimmed)
            .copied()
            .ok_or_else(|| {
                ValidationError::invalid(
                    "category",
                    format!(
                        "'{}' is not one of: {}",
                        trimmed,
                        Category::ALL
                            .iter()
                            .map(|c| c.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_display() {
        for category in Category::ALL {
            let parsed: Category = category.to_string().parse().unwrap_or(Category::Isro);
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_category_serde_uses_display_names() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&Category::Isro)?, "\"ISRO\"");
        let c: Category = serde_json::from_str("\"Test and Measurements-Power Supplies\"")?;
        assert_eq!(c, Category::PowerSupplies);
        Ok(())
    }

    #[test]
    fn test_category_parse_trims_and_rejects_unknown() {
        assert_eq!("  ISRO ".parse::<Category>().ok(), Some(Category::Isro));
        assert!("isro".parse::<Category>().is_err());
        assert!("".parse::<Category>().is_err());
    }
}
