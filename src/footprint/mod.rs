//! Personal carbon footprint estimation
//!
//! Four independent linear terms (transport, energy, diet, waste) summed into
//! an annual total in tonnes CO2e.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// t CO2e per km driven
pub const CAR_FACTOR: f64 = 0.0002;
/// t CO2e per hour flown
pub const AIR_FACTOR: f64 = 0.09;
/// t CO2e per kWh
pub const ELECTRICITY_FACTOR: f64 = 0.0007;
/// t CO2e per kg of waste
pub const WASTE_FACTOR: f64 = 0.0012;
/// Diet emissions used when the category is not one of the known five
pub const UNRECOGNIZED_DIET_TONNES: f64 = 3.5;

pub const GLOBAL_AVERAGE_TONNES: f64 = 4.7;
/// Paris Agreement aligned per-person target
pub const TARGET_TONNES: f64 = 2.0;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Dietary pattern used for the diet term
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DietCategory {
    Vegan,
    Vegetarian,
    LightMeat,
    #[default]
    MediumMeat,
    HeavyMeat,
    /// Any other label; kept verbatim for display
    Unrecognized(String),
}

impl DietCategory {
    pub const KNOWN: [DietCategory; 5] = [
        DietCategory::Vegan,
        DietCategory::Vegetarian,
        DietCategory::LightMeat,
        DietCategory::MediumMeat,
        DietCategory::HeavyMeat,
    ];

    /// Annual diet emissions in tonnes
    pub fn annual_tonnes(&self) -> f64 {
        match self {
            DietCategory::Vegan => 1.5,
            DietCategory::Vegetarian => 2.0,
            DietCategory::LightMeat => 3.0,
            DietCategory::MediumMeat => 4.0,
            DietCategory::HeavyMeat => 5.0,
            DietCategory::Unrecognized(_) => UNRECOGNIZED_DIET_TONNES,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DietCategory::Vegan => "Vegan",
            DietCategory::Vegetarian => "Vegetarian",
            DietCategory::LightMeat => "Light Meat",
            DietCategory::MediumMeat => "Medium Meat",
            DietCategory::HeavyMeat => "Heavy Meat",
            DietCategory::Unrecognized(label) => label,
        }
    }

    /// Parse a label, matching case and separators loosely.
    ///
    /// "Medium Meat", "medium meat", "medium-meat" and "medium_meat" are all
    /// the same category. Anything else becomes [`DietCategory::Unrecognized`].
    pub fn parse(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "vegan" => DietCategory::Vegan,
            "vegetarian" => DietCategory::Vegetarian,
            "lightmeat" => DietCategory::LightMeat,
            "mediummeat" => DietCategory::MediumMeat,
            "heavymeat" => DietCategory::HeavyMeat,
            _ => DietCategory::Unrecognized(label.trim().to_string()),
        }
    }
}

impl FromStr for DietCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(DietCategory::parse(s))
    }
}

impl From<String> for DietCategory {
    fn from(label: String) -> Self {
        DietCategory::parse(&label)
    }
}

impl From<DietCategory> for String {
    fn from(diet: DietCategory) -> Self {
        diet.label().to_string()
    }
}

impl fmt::Display for DietCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifestyle figures the footprint is computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifestyleInput {
    pub car_km_per_year: f64,
    pub air_hours_per_year: f64,
    pub electricity_kwh_per_month: f64,
    pub diet: DietCategory,
    pub waste_kg_per_month: f64,
}

impl Default for LifestyleInput {
    fn default() -> Self {
        Self {
            car_km_per_year: 8000.0,
            air_hours_per_year: 10.0,
            electricity_kwh_per_month: 150.0,
            diet: DietCategory::MediumMeat,
            waste_kg_per_month: 20.0,
        }
    }
}

impl LifestyleInput {
    /// Reject negative or non-finite numeric fields
    pub fn validate(&self) -> Result<()> {
        Error::check_non_negative("car_km_per_year", self.car_km_per_year)?;
        Error::check_non_negative("air_hours_per_year", self.air_hours_per_year)?;
        Error::check_non_negative("electricity_kwh_per_month", self.electricity_kwh_per_month)?;
        Error::check_non_negative("waste_kg_per_month", self.waste_kg_per_month)?;
        Ok(())
    }
}

/// Annual footprint split into its four categories, tonnes CO2e
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootprintResult {
    pub transport: f64,
    pub energy: f64,
    pub diet: f64,
    pub waste: f64,
    pub total: f64,
}

/// Footprint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transport,
    Energy,
    Diet,
    Waste,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Transport => "Transport",
            Category::Energy => "Energy",
            Category::Diet => "Diet",
            Category::Waste => "Waste",
        }
    }

    /// Reduction advice for this category
    pub fn recommendation(self) -> &'static str {
        match self {
            Category::Transport => {
                "Reduce air travel where possible; consider virtual meetings or trains for short routes."
            }
            Category::Energy => {
                "Improve home energy efficiency and switch to LED lighting to reduce electricity emissions."
            }
            Category::Diet => "Shift towards a plant-forward diet to lower diet-related emissions.",
            Category::Waste => "Increase recycling and composting to cut waste emissions.",
        }
    }
}

/// One slice of the category breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    /// Tonnes, rounded to two decimals
    pub tonnes: f64,
    /// Percentage of the total, rounded to two decimals
    pub percent: f64,
}

/// How a footprint compares with reference figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub global_average: f64,
    pub target: f64,
    /// Positive when above the global average
    pub versus_global_average: f64,
    /// Positive when above the target
    pub versus_target: f64,
}

impl FootprintResult {
    /// Category values in display order
    pub fn categories(&self) -> [(Category, f64); 4] {
        [
            (Category::Transport, self.transport),
            (Category::Energy, self.energy),
            (Category::Diet, self.diet),
            (Category::Waste, self.waste),
        ]
    }

    /// Category breakdown suitable for a proportional chart
    pub fn breakdown(&self) -> Vec<CategoryShare> {
        self.categories()
            .into_iter()
            .map(|(category, tonnes)| {
                let percent = if self.total > 0.0 {
                    tonnes / self.total * 100.0
                } else {
                    0.0
                };
                CategoryShare {
                    category,
                    tonnes: round2(tonnes),
                    percent: round2(percent),
                }
            })
            .collect()
    }

    pub fn comparison(&self) -> Comparison {
        Comparison {
            global_average: GLOBAL_AVERAGE_TONNES,
            target: TARGET_TONNES,
            versus_global_average: self.total - GLOBAL_AVERAGE_TONNES,
            versus_target: self.total - TARGET_TONNES,
        }
    }

    /// Recommendations ordered by the size of the category they address
    pub fn recommendations(&self) -> Vec<&'static str> {
        let mut categories = self.categories();
        // stable: equal categories keep display order
        categories.sort_by(|a, b| b.1.total_cmp(&a.1));
        categories
            .into_iter()
            .map(|(category, _)| category.recommendation())
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the annual footprint for `input`
pub fn calculate(input: &LifestyleInput) -> Result<FootprintResult> {
    input.validate()?;

    let transport = input.car_km_per_year * CAR_FACTOR + input.air_hours_per_year * AIR_FACTOR;
    let energy = input.electricity_kwh_per_month * MONTHS_PER_YEAR * ELECTRICITY_FACTOR;
    let diet = input.diet.annual_tonnes();
    let waste = input.waste_kg_per_month * MONTHS_PER_YEAR * WASTE_FACTOR;

    Ok(FootprintResult {
        transport,
        energy,
        diet,
        waste,
        total: transport + energy + diet + waste,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_input(diet: DietCategory) -> LifestyleInput {
        LifestyleInput {
            car_km_per_year: 0.0,
            air_hours_per_year: 0.0,
            electricity_kwh_per_month: 0.0,
            diet,
            waste_kg_per_month: 0.0,
        }
    }

    #[test]
    fn test_defaults_match_documented_total() {
        let result = calculate(&LifestyleInput::default()).unwrap();

        assert!((result.transport - 2.5).abs() < 1e-9);
        assert!((result.energy - 1.26).abs() < 1e-9);
        assert_eq!(result.diet, 4.0);
        assert!((result.waste - 0.288).abs() < 1e-9);
        assert!((result.total - 8.048).abs() < 1e-9);
    }

    #[test]
    fn test_total_is_exact_sum() {
        let input = LifestyleInput {
            car_km_per_year: 12_345.6,
            air_hours_per_year: 7.3,
            electricity_kwh_per_month: 321.0,
            diet: DietCategory::LightMeat,
            waste_kg_per_month: 13.7,
        };
        let r = calculate(&input).unwrap();
        assert_eq!(r.total, r.transport + r.energy + r.diet + r.waste);
    }

    #[test]
    fn test_vegan_only() {
        let result = calculate(&zero_input(DietCategory::Vegan)).unwrap();
        assert_eq!(result.total, 1.5);
    }

    #[test]
    fn test_unrecognized_diet_falls_back() {
        let diet = DietCategory::parse("Pescatarian");
        assert_eq!(diet, DietCategory::Unrecognized("Pescatarian".to_string()));
        let result = calculate(&zero_input(diet)).unwrap();
        assert_eq!(result.diet, 3.5);
        assert_eq!(result.total, 3.5);
    }

    #[test]
    fn test_diet_parsing_is_lenient() {
        assert_eq!(DietCategory::parse("Medium Meat"), DietCategory::MediumMeat);
        assert_eq!(DietCategory::parse("medium-meat"), DietCategory::MediumMeat);
        assert_eq!(DietCategory::parse("  HEAVY_MEAT "), DietCategory::HeavyMeat);
        assert_eq!("vegetarian".parse::<DietCategory>().unwrap(), DietCategory::Vegetarian);
    }

    #[test]
    fn test_known_diet_table() {
        let tonnes: Vec<f64> = DietCategory::KNOWN.iter().map(|d| d.annual_tonnes()).collect();
        assert_eq!(tonnes, vec![1.5, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_negative_input_rejected() {
        let input = LifestyleInput {
            waste_kg_per_month: -5.0,
            ..LifestyleInput::default()
        };
        let err = calculate(&input).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("waste_kg_per_month"));
    }

    #[test]
    fn test_breakdown_percentages() {
        let result = calculate(&zero_input(DietCategory::Vegan)).unwrap();
        let shares = result.breakdown();
        assert_eq!(shares.len(), 4);
        assert_eq!(shares[2].category, Category::Diet);
        assert_eq!(shares[2].percent, 100.0);
        assert_eq!(shares[0].percent, 0.0);
    }

    #[test]
    fn test_recommendations_ordered_by_contribution() {
        let result = calculate(&LifestyleInput::default()).unwrap();
        let recs = result.recommendations();
        assert_eq!(recs.len(), 4);
        // diet (4.0) > transport (2.5) > energy (1.26) > waste (0.288)
        assert_eq!(recs[0], Category::Diet.recommendation());
        assert_eq!(recs[1], Category::Transport.recommendation());
        assert_eq!(recs[3], Category::Waste.recommendation());
    }

    #[test]
    fn test_comparison_against_references() {
        let result = calculate(&zero_input(DietCategory::Vegan)).unwrap();
        let cmp = result.comparison();
        assert!((cmp.versus_global_average - (1.5 - 4.7)).abs() < 1e-12);
        assert_eq!(cmp.versus_target, -0.5);
    }

    #[test]
    fn test_diet_serde_uses_labels() {
        let json = serde_json::to_string(&DietCategory::LightMeat).unwrap();
        assert_eq!(json, "\"Light Meat\"");
        let parsed: LifestyleInput =
            serde_json::from_str(r#"{"diet": "vegan", "car_km_per_year": 100}"#).unwrap();
        assert_eq!(parsed.diet, DietCategory::Vegan);
        assert_eq!(parsed.car_km_per_year, 100.0);
        assert_eq!(parsed.waste_kg_per_month, 20.0);
    }
}
