use serde::{Deserialize, Serialize};
use std::fmt;

use super::nutrients::NutrientTotals;

/// A food as returned by the food database.
///
/// Meal entries hold a copy of this value, taken at logging time. Later
/// edits to the food database never retroactively alter historical totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub serving_size: String,
    /// Nutrient values for one serving.
    pub nutrients: NutrientTotals,
}

impl FoodItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        serving_size: impl Into<String>,
        nutrients: NutrientTotals,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            serving_size: serving_size.into(),
            nutrients,
        }
    }
}

impl fmt::Display for FoodItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.category, self.serving_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_item_display() {
        let food = FoodItem::new(
            "173944",
            "Banana",
            "Fruits",
            "1 medium",
            NutrientTotals::default(),
        );
        assert_eq!(format!("{}", food), "Banana (Fruits, 1 medium)");
    }

    #[test]
    fn test_food_item_json_uses_camel_case() {
        let food = FoodItem::new("1", "Rice", "Grains", "100g", NutrientTotals::default());
        let json = serde_json::to_string(&food).unwrap();
        assert!(json.contains("\"servingSize\""));

        let parsed: FoodItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, food);
    }
}
