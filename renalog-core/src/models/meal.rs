use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::food::FoodItem;
use super::nutrients::NutrientTotals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "breakfast"),
            MealType::Lunch => write!(f, "lunch"),
            MealType::Dinner => write!(f, "dinner"),
            MealType::Snack => write!(f, "snack"),
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(format!(
                "Invalid meal type '{}'. Valid options: breakfast, lunch, dinner, snack",
                s
            )),
        }
    }
}

/// One logged meal.
///
/// The `nutrients` field holds the quantity-scaled, integer-rounded
/// contribution of this entry, computed once at creation. Daily totals
/// accumulate these stored values, never re-derive them, so deleting an
/// entry subtracts exactly what logging it added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub id: String,
    /// Snapshot of the food at logging time, not a live reference.
    pub food_item: FoodItem,
    pub quantity: f64,
    pub nutrients: NutrientTotals,
    pub meal_type: MealType,
    pub timestamp: DateTime<Utc>,
}

impl MealEntry {
    pub fn new(
        food_item: FoodItem,
        quantity: f64,
        meal_type: MealType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let nutrients = food_item.nutrients.scaled(quantity).rounded();
        Self {
            id: generate_meal_id(timestamp),
            food_item,
            quantity,
            nutrients,
            meal_type,
            timestamp,
        }
    }
}

impl fmt::Display for MealEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} ({}) - {} kcal",
            self.food_item.name, self.quantity, self.meal_type, self.nutrients.calories
        )
    }
}

/// Client-side entry id: creation time in milliseconds plus a random suffix.
fn generate_meal_id(timestamp: DateTime<Utc>) -> String {
    let suffix: u32 = rand::rng().random();
    format!("{}-{:08x}", timestamp.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn banana() -> FoodItem {
        FoodItem::new(
            "173944",
            "Banana",
            "Fruits",
            "1 medium",
            NutrientTotals {
                sodium: 1.0,
                potassium: 422.0,
                phosphorus: 26.0,
                protein: 1.3,
                calories: 105.0,
                fiber: 3.1,
                sugar: 14.4,
                fat: 0.4,
            },
        )
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_nutrients_scaled_and_rounded_at_creation() {
        let entry = MealEntry::new(banana(), 2.0, MealType::Snack, ts());

        assert_eq!(entry.nutrients.potassium, 844.0);
        // 1.3 g * 2 = 2.6 g, rounded once at creation
        assert_eq!(entry.nutrients.protein, 3.0);
        assert_eq!(entry.nutrients.sugar, 29.0);
    }

    #[test]
    fn test_meal_id_embeds_timestamp_and_is_unique() {
        let a = MealEntry::new(banana(), 1.0, MealType::Breakfast, ts());
        let b = MealEntry::new(banana(), 1.0, MealType::Breakfast, ts());

        assert!(a.id.starts_with(&ts().timestamp_millis().to_string()));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_food_snapshot_is_copied() {
        let mut food = banana();
        let entry = MealEntry::new(food.clone(), 1.0, MealType::Lunch, ts());

        food.nutrients.sodium = 999.0;
        assert_eq!(entry.food_item.nutrients.sodium, 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let entry = MealEntry::new(banana(), 1.5, MealType::Dinner, ts());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"mealType\":\"dinner\""));
        assert!(json.contains("\"foodItem\""));

        let parsed: MealEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
