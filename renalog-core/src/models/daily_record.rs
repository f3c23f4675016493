use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::meal::MealEntry;
use super::nutrients::{Nutrient, NutrientTotals};

/// The per-date nutrient ledger: accumulated totals plus the meal list
/// they were accumulated from, in logging order.
///
/// Totals are flattened alongside `date` and `meals` on the wire, matching
/// the document service's field layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub totals: NutrientTotals,
    #[serde(default)]
    pub meals: Vec<MealEntry>,
}

impl DailyRecord {
    /// A record with zero totals and no meals, for dates never logged to.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            totals: NutrientTotals::default(),
            meals: Vec::new(),
        }
    }

    /// The record created on the first meal log of a date: totals seeded
    /// from the single entry's contribution.
    pub fn seeded(date: NaiveDate, entry: MealEntry) -> Self {
        Self {
            date,
            totals: entry.nutrients,
            meals: vec![entry],
        }
    }

    /// Checks the ledger invariant: for every nutrient, the stored total
    /// equals the sum over the meal list. Entry values are integers (rounded
    /// at creation), so equality is exact.
    pub fn is_consistent(&self) -> bool {
        let mut summed = NutrientTotals::default();
        for meal in &self.meals {
            summed.add(&meal.nutrients);
        }
        Nutrient::ALL
            .iter()
            .all(|n| self.totals.get(*n) == summed.get(*n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodItem, MealType};
    use chrono::{TimeZone, Utc};

    fn entry(sodium: f64) -> MealEntry {
        let food = FoodItem::new(
            "1",
            "Crackers",
            "Snacks",
            "5 crackers",
            NutrientTotals {
                sodium,
                ..Default::default()
            },
        );
        MealEntry::new(
            food,
            1.0,
            MealType::Snack,
            Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_empty_record() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let record = DailyRecord::empty(date);
        assert!(record.totals.is_zero());
        assert!(record.meals.is_empty());
        assert!(record.is_consistent());
    }

    #[test]
    fn test_seeded_record_is_consistent() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let record = DailyRecord::seeded(date, entry(65.0));
        assert_eq!(record.totals.sodium, 65.0);
        assert_eq!(record.meals.len(), 1);
        assert!(record.is_consistent());
    }

    #[test]
    fn test_drifted_totals_detected() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut record = DailyRecord::seeded(date, entry(65.0));
        record.totals.sodium = 64.0;
        assert!(!record.is_consistent());
    }

    #[test]
    fn test_totals_flattened_on_the_wire() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let record = DailyRecord::seeded(date, entry(65.0));
        let json = serde_json::to_value(&record).unwrap();

        // Totals live beside date/meals, not nested under a "totals" key
        assert_eq!(json["sodium"], 65.0);
        assert!(json.get("totals").is_none());

        let parsed: DailyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
