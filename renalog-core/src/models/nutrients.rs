//! Nutrient identifiers and the fixed-schema totals record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of nutrients tracked for CKD patients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nutrient {
    Sodium,
    Potassium,
    Phosphorus,
    Protein,
    Calories,
    Fiber,
    Sugar,
    Fat,
}

impl Nutrient {
    /// All tracked nutrients, in display order.
    pub const ALL: [Nutrient; 8] = [
        Nutrient::Sodium,
        Nutrient::Potassium,
        Nutrient::Phosphorus,
        Nutrient::Protein,
        Nutrient::Calories,
        Nutrient::Fiber,
        Nutrient::Sugar,
        Nutrient::Fat,
    ];

    /// Measurement unit used for display.
    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Sodium | Nutrient::Potassium | Nutrient::Phosphorus => "mg",
            Nutrient::Protein | Nutrient::Fiber | Nutrient::Sugar | Nutrient::Fat => "g",
            Nutrient::Calories => "kcal",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Nutrient::Sodium => "sodium",
            Nutrient::Potassium => "potassium",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Protein => "protein",
            Nutrient::Calories => "calories",
            Nutrient::Fiber => "fiber",
            Nutrient::Sugar => "sugar",
            Nutrient::Fat => "fat",
        };
        write!(f, "{}", name)
    }
}

/// Nutrient values with every field always present.
///
/// Used both for per-serving food values and for accumulated daily totals.
/// Each field defaults to zero on deserialization, so records written before
/// the sugar and fat fields existed decode without defensive checks anywhere
/// else in the crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    #[serde(default)]
    pub sodium: f64,
    #[serde(default)]
    pub potassium: f64,
    #[serde(default)]
    pub phosphorus: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub fat: f64,
}

impl NutrientTotals {
    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Sodium => self.sodium,
            Nutrient::Potassium => self.potassium,
            Nutrient::Phosphorus => self.phosphorus,
            Nutrient::Protein => self.protein,
            Nutrient::Calories => self.calories,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sugar => self.sugar,
            Nutrient::Fat => self.fat,
        }
    }

    pub fn set(&mut self, nutrient: Nutrient, value: f64) {
        match nutrient {
            Nutrient::Sodium => self.sodium = value,
            Nutrient::Potassium => self.potassium = value,
            Nutrient::Phosphorus => self.phosphorus = value,
            Nutrient::Protein => self.protein = value,
            Nutrient::Calories => self.calories = value,
            Nutrient::Fiber => self.fiber = value,
            Nutrient::Sugar => self.sugar = value,
            Nutrient::Fat => self.fat = value,
        }
    }

    /// Field-wise accumulation of another set of values.
    pub fn add(&mut self, other: &NutrientTotals) {
        for nutrient in Nutrient::ALL {
            self.set(nutrient, self.get(nutrient) + other.get(nutrient));
        }
    }

    /// Values multiplied by a serving quantity.
    pub fn scaled(&self, quantity: f64) -> NutrientTotals {
        let mut out = NutrientTotals::default();
        for nutrient in Nutrient::ALL {
            out.set(nutrient, self.get(nutrient) * quantity);
        }
        out
    }

    /// Each value rounded to the nearest integer.
    ///
    /// Rounding happens exactly once, when a meal entry is created, so a
    /// later deletion's negation is an exact inverse of the addition.
    pub fn rounded(&self) -> NutrientTotals {
        let mut out = NutrientTotals::default();
        for nutrient in Nutrient::ALL {
            out.set(nutrient, self.get(nutrient).round());
        }
        out
    }

    /// Sign-flipped copy, used for deletion deltas.
    pub fn negated(&self) -> NutrientTotals {
        let mut out = NutrientTotals::default();
        for nutrient in Nutrient::ALL {
            out.set(nutrient, -self.get(nutrient));
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        Nutrient::ALL.iter().all(|n| self.get(*n) == 0.0)
    }
}
