//! Stage-derived daily nutrient limits.
//!
//! Limits are clinical constants, not computed: a table lookup keeps them
//! auditable. Stages 1 and 2 intentionally share the general-population
//! default table, and an unknown stage maps to the same baseline so that
//! "unknown" never silently over- or under-restricts.

use serde::Serialize;

use crate::models::{CkdStage, Nutrient};

/// Daily maximums for one CKD stage.
///
/// Protein is in grams per kilogram of body weight; all other values are
/// absolute daily amounts in the nutrient's display unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LimitSet {
    pub sodium: f64,
    pub potassium: f64,
    pub phosphorus: f64,
    pub protein: f64,
    pub calories: f64,
    pub fiber: f64,
    pub sugar: f64,
    pub fat: f64,
    /// Daily fluid cap in mL, present only for the later stages.
    pub fluid: Option<u32>,
}

impl LimitSet {
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
}

const DEFAULT_LIMITS: LimitSet = LimitSet {
    sodium: 2300.0,
    potassium: 4700.0,
    phosphorus: 1000.0,
    protein: 0.8,
    calories: 2000.0,
    fiber: 25.0,
    sugar: 50.0,
    fat: 70.0,
    fluid: None,
};

const STAGE_3_LIMITS: LimitSet = LimitSet {
    sodium: 2000.0,
    potassium: 3000.0,
    phosphorus: 800.0,
    protein: 0.6,
    calories: 2000.0,
    fiber: 25.0,
    sugar: 50.0,
    fat: 70.0,
    fluid: None,
};

const STAGE_4_LIMITS: LimitSet = LimitSet {
    sodium: 1500.0,
    potassium: 2000.0,
    phosphorus: 700.0,
    protein: 0.6,
    calories: 2000.0,
    fiber: 25.0,
    sugar: 50.0,
    fat: 70.0,
    fluid: Some(1500),
};

const STAGE_5_LIMITS: LimitSet = LimitSet {
    sodium: 1500.0,
    potassium: 1500.0,
    phosphorus: 600.0,
    protein: 0.6,
    calories: 2000.0,
    fiber: 25.0,
    sugar: 50.0,
    fat: 70.0,
    fluid: Some(1000),
};

/// Maps a CKD stage to its daily limits. Total over every stage value.
pub fn limits_for_stage(stage: CkdStage) -> LimitSet {
    match stage {
        CkdStage::Stage1 | CkdStage::Stage2 | CkdStage::NotApplicable => DEFAULT_LIMITS,
        CkdStage::Stage3 => STAGE_3_LIMITS,
        CkdStage::Stage4 => STAGE_4_LIMITS,
        CkdStage::Stage5 => STAGE_5_LIMITS,
    }
}
