//! Food search against the USDA FoodData Central API.
//!
//! Best-effort by contract: a blank query, a failed request, or an
//! unparseable response all yield an empty list. Per-serving values are
//! kept as reported; rounding happens later, once, at meal-entry creation.

use serde::Deserialize;

use crate::models::{FoodItem, NutrientTotals};

const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
const PAGE_SIZE: &str = "25";

// FoodData Central nutrient numbers
const NUTRIENT_ENERGY: i64 = 1008;
const NUTRIENT_PROTEIN: i64 = 1003;
const NUTRIENT_SODIUM: i64 = 1093;
const NUTRIENT_POTASSIUM: i64 = 1092;
const NUTRIENT_PHOSPHORUS: i64 = 1091;
const NUTRIENT_FIBER: i64 = 1079;
const NUTRIENT_SUGARS: i64 = 2000;
const NUTRIENT_FAT: i64 = 1004;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdcSearchResponse {
    #[serde(default)]
    total_hits: u64,
    #[serde(default)]
    foods: Vec<FdcFood>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdcFood {
    fdc_id: i64,
    description: String,
    #[serde(default)]
    food_category: Option<String>,
    #[serde(default)]
    serving_size: Option<f64>,
    #[serde(default)]
    serving_size_unit: Option<String>,
    #[serde(default)]
    household_serving_full_text: Option<String>,
    #[serde(default)]
    food_nutrients: Vec<FdcNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FdcNutrient {
    nutrient_id: i64,
    #[serde(default)]
    value: f64,
}

pub struct UsdaClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl UsdaClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Searches the food database. Empty result on blank queries and on any
    /// failure; callers treat "no results" and "search unavailable" the same.
    pub async fn search_foods(&self, query: &str) -> Vec<FoodItem> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.try_search(query).await {
            Ok(foods) => foods,
            Err(e) => {
                tracing::warn!(error = %e, query, "food search failed");
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<FoodItem>, reqwest::Error> {
        let url = format!("{}/foods/search", self.base_url.trim_end_matches('/'));
        let response: FdcSearchResponse = self
            .client
            .get(url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("pageNumber", "1"),
                ("pageSize", PAGE_SIZE),
                ("dataType", "Branded"),
                ("dataType", "Foundation"),
                ("dataType", "SR Legacy"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(query, hits = response.total_hits, "food search response");
        Ok(response.foods.iter().map(food_item_from_fdc).collect())
    }
}

fn food_item_from_fdc(food: &FdcFood) -> FoodItem {
    FoodItem::new(
        food.fdc_id.to_string(),
        food.description.clone(),
        food.food_category.clone().unwrap_or_else(|| "Unknown".into()),
        serving_label(food),
        nutrients_from_fdc(&food.food_nutrients),
    )
}

fn nutrients_from_fdc(nutrients: &[FdcNutrient]) -> NutrientTotals {
    let mut out = NutrientTotals::default();
    for nutrient in nutrients {
        match nutrient.nutrient_id {
            NUTRIENT_ENERGY => out.calories = nutrient.value,
            NUTRIENT_PROTEIN => out.protein = nutrient.value,
            NUTRIENT_SODIUM => out.sodium = nutrient.value,
            NUTRIENT_POTASSIUM => out.potassium = nutrient.value,
            NUTRIENT_PHOSPHORUS => out.phosphorus = nutrient.value,
            NUTRIENT_FIBER => out.fiber = nutrient.value,
            NUTRIENT_SUGARS => out.sugar = nutrient.value,
            NUTRIENT_FAT => out.fat = nutrient.value,
            _ => {}
        }
    }
    out
}

/// Serving label fallback chain: household text, then size+unit, then 100g.
fn serving_label(food: &FdcFood) -> String {
    if let Some(text) = &food.household_serving_full_text {
        if !text.trim().is_empty() {
            return text.clone();
        }
    }
    if let (Some(size), Some(unit)) = (food.serving_size, &food.serving_size_unit) {
        return format!("{}{}", size, unit);
    }
    "100g".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fdc(nutrients: Vec<(i64, f64)>) -> FdcFood {
        FdcFood {
            fdc_id: 173944,
            description: "Bananas, raw".to_string(),
            food_category: Some("Fruits and Fruit Juices".to_string()),
            serving_size: None,
            serving_size_unit: None,
            household_serving_full_text: None,
            food_nutrients: nutrients
                .into_iter()
                .map(|(nutrient_id, value)| FdcNutrient { nutrient_id, value })
                .collect(),
        }
    }

    #[test]
    fn test_nutrient_id_mapping() {
        let food = fdc(vec![
            (NUTRIENT_ENERGY, 89.0),
            (NUTRIENT_POTASSIUM, 358.0),
            (NUTRIENT_SUGARS, 12.2),
            (NUTRIENT_FAT, 0.3),
            (9999, 42.0),
        ]);
        let item = food_item_from_fdc(&food);

        assert_eq!(item.id, "173944");
        assert_eq!(item.nutrients.calories, 89.0);
        assert_eq!(item.nutrients.potassium, 358.0);
        assert_eq!(item.nutrients.sugar, 12.2);
        assert_eq!(item.nutrients.fat, 0.3);
        assert_eq!(item.nutrients.sodium, 0.0);
    }

    #[test]
    fn test_serving_label_fallback_chain() {
        let mut food = fdc(vec![]);
        assert_eq!(serving_label(&food), "100g");

        food.serving_size = Some(28.0);
        food.serving_size_unit = Some("g".to_string());
        assert_eq!(serving_label(&food), "28g");

        food.household_serving_full_text = Some("1 medium".to_string());
        assert_eq!(serving_label(&food), "1 medium");
    }

    #[tokio::test]
    async fn test_blank_query_short_circuits() {
        let client = UsdaClient::new("demo-key");
        assert!(client.search_foods("   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_degrades_to_empty() {
        let client = UsdaClient::with_base_url("http://127.0.0.1:1", "demo-key");
        assert!(client.search_foods("banana").await.is_empty());
    }
}
