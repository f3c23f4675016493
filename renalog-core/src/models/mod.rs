mod daily_record;
mod food;
mod meal;
mod nutrients;
mod profile;

pub use daily_record::DailyRecord;
pub use food::FoodItem;
pub use meal::{MealEntry, MealType};
pub use nutrients::{Nutrient, NutrientTotals};
pub use profile::{CkdStage, ProfileUpdate, UserProfile};
