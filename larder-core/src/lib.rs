//! Larder - household food inventory with an audit history.
//!
//! [`RecordStore`] persists the inventory and its history on any
//! [`KvStore`]; [`classify`] and [`view`] derive what a front end shows.

pub mod classify;
pub mod kv;
pub mod model;
pub mod records;
pub mod schema;
pub mod suggest;
pub mod view;

pub use classify::{category_for, icon_for};
pub use kv::{KvStore, MemoryStore, UnavailableStore};
pub use model::{
    Category, DEFAULT_UNIT, FoodItem, FoodItemPatch, HistoryItem, HistoryKind, Recipe, RecordId,
};
pub use records::{FOOD_ITEMS_KEY, HISTORY_KEY, HISTORY_LIMIT, RecordError, RecordStore};
pub use suggest::{Detector, FixedDetector, FixedRecipeBook, RecipeSource, Suggestion};
pub use view::{
    ExpiryStatus, IngredientSummary, expiry_status, group_by_category, ingredient_summary,
};
