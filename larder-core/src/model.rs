use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Stable identifier for records (UUID format for newly created ones)
pub type RecordId = String;

/// Unit used when nothing more specific is known
pub const DEFAULT_UNIT: &str = "個";

/// Fixed set of inventory categories.
///
/// Persisted as the display label so stored collections stay readable by
/// anything that shares the storage keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub enum Category {
    Vegetable,
    Fruit,
    Protein,
    Dairy,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Vegetable,
        Category::Fruit,
        Category::Protein,
        Category::Dairy,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Vegetable => "野菜",
            Category::Fruit => "果物",
            Category::Protein => "タンパク質",
            Category::Dairy => "乳製品",
            Category::Other => "その他",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Category::Vegetable => "vegetable",
            Category::Fruit => "fruit",
            Category::Protein => "protein",
            Category::Dairy => "dairy",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

// Stored labels outside the fixed set fall back to Other.
impl From<String> for Category {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One inventory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: RecordId,
    pub name: String,
    #[serde(deserialize_with = "null_quantity_as_zero")]
    pub quantity: f64,
    pub unit: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "expiry_date_format"
    )]
    pub expiry_date: Option<NaiveDate>,
    pub detected_at: DateTime<Utc>,
    pub category: Category,
}

impl FoodItem {
    /// Creates an item with a fresh id and no expiry date.
    ///
    /// The quantity is stored as given; [`RecordStore`](crate::RecordStore)
    /// refuses to persist one that is negative or not finite.
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        category: Category,
        detected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            quantity,
            unit: unit.into(),
            expiry_date: None,
            detected_at,
            category,
        }
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }
}

/// Partial update for a [`FoodItem`].
///
/// `None` leaves a field untouched. `expiry_date` is tri-state:
/// `Some(None)` clears the date, `Some(Some(d))` sets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodItemPatch {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub expiry_date: Option<Option<NaiveDate>>,
    pub category: Option<Category>,
}

impl FoodItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.expiry_date.is_none()
            && self.category.is_none()
    }

    /// Shallow-merges the set fields into `item`.
    pub fn apply_to(self, item: &mut FoodItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            item.unit = unit;
        }
        if let Some(expiry_date) = self.expiry_date {
            item.expiry_date = expiry_date;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
    }
}

/// What a history entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Food,
    Recipe,
}

/// Immutable audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub name: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl HistoryItem {
    /// Audit entry for an inventory addition, dated at detection time.
    pub fn for_food(item: &FoodItem) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: HistoryKind::Food,
            name: item.name.clone(),
            date: item.detected_at,
            quantity: Some(item.quantity),
            category: Some(item.category),
        }
    }

    pub fn for_recipe(recipe: &Recipe, cooked_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: HistoryKind::Recipe,
            name: recipe.title.clone(),
            date: cooked_at,
            quantity: None,
            category: None,
        }
    }
}

/// A suggested recipe. Never persisted as inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
}

// Non-finite numbers are written as `null` by JSON encoders; read them as
// zero so one bad record does not make the whole collection unreadable.
fn null_quantity_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// `expiryDate` is a plain `YYYY-MM-DD` string. Blank strings read as absent,
/// and full RFC 3339 timestamps are accepted for their date part.
mod expiry_date_format {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer, de};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, FORMAT) {
            return Ok(Some(date));
        }
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.date_naive()))
            .map_err(|_| de::Error::custom(format!("invalid expiry date: {}", raw)))
    }
}
