use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::classify::category_for;
use crate::kv::KvStore;
use crate::model::{DEFAULT_UNIT, FoodItem, FoodItemPatch, HistoryItem, Recipe};
use crate::schema;

pub const FOOD_ITEMS_KEY: &str = "food-inventory-items";
pub const HISTORY_KEY: &str = "food-inventory-history";

/// Maximum number of history entries kept
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        source: serde_json::Error,
    },

    #[error("food item already exists: {0}")]
    DuplicateId(String),

    #[error("food item {id} has invalid quantity {quantity}")]
    InvalidQuantity { id: String, quantity: f64 },

    #[error("stored schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
}

impl RecordError {
    pub(crate) fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RecordError::Backend(Box::new(err))
    }
}

/// Durable food inventory and history on top of a [`KvStore`].
///
/// Each collection lives as one JSON array under a fixed key. Every mutation
/// reads the whole collection, changes it and writes it back before
/// returning; the last writer wins.
///
/// Collections that fail to parse read as empty (with a warning) and are
/// replaced on the next write.
pub struct RecordStore<S> {
    store: S,
}

impl<S: KvStore> RecordStore<S> {
    /// Wraps a store without touching its contents.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Wraps a store and brings its data up to the current schema version.
    pub fn open(store: S) -> Result<Self, RecordError> {
        let version = schema::migrate(&store)?;
        debug!(version, "record store opened");
        Ok(Self::new(store))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn list_food_items(&self) -> Result<Vec<FoodItem>, RecordError> {
        self.read(FOOD_ITEMS_KEY)
    }

    pub fn get_food_item(&self, id: &str) -> Result<Option<FoodItem>, RecordError> {
        Ok(self.list_food_items()?.into_iter().find(|item| item.id == id))
    }

    /// Overwrites the whole inventory.
    ///
    /// Quantities must be finite and non-negative; otherwise nothing is written.
    pub fn replace_food_items(&self, items: &[FoodItem]) -> Result<(), RecordError> {
        items.iter().try_for_each(check_quantity)?;
        self.write(FOOD_ITEMS_KEY, items)
    }

    /// Appends an item and records a matching `food` history entry.
    #[instrument(skip_all, fields(id = %item.id, name = %item.name))]
    pub fn add_food_item(&self, item: FoodItem) -> Result<(), RecordError> {
        let mut items = self.list_food_items()?;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(RecordError::DuplicateId(item.id));
        }
        check_quantity(&item)?;
        let entry = HistoryItem::for_food(&item);
        items.push(item);
        self.write(FOOD_ITEMS_KEY, &items)?;
        debug!(count = items.len(), "food item added");

        self.add_history(entry)
    }

    /// Merges `patch` into the item with `id`. Unknown ids are ignored.
    #[instrument(skip(self, patch))]
    pub fn update_food_item(&self, id: &str, patch: FoodItemPatch) -> Result<(), RecordError> {
        let mut items = self.list_food_items()?;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            debug!("no such food item, update skipped");
            return Ok(());
        };
        patch.apply_to(item);
        check_quantity(item)?;
        self.write(FOOD_ITEMS_KEY, &items)
    }

    /// Removes the item with `id`, if present.
    #[instrument(skip(self))]
    pub fn delete_food_item(&self, id: &str) -> Result<(), RecordError> {
        let mut items = self.list_food_items()?;
        let before = items.len();
        items.retain(|item| item.id != id);
        debug!(removed = before - items.len(), "food item delete");
        self.write(FOOD_ITEMS_KEY, &items)
    }

    /// History entries, newest first.
    pub fn list_history(&self) -> Result<Vec<HistoryItem>, RecordError> {
        self.read(HISTORY_KEY)
    }

    /// Prepends an entry, keeping only the newest [`HISTORY_LIMIT`].
    pub fn add_history(&self, entry: HistoryItem) -> Result<(), RecordError> {
        if !self.store.is_available() {
            return Ok(());
        }
        let mut history = self.list_history()?;
        history.insert(0, entry);
        history.truncate(HISTORY_LIMIT);
        self.write(HISTORY_KEY, &history)
    }

    /// Adds one item per detected name, all sharing `detected_at`.
    pub fn record_detections<I>(
        &self,
        names: I,
        detected_at: DateTime<Utc>,
    ) -> Result<Vec<FoodItem>, RecordError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut added = Vec::new();
        for name in names {
            let name = name.into();
            let category = category_for(&name);
            let item = FoodItem::new(name, 1.0, DEFAULT_UNIT, category, detected_at);
            self.add_food_item(item.clone())?;
            added.push(item);
        }
        Ok(added)
    }

    /// Logs that a recipe was cooked. Inventory is left as is.
    pub fn record_cooked(
        &self,
        recipe: &Recipe,
        cooked_at: DateTime<Utc>,
    ) -> Result<HistoryItem, RecordError> {
        let entry = HistoryItem::for_recipe(recipe, cooked_at);
        self.add_history(entry.clone())?;
        Ok(entry)
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Vec<T>, RecordError> {
        if !self.store.is_available() {
            return Ok(Vec::new());
        }
        let Some(bytes) = self.store.get(key).map_err(RecordError::backend)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_slice(&bytes) {
            Ok(records) => Ok(records),
            Err(err) => {
                warn!(key, error = %err, "stored collection is malformed, reading as empty");
                Ok(Vec::new())
            }
        }
    }

    fn write<T: Serialize>(&self, key: &'static str, records: &[T]) -> Result<(), RecordError> {
        if !self.store.is_available() {
            debug!(key, "no storage available, write skipped");
            return Ok(());
        }
        let bytes =
            serde_json::to_vec(records).map_err(|source| RecordError::Encode { key, source })?;
        self.store.put(key, &bytes).map_err(RecordError::backend)
    }
}

// JSON has no encoding for non-finite numbers; they would be written as null.
fn check_quantity(item: &FoodItem) -> Result<(), RecordError> {
    if item.quantity.is_finite() && item.quantity >= 0.0 {
        return Ok(());
    }
    Err(RecordError::InvalidQuantity {
        id: item.id.clone(),
        quantity: item.quantity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{MemoryStore, UnavailableStore};
    use crate::model::{Category, HistoryKind};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap()
    }

    fn item(id: &str, name: &str) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity: 1.0,
            unit: "個".to_string(),
            expiry_date: None,
            detected_at: now(),
            category: category_for(name),
        }
    }

    fn open() -> RecordStore<MemoryStore> {
        RecordStore::open(MemoryStore::new()).unwrap()
    }

    #[test]
    fn empty_store_lists_nothing() {
        let records = open();

        assert!(records.list_food_items().unwrap().is_empty());
        assert!(records.list_history().unwrap().is_empty());
    }

    #[test]
    fn replace_then_list_preserves_order() {
        let records = open();
        let items = vec![item("b", "卵"), item("a", "トマト"), item("c", "牛乳")];

        records.replace_food_items(&items).unwrap();

        assert_eq!(records.list_food_items().unwrap(), items);
    }

    #[test]
    fn add_appends_and_audits() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();
        let added = item("2", "チーズ").with_expiry(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        records.add_food_item(added.clone()).unwrap();

        let items = records.list_food_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], added);

        let history = records.list_history().unwrap();
        assert_eq!(history.len(), 2);
        let newest = &history[0];
        assert_eq!(newest.kind, HistoryKind::Food);
        assert_eq!(newest.name, "チーズ");
        assert_eq!(newest.date, added.detected_at);
        assert_eq!(newest.quantity, Some(1.0));
        assert_eq!(newest.category, Some(Category::Dairy));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();

        let err = records.add_food_item(item("1", "レタス")).unwrap_err();

        assert!(matches!(err, RecordError::DuplicateId(id) if id == "1"));
        assert_eq!(records.list_food_items().unwrap().len(), 1);
        assert_eq!(records.list_history().unwrap().len(), 1);
    }

    #[test]
    fn infinite_quantity_is_rejected_and_keeps_inventory() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();
        records.add_food_item(item("2", "卵")).unwrap();
        let milk = FoodItem {
            quantity: "inf".parse().unwrap(),
            ..item("3", "牛乳")
        };

        let err = records.add_food_item(milk).unwrap_err();
        assert!(matches!(err, RecordError::InvalidQuantity { ref id, .. } if id == "3"));

        records.add_food_item(item("4", "バター")).unwrap();
        let ids: Vec<_> = records
            .list_food_items()
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
        assert_eq!(records.list_history().unwrap().len(), 3);
    }

    #[test]
    fn nan_quantity_is_rejected_on_update_and_replace() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();

        let err = records
            .update_food_item(
                "1",
                FoodItemPatch {
                    quantity: Some(f64::NAN),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidQuantity { .. }));

        let nan_item = FoodItem {
            quantity: f64::NAN,
            ..item("2", "卵")
        };
        assert!(records.replace_food_items(&[nan_item]).is_err());

        let stored = records.list_food_items().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].quantity, 1.0);
    }

    #[test]
    fn stored_bad_quantity_does_not_block_other_edits() {
        let store = MemoryStore::new();
        let stored = r#"[
            {"id":"1","name":"卵","quantity":-2,"unit":"個",
             "detectedAt":"2024-01-10T00:00:00.000Z","category":"タンパク質"}
        ]"#;
        store.put(FOOD_ITEMS_KEY, stored.as_bytes()).unwrap();
        let records = RecordStore::open(store).unwrap();

        records.add_food_item(item("2", "トマト")).unwrap();
        records.delete_food_item("2").unwrap();

        let items = records.list_food_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, -2.0);
    }

    #[test]
    fn update_merges_fields() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();

        records
            .update_food_item(
                "1",
                FoodItemPatch {
                    quantity: Some(3.0),
                    unit: Some("パック".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let updated = records.get_food_item("1").unwrap().unwrap();
        assert_eq!(updated.quantity, 3.0);
        assert_eq!(updated.unit, "パック");
        assert_eq!(updated.name, "トマト");
        assert_eq!(updated.detected_at, now());
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();
        let before = records.list_food_items().unwrap();

        records
            .update_food_item(
                "nonexistent-id",
                FoodItemPatch {
                    name: Some("changed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(records.list_food_items().unwrap(), before);
    }

    #[test]
    fn delete_is_idempotent() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();
        records.add_food_item(item("2", "卵")).unwrap();

        records.delete_food_item("1").unwrap();
        let once = records.list_food_items().unwrap();
        records.delete_food_item("1").unwrap();

        assert_eq!(records.list_food_items().unwrap(), once);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].id, "2");
    }

    #[test]
    fn delete_keeps_history() {
        let records = open();
        records.add_food_item(item("1", "トマト")).unwrap();

        records.delete_food_item("1").unwrap();

        assert_eq!(records.list_history().unwrap().len(), 1);
    }

    #[test]
    fn history_is_capped_newest_first() {
        let records = open();
        for n in 0..105 {
            let recipe = Recipe {
                id: n.to_string(),
                title: format!("recipe-{n}"),
                ingredients: Vec::new(),
                instructions: String::new(),
                image_url: None,
                prep_time: None,
                cook_time: None,
            };
            records.record_cooked(&recipe, now()).unwrap();
        }

        let history = records.list_history().unwrap();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].name, "recipe-104");
        assert_eq!(history[99].name, "recipe-5");
    }

    #[test]
    fn detections_share_timestamp_and_infer_category() {
        let records = open();

        let added = records
            .record_detections(["トマト", "卵", "パスタ"], now())
            .unwrap();

        assert_eq!(added.len(), 3);
        assert!(added.iter().all(|i| i.detected_at == now()));
        assert!(added.iter().all(|i| i.unit == DEFAULT_UNIT && i.quantity == 1.0));
        assert_eq!(added[0].category, Category::Vegetable);
        assert_eq!(added[1].category, Category::Protein);
        assert_eq!(added[2].category, Category::Other);
        assert_eq!(records.list_food_items().unwrap(), added);

        let history = records.list_history().unwrap();
        let names: Vec<_> = history.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["パスタ", "卵", "トマト"]);
    }

    #[test]
    fn malformed_collection_reads_as_empty() {
        let store = MemoryStore::new();
        store.put(FOOD_ITEMS_KEY, b"{not json").unwrap();
        let records = RecordStore::new(&store);

        assert!(records.list_food_items().unwrap().is_empty());

        records.add_food_item(item("1", "卵")).unwrap();
        assert_eq!(records.list_food_items().unwrap().len(), 1);
    }

    #[test]
    fn unavailable_store_reads_empty_and_skips_writes() {
        let records = RecordStore::open(UnavailableStore).unwrap();

        records.add_food_item(item("1", "トマト")).unwrap();
        records.update_food_item("1", FoodItemPatch::default()).unwrap();
        records.delete_food_item("1").unwrap();

        assert!(records.list_food_items().unwrap().is_empty());
        assert!(records.list_history().unwrap().is_empty());
    }

    #[test]
    fn persisted_layout_is_a_plain_array() {
        let store = MemoryStore::new();
        let records = RecordStore::open(&store).unwrap();
        records.add_food_item(item("1", "トマト")).unwrap();

        let raw = store.get(FOOD_ITEMS_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&raw).unwrap();

        assert!(json.is_array());
        assert_eq!(json[0]["id"], "1");
        assert_eq!(json[0]["category"], "野菜");
    }
}
