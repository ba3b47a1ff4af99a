//! Schema version stamp and upgrades of persisted collections.
//!
//! Collections carry no version of their own; a separate key records the
//! version the data was last written with. Upgrades work on raw JSON so
//! they never depend on the current shape of the record types.

use serde_json::Value;
use tracing::{info, warn};

use crate::kv::KvStore;
use crate::records::{FOOD_ITEMS_KEY, HISTORY_KEY, RecordError};

pub const SCHEMA_KEY: &str = "food-inventory-schema";

pub const CURRENT_VERSION: u32 = 1;

/// Version assumed for data written before the stamp existed
const LEGACY_VERSION: u32 = 0;

/// Upgrades stored data to [`CURRENT_VERSION`] and returns it.
pub(crate) fn migrate<S: KvStore>(store: &S) -> Result<u32, RecordError> {
    if !store.is_available() {
        return Ok(CURRENT_VERSION);
    }

    let mut version = match stored_version(store)? {
        Some(version) => version,
        None if has_data(store)? => LEGACY_VERSION,
        None => return stamp(store, CURRENT_VERSION),
    };

    if version > CURRENT_VERSION {
        return Err(RecordError::UnsupportedSchema {
            found: version,
            supported: CURRENT_VERSION,
        });
    }

    while version < CURRENT_VERSION {
        match version {
            0 => drop_blank_expiry_dates(store)?,
            _ => {
                return Err(RecordError::UnsupportedSchema {
                    found: version,
                    supported: CURRENT_VERSION,
                });
            }
        }
        version += 1;
        info!(version, "upgraded stored inventory");
    }

    stamp(store, version)
}

fn stored_version<S: KvStore>(store: &S) -> Result<Option<u32>, RecordError> {
    let Some(bytes) = store.get(SCHEMA_KEY).map_err(RecordError::backend)? else {
        return Ok(None);
    };
    match serde_json::from_slice(&bytes) {
        Ok(version) => Ok(Some(version)),
        Err(err) => {
            warn!(error = %err, "schema version is unreadable, assuming legacy data");
            Ok(Some(LEGACY_VERSION))
        }
    }
}

fn has_data<S: KvStore>(store: &S) -> Result<bool, RecordError> {
    Ok(store.has(FOOD_ITEMS_KEY).map_err(RecordError::backend)?
        || store.has(HISTORY_KEY).map_err(RecordError::backend)?)
}

fn stamp<S: KvStore>(store: &S, version: u32) -> Result<u32, RecordError> {
    let bytes = serde_json::to_vec(&version).map_err(|source| RecordError::Encode {
        key: SCHEMA_KEY,
        source,
    })?;
    store
        .put(SCHEMA_KEY, &bytes)
        .map_err(RecordError::backend)?;
    Ok(version)
}

// 0 -> 1: forms used to store an empty string for "no expiry date".
fn drop_blank_expiry_dates<S: KvStore>(store: &S) -> Result<(), RecordError> {
    let Some(bytes) = store.get(FOOD_ITEMS_KEY).map_err(RecordError::backend)? else {
        return Ok(());
    };
    let mut items: Vec<Value> = match serde_json::from_slice(&bytes) {
        Ok(items) => items,
        Err(err) => {
            warn!(error = %err, "food items are malformed, leaving them for the reader");
            return Ok(());
        }
    };

    let mut changed = 0;
    for item in items.iter_mut().filter_map(Value::as_object_mut) {
        let blank = item
            .get("expiryDate")
            .is_some_and(|v| v.is_null() || v.as_str().is_some_and(|s| s.trim().is_empty()));
        if blank {
            item.remove("expiryDate");
            changed += 1;
        }
    }

    if changed > 0 {
        let bytes = serde_json::to_vec(&items).map_err(|source| RecordError::Encode {
            key: FOOD_ITEMS_KEY,
            source,
        })?;
        store
            .put(FOOD_ITEMS_KEY, &bytes)
            .map_err(RecordError::backend)?;
    }
    Ok(())
}
