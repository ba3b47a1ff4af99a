use std::convert::Infallible;
use std::path::{Path, PathBuf};

use larder_core::{FixedDetector, FixedRecipeBook, KvStore, MemoryStore, RecordStore, UnavailableStore};
use larder_fjall::FjallStore;
use larder_rocks::RocksStore;
use serde::Deserialize;
use thiserror::Error;

use crate::error::LarderError;

#[derive(Debug, Error)]
pub enum AnyStoreError {
    #[error("fjall error: {0}")]
    Fjall(#[from] larder_fjall::FjallError),
    #[error("rocks error: {0}")]
    Rocks(#[from] larder_rocks::RocksError),
}

impl From<Infallible> for AnyStoreError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Fjall,
    Rocks,
    /// Nothing is kept after the process exits
    Memory,
    /// No storage at all: reads are empty, writes are dropped
    Unavailable,
}

impl std::str::FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fjall" => Ok(StoreType::Fjall),
            "rocks" | "rocksdb" => Ok(StoreType::Rocks),
            "memory" | "mem" => Ok(StoreType::Memory),
            "unavailable" | "none" => Ok(StoreType::Unavailable),
            _ => Err(format!("unknown store type: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreType::Fjall => write!(f, "fjall"),
            StoreType::Rocks => write!(f, "rocks"),
            StoreType::Memory => write!(f, "memory"),
            StoreType::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Runtime-dispatched store.
pub enum AnyStore {
    Fjall(FjallStore),
    Rocks(RocksStore),
    Memory(MemoryStore),
    Unavailable(UnavailableStore),
}

impl AnyStore {
    pub fn open(store_type: StoreType, path: impl AsRef<Path>) -> Result<Self, AnyStoreError> {
        match store_type {
            StoreType::Fjall => Ok(Self::Fjall(FjallStore::open(path)?)),
            StoreType::Rocks => Ok(Self::Rocks(RocksStore::open(path)?)),
            StoreType::Memory => Ok(Self::Memory(MemoryStore::new())),
            StoreType::Unavailable => Ok(Self::Unavailable(UnavailableStore)),
        }
    }
}

impl KvStore for AnyStore {
    type Error = AnyStoreError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        match self {
            AnyStore::Fjall(s) => s.get(key).map_err(Into::into),
            AnyStore::Rocks(s) => s.get(key).map_err(Into::into),
            AnyStore::Memory(s) => s.get(key).map_err(Into::into),
            AnyStore::Unavailable(s) => s.get(key).map_err(Into::into),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), Self::Error> {
        match self {
            AnyStore::Fjall(s) => s.put(key, value).map_err(Into::into),
            AnyStore::Rocks(s) => s.put(key, value).map_err(Into::into),
            AnyStore::Memory(s) => s.put(key, value).map_err(Into::into),
            AnyStore::Unavailable(s) => s.put(key, value).map_err(Into::into),
        }
    }

    fn has(&self, key: &str) -> Result<bool, Self::Error> {
        match self {
            AnyStore::Fjall(s) => s.has(key).map_err(Into::into),
            AnyStore::Rocks(s) => s.has(key).map_err(Into::into),
            AnyStore::Memory(s) => s.has(key).map_err(Into::into),
            AnyStore::Unavailable(s) => s.has(key).map_err(Into::into),
        }
    }

    fn is_available(&self) -> bool {
        !matches!(self, AnyStore::Unavailable(_))
    }
}

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub records: RecordStore<AnyStore>,
    pub detector: FixedDetector,
    pub recipes: FixedRecipeBook,
}

impl AppContext {
    pub fn open(store_type: StoreType, store_path: PathBuf) -> Result<Self, LarderError> {
        if matches!(store_type, StoreType::Fjall | StoreType::Rocks) {
            std::fs::create_dir_all(&store_path)?;
        }
        let store = AnyStore::open(store_type, &store_path)?;
        let records = RecordStore::open(store)?;

        Ok(Self {
            records,
            detector: FixedDetector,
            recipes: FixedRecipeBook::new(),
        })
    }
}

pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("larder")
        .join("store")
}
