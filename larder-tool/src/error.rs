use thiserror::Error;

use crate::store::AnyStoreError;

#[derive(Debug, Error)]
pub enum LarderError {
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] AnyStoreError),

    #[error("Record error: {0}")]
    Record(#[from] larder_core::RecordError),

    #[error("Food item not found: {0}")]
    ItemNotFound(String),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Nothing to change: pass at least one field to edit")]
    EmptyEdit,
}
