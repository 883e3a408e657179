use crate::store::{read_guard, write_guard, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use utoipa::ToSchema;

/// A registered comic. Created once, never mutated or deleted. Not owned by
/// any user, even though registering one requires authentication.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comic {
    pub name: String,
    pub publisher: String,
    pub licensor: String,
    pub genre: String,
    pub price: f64,
}

/// Insertion-ordered comic registry, unique on `name`.
#[derive(Debug, Default)]
pub struct ComicStore {
    comics: RwLock<Vec<Comic>>,
}

impl ComicStore {
    /// Append a new comic.
    ///
    /// # Errors
    /// Returns `ComicAlreadyRegistered` when a comic with the same name
    /// exists, independent of the other fields.
    pub fn register(&self, comic: Comic) -> Result<Comic, StoreError> {
        let mut comics = write_guard(&self.comics);

        if comics.iter().any(|existing| existing.name == comic.name) {
            return Err(StoreError::ComicAlreadyRegistered);
        }

        comics.push(comic.clone());

        Ok(comic)
    }

    /// Snapshot of the registry in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<Comic> {
        read_guard(&self.comics).clone()
    }
}
