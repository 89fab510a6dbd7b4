//! Key-value persistence behind the record stores.
//!
//! Each store keeps its whole collection as one JSON array under a single
//! key. Backends only move opaque strings; encoding lives here.

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded writing '{key}': {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
}

/// String key-value capability injected into the stores.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`. Either the whole value is written or
    /// the previous one is left in place.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One stored element: a decoded record, or the raw JSON of an element that
/// did not decode. Raw elements are written back untouched.
#[derive(Debug, Clone, PartialEq)]
enum Entry<T> {
    Record(T),
    Raw(serde_json::Value),
}

/// A decoded collection in stored order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Collection<T> {
    entries: Vec<Entry<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Collection<T> {
    pub(crate) fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Record(r) => Some(r),
            Entry::Raw(_) => None,
        })
    }

    pub(crate) fn into_records(self) -> Vec<T> {
        self.entries
            .into_iter()
            .filter_map(|e| match e {
                Entry::Record(r) => Some(r),
                Entry::Raw(_) => None,
            })
            .collect()
    }

    /// Every `"id"` string in the collection, decoded or not.
    pub(crate) fn ids<'a>(
        &'a self,
        id_of: impl Fn(&'a T) -> &'a str + 'a,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.entries.iter().filter_map(move |e| match e {
            Entry::Record(r) => Some(id_of(r)),
            Entry::Raw(v) => v.get("id").and_then(serde_json::Value::as_str),
        })
    }

    pub(crate) fn push(&mut self, record: T) {
        self.entries.push(Entry::Record(record));
    }

    /// Replace the first record matching `pred`. Returns whether one matched.
    pub(crate) fn replace(&mut self, pred: impl Fn(&T) -> bool, record: T) -> bool {
        for entry in &mut self.entries {
            if let Entry::Record(r) = entry {
                if pred(r) {
                    *r = record;
                    return true;
                }
            }
        }
        false
    }

    /// Drop decoded records matching `pred`. Returns how many were removed.
    pub(crate) fn remove(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| !matches!(e, Entry::Record(r) if pred(r)));
        before - self.entries.len()
    }
}

/// Decode the collection stored under `key`. A missing or blank value is an
/// empty collection. A value that is not a JSON array is an error; array
/// elements that do not decode as `T` are kept raw.
pub(crate) fn load_collection<T, S>(storage: &S, key: &str) -> Result<Collection<T>, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = match storage.get_item(key)? {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Collection::default()),
    };
    let values: Vec<serde_json::Value> = serde_json::from_str(&raw)?;
    let entries = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match T::deserialize(&value) {
            Ok(record) => Entry::Record(record),
            Err(e) => {
                warn!(key, index, error = %e, "Keeping undecodable record as raw JSON");
                Entry::Raw(value)
            }
        })
        .collect();
    Ok(Collection { entries })
}

pub(crate) fn save_collection<T, S>(
    storage: &S,
    key: &str,
    collection: &Collection<T>,
) -> Result<(), StorageError>
where
    T: Serialize,
    S: Storage + ?Sized,
{
    let values = collection
        .entries
        .iter()
        .map(|e| match e {
            Entry::Record(r) => serde_json::to_value(r),
            Entry::Raw(v) => Ok(v.clone()),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let raw = serde_json::to_string(&values)?;
    storage.set_item(key, &raw)
}
