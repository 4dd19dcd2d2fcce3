//! Durable key-value storage for the ledger.
//!
//! Values are stored as JSON text under fixed key names. Reading is fail-safe: a missing,
//! unreadable or malformed entry is treated as absent. Lists are read one record at a time, and
//! the stored text of a list that could not be fully read is copied aside before anything
//! overwrites it.

mod file;
mod memory;

use crate::Result;
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key of the transaction list.
pub const TRANSACTIONS_KEY: &str = "quarter_transactions";

/// Key of the category list.
pub const CATEGORIES_KEY: &str = "quarter_categories";

/// Key of the "show balance" preference.
pub const BALANCE_VISIBLE_KEY: &str = "quarter_isBalanceVisible";

/// Appended to a list's key to name the copy of its text kept when some of it could not be read.
pub const UNREADABLE_SUFFIX: &str = "_unreadable";

/// A string-keyed store of string values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, `Ok(None)` if there is none.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<()>;
}

/// Serializes `value` as JSON and stores it under `key`.
pub async fn save<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json =
        serde_json::to_string(value).with_context(|| format!("Unable to serialize '{key}'"))?;
    store
        .set(key, json)
        .await
        .with_context(|| format!("Unable to save '{key}'"))?;
    trace!("Saved '{key}'");
    Ok(())
}

/// Loads and deserializes the value stored under `key`. Returns `None` if the entry does not
/// exist, cannot be read, or does not parse.
pub async fn load<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            trace!("No stored value for '{key}'");
            return None;
        }
        Err(e) => {
            warn!("Unable to read '{key}', treating it as empty: {e:#}");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Stored value for '{key}' is not valid, treating it as empty: {e}");
            None
        }
    }
}

/// Loads the JSON list stored under `key`, skipping records that do not deserialize as `T`.
///
/// Each skipped record is logged. If anything was skipped, or the entry is not a list at all, the
/// stored text is first copied to `<key>_unreadable` so that saving the remaining records does
/// not lose it.
///
/// # Errors
/// - The entry exists but cannot be read.
/// - The copy of unreadable text cannot be saved.
pub async fn load_list<S, T>(store: &S, key: &str) -> Result<Vec<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store
        .get(key)
        .await
        .with_context(|| format!("Unable to read '{key}'"))?
    {
        Some(raw) => raw,
        None => {
            trace!("No stored value for '{key}'");
            return Ok(Vec::new());
        }
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("Stored value for '{key}' is not a list, treating it as empty: {e}");
            keep_unreadable(store, key, raw).await?;
            return Ok(Vec::new());
        }
    };

    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping record {index} of '{key}': {e}");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        keep_unreadable(store, key, raw).await?;
    }
    Ok(records)
}

async fn keep_unreadable<S>(store: &S, key: &str, raw: String) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    let copy = format!("{key}{UNREADABLE_SUFFIX}");
    store
        .set(&copy, raw)
        .await
        .with_context(|| format!("Unable to keep a copy of '{key}' before it is overwritten"))?;
    warn!("The original text of '{key}' was saved as '{copy}'");
    Ok(())
}
