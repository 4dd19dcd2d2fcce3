//! Export and import of the complete ledger as a single JSON document.
//!
//! ```json
//! {
//!   "transactions": [ { "id": 1, "type": "income", "amount": 1000, ... } ],
//!   "categories": [ { "id": 2, "name": "Sueldo" } ]
//! }
//! ```

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::model::{Categories, Transactions};
use crate::store::KeyValueStore;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

const TRANSACTIONS_FIELD: &str = "transactions";
const CATEGORIES_FIELD: &str = "categories";

/// The export/import file format.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub transactions: Transactions,
    pub categories: Categories,
}

impl LedgerDocument {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Unable to serialize the ledger")
    }

    /// Parses and validates a document.
    ///
    /// # Errors
    /// - `LedgerError::ParseError` if `text` is not JSON, or a record cannot be read.
    /// - `LedgerError::InvalidDocument` if the top level is not an object with `transactions`
    ///   and `categories` arrays, or if the records break a ledger rule (blank or duplicate
    ///   category names, duplicate IDs).
    pub fn parse(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| LedgerError::ParseError(e.to_string()))?;

        let object = value.as_object().ok_or_else(|| {
            LedgerError::InvalidDocument("expected a JSON object at the top level".to_string())
        })?;
        for field in [TRANSACTIONS_FIELD, CATEGORIES_FIELD] {
            match object.get(field) {
                Some(serde_json::Value::Array(_)) => {}
                Some(_) => {
                    return Err(LedgerError::InvalidDocument(format!(
                        "the '{field}' field must be a list"
                    ))
                    .into())
                }
                None => {
                    return Err(LedgerError::InvalidDocument(format!(
                        "the '{field}' field is missing"
                    ))
                    .into())
                }
            }
        }

        let document: LedgerDocument =
            serde_json::from_value(value).map_err(|e| LedgerError::ParseError(e.to_string()))?;
        document.check()?;
        Ok(document)
    }

    fn check(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut category_ids = HashSet::new();
        for category in &self.categories {
            let name = category.name().trim();
            if name.is_empty() {
                return Err(invalid(format!(
                    "category {} has an empty name",
                    category.id()
                )));
            }
            if !names.insert(name.to_lowercase()) {
                return Err(invalid(format!("the category '{name}' appears more than once")));
            }
            if !category_ids.insert(category.id()) {
                return Err(invalid(format!(
                    "the category ID {} appears more than once",
                    category.id()
                )));
            }
        }

        let mut transaction_ids = HashSet::new();
        for transaction in &self.transactions {
            if !transaction_ids.insert(transaction.id()) {
                return Err(invalid(format!(
                    "the transaction ID {} appears more than once",
                    transaction.id()
                )));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> anyhow::Error {
    LedgerError::InvalidDocument(message).into()
}

/// What an import replaced the ledger with.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct ImportSummary {
    pub transactions: usize,
    pub categories: usize,
}

/// Returns a document holding the full ledger.
pub fn export<S>(ledger: &Ledger<S>) -> LedgerDocument
where
    S: KeyValueStore,
{
    LedgerDocument {
        transactions: ledger.transactions().clone(),
        categories: ledger.categories().clone(),
    }
}

/// Replaces the ledger with the contents of `text`. This discards all current data; callers
/// must confirm with the user first. If `text` is rejected, the ledger is left untouched.
pub async fn import<S>(ledger: &mut Ledger<S>, text: &str) -> Result<ImportSummary>
where
    S: KeyValueStore,
{
    let document = LedgerDocument::parse(text)?;
    import_document(ledger, document).await
}

/// Replaces the ledger with an already parsed `document`.
pub async fn import_document<S>(
    ledger: &mut Ledger<S>,
    document: LedgerDocument,
) -> Result<ImportSummary>
where
    S: KeyValueStore,
{
    let summary = ImportSummary {
        transactions: document.transactions.len(),
        categories: document.categories.len(),
    };
    ledger
        .replace(document.transactions, document.categories)
        .await?;
    info!(
        "Imported {} transactions and {} categories",
        summary.transactions, summary.categories
    );
    Ok(summary)
}
