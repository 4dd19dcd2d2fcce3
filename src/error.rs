//! Error types.
//!
//! Most functions return the crate's `Result`, which wraps `anyhow::Error`. Conditions that a
//! caller may want to tell apart (a duplicate category name, a malformed import file, ...) are
//! raised as a `LedgerError` inside the `anyhow::Error` and can be recovered with
//! `downcast_ref::<LedgerError>()`.

use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The ledger's domain errors.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum LedgerError {
    /// A field failed validation; nothing was changed.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A category with the same name (ignoring case) already exists.
    #[error("The category '{0}' already exists")]
    DuplicateCategory(String),

    /// The category cannot be deleted because transactions still reference it.
    #[error("The category '{name}' is used by {count} transaction(s) and cannot be deleted")]
    CategoryInUse { name: String, count: usize },

    #[error("No category exists with ID {0}")]
    CategoryNotFound(u64),

    #[error("No transaction exists with ID {0}")]
    TransactionNotFound(u64),

    /// The import document parsed but does not have the expected shape or content.
    #[error("Invalid ledger document: {0}")]
    InvalidDocument(String),

    /// The import document could not be parsed.
    #[error("Unable to parse ledger document: {0}")]
    ParseError(String),
}

impl LedgerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }
}

/// Returns the `LedgerError` carried by `e`, if there is one.
pub fn ledger_error(e: &Error) -> Option<&LedgerError> {
    e.downcast_ref::<LedgerError>()
}
