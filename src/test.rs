//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::ledger::Ledger;
use crate::model::TransactionInput;
use crate::store::FileStore;
use crate::Config;
use tempfile::TempDir;

/// Test environment that sets up a quarter home directory with a Config and a seeded store.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with Config and the default categories.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("quarter");
        let config = Config::create(&root).await.unwrap();
        config.ledger().await.unwrap();

        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A scratch directory outside of the quarter home, for files given to import and export.
    pub fn scratch(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Loads the ledger from the store, as a command would.
    pub async fn ledger(&self) -> Ledger<FileStore> {
        self.config.ledger().await.unwrap()
    }

    /// Returns the ID of the category named `name`.
    pub async fn category_id(&self, name: &str) -> u64 {
        self.ledger()
            .await
            .categories()
            .find_by_name(name, None)
            .unwrap()
            .id()
    }

    /// Adds a transaction and returns its ID.
    pub async fn insert_test_transaction(
        &self,
        kind: &str,
        amount: &str,
        category: &str,
        date: &str,
    ) -> u64 {
        let category = self.category_id(category).await;
        let input = TransactionInput {
            kind: Some(kind.to_string()),
            amount: Some(amount.to_string()),
            category: Some(category),
            date: Some(date.to_string()),
            payment_method: Some("Efectivo".to_string()),
            details: None,
        };
        self.ledger()
            .await
            .add_transaction(&input)
            .await
            .unwrap()
            .id()
    }
}
