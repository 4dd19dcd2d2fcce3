//! Category command handlers.

use crate::commands::{plural, Out};
use crate::error::LedgerError;
use crate::model::Category;
use crate::{Config, Result};
use serde::Serialize;

/// A category together with the number of transactions that use it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryUsage {
    pub id: u64,
    pub name: String,
    pub transactions: usize,
}

/// Lists all categories in the order they were created.
pub async fn list_categories(config: Config) -> Result<Out<Vec<CategoryUsage>>> {
    let ledger = config.ledger().await?;
    let usage: Vec<CategoryUsage> = ledger
        .list_categories()
        .iter()
        .map(|c| CategoryUsage {
            id: c.id(),
            name: c.name().to_string(),
            transactions: ledger.transactions().count_referencing(c.id()),
        })
        .collect();

    let mut message = format!(
        "{} {}",
        usage.len(),
        plural(usage.len(), "category", "categories")
    );
    for c in &usage {
        message.push_str(&format!(
            "\n  {:>15}  {} ({} {})",
            c.id,
            c.name,
            c.transactions,
            plural(c.transactions, "transaction", "transactions")
        ));
    }
    Ok(Out::new(message, usage))
}

/// Adds a category named `name`.
///
/// # Errors
/// - `LedgerError::Validation` if the name is blank.
/// - `LedgerError::DuplicateCategory` if the name is taken, ignoring case.
pub async fn add_category(config: Config, name: &str) -> Result<Out<Category>> {
    let mut ledger = config.ledger().await?;
    let category = ledger.add_category(name).await?;
    Ok(Out::new(
        format!("Added category '{}' with ID {}", category.name(), category.id()),
        category,
    ))
}

/// Renames category `id` to `name`.
///
/// # Errors
/// - `LedgerError::CategoryNotFound` if there is no such category.
/// - `LedgerError::Validation` or `LedgerError::DuplicateCategory` if the name is not usable.
pub async fn rename_category(config: Config, id: u64, name: &str) -> Result<Out<Category>> {
    let mut ledger = config.ledger().await?;
    let old_name = ledger.category_name(id).to_string();
    let category = ledger
        .rename_category(id, name)
        .await?
        .ok_or(LedgerError::CategoryNotFound(id))?;
    Ok(Out::new(
        format!("Renamed category '{old_name}' to '{}'", category.name()),
        category,
    ))
}

/// Deletes category `id`.
///
/// # Errors
/// - `LedgerError::CategoryInUse` while transactions reference the category.
/// - `LedgerError::CategoryNotFound` if there is no such category.
pub async fn delete_category(config: Config, id: u64) -> Result<Out<Category>> {
    let mut ledger = config.ledger().await?;
    let category = ledger.delete_category(id).await?;
    Ok(Out::new(
        format!("Deleted category '{}'", category.name()),
        category,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ledger_error;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_categories_counts_usage() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("expense", "5", "Comida", "2024-01-02")
            .await;
        env.insert_test_transaction("expense", "7", "Comida", "2024-01-03")
            .await;

        let out = list_categories(env.config()).await.unwrap();
        let usage = out.structure().unwrap();
        assert_eq!(usage.len(), 6);
        assert_eq!(usage[0].name, "Comida");
        assert_eq!(usage[0].transactions, 2);
        assert_eq!(usage[1].transactions, 0);
        assert!(out.message().starts_with("6 categories"));
    }

    #[tokio::test]
    async fn test_add_rename_delete_category() {
        let env = TestEnv::new().await;
        let added = add_category(env.config(), "  Regalos ").await.unwrap();
        let id = added.structure().unwrap().id();
        assert_eq!(added.structure().unwrap().name(), "Regalos");

        let renamed = rename_category(env.config(), id, "Mascotas").await.unwrap();
        assert_eq!(renamed.message(), "Renamed category 'Regalos' to 'Mascotas'");

        delete_category(env.config(), id).await.unwrap();
        assert!(env.ledger().await.categories().get(id).is_none());
    }

    #[tokio::test]
    async fn test_rename_unknown_category() {
        let env = TestEnv::new().await;
        let err = rename_category(env.config(), 42, "Nada").await.unwrap_err();
        assert_eq!(ledger_error(&err), Some(&LedgerError::CategoryNotFound(42)));
    }

    #[tokio::test]
    async fn test_delete_category_in_use() {
        let env = TestEnv::new().await;
        env.insert_test_transaction("expense", "5", "Ocio", "2024-01-02")
            .await;
        let id = env.category_id("Ocio").await;

        let err = delete_category(env.config(), id).await.unwrap_err();
        assert!(matches!(
            ledger_error(&err),
            Some(LedgerError::CategoryInUse { count: 1, .. })
        ));
        assert!(env.ledger().await.categories().get(id).is_some());
    }
}
