use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories, an initial `config.json` file with default
/// settings, and the category list with the default categories.
///
/// Running it again on an existing directory keeps the existing configuration and data.
///
/// # Arguments
/// - `quarter_home` - The directory that will be the root of data directory, e.g. `$HOME/quarter`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(quarter_home: &Path) -> Result<Out<()>> {
    let config = Config::create(quarter_home)
        .await
        .context("Unable to create the data directory and configs")?;
    let ledger = config.ledger().await?;
    Ok(format!(
        "Successfully created the quarter directory at {} with {} categories",
        config.root().display(),
        ledger.list_categories().len()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_twice_keeps_data() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("quarter");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("6 categories"));

        let config = Config::load(&home).await.unwrap();
        let mut ledger = config.ledger().await.unwrap();
        ledger.add_category("Regalos").await.unwrap();

        let out = init(&home).await.unwrap();
        assert!(out.message().contains("7 categories"));
    }
}
