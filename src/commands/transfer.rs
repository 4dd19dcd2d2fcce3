//! Export and import command handlers.

use crate::backup::PRE_IMPORT;
use crate::commands::Out;
use crate::transfer::{self, ImportSummary};
use crate::{utils, Config, Result};
use anyhow::{bail, Context};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// The file name used by `export` when no output path is given, e.g.
/// `quarter_backup_2024-01-31.json`.
pub fn default_export_name() -> String {
    format!("quarter_backup_{}.json", Local::now().format("%Y-%m-%d"))
}

/// What `export` wrote.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub transactions: usize,
    pub categories: usize,
}

/// Writes the whole ledger to `out`, or to `quarter_backup_YYYY-MM-DD.json` in the current
/// directory.
pub async fn export(config: Config, out: Option<&Path>) -> Result<Out<ExportSummary>> {
    let ledger = config.ledger().await?;
    let document = transfer::export(&ledger);
    let path = match out {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_export_name()),
    };
    utils::write(&path, document.to_json()?).await?;

    let summary = ExportSummary {
        path,
        transactions: document.transactions.len(),
        categories: document.categories.len(),
    };
    Ok(Out::new(
        format!(
            "Exported {} transactions and {} categories to {}",
            summary.transactions,
            summary.categories,
            summary.path.display()
        ),
        summary,
    ))
}

/// Replaces the whole ledger with the document at `path`.
///
/// The replacement is destructive, so nothing happens unless `confirmed` is true. Once the file
/// has been accepted, and before replacing, the current ledger is saved to the backups directory.
///
/// # Errors
/// - Returns an error if `confirmed` is false.
/// - `LedgerError::ParseError` or `LedgerError::InvalidDocument` if the file is rejected, in which
///   case the ledger is unchanged.
pub async fn import(config: Config, path: &Path, confirmed: bool) -> Result<Out<ImportSummary>> {
    if !confirmed {
        bail!(
            "Importing replaces all of your transactions and categories. Run the command again \
            with --yes to confirm."
        )
    }
    let text = utils::read(path)
        .await
        .with_context(|| format!("Unable to read the import file {}", path.display()))?;

    let document = transfer::LedgerDocument::parse(&text)?;

    let mut ledger = config.ledger().await?;
    let backup = config
        .backup()
        .save_json(PRE_IMPORT, &transfer::export(&ledger))
        .await
        .context("Unable to back up the current data before importing")?;
    info!("Saved the current data to {}", backup.display());

    let summary = transfer::import_document(&mut ledger, document).await?;
    Ok(Out::new(
        format!(
            "Imported {} transactions and {} categories from {}",
            summary.transactions,
            summary.categories,
            path.display()
        ),
        summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ledger_error, LedgerError};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_export_then_import_into_another_home() {
        let source = TestEnv::new().await;
        source
            .insert_test_transaction("income", "1000", "Sueldo", "2024-01-01")
            .await;
        source
            .insert_test_transaction("expense", "200.35", "Comida", "2024-01-05")
            .await;
        let file = source.scratch().join("export.json");
        let out = export(source.config(), Some(file.as_path())).await.unwrap();
        assert_eq!(out.structure().unwrap().transactions, 2);
        assert!(file.is_file());

        let target = TestEnv::new().await;
        target
            .insert_test_transaction("expense", "9", "Ocio", "2023-12-24")
            .await;
        let out = import(target.config(), &file, true).await.unwrap();
        assert_eq!(
            out.structure().unwrap(),
            &ImportSummary {
                transactions: 2,
                categories: 6
            }
        );

        let imported = target.ledger().await;
        let exported = source.ledger().await;
        assert_eq!(imported.transactions(), exported.transactions());
        assert_eq!(imported.categories(), exported.categories());

        // The replaced data was backed up.
        let mut backups = utils::read_dir(target.config().backups()).await.unwrap();
        let entry = backups.next_entry().await.unwrap().unwrap();
        let name = entry.file_name().to_string_lossy().to_string();
        assert!(name.starts_with("pre-import."), "{name}");
        let backup = utils::read(&entry.path()).await.unwrap();
        let document = transfer::LedgerDocument::parse(&backup).unwrap();
        assert_eq!(document.transactions.len(), 1);
    }

    #[tokio::test]
    async fn test_import_requires_confirmation() {
        let env = TestEnv::new().await;
        let file = env.scratch().join("export.json");
        export(env.config(), Some(file.as_path())).await.unwrap();
        let err = import(env.config(), &file, false).await.unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }

    #[tokio::test]
    async fn test_import_rejected_file_leaves_data() {
        let env = TestEnv::new().await;
        let id = env
            .insert_test_transaction("expense", "9", "Ocio", "2023-12-24")
            .await;
        let file = env.scratch().join("bad.json");
        utils::write(&file, r#"{"transactions": []}"#).await.unwrap();

        let err = import(env.config(), &file, true).await.unwrap_err();
        assert!(matches!(
            ledger_error(&err),
            Some(LedgerError::InvalidDocument(_))
        ));
        assert!(env.ledger().await.get_transaction(id).is_some());

        // A rejected file does not take the place of an older backup.
        let mut backups = utils::read_dir(env.config().backups()).await.unwrap();
        assert!(backups.next_entry().await.unwrap().is_none());
    }

    #[test]
    fn test_default_export_name() {
        let name = default_export_name();
        assert!(name.starts_with("quarter_backup_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "quarter_backup_2024-01-31.json".len());
    }
}
