//! Configuration file handling for quarter.
//!
//! The configuration file is stored at `$QUARTER_HOME/config.json` and contains settings such as
//! the number of backups to keep and the currency symbol used when printing amounts.

use crate::backup::Backup;
use crate::ledger::Ledger;
use crate::model::DEFAULT_CURRENCY_SYMBOL;
use crate::store::FileStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "quarter";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const STORE: &str = "store";
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$QUARTER_HOME` and from there it loads `$QUARTER_HOME/config.json`. It provides
/// paths to the other items that are expected in a certain location within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    store: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its subdirectories and an initial `config.json` file with
    /// default settings. An existing `config.json` is left as it is.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the quarter home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let store = root.join(STORE);
        utils::make_dir(&store).await?;
        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if utils::is_file(&config_path).await {
            ConfigFile::load(&config_path).await?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path).await?;
            config_file
        };

        Ok(Self {
            root,
            store,
            backups,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `quarter_home` exists and that the config file exists
    /// - load the config file
    /// - validate that the store and backups directories exist
    /// - return the loaded configuration object
    pub async fn load(quarter_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = quarter_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The quarter home directory is missing, run 'quarter init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !utils::is_file(&config_path).await {
            bail!(
                "The config file is missing '{}', run 'quarter init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            store: root.join(STORE),
            backups: root.join(BACKUPS),
            root,
            config_path,
            config_file,
        };
        if !config.store.is_dir() {
            bail!(
                "The store directory is missing '{}'",
                config.store.display()
            )
        }
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store_dir(&self) -> &Path {
        &self.store
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// Opens the file store and loads the ledger from it.
    pub async fn ledger(&self) -> Result<Ledger<FileStore>> {
        let store = FileStore::open(&self.store).await?;
        Ledger::load(store).await
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "quarter",
///   "config_version": 1,
///   "backup_copies": 5,
///   "currency_symbol": "$"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "quarter"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Prefix used when printing amounts
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("quarter_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.store_dir().is_dir());
        assert!(config.backups().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.backup_copies(), BACKUP_COPIES);
        assert_eq!(config.currency_symbol(), "$");
    }

    #[tokio::test]
    async fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.config_file, loaded.config_file);
    }

    #[tokio::test]
    async fn test_config_create_keeps_existing_settings() {
        let dir = TempDir::new().unwrap();
        let json = r#"{"app_name": "quarter", "config_version": 1, "backup_copies": 2, "currency_symbol": "€"}"#;
        utils::write(dir.path().join(CONFIG_JSON), json)
            .await
            .unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        assert_eq!(config.backup_copies(), 2);
        assert_eq!(config.currency_symbol(), "€");
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_without_init() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("config file is missing"));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        utils::write(&config_path, r#"{"app_name": "quarter", "config_version": 1}"#)
            .await
            .unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config.backup_copies, BACKUP_COPIES);
        assert_eq!(config.currency_symbol, DEFAULT_CURRENCY_SYMBOL);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        utils::write(
            &config_path,
            r#"{"app_name": "wrong_app", "config_version": 1, "backup_copies": 5}"#,
        )
        .await
        .unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let t = TempDir::new().unwrap();
        let path = t.path().join("file.json");
        let original = ConfigFile {
            backup_copies: 9,
            currency_symbol: "£".to_string(),
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        let read = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, read);
    }

    #[tokio::test]
    async fn test_config_ledger_is_seeded() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        let ledger = config.ledger().await.unwrap();
        assert_eq!(ledger.list_categories().len(), 6);
        assert!(config
            .store_dir()
            .join("quarter_categories.json")
            .is_file());
    }
}
