use crate::store::KeyValueStore;
use crate::{utils, Result};
use anyhow::bail;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Stores each key as `<key>.json` in a directory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Uses `dir` for storage, creating it if it does not exist.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("Invalid storage key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        if !utils::is_file(&path).await {
            return Ok(None);
        }
        Ok(Some(utils::read(&path).await?))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path(key)?;
        utils::write_replace(&path, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{load, save};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let store_dir = dir.path().join("store");
        {
            let store = FileStore::open(&store_dir).await.unwrap();
            save(&store, "quarter_isBalanceVisible", &false)
                .await
                .unwrap();
        }
        let store = FileStore::open(&store_dir).await.unwrap();
        let visible: Option<bool> = load(&store, "quarter_isBalanceVisible").await;
        assert_eq!(visible, Some(false));
        assert!(store_dir.join("quarter_isBalanceVisible.json").is_file());
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert_eq!(store.get("nothing_here").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        assert!(store.set("../escape", "1".to_string()).await.is_err());
        assert!(store.get("").await.is_err());
    }
}
