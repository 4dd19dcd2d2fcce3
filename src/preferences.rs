//! User preferences stored alongside the ledger.

use crate::store::{self, KeyValueStore, BALANCE_VISIBLE_KEY};
use crate::Result;

/// Whether balances and amounts should be shown. Defaults to `true` when never set.
pub async fn balance_visible<S>(store: &S) -> bool
where
    S: KeyValueStore + ?Sized,
{
    store::load(store, BALANCE_VISIBLE_KEY)
        .await
        .unwrap_or(true)
}

pub async fn set_balance_visible<S>(store: &S, visible: bool) -> Result<()>
where
    S: KeyValueStore + ?Sized,
{
    store::save(store, BALANCE_VISIBLE_KEY, &visible).await
}

/// Flips the preference and returns the new value.
pub async fn toggle_balance_visible<S>(store: &S) -> Result<bool>
where
    S: KeyValueStore + ?Sized,
{
    let visible = !balance_visible(store).await;
    set_balance_visible(store, visible).await?;
    Ok(visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_defaults_to_visible() {
        let store = MemoryStore::default();
        assert!(balance_visible(&store).await);
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let store = MemoryStore::default();
        assert!(!toggle_balance_visible(&store).await.unwrap());
        assert!(!balance_visible(&store).await);
        assert_eq!(store.raw(BALANCE_VISIBLE_KEY).as_deref(), Some("false"));
        assert!(toggle_balance_visible(&store).await.unwrap());
    }
}
