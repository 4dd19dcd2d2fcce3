use crate::args::Visibility;
use crate::commands::Out;
use crate::preferences;
use crate::store::FileStore;
use crate::{Config, Result};

/// Prints or changes whether amounts are shown. Returns the setting after the change.
pub async fn visibility(config: Config, action: Visibility) -> Result<Out<bool>> {
    let store = FileStore::open(config.store_dir()).await?;
    let visible = match action {
        Visibility::Status => preferences::balance_visible(&store).await,
        Visibility::Show => {
            preferences::set_balance_visible(&store, true).await?;
            true
        }
        Visibility::Hide => {
            preferences::set_balance_visible(&store, false).await?;
            false
        }
        Visibility::Toggle => preferences::toggle_balance_visible(&store).await?,
    };
    let message = if visible {
        "Amounts are shown"
    } else {
        "Amounts are hidden"
    };
    Ok(Out::new(message, visible))
}
