//! Command handlers for the quarter CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod category;
mod init;
mod summary;
mod transaction;
mod transfer;
mod visibility;

use crate::model::format_money;
use crate::preferences;
use crate::store::KeyValueStore;
use crate::Config;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use category::{
    add_category, delete_category, list_categories, rename_category, CategoryUsage,
};
pub use init::init;
pub use summary::{chart_categories, chart_flow, summary};
pub use transaction::{add_transaction, delete_transaction, list_transactions, update_transaction};
pub use transfer::{default_export_name, export, import, ExportSummary};
pub use visibility::visibility;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Shown in place of an amount while balances are hidden.
pub(crate) const MASK: &str = "******";

/// Formats amounts with the configured currency symbol, or masks them when the user has hidden
/// balances.
#[derive(Debug, Clone)]
pub(crate) struct Money {
    symbol: String,
    visible: bool,
}

impl Money {
    pub(crate) async fn new<S>(config: &Config, store: &S) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        Self {
            symbol: config.currency_symbol().to_string(),
            visible: preferences::balance_visible(store).await,
        }
    }

    pub(crate) fn format(&self, value: Decimal) -> String {
        if self.visible {
            format_money(value, &self.symbol)
        } else {
            MASK.to_string()
        }
    }
}

/// Returns `singular` or `plural` depending on `count`.
pub(crate) fn plural<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_money_masks_when_hidden() {
        let env = TestEnv::new().await;
        let store = MemoryStore::default();
        let value = Decimal::from_str("1234.5").unwrap();

        let money = Money::new(&env.config(), &store).await;
        assert_eq!(money.format(value), "$1,234.50");

        preferences::set_balance_visible(&store, false).await.unwrap();
        let money = Money::new(&env.config(), &store).await;
        assert_eq!(money.format(value), MASK);
    }

    #[test]
    fn test_out_from_message() {
        let out: Out<()> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
    }
}
