pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod preferences;
pub mod store;
pub mod summary;
pub mod transfer;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::ledger_error;
pub use error::Error;
pub use error::LedgerError;
pub use error::Result;
pub use ledger::Ledger;
