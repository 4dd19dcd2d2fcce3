//! Types that represent the core data model, such as `Transaction` and `Category`.
mod amount;
mod category;
mod id;
mod month;
mod transaction;

pub use amount::{format_money, Amount, AmountError, DEFAULT_CURRENCY_SYMBOL};
pub use category::{Categories, Category, DEFAULT_CATEGORIES, UNCATEGORIZED};
pub use id::IdGenerator;
pub use month::YearMonth;
pub use transaction::{
    sorted_for_display, Transaction, TransactionFields, TransactionInput, TransactionType,
    Transactions,
};
