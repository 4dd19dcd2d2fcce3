//! These structs provide the CLI interface for the quarter CLI.

use crate::model::YearMonth;
use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// quarter: A command-line tool for keeping a personal budget.
///
/// Record your income and expenses, group them into categories, and see how much money is left
/// this month and how much you can spend per day until the month ends.
///
/// Data is kept in a directory (by default ~/quarter). Run `quarter init` once to create it.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and the default categories.
    ///
    /// This is the first command you should run. By default data is stored in $HOME/quarter; pass
    /// --quarter-home or set QUARTER_HOME to keep it somewhere else.
    Init,
    /// List, add, rename or delete categories.
    Category(CategoryArgs),
    /// List, add, update or delete transactions.
    Transaction(TransactionArgs),
    /// Show a month's income, expense, balance and daily budget.
    Summary(MonthArgs),
    /// Show the data behind the monthly charts.
    Chart(ChartArgs),
    /// Write the whole ledger to a JSON file.
    Export(ExportArgs),
    /// Replace the whole ledger with the contents of a JSON file written by `export`.
    Import(ImportArgs),
    /// Show or hide amounts in the output.
    Visibility(VisibilityArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where quarter data and configuration is held. Defaults to ~/quarter
    #[arg(long, env = "QUARTER_HOME", default_value_t = default_quarter_home())]
    quarter_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, quarter_home: PathBuf) -> Self {
        Self {
            log_level,
            quarter_home: quarter_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn quarter_home(&self) -> &DisplayPath {
        &self.quarter_home
    }
}

/// A month selector shared by the commands that show one month.
#[derive(Debug, Parser, Clone, Default)]
pub struct MonthArgs {
    /// The month to show, like 2024-01. Defaults to the current month.
    #[arg(long)]
    month: Option<YearMonth>,
}

impl MonthArgs {
    pub fn new(month: Option<YearMonth>) -> Self {
        Self { month }
    }

    /// The selected month, or the current month when none was given.
    pub fn month(&self) -> YearMonth {
        self.month.unwrap_or_else(YearMonth::current)
    }
}

/// (Not shown): Args for the `quarter category` command.
#[derive(Debug, Parser, Clone)]
pub struct CategoryArgs {
    #[command(subcommand)]
    action: CategorySubcommand,
}

impl CategoryArgs {
    pub fn new(action: CategorySubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &CategorySubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum CategorySubcommand {
    /// List all categories.
    List,
    /// Add a category. Names must be unique, ignoring case.
    Add {
        /// The name of the new category.
        name: String,
    },
    /// Rename a category.
    Rename {
        /// The ID of the category, as shown by `category list`.
        id: u64,
        /// The new name.
        name: String,
    },
    /// Delete a category. Categories that are used by a transaction cannot be deleted.
    Delete {
        /// The ID of the category, as shown by `category list`.
        id: u64,
    },
}

/// (Not shown): Args for the `quarter transaction` command.
#[derive(Debug, Parser, Clone)]
pub struct TransactionArgs {
    #[command(subcommand)]
    action: TransactionSubcommand,
}

impl TransactionArgs {
    pub fn new(action: TransactionSubcommand) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &TransactionSubcommand {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionSubcommand {
    /// List a month's transactions, newest first.
    List(MonthArgs),
    /// Add a transaction.
    Add(TransactionFieldArgs),
    /// Change some or all fields of a transaction. Fields that are not given keep their value.
    Update {
        /// The ID of the transaction, as shown by `transaction list`.
        id: u64,
        #[clap(flatten)]
        fields: TransactionFieldArgs,
    },
    /// Delete a transaction.
    Delete {
        /// The ID of the transaction, as shown by `transaction list`.
        id: u64,
    },
}

/// The editable fields of a transaction.
#[derive(Debug, Parser, Clone, Default)]
pub struct TransactionFieldArgs {
    /// Either "income" or "expense".
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// The amount, like 12.50. Must not be negative.
    #[arg(long)]
    pub amount: Option<String>,

    /// The category name or ID.
    #[arg(long)]
    pub category: Option<String>,

    /// The date, like 2024-01-31. Defaults to today when adding.
    #[arg(long)]
    pub date: Option<String>,

    /// How it was paid, for example "Efectivo" or "Tarjeta".
    #[arg(long)]
    pub payment_method: Option<String>,

    /// Free text describing the transaction.
    #[arg(long)]
    pub details: Option<String>,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Income and expense for each day of the month.
    #[default]
    Flow,
    /// Expenses grouped by category.
    Categories,
}

serde_plain::derive_display_from_serialize!(ChartKind);
serde_plain::derive_fromstr_from_deserialize!(ChartKind);

/// (Not shown): Args for the `quarter chart` command.
#[derive(Debug, Parser, Clone)]
pub struct ChartArgs {
    /// Which chart to show: "flow" or "categories"
    kind: ChartKind,

    #[clap(flatten)]
    month: MonthArgs,
}

impl ChartArgs {
    pub fn new(kind: ChartKind, month: MonthArgs) -> Self {
        Self { kind, month }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn month(&self) -> YearMonth {
        self.month.month()
    }
}

/// (Not shown): Args for the `quarter export` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportArgs {
    /// Where to write the file. Defaults to quarter_backup_YYYY-MM-DD.json in the current
    /// directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out }
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

/// (Not shown): Args for the `quarter import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The file to import.
    path: PathBuf,

    /// Confirm that all current transactions and categories will be replaced. A backup of the
    /// current data is written to $QUARTER_HOME/.backups first.
    #[arg(long)]
    yes: bool,
}

impl ImportArgs {
    pub fn new(path: impl Into<PathBuf>, yes: bool) -> Self {
        Self {
            path: path.into(),
            yes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Print the current setting.
    #[default]
    Status,
    /// Print amounts.
    Show,
    /// Mask amounts as ******.
    Hide,
    /// Switch between show and hide.
    Toggle,
}

serde_plain::derive_display_from_serialize!(Visibility);
serde_plain::derive_fromstr_from_deserialize!(Visibility);

/// (Not shown): Args for the `quarter visibility` command.
#[derive(Debug, Parser, Clone)]
pub struct VisibilityArgs {
    /// One of "status", "show", "hide" or "toggle"
    #[arg(default_value_t = Visibility::Status)]
    action: Visibility,
}

impl VisibilityArgs {
    pub fn new(action: Visibility) -> Self {
        Self { action }
    }

    pub fn action(&self) -> Visibility {
        self.action
    }
}

fn default_quarter_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("quarter"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --quarter-home or QUARTER_HOME instead of relying on the \
                default quarter home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("quarter")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["quarter", "--quarter-home", "/tmp/q"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_transaction_add() {
        let args = parse(&[
            "transaction",
            "add",
            "--type",
            "expense",
            "--amount",
            "12.50",
            "--category",
            "Comida",
            "--payment-method",
            "Tarjeta",
        ]);
        let Command::Transaction(t) = args.command() else {
            panic!("wrong command {:?}", args.command());
        };
        let TransactionSubcommand::Add(fields) = t.action() else {
            panic!("wrong action {:?}", t.action());
        };
        assert_eq!(fields.kind.as_deref(), Some("expense"));
        assert_eq!(fields.amount.as_deref(), Some("12.50"));
        assert_eq!(fields.category.as_deref(), Some("Comida"));
        assert_eq!(fields.payment_method.as_deref(), Some("Tarjeta"));
        assert!(fields.date.is_none());
        assert_eq!(args.common().quarter_home().path(), Path::new("/tmp/q"));
    }

    #[test]
    fn test_parse_chart_with_month() {
        let args = parse(&["chart", "categories", "--month", "2024-02"]);
        let Command::Chart(chart) = args.command() else {
            panic!("wrong command {:?}", args.command());
        };
        assert_eq!(chart.kind(), ChartKind::Categories);
        assert_eq!(chart.month(), YearMonth::new(2024, 2).unwrap());
    }

    #[test]
    fn test_parse_bad_month_is_rejected() {
        let result =
            Args::try_parse_from(["quarter", "summary", "--month", "2024-13"].iter().copied());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_visibility_defaults_to_status() {
        let args = parse(&["visibility"]);
        let Command::Visibility(v) = args.command() else {
            panic!("wrong command {:?}", args.command());
        };
        assert_eq!(v.action(), Visibility::Status);
    }

    #[test]
    fn test_month_args_default_to_current() {
        assert_eq!(MonthArgs::default().month(), YearMonth::current());
    }
}
