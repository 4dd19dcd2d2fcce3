use clap::Parser;
use quarter::args::{Args, CategorySubcommand, ChartKind, Command, TransactionSubcommand};
use quarter::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().quarter_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Category(category_args) => {
            let config = Config::load(home).await?;
            match category_args.action() {
                CategorySubcommand::List => commands::list_categories(config).await?.print(),
                CategorySubcommand::Add { name } => {
                    commands::add_category(config, name).await?.print()
                }
                CategorySubcommand::Rename { id, name } => {
                    commands::rename_category(config, *id, name).await?.print()
                }
                CategorySubcommand::Delete { id } => {
                    commands::delete_category(config, *id).await?.print()
                }
            }
        }

        Command::Transaction(transaction_args) => {
            let config = Config::load(home).await?;
            match transaction_args.action() {
                TransactionSubcommand::List(month_args) => {
                    commands::list_transactions(config, month_args.month())
                        .await?
                        .print()
                }
                TransactionSubcommand::Add(fields) => {
                    commands::add_transaction(config, fields.clone())
                        .await?
                        .print()
                }
                TransactionSubcommand::Update { id, fields } => {
                    commands::update_transaction(config, *id, fields.clone())
                        .await?
                        .print()
                }
                TransactionSubcommand::Delete { id } => {
                    commands::delete_transaction(config, *id).await?.print()
                }
            }
        }

        Command::Summary(month_args) => {
            let config = Config::load(home).await?;
            commands::summary(config, month_args.month()).await?.print()
        }

        Command::Chart(chart_args) => {
            let config = Config::load(home).await?;
            match chart_args.kind() {
                ChartKind::Flow => commands::chart_flow(config, chart_args.month())
                    .await?
                    .print(),
                ChartKind::Categories => commands::chart_categories(config, chart_args.month())
                    .await?
                    .print(),
            }
        }

        Command::Export(export_args) => {
            let config = Config::load(home).await?;
            commands::export(config, export_args.out()).await?.print()
        }

        Command::Import(import_args) => {
            let config = Config::load(home).await?;
            commands::import(config, import_args.path(), import_args.yes())
                .await?
                .print()
        }

        Command::Visibility(visibility_args) => {
            let config = Config::load(home).await?;
            commands::visibility(config, visibility_args.action())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
