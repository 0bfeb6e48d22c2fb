use clap::Parser;
use sales_report::args::{Args, Command};
use sales_report::{commands, Config, Mode, Result};
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
    let home = args.common().sales_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Report(report_args) => {
            let config = Config::load(home).await?;
            let mode = mode(report_args.offline());
            commands::report(config, report_args.clone(), mode)
                .await?
                .print()
        }

        Command::Product(product_args) => {
            let config = Config::load(home).await?;
            let mode = mode(product_args.offline());
            commands::product(config, product_args.id(), mode)
                .await?
                .print()
        }

        Command::Search(search_args) => {
            let config = Config::load(home).await?;
            let mode = mode(search_args.offline());
            commands::search(config, search_args.query(), mode)
                .await?
                .print()
        }
    };
    Ok(())
}

/// SALES_REPORT_OFFLINE set and non-empty has the same effect as --offline.
fn mode(offline: bool) -> Mode {
    if offline {
        Mode::Offline
    } else {
        Mode::from_env()
    }
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
                "sales_report={},{}={}",
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
