//! These structs provide the CLI interface for the sales CLI.

use crate::validate::Filters;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// sales: A command-line tool for analyzing a sales transaction feed.
///
/// The program reads a pipe-delimited sales feed, drops malformed and invalid records, applies
/// optional filters, enriches every record with data from a product catalog and writes both the
/// enriched records and an analytics report.
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
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. It creates --sales-home (by default
    /// $HOME/sales) with a `data` directory for the sales feed, an `output` directory for the
    /// report and a `config.json` with default settings.
    Init,
    /// Process the sales feed and write the enriched data and the report.
    Report(ReportArgs),
    /// Look up a single product in the catalog by its numeric id.
    Product(ProductArgs),
    /// Search the catalog for products matching a query.
    Search(SearchArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the sales data and configuration are held. Defaults to ~/sales
    #[arg(long, env = "SALES_HOME", default_value_t = default_sales_home())]
    sales_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, sales_home: PathBuf) -> Self {
        Self {
            log_level,
            sales_home: sales_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn sales_home(&self) -> &DisplayPath {
        &self.sales_home
    }
}

/// Args for the `sales report` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ReportArgs {
    /// The sales feed to read. Defaults to the input path in config.json.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Keep only transactions from this region (exact match).
    #[arg(long, conflicts_with = "interactive")]
    region: Option<String>,

    /// Keep only transactions whose total price is at least this amount.
    #[arg(long, conflicts_with = "interactive")]
    min_amount: Option<f64>,

    /// Keep only transactions whose total price is at most this amount.
    #[arg(long, conflicts_with = "interactive")]
    max_amount: Option<f64>,

    /// Ask for the filters on the terminal instead of taking them from flags.
    #[arg(long)]
    interactive: bool,

    /// Do not contact the product catalog; use the built-in sample catalog instead.
    #[arg(long)]
    offline: bool,
}

impl ReportArgs {
    pub fn new(input: Option<PathBuf>, filters: Filters) -> Self {
        Self {
            input,
            region: filters.region,
            min_amount: filters.min_amount,
            max_amount: filters.max_amount,
            interactive: false,
            offline: false,
        }
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// The filters given on the command line.
    pub fn filters(&self) -> Filters {
        Filters {
            region: self.region.clone(),
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        }
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn offline(&self) -> bool {
        self.offline
    }
}

/// Args for the `sales product` command.
#[derive(Debug, Parser, Clone)]
pub struct ProductArgs {
    /// The catalog id, e.g. 101 for the sales feed's P101.
    id: u32,

    /// Use the built-in sample catalog instead of the network.
    #[arg(long)]
    offline: bool,
}

impl ProductArgs {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn offline(&self) -> bool {
        self.offline
    }
}

/// Args for the `sales search` command.
#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    /// Text to search for.
    query: String,

    /// Use the built-in sample catalog instead of the network.
    #[arg(long)]
    offline: bool,
}

impl SearchArgs {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn offline(&self) -> bool {
        self.offline
    }
}

fn default_sales_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("sales"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --sales-home or SALES_HOME instead of relying on the default \
                sales home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("sales")
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
    pub fn path(&self) -> &Path {
        &self.0
    }
}
