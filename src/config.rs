//! Configuration file handling for the sales report tool.
//!
//! The configuration file is stored at `$SALES_HOME/config.json` and contains settings for the
//! product catalog, the report layout and the locations of the input and output files.

use crate::report::ReportOptions;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "sales";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA: &str = "data";
const OUTPUT: &str = "output";
const SALES_DATA_TXT: &str = "sales_data.txt";
const ENRICHED_SALES_DATA_TXT: &str = "enriched_sales_data.txt";
const SALES_REPORT_TXT: &str = "sales_report.txt";
const CATALOG_URL: &str = "https://dummyjson.com/products";
const CATALOG_LIMIT: u32 = 100;
const CATALOG_TIMEOUT_SECS: u64 = 10;
const TOP_N: usize = 5;
const LOW_THRESHOLD: i64 = 10;
const CURRENCY: &str = "₹";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SALES_HOME` and from there it loads `$SALES_HOME/config.json`. It provides paths
/// to the input and output files, which are either configured or expected in a certain location
/// within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, its `data` and `output` subdirectories and an initial
    /// `config.json` file with default settings.
    ///
    /// # Errors
    /// - Returns an error if the config file already exists.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the sales home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            )
        }

        utils::make_dir(root.join(DATA)).await?;
        utils::make_dir(root.join(OUTPUT)).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the `sales_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(sales_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = sales_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Sales home is missing, run 'sales init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn catalog_url(&self) -> &str {
        &self.config_file.catalog_url
    }

    pub fn catalog_limit(&self) -> u32 {
        self.config_file.catalog_limit
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.catalog_timeout_secs)
    }

    /// Report settings taken from the config file.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            top_n: self.config_file.top_n,
            low_threshold: self.config_file.low_threshold,
            currency: self.config_file.currency.clone(),
        }
    }

    /// The sales feed. Defaults to `$SALES_HOME/data/sales_data.txt`.
    pub fn input_path(&self) -> PathBuf {
        self.resolve(self.config_file.input_path.as_deref(), || {
            PathBuf::from(DATA).join(SALES_DATA_TXT)
        })
    }

    /// The enriched-data output. Defaults to `$SALES_HOME/data/enriched_sales_data.txt`.
    pub fn enriched_path(&self) -> PathBuf {
        self.resolve(self.config_file.enriched_path.as_deref(), || {
            PathBuf::from(DATA).join(ENRICHED_SALES_DATA_TXT)
        })
    }

    /// The report output. Defaults to `$SALES_HOME/output/sales_report.txt`.
    pub fn report_path(&self) -> PathBuf {
        self.resolve(self.config_file.report_path.as_deref(), || {
            PathBuf::from(OUTPUT).join(SALES_REPORT_TXT)
        })
    }

    /// Uses `configured` or the default, resolving a relative path against the home directory.
    fn resolve(&self, configured: Option<&Path>, default: impl FnOnce() -> PathBuf) -> PathBuf {
        let p = configured.map(Path::to_path_buf).unwrap_or_else(default);
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "sales",
///   "config_version": 1,
///   "catalog_url": "https://dummyjson.com/products",
///   "catalog_limit": 100,
///   "catalog_timeout_secs": 10,
///   "top_n": 5,
///   "low_threshold": 10,
///   "currency": "₹",
///   "input_path": "data/sales_data.txt"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "sales"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Product listing endpoint
    #[serde(default = "default_catalog_url")]
    catalog_url: String,

    /// Number of products requested from the catalog
    #[serde(default = "default_catalog_limit")]
    catalog_limit: u32,

    /// Timeout for the single catalog request
    #[serde(default = "default_catalog_timeout_secs")]
    catalog_timeout_secs: u64,

    /// Rows in the top products and top customers tables
    #[serde(default = "default_top_n")]
    top_n: usize,

    /// Products selling fewer units than this are low performers
    #[serde(default = "default_low_threshold")]
    low_threshold: i64,

    /// Currency symbol used in the report
    #[serde(default = "default_currency")]
    currency: String,

    /// Path to the sales feed (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_path: Option<PathBuf>,

    /// Path to the enriched-data output (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enriched_path: Option<PathBuf>,

    /// Path to the report output (optional, relative to the home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    report_path: Option<PathBuf>,
}

fn default_catalog_url() -> String {
    CATALOG_URL.to_string()
}

fn default_catalog_limit() -> u32 {
    CATALOG_LIMIT
}

fn default_catalog_timeout_secs() -> u64 {
    CATALOG_TIMEOUT_SECS
}

fn default_top_n() -> usize {
    TOP_N
}

fn default_low_threshold() -> i64 {
    LOW_THRESHOLD
}

fn default_currency() -> String {
    CURRENCY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            catalog_url: default_catalog_url(),
            catalog_limit: CATALOG_LIMIT,
            catalog_timeout_secs: CATALOG_TIMEOUT_SECS,
            top_n: TOP_N,
            low_threshold: LOW_THRESHOLD,
            currency: default_currency(),
            input_path: None,
            enriched_path: None,
            report_path: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it is not a sales config
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.catalog_timeout_secs > 0,
            "Invalid catalog_timeout_secs in config file: must be greater than zero"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
