use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory, its `data` and `output` subdirectories and an initial
/// `config.json` file with default settings.
///
/// # Arguments
/// - `sales_home` - The directory that will be the root of the data directory, e.g. `$HOME/sales`
///
/// # Errors
/// - Returns an error if the directory already holds a config file.
/// - Returns an error if any file operations fail.
pub async fn init(sales_home: &Path) -> Result<Out<()>> {
    let config = Config::create(sales_home)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the sales directory at {}. Put your sales feed at {}",
        config.root().display(),
        config.input_path().display()
    )
    .into())
}
