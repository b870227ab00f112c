//! Configuration commands.

use std::path::Path;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Dump the effective configuration to stdout.
pub fn dump(config: &AppConfig, path: &Path) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {}", e)))?;
    println!("# config.toml ({})", path.display());
    println!("{}", toml_str);
    Ok(())
}

/// Show the configuration and store file paths.
pub fn path(config_path: &Path, store_path: &Path) -> CliResult<()> {
    println!("config: {}", config_path.display());
    println!("store: {}", store_path.display());
    Ok(())
}
