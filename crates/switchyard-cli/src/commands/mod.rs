pub mod check;
pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};
use switchyard::config::DEFAULT_ROUTE_TABLE;
use switchyard::{Router, RouterConfig};

/// Loads the route table and registers every entry
///
/// Without `--config` the table is `./routes.toml`.
pub fn load_router(config: Option<&Path>) -> Result<Router<String>> {
    let table = match config {
        Some(path) => RouterConfig::load(path)?,
        None => RouterConfig::load_default()?,
    };
    table
        .build()
        .with_context(|| format!("Invalid route table: {:?}", table_path(config)))
}

pub fn table_path(config: Option<&Path>) -> &Path {
    config.unwrap_or_else(|| Path::new(DEFAULT_ROUTE_TABLE))
}
