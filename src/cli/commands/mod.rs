//! CLI subcommand implementations

pub mod config;
pub mod guild;
pub mod guilds;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::tibia::TibiaClient;

/// Build the API client for the configured endpoint
fn client(config: &Config) -> Result<Arc<TibiaClient>> {
    let client = TibiaClient::new(&config.api.base_url)
        .with_context(|| format!("Failed to create HTTP client for {}", config.api.base_url))?;
    Ok(Arc::new(client))
}
