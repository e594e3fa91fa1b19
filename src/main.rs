mod app;
mod cli;
mod config;
mod state;
mod task;
mod tibia;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::tibia::{GuildGateway, TibiaClient};

/// Set up tracing. The GUI logs freely; headless commands keep stdout clean.
fn init_logging(headless: bool, verbose: bool) {
    let default_filter = match (headless, verbose) {
        (false, _) | (true, true) => "guildwatch=debug,info",
        (true, false) => "warn",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.command.is_some(), cli.output.verbose);

    if cli.command.is_some() {
        return cli::run(cli).await;
    }

    tracing::info!("Starting Guildwatch");

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    cli::apply_overrides(&mut config, cli.world.as_deref());

    let gateway: Arc<dyn GuildGateway> = Arc::new(TibiaClient::new(&config.api.base_url)?);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([760.0, 720.0])
        .with_min_inner_size([520.0, 420.0])
        .with_title(format!("Guildwatch - {}", config.tracker.world));

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    eframe::run_native(
        "Guildwatch",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::GuildwatchApp::new(cc, config, gateway)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
