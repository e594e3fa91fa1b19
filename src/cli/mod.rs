//! CLI module for Guildwatch
//!
//! Without a subcommand the GUI starts; every subcommand runs headless.

mod commands;
mod output;

use clap::{Parser, Subcommand};

use crate::config::Config;

pub use output::OutputFormat;

/// Guildwatch - Tibia guild roster tracker
#[derive(Parser, Debug)]
#[command(name = "guildwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[command(flatten)]
    pub output: OutputOptions,

    /// World to use instead of the configured one
    #[arg(long, global = true)]
    pub world: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output formatting options
#[derive(Parser, Debug, Clone)]
pub struct OutputOptions {
    /// Output in JSON format (for machine parsing)
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl OutputOptions {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the active guilds of the world
    Guilds {
        /// Only show guilds whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show a guild's roster, online members first
    Guild {
        /// Guild name
        name: String,

        /// Hide offline members
        #[arg(long)]
        online_only: bool,
    },

    /// Keep a guild's roster refreshed and print every update
    Watch {
        /// Guild name
        name: String,

        /// Seconds between refreshes (defaults to the configured interval)
        #[arg(long)]
        interval: Option<u64>,

        /// Stop after this many successful updates
        #[arg(long)]
        count: Option<usize>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: commands::config::ConfigCommands,
    },
}

/// Apply command-line overrides to the loaded configuration
pub fn apply_overrides(config: &mut Config, world: Option<&str>) {
    if let Some(world) = world {
        config.tracker.world = world.to_string();
    }
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.output.format();
    let quiet = cli.output.quiet;

    let Some(command) = cli.command else {
        anyhow::bail!("No command given");
    };

    let load_config = || -> anyhow::Result<Config> {
        let mut config = Config::load()?;
        apply_overrides(&mut config, cli.world.as_deref());
        Ok(config)
    };

    match command {
        Commands::Guilds { filter } => {
            commands::guilds::run(&load_config()?, filter.as_deref(), format).await
        }
        Commands::Guild { name, online_only } => {
            commands::guild::run(&load_config()?, &name, online_only, format).await
        }
        Commands::Watch {
            name,
            interval,
            count,
        } => {
            let mut config = load_config()?;
            if let Some(secs) = interval {
                config.tracker.refresh_interval_secs = secs;
            }
            commands::watch::run(&config, &name, count, format, quiet).await
        }
        Commands::Config { command } => commands::config::run(command, format, quiet).await,
    }
}
