//! Continuous roster watch command
//!
//! Runs the same refresh coordinator as the GUI, without a window: the guild
//! is selected once and every stored snapshot or failure is printed.

use anyhow::Result;
use serde::Serialize;

use crate::cli::commands::guild::format_roster;
use crate::cli::output::{print_error, print_json_line, print_success, OutputFormat};
use crate::config::Config;
use crate::state::{Coordinator, ErrorInfo, StateEvent};
use crate::tibia::GuildSnapshot;

/// One line of JSON output per update
#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum WatchLine<'a> {
    Updated {
        at: String,
        snapshot: &'a GuildSnapshot,
    },
    Failed {
        #[serde(flatten)]
        error: &'a ErrorInfo,
    },
}

pub async fn run(
    config: &Config,
    name: &str,
    count: Option<usize>,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Guild name must not be empty");
    }

    let client = super::client(config)?;
    let mut settings = config.refresh_settings();
    settings.auto_refresh = true;
    let interval = settings.interval;

    let mut coordinator = Coordinator::new(client, settings);
    for event in coordinator.select_guild(name) {
        event.log();
    }

    print_success(
        &format!(
            "Watching {} on {} every {}s (Ctrl+C to stop)",
            name,
            config.tracker.world,
            interval.as_secs()
        ),
        quiet || format == OutputFormat::Json,
    );

    let mut updates = 0usize;
    loop {
        let events = tokio::select! {
            events = coordinator.next_events() => events,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping watch");
                break;
            }
        };

        for event in events {
            event.log();
            match event {
                StateEvent::SnapshotUpdated { .. } => {
                    updates += 1;
                    report_snapshot(&coordinator, format);
                }
                StateEvent::DetailFailed(error) => report_failure(&error, format),
                _ => {}
            }
        }

        if count.is_some_and(|limit| updates >= limit) {
            break;
        }
    }

    Ok(())
}

fn report_snapshot(coordinator: &Coordinator, format: OutputFormat) {
    let state = coordinator.state();
    let Some(snapshot) = state.current_snapshot() else {
        return;
    };
    let at = state
        .last_successful_update()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    match format {
        OutputFormat::Json => print_json_line(&WatchLine::Updated { at, snapshot }),
        OutputFormat::Text => {
            println!("[{}] {}", at, format_roster(snapshot, true));
            println!();
        }
    }
}

fn report_failure(error: &ErrorInfo, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json_line(&WatchLine::Failed { error }),
        OutputFormat::Text => {
            if error.suggests_reselect() {
                print_error(&format!("{} (check the guild name)", error.message));
            } else {
                print_error(&format!("{} (retrying on next refresh)", error.message));
            }
        }
    }
}
