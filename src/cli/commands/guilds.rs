//! Guild listing command

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{print_formatted, OutputFormat};
use crate::config::Config;
use crate::tibia::{GuildGateway, GuildSummary};

#[derive(Serialize)]
struct GuildsResult {
    world: String,
    guilds: Vec<GuildSummary>,
}

pub async fn run(config: &Config, filter: Option<&str>, format: OutputFormat) -> Result<()> {
    let client = super::client(config)?;
    let world = &config.tracker.world;

    let guilds = client.list_guilds(world).await?;
    let guilds = apply_filter(guilds, filter);

    let result = GuildsResult {
        world: world.clone(),
        guilds,
    };

    print_formatted(&result, format, format_guilds_text);
    Ok(())
}

fn apply_filter(guilds: Vec<GuildSummary>, filter: Option<&str>) -> Vec<GuildSummary> {
    match filter.map(|f| f.trim().to_lowercase()) {
        Some(needle) if !needle.is_empty() => guilds
            .into_iter()
            .filter(|g| g.name.to_lowercase().contains(&needle))
            .collect(),
        _ => guilds,
    }
}

fn format_guilds_text(result: &GuildsResult) -> String {
    if result.guilds.is_empty() {
        return format!("No active guilds found on {}", result.world);
    }

    let mut lines = vec![format!(
        "{} active guilds on {}:",
        result.guilds.len(),
        result.world
    )];
    for guild in &result.guilds {
        lines.push(format!("  {}", guild.name));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guilds() -> Vec<GuildSummary> {
        ["Red Phoenix", "Blue Dragons"]
            .into_iter()
            .map(|name| GuildSummary {
                name: name.to_string(),
                description: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_apply_filter() {
        assert_eq!(apply_filter(guilds(), None).len(), 2);
        assert_eq!(apply_filter(guilds(), Some(" ")).len(), 2);
        let filtered = apply_filter(guilds(), Some("blue"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Blue Dragons");
    }

    #[test]
    fn test_format_guilds_text() {
        let result = GuildsResult {
            world: "Inabra".to_string(),
            guilds: guilds(),
        };
        assert_eq!(
            format_guilds_text(&result),
            "2 active guilds on Inabra:\n  Red Phoenix\n  Blue Dragons"
        );

        let empty = GuildsResult {
            world: "Inabra".to_string(),
            guilds: Vec::new(),
        };
        assert_eq!(format_guilds_text(&empty), "No active guilds found on Inabra");
    }
}
