//! Guild roster command

use anyhow::Result;

use crate::cli::output::{print_formatted, OutputFormat};
use crate::config::Config;
use crate::tibia::{GuildGateway, GuildSnapshot};
use crate::ui::{format_date, partition_members};

pub async fn run(config: &Config, name: &str, online_only: bool, format: OutputFormat) -> Result<()> {
    let client = super::client(config)?;
    let snapshot = client.fetch_guild_detail(name).await?;

    print_formatted(&snapshot, format, |s| format_roster(s, online_only));
    Ok(())
}

/// Plain-text roster, online members first
pub fn format_roster(snapshot: &GuildSnapshot, online_only: bool) -> String {
    let mut lines = vec![format!(
        "{} ({}) - {} online, {} offline, {} total",
        snapshot.name,
        snapshot.world,
        snapshot.players_online,
        snapshot.players_offline,
        snapshot.members_total
    )];
    if !snapshot.founded.is_empty() {
        lines.push(format!("Founded: {}", format_date(&snapshot.founded)));
    }

    let (online, offline) = partition_members(&snapshot.members);

    lines.push(String::new());
    lines.push("Online:".to_string());
    if online.is_empty() {
        lines.push("  (nobody)".to_string());
    }
    for member in online {
        lines.push(format!(
            "  {:<24} {:>4}  {:<16} {}",
            member.name, member.level, member.vocation, member.rank
        ));
    }

    if !online_only {
        lines.push(String::new());
        lines.push("Offline:".to_string());
        for member in offline {
            lines.push(format!(
                "  {:<24} {:>4}  {:<16} {}",
                member.name, member.level, member.vocation, member.rank
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tibia::{MemberRecord, MemberStatus};

    fn snapshot() -> GuildSnapshot {
        let member = |name: &str, status| MemberRecord {
            name: name.to_string(),
            title: String::new(),
            rank: "Member".to_string(),
            vocation: "Druid".to_string(),
            level: 120,
            joined: "2021-01-01".to_string(),
            status,
        };
        GuildSnapshot {
            name: "Red Phoenix".to_string(),
            world: "Inabra".to_string(),
            founded: "2019-05-06".to_string(),
            description: String::new(),
            players_online: 1,
            players_offline: 1,
            members_total: 2,
            members: vec![
                member("Sleepy", MemberStatus::Offline),
                member("Awake", MemberStatus::Online),
            ],
        }
    }

    #[test]
    fn test_format_roster_lists_online_first() {
        let text = format_roster(&snapshot(), false);
        assert!(text.starts_with("Red Phoenix (Inabra) - 1 online, 1 offline, 2 total"));
        assert!(text.contains("Founded: 06 May 2019"));
        let awake = text.find("Awake").unwrap();
        let sleepy = text.find("Sleepy").unwrap();
        assert!(awake < sleepy);
    }

    #[test]
    fn test_format_roster_online_only() {
        let text = format_roster(&snapshot(), true);
        assert!(text.contains("Awake"));
        assert!(!text.contains("Sleepy"));
        assert!(!text.contains("Offline:"));
    }
}
