//! Member roster table

use chrono::NaiveDate;
use eframe::egui::{self, Color32, RichText};

use crate::state::UiState;
use crate::tibia::{GuildSnapshot, MemberRecord};
use crate::ui::components::render_stat;
use crate::ui::theme::Theme;
use crate::ui::UiAction;

/// Character lookup site linked from member names
const CHARACTER_URL: &str = "https://guildstats.eu/character?nick=";

/// Render counters and the member table for a snapshot
pub fn render_members_table(
    snapshot: &GuildSnapshot,
    ui_state: &mut UiState,
    ui: &mut egui::Ui,
    actions: &mut Vec<UiAction>,
) {
    let theme = ui_state.current_theme.clone();

    ui.horizontal_wrapped(|ui| {
        render_stat(ui, &theme, theme.online, &format!("{} Online", snapshot.players_online));
        render_stat(ui, &theme, theme.offline, &format!("{} Offline", snapshot.players_offline));
        render_stat(ui, &theme, theme.accent, &format!("{} Total", snapshot.members_total));
        if !snapshot.founded.is_empty() {
            render_stat(
                ui,
                &theme,
                theme.text_muted,
                &format!("Founded: {}", format_date(&snapshot.founded)),
            );
        }
    });

    if let Some(notice) = ui_state.copy_notice() {
        ui.add_space(4.0);
        ui.label(RichText::new(format!("Copied: {}", notice)).color(theme.online));
    }

    ui.add_space(8.0);

    if snapshot.members.is_empty() {
        ui.label(RichText::new("No member information available").color(theme.text_muted));
        return;
    }

    let (online, offline) = partition_members(&snapshot.members);

    egui::ScrollArea::vertical()
        .id_salt("members_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Grid::new("members_grid")
                .striped(true)
                .num_columns(7)
                .spacing([16.0, 6.0])
                .show(ui, |ui| {
                    for header in ["Status", "Name", "Rank", "Vocation", "Level", "Joined", "Exiva"] {
                        ui.label(RichText::new(header).color(theme.text_muted).strong());
                    }
                    ui.end_row();

                    for member in online.into_iter().chain(offline) {
                        render_member_row(ui, &theme, member, actions);
                        ui.end_row();
                    }
                });
        });
}

fn render_member_row(ui: &mut egui::Ui, theme: &Theme, member: &MemberRecord, actions: &mut Vec<UiAction>) {
    if member.status.is_online() {
        ui.label(RichText::new("● Online").color(theme.online));
    } else {
        ui.label(RichText::new("○ Offline").color(theme.text_muted));
    }

    ui.horizontal(|ui| {
        if ui
            .link(RichText::new(&member.name).strong())
            .on_hover_text("Open on guildstats.eu")
            .clicked()
        {
            actions.push(UiAction::OpenCharacter(member.name.clone()));
        }
        if !member.title.is_empty() {
            ui.label(RichText::new(format!("({})", member.title)).size(11.0).color(theme.text_muted));
        }
    });

    let rank_color = if member.rank.contains("Leader") {
        theme.accent
    } else {
        theme.text_secondary
    };
    ui.label(RichText::new(&member.rank).color(rank_color));
    ui.label(RichText::new(&member.vocation).color(vocation_color(&member.vocation)).strong());
    ui.label(RichText::new(member.level.to_string()).strong());
    ui.label(RichText::new(format_date(&member.joined)).color(theme.text_secondary));

    if ui
        .small_button("Copy")
        .on_hover_text(format!("Copy: {}", exiva_command(&member.name)))
        .clicked()
    {
        actions.push(UiAction::CopyExiva(member.name.clone()));
    }
}

/// Split members into online and offline, each keeping API order
pub fn partition_members(members: &[MemberRecord]) -> (Vec<&MemberRecord>, Vec<&MemberRecord>) {
    members.iter().partition(|m| m.status.is_online())
}

/// The in-game spell that locates a character
pub fn exiva_command(name: &str) -> String {
    format!("exiva \"{}\"", name)
}

/// Character page for a member
pub fn character_url(name: &str) -> String {
    format!("{}{}", CHARACTER_URL, urlencoding::encode(name))
}

/// Text color for a vocation name
pub fn vocation_color(vocation: &str) -> Color32 {
    match vocation {
        "Elite Knight" => Color32::from_rgb(139, 69, 19),
        "Knight" => Color32::from_rgb(160, 82, 45),
        "Master Sorcerer" => Color32::from_rgb(153, 50, 204),
        "Sorcerer" => Color32::from_rgb(139, 0, 139),
        "Elder Druid" => Color32::from_rgb(34, 139, 34),
        "Druid" => Color32::from_rgb(50, 205, 50),
        "Royal Paladin" => Color32::from_rgb(65, 105, 225),
        "Paladin" => Color32::from_rgb(30, 144, 255),
        _ => Color32::from_rgb(102, 102, 102),
    }
}

/// Format an API date (`2019-05-06`, optionally with a time part) for display
pub fn format_date(raw: &str) -> String {
    raw.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tibia::MemberStatus;

    fn member(name: &str, status: MemberStatus) -> MemberRecord {
        MemberRecord {
            name: name.to_string(),
            title: String::new(),
            rank: "Member".to_string(),
            vocation: "Knight".to_string(),
            level: 50,
            joined: "2022-02-02".to_string(),
            status,
        }
    }

    #[test]
    fn test_partition_keeps_order_within_groups() {
        let members = vec![
            member("A", MemberStatus::Offline),
            member("B", MemberStatus::Online),
            member("C", MemberStatus::Offline),
            member("D", MemberStatus::Online),
        ];
        let (online, offline) = partition_members(&members);
        let names = |v: Vec<&MemberRecord>| v.iter().map(|m| m.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(online), vec!["B", "D"]);
        assert_eq!(names(offline), vec!["A", "C"]);
    }

    #[test]
    fn test_exiva_command() {
        assert_eq!(exiva_command("Ayla Storm"), "exiva \"Ayla Storm\"");
    }

    #[test]
    fn test_character_url_escapes_name() {
        assert_eq!(
            character_url("Ayla Storm"),
            "https://guildstats.eu/character?nick=Ayla%20Storm"
        );
    }

    #[test]
    fn test_vocation_color() {
        assert_ne!(vocation_color("Elder Druid"), vocation_color("Unknown"));
        assert_eq!(vocation_color("None"), Color32::from_rgb(102, 102, 102));
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2019-05-06"), "06 May 2019");
        assert_eq!(format_date("2019-05-06T10:00:00Z"), "06 May 2019");
        assert_eq!(format_date("unknown"), "unknown");
        assert_eq!(format_date(""), "");
    }
}
