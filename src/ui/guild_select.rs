//! Searchable guild picker

use eframe::egui::{self, RichText};

use crate::state::{RefreshState, UiState};
use crate::tibia::GuildSummary;
use crate::ui::UiAction;

/// Descriptions longer than this are cut in the picker
const DESCRIPTION_PREVIEW_CHARS: usize = 80;

/// Render the guild picker, or its loading/error placeholder
pub fn render_guild_select(
    state: &RefreshState,
    ui_state: &mut UiState,
    ui: &mut egui::Ui,
    actions: &mut Vec<UiAction>,
) {
    let theme = ui_state.current_theme.clone();

    if state.is_list_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new("Loading guilds...").color(theme.text_muted));
        });
        return;
    }

    if let Some(err) = state.list_error() {
        ui.horizontal(|ui| {
            ui.colored_label(theme.error, &err.message);
            if ui.button("Retry").clicked() {
                actions.push(UiAction::ReloadGuilds);
            }
        });
        if state.guild_list().is_empty() {
            return;
        }
        ui.add_space(8.0);
    }

    let selected = state.selected_guild();
    let selected_text = selected.unwrap_or("Select a guild");

    ui.add_enabled_ui(!state.guild_list().is_empty(), |ui| {
        egui::ComboBox::from_id_salt("guild_select")
            .selected_text(selected_text)
            .width(ui.available_width())
            .height(400.0)
            .show_ui(ui, |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut ui_state.guild_filter)
                        .hint_text("Search guilds..."),
                );
                ui.separator();

                if selected.is_some()
                    && ui
                        .selectable_label(false, RichText::new("Clear selection").italics())
                        .clicked()
                {
                    actions.push(UiAction::SelectGuild(String::new()));
                }

                for guild in filter_guilds(state.guild_list(), &ui_state.guild_filter) {
                    let is_selected = selected == Some(guild.name.as_str());
                    if ui.selectable_label(is_selected, &guild.name).clicked() {
                        actions.push(UiAction::SelectGuild(guild.name.clone()));
                    }
                    if !guild.description.is_empty() {
                        ui.label(
                            RichText::new(truncate_description(&guild.description))
                                .size(11.0)
                                .color(theme.text_muted),
                        );
                    }
                }
            });
    });

    if actions
        .iter()
        .any(|a| matches!(a, UiAction::SelectGuild(_)))
    {
        ui_state.guild_filter.clear();
    }
}

/// Guilds whose name contains `filter`, case-insensitively
fn filter_guilds<'a>(guilds: &'a [GuildSummary], filter: &str) -> Vec<&'a GuildSummary> {
    let needle = filter.trim().to_lowercase();
    guilds
        .iter()
        .filter(|g| needle.is_empty() || g.name.to_lowercase().contains(&needle))
        .collect()
}

/// Shorten a guild description for the picker
fn truncate_description(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let cut: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        description.to_string()
    }
}
