//! Tracker page: guild picker, guild header and roster

use std::time::Duration;

use eframe::egui::{self, RichText};

use crate::state::{RefreshState, UiState};
use crate::ui::components::render_section_frame;
use crate::ui::guild_select::render_guild_select;
use crate::ui::members_table::render_members_table;
use crate::ui::UiAction;

/// Render the whole tracker page
pub fn render_tracker(
    state: &RefreshState,
    world: &str,
    interval: Duration,
    ui_state: &mut UiState,
    ui: &mut egui::Ui,
) -> Vec<UiAction> {
    let theme = ui_state.current_theme.clone();
    let mut actions = Vec::new();

    // Header
    ui.vertical_centered(|ui| {
        ui.add_space(8.0);
        ui.label(RichText::new("Guildwatch").size(26.0).strong().color(theme.accent));
        ui.label(
            RichText::new(format!("Track online guild members on {}", world))
                .color(theme.text_secondary),
        );
        ui.add_space(12.0);
    });

    ui.vertical_centered(|ui| {
        ui.set_max_width(600.0);
        render_guild_select(state, ui_state, ui, &mut actions);
    });

    ui.add_space(16.0);

    if let Some(selected) = state.selected_guild() {
        render_section_frame(ui, &theme, None, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.vertical(|ui| {
                    ui.label(RichText::new(selected).size(22.0).strong().color(theme.text_primary));
                    if let Some(snapshot) = state.current_snapshot() {
                        if !snapshot.description.is_empty() {
                            ui.label(RichText::new(&snapshot.description).color(theme.text_secondary));
                        }
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(!state.is_detail_loading(), egui::Button::new("Refresh"))
                        .clicked()
                    {
                        actions.push(UiAction::RefreshNow);
                    }

                    if state.is_detail_loading() {
                        ui.label(RichText::new("Refreshing...").size(11.0).color(theme.text_muted));
                        ui.spinner();
                    }

                    if let Some(at) = state.last_successful_update() {
                        ui.label(
                            RichText::new(format!("Updated: {}", at.format("%H:%M:%S")))
                                .size(11.0)
                                .color(theme.text_muted),
                        );
                    }

                    let mut auto_refresh = state.auto_refresh_enabled();
                    let label = format!("Auto-refresh ({}s)", interval.as_secs());
                    if ui.checkbox(&mut auto_refresh, label).changed() {
                        actions.push(UiAction::SetAutoRefresh(auto_refresh));
                    }
                });
            });

            if let Some(err) = state.detail_error() {
                ui.add_space(8.0);
                egui::Frame::new()
                    .fill(theme.warning.gamma_multiply(0.15))
                    .corner_radius(4.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(RichText::new(&err.message).color(theme.warning));
                        if err.suggests_reselect() {
                            ui.label(
                                RichText::new(
                                    "Some guilds have no member data available. \
                                     Try selecting another guild from the list.",
                                )
                                .size(11.0)
                                .color(theme.text_secondary),
                            );
                        }
                    });
            }
        });

        ui.add_space(12.0);

        match state.current_snapshot() {
            Some(snapshot) => render_members_table(snapshot, ui_state, ui, &mut actions),
            None if state.is_detail_loading() => {
                ui.vertical_centered(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Loading members...").color(theme.text_muted));
                });
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new("No member information available").color(theme.text_muted),
                    );
                });
            }
        }
    }

    actions
}

/// Footer line with world summary and list errors
pub fn render_footer(state: &RefreshState, world: &str, ui_state: &UiState, ui: &mut egui::Ui) {
    let theme = &ui_state.current_theme;
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!(
                "Active guilds: {} • World: {}",
                state.guild_list().len(),
                world
            ))
            .color(theme.text_muted),
        );
        if let Some(err) = state.list_error() {
            ui.separator();
            ui.colored_label(theme.error, &err.message);
        }
    });
}
