use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::config::Config;
use crate::state::{Coordinator, RefreshState, StateEvent, UiState};
use crate::tibia::GuildGateway;
use crate::ui::theme::ThemePreset;
use crate::ui::{self, UiAction};

/// Repaint cadence while the visible state is loading
const BUSY_REPAINT: Duration = Duration::from_millis(100);

/// Slower cadence for collecting superseded fetches nobody is waiting on
const SWEEP_REPAINT: Duration = Duration::from_secs(1);

/// Main application state
pub struct GuildwatchApp {
    /// Application configuration
    config: Config,
    /// Guild list and roster refresh
    roster: Coordinator,
    /// Visual state
    ui: UiState,
    /// Status message for the status bar
    status_message: String,
}

impl GuildwatchApp {
    /// Create a new application instance and start loading guilds
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        gateway: Arc<dyn GuildGateway>,
    ) -> Self {
        let roster = Coordinator::new(gateway, config.refresh_settings());
        let ui = UiState::new(config.appearance.theme.theme());

        let mut app = Self {
            config,
            roster,
            ui,
            status_message: "Ready".to_string(),
        };

        let events = app.roster.reload_guilds();
        app.handle_events(events);
        app
    }

    /// Log coordinator events and keep the latest status line
    fn handle_events(&mut self, events: Vec<StateEvent>) {
        for event in &events {
            if let Some(msg) = event.log() {
                self.status_message = msg.to_string();
            }
        }
    }

    fn apply_action(&mut self, ctx: &egui::Context, action: UiAction) {
        let events = match action {
            UiAction::SelectGuild(name) => self.roster.select_guild(&name),
            UiAction::SetAutoRefresh(enabled) => {
                self.config.tracker.auto_refresh = enabled;
                self.save_config();
                self.roster.set_auto_refresh(enabled)
            }
            UiAction::RefreshNow => self.roster.refresh_now(),
            UiAction::ReloadGuilds => self.roster.reload_guilds(),
            UiAction::CopyExiva(name) => {
                let command = ui::exiva_command(&name);
                ctx.copy_text(command.clone());
                self.ui.notify_copied(command);
                Vec::new()
            }
            UiAction::OpenCharacter(name) => {
                if let Err(e) = open::that(ui::character_url(&name)) {
                    tracing::warn!("Failed to open browser: {}", e);
                }
                Vec::new()
            }
        };
        self.handle_events(events);
    }

    fn set_theme(&mut self, preset: ThemePreset) {
        self.config.appearance.theme = preset;
        self.ui.current_theme = preset.theme();
        self.ui.theme_dirty = true;
        self.save_config();
    }

    /// Save configuration to disk
    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Ask egui to wake us when there is work to pick up
    fn schedule_repaint(&self, ctx: &egui::Context) {
        if let Some(wait) = repaint_delay(
            self.roster.state(),
            self.roster.pending_detail_fetches(),
            self.roster.time_until_tick(),
        ) {
            ctx.request_repaint_after(wait);
        }

        if self.ui.has_copy_notice() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}

/// How soon the next frame is needed to pick up background work
fn repaint_delay(
    state: &RefreshState,
    pending_fetches: usize,
    until_tick: Option<Duration>,
) -> Option<Duration> {
    if state.is_list_loading() || state.is_detail_loading() {
        return Some(BUSY_REPAINT);
    }

    let sweep = (pending_fetches > 0).then_some(SWEEP_REPAINT);
    match (sweep, until_tick) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl eframe::App for GuildwatchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        // Poll async fetches and the auto-refresh timer
        let events = self.roster.poll();
        self.handle_events(events);

        let mut theme_choice = None;

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    for preset in ThemePreset::all() {
                        if ui
                            .selectable_label(self.config.appearance.theme == *preset, preset.name())
                            .clicked()
                        {
                            theme_choice = Some(*preset);
                        }
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("About").clicked() {
                        self.ui.show_about_dialog = true;
                    }
                });
            });
        });

        // Status bar at bottom
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui::render_footer(self.roster.state(), self.roster.world(), &self.ui, ui);
            ui.label(
                egui::RichText::new(&self.status_message)
                    .size(11.0)
                    .color(self.ui.current_theme.text_muted),
            );
        });

        let actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui::render_tracker(
                    self.roster.state(),
                    self.roster.world(),
                    self.roster.interval(),
                    &mut self.ui,
                    ui,
                )
            })
            .inner;

        ui::render_about_dialog(&mut self.ui, ctx);

        for action in actions {
            self.apply_action(ctx, action);
        }
        if let Some(preset) = theme_choice {
            self.set_theme(preset);
        }

        self.schedule_repaint(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_app_waits_for_tick() {
        let state = RefreshState::new(true);
        assert_eq!(repaint_delay(&state, 0, None), None);
        assert_eq!(
            repaint_delay(&state, 0, Some(Duration::from_secs(25))),
            Some(Duration::from_secs(25))
        );
    }

    #[test]
    fn test_superseded_fetches_use_slow_sweep() {
        let state = RefreshState::new(true);
        assert_eq!(repaint_delay(&state, 3, None), Some(SWEEP_REPAINT));
        assert_eq!(
            repaint_delay(&state, 3, Some(Duration::from_secs(25))),
            Some(SWEEP_REPAINT)
        );
        assert_eq!(
            repaint_delay(&state, 3, Some(Duration::from_millis(300))),
            Some(Duration::from_millis(300))
        );
    }
}
