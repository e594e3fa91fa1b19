//! Shared UI components for Guildwatch

use eframe::egui::{self, Color32, RichText};

use crate::state::UiState;
use crate::ui::theme::Theme;

/// Render a titled, bordered section
pub fn render_section_frame<R>(
    ui: &mut egui::Ui,
    theme: &Theme,
    title: Option<&str>,
    content: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::new()
        .fill(theme.bg_medium)
        .corner_radius(8.0)
        .inner_margin(16.0)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            if let Some(title) = title {
                ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
                ui.add_space(12.0);
            }
            content(ui)
        })
        .inner
}

/// Render a colored dot followed by a label, used for roster counters
pub fn render_stat(ui: &mut egui::Ui, theme: &Theme, color: Color32, text: &str) {
    egui::Frame::new()
        .fill(theme.bg_light.gamma_multiply(0.5))
        .corner_radius(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 6.0, color);
                ui.label(RichText::new(text).color(theme.text_primary).strong());
            });
        });
}

/// Render the About dialog
pub fn render_about_dialog(ui_state: &mut UiState, ctx: &egui::Context) {
    if !ui_state.show_about_dialog {
        return;
    }

    let theme = ui_state.current_theme.clone();
    let mut close = false;

    egui::Window::new("About Guildwatch")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 220.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("Guildwatch").size(24.0).strong().color(theme.accent));
                ui.add_space(4.0);
                ui.label(
                    RichText::new("Tibia guild roster tracker")
                        .size(14.0)
                        .color(theme.text_secondary),
                );

                ui.add_space(12.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme.text_muted),
                );

                ui.add_space(12.0);
                if ui.link("TibiaData API").clicked() {
                    let _ = open::that("https://tibiadata.com/");
                }

                ui.add_space(12.0);
                ui.label(RichText::new("Built with Rust + egui").size(11.0).color(theme.text_muted));

                ui.add_space(12.0);
                if ui.button("Close").clicked() {
                    close = true;
                }
                ui.add_space(8.0);
            });
        });

    if close {
        ui_state.show_about_dialog = false;
    }
}
