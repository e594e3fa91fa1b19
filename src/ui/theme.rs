use eframe::egui::{self, Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Midnight,
    Ember,
    Catppuccin,
}

impl ThemePreset {
    /// Get all available presets
    pub fn all() -> &'static [ThemePreset] {
        &[ThemePreset::Midnight, ThemePreset::Ember, ThemePreset::Catppuccin]
    }

    /// Get display name for the preset
    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Midnight => "Midnight",
            ThemePreset::Ember => "Ember",
            ThemePreset::Catppuccin => "Catppuccin Mocha",
        }
    }

    /// Parse a preset from its config name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(name) || format!("{:?}", p).eq_ignore_ascii_case(name))
    }

    /// Get the theme colors for this preset
    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Midnight => Theme::midnight(),
            ThemePreset::Ember => Theme::ember(),
            ThemePreset::Catppuccin => Theme::catppuccin(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_medium: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_muted: Color32,

    // Roster colors
    pub online: Color32,
    pub offline: Color32,
    pub warning: Color32,
    pub error: Color32,

    pub border: Color32,
}

impl Theme {
    /// Midnight theme - deep blue with a crimson edge
    pub fn midnight() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(12, 14, 20),
            bg_dark: Color32::from_rgb(18, 18, 18),
            bg_medium: Color32::from_rgb(30, 30, 30),
            bg_light: Color32::from_rgb(45, 45, 50),

            text_primary: Color32::from_rgb(245, 245, 245),
            text_secondary: Color32::from_rgb(190, 190, 190),
            text_muted: Color32::from_rgb(130, 130, 135),

            accent: Color32::from_rgb(25, 118, 210),
            accent_muted: Color32::from_rgb(20, 80, 150),

            online: Color32::from_rgb(76, 175, 80),
            offline: Color32::from_rgb(220, 0, 78),
            warning: Color32::from_rgb(255, 167, 38),
            error: Color32::from_rgb(244, 67, 54),

            border: Color32::from_rgb(60, 60, 66),
        }
    }

    /// Ember theme - warm browns and amber
    pub fn ember() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(16, 12, 10),
            bg_dark: Color32::from_rgb(26, 20, 16),
            bg_medium: Color32::from_rgb(38, 30, 24),
            bg_light: Color32::from_rgb(56, 44, 36),

            text_primary: Color32::from_rgb(250, 244, 236),
            text_secondary: Color32::from_rgb(214, 200, 186),
            text_muted: Color32::from_rgb(150, 136, 122),

            accent: Color32::from_rgb(245, 158, 11),
            accent_muted: Color32::from_rgb(180, 116, 8),

            online: Color32::from_rgb(132, 204, 22),
            offline: Color32::from_rgb(168, 162, 158),
            warning: Color32::from_rgb(250, 204, 21),
            error: Color32::from_rgb(239, 68, 68),

            border: Color32::from_rgb(74, 60, 50),
        }
    }

    /// Catppuccin Mocha theme - popular community theme
    pub fn catppuccin() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(17, 17, 27),    // Crust
            bg_dark: Color32::from_rgb(24, 24, 37),       // Mantle
            bg_medium: Color32::from_rgb(30, 30, 46),     // Base
            bg_light: Color32::from_rgb(49, 50, 68),      // Surface0

            text_primary: Color32::from_rgb(205, 214, 244),   // Text
            text_secondary: Color32::from_rgb(186, 194, 222), // Subtext1
            text_muted: Color32::from_rgb(147, 153, 178),     // Overlay1

            accent: Color32::from_rgb(137, 180, 250),       // Blue
            accent_muted: Color32::from_rgb(116, 148, 204),

            online: Color32::from_rgb(166, 227, 161),   // Green
            offline: Color32::from_rgb(243, 139, 168),  // Red
            warning: Color32::from_rgb(249, 226, 175),  // Yellow
            error: Color32::from_rgb(243, 139, 168),

            border: Color32::from_rgb(69, 71, 90),  // Surface1
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_medium;
        visuals.extreme_bg_color = self.bg_darkest;

        let widgets = &mut visuals.widgets;
        for (style, fill, stroke, text) in [
            (&mut widgets.noninteractive, self.bg_medium, self.border, self.text_secondary),
            (&mut widgets.inactive, self.bg_medium, self.border, self.text_primary),
            (&mut widgets.hovered, self.bg_light, self.accent, self.text_primary),
            (&mut widgets.active, self.accent_muted, self.accent, self.text_primary),
            (&mut widgets.open, self.bg_light, self.accent, self.text_primary),
        ] {
            style.bg_fill = fill;
            style.weak_bg_fill = fill;
            style.bg_stroke = Stroke::new(1.0, stroke);
            style.fg_stroke = Stroke::new(1.0, text);
        }

        visuals.selection.bg_fill = self.accent.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;

        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_from_name() {
        assert_eq!(ThemePreset::from_name("midnight"), Some(ThemePreset::Midnight));
        assert_eq!(ThemePreset::from_name("Catppuccin Mocha"), Some(ThemePreset::Catppuccin));
        assert_eq!(ThemePreset::from_name("catppuccin"), Some(ThemePreset::Catppuccin));
        assert_eq!(ThemePreset::from_name("neon"), None);
    }
}
