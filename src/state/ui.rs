//! UI-related application state

use std::time::{Duration, Instant};

use crate::ui::theme::Theme;

/// How long the clipboard notice stays visible
const NOTICE_DURATION: Duration = Duration::from_secs(3);

/// UI-related state
pub struct UiState {
    /// Current theme
    pub current_theme: Theme,
    /// Whether theme needs to be applied
    pub theme_dirty: bool,
    /// Text typed into the guild picker
    pub guild_filter: String,
    /// Whether to show the About dialog
    pub show_about_dialog: bool,
    /// Last clipboard copy, shown briefly
    copy_notice: Option<(String, Instant)>,
}

impl UiState {
    /// Create a new UiState with the given theme
    pub fn new(theme: Theme) -> Self {
        Self {
            current_theme: theme,
            theme_dirty: true, // Apply theme on first frame
            guild_filter: String::new(),
            show_about_dialog: false,
            copy_notice: None,
        }
    }

    /// Record that `text` was copied to the clipboard
    pub fn notify_copied(&mut self, text: String) {
        self.copy_notice = Some((text, Instant::now()));
    }

    pub fn has_copy_notice(&self) -> bool {
        self.copy_notice.is_some()
    }

    /// The copy notice, while it is still fresh
    pub fn copy_notice(&mut self) -> Option<&str> {
        if self
            .copy_notice
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= NOTICE_DURATION)
        {
            self.copy_notice = None;
        }
        self.copy_notice.as_ref().map(|(text, _)| text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::ThemePreset;

    #[test]
    fn test_copy_notice_is_shown_after_copy() {
        let mut ui = UiState::new(ThemePreset::default().theme());
        assert!(ui.copy_notice().is_none());

        ui.notify_copied("exiva \"Ayla Storm\"".to_string());
        assert_eq!(ui.copy_notice(), Some("exiva \"Ayla Storm\""));
    }
}
