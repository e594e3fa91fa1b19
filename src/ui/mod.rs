//! UI modules for Guildwatch
//!
//! Rendering functions read the coordinator's state and push [`UiAction`]s
//! instead of mutating it, so one frame never sees half-applied changes.

mod components;
mod guild_select;
mod members_table;
pub mod theme;
mod tracker;

pub use components::render_about_dialog;
pub use members_table::{character_url, exiva_command, format_date, partition_members};
pub use tracker::{render_footer, render_tracker};

/// Things the user asked for during a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Pick a guild; empty clears the selection
    SelectGuild(String),
    /// Flip the auto-refresh toggle
    SetAutoRefresh(bool),
    /// Refetch the selected guild now
    RefreshNow,
    /// Retry loading the guild list
    ReloadGuilds,
    /// Copy the exiva spell for a character
    CopyExiva(String),
    /// Open a character's page in the browser
    OpenCharacter(String),
}
