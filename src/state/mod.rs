//! Application state modules
//!
//! `roster` holds the guild refresh state machine, `coordinator` drives it
//! against a gateway, and `ui` keeps purely visual state.

mod coordinator;
mod roster;
mod ui;

pub use coordinator::{Coordinator, RefreshSettings};
pub use roster::{ErrorInfo, RefreshState};
pub use ui::UiState;

/// Events that state transitions can return.
/// These tell the app or CLI what happened without them inspecting the state.
#[derive(Debug, Clone)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),

    /// Log a debug message
    LogDebug(String),

    /// The guild list was replaced
    GuildsLoaded { count: usize },

    /// A new snapshot of the selected guild was stored
    SnapshotUpdated { guild: String, online: u32, total: u32 },

    /// The selected guild could not be fetched
    DetailFailed(ErrorInfo),
}

impl StateEvent {
    /// Forward log events to tracing. Returns the status text, if any.
    pub fn log(&self) -> Option<&str> {
        match self {
            StateEvent::StatusMessage(msg) => Some(msg),
            StateEvent::LogError(msg) => {
                tracing::error!("{}", msg);
                None
            }
            StateEvent::LogInfo(msg) => {
                tracing::info!("{}", msg);
                None
            }
            StateEvent::LogDebug(msg) => {
                tracing::debug!("{}", msg);
                None
            }
            StateEvent::GuildsLoaded { .. }
            | StateEvent::SnapshotUpdated { .. }
            | StateEvent::DetailFailed(_) => None,
        }
    }
}
