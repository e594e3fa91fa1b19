//! Guild roster refresh state machine
//!
//! `RefreshState` is a plain reducer: every user action, timer tick and
//! fetch completion goes through [`RefreshState::apply`], which mutates the
//! state and returns the follow-up work (fetches to spawn, timer changes) for
//! the coordinator to carry out. Nothing here touches the network or a clock.
//!
//! Detail fetches are tagged with a [`RequestToken`]. Only the result carrying
//! the live token may change the state; anything older is dropped on arrival.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::state::StateEvent;
use crate::tibia::{ErrorKind, GatewayError, GuildSnapshot, GuildSummary};

/// Identifies one detail fetch. Issued in increasing order, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stored form of a gateway failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
    pub guild: Option<String>,
}

impl ErrorInfo {
    /// Not-found errors only go away by picking another guild
    pub fn suggests_reselect(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<&GatewayError> for ErrorInfo {
    fn from(err: &GatewayError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            guild: err.guild().map(str::to_string),
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum Action {
    /// Load (or reload) the guild list for the configured world
    LoadGuilds,
    /// The guild list fetch finished
    GuildsFetched(Result<Vec<GuildSummary>, GatewayError>),
    /// User picked a guild; an empty name clears the selection
    SelectGuild(String),
    /// Turn periodic refresh on or off
    SetAutoRefresh(bool),
    /// Fetch the selected guild right away
    RefreshNow,
    /// The auto-refresh interval elapsed
    Tick,
    /// A detail fetch finished
    DetailFetched {
        token: RequestToken,
        guild: String,
        result: Result<GuildSnapshot, GatewayError>,
        at: DateTime<Local>,
    },
}

/// Work the coordinator must perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Spawn a guild list fetch
    FetchGuilds,
    /// Spawn a detail fetch tagged with `token`
    FetchDetail { token: RequestToken, guild: String },
    /// Start the auto-refresh interval over from now
    RestartTimer,
}

/// Outcome of applying one action
#[derive(Debug, Default)]
pub struct Transition {
    pub effects: Vec<Effect>,
    pub events: Vec<StateEvent>,
}

/// Everything the rendering layer needs to draw the tracker
#[derive(Debug, Clone)]
pub struct RefreshState {
    guild_list: Vec<GuildSummary>,
    /// Empty when nothing is selected
    selected_guild: String,
    current_snapshot: Option<GuildSnapshot>,
    list_loading: bool,
    detail_loading: bool,
    list_error: Option<ErrorInfo>,
    detail_error: Option<ErrorInfo>,
    auto_refresh_enabled: bool,
    last_successful_update: Option<DateTime<Local>>,
    active_request_token: Option<RequestToken>,
    next_token: u64,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new(true)
    }
}

impl RefreshState {
    /// Create an empty session state
    pub fn new(auto_refresh_enabled: bool) -> Self {
        Self {
            guild_list: Vec::new(),
            selected_guild: String::new(),
            current_snapshot: None,
            list_loading: false,
            detail_loading: false,
            list_error: None,
            detail_error: None,
            auto_refresh_enabled,
            last_successful_update: None,
            active_request_token: None,
            next_token: 0,
        }
    }

    pub fn guild_list(&self) -> &[GuildSummary] {
        &self.guild_list
    }

    pub fn selected_guild(&self) -> Option<&str> {
        if self.selected_guild.is_empty() {
            None
        } else {
            Some(&self.selected_guild)
        }
    }

    pub fn current_snapshot(&self) -> Option<&GuildSnapshot> {
        self.current_snapshot.as_ref()
    }

    pub fn is_list_loading(&self) -> bool {
        self.list_loading
    }

    pub fn is_detail_loading(&self) -> bool {
        self.detail_loading
    }

    pub fn list_error(&self) -> Option<&ErrorInfo> {
        self.list_error.as_ref()
    }

    pub fn detail_error(&self) -> Option<&ErrorInfo> {
        self.detail_error.as_ref()
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.auto_refresh_enabled
    }

    pub fn last_successful_update(&self) -> Option<DateTime<Local>> {
        self.last_successful_update
    }

    pub fn active_request_token(&self) -> Option<RequestToken> {
        self.active_request_token
    }

    /// Whether periodic ticks should currently be scheduled
    pub fn timer_armed(&self) -> bool {
        self.auto_refresh_enabled && !self.selected_guild.is_empty()
    }

    /// Apply one action and report the resulting work
    pub fn apply(&mut self, action: Action) -> Transition {
        let mut transition = Transition::default();

        match action {
            Action::LoadGuilds => self.load_guilds(&mut transition),
            Action::GuildsFetched(result) => self.guilds_fetched(result, &mut transition),
            Action::SelectGuild(name) => self.select_guild(name, &mut transition),
            Action::SetAutoRefresh(enabled) => self.set_auto_refresh(enabled, &mut transition),
            Action::RefreshNow => {
                if !self.selected_guild.is_empty() {
                    self.start_detail_fetch(&mut transition);
                }
            }
            Action::Tick => {
                if self.timer_armed() {
                    self.start_detail_fetch(&mut transition);
                }
            }
            Action::DetailFetched {
                token,
                guild,
                result,
                at,
            } => self.detail_fetched(token, guild, result, at, &mut transition),
        }

        transition
    }

    fn load_guilds(&mut self, t: &mut Transition) {
        if self.list_loading {
            return; // Already fetching
        }

        self.list_loading = true;
        t.effects.push(Effect::FetchGuilds);
        t.events
            .push(StateEvent::StatusMessage("Loading guilds...".to_string()));
    }

    fn guilds_fetched(&mut self, result: Result<Vec<GuildSummary>, GatewayError>, t: &mut Transition) {
        match result {
            Ok(guilds) => {
                let count = guilds.len();
                self.guild_list = guilds;
                self.list_error = None;
                t.events.push(StateEvent::GuildsLoaded { count });
                t.events
                    .push(StateEvent::StatusMessage(format!("Loaded {} guilds", count)));
            }
            Err(e) => {
                t.events
                    .push(StateEvent::LogError(format!("Failed to load guilds: {}", e)));
                t.events.push(StateEvent::StatusMessage(format!("Error: {}", e)));
                self.list_error = Some(ErrorInfo::from(&e));
            }
        }
        self.list_loading = false;
    }

    fn select_guild(&mut self, name: String, t: &mut Transition) {
        if name.trim().is_empty() {
            self.selected_guild.clear();
            self.current_snapshot = None;
            self.detail_error = None;
            // Outstanding fetches can no longer match
            self.active_request_token = None;
            self.detail_loading = false;
            return;
        }

        if name == self.selected_guild {
            return;
        }

        self.selected_guild = name;
        self.current_snapshot = None;
        self.detail_error = None;
        self.start_detail_fetch(t);
        t.effects.push(Effect::RestartTimer);
    }

    fn set_auto_refresh(&mut self, enabled: bool, t: &mut Transition) {
        if enabled == self.auto_refresh_enabled {
            return;
        }

        self.auto_refresh_enabled = enabled;
        t.events.push(StateEvent::LogInfo(format!(
            "Auto-refresh {}",
            if enabled { "enabled" } else { "disabled" }
        )));
        if self.timer_armed() {
            t.effects.push(Effect::RestartTimer);
        }
    }

    fn start_detail_fetch(&mut self, t: &mut Transition) {
        self.next_token += 1;
        let token = RequestToken(self.next_token);

        self.active_request_token = Some(token);
        self.detail_loading = true;

        t.effects.push(Effect::FetchDetail {
            token,
            guild: self.selected_guild.clone(),
        });
    }

    fn detail_fetched(
        &mut self,
        token: RequestToken,
        guild: String,
        result: Result<GuildSnapshot, GatewayError>,
        at: DateTime<Local>,
        t: &mut Transition,
    ) {
        if self.active_request_token != Some(token) {
            t.events.push(StateEvent::LogDebug(format!(
                "Discarded superseded result {} for {}",
                token, guild
            )));
            return;
        }

        self.detail_loading = false;

        match result {
            Ok(snapshot) => {
                t.events.push(StateEvent::SnapshotUpdated {
                    guild: snapshot.name.clone(),
                    online: snapshot.players_online,
                    total: snapshot.members_total,
                });
                t.events.push(StateEvent::StatusMessage(format!(
                    "{}: {} of {} online",
                    guild, snapshot.players_online, snapshot.members_total
                )));
                self.current_snapshot = Some(snapshot);
                self.detail_error = None;
                self.last_successful_update = Some(at);
            }
            Err(e) => {
                let info = ErrorInfo::from(&e);
                t.events
                    .push(StateEvent::LogError(format!("Failed to load {}: {}", guild, e)));
                t.events.push(StateEvent::StatusMessage(format!("Error: {}", e)));
                t.events.push(StateEvent::DetailFailed(info.clone()));
                self.detail_error = Some(info);
            }
        }
    }
}
