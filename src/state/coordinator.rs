//! Refresh coordinator
//!
//! Drives a [`RefreshState`]: spawns gateway calls on the tokio runtime,
//! feeds their results back in as they finish, and fires auto-refresh ticks.
//! It is polled by its owner (once per GUI frame, or in a loop by the
//! headless watcher); all state changes happen inside `&mut self` calls.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::state::roster::{Action, Effect, RefreshState, RequestToken};
use crate::state::StateEvent;
use crate::task::{drain_finished, poll_task, PollResult};
use crate::tibia::{GatewayError, GuildGateway, GuildSnapshot, GuildSummary};

/// How often the headless watcher checks for finished work
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Settings for a coordinator session
#[derive(Debug, Clone)]
pub struct RefreshSettings {
    /// World whose guild list is loaded
    pub world: String,
    /// Time between auto-refresh ticks
    pub interval: Duration,
    /// Initial state of the auto-refresh toggle
    pub auto_refresh: bool,
}

type ListTask = JoinHandle<Result<Vec<GuildSummary>, GatewayError>>;
type DetailTask = JoinHandle<Result<GuildSnapshot, GatewayError>>;

/// Owns the refresh state and the fetches working on it
pub struct Coordinator {
    state: RefreshState,
    gateway: Arc<dyn GuildGateway>,
    world: String,
    interval: Duration,
    /// Async task for the guild list
    list_task: Option<ListTask>,
    /// Detail fetches, including superseded ones still running
    detail_tasks: Vec<((RequestToken, String), DetailTask)>,
    /// When the next auto-refresh tick is due
    next_tick: Option<Instant>,
}

impl Coordinator {
    pub fn new(gateway: Arc<dyn GuildGateway>, settings: RefreshSettings) -> Self {
        Self {
            state: RefreshState::new(settings.auto_refresh),
            gateway,
            world: settings.world,
            interval: settings.interval,
            list_task: None,
            detail_tasks: Vec::new(),
            next_tick: None,
        }
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &RefreshState {
        &self.state
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Load the guild list. Called once at startup, and again to retry.
    pub fn reload_guilds(&mut self) -> Vec<StateEvent> {
        self.dispatch(Action::LoadGuilds)
    }

    pub fn select_guild(&mut self, name: &str) -> Vec<StateEvent> {
        self.dispatch(Action::SelectGuild(name.to_string()))
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) -> Vec<StateEvent> {
        self.dispatch(Action::SetAutoRefresh(enabled))
    }

    pub fn refresh_now(&mut self) -> Vec<StateEvent> {
        self.dispatch(Action::RefreshNow)
    }

    /// Number of detail fetches still running, superseded ones included
    pub fn pending_detail_fetches(&self) -> usize {
        self.detail_tasks.len()
    }

    /// Time left until the next auto-refresh tick, if one is scheduled
    pub fn time_until_tick(&self) -> Option<Duration> {
        self.next_tick
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Collect finished fetches and fire a due tick
    pub fn poll(&mut self) -> Vec<StateEvent> {
        let mut events = Vec::new();

        match poll_task(&mut self.list_task) {
            PollResult::Complete(result) => {
                let result = result.unwrap_or_else(|e| Err(panicked(e)));
                events.extend(self.dispatch(Action::GuildsFetched(result)));
            }
            PollResult::Pending | PollResult::NoTask => {}
        }

        for ((token, guild), result) in drain_finished(&mut self.detail_tasks) {
            let result = result.unwrap_or_else(|e| Err(panicked(e)));
            events.extend(self.dispatch(Action::DetailFetched {
                token,
                guild,
                result,
                at: Local::now(),
            }));
        }

        if let Some(due) = self.next_tick {
            if Instant::now() >= due {
                self.next_tick = Some(Instant::now() + self.interval);
                tracing::debug!("Auto-refresh tick");
                events.extend(self.dispatch(Action::Tick));
            }
        }

        events
    }

    /// Wait until polling produces something, for callers without a frame loop
    pub async fn next_events(&mut self) -> Vec<StateEvent> {
        loop {
            let events = self.poll();
            if !events.is_empty() {
                return events;
            }

            let wait = self
                .time_until_tick()
                .map_or(IDLE_POLL, |until| until.min(IDLE_POLL));
            tokio::time::sleep(wait).await;
        }
    }

    fn dispatch(&mut self, action: Action) -> Vec<StateEvent> {
        let transition = self.state.apply(action);

        for effect in transition.effects {
            self.run(effect);
        }

        // Keep the timer in line with the state: no selection or disabled means no ticks
        if !self.state.timer_armed() {
            self.next_tick = None;
        } else if self.next_tick.is_none() {
            self.next_tick = Some(Instant::now() + self.interval);
        }

        transition.events
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::FetchGuilds => {
                let gateway = Arc::clone(&self.gateway);
                let world = self.world.clone();
                tracing::info!("Fetching guilds for {}", world);
                self.list_task = Some(tokio::spawn(async move {
                    gateway.list_guilds(&world).await
                }));
            }
            Effect::FetchDetail { token, guild } => {
                let gateway = Arc::clone(&self.gateway);
                let name = guild.clone();
                tracing::debug!("Fetching {} with token {}", guild, token);
                let task = tokio::spawn(async move { gateway.fetch_guild_detail(&name).await });
                self.detail_tasks.push(((token, guild), task));
            }
            Effect::RestartTimer => {
                self.next_tick = Some(Instant::now() + self.interval);
            }
        }
    }
}

fn panicked(err: tokio::task::JoinError) -> GatewayError {
    GatewayError::Unavailable(format!("fetch task failed: {}", err))
}
