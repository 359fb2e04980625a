//! Game session management.
//!
//! A [`GameSession`] wraps one [`GameState`] behind a single mutex so that
//! the two mutation paths - user-move processing and the periodic turn
//! timer - are serialized: a tick can never fire midway through a move's
//! validate-and-apply sequence. No awaits happen inside the critical
//! section.
//!
//! The timer is a cancellable background task. [`GameSession::stop_timer`]
//! signals cancellation and awaits the task, guaranteeing that no further
//! tick fires once it returns.

use crate::catalog::Catalog;
use crate::game::{Connection, GameError, GameState, Player};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

/// How many recently played titles a snapshot carries.
const RECENT_TITLE_COUNT: usize = 5;

/// Session-layer tunables.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Seconds on the clock at the start of each turn.
    pub turn_seconds: u32,
    /// Wall-clock duration of one timer tick. One second in play; tests
    /// shrink it.
    pub tick_period: Duration,
    /// Maximum autocomplete suggestions handed to the renderer.
    pub autocomplete_suggestions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 30,
            tick_period: Duration::from_secs(1),
            autocomplete_suggestions: 5,
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// A player met their win condition.
    Won {
        /// The winner's name.
        winner: String,
    },
    /// A turn clock ran out; the player next in rotation takes the game.
    TimedOut {
        /// The winner's name.
        winner: String,
    },
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveReport {
    /// The title as submitted.
    pub title: String,
    /// The connection that validated the move, absent on the opener.
    pub connection: Option<Connection>,
    /// The winner's name when this move ended the game.
    pub winner: Option<String>,
}

/// Per-player view for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProgress {
    /// Player name.
    pub name: String,
    /// Human-readable objective, e.g. `"Play 5 Action movies"`.
    pub objective: String,
    /// Progress toward the objective, 0-100.
    pub percent: u32,
}

/// Immutable state snapshot pulled by a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Name of the player to move.
    pub current_player: String,
    /// Rounds played so far.
    pub round: u32,
    /// Seconds left on the turn clock.
    pub timer_seconds: u32,
    /// The most recently played titles, oldest first.
    pub recent_titles: Vec<String>,
    /// Every player with their objective and progress.
    pub players: Vec<PlayerProgress>,
    /// Whether the game has ended.
    pub over: bool,
    /// How the game ended, once it has.
    pub outcome: Option<GameOutcome>,
    /// Text of the most recent rejection, cleared by an accepted move.
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct SessionInner {
    state: GameState,
    last_error: Option<String>,
    outcome: Option<GameOutcome>,
    timer_running: bool,
}

#[derive(Debug)]
struct TimerHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// One authoritative game session: state, clock, and diagnostics.
#[derive(Debug)]
pub struct GameSession {
    catalog: Arc<Catalog>,
    inner: Arc<Mutex<SessionInner>>,
    timer: Option<TimerHandle>,
    config: SessionConfig,
}

impl GameSession {
    /// Creates a session with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyRoster`] when `players` is empty.
    pub fn new(players: Vec<Player>, catalog: Arc<Catalog>) -> Result<Self, GameError> {
        Self::with_config(players, catalog, SessionConfig::default())
    }

    /// Creates a session with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyRoster`] when `players` is empty.
    #[instrument(skip(players, catalog, config), fields(players = players.len()))]
    pub fn with_config(
        players: Vec<Player>,
        catalog: Arc<Catalog>,
        config: SessionConfig,
    ) -> Result<Self, GameError> {
        let state = GameState::new(players, Arc::clone(&catalog))?;
        info!("creating game session");
        Ok(Self {
            catalog,
            inner: Arc::new(Mutex::new(SessionInner {
                state,
                last_error: None,
                outcome: None,
                timer_running: false,
            })),
            timer: None,
            config,
        })
    }

    /// Arms the first turn clock and starts ticking.
    pub async fn start(&mut self) {
        self.rearm_timer().await;
    }

    /// Processes a submitted title for the current player.
    ///
    /// On acceptance the turn timer is rearmed for the next player (or
    /// stopped when the move wins the game) and the last-error text is
    /// cleared. On rejection the timer keeps running, the engine state is
    /// untouched, and the rejection text is recorded for the renderer.
    ///
    /// # Errors
    ///
    /// Every [`GameError`] the engine produces, plus
    /// [`GameError::MovieNotFound`] for titles the catalog cannot resolve.
    #[instrument(skip(self))]
    pub async fn submit_title(&mut self, input: &str) -> Result<MoveReport, GameError> {
        let (connection, winner) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_over() {
                inner.last_error = Some(GameError::GameAlreadyOver.to_string());
                return Err(GameError::GameAlreadyOver);
            }
            match inner.state.make_move_by_title(input) {
                Ok(connection) => {
                    inner.last_error = None;
                    // Flag goes down before the lock is released: the
                    // outgoing timer task may already hold a queued tick,
                    // and with the flag down that tick is a no-op instead
                    // of expiring the clock mid-handoff.
                    inner.timer_running = false;
                    let winner = inner.state.check_win_condition().map(|p| p.name.clone());
                    if let Some(name) = &winner {
                        inner.outcome = Some(GameOutcome::Won {
                            winner: name.clone(),
                        });
                    }
                    (connection, winner)
                }
                Err(err) => {
                    inner.last_error = Some(err.to_string());
                    return Err(err);
                }
            }
        };

        if winner.is_some() {
            self.stop_timer().await;
        } else {
            self.rearm_timer().await;
        }
        Ok(MoveReport {
            title: input.to_string(),
            connection,
            winner,
        })
    }

    /// Stops the turn timer.
    ///
    /// Once this returns, no further tick will fire until the timer is
    /// rearmed.
    pub async fn stop_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.inner.lock().unwrap().timer_running = false;
            let _ = handle.cancel.send(true);
            let _ = handle.task.await;
            debug!("turn timer stopped");
        }
    }

    /// Resets the clock to a full turn and starts ticking, cancelling any
    /// previous timer task first.
    async fn rearm_timer(&mut self) {
        self.stop_timer().await;
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_over() {
                return;
            }
            inner.state.set_timer(self.config.turn_seconds);
            inner.timer_running = true;
        }

        let inner = Arc::clone(&self.inner);
        let period = self.config.tick_period;
        let (cancel, mut cancelled) = watch::channel(false);
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticks = tokio::time::interval_at(start, period);
            loop {
                tokio::select! {
                    _ = cancelled.changed() => break,
                    _ = ticks.tick() => {
                        let mut guard = inner.lock().unwrap();
                        if !guard.timer_running || guard.state.is_over() {
                            break;
                        }
                        if guard.state.decrement_timer() {
                            guard.timer_running = false;
                            let index = guard.state.timeout_winner_index();
                            let winner = guard
                                .state
                                .player(index)
                                .map(|p| p.name.clone())
                                .unwrap_or_default();
                            info!(%winner, "turn clock expired");
                            guard.outcome = Some(GameOutcome::TimedOut { winner });
                            break;
                        }
                    }
                }
            }
        });
        self.timer = Some(TimerHandle { cancel, task });
    }

    /// Builds an immutable snapshot for a renderer.
    pub fn snapshot(&self) -> GameSnapshot {
        let inner = self.inner.lock().unwrap();
        let state = &inner.state;
        let played = state.played();
        let tail_start = played.len().saturating_sub(RECENT_TITLE_COUNT);
        GameSnapshot {
            current_player: state.current_player().name.clone(),
            round: state.round_count(),
            timer_seconds: state.timer_seconds(),
            recent_titles: played[tail_start..]
                .iter()
                .map(|m| m.movie.title.clone())
                .collect(),
            players: state
                .players()
                .iter()
                .map(|p| PlayerProgress {
                    name: p.name.clone(),
                    objective: p.condition.description(),
                    percent: p.progress_percent(),
                })
                .collect(),
            over: state.is_over(),
            outcome: inner.outcome.clone(),
            last_error: inner.last_error.clone(),
        }
    }

    /// Up to the configured number of title suggestions for a prefix.
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.catalog
            .autocomplete(prefix, self.config.autocomplete_suggestions)
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.inner.lock().unwrap().state.is_over()
    }

    /// How the game ended, once it has.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.inner.lock().unwrap().outcome.clone()
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        // Signal only; a detached task stops at its next tick.
        if let Some(handle) = &self.timer {
            let _ = handle.cancel.send(true);
        }
    }
}
