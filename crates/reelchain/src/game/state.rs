//! The authoritative turn state machine.
//!
//! One `GameState` exists per session. It owns the played-movie history,
//! player rotation, per-connector usage counts, the turn clock value, and
//! the over flag. Every rejection leaves the state untouched; every
//! acceptance appends exactly one move.

use super::connection::{Connection, ConnectionKind, validate_connection};
use super::error::GameError;
use super::player::Player;
use crate::catalog::{Catalog, Movie, PersonId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// How many accepted moves one `(connector, kind)` pair may validate within
/// a session. The next reuse is rejected even though the connection is
/// structurally valid.
pub const CONNECTION_USAGE_CAP: u32 = 3;

/// One accepted move: the movie, who played it, and the connection that
/// validated it (`None` for the opening move).
#[derive(Debug, Clone)]
pub struct PlayedMove {
    /// The movie that was played.
    pub movie: Movie,
    /// Index into the roster of the player who played it.
    pub player_index: usize,
    /// The validating connection, absent on the opening move.
    pub connection: Option<Connection>,
}

/// Authoritative session state: history, rotation, usage caps, clock.
#[derive(Debug, Clone)]
pub struct GameState {
    catalog: Arc<Catalog>,
    played: Vec<PlayedMove>,
    players: Vec<Player>,
    current_player_index: usize,
    round_count: u32,
    timer_seconds: u32,
    usage: HashMap<(PersonId, ConnectionKind), u32>,
    over: bool,
    winner: Option<usize>,
}

impl GameState {
    /// Creates a fresh state with the first roster entry to move.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::EmptyRoster`] when `players` is empty.
    #[instrument(skip(players, catalog), fields(players = players.len()))]
    pub fn new(players: Vec<Player>, catalog: Arc<Catalog>) -> Result<Self, GameError> {
        if players.is_empty() {
            return Err(GameError::EmptyRoster);
        }
        info!(players = players.len(), "starting game");
        Ok(Self {
            catalog,
            played: Vec::new(),
            players,
            current_player_index: 0,
            round_count: 0,
            timer_seconds: 0,
            usage: HashMap::new(),
            over: false,
            winner: None,
        })
    }

    /// Attempts to play a movie for the current player.
    ///
    /// On acceptance the move is appended to history, the mover's win
    /// condition advances, the turn passes to the next player, and the
    /// round count increments; the validating connection (if any) is
    /// returned. On rejection nothing changes.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameAlreadyOver`] once the game has ended
    /// - [`GameError::DuplicateMove`] if the current player already played
    ///   this exact title
    /// - [`GameError::InvalidConnection`] when the movie shares no one with
    ///   the previously played movie
    /// - [`GameError::ConnectionOveruse`] when the shared connector and
    ///   kind already validated [`CONNECTION_USAGE_CAP`] moves
    #[instrument(skip(self, movie), fields(title = %movie.title))]
    pub fn make_move(&mut self, movie: Movie) -> Result<Option<Connection>, GameError> {
        if self.over {
            return Err(GameError::GameAlreadyOver);
        }
        let mover = self.current_player_index;
        if self
            .played
            .iter()
            .any(|m| m.player_index == mover && m.movie.title == movie.title)
        {
            warn!(title = %movie.title, "player repeated a title");
            return Err(GameError::DuplicateMove {
                title: movie.title.clone(),
            });
        }

        let connection = match self.played.last() {
            Some(last) => {
                let conn = validate_connection(&last.movie, &movie).ok_or_else(|| {
                    GameError::InvalidConnection {
                        source: last.movie.title.clone(),
                        target: movie.title.clone(),
                    }
                })?;
                let used = self.usage.get(&conn.usage_key()).copied().unwrap_or(0);
                if used >= CONNECTION_USAGE_CAP {
                    warn!(connection = %conn.description(), used, "connection overused");
                    return Err(GameError::ConnectionOveruse {
                        connector: conn.connector.name.clone(),
                        kind: conn.kind,
                        used,
                        cap: CONNECTION_USAGE_CAP,
                    });
                }
                Some(conn)
            }
            None => None,
        };

        if let Some(conn) = &connection {
            *self.usage.entry(conn.usage_key()).or_insert(0) += 1;
        }

        self.players[mover].update_progress(&movie);
        info!(
            title = %movie.title,
            player = %self.players[mover].name,
            round = self.round_count,
            "move accepted"
        );
        self.played.push(PlayedMove {
            movie,
            player_index: mover,
            connection: connection.clone(),
        });
        self.current_player_index = (mover + 1) % self.players.len();
        self.round_count += 1;
        Ok(connection)
    }

    /// Looks up a title in the catalog and plays it.
    ///
    /// # Errors
    ///
    /// [`GameError::MovieNotFound`] when the catalog has no playable movie
    /// under the exact title, plus everything [`Self::make_move`] rejects.
    pub fn make_move_by_title(&mut self, title: &str) -> Result<Option<Connection>, GameError> {
        let movie = self
            .catalog
            .find_movie(title)
            .cloned()
            .ok_or_else(|| GameError::MovieNotFound {
                title: title.to_string(),
            })?;
        self.make_move(movie)
    }

    /// Scans players in roster order for a met win condition.
    ///
    /// The first qualifying player ends the game and is returned; roster
    /// order is the tie-break for simultaneous qualification. Returns
    /// `None` once the game is over, making the call idempotent after a
    /// winner is found.
    #[instrument(skip(self))]
    pub fn check_win_condition(&mut self) -> Option<&Player> {
        if self.over {
            return None;
        }
        let index = self
            .players
            .iter()
            .position(|p| p.has_won(&self.played))?;
        self.over = true;
        self.winner = Some(index);
        info!(winner = %self.players[index].name, "win condition met");
        Some(&self.players[index])
    }

    /// Sets the turn clock to an absolute number of seconds.
    pub fn set_timer(&mut self, seconds: u32) {
        self.timer_seconds = seconds;
    }

    /// Subtracts one second from the turn clock.
    ///
    /// Reaching zero ends the game unconditionally and returns `true`; no
    /// winner is decided here - the session layer resolves timeouts.
    pub fn decrement_timer(&mut self) -> bool {
        self.timer_seconds = self.timer_seconds.saturating_sub(1);
        if self.timer_seconds == 0 {
            debug!("turn clock expired");
            self.over = true;
            return true;
        }
        false
    }

    /// The roster index that wins a timeout: the player after the one whose
    /// clock expired, i.e. next in rotation.
    pub fn timeout_winner_index(&self) -> usize {
        (self.current_player_index + 1) % self.players.len()
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    /// The player who moves after the current one.
    pub fn next_player(&self) -> &Player {
        &self.players[self.timeout_winner_index()]
    }

    /// The player at a roster index.
    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Independent copy of the played movies, in play order.
    pub fn played_movies(&self) -> Vec<Movie> {
        self.played.iter().map(|m| m.movie.clone()).collect()
    }

    /// The played-move history.
    pub fn played(&self) -> &[PlayedMove] {
        &self.played
    }

    /// Independent copy of the roster with current progress.
    pub fn players(&self) -> Vec<Player> {
        self.players.clone()
    }

    /// Independent copy of every connection that validated a move.
    pub fn used_connections(&self) -> Vec<Connection> {
        self.played
            .iter()
            .filter_map(|m| m.connection.clone())
            .collect()
    }

    /// How many accepted moves this connection's `(connector, kind)` pair
    /// has validated.
    pub fn connection_usage(&self, connection: &Connection) -> u32 {
        self.usage
            .get(&connection.usage_key())
            .copied()
            .unwrap_or(0)
    }

    /// Rounds played so far (accepted moves).
    pub fn round_count(&self) -> u32 {
        self.round_count
    }

    /// Seconds left on the turn clock.
    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    /// Whether the game has ended.
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// The winning player, once a win condition has been detected.
    pub fn winner(&self) -> Option<&Player> {
        self.winner.map(|i| &self.players[i])
    }

    /// The catalog backing this session.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}
