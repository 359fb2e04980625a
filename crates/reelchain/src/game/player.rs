//! Players and their progress.

use super::state::PlayedMove;
use super::win::WinCondition;
use crate::catalog::Movie;
use serde::{Deserialize, Serialize};

/// A participant in a session, owning one win condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Display name.
    pub name: String,
    /// The condition this player is racing toward.
    pub condition: WinCondition,
}

impl Player {
    /// Creates a player with zero progress.
    pub fn new(name: impl Into<String>, condition: WinCondition) -> Self {
        Self {
            name: name.into(),
            condition,
        }
    }

    /// Feeds a movie this player just played into their condition.
    pub fn update_progress(&mut self, movie: &Movie) {
        self.condition.update_progress(movie);
    }

    /// Whether this player's condition is met.
    pub fn has_won(&self, played: &[PlayedMove]) -> bool {
        self.condition.is_met(played)
    }

    /// Progress toward the condition in `[0.0, 1.0]`.
    pub fn progress_fraction(&self) -> f64 {
        self.condition.progress_fraction()
    }

    /// Progress as a whole percentage, capped at 100.
    pub fn progress_percent(&self) -> u32 {
        (self.progress_fraction() * 100.0) as u32
    }
}
