//! Per-player win conditions.
//!
//! A condition tracks progress toward a count threshold: N movies of a
//! genre, with an actor, or by a director. Progress moves by at most one
//! per played movie - a movie counts once even if the target appears several
//! times in its credits.
//!
//! Matching rules mirror the original game: genre comparison is exact and
//! case-sensitive, actor and director name comparison is case-insensitive.

use super::state::PlayedMove;
use crate::catalog::{Catalog, Movie};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The three built-in condition families.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WinKind {
    /// Play N movies of a target genre.
    Genre,
    /// Play N movies featuring a target actor.
    Actor,
    /// Play N movies directed by a target director.
    Director,
}

/// A player's win condition and progress toward it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WinCondition {
    /// Movies whose genre list contains the target (exact match).
    Genre {
        /// Target genre name.
        target: String,
        /// Matches needed to win.
        required: u32,
        /// Matches so far.
        current: u32,
    },
    /// Movies whose cast includes the target actor (name match,
    /// case-insensitive).
    Actor {
        /// Target actor name.
        target: String,
        /// Matches needed to win.
        required: u32,
        /// Matches so far.
        current: u32,
    },
    /// Movies whose crew includes the target as "director" (name and role
    /// match, both case-insensitive).
    Director {
        /// Target director name.
        target: String,
        /// Matches needed to win.
        required: u32,
        /// Matches so far.
        current: u32,
    },
}

impl WinCondition {
    /// Genre condition with zero progress.
    pub fn genre(target: impl Into<String>, required: u32) -> Self {
        Self::Genre {
            target: target.into(),
            required,
            current: 0,
        }
    }

    /// Actor condition with zero progress.
    pub fn actor(target: impl Into<String>, required: u32) -> Self {
        Self::Actor {
            target: target.into(),
            required,
            current: 0,
        }
    }

    /// Director condition with zero progress.
    pub fn director(target: impl Into<String>, required: u32) -> Self {
        Self::Director {
            target: target.into(),
            required,
            current: 0,
        }
    }

    /// Builds a condition of the given kind with a target drawn uniformly
    /// from the catalog's indexed values.
    ///
    /// Returns `None` when the catalog has nothing to draw from.
    pub fn random_for(kind: WinKind, catalog: &Catalog, required: u32) -> Option<Self> {
        match kind {
            WinKind::Genre => catalog.random_genre().map(|g| Self::genre(g, required)),
            WinKind::Actor => catalog.random_actor().map(|a| Self::actor(a, required)),
            WinKind::Director => catalog.random_director().map(|d| Self::director(d, required)),
        }
    }

    /// Which family this condition belongs to.
    pub fn kind(&self) -> WinKind {
        match self {
            Self::Genre { .. } => WinKind::Genre,
            Self::Actor { .. } => WinKind::Actor,
            Self::Director { .. } => WinKind::Director,
        }
    }

    /// The target genre or person name.
    pub fn target(&self) -> &str {
        match self {
            Self::Genre { target, .. } | Self::Actor { target, .. } | Self::Director { target, .. } => {
                target
            }
        }
    }

    /// Matches needed to win.
    pub fn required(&self) -> u32 {
        match self {
            Self::Genre { required, .. }
            | Self::Actor { required, .. }
            | Self::Director { required, .. } => *required,
        }
    }

    /// Matches counted so far.
    pub fn current(&self) -> u32 {
        match self {
            Self::Genre { current, .. }
            | Self::Actor { current, .. }
            | Self::Director { current, .. } => *current,
        }
    }

    /// Inspects a newly played movie and advances progress by zero or one.
    pub fn update_progress(&mut self, movie: &Movie) {
        let matched = match &*self {
            Self::Genre { target, .. } => movie.genres.iter().any(|g| g == target),
            Self::Actor { target, .. } => movie
                .cast
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(target)),
            Self::Director { target, .. } => movie.crew.iter().any(|p| {
                p.role.eq_ignore_ascii_case("director") && p.name.eq_ignore_ascii_case(target)
            }),
        };
        if matched {
            match self {
                Self::Genre { target, required, current }
                | Self::Actor { target, required, current }
                | Self::Director { target, required, current } => {
                    *current += 1;
                    debug!(
                        target = %target,
                        progress = format!("{current}/{required}"),
                        movie = %movie.title,
                        "win condition advanced"
                    );
                }
            }
        }
    }

    /// Whether the threshold has been reached.
    ///
    /// The played-move slice is part of the uniform interface; none of the
    /// built-in conditions consult it.
    pub fn is_met(&self, _played: &[PlayedMove]) -> bool {
        self.current() >= self.required()
    }

    /// Progress as a fraction in `[0.0, 1.0]`.
    ///
    /// A zero `required` count is trivially satisfied and reports 1.0.
    pub fn progress_fraction(&self) -> f64 {
        let required = self.required();
        if required == 0 {
            return 1.0;
        }
        (f64::from(self.current()) / f64::from(required)).min(1.0)
    }

    /// Human-readable objective, e.g. `"Play 5 Action movies"`.
    pub fn description(&self) -> String {
        match self {
            Self::Genre { target, required, .. } => format!("Play {required} {target} movies"),
            Self::Actor { target, required, .. } => {
                format!("Play {required} movies with {target}")
            }
            Self::Director { target, required, .. } => {
                format!("Play {required} movies directed by {target}")
            }
        }
    }
}
