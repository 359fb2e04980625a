//! Game error types.
//!
//! Every variant is non-fatal and locally recoverable: a rejected move
//! leaves the engine exactly as it was, and the caller owns any diagnostic
//! text derived from the error.

use super::connection::ConnectionKind;
use derive_more::{Display, Error};

/// Rejection reasons for session and engine operations.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum GameError {
    /// The submitted title matched no playable movie.
    #[display("movie not found: \"{title}\"")]
    MovieNotFound {
        /// The title as submitted.
        title: String,
    },

    /// The movies share no cast or crew member.
    #[display("no connection between \"{source}\" and \"{target}\"")]
    InvalidConnection {
        /// Title of the previously played movie.
        #[error(not(source))]
        source: String,
        /// Title of the attempted movie.
        target: String,
    },

    /// A structurally valid connection was refused because the same
    /// connector and kind already validated the maximum number of moves.
    #[display("connection {connector} ({kind}) already used {used} times (maximum {cap})")]
    ConnectionOveruse {
        /// Name of the shared person.
        connector: String,
        /// Whether the link was via cast or crew.
        kind: ConnectionKind,
        /// Accepted moves this pair has already validated.
        used: u32,
        /// The per-session reuse cap.
        cap: u32,
    },

    /// The current player already played this exact title.
    #[display("\"{title}\" was already played this session")]
    DuplicateMove {
        /// The repeated title.
        title: String,
    },

    /// No further moves are accepted once the game has ended.
    #[display("game is already over")]
    GameAlreadyOver,

    /// A game cannot start without players.
    #[display("cannot start a game with an empty roster")]
    EmptyRoster,
}
