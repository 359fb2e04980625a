//! Reelchain library - movie word-chain game core
//!
//! Players alternately name a movie that must share a cast or crew member
//! with the previously named movie, racing a per-turn clock and a per-player
//! win condition (N movies of a genre / with an actor / by a director).
//!
//! # Architecture
//!
//! - **Catalog**: movie records with title, genre, and person indices, plus
//!   a prefix trie for title autocomplete
//! - **Game**: connection validation, win conditions, and the authoritative
//!   turn state machine
//! - **Session**: one-session-per-game wrapper serializing player moves
//!   against a cancellable turn timer
//!
//! # Example
//!
//! ```
//! use reelchain::{Catalog, CreditEntry, GameState, MovieRecord, Player, WinCondition};
//! use std::sync::Arc;
//!
//! let mut catalog = Catalog::new();
//! catalog.add_movie(
//!     MovieRecord::new("Inception", 2010)
//!         .with_genres(["Action"])
//!         .with_cast([CreditEntry::new("Leonardo DiCaprio", "Cobb")])
//!         .with_crew([CreditEntry::new("Christopher Nolan", "Director")]),
//! );
//!
//! let players = vec![Player::new("Alice", WinCondition::genre("Action", 5))];
//! let mut game = GameState::new(players, Arc::new(catalog)).unwrap();
//! assert!(game.make_move_by_title("Inception").is_ok());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod catalog;
mod game;
mod session;

// Crate-level exports - Catalog and records
pub use catalog::{Catalog, CreditEntry, Movie, MovieRecord, Person, PersonId, TitleTrie};

// Crate-level exports - Game engine
pub use game::{
    CONNECTION_USAGE_CAP, Connection, ConnectionKind, GameError, GameState, PlayedMove, Player,
    WinCondition, WinKind, validate_connection,
};

// Crate-level exports - Session management
pub use session::{
    GameOutcome, GameSession, GameSnapshot, MoveReport, PlayerProgress, SessionConfig,
};
