//! Game engine: connection validation, win conditions, and the turn state
//! machine.

mod connection;
mod error;
mod player;
mod state;
mod win;

pub use connection::{Connection, ConnectionKind, validate_connection};
pub use error::GameError;
pub use player::Player;
pub use state::{CONNECTION_USAGE_CAP, GameState, PlayedMove};
pub use win::{WinCondition, WinKind};
