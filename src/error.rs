use thiserror::Error;

use crate::world::Position;

/// Errors raised while building, loading or saving a dungeon.
///
/// Gameplay refusals (walking into a wall, using a non-consumable) are not
/// errors; those come back as plain messages from the explorer operations.
#[derive(Debug, Error)]
pub enum DungeonError {
    /// Rejected configuration value (dimensions, probabilities, attempts).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid room count {requested}: must be between 1 and {capacity}")]
    InvalidRoomCount { requested: usize, capacity: usize },

    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    #[error("no room at {0}")]
    MissingRoom(Position),

    #[error("cell {0} is already occupied")]
    OccupiedCell(Position),

    #[error("cell {0} is outside the map")]
    OutOfBounds(Position),

    #[error("dungeon has no start room")]
    MissingStart,

    /// Every generation attempt produced rooms unreachable from the start.
    #[error("generated dungeon is not fully reachable after {attempts} attempt(s)")]
    UnreachableMap { attempts: u32 },

    #[error("unknown content kind: {0}")]
    UnknownContentKind(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, DungeonError>;
