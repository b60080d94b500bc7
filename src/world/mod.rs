mod content;
mod generator;
mod item;
pub mod loader;
mod model;
mod placement;
pub mod save;
mod validator;

pub use content::{Boss, Content, ContentKind, Event, EventEffect, Monster, Treasure};
pub use generator::{DungeonBuilder, build};
pub use item::{BoostDuration, EffectRecord, Item, ItemCategory, ItemEffect, ItemRecord};
pub use loader::{DungeonConfig, load_config_from_file, load_config_from_str};
pub use model::{Direction, Dungeon, DungeonStats, Position, Room};
pub use placement::{PlacementSummary, place_content};
pub use save::{load_from_str, load_game, save_game, save_to_string};
pub use validator::{ValidationError, validate_dungeon};
