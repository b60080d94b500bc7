pub mod engine;
pub mod error;
pub mod rng;
pub mod world;

use std::path::Path;

use log::info;

use engine::{Explorer, Travel};
use error::Result;
use rng::GameRng;
use world::{Direction, Dungeon, DungeonConfig, PlacementSummary, Position, place_content};

pub use error::DungeonError;
pub use world::{load_config_from_file, load_config_from_str};

/// One play session: the dungeon, the explorer walking it and the single
/// random stream every roll in the session draws from.
pub struct Session {
    pub dungeon: Dungeon,
    pub explorer: Explorer,
    pub summary: PlacementSummary,
    rng: GameRng,
}

impl Session {
    pub fn new(config: &DungeonConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = GameRng::from_seed_opt(config.seed);
        info!("new session (seed {})", rng.seed());

        let mut dungeon = config.builder().build(&mut rng)?;
        let summary = place_content(&mut dungeon, &mut rng);

        let start = dungeon.start().ok_or(DungeonError::MissingStart)?;
        let explorer = Explorer::with_stats(start, config.explorer_health, config.explorer_attack);

        Ok(Self {
            dungeon,
            explorer,
            summary,
            rng,
        })
    }

    /// Resume from parts already in memory, e.g. a loaded save.
    pub fn from_parts(dungeon: Dungeon, explorer: Explorer, rng: GameRng) -> Self {
        Self {
            dungeon,
            explorer,
            summary: PlacementSummary::default(),
            rng,
        }
    }

    pub fn available_directions(&self) -> Vec<Direction> {
        self.explorer.available_directions(&self.dungeon)
    }

    pub fn step(&mut self, direction: Direction) -> bool {
        self.explorer.step(&mut self.dungeon, direction)
    }

    pub fn explore(&mut self) -> String {
        self.explorer
            .explore_current_room(&mut self.dungeon, &mut self.rng)
    }

    pub fn find_path(&self, destination: Position) -> Vec<(Direction, Position)> {
        self.explorer.find_path(&self.dungeon, destination)
    }

    pub fn travel_to(&mut self, destination: Position) -> Travel {
        self.explorer
            .move_to(&mut self.dungeon, &mut self.rng, destination)
    }

    /// Equip the inventory entry at `index` (0-based).
    pub fn equip(&mut self, index: usize) -> String {
        match self.explorer.inventory.get(index).cloned() {
            Some(item) => self.explorer.equip(&item),
            None => "no such item".to_string(),
        }
    }

    /// Use the inventory entry at `index` (0-based).
    pub fn use_item(&mut self, index: usize) -> String {
        match self.explorer.inventory.get(index).cloned() {
            Some(item) => self.explorer.use_item(&item),
            None => "no such item".to_string(),
        }
    }

    pub fn is_over(&self) -> bool {
        !self.explorer.is_alive()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        world::save_game(path, &self.dungeon, &self.explorer)
    }

    /// Load a save. The random stream is not part of the save file, so the
    /// caller picks a seed (or gets a fresh one).
    pub fn load(path: &Path, seed: Option<u64>) -> Result<Self> {
        let (dungeon, explorer) = world::load_game(path)?;
        Ok(Self::from_parts(dungeon, explorer, GameRng::from_seed_opt(seed)))
    }
}
