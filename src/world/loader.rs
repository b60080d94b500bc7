use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::generator::{DEFAULT_EXTRA_CONNECTION_CHANCE, DungeonBuilder};
use crate::error::{DungeonError, Result};

pub const DEFAULT_HEALTH: i32 = 5;
pub const DEFAULT_ATTACK: i32 = 1;

/// Runtime generation and explorer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DungeonConfig {
    pub width: i32,
    pub height: i32,
    pub rooms: usize,
    pub seed: Option<u64>,
    pub max_attempts: u32,
    pub extra_connection_chance: f64,
    pub explorer_health: i32,
    pub explorer_attack: i32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            rooms: 12,
            seed: None,
            max_attempts: 1,
            extra_connection_chance: DEFAULT_EXTRA_CONNECTION_CHANCE,
            explorer_health: DEFAULT_HEALTH,
            explorer_attack: DEFAULT_ATTACK,
        }
    }
}

impl DungeonConfig {
    pub fn builder(&self) -> DungeonBuilder {
        DungeonBuilder::new(self.width, self.height, self.rooms)
            .extra_connection_chance(self.extra_connection_chance)
            .max_attempts(self.max_attempts)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(DungeonError::Configuration(format!(
                "dungeon.width and dungeon.height must be positive (got {}x{})",
                self.width, self.height
            )));
        }
        let capacity = self.width as usize * self.height as usize;
        if self.rooms == 0 || self.rooms > capacity {
            return Err(DungeonError::InvalidRoomCount {
                requested: self.rooms,
                capacity,
            });
        }
        if self.max_attempts == 0 {
            return Err(DungeonError::Configuration(
                "dungeon.max_attempts must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.extra_connection_chance) {
            return Err(DungeonError::Configuration(format!(
                "dungeon.extra_connection_chance must be within [0, 1] (got {})",
                self.extra_connection_chance
            )));
        }
        if self.explorer_health <= 0 {
            return Err(DungeonError::Configuration(
                "explorer.health must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    dungeon: DungeonSection, // [dungeon]
    #[serde(default)]
    explorer: ExplorerSection, // [explorer]
}

#[derive(Deserialize, Default)]
struct DungeonSection {
    #[serde(default)]
    width: Option<i32>,
    #[serde(default)]
    height: Option<i32>,
    #[serde(default)]
    rooms: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    max_attempts: Option<u32>,
    #[serde(default)]
    extra_connection_chance: Option<f64>,
}

#[derive(Deserialize, Default)]
struct ExplorerSection {
    #[serde(default)]
    health: Option<i32>,
    #[serde(default)]
    attack: Option<i32>,
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Public API: load a generation config from a .toml file on disk.
pub fn load_config_from_file(path: &Path) -> Result<DungeonConfig> {
    let contents = fs::read_to_string(path)?;
    load_config_from_str(&contents)
}

/// Public API: parse a generation config; missing keys take defaults.
pub fn load_config_from_str(contents: &str) -> Result<DungeonConfig> {
    let file: ConfigFile = toml::from_str(contents)?;
    let defaults = DungeonConfig::default();

    let config = DungeonConfig {
        width: file.dungeon.width.unwrap_or(defaults.width),
        height: file.dungeon.height.unwrap_or(defaults.height),
        rooms: file.dungeon.rooms.unwrap_or(defaults.rooms),
        seed: file.dungeon.seed,
        max_attempts: file.dungeon.max_attempts.unwrap_or(defaults.max_attempts),
        extra_connection_chance: file
            .dungeon
            .extra_connection_chance
            .unwrap_or(defaults.extra_connection_chance),
        explorer_health: file.explorer.health.unwrap_or(defaults.explorer_health),
        explorer_attack: file.explorer.attack.unwrap_or(defaults.explorer_attack),
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(load_config_from_str("").unwrap(), DungeonConfig::default());
    }

    #[test]
    fn reads_both_sections() {
        let cfg = load_config_from_str(
            r#"
            [dungeon]
            width = 10
            height = 4
            rooms = 20
            seed = 42
            max_attempts = 3

            [explorer]
            health = 9
            "#,
        )
        .unwrap();
        assert_eq!(cfg.width, 10);
        assert_eq!(cfg.rooms, 20);
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.explorer_health, 9);
        assert_eq!(cfg.explorer_attack, DEFAULT_ATTACK);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            load_config_from_str("[dungeon]\nwidth = 2\nheight = 2\nrooms = 5\n"),
            Err(DungeonError::InvalidRoomCount { requested: 5, capacity: 4 })
        ));
        assert!(matches!(
            load_config_from_str("[dungeon]\nheight = -1\n"),
            Err(DungeonError::Configuration(_))
        ));
        assert!(matches!(
            load_config_from_str("[dungeon]\nextra_connection_chance = 1.5\n"),
            Err(DungeonError::Configuration(_))
        ));
        assert!(matches!(
            load_config_from_str("[dungeon\n"),
            Err(DungeonError::Toml(_))
        ));
    }
}
