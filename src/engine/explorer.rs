use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};
use crate::world::loader::{DEFAULT_ATTACK, DEFAULT_HEALTH};
use crate::world::{Dungeon, Item, Position};

/// Temporary attack bonus, counted down once per room transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buff {
    #[serde(alias = "ataque")]
    pub attack_bonus: i32,
    #[serde(alias = "restante_habitaciones")]
    pub remaining_rooms: i32,
}

/// The agent walking the dungeon.
///
/// The explorer never owns the dungeon; every operation that reads or
/// changes rooms takes it as an argument. A dead explorer (health 0) is not
/// blocked from anything here: callers check [`Explorer::is_alive`].
#[derive(Debug, Clone, PartialEq)]
pub struct Explorer {
    pub position: Position,
    /// Floored at 0. There is no maximum.
    pub health: i32,
    pub base_attack: i32,
    pub inventory: Vec<Item>,
    pub equipped: BTreeMap<String, Item>,
    pub buffs: Vec<Buff>,
}

impl Explorer {
    /// A fresh explorer standing in the dungeon's start room.
    pub fn new(dungeon: &Dungeon) -> Result<Self> {
        let start = dungeon.start().ok_or(DungeonError::MissingStart)?;
        Ok(Self::with_stats(start, DEFAULT_HEALTH, DEFAULT_ATTACK))
    }

    pub fn with_stats(position: Position, health: i32, base_attack: i32) -> Self {
        Self {
            position,
            health: health.max(0),
            base_attack,
            inventory: Vec::new(),
            equipped: BTreeMap::new(),
            buffs: Vec::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn damage_intake(&mut self, amount: i32) {
        self.health = self.health.saturating_sub(amount).max(0);
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = self.health.saturating_add(amount);
    }

    /// Base attack plus equipment and active buffs, never below 1.
    pub fn compute_attack(&self) -> i32 {
        self.equipped
            .values()
            .map(Item::attack_bonus)
            .chain(self.buffs.iter().map(|b| b.attack_bonus))
            .fold(self.base_attack, i32::saturating_add)
            .max(1)
    }

    pub fn inventory_value(&self) -> u32 {
        self.inventory.iter().map(|i| i.value).fold(0, u32::saturating_add)
    }
}
