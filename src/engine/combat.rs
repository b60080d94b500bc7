use log::debug;

use crate::engine::explorer::Explorer;
use crate::rng::GameRng;
use crate::world::{Boss, Monster};

/// Chance that the explorer opens a boss fight.
pub const BOSS_EXPLORER_FIRST: f64 = 0.35;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Explorer,
    Foe,
}

impl Turn {
    fn flip(self) -> Turn {
        match self {
            Turn::Explorer => Turn::Foe,
            Turn::Foe => Turn::Explorer,
        }
    }
}

/// One side of a fight as the loop sees it.
struct Foe<'a> {
    name: &'a str,
    health: i32,
    attack: i32,
    /// Upper bound of the explorer's damage roll against this foe.
    explorer_max_damage: i32,
}

/// Alternate turns until one side is at 0. Every turn deals at least 1, so
/// the loop ends within `foe.health + explorer.health` turns. Returns the
/// foe's final health (never negative).
fn exchange_blows(
    explorer: &mut Explorer,
    foe: Foe<'_>,
    opening: Turn,
    rng: &mut GameRng,
    log: &mut Vec<String>,
) -> i32 {
    let mut foe_health = foe.health;
    let mut turn = opening;

    while foe_health > 0 && explorer.health > 0 {
        let line = match turn {
            Turn::Explorer => {
                let dmg = rng.roll(foe.explorer_max_damage);
                foe_health = foe_health.saturating_sub(dmg);
                format!(
                    "you strike for {} damage, {} has {} hp left",
                    dmg,
                    foe.name,
                    foe_health.max(0)
                )
            }
            Turn::Foe => {
                let dmg = rng.roll(foe.attack);
                explorer.damage_intake(dmg);
                format!(
                    "{} hits you for {} damage, you have {} hp left",
                    foe.name, dmg, explorer.health
                )
            }
        };
        debug!("{}", line);
        log.push(line);
        turn = turn.flip();
    }

    foe_health.max(0)
}

/// Fight a monster starting with `opening`.
pub fn fight_monster(
    monster: &mut Monster,
    explorer: &mut Explorer,
    opening: Turn,
    rng: &mut GameRng,
) -> String {
    let mut log = vec![format!(
        "combat begins against {} ({} hp)",
        monster.name, monster.health
    )];

    let foe = Foe {
        name: &monster.name,
        health: monster.health,
        attack: monster.attack,
        explorer_max_damage: 2,
    };
    monster.health = exchange_blows(explorer, foe, opening, rng, &mut log);

    if monster.health <= 0 && explorer.is_alive() {
        log.push(format!("you defeated {}", monster.name));
    } else if !explorer.is_alive() {
        log.push("you were defeated".to_string());
    }
    log.join("\n")
}

/// Fight a boss starting with `opening`. The special reward goes to the
/// explorer only if the boss falls and the explorer is still standing.
pub fn fight_boss(
    boss: &mut Boss,
    explorer: &mut Explorer,
    opening: Turn,
    rng: &mut GameRng,
) -> String {
    let mut log = vec![format!("you face the boss {} ({} hp)", boss.name, boss.health)];

    let foe = Foe {
        name: &boss.name,
        health: boss.health,
        attack: boss.attack,
        explorer_max_damage: 2 + boss.attack / 2,
    };
    boss.health = exchange_blows(explorer, foe, opening, rng, &mut log);

    if boss.health <= 0 && explorer.is_alive() {
        explorer.inventory.push(boss.special_reward.clone());
        log.push(format!(
            "you defeated the boss {} and take {}",
            boss.name, boss.special_reward.name
        ));
    } else if !explorer.is_alive() {
        log.push("the boss defeated you".to_string());
    }
    log.join("\n")
}

/// Monsters open half the time.
pub fn monster_opening(rng: &mut GameRng) -> Turn {
    if rng.coin() { Turn::Explorer } else { Turn::Foe }
}

pub fn boss_opening(rng: &mut GameRng) -> Turn {
    if rng.chance(BOSS_EXPLORER_FIRST) {
        Turn::Explorer
    } else {
        Turn::Foe
    }
}
