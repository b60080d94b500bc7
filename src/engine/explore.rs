use crate::engine::combat::{boss_opening, fight_boss, fight_monster, monster_opening};
use crate::engine::explorer::Explorer;
use crate::rng::GameRng;
use crate::world::{Content, Dungeon, EventEffect};

impl Content {
    /// Let the explorer interact with this occupant. Mutates the explorer
    /// and, for fights, the foe's stored health. Clearing the room is left to
    /// the caller.
    pub fn interact(&mut self, explorer: &mut Explorer, rng: &mut GameRng) -> String {
        match self {
            Content::Treasure(t) => {
                explorer.inventory.push(t.reward.clone());
                format!("you picked up {} worth {}", t.reward.name, t.reward.value)
            }
            Content::Monster(m) => {
                let opening = monster_opening(rng);
                fight_monster(m, explorer, opening, rng)
            }
            Content::Boss(b) => {
                let opening = boss_opening(rng);
                fight_boss(b, explorer, opening, rng)
            }
            Content::Event(e) => match &e.effect {
                EventEffect::Heal(amount) => {
                    explorer.heal(*amount);
                    format!("fountain: you recover {} hp", amount)
                }
                EventEffect::Trap(amount) => {
                    explorer.damage_intake(*amount);
                    format!("trap: you take {} damage", amount)
                }
                EventEffect::Portal => "portal: you are teleported to another room".to_string(),
                EventEffect::Buff { detail } => format!("temporary bonus: {}", detail),
                EventEffect::Mystery(_) => "a mysterious event".to_string(),
            },
        }
    }
}

impl Explorer {
    /// Interact with whatever occupies the current room. Single-use content
    /// and defeated foes are removed; the room is marked visited either way.
    pub fn explore_current_room(&mut self, dungeon: &mut Dungeon, rng: &mut GameRng) -> String {
        let Some(room) = dungeon.room_mut(self.position) else {
            return "there is no room here".to_string();
        };

        if room.visited && room.content.is_none() {
            return "you already explored this room; it is empty".to_string();
        }

        let Some(mut content) = room.content.take() else {
            room.visited = true;
            return "the room is empty".to_string();
        };

        let narrative = content.interact(self, rng);
        if !content.is_exhausted() {
            room.content = Some(content);
        }
        room.visited = true;
        narrative
    }
}
