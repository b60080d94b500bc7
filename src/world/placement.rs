use log::info;
use serde::Serialize;

use super::content::{Boss, Content, Event, EventEffect, Monster, Treasure};
use super::item::Item;
use super::model::{Dungeon, Position};
use crate::rng::GameRng;

/// How many rooms of each kind were actually populated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlacementSummary {
    pub bosses: usize,
    pub monsters: usize,
    pub treasures: usize,
    pub events: usize,
}

impl PlacementSummary {
    pub fn total(&self) -> usize {
        self.bosses + self.monsters + self.treasures + self.events
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Boss,
    Monster,
    Treasure,
    Event,
}

/// Nominal counts for `total` candidate rooms, in assignment order.
fn quotas(total: usize) -> [(Slot, usize); 4] {
    [
        (Slot::Boss, 1),
        (Slot::Monster, (total / 4).max(1)),
        (Slot::Treasure, (total / 5).max(1)),
        (Slot::Event, total * 8 / 100),
    ]
}

/// Populate every room except the start with bosses, monsters, treasure and
/// events, scaled by Manhattan distance from the start room. Quotas are
/// filled in order and silently cut short once candidates run out.
pub fn place_content(dungeon: &mut Dungeon, rng: &mut GameRng) -> PlacementSummary {
    let mut summary = PlacementSummary::default();

    let Some(origin) = dungeon.start() else {
        return summary;
    };
    if dungeon.len() <= 1 {
        return summary;
    }

    let mut candidates: Vec<Position> = dungeon
        .positions()
        .into_iter()
        .filter(|p| *p != origin)
        .collect();
    rng.shuffle(&mut candidates);

    let mut next = candidates.into_iter();

    'fill: for (slot, count) in quotas(next.len()) {
        for _ in 0..count {
            let Some(pos) = next.next() else {
                break 'fill;
            };
            let distance = pos.manhattan(origin);
            let content = match slot {
                Slot::Boss => {
                    summary.bosses += 1;
                    boss(distance)
                }
                Slot::Monster => {
                    summary.monsters += 1;
                    monster(distance)
                }
                Slot::Treasure => {
                    summary.treasures += 1;
                    treasure(distance)
                }
                Slot::Event => {
                    summary.events += 1;
                    event(rng)
                }
            };
            if let Some(room) = dungeon.room_mut(pos) {
                room.content = Some(content);
            }
        }
    }

    info!(
        "placed content: {} boss(es), {} monster(s), {} treasure(s), {} event(s)",
        summary.bosses, summary.monsters, summary.treasures, summary.events
    );
    summary
}

fn boss(distance: i32) -> Content {
    Content::Boss(Boss {
        name: format!("boss level {}", distance),
        health: 8 + distance,
        attack: 3 + distance / 3,
        special_reward: Item::new("boss treasure", (50 + 5 * distance) as u32, "boss reward"),
    })
}

fn monster(distance: i32) -> Content {
    Content::Monster(Monster {
        name: format!("monster level {}", distance),
        health: 5 + distance / 2,
        attack: 1 + distance / 4,
    })
}

fn treasure(distance: i32) -> Content {
    Content::Treasure(Treasure {
        reward: Item::new(
            format!("gem level {}", distance),
            (10 + 2 * distance) as u32,
            "treasure",
        ),
    })
}

fn event(rng: &mut GameRng) -> Content {
    let (name, description, effect) = match rng.below(3) {
        0 => ("trap", "a hidden trap", EventEffect::Trap(2)),
        1 => ("fountain", "restores health", EventEffect::Heal(2)),
        _ => ("portal", "a shimmering teleporter", EventEffect::Portal),
    };
    Content::Event(Event {
        name: name.to_string(),
        description: description.to_string(),
        effect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::content::ContentKind;
    use crate::world::generator::build;

    #[test]
    fn quota_table() {
        assert_eq!(
            quotas(25).map(|(_, n)| n),
            [1, 6, 5, 2]
        );
        assert_eq!(quotas(3).map(|(_, n)| n), [1, 1, 1, 0]);
    }

    #[test]
    fn single_room_gets_nothing() {
        let mut rng = GameRng::new(2);
        let mut d = build(3, 3, 1, &mut rng).unwrap();
        assert_eq!(place_content(&mut d, &mut rng), PlacementSummary::default());
    }

    #[test]
    fn quotas_truncate_when_rooms_run_out() {
        let mut rng = GameRng::new(2);
        let mut d = build(3, 3, 3, &mut rng).unwrap();
        let summary = place_content(&mut d, &mut rng);
        // Two candidates: one boss, one monster, nothing left for treasure.
        assert_eq!(
            summary,
            PlacementSummary {
                bosses: 1,
                monsters: 1,
                treasures: 0,
                events: 0
            }
        );
    }

    #[test]
    fn start_room_stays_empty_and_counts_match() {
        let mut rng = GameRng::new(42);
        let mut d = build(8, 6, 30, &mut rng).unwrap();
        let summary = place_content(&mut d, &mut rng);

        assert!(d.start_room().unwrap().content.is_none());
        // 29 candidates: 1 boss, 7 monsters, 5 treasures, 2 events.
        assert_eq!(summary.total(), 15);
        let stats = d.stats();
        assert_eq!(stats.bosses, summary.bosses);
        assert_eq!(stats.monsters, summary.monsters);
        assert_eq!(stats.treasures, summary.treasures);
        assert_eq!(stats.events, summary.events);
    }

    #[test]
    fn difficulty_scales_with_distance() {
        let mut rng = GameRng::new(8);
        let mut d = build(8, 6, 25, &mut rng).unwrap();
        place_content(&mut d, &mut rng);
        let origin = d.start().unwrap();

        for room in d.rooms() {
            let dist = room.position.manhattan(origin);
            match &room.content {
                Some(Content::Monster(m)) => {
                    assert_eq!(m.health, 5 + dist / 2);
                    assert_eq!(m.attack, 1 + dist / 4);
                }
                Some(Content::Boss(b)) => {
                    assert_eq!(b.health, 8 + dist);
                    assert_eq!(b.attack, 3 + dist / 3);
                    assert_eq!(b.special_reward.value as i32, 50 + 5 * dist);
                }
                Some(Content::Treasure(t)) => {
                    assert_eq!(t.reward.value as i32, 10 + 2 * dist);
                }
                Some(c) => assert_eq!(c.kind(), ContentKind::Event),
                None => {}
            }
        }
    }
}
