use std::collections::{HashMap, VecDeque};

use crate::engine::explorer::Explorer;
use crate::rng::GameRng;
use crate::world::{Direction, Dungeon, Position};

/// Result of [`Explorer::move_to`]: whether the destination was reached and
/// the narratives of any rooms explored along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Travel {
    pub arrived: bool,
    pub narratives: Vec<String>,
}

impl Explorer {
    pub fn available_directions(&self, dungeon: &Dungeon) -> Vec<Direction> {
        dungeon
            .room(self.position)
            .map(|r| r.directions())
            .unwrap_or_default()
    }

    /// Walk through the edge in `direction`. On success the target room is
    /// marked visited and every buff loses one room; expired buffs are
    /// dropped. Returns false without changing anything if there is no edge.
    pub fn step(&mut self, dungeon: &mut Dungeon, direction: Direction) -> bool {
        let Some(target) = dungeon
            .room(self.position)
            .and_then(|r| r.connection(direction))
        else {
            return false;
        };
        let Some(room) = dungeon.room_mut(target) else {
            return false;
        };

        self.position = target;
        room.visited = true;

        for buff in &mut self.buffs {
            buff.remaining_rooms -= 1;
        }
        self.buffs.retain(|b| b.remaining_rooms > 0);
        true
    }

    /// Shortest path by hop count from the current position, as
    /// `(direction, room reached)` steps. Empty when already there or when
    /// `destination` cannot be reached. Ties go to the first path found
    /// scanning edges north, south, east, west.
    pub fn find_path(&self, dungeon: &Dungeon, destination: Position) -> Vec<(Direction, Position)> {
        let start = self.position;
        if start == destination {
            return Vec::new();
        }

        let mut prev: HashMap<Position, (Position, Direction)> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            let Some(room) = dungeon.room(current) else {
                continue;
            };
            for (&direction, &next) in room.connections() {
                if next == start || prev.contains_key(&next) {
                    continue;
                }
                prev.insert(next, (current, direction));
                if next == destination {
                    return unwind(&prev, start, destination);
                }
                queue.push_back(next);
            }
        }

        Vec::new()
    }

    /// Follow [`Explorer::find_path`] one step at a time, exploring every
    /// occupied room on the way. Stops early if a step fails or the explorer
    /// dies.
    pub fn move_to(
        &mut self,
        dungeon: &mut Dungeon,
        rng: &mut GameRng,
        destination: Position,
    ) -> Travel {
        let mut travel = Travel::default();
        let path = self.find_path(dungeon, destination);
        if path.is_empty() {
            return travel;
        }

        for (direction, _) in path {
            if !self.is_alive() || !self.step(dungeon, direction) {
                return travel;
            }
            let occupied = dungeon
                .room(self.position)
                .is_some_and(|r| r.content.is_some());
            if occupied {
                travel
                    .narratives
                    .push(self.explore_current_room(dungeon, rng));
                if !self.is_alive() {
                    return travel;
                }
            }
        }

        travel.arrived = true;
        travel
    }
}

fn unwind(
    prev: &HashMap<Position, (Position, Direction)>,
    start: Position,
    destination: Position,
) -> Vec<(Direction, Position)> {
    let mut path = Vec::new();
    let mut node = destination;
    while node != start {
        let Some(&(from, direction)) = prev.get(&node) else {
            break;
        };
        path.push((direction, node));
        node = from;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::explorer::Buff;
    use crate::world::{Content, Monster};

    /// 3x3 ring around an empty centre, start at the top-left corner.
    fn ring() -> Dungeon {
        let mut d = Dungeon::new(3, 3).unwrap();
        let cells = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)];
        for (i, &(x, y)) in cells.iter().enumerate() {
            d.add_room(Position::new(x, y), i == 0).unwrap();
        }
        let p = |x, y| Position::new(x, y);
        d.connect(p(0, 0), Direction::East, p(1, 0)).unwrap();
        d.connect(p(1, 0), Direction::East, p(2, 0)).unwrap();
        d.connect(p(2, 0), Direction::South, p(2, 1)).unwrap();
        d.connect(p(2, 1), Direction::South, p(2, 2)).unwrap();
        d.connect(p(2, 2), Direction::West, p(1, 2)).unwrap();
        d.connect(p(1, 2), Direction::West, p(0, 2)).unwrap();
        d.connect(p(0, 2), Direction::North, p(0, 1)).unwrap();
        d.connect(p(0, 1), Direction::North, p(0, 0)).unwrap();
        d
    }

    #[test]
    fn step_follows_edges_only() {
        let mut d = ring();
        let mut e = Explorer::new(&d).unwrap();
        assert_eq!(
            e.available_directions(&d),
            vec![Direction::South, Direction::East]
        );
        assert!(!e.step(&mut d, Direction::North));
        assert_eq!(e.position, Position::new(0, 0));

        assert!(e.step(&mut d, Direction::East));
        assert_eq!(e.position, Position::new(1, 0));
        assert!(d.room(Position::new(1, 0)).unwrap().visited);
    }

    #[test]
    fn buffs_expire_on_room_transitions() {
        let mut d = ring();
        let mut e = Explorer::new(&d).unwrap();
        e.buffs = vec![
            Buff {
                attack_bonus: 1,
                remaining_rooms: 1,
            },
            Buff {
                attack_bonus: 2,
                remaining_rooms: 2,
            },
        ];
        // A failed move does not tick buffs.
        e.step(&mut d, Direction::West);
        assert_eq!(e.buffs.len(), 2);

        e.step(&mut d, Direction::East);
        assert_eq!(
            e.buffs,
            vec![Buff {
                attack_bonus: 2,
                remaining_rooms: 1
            }]
        );
        e.step(&mut d, Direction::East);
        assert!(e.buffs.is_empty());
    }

    #[test]
    fn shortest_path_around_the_ring() {
        let d = ring();
        let e = Explorer::new(&d).unwrap();

        let adjacent = e.find_path(&d, Position::new(1, 0));
        assert_eq!(adjacent, vec![(Direction::East, Position::new(1, 0))]);

        // (0, 2) is two hops south-about, six hops the other way.
        let path = e.find_path(&d, Position::new(0, 2));
        assert_eq!(
            path,
            vec![
                (Direction::South, Position::new(0, 1)),
                (Direction::South, Position::new(0, 2)),
            ]
        );

        assert!(e.find_path(&d, Position::new(0, 0)).is_empty());
        assert!(e.find_path(&d, Position::new(1, 1)).is_empty());
    }

    #[test]
    fn move_to_fights_on_the_way() {
        let mut d = ring();
        d.room_mut(Position::new(1, 0)).unwrap().content = Some(Content::Monster(Monster {
            name: "guard".into(),
            health: 1,
            attack: 1,
        }));
        let mut e = Explorer::new(&d).unwrap();
        e.health = 50;
        let mut rng = GameRng::new(1);

        let travel = e.move_to(&mut d, &mut rng, Position::new(2, 1));
        assert!(travel.arrived);
        assert_eq!(travel.narratives.len(), 1);
        assert_eq!(e.position, Position::new(2, 1));
        assert!(d.room(Position::new(1, 0)).unwrap().content.is_none());
    }

    #[test]
    fn move_to_stops_when_explorer_dies() {
        let mut d = ring();
        d.room_mut(Position::new(1, 0)).unwrap().content = Some(Content::Monster(Monster {
            name: "giant".into(),
            health: 500,
            attack: 3,
        }));
        let mut e = Explorer::new(&d).unwrap();
        let mut rng = GameRng::new(1);

        let travel = e.move_to(&mut d, &mut rng, Position::new(2, 0));
        assert!(!travel.arrived);
        assert!(!e.is_alive());
        assert_eq!(e.position, Position::new(1, 0));
    }

    #[test]
    fn move_to_unreachable_fails() {
        let mut d = ring();
        let mut e = Explorer::new(&d).unwrap();
        let mut rng = GameRng::new(1);
        assert!(!e.move_to(&mut d, &mut rng, Position::new(1, 1)).arrived);
        assert!(!e.move_to(&mut d, &mut rng, Position::new(0, 0)).arrived);
    }
}
