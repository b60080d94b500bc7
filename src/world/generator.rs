use log::{debug, info, warn};

use super::model::{Direction, Dungeon, Position};
use crate::error::{DungeonError, Result};
use crate::rng::GameRng;

pub const DEFAULT_EXTRA_CONNECTION_CHANCE: f64 = 0.3;

/// Randomised incremental dungeon generator.
///
/// Rooms grow one at a time from a working set seeded with a perimeter start
/// room. Each step either places a neighbour of a random working room or
/// retires that room once it has no free neighbouring cells, so a build takes
/// O(target) steps.
#[derive(Debug, Clone)]
pub struct DungeonBuilder {
    width: i32,
    height: i32,
    rooms: usize,
    extra_connection_chance: f64,
    max_attempts: u32,
}

impl DungeonBuilder {
    pub fn new(width: i32, height: i32, rooms: usize) -> Self {
        Self {
            width,
            height,
            rooms,
            extra_connection_chance: DEFAULT_EXTRA_CONNECTION_CHANCE,
            max_attempts: 1,
        }
    }

    /// Probability that a freshly placed room also links to every occupied
    /// neighbour it is not yet connected to.
    pub fn extra_connection_chance(mut self, p: f64) -> Self {
        self.extra_connection_chance = p;
        self
    }

    /// Attempts made before giving up with `UnreachableMap`. One attempt
    /// means a disconnected result is reported straight away.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn build(&self, rng: &mut GameRng) -> Result<Dungeon> {
        self.validate()?;

        for attempt in 1..=self.max_attempts {
            debug!(
                "generating {}x{} dungeon with {} rooms (attempt {}/{})",
                self.width, self.height, self.rooms, attempt, self.max_attempts
            );

            let dungeon = self.grow(rng)?;
            if !dungeon.is_empty() && dungeon.is_fully_reachable() {
                info!(
                    "generated dungeon with {} rooms, start at {:?}",
                    dungeon.len(),
                    dungeon.start()
                );
                return Ok(dungeon);
            }
            warn!("generation attempt {} left rooms unreachable", attempt);
        }

        Err(DungeonError::UnreachableMap {
            attempts: self.max_attempts,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(DungeonError::Configuration(format!(
                "width and height must be positive (got {}x{})",
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
        if !(0.0..=1.0).contains(&self.extra_connection_chance) {
            return Err(DungeonError::Configuration(format!(
                "extra_connection_chance must be within [0, 1] (got {})",
                self.extra_connection_chance
            )));
        }
        if self.max_attempts == 0 {
            return Err(DungeonError::Configuration(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn grow(&self, rng: &mut GameRng) -> Result<Dungeon> {
        let mut dungeon = Dungeon::new(self.width, self.height)?;

        let perimeter = dungeon.perimeter();
        let start = *rng
            .choose(&perimeter)
            .ok_or_else(|| DungeonError::Configuration("map has no perimeter".to_string()))?;
        dungeon.add_room(start, true)?;

        let mut working: Vec<Position> = vec![start];

        while dungeon.len() < self.rooms && !working.is_empty() {
            let idx = rng.below(working.len());
            let current = working[idx];

            let free = free_neighbours(&dungeon, current);
            let Some(&(direction, cell)) = rng.choose(&free) else {
                // Boxed in for good: cells never become free again.
                working.remove(idx);
                continue;
            };

            dungeon.add_room(cell, false)?;
            dungeon.connect(current, direction, cell)?;
            working.push(cell);

            if rng.chance(self.extra_connection_chance) {
                link_occupied_neighbours(&mut dungeon, cell);
            }
        }

        Ok(dungeon)
    }
}

/// Convenience wrapper over [`DungeonBuilder`] with default tuning.
pub fn build(width: i32, height: i32, rooms: usize, rng: &mut GameRng) -> Result<Dungeon> {
    DungeonBuilder::new(width, height, rooms).build(rng)
}

fn free_neighbours(dungeon: &Dungeon, pos: Position) -> Vec<(Direction, Position)> {
    Direction::ALL
        .iter()
        .map(|&d| (d, pos.offset(d)))
        .filter(|&(_, p)| dungeon.in_bounds(p) && !dungeon.contains(p))
        .collect()
}

// Best effort: a failed link is skipped, never fatal.
fn link_occupied_neighbours(dungeon: &mut Dungeon, pos: Position) {
    for direction in Direction::ALL {
        let neighbour = pos.offset(direction);
        if !dungeon.contains(neighbour) {
            continue;
        }
        let already_linked = dungeon
            .room(pos)
            .is_some_and(|r| r.connection(direction).is_some());
        if already_linked {
            continue;
        }
        if let Err(e) = dungeon.connect(pos, direction, neighbour) {
            debug!("skipping extra connection {} -> {}: {}", pos, neighbour, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_border(d: &Dungeon, p: Position) -> bool {
        p.x == 0 || p.y == 0 || p.x == d.width() - 1 || p.y == d.height() - 1
    }

    #[test]
    fn seed_42_eight_by_six() {
        let mut rng = GameRng::new(42);
        let d = build(8, 6, 12, &mut rng).unwrap();

        assert_eq!(d.len(), 12);
        assert!(d.is_fully_reachable());
        let starts: Vec<_> = d.rooms().filter(|r| r.is_start).collect();
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].id, 0);
        assert!(on_border(&d, starts[0].position));
    }

    #[test]
    fn ids_are_sequential() {
        let mut rng = GameRng::new(9);
        let d = build(5, 5, 10, &mut rng).unwrap();
        let mut ids: Vec<u32> = d.rooms().map(|r| r.id).collect();
        ids.sort();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn fills_the_whole_grid() {
        let mut rng = GameRng::new(5);
        let d = build(4, 3, 12, &mut rng).unwrap();
        assert_eq!(d.len(), 12);
        assert!(d.is_fully_reachable());
    }

    #[test]
    fn single_room() {
        let mut rng = GameRng::new(1);
        let d = build(1, 1, 1, &mut rng).unwrap();
        assert_eq!(d.len(), 1);
        assert_eq!(d.start(), Some(Position::new(0, 0)));
    }

    #[test]
    fn rejects_bad_room_counts() {
        let mut rng = GameRng::new(1);
        assert!(matches!(
            build(3, 3, 0, &mut rng),
            Err(DungeonError::InvalidRoomCount { requested: 0, capacity: 9 })
        ));
        assert!(matches!(
            build(3, 3, 10, &mut rng),
            Err(DungeonError::InvalidRoomCount { .. })
        ));
        assert!(matches!(
            build(0, 3, 1, &mut rng),
            Err(DungeonError::Configuration(_))
        ));
        assert!(matches!(
            DungeonBuilder::new(3, 3, 2).max_attempts(0).build(&mut rng),
            Err(DungeonError::Configuration(_))
        ));
    }

    #[test]
    fn same_seed_same_map() {
        let a = build(8, 6, 20, &mut GameRng::new(77)).unwrap();
        let b = build(8, 6, 20, &mut GameRng::new(77)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn extra_connections_create_cycles() {
        // With every new room linking to its occupied neighbours a full grid
        // ends with more edges than a spanning tree needs.
        let mut rng = GameRng::new(11);
        let d = DungeonBuilder::new(4, 4, 16)
            .extra_connection_chance(1.0)
            .build(&mut rng)
            .unwrap();
        let edges: usize = d.rooms().map(|r| r.connections().len()).sum::<usize>() / 2;
        assert!(edges > d.len() - 1);

        let mut rng = GameRng::new(11);
        let tree = DungeonBuilder::new(4, 4, 16)
            .extra_connection_chance(0.0)
            .build(&mut rng)
            .unwrap();
        let edges: usize = tree.rooms().map(|r| r.connections().len()).sum::<usize>() / 2;
        assert_eq!(edges, tree.len() - 1);
    }
}
