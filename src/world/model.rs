use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::content::{Content, ContentKind};
use crate::error::{DungeonError, Result};

//////////////////////////////
/// GRID PRIMITIVES        ///
//////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Fixed iteration order used everywhere edges are scanned.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Grid offset; north is towards y = 0.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DungeonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "norte" => Ok(Direction::North),
            "south" | "s" | "sur" => Ok(Direction::South),
            "east" | "e" | "este" => Ok(Direction::East),
            "west" | "w" | "oeste" | "o" => Ok(Direction::West),
            _ => Err(DungeonError::InvalidDirection(s.to_string())),
        }
    }
}

/// Grid coordinate, persisted as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<[i32; 2]> for Position {
    fn from(v: [i32; 2]) -> Self {
        Position::new(v[0], v[1])
    }
}

impl From<Position> for [i32; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

//////////////////////////////
/// ROOMS AND THE DUNGEON  ///
//////////////////////////////

#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: u32,
    pub position: Position,
    pub is_start: bool,
    pub visited: bool,
    pub content: Option<Content>,
    // Edges are keys into the owning dungeon, never owned rooms.
    connections: BTreeMap<Direction, Position>,
}

impl Room {
    pub fn new(id: u32, position: Position, is_start: bool) -> Self {
        Self {
            id,
            position,
            is_start,
            visited: false,
            content: None,
            connections: BTreeMap::new(),
        }
    }

    pub fn connections(&self) -> &BTreeMap<Direction, Position> {
        &self.connections
    }

    pub fn connection(&self, direction: Direction) -> Option<Position> {
        self.connections.get(&direction).copied()
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.connections.keys().copied().collect()
    }

    pub fn content_kind(&self) -> Option<ContentKind> {
        self.content.as_ref().map(Content::kind)
    }
}

/// Arena of rooms keyed by coordinate. The dungeon is the sole owner of its
/// rooms; edges between rooms are coordinate lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Dungeon {
    width: i32,
    height: i32,
    rooms: BTreeMap<Position, Room>,
    start: Option<Position>,
    next_id: u32,
}

impl Dungeon {
    pub fn new(width: i32, height: i32) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(DungeonError::Configuration(format!(
                "width and height must be positive (got {}x{})",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            rooms: BTreeMap::new(),
            start: None,
            next_id: 0,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn start_room(&self) -> Option<&Room> {
        self.start.and_then(|p| self.rooms.get(&p))
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.rooms.contains_key(&pos)
    }

    pub fn room(&self, pos: Position) -> Option<&Room> {
        self.rooms.get(&pos)
    }

    pub fn room_mut(&mut self, pos: Position) -> Option<&mut Room> {
        self.rooms.get_mut(&pos)
    }

    /// Rooms in coordinate order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.rooms.keys().copied().collect()
    }

    /// Every in-bounds cell on the outer ring, each listed once.
    pub fn perimeter(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        let mut seen = HashSet::new();
        let mut push = |p: Position, cells: &mut Vec<Position>| {
            if seen.insert(p) {
                cells.push(p);
            }
        };
        for x in 0..self.width {
            push(Position::new(x, 0), &mut cells);
            push(Position::new(x, self.height - 1), &mut cells);
        }
        for y in 0..self.height {
            push(Position::new(0, y), &mut cells);
            push(Position::new(self.width - 1, y), &mut cells);
        }
        cells
    }

    /// Place a new room with the next sequential id. The first start room
    /// placed becomes the dungeon's start.
    pub fn add_room(&mut self, pos: Position, is_start: bool) -> Result<u32> {
        if !self.in_bounds(pos) {
            return Err(DungeonError::OutOfBounds(pos));
        }
        if self.rooms.contains_key(&pos) {
            return Err(DungeonError::OccupiedCell(pos));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.rooms.insert(pos, Room::new(id, pos, is_start));
        if is_start && self.start.is_none() {
            self.start = Some(pos);
        }
        Ok(id)
    }

    /// Insert a fully formed room (used when restoring a save). Keeps the
    /// stored id and bumps the id counter past it.
    pub(crate) fn insert_room(&mut self, room: Room) -> Result<()> {
        let pos = room.position;
        if self.rooms.contains_key(&pos) {
            return Err(DungeonError::OccupiedCell(pos));
        }
        self.next_id = self.next_id.max(room.id + 1);
        self.rooms.insert(pos, room);
        Ok(())
    }

    pub(crate) fn set_start(&mut self, pos: Position) -> Result<()> {
        if !self.rooms.contains_key(&pos) {
            return Err(DungeonError::MissingRoom(pos));
        }
        self.start = Some(pos);
        Ok(())
    }

    /// Install `from --direction--> to` and the mirrored edge on `to`.
    /// An existing edge in either slot is overwritten.
    pub fn connect(&mut self, from: Position, direction: Direction, to: Position) -> Result<()> {
        if !self.rooms.contains_key(&to) {
            return Err(DungeonError::MissingRoom(to));
        }
        let origin = self
            .rooms
            .get_mut(&from)
            .ok_or(DungeonError::MissingRoom(from))?;
        origin.connections.insert(direction, to);

        if let Some(target) = self.rooms.get_mut(&to) {
            target.connections.insert(direction.opposite(), from);
        }
        Ok(())
    }

    /// Remove the edge leaving `from` in `direction`. The peer's mirrored
    /// edge is removed only if it still points back at `from`.
    pub fn disconnect(&mut self, from: Position, direction: Direction) -> Option<Position> {
        let peer = self.rooms.get_mut(&from)?.connections.remove(&direction)?;
        if let Some(other) = self.rooms.get_mut(&peer) {
            let back = direction.opposite();
            if other.connections.get(&back) == Some(&from) {
                other.connections.remove(&back);
            }
        }
        Some(peer)
    }

    /// True iff every room can be reached from the start room.
    pub fn is_fully_reachable(&self) -> bool {
        let Some(start) = self.start.filter(|p| self.rooms.contains_key(p)) else {
            return false;
        };

        let mut seen: HashSet<Position> = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);

        while let Some(pos) = queue.pop_front() {
            if let Some(room) = self.rooms.get(&pos) {
                for next in room.connections.values() {
                    if seen.insert(*next) {
                        queue.push_back(*next);
                    }
                }
            }
        }

        seen.len() == self.rooms.len()
    }

    pub fn stats(&self) -> DungeonStats {
        let mut stats = DungeonStats {
            total: self.rooms.len(),
            ..DungeonStats::default()
        };
        let mut edges = 0usize;

        for room in self.rooms.values() {
            edges += room.connections.len();
            match room.content_kind() {
                None => stats.empty += 1,
                Some(ContentKind::Treasure) => stats.treasures += 1,
                Some(ContentKind::Monster) => stats.monsters += 1,
                Some(ContentKind::Boss) => stats.bosses += 1,
                Some(ContentKind::Event) => stats.events += 1,
            }
        }

        if stats.total > 0 {
            let avg = edges as f64 / stats.total as f64;
            stats.average_connections = (avg * 100.0).round() / 100.0;
        }
        stats
    }
}

/// Room counts by content kind plus mean edges per room.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DungeonStats {
    pub total: usize,
    pub empty: usize,
    pub treasures: usize,
    pub monsters: usize,
    pub bosses: usize,
    pub events: usize,
    pub average_connections: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: i32) -> Dungeon {
        let mut d = Dungeon::new(n, 1).unwrap();
        d.add_room(Position::new(0, 0), true).unwrap();
        for x in 1..n {
            d.add_room(Position::new(x, 0), false).unwrap();
            d.connect(Position::new(x - 1, 0), Direction::East, Position::new(x, 0))
                .unwrap();
        }
        d
    }

    #[test]
    fn connect_installs_mirrored_edge() {
        let d = line(2);
        let a = d.room(Position::new(0, 0)).unwrap();
        let b = d.room(Position::new(1, 0)).unwrap();
        assert_eq!(a.connection(Direction::East), Some(Position::new(1, 0)));
        assert_eq!(b.connection(Direction::West), Some(Position::new(0, 0)));
    }

    #[test]
    fn connect_to_missing_room_fails() {
        let mut d = line(1);
        let err = d
            .connect(Position::new(0, 0), Direction::East, Position::new(1, 0))
            .unwrap_err();
        assert!(matches!(err, DungeonError::MissingRoom(_)));
    }

    #[test]
    fn disconnect_respects_peer_back_edge() {
        let mut d = Dungeon::new(3, 1).unwrap();
        for x in 0..3 {
            d.add_room(Position::new(x, 0), x == 0).unwrap();
        }
        let (a, b, c) = (Position::new(0, 0), Position::new(1, 0), Position::new(2, 0));
        d.connect(a, Direction::East, b).unwrap();
        // c claims b's west slot; b no longer points back at a.
        d.connect(c, Direction::East, b).unwrap();

        assert_eq!(d.disconnect(a, Direction::East), Some(b));
        assert_eq!(d.room(b).unwrap().connection(Direction::West), Some(c));
        assert!(d.room(a).unwrap().connection(Direction::East).is_none());

        assert_eq!(d.disconnect(c, Direction::East), Some(b));
        assert!(d.room(b).unwrap().connection(Direction::West).is_none());
    }

    #[test]
    fn reachability_detects_islands() {
        let mut d = line(3);
        assert!(d.is_fully_reachable());
        d.disconnect(Position::new(1, 0), Direction::East);
        assert!(!d.is_fully_reachable());
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("N".parse::<Direction>().unwrap(), Direction::North);
        assert_eq!("oeste".parse::<Direction>().unwrap(), Direction::West);
        assert!(matches!(
            "up".parse::<Direction>(),
            Err(DungeonError::InvalidDirection(_))
        ));
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        assert!(matches!(
            Dungeon::new(0, 4),
            Err(DungeonError::Configuration(_))
        ));
    }

    #[test]
    fn perimeter_has_no_duplicates() {
        let d = Dungeon::new(4, 3).unwrap();
        let cells = d.perimeter();
        assert_eq!(cells.len(), 10);
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len());

        let single = Dungeon::new(1, 1).unwrap();
        assert_eq!(single.perimeter(), vec![Position::new(0, 0)]);
    }

    #[test]
    fn stats_average_connections() {
        let d = line(3);
        let stats = d.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.empty, 3);
        assert_eq!(stats.average_connections, 1.33);
    }
}
