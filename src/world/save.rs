//! JSON save files: the dungeon as a flat room list plus an explorer snapshot.
//!
//! Loading is forgiving below the top level. A room whose content record is
//! corrupt loses its content, an unreadable inventory entry is skipped, and
//! both are reported as warnings. Missing top-level structure (width, height,
//! room positions) fails the whole load.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::Content;
use super::item::Item;
use super::model::{Direction, Dungeon, Position, Room};
use super::validator::validate_dungeon;
use crate::engine::{Buff, Explorer};
use crate::error::{DungeonError, Result};
use crate::world::loader::{DEFAULT_ATTACK, DEFAULT_HEALTH};

////////////////////
/// RECORDS      ///
////////////////////

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveFile {
    #[serde(alias = "mapa")]
    pub dungeon: DungeonRecord,
    #[serde(default, alias = "explorador")]
    pub explorer: ExplorerRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DungeonRecord {
    #[serde(alias = "ancho")]
    pub width: i32,
    #[serde(alias = "alto")]
    pub height: i32,
    #[serde(default, alias = "habitaciones")]
    pub rooms: Vec<RoomRecord>,
    #[serde(default, alias = "inicio")]
    pub start: Option<Position>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: u32,
    #[serde(alias = "pos")]
    pub position: Position,
    #[serde(default, rename = "isStart", alias = "inicial")]
    pub is_start: bool,
    #[serde(default, alias = "visitada")]
    pub visited: bool,
    #[serde(default, alias = "conexiones")]
    pub connections: BTreeMap<String, Position>,
    #[serde(default, alias = "contenido")]
    pub content: Option<Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExplorerRecord {
    #[serde(default, alias = "vida")]
    pub health: Option<i32>,
    #[serde(default, alias = "posicion")]
    pub position: Option<Position>,
    #[serde(default, alias = "inventario")]
    pub inventory: Vec<Value>,
    #[serde(default, alias = "ataque", skip_serializing_if = "Option::is_none")]
    pub attack: Option<i32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub equipped: BTreeMap<String, Item>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffs: Vec<Buff>,
}

////////////////////
/// ENCODING     ///
////////////////////

pub fn dungeon_to_record(dungeon: &Dungeon) -> Result<DungeonRecord> {
    let mut rooms = Vec::with_capacity(dungeon.len());
    for room in dungeon.rooms() {
        rooms.push(RoomRecord {
            id: room.id,
            position: room.position,
            is_start: room.is_start,
            visited: room.visited,
            connections: room
                .connections()
                .iter()
                .map(|(d, p)| (d.as_str().to_string(), *p))
                .collect(),
            content: room.content.as_ref().map(Content::to_value).transpose()?,
        });
    }
    Ok(DungeonRecord {
        width: dungeon.width(),
        height: dungeon.height(),
        rooms,
        start: dungeon.start(),
    })
}

pub fn explorer_to_record(explorer: &Explorer) -> Result<ExplorerRecord> {
    let inventory = explorer
        .inventory
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ExplorerRecord {
        health: Some(explorer.health),
        position: Some(explorer.position),
        inventory,
        attack: Some(explorer.base_attack),
        equipped: explorer.equipped.clone(),
        buffs: explorer.buffs.clone(),
    })
}

////////////////////
/// DECODING     ///
////////////////////

/// Rebuild a dungeon. Edges are re-installed through `connect`, so a record
/// with one-sided connections comes back symmetric.
pub fn dungeon_from_record(record: DungeonRecord) -> Result<Dungeon> {
    let mut dungeon = Dungeon::new(record.width, record.height)?;

    for rec in &record.rooms {
        let mut room = Room::new(rec.id, rec.position, rec.is_start);
        room.visited = rec.visited;
        room.content = match rec.content.clone() {
            None | Some(Value::Null) => None,
            Some(value) => match Content::from_value(value) {
                Ok(content) => Some(content),
                Err(e) => {
                    warn!("dropping content of room {} at {}: {}", rec.id, rec.position, e);
                    None
                }
            },
        };
        dungeon.insert_room(room)?;
    }

    for rec in &record.rooms {
        for (label, target) in &rec.connections {
            let direction: Direction = label.parse()?;
            if !dungeon.contains(*target) {
                warn!(
                    "room {} edge {} targets missing room {}; skipped",
                    rec.id, direction, target
                );
                continue;
            }
            let already = dungeon
                .room(rec.position)
                .is_some_and(|r| r.connection(direction).is_some());
            if !already {
                dungeon.connect(rec.position, direction, *target)?;
            }
        }
    }

    let start = record.start.or_else(|| {
        record
            .rooms
            .iter()
            .find(|r| r.is_start)
            .map(|r| r.position)
    });
    if let Some(start) = start {
        dungeon.set_start(start)?;
    }

    for problem in validate_dungeon(&dungeon) {
        warn!("loaded dungeon: {}", problem.message);
    }
    Ok(dungeon)
}

pub fn explorer_from_record(record: ExplorerRecord, dungeon: &Dungeon) -> Result<Explorer> {
    let position = match record.position {
        Some(p) => p,
        None => dungeon.start().ok_or(DungeonError::MissingStart)?,
    };

    let mut explorer = Explorer::with_stats(
        position,
        record.health.unwrap_or(DEFAULT_HEALTH),
        record.attack.unwrap_or(DEFAULT_ATTACK),
    );

    for (i, value) in record.inventory.into_iter().enumerate() {
        match serde_json::from_value::<Item>(value) {
            Ok(item) => explorer.inventory.push(item),
            Err(e) => warn!("skipping inventory entry {}: {}", i, e),
        }
    }
    explorer.equipped = record.equipped;
    explorer.buffs = record.buffs;
    Ok(explorer)
}

////////////////////
/// FILE API     ///
////////////////////

pub fn save_to_string(dungeon: &Dungeon, explorer: &Explorer) -> Result<String> {
    let file = SaveFile {
        dungeon: dungeon_to_record(dungeon)?,
        explorer: explorer_to_record(explorer)?,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

pub fn load_from_str(contents: &str) -> Result<(Dungeon, Explorer)> {
    let file: SaveFile = serde_json::from_str(contents)?;
    let dungeon = dungeon_from_record(file.dungeon)?;
    let explorer = explorer_from_record(file.explorer, &dungeon)?;
    Ok((dungeon, explorer))
}

pub fn save_game(path: &Path, dungeon: &Dungeon, explorer: &Explorer) -> Result<()> {
    fs::write(path, save_to_string(dungeon, explorer)?)?;
    info!("saved game to {}", path.display());
    Ok(())
}

pub fn load_game(path: &Path) -> Result<(Dungeon, Explorer)> {
    let contents = fs::read_to_string(path)?;
    let loaded = load_from_str(&contents)?;
    info!(
        "loaded game from {} ({} rooms)",
        path.display(),
        loaded.0.len()
    );
    Ok(loaded)
}
