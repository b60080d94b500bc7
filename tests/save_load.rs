use std::fs;

use dungeon_crawl::engine::Buff;
use dungeon_crawl::world::{
    BoostDuration, Content, DungeonConfig, Item, ItemEffect, Position, load_game, save_game,
};
use dungeon_crawl::{DungeonError, Session};
use tempfile::tempdir;

fn session() -> Session {
    Session::new(&DungeonConfig {
        seed: Some(7),
        ..DungeonConfig::default()
    })
    .unwrap()
}

#[test]
fn session_round_trips_through_a_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut s = session();
    s.explorer.health = 9;
    s.explorer.inventory.push(Item::new("gem", 12, "shiny"));
    s.explorer
        .inventory
        .push(Item::consumable("potion", ItemEffect::Heal { amount: 3 }));
    s.explorer.equip(&Item::equipable("blade", "weapon", 2));
    s.explorer.buffs.push(Buff {
        attack_bonus: 1,
        remaining_rooms: 2,
    });
    s.save(&path).unwrap();

    let restored = Session::load(&path, Some(7)).unwrap();
    assert_eq!(restored.dungeon, s.dungeon);
    assert_eq!(restored.explorer, s.explorer);
    assert_eq!(restored.explorer.compute_attack(), 4);
}

#[test]
fn visited_flags_and_cleared_rooms_persist() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("progress.json");

    let mut s = session();
    s.explorer.health = 1_000;
    let target = s
        .dungeon
        .rooms()
        .find(|r| matches!(r.content, Some(Content::Treasure(_))))
        .map(|r| r.position)
        .unwrap();
    s.travel_to(target);
    save_game(&path, &s.dungeon, &s.explorer).unwrap();

    let (dungeon, explorer) = load_game(&path).unwrap();
    let room = dungeon.room(target).unwrap();
    assert!(room.visited);
    assert!(room.content.is_none());
    assert_eq!(explorer.position, target);
    assert_eq!(explorer.inventory, s.explorer.inventory);
}

#[test]
fn hand_written_save_with_temporary_boost_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("legacy.json");
    fs::write(
        &path,
        r#"{
            "mapa": {
                "ancho": 3, "alto": 1,
                "habitaciones": [
                    {"id": 0, "pos": [0, 0], "inicial": true, "visitada": true,
                     "conexiones": {"este": [1, 0]}, "contenido": null},
                    {"id": 1, "pos": [1, 0], "inicial": false, "visitada": false,
                     "conexiones": {"oeste": [0, 0], "este": [2, 0]},
                     "contenido": {"tipo": "evento", "nombre": "fountain",
                                   "descripcion": "cool water",
                                   "efecto": {"tipo": "curar", "valor": 2}}},
                    {"id": 2, "pos": [2, 0], "inicial": false, "visitada": false,
                     "conexiones": {"oeste": [1, 0]}, "contenido": null}
                ],
                "inicio": [0, 0]
            },
            "explorador": {
                "vida": 4,
                "posicion": [0, 0],
                "inventario": [
                    {"nombre": "fury", "valor": 0, "descripcion": "", "categoria": "consumible",
                     "efecto": {"ataque": 2, "modo": "temporal_habitaciones", "habitaciones": 3}}
                ]
            }
        }"#,
    )
    .unwrap();

    let mut s = Session::load(&path, Some(1)).unwrap();
    assert_eq!(s.dungeon.len(), 3);
    assert_eq!(
        s.explorer.inventory[0].effect,
        ItemEffect::AttackBoost {
            attack: 2,
            duration: BoostDuration::Rooms(3)
        }
    );

    s.use_item(0);
    assert_eq!(s.explorer.compute_attack(), 3);

    let travel = s.travel_to(Position::new(2, 0));
    assert!(travel.arrived);
    assert_eq!(s.explorer.health, 6);
    assert_eq!(s.explorer.buffs[0].remaining_rooms, 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = Session::load(&dir.path().join("nope.json"), None).err().unwrap();
    assert!(matches!(err, DungeonError::Io(_)));
}

#[test]
fn malformed_json_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_game(&path), Err(DungeonError::Json(_))));
}
