use crate::engine::explorer::Explorer;
use crate::world::{ContentKind, Dungeon, Position};

pub const LEGEND: &str = "legend: @ = explorer | S = start | M = monster | B = boss | T = treasure\n        E = event | . = empty | ? = unvisited | # = no room";

/// Single-character glyph for a cell, ignoring the explorer.
fn cell_glyph(dungeon: &Dungeon, pos: Position, fog: bool) -> char {
    let Some(room) = dungeon.room(pos) else {
        return '#';
    };
    if room.is_start {
        return 'S';
    }
    match room.content_kind() {
        Some(ContentKind::Monster) => 'M',
        Some(ContentKind::Boss) => 'B',
        Some(ContentKind::Treasure) => 'T',
        Some(ContentKind::Event) => 'E',
        None if fog && !room.visited => '?',
        None => '.',
    }
}

/// The whole grid with column and row headers.
pub fn render_map(dungeon: &Dungeon, explorer: Option<&Explorer>) -> String {
    let mut out = String::from("  ");
    for x in 0..dungeon.width() {
        out.push_str(&format!("{:>2} ", x));
    }
    out.push('\n');

    for y in 0..dungeon.height() {
        out.push_str(&format!("{:>2}", y));
        for x in 0..dungeon.width() {
            let pos = Position::new(x, y);
            let glyph = match explorer {
                Some(e) if e.position == pos => '@',
                _ => cell_glyph(dungeon, pos, false),
            };
            out.push_str(&format!(" {} ", glyph));
        }
        out.push('\n');
    }
    out
}

/// A `(2r+1)`-square window centred on the explorer; unvisited empty rooms
/// show as `?`.
pub fn render_minimap(dungeon: &Dungeon, explorer: &Explorer, radius: i32) -> String {
    let centre = explorer.position;
    let mut out = String::new();
    for y in centre.y - radius..=centre.y + radius {
        for x in centre.x - radius..=centre.x + radius {
            let pos = Position::new(x, y);
            let glyph = if pos == centre {
                '@'
            } else {
                cell_glyph(dungeon, pos, true)
            };
            out.push_str(&format!(" {} ", glyph));
        }
        out.push('\n');
    }
    out
}
