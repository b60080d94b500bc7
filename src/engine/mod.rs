mod combat;
mod explore;
mod explorer;
mod items;
mod movement;
mod output;
mod render;

pub use combat::{BOSS_EXPLORER_FIRST, Turn, boss_opening, fight_boss, fight_monster, monster_opening};
pub use explorer::{Buff, Explorer};
pub use movement::Travel;
pub use output::{Output, OutputBlock};
pub use render::{LEGEND, render_map, render_minimap};
