use std::env;
use std::path::PathBuf;
use std::process;

use dungeon_crawl::Session;
use dungeon_crawl::engine::{LEGEND, Output, render_map, render_minimap};
use dungeon_crawl::error::Result;
use dungeon_crawl::world::{ContentKind, DungeonConfig, Position, load_config_from_file};

fn init_logging() {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    // RUST_LOG overrides the base level
    builder.parse_default_env();
    builder.format(|fmt, record| writeln!(fmt, "[{}] {}", record.level(), record.args()));
    let _ = builder.try_init();
}

fn load_config() -> Result<DungeonConfig> {
    match env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            println!("Using config file: {}", path.display());
            load_config_from_file(&path)
        }
        None => Ok(DungeonConfig {
            seed: Some(42),
            ..DungeonConfig::default()
        }),
    }
}

fn first_room_with(session: &Session, kind: ContentKind) -> Option<Position> {
    session
        .dungeon
        .rooms()
        .find(|r| r.content_kind() == Some(kind))
        .map(|r| r.position)
}

fn status_line(session: &Session) -> String {
    format!(
        "hp {} | attack {} | items {} (value {})",
        session.explorer.health,
        session.explorer.compute_attack(),
        session.explorer.inventory.len(),
        session.explorer.inventory_value()
    )
}

fn visit(session: &mut Session, kind: ContentKind, out: &mut Output) {
    let Some(target) = first_room_with(session, kind) else {
        out.say(format!("no {} room in this dungeon", kind.as_str()));
        return;
    };

    out.title(format!("heading to the {} at {}", kind.as_str(), target));
    if let Some(content) = session.dungeon.room(target).and_then(|r| r.content.as_ref()) {
        out.say(content.description());
    }
    let travel = session.travel_to(target);
    for narrative in &travel.narratives {
        out.narrate(narrative);
    }
    if !travel.arrived {
        out.say("the journey ends early");
    }
    out.set_status(status_line(session));
}

fn run() -> Result<()> {
    let config = load_config()?;
    let mut session = Session::new(&config)?;

    println!("{}", render_map(&session.dungeon, Some(&session.explorer)));
    println!("{}\n", LEGEND);

    let stats = session.dungeon.stats();
    println!(
        "rooms {} | empty {} | treasure {} | monsters {} | bosses {} | events {} | avg connections {:.2}",
        stats.total,
        stats.empty,
        stats.treasures,
        stats.monsters,
        stats.bosses,
        stats.events,
        stats.average_connections
    );

    let mut out = Output::new();
    visit(&mut session, ContentKind::Treasure, &mut out);
    if !session.is_over() {
        visit(&mut session, ContentKind::Monster, &mut out);
    }
    for line in session.explorer.inventory_lines() {
        out.say(line);
    }
    print!("{}", out);

    println!("\n{}", render_minimap(&session.dungeon, &session.explorer, 2));

    let dir = env::temp_dir();
    let save_path = dir.join(format!("dungeon_crawl_{}.json", process::id()));
    session.save(&save_path)?;
    let restored = Session::load(&save_path, config.seed)?;
    let _ = std::fs::remove_file(&save_path);

    println!("restored save:");
    println!(
        "{}",
        render_map(&restored.dungeon, Some(&restored.explorer))
    );
    println!("{}", status_line(&restored));
    Ok(())
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
