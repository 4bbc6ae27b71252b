//! Headless mud simulation.
//!
//! Loads content, populates a world, connects one player, and advances the
//! world clock once per tick interval. Everything the player sees is logged
//! at info level; deliveries to other livings at debug level.
//!
//! ```bash
//! MUD_RUN_TICKS=400 MUD_SCRIPT="ask guard about the goblin;north" cargo run -p mud-sim
//! ```
mod config;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mud_content::ContentFactory;
use mud_core::EntityId;
use mud_runtime::{RuntimeConfig, World};

use config::SimConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();
    setup_logging();

    let config = SimConfig::from_env();
    let mut world = build_world(&config)?;

    let start = world.start_room().context("World layout has no start room")?;
    let player = world.add_player(&config.player_name, start)?;
    info!(target: "sim", player = %player, "{} connected", config.player_name);

    for line in &config.script {
        if let Err(err) = world.command(player, line) {
            warn!(target: "sim", command = line.as_str(), error = %err, "scripted command failed");
        }
    }

    tokio::select! {
        result = run(&mut world, &config, player) => result?,
        _ = tokio::signal::ctrl_c() => info!(target: "sim", "interrupted"),
    }

    info!(target: "sim", tick = world.now().0, "simulation stopped");
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_world(config: &SimConfig) -> Result<World> {
    let factory = ContentFactory::new(&config.content_dir);
    let tables = factory.load_tables()?;
    let catalog = factory.load_npcs()?;
    let layout = factory.load_world(&catalog)?;
    info!(
        target: "sim",
        dir = %factory.data_dir().display(),
        npcs = catalog.len(),
        rooms = layout.rooms.len(),
        "content loaded"
    );

    let runtime = RuntimeConfig::from_env().with_tables(tables.sequencer, tables.combat);
    debug!(target: "sim", ?runtime, "runtime configuration");
    let mut world = World::new(runtime);
    world
        .populate(&layout, &catalog)
        .context("Failed to populate world")?;
    Ok(world)
}

async fn run(world: &mut World, config: &SimConfig, player: EntityId) -> Result<()> {
    let mut interval = tokio::time::interval(config.tick);
    let mut ticks = 0u64;
    while config.run_ticks.is_none_or(|limit| ticks < limit) {
        interval.tick().await;
        world.advance(1)?;
        ticks += 1;

        for delivery in world.outbox_mut().drain() {
            if delivery.to == player {
                info!(target: "sim", tick = delivery.at.0, "{}", delivery.text);
            } else {
                debug!(target: "sim", tick = delivery.at.0, to = %delivery.to, "{}", delivery.text);
            }
        }
        if world.census().living(player).is_none() {
            info!(target: "sim", "{} has died", config.player_name);
            break;
        }
    }
    Ok(())
}
