//! Driver settings read from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// How the simulation is run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Directory holding `tables.toml`, `npcs.ron`, and `world.ron`.
    pub content_dir: PathBuf,
    /// Wall-clock length of one tick.
    pub tick: Duration,
    /// Ticks to run before exiting. `None` runs until interrupted.
    pub run_ticks: Option<u64>,
    pub player_name: String,
    /// Commands the player types once connected.
    pub script: Vec<String>,
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MUD_CONTENT_DIR` - Content directory (default: bundled data)
    /// - `MUD_TICK_MS` - Milliseconds per tick (default: 250)
    /// - `MUD_RUN_TICKS` - Stop after this many ticks (default: run forever)
    /// - `MUD_PLAYER` - Name of the connected player (default: "Wanderer")
    /// - `MUD_SCRIPT` - `;`-separated commands issued at startup
    pub fn from_env() -> Self {
        let content_dir = env::var_os("MUD_CONTENT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(mud_content::BUNDLED_DATA_DIR));
        let tick_ms = read_env::<u64>("MUD_TICK_MS").unwrap_or(250).max(1);
        let script = env::var("MUD_SCRIPT")
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            content_dir,
            tick: Duration::from_millis(tick_ms),
            run_ticks: read_env("MUD_RUN_TICKS"),
            player_name: env::var("MUD_PLAYER").unwrap_or_else(|_| "Wanderer".to_owned()),
            script,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
