//! Runtime configuration shared by the world and its drivers.
use std::env;

use mud_core::{CombatParams, CoreConfig};

/// Everything the world needs besides content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub core: CoreConfig,
    pub combat: CombatParams,
    /// Seed of the world's random source.
    pub seed: u64,
    /// Ticks between two combat rounds of one living.
    pub combat_round: u64,
    /// Flee threshold given to players, in percent of max hit points.
    pub default_wimpy: u32,
}

impl RuntimeConfig {
    pub const DEFAULT_SEED: u64 = 0x5eed;
    pub const DEFAULT_COMBAT_ROUND: u64 = 2;
    pub const DEFAULT_WIMPY: u32 = 0;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `MUD_SEED` - Random seed (default: 0x5eed)
    /// - `MUD_COMBAT_ROUND` - Ticks per combat round (default: 2, minimum 1)
    /// - `MUD_DORMANCY_TIMEOUT` - Ticks without an observer before NPCs go dormant
    /// - `MUD_BEAT_JITTER` - Upper bound of the random heartbeat stretch
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(seed) = read_env::<u64>("MUD_SEED") {
            config.seed = seed;
        }
        if let Some(round) = read_env::<u64>("MUD_COMBAT_ROUND") {
            config.combat_round = round.max(1);
        }
        if let Some(timeout) = read_env::<u64>("MUD_DORMANCY_TIMEOUT") {
            config.core.dormancy_timeout = timeout;
        }
        if let Some(jitter) = read_env::<u64>("MUD_BEAT_JITTER") {
            config.core.beat_jitter = jitter;
        }

        config
    }

    /// Same configuration with content-provided rule tables.
    pub fn with_tables(mut self, core: CoreConfig, combat: CombatParams) -> Self {
        self.core = core;
        self.combat = combat;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            combat: CombatParams::default(),
            seed: Self::DEFAULT_SEED,
            combat_round: Self::DEFAULT_COMBAT_ROUND,
            default_wimpy: Self::DEFAULT_WIMPY,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
