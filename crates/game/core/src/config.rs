/// Sequencer and behavior tunables.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoreConfig {
    /// Base delay between two heartbeats of a busy entity.
    pub beat_delay: u64,
    /// Upper bound of the random extra delay added to every heartbeat.
    /// Keeps entities spawned together from ticking in lockstep.
    pub beat_jitter: u64,
    /// An entity with no interactive observer for longer than this is
    /// signalled dormant.
    pub dormancy_timeout: u64,
    /// Shortest delay before a question is answered.
    pub answer_delay_min: u64,
    /// Longest delay before a question is answered.
    pub answer_delay_max: u64,
}

impl CoreConfig {
    // ===== compile-time constants used as type parameters =====
    /// Hard cap on sequences per entity.
    pub const MAX_SEQUENCES: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BEAT_DELAY: u64 = 1;
    pub const DEFAULT_BEAT_JITTER: u64 = 1;
    pub const DEFAULT_DORMANCY_TIMEOUT: u64 = 60;
    pub const DEFAULT_ANSWER_DELAY_MIN: u64 = 1;
    pub const DEFAULT_ANSWER_DELAY_MAX: u64 = 3;

    pub fn new() -> Self {
        Self {
            beat_delay: Self::DEFAULT_BEAT_DELAY,
            beat_jitter: Self::DEFAULT_BEAT_JITTER,
            dormancy_timeout: Self::DEFAULT_DORMANCY_TIMEOUT,
            answer_delay_min: Self::DEFAULT_ANSWER_DELAY_MIN,
            answer_delay_max: Self::DEFAULT_ANSWER_DELAY_MAX,
        }
    }

    /// Config without heartbeat jitter, for reproducible timing in tests.
    pub fn steady() -> Self {
        Self {
            beat_jitter: 0,
            ..Self::new()
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit-chance clamp parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitChanceParams {
    pub base: i32,
    pub min: u32,
    pub max: u32,
}

/// Balance parameters for combat resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatParams {
    pub hit_chance: HitChanceParams,
    /// Skill level is divided by this and added to the attack's to-hit.
    pub skill_divisor: u32,
}

impl Default for CombatParams {
    fn default() -> Self {
        Self {
            hit_chance: HitChanceParams {
                base: 50,
                min: 5,
                max: 95,
            },
            skill_divisor: 4,
        }
    }
}
