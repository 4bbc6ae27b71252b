//! Rule tables loader.
//!
//! Sequencer timing and combat balance live in one TOML file with a
//! `[sequencer]` and a `[combat]` section. Missing keys fall back to the
//! core defaults.

use std::path::Path;

use mud_core::{CombatParams, CoreConfig};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Tunables loaded from `tables.toml`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tables {
    pub sequencer: CoreConfig,
    pub combat: CombatParams,
}

/// Loader for rule tables from TOML files.
pub struct TablesLoader;

impl TablesLoader {
    /// Load rule tables from a TOML file.
    pub fn load(path: &Path) -> LoadResult<Tables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse rule tables from TOML text.
    pub fn parse(content: &str) -> LoadResult<Tables> {
        let tables: Tables = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tables TOML: {}", e))?;

        let window = &tables.sequencer;
        if window.answer_delay_min > window.answer_delay_max {
            anyhow::bail!(
                "answer_delay_min ({}) exceeds answer_delay_max ({})",
                window.answer_delay_min,
                window.answer_delay_max
            );
        }
        let clamp = tables.combat.hit_chance;
        if clamp.min > clamp.max || clamp.max > 100 {
            anyhow::bail!("hit chance bounds {}..={} are invalid", clamp.min, clamp.max);
        }

        Ok(tables)
    }
}
