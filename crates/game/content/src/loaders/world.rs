//! World layout loader.
//!
//! Loads rooms, their exits, and the NPCs placed in them from RON files.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One room of a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub key: String,
    #[serde(default)]
    pub peaceful: bool,
    /// `(direction, destination room key)`
    #[serde(default)]
    pub exits: Vec<(String, String)>,
    /// NPC template keys spawned here.
    #[serde(default)]
    pub npcs: Vec<String>,
}

/// A complete layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSpec {
    pub rooms: Vec<RoomSpec>,
    /// Room the interactive observer starts in.
    pub start: String,
}

/// Loader for world layouts from RON files.
pub struct WorldLoader;

impl WorldLoader {
    /// Load a world layout from a RON file.
    ///
    /// Every exit and the start room must name a room of the layout.
    pub fn load(path: &Path) -> LoadResult<WorldSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<WorldSpec> {
        let world: WorldSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse world RON: {}", e))?;

        let mut keys = BTreeSet::new();
        for room in &world.rooms {
            if !keys.insert(room.key.as_str()) {
                anyhow::bail!("Duplicate room '{}'", room.key);
            }
        }
        for room in &world.rooms {
            for (direction, destination) in &room.exits {
                if !keys.contains(destination.as_str()) {
                    anyhow::bail!(
                        "Exit '{}' of room '{}' leads to unknown room '{}'",
                        direction,
                        room.key,
                        destination
                    );
                }
            }
        }
        if !keys.contains(world.start.as_str()) {
            anyhow::bail!("Unknown start room '{}'", world.start);
        }

        Ok(world)
    }
}
