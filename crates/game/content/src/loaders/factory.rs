//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use crate::loaders::{LoadResult, NpcCatalog, NpcLoader, Tables, TablesLoader, WorldLoader, WorldSpec};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── tables.toml
/// ├── npcs.ron
/// └── world.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data files shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(crate::BUNDLED_DATA_DIR)
    }

    /// Load rule tables from `tables.toml`.
    pub fn load_tables(&self) -> LoadResult<Tables> {
        TablesLoader::load(&self.data_dir.join("tables.toml"))
    }

    /// Load the NPC catalog from `npcs.ron`.
    pub fn load_npcs(&self) -> LoadResult<NpcCatalog> {
        NpcLoader::load(&self.data_dir.join("npcs.ron"))
    }

    /// Load the world layout from `world.ron`, checking that every placed
    /// NPC exists in `catalog`.
    pub fn load_world(&self, catalog: &NpcCatalog) -> LoadResult<WorldSpec> {
        let world = WorldLoader::load(&self.data_dir.join("world.ron"))?;
        for room in &world.rooms {
            for npc in &room.npcs {
                if catalog.get(npc).is_none() {
                    anyhow::bail!("Room '{}' places unknown NPC '{}'", room.key, npc);
                }
            }
        }
        Ok(world)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
