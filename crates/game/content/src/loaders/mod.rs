//! Content loaders for reading game data from files.
//!
//! This module provides loaders that convert RON/TOML files into core types
//! and oracle implementations.

pub mod factory;
pub mod npcs;
pub mod tables;
pub mod world;

pub use factory::ContentFactory;
pub use npcs::{NpcCatalog, NpcLoader};
pub use tables::{Tables, TablesLoader};
pub use world::{RoomSpec, WorldLoader, WorldSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
