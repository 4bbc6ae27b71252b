//! Data-driven content definitions and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - NPC templates (RON)
//! - Sequencer and combat rule tables (TOML)
//! - World layouts for hosts that seed rooms from data (RON)
//!
//! All loaders use mud-core types directly with serde for deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ContentFactory, LoadResult, NpcCatalog, NpcLoader, RoomSpec, Tables, TablesLoader,
    WorldLoader, WorldSpec,
};

/// Directory holding the bundled data files.
pub const BUNDLED_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");
