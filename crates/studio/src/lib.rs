// Library crate: project store, geometry, map bridge and advisor client.
// The binary is a thin headless driver over these modules.

pub mod advisor;
pub mod command;
pub mod export;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod map_adapter;
pub mod massing;
pub mod state;
