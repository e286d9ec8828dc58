//! Delta computation and patching over flat JSON configuration maps
//!
//! A [`Delta`] lists the additions, deletions and updates that turn one
//! [`ConfigMap`] into another. [`DeltaEngine::apply`] of a computed delta
//! reproduces the target exactly.

pub mod config_map;
pub mod delta;

pub use config_map::{load_config_map, parse_config_map, save_config_map, ConfigMap};
pub use delta::{Addition, Delta, DeltaEngine, DeltaSummary, Update};
