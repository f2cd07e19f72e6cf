//! Workspace configuration for the Relay circuit simulator.
//!
//! A `relay.toml` next to a circuit description names the project and sets
//! simulation options, so repeated runs need no flags. Loading and
//! validation live in [`loader`], the deserialized shapes in [`types`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{ProjectConfig, ProjectMeta, SimulationConfig};
