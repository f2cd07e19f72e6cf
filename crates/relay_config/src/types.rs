//! Configuration types deserialized from `relay.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `relay.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project identity and the circuit description it points at.
    pub project: ProjectMeta,
    /// Simulation options.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Core project metadata required in every `relay.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Path to the circuit description file, relative to `relay.toml`.
    pub circuit: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

/// Options controlling a simulation run.
#[derive(Debug, Default, Deserialize)]
pub struct SimulationConfig {
    /// Bound on nested function applications. `None` uses the engine
    /// default.
    pub max_call_depth: Option<u32>,
    /// Path for VCD waveform output, relative to `relay.toml`.
    /// No waveform is written when absent.
    pub waveform: Option<String>,
}
