//! Configuration types deserialized from `plexus.toml`.

use serde::Deserialize;

/// The top-level project configuration parsed from `plexus.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version, top module).
    pub project: ProjectMeta,
    /// Elaboration resource bounds.
    #[serde(default)]
    pub elaboration: ElaborationConfig,
}

/// Core project metadata required in every `plexus.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: Option<String>,
    /// The name of the top-level module to elaborate.
    pub top: String,
}

/// Resource bounds for the elaboration engine.
///
/// Both bounds exist so that a constant for-loop that never terminates, or
/// an instantiation chain that keeps producing novel parameter sets, fails
/// with an explicit `R`-class diagnostic instead of running forever.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ElaborationConfig {
    /// Maximum number of iterations a single for-loop may unroll to.
    #[serde(default = "default_max_unroll")]
    pub max_unroll_iterations: usize,
    /// Maximum number of module specializations elaborated in one run.
    #[serde(default = "default_max_specializations")]
    pub max_specializations: usize,
}

fn default_max_unroll() -> usize {
    4096
}

fn default_max_specializations() -> usize {
    4096
}

impl Default for ElaborationConfig {
    fn default() -> Self {
        Self {
            max_unroll_iterations: default_max_unroll(),
            max_specializations: default_max_specializations(),
        }
    }
}
