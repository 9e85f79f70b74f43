//! Project configuration for the plexus elaboration engine.
//!
//! Parses `plexus.toml` into a [`ProjectConfig`]: the `[project]` table
//! names the design and its top module, the `[elaboration]` table sets the
//! explicit resource bounds (for-loop unroll count, specialization worklist
//! size) that keep elaboration from looping forever on a degenerate design.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{ElaborationConfig, ProjectConfig, ProjectMeta};
