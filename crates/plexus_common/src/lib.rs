//! Shared foundational types used across the plexus elaboration engine.
//!
//! This crate provides interned identifiers with the rename helpers the
//! elaborator's auto-naming relies on, 4-state logic values, content hashing
//! for specialization keys, and the common result types.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod logic;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner};
pub use logic::Logic;
pub use result::{InternalError, PlexusResult};
