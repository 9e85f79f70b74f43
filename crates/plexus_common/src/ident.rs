//! Interned identifiers and the rename helpers used during elaboration.
//!
//! Every named entity in a design (modules, variables, instances, blocks,
//! functions, ports, parameters) is an [`Ident`]: a `u32` index into a
//! thread-safe string interner. Interning gives O(1) equality and cloning,
//! and makes the interner key itself serve as the name hash.
//!
//! Elaboration renames things in two ways, both of which intern a fresh
//! string and return a new [`Ident`]:
//! - [`Interner::suffix_increase`] disambiguates colliding auto-generated
//!   names (`u` -> `u_0` -> `u_1` -> ...).
//! - [`Interner::with_prefix`] builds hierarchical names when a named block
//!   or loop iteration is flattened into its parent (`blk0` + `r` ->
//!   `blk0.r`).

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// A unique identifier for any named entity in the design.
///
/// Identifiers are interned strings represented as a `u32` index into the
/// session [`Interner`]. Equality and hashing operate on the index, so two
/// idents are equal iff their names are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw `u32` index.
    ///
    /// Primarily intended for deserialization and testing. In normal use,
    /// identifiers are created through [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this identifier.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Ident` wraps a `u32` which is always a valid `usize` on 32-bit
// and 64-bit platforms. `try_from_usize` rejects values that don't fit.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
///
/// One interner lives for the whole compilation session; the parser and the
/// elaborator share it so that a name interned during parsing compares equal
/// to the same name built during unrolling or specialization.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string, returning its [`Ident`]. If the string was already
    /// interned, returns the existing identifier without allocating.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Resolves an [`Ident`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// Returns the next name in the `_<n>` disambiguation series.
    ///
    /// A name ending in `_<digits>` has the digits incremented; any other
    /// name gets `_0` appended. Used to resolve table collisions between
    /// auto-generated instance and variable names:
    ///
    /// `u` -> `u_0`, `u_0` -> `u_1`, `u_9` -> `u_10`, `mem_2x` -> `mem_2x_0`.
    pub fn suffix_increase(&self, ident: Ident) -> Ident {
        let name = self.resolve(ident);
        let bumped = match split_numeric_suffix(name) {
            Some((stem, n)) => format!("{stem}_{}", n.wrapping_add(1)),
            None => format!("{name}_0"),
        };
        self.get_or_intern(&bumped)
    }

    /// Builds the hierarchical name `<prefix>.<name>`.
    ///
    /// Used when a named sub-block or an iteration of a named for-loop body
    /// is flattened into its parent scope. Every symbol table that keyed the
    /// old name must be re-indexed afterwards.
    pub fn with_prefix(&self, prefix: &str, ident: Ident) -> Ident {
        let name = self.resolve(ident);
        self.get_or_intern(&format!("{prefix}.{name}"))
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a trailing `_<digits>` suffix off a name.
///
/// Returns the stem (without the underscore) and the parsed number, or
/// `None` when the name carries no such suffix. Overlong digit runs that do
/// not fit a `u64` are treated as no suffix.
fn split_numeric_suffix(name: &str) -> Option<(&str, u64)> {
    let underscore = name.rfind('_')?;
    let digits = &name[underscore + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n = digits.parse::<u64>().ok()?;
    Some((&name[..underscore], n))
}
