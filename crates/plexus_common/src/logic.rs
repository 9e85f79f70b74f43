//! IEEE 1364 four-state logic values.
//!
//! A [`Logic`] is one bit of a 4-state vector. Operators follow the Verilog
//! truth tables; the plane conversions ([`Logic::from_planes`],
//! [`Logic::planes`]) map to the packed two-plane storage used by the
//! bit-vector type, and the `matches_*` helpers implement the per-bit
//! semantics of `case`/`casez`/`casex` item matching.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// A single 4-state logic value.
///
/// - `Zero` — driven low
/// - `One` — driven high
/// - `X` — unknown or uninitialized
/// - `Z` — high-impedance (not driven)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Logic low (0).
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Unknown or uninitialized.
    X = 2,
    /// High-impedance (tri-state).
    Z = 3,
}

impl Logic {
    /// Converts a literal digit character to a [`Logic`] value.
    ///
    /// Accepts `0`, `1`, `x`/`X`, and `z`/`Z`. The `?` don't-care alias for
    /// `z` used in case items is accepted as well.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'x' | 'X' => Some(Logic::X),
            'z' | 'Z' | '?' => Some(Logic::Z),
            _ => None,
        }
    }

    /// Renders this value as a literal digit character (`0/1/x/z`).
    pub fn to_char(self) -> char {
        match self {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'x',
            Logic::Z => 'z',
        }
    }

    /// Returns true for driven values (`0` or `1`).
    pub fn is_definite(self) -> bool {
        matches!(self, Logic::Zero | Logic::One)
    }

    /// Decodes a value from its two storage planes.
    ///
    /// The packed bit-vector representation keeps one value plane and one
    /// unknown plane per bit: `(v,u)` encodes `(0,0)=0`, `(1,0)=1`,
    /// `(0,1)=X`, `(1,1)=Z`.
    pub fn from_planes(value: bool, unknown: bool) -> Self {
        match (value, unknown) {
            (false, false) => Logic::Zero,
            (true, false) => Logic::One,
            (false, true) => Logic::X,
            (true, true) => Logic::Z,
        }
    }

    /// Encodes this value into its `(value, unknown)` storage planes.
    pub fn planes(self) -> (bool, bool) {
        match self {
            Logic::Zero => (false, false),
            Logic::One => (true, false),
            Logic::X => (false, true),
            Logic::Z => (true, true),
        }
    }

    /// Lifts a boolean into a definite logic value.
    pub fn from_bool(b: bool) -> Self {
        if b {
            Logic::One
        } else {
            Logic::Zero
        }
    }

    /// Per-bit `case` item matching: requires a literal match including
    /// X/Z (`x` only matches `x`, `z` only matches `z`).
    pub fn matches_exact(self, pattern: Logic) -> bool {
        self == pattern
    }

    /// Per-bit `casez` item matching: `z` in the pattern is a don't-care.
    pub fn matches_casez(self, pattern: Logic) -> bool {
        pattern == Logic::Z || self == pattern
    }

    /// Per-bit `casex` item matching: `x` and `z` in the pattern are
    /// don't-cares.
    pub fn matches_casex(self, pattern: Logic) -> bool {
        !pattern.is_definite() || self == pattern
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Verilog AND truth table:
/// ```text
///     0  1  X  Z
/// 0 | 0  0  0  0
/// 1 | 0  1  X  X
/// X | 0  X  X  X
/// Z | 0  X  X  X
/// ```
impl BitAnd for Logic {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Zero, _) | (_, Zero) => Zero,
            (One, One) => One,
            _ => X,
        }
    }
}

/// Verilog OR truth table:
/// ```text
///     0  1  X  Z
/// 0 | 0  1  X  X
/// 1 | 1  1  1  1
/// X | X  1  X  X
/// Z | X  1  X  X
/// ```
impl BitOr for Logic {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (One, _) | (_, One) => One,
            (Zero, Zero) => Zero,
            _ => X,
        }
    }
}

/// Verilog XOR truth table: definite inputs give the usual parity, any
/// X/Z input gives X.
impl BitXor for Logic {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Zero, Zero) | (One, One) => Zero,
            (Zero, One) | (One, Zero) => One,
            _ => X,
        }
    }
}

/// Verilog NOT: `!0 = 1`, `!1 = 0`, `!X = X`, `!Z = X`.
impl Not for Logic {
    type Output = Self;

    fn not(self) -> Self {
        use Logic::*;
        match self {
            Zero => One,
            One => Zero,
            X | Z => X,
        }
    }
}
