//! Arbitrary-width 4-state bit-vector values.
//!
//! A [`Number`] is the constant value type of the elaboration engine: every
//! literal in the design and every folded expression result is one. Bits
//! are stored in two packed planes of `u64` words, LSB first: a value
//! plane and an unknown plane, where `(v,u)` encodes `(0,0)=0`, `(1,0)=1`,
//! `(0,1)=X`, `(1,1)=Z`.
//!
//! A number is *valuable* when no bit is X or Z. Arithmetic, relational,
//! and logical operations are only defined over valuable operands and
//! return `None` otherwise; bitwise operations, case equality, reductions,
//! concatenation, and shift-by-constant fold any 4-state constant with
//! X-propagating results. Integer extraction is limited to the engine's
//! native folding width of 32 bits; wider values stay bit-vector-only.
//!
//! All width operations return a fresh value; a `Number` is never mutated
//! through a shared reference.

use plexus_common::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bits per plane word.
const BITS_PER_WORD: u32 = 64;

/// The widest value [`Number::get_value`] extracts as a native integer.
pub const NATIVE_WIDTH: u32 = 32;

/// An error produced while parsing a numeric literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NumberError {
    /// The literal text was empty or had no digits after the base.
    #[error("empty numeric literal")]
    Empty,
    /// The base character after the tick was not one of `b`, `o`, `d`, `h`.
    #[error("invalid base character `{0}` in literal")]
    InvalidBase(char),
    /// A digit was not valid for the literal's base.
    #[error("invalid digit `{0}` for base {1}")]
    InvalidDigit(char, u32),
    /// The literal declared a width of zero bits.
    #[error("literal has zero width")]
    ZeroWidth,
}

/// A 4-state bit-vector value of fixed width.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Number {
    width: u32,
    /// Value plane, LSB first.
    value: Vec<u64>,
    /// Unknown plane, LSB first. A set bit marks X (value 0) or Z (value 1).
    unknown: Vec<u64>,
    signed: bool,
}

fn word_count(width: u32) -> usize {
    width.div_ceil(BITS_PER_WORD) as usize
}

impl Number {
    /// Creates a number of the given width with every bit set to `bit`.
    pub fn filled(width: u32, bit: Logic) -> Self {
        debug_assert!(width > 0, "zero-width number");
        let mut n = Self {
            width,
            value: vec![0; word_count(width)],
            unknown: vec![0; word_count(width)],
            signed: false,
        };
        if bit != Logic::Zero {
            for i in 0..width {
                n.set(i, bit);
            }
        }
        n
    }

    /// Creates an all-zero number of the given width.
    pub fn zero(width: u32) -> Self {
        Self::filled(width, Logic::Zero)
    }

    /// Creates a number from a machine integer, truncating to `width` bits.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut n = Self::zero(width);
        for i in 0..width.min(64) {
            if (value >> i) & 1 != 0 {
                n.set(i, Logic::One);
            }
        }
        n
    }

    /// Creates a 1-bit number from a boolean.
    pub fn from_bool(value: bool) -> Self {
        Self::from_u64(value as u64, 1)
    }

    /// Creates a 1-bit number from a single logic value.
    pub fn from_logic(bit: Logic) -> Self {
        let mut n = Self::zero(1);
        n.set(0, bit);
        n
    }

    /// Creates a number from a raw bit string, most significant bit first.
    ///
    /// Accepts the digit characters `0`, `1`, `x`, `z` (case-insensitive)
    /// and `?` as an alias for `z`. Returns `None` on any other character
    /// or an empty string.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        let mut n = Self::zero(s.len() as u32);
        for (i, c) in s.chars().rev().enumerate() {
            n.set(i as u32, Logic::from_char(c)?);
        }
        Some(n)
    }

    /// Parses a Verilog-style numeric literal.
    ///
    /// Handles plain decimal (`42`, always 32 bits), sized and unsized
    /// based literals (`4'b10xz`, `8'hff`, `'o17`, `12'd100`), the signed
    /// marker (`8'sd255`), underscore separators, and `x`/`z`/`?` digits in
    /// binary, octal, and hex bases. A lone `x` or `z` digit in a decimal
    /// base fills the whole value (`8'dx`). Sized literals narrower than
    /// their digits keep the low bits; wider ones extend with zero, or with
    /// the leading digit when it is X or Z.
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        let text: String = text.chars().filter(|&c| c != '_').collect();
        if text.is_empty() {
            return Err(NumberError::Empty);
        }

        let Some(tick) = text.find('\'') else {
            // Bare decimal literal, natively 32 bits and signed.
            let mut n = parse_digits(&text, 10)?;
            n = n.set_width(32);
            n.signed = true;
            return Ok(n);
        };

        let width_text = &text[..tick];
        let width = if width_text.is_empty() {
            None
        } else {
            let w: u32 = width_text
                .parse()
                .map_err(|_| NumberError::InvalidDigit(width_text.chars().next().unwrap(), 10))?;
            if w == 0 {
                return Err(NumberError::ZeroWidth);
            }
            Some(w)
        };

        let mut rest = &text[tick + 1..];
        let signed = rest.starts_with('s') || rest.starts_with('S');
        if signed {
            rest = &rest[1..];
        }
        let base_char = rest.chars().next().ok_or(NumberError::Empty)?;
        let base = match base_char {
            'b' | 'B' => 2,
            'o' | 'O' => 8,
            'd' | 'D' => 10,
            'h' | 'H' => 16,
            other => return Err(NumberError::InvalidBase(other)),
        };
        let digits = &rest[base_char.len_utf8()..];
        if digits.is_empty() {
            return Err(NumberError::Empty);
        }

        let mut n = parse_digits(digits, base)?;
        if let Some(w) = width {
            // X/Z-extend from the top digit the way based literals do.
            let top = n.get(n.width - 1);
            if w > n.width && !top.is_definite() {
                let mut wide = Self::filled(w, top);
                for i in 0..n.width {
                    wide.set(i, n.get(i));
                }
                n = wide;
            } else {
                n = n.set_width(w);
            }
        } else {
            n = n.set_width(32);
        }
        n.signed = signed;
        Ok(n)
    }

    /// The number of bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Whether the value is signed.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Returns a copy marked signed or unsigned.
    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    /// Reads the bit at `index`, LSB first.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "bit {index} out of bounds for width {}",
            self.width
        );
        let word = (index / BITS_PER_WORD) as usize;
        let bit = index % BITS_PER_WORD;
        let v = (self.value[word] >> bit) & 1 != 0;
        let u = (self.unknown[word] >> bit) & 1 != 0;
        Logic::from_planes(v, u)
    }

    /// Writes the bit at `index`, LSB first.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, bit: Logic) {
        assert!(
            index < self.width,
            "bit {index} out of bounds for width {}",
            self.width
        );
        let word = (index / BITS_PER_WORD) as usize;
        let off = index % BITS_PER_WORD;
        let (v, u) = bit.planes();
        self.value[word] = (self.value[word] & !(1 << off)) | ((v as u64) << off);
        self.unknown[word] = (self.unknown[word] & !(1 << off)) | ((u as u64) << off);
    }

    /// Returns `true` iff no bit is X or Z.
    pub fn is_valuable(&self) -> bool {
        self.unknown.iter().all(|&w| w == 0)
    }

    /// Extracts the value as a native integer.
    ///
    /// Defined only for valuable values no wider than the engine's native
    /// folding width of 32 bits; anything else returns `None`.
    pub fn get_value(&self) -> Option<u32> {
        if self.width > NATIVE_WIDTH || !self.is_valuable() {
            return None;
        }
        Some(self.value[0] as u32)
    }

    /// Extracts up to 64 bits of a valuable value.
    ///
    /// Internal widening used by the arithmetic kernels, which operate on
    /// `u64` and reduce modulo the result width.
    fn to_u64(&self) -> Option<u64> {
        if self.width > 64 || !self.is_valuable() {
            return None;
        }
        Some(self.value[0])
    }

    /// Sign- or zero-extends a valuable value into an `i64`.
    fn to_i64(&self) -> Option<i64> {
        let raw = self.to_u64()?;
        if self.signed && self.width < 64 && (raw >> (self.width - 1)) & 1 != 0 {
            Some((raw | !0u64 << self.width) as i64)
        } else {
            Some(raw as i64)
        }
    }

    /// Returns `Some(true)` if the value is valuable and non-zero,
    /// `Some(false)` if valuable and zero, `None` otherwise.
    pub fn to_bool(&self) -> Option<bool> {
        if !self.is_valuable() {
            return None;
        }
        Some(self.value.iter().any(|&w| w != 0))
    }

    /// Extracts the bit range `hi..=lo` as a new unsigned number.
    ///
    /// Bits addressed beyond the width read as X, matching out-of-range
    /// bit selects.
    ///
    /// # Panics
    ///
    /// Panics if `hi < lo`.
    pub fn truncate(&self, hi: u32, lo: u32) -> Self {
        assert!(hi >= lo, "truncate range [{hi}:{lo}] is reversed");
        let mut n = Self::zero(hi - lo + 1);
        for i in lo..=hi {
            let bit = if i < self.width { self.get(i) } else { Logic::X };
            n.set(i - lo, bit);
        }
        n
    }

    /// Concatenates `rhs` below this value: the result has `rhs` in the
    /// low bits and `self` in the high bits, is `self.width + rhs.width`
    /// wide, and is unsigned.
    pub fn concatenate(&self, rhs: &Self) -> Self {
        let mut n = Self::zero(self.width + rhs.width);
        for i in 0..rhs.width {
            n.set(i, rhs.get(i));
        }
        for i in 0..self.width {
            n.set(rhs.width + i, self.get(i));
        }
        n
    }

    /// Resizes to `new_width` bits.
    ///
    /// Growing sign-extends a signed value (replicating the top bit, X/Z
    /// included) and zero-extends an unsigned one. Shrinking keeps the low
    /// bits and clears the signed flag. Idempotent at the same width.
    pub fn set_width(&self, new_width: u32) -> Self {
        debug_assert!(new_width > 0, "zero-width resize");
        if new_width == self.width {
            return self.clone();
        }
        let fill = if new_width > self.width && self.signed {
            self.get(self.width - 1)
        } else {
            Logic::Zero
        };
        let mut n = Self::filled(new_width, fill);
        for i in 0..self.width.min(new_width) {
            n.set(i, self.get(i));
        }
        n.signed = self.signed && new_width > self.width;
        n
    }

    /// Per-bit AND over operands extended to the wider width.
    pub fn and(&self, rhs: &Self) -> Self {
        self.bitwise(rhs, |a, b| a & b)
    }

    /// Per-bit OR over operands extended to the wider width.
    pub fn or(&self, rhs: &Self) -> Self {
        self.bitwise(rhs, |a, b| a | b)
    }

    /// Per-bit XOR over operands extended to the wider width.
    pub fn xor(&self, rhs: &Self) -> Self {
        self.bitwise(rhs, |a, b| a ^ b)
    }

    /// Per-bit XNOR over operands extended to the wider width.
    pub fn xnor(&self, rhs: &Self) -> Self {
        self.bitwise(rhs, |a, b| !(a ^ b))
    }

    fn bitwise(&self, rhs: &Self, op: impl Fn(Logic, Logic) -> Logic) -> Self {
        let width = self.width.max(rhs.width);
        let a = self.set_width(width);
        let b = rhs.set_width(width);
        let mut n = Self::zero(width);
        for i in 0..width {
            n.set(i, op(a.get(i), b.get(i)));
        }
        n
    }

    /// Per-bit complement.
    pub fn not(&self) -> Self {
        let mut n = Self::zero(self.width);
        for i in 0..self.width {
            n.set(i, !self.get(i));
        }
        n
    }

    /// Addition modulo 2^width over valuable operands; the result width is
    /// the wider operand's.
    pub fn add(&self, rhs: &Self) -> Option<Self> {
        self.arith(rhs, |a, b| Some(a.wrapping_add(b)))
    }

    /// Subtraction modulo 2^width over valuable operands.
    pub fn sub(&self, rhs: &Self) -> Option<Self> {
        self.arith(rhs, |a, b| Some(a.wrapping_sub(b)))
    }

    /// Multiplication modulo 2^width over valuable operands.
    pub fn mul(&self, rhs: &Self) -> Option<Self> {
        self.arith(rhs, |a, b| Some(a.wrapping_mul(b)))
    }

    /// Division over valuable operands. Division by zero yields all-X.
    pub fn div(&self, rhs: &Self) -> Option<Self> {
        self.arith(rhs, |a, b| a.checked_div(b))
    }

    /// Remainder over valuable operands. A zero divisor yields all-X.
    pub fn rem(&self, rhs: &Self) -> Option<Self> {
        self.arith(rhs, |a, b| a.checked_rem(b))
    }

    /// Exponentiation modulo 2^width over valuable operands.
    pub fn pow(&self, rhs: &Self) -> Option<Self> {
        self.arith(rhs, |a, b| Some(a.wrapping_pow(b.min(u32::MAX as u64) as u32)))
    }

    /// Arithmetic negation (two's complement) of a valuable value.
    pub fn neg(&self) -> Option<Self> {
        Self::zero(self.width).sub(self)
    }

    fn arith(&self, rhs: &Self, op: impl Fn(u64, u64) -> Option<u64>) -> Option<Self> {
        let width = self.width.max(rhs.width);
        let a = self.to_u64()?;
        let b = rhs.to_u64()?;
        let result = match op(a, b) {
            Some(r) => r,
            // Undefined result over defined operands (division by zero).
            None => return Some(Self::filled(width, Logic::X)),
        };
        // Operand extraction bounds both widths at 64, so `width` fits.
        let mut n = Self::from_u64(result, width);
        n.signed = self.signed && rhs.signed;
        Some(n)
    }

    /// `<` over valuable operands; 1-bit result. Signed comparison when
    /// both operands are signed.
    pub fn lt(&self, rhs: &Self) -> Option<Self> {
        self.compare(rhs, |o| o == std::cmp::Ordering::Less)
    }

    /// `<=` over valuable operands; 1-bit result.
    pub fn le(&self, rhs: &Self) -> Option<Self> {
        self.compare(rhs, |o| o != std::cmp::Ordering::Greater)
    }

    /// `>` over valuable operands; 1-bit result.
    pub fn gt(&self, rhs: &Self) -> Option<Self> {
        self.compare(rhs, |o| o == std::cmp::Ordering::Greater)
    }

    /// `>=` over valuable operands; 1-bit result.
    pub fn ge(&self, rhs: &Self) -> Option<Self> {
        self.compare(rhs, |o| o != std::cmp::Ordering::Less)
    }

    /// Logical `==` over valuable operands; 1-bit result.
    pub fn log_eq(&self, rhs: &Self) -> Option<Self> {
        self.compare(rhs, |o| o == std::cmp::Ordering::Equal)
    }

    /// Logical `!=` over valuable operands; 1-bit result.
    pub fn log_ne(&self, rhs: &Self) -> Option<Self> {
        self.compare(rhs, |o| o != std::cmp::Ordering::Equal)
    }

    fn compare(&self, rhs: &Self, pick: impl Fn(std::cmp::Ordering) -> bool) -> Option<Self> {
        let ordering = if self.signed && rhs.signed {
            self.to_i64()?.cmp(&rhs.to_i64()?)
        } else {
            self.to_u64()?.cmp(&rhs.to_u64()?)
        };
        Some(Self::from_bool(pick(ordering)))
    }

    /// Case equality (`===`): literal bit-pattern comparison including X
    /// and Z, over operands extended to the wider width. Always definite.
    pub fn case_eq(&self, rhs: &Self) -> Self {
        let width = self.width.max(rhs.width);
        let a = self.set_width(width);
        let b = rhs.set_width(width);
        let equal = (0..width).all(|i| a.get(i).matches_exact(b.get(i)));
        Self::from_bool(equal)
    }

    /// Case inequality (`!==`). Always definite.
    pub fn case_ne(&self, rhs: &Self) -> Self {
        Self::from_bool(self.case_eq(rhs).to_bool() == Some(false))
    }

    /// Reduction AND: 0 if any bit is 0, 1 if all bits are 1, else X.
    pub fn red_and(&self) -> Self {
        Self::from_logic(self.bits().fold(Logic::One, |acc, b| acc & b))
    }

    /// Reduction OR: 1 if any bit is 1, 0 if all bits are 0, else X.
    pub fn red_or(&self) -> Self {
        Self::from_logic(self.bits().fold(Logic::Zero, |acc, b| acc | b))
    }

    /// Reduction XOR: parity when all bits are definite, else X.
    pub fn red_xor(&self) -> Self {
        Self::from_logic(self.bits().fold(Logic::Zero, |acc, b| acc ^ b))
    }

    /// Reduction NAND.
    pub fn red_nand(&self) -> Self {
        self.red_and().not()
    }

    /// Reduction NOR.
    pub fn red_nor(&self) -> Self {
        self.red_or().not()
    }

    /// Reduction XNOR.
    pub fn red_xnor(&self) -> Self {
        self.red_xor().not()
    }

    /// Shifts left by a constant amount, growing the width by the amount.
    pub fn shl(&self, amount: u32) -> Self {
        let mut n = Self::zero(self.width + amount);
        for i in 0..self.width {
            n.set(i + amount, self.get(i));
        }
        n
    }

    /// Shifts right by a constant amount, dropping the low bits and
    /// shrinking the width, never below one bit.
    pub fn shr(&self, amount: u32) -> Self {
        let new_width = self.width.saturating_sub(amount).max(1);
        let mut n = Self::zero(new_width);
        for i in 0..new_width {
            let src = i + amount;
            if src < self.width {
                n.set(i, self.get(src));
            }
        }
        n
    }

    /// Iterates the bits, LSB first.
    pub fn bits(&self) -> impl Iterator<Item = Logic> + '_ {
        (0..self.width).map(|i| self.get(i))
    }
}

fn parse_digits(digits: &str, base: u32) -> Result<Number, NumberError> {
    if digits.is_empty() {
        return Err(NumberError::Empty);
    }
    match base {
        2 => Number::from_binary_str(digits)
            .ok_or_else(|| bad_digit(digits, 2)),
        8 | 16 => {
            let bits_per_digit = if base == 8 { 3 } else { 4 };
            let mut n = Number::zero(digits.len() as u32 * bits_per_digit);
            for (pos, c) in digits.chars().rev().enumerate() {
                let lo = pos as u32 * bits_per_digit;
                match c {
                    'x' | 'X' => fill_digit(&mut n, lo, bits_per_digit, Logic::X),
                    'z' | 'Z' | '?' => fill_digit(&mut n, lo, bits_per_digit, Logic::Z),
                    _ => {
                        let digit = c
                            .to_digit(base)
                            .ok_or(NumberError::InvalidDigit(c, base))?;
                        for bit in 0..bits_per_digit {
                            if digit & (1 << bit) != 0 {
                                n.set(lo + bit, Logic::One);
                            }
                        }
                    }
                }
            }
            Ok(n)
        }
        10 => {
            // A lone x or z digit fills the whole (32-bit) value.
            if digits.eq_ignore_ascii_case("x") {
                return Ok(Number::filled(32, Logic::X));
            }
            if digits.eq_ignore_ascii_case("z") || digits == "?" {
                return Ok(Number::filled(32, Logic::Z));
            }
            let mut acc: u64 = 0;
            for c in digits.chars() {
                let d = c.to_digit(10).ok_or(NumberError::InvalidDigit(c, 10))? as u64;
                acc = acc.wrapping_mul(10).wrapping_add(d);
            }
            let width = (64 - acc.leading_zeros()).max(1);
            Ok(Number::from_u64(acc, width))
        }
        _ => unreachable!("unsupported base {base}"),
    }
}

fn bad_digit(digits: &str, base: u32) -> NumberError {
    let c = digits
        .chars()
        .find(|&c| Logic::from_char(c).is_none())
        .unwrap_or('?');
    NumberError::InvalidDigit(c, base)
}

fn fill_digit(n: &mut Number, lo: u32, count: u32, bit: Logic) {
    for i in 0..count {
        n.set(lo + i, bit);
    }
}

/// Renders as a sized binary literal, e.g. `4'b10xz` or `8'sb00001111`.
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}b", self.width, if self.signed { "s" } else { "" })?;
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u64_and_get_value() {
        let n = Number::from_u64(0b1010, 4);
        assert_eq!(n.get_value(), Some(10));
        assert_eq!(n.width(), 4);
        assert!(n.is_valuable());
    }

    #[test]
    fn get_value_limited_to_native_width() {
        let wide = Number::from_u64(1, 33);
        assert!(wide.is_valuable());
        assert_eq!(wide.get_value(), None);
        assert_eq!(Number::from_u64(7, 32).get_value(), Some(7));
    }

    #[test]
    fn unknown_bits_not_valuable() {
        let n = Number::from_binary_str("10x1").unwrap();
        assert!(!n.is_valuable());
        assert_eq!(n.get_value(), None);
        assert_eq!(n.get(1), Logic::X);
    }

    #[test]
    fn parse_sized_binary() {
        let n = Number::parse("4'b1010").unwrap();
        assert_eq!(n.width(), 4);
        assert_eq!(n.get_value(), Some(10));
    }

    #[test]
    fn parse_four_state_roundtrip() {
        let n = Number::parse("4'b10xz").unwrap();
        assert_eq!(format!("{n}"), "4'b10xz");
        assert_eq!(n.get(0), Logic::Z);
        assert_eq!(n.get(1), Logic::X);
        assert_eq!(n.get(3), Logic::One);
    }

    #[test]
    fn parse_hex_and_octal() {
        assert_eq!(Number::parse("8'hff").unwrap().get_value(), Some(255));
        assert_eq!(Number::parse("8'hA5").unwrap().get_value(), Some(0xA5));
        assert_eq!(Number::parse("6'o17").unwrap().get_value(), Some(0o17));
    }

    #[test]
    fn parse_hex_with_xz_digits() {
        let n = Number::parse("8'h1x").unwrap();
        assert!(!n.is_valuable());
        assert_eq!(format!("{n}"), "8'b0001xxxx");
    }

    #[test]
    fn parse_bare_decimal_is_32_bit_signed() {
        let n = Number::parse("42").unwrap();
        assert_eq!(n.width(), 32);
        assert!(n.is_signed());
        assert_eq!(n.get_value(), Some(42));
    }

    #[test]
    fn parse_underscore_separators() {
        assert_eq!(Number::parse("16'd1_000").unwrap().get_value(), Some(1000));
        assert_eq!(
            Number::parse("8'b1010_0101").unwrap().get_value(),
            Some(0xA5)
        );
    }

    #[test]
    fn parse_signed_literal() {
        let n = Number::parse("8'sd255").unwrap();
        assert!(n.is_signed());
        assert_eq!(n.width(), 8);
        assert_eq!(n.get_value(), Some(255));
    }

    #[test]
    fn parse_decimal_x_fills() {
        let n = Number::parse("8'dx").unwrap();
        assert_eq!(n.width(), 8);
        assert!(n.bits().all(|b| b == Logic::X));
    }

    #[test]
    fn parse_xz_extension_in_sized_literal() {
        // 8'bx widens the leading x over the whole value.
        let n = Number::parse("8'bx").unwrap();
        assert!(n.bits().all(|b| b == Logic::X));
        // A definite leading digit extends with zeros.
        let n = Number::parse("8'b1").unwrap();
        assert_eq!(n.get_value(), Some(1));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Number::parse(""), Err(NumberError::Empty));
        assert_eq!(Number::parse("4'"), Err(NumberError::Empty));
        assert_eq!(Number::parse("0'b1"), Err(NumberError::ZeroWidth));
        assert!(matches!(
            Number::parse("4'q1010"),
            Err(NumberError::InvalidBase('q'))
        ));
        assert!(matches!(
            Number::parse("4'b102"),
            Err(NumberError::InvalidDigit('2', 2))
        ));
        assert!(matches!(
            Number::parse("8'd1x"),
            Err(NumberError::InvalidDigit(_, 10))
        ));
    }

    #[test]
    fn add_mod_two_pow_width() {
        let a = Number::from_u64(200, 8);
        let b = Number::from_u64(100, 8);
        assert_eq!(a.add(&b).unwrap().get_value(), Some((200 + 100) % 256));
    }

    #[test]
    fn arith_on_unknown_is_none() {
        let a = Number::from_binary_str("1x00").unwrap();
        let b = Number::from_u64(1, 4);
        assert!(a.add(&b).is_none());
        assert!(b.sub(&a).is_none());
        assert!(a.lt(&b).is_none());
        assert!(a.log_eq(&b).is_none());
    }

    #[test]
    fn arith_width_is_max_of_operands() {
        let a = Number::from_u64(1, 4);
        let b = Number::from_u64(1, 8);
        assert_eq!(a.add(&b).unwrap().width(), 8);
    }

    #[test]
    fn division_by_zero_is_all_x() {
        let a = Number::from_u64(10, 8);
        let z = Number::zero(8);
        let q = a.div(&z).unwrap();
        assert!(q.bits().all(|b| b == Logic::X));
        let r = a.rem(&z).unwrap();
        assert!(!r.is_valuable());
    }

    #[test]
    fn bitwise_x_propagation() {
        let a = Number::from_binary_str("01xx").unwrap();
        let b = Number::from_binary_str("0101").unwrap();
        // 0&0=0, 1&1=1 (bit2: x&1=x, bit3: x&0=0)
        assert_eq!(format!("{}", a.and(&b)), "4'b0x01");
        assert_eq!(format!("{}", a.or(&b)), "4'b01x1");
        assert_eq!(format!("{}", a.not()), "4'b10xx");
    }

    #[test]
    fn case_equality_is_literal_and_definite() {
        let a = Number::from_binary_str("10xz").unwrap();
        let b = Number::from_binary_str("10xz").unwrap();
        let c = Number::from_binary_str("10xx").unwrap();
        assert_eq!(a.case_eq(&b).get_value(), Some(1));
        assert_eq!(a.case_eq(&c).get_value(), Some(0));
        assert_eq!(a.case_ne(&c).get_value(), Some(1));
    }

    #[test]
    fn relational_ops() {
        let a = Number::from_u64(3, 4);
        let b = Number::from_u64(5, 4);
        assert_eq!(a.lt(&b).unwrap().get_value(), Some(1));
        assert_eq!(a.ge(&b).unwrap().get_value(), Some(0));
        assert_eq!(a.log_eq(&a).unwrap().get_value(), Some(1));
        assert_eq!(a.log_ne(&b).unwrap().get_value(), Some(1));
    }

    #[test]
    fn signed_comparison() {
        let minus_one = Number::from_u64(0xFF, 8).with_signed(true);
        let one = Number::from_u64(1, 8).with_signed(true);
        assert_eq!(minus_one.lt(&one).unwrap().get_value(), Some(1));
        // Unsigned view of the same bits orders the other way.
        let unsigned = minus_one.with_signed(false);
        assert_eq!(unsigned.gt(&one).unwrap().get_value(), Some(1));
    }

    #[test]
    fn reductions() {
        let ones = Number::from_binary_str("1111").unwrap();
        let mixed = Number::from_binary_str("1011").unwrap();
        let with_x = Number::from_binary_str("1x11").unwrap();
        let zero_x = Number::from_binary_str("0x11").unwrap();
        assert_eq!(ones.red_and().get_value(), Some(1));
        assert_eq!(mixed.red_and().get_value(), Some(0));
        // A dominant 0 decides the AND even with X present.
        assert_eq!(zero_x.red_and().get_value(), Some(0));
        assert!(!with_x.red_and().is_valuable());
        // A dominant 1 decides the OR even with X present.
        assert_eq!(with_x.red_or().get_value(), Some(1));
        assert_eq!(mixed.red_xor().get_value(), Some(1));
        assert!(!with_x.red_xor().is_valuable());
        assert_eq!(ones.red_nand().get_value(), Some(0));
    }

    #[test]
    fn shifts_change_width() {
        let n = Number::from_u64(0b101, 3);
        let shifted = n.shl(2);
        assert_eq!(shifted.width(), 5);
        assert_eq!(shifted.get_value(), Some(0b10100));
        let back = shifted.shr(2);
        assert_eq!(back.width(), 3);
        assert_eq!(back.get_value(), Some(0b101));
        // Shrinking never goes below one bit.
        assert_eq!(n.shr(10).width(), 1);
        assert_eq!(n.shr(10).get_value(), Some(0));
    }

    #[test]
    fn shift_preserves_unknown_bits() {
        let n = Number::from_binary_str("x1").unwrap();
        assert_eq!(format!("{}", n.shl(1)), "3'bx10");
    }

    #[test]
    fn truncate_extracts_range() {
        let n = Number::from_u64(0b110100, 6);
        assert_eq!(n.truncate(4, 2).get_value(), Some(0b101));
        assert_eq!(n.truncate(0, 0).get_value(), Some(0));
        assert_eq!(n.truncate(5, 5).get_value(), Some(1));
    }

    #[test]
    fn truncate_out_of_range_reads_x() {
        let n = Number::from_u64(1, 2);
        let t = n.truncate(3, 0);
        assert_eq!(t.get(0), Logic::One);
        assert_eq!(t.get(2), Logic::X);
        assert_eq!(t.get(3), Logic::X);
    }

    #[test]
    fn concatenate_appends_low_bits() {
        let hi = Number::from_u64(0b10, 2);
        let lo = Number::from_u64(0b01, 2);
        let cat = hi.concatenate(&lo);
        assert_eq!(cat.width(), 4);
        assert_eq!(cat.get_value(), Some(0b1001));
        assert!(!cat.is_signed());
    }

    #[test]
    fn set_width_grow_and_shrink() {
        let n = Number::from_u64(0b1011, 4);
        assert_eq!(n.set_width(8).get_value(), Some(0b1011));
        assert_eq!(n.set_width(2).get_value(), Some(0b11));
        // Signed grow replicates the top bit.
        let s = Number::from_u64(0b1011, 4).with_signed(true);
        assert_eq!(s.set_width(6).get_value(), Some(0b111011));
        // Shrink clears the signed flag.
        assert!(!s.set_width(2).is_signed());
    }

    #[test]
    fn set_width_is_idempotent() {
        let n = Number::from_binary_str("10xz01").unwrap();
        let once = n.set_width(4);
        let twice = once.set_width(4);
        assert_eq!(once, twice);
    }

    #[test]
    fn shrink_then_grow_is_lossy() {
        let n = Number::from_u64(0b1100, 4);
        let back = n.set_width(2).set_width(4);
        assert_eq!(back.get_value(), Some(0b00));
        assert_ne!(back, n);
    }

    #[test]
    fn wide_values_span_words() {
        let mut n = Number::zero(100);
        n.set(0, Logic::One);
        n.set(70, Logic::X);
        n.set(99, Logic::Z);
        assert_eq!(n.get(0), Logic::One);
        assert_eq!(n.get(70), Logic::X);
        assert_eq!(n.get(99), Logic::Z);
        assert_eq!(n.get(50), Logic::Zero);
        assert!(!n.is_valuable());
    }

    #[test]
    fn neg_is_twos_complement() {
        let n = Number::from_u64(1, 4);
        assert_eq!(n.neg().unwrap().get_value(), Some(0b1111));
    }

    #[test]
    fn serde_roundtrip() {
        let n = Number::parse("12'hx5z").unwrap();
        let json = serde_json::to_string(&n).unwrap();
        let back: Number = serde_json::from_str(&json).unwrap();
        assert_eq!(n, back);
    }
}
