//! Cart quantities and the decoding of their stored string form.
//!
//! Stored values are decimal strings. Decoding is lenient in the way
//! browser `parseInt` is: leading whitespace and trailing garbage are
//! tolerated, so `" 12abc"` reads as 12.

use std::fmt;

/// Value written in place of any malformed count when it is degraded.
pub const DEGRADED_VALUE: &str = "NaN";

/// The number of units of one cart line item.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(u64);

impl Quantity {
    /// Zero units. Only ever produced by decoding, never written.
    pub const ZERO: Self = Self(0);
    /// The count a fresh entry starts at.
    pub const ONE: Self = Self(1);
    /// The largest representable count.
    pub const MAX: Self = Self(u64::MAX);

    /// Creates a quantity from a raw count.
    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    /// Returns the raw count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the next count, or `None` at [`Quantity::MAX`].
    #[must_use]
    pub const fn checked_next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Quantity {
    fn from(count: u64) -> Self {
        Self(count)
    }
}

/// Outcome of decoding a stored value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParsedQuantity {
    /// No entry, or an empty string.
    Absent,
    /// A usable count.
    Count(Quantity),
    /// Something is stored but it is not a non-negative integer.
    Malformed,
}

/// Decodes a raw stored value.
///
/// Leading whitespace is skipped and an optional sign accepted. The
/// longest run of ASCII digits that follows is the value; anything after
/// it is ignored. No digits, a negative count, or a count that overflows
/// `u64` is [`ParsedQuantity::Malformed`].
#[must_use]
pub fn parse_quantity(raw: Option<&str>) -> ParsedQuantity {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return ParsedQuantity::Absent;
    };

    let rest = raw.trim_start();
    let (negative, rest) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return ParsedQuantity::Malformed;
    }

    match rest[..digits_len].parse::<u64>() {
        Ok(0) => ParsedQuantity::Count(Quantity::ZERO),
        Ok(_) if negative => ParsedQuantity::Malformed,
        Ok(n) => ParsedQuantity::Count(Quantity(n)),
        Err(_) => ParsedQuantity::Malformed,
    }
}
