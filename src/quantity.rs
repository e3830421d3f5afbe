//! Kubernetes resource quantities.
//!
//! Parses strings such as `10Gi`, `500M`, `1.5Ti` or `12e6` into an exact
//! magnitude so sizes compare by value instead of by string order.
//!
//! Magnitudes are stored as a count of nano-units in an `i128`. Fractions
//! smaller than one nano-unit round up, matching the API server.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Nano-units per unit.
const NANOS_PER_UNIT_EXP: i64 = 9;

/// Largest power of ten representable in an `i128`.
/// Quantities beyond this bound (e.g. `1e99`) are `OutOfRange` rather than
/// parsed with arbitrary precision; no storage size comes close.
const MAX_POW10: u32 = 38;

/// Errors that can occur when parsing a quantity
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity is empty")]
    Empty,

    #[error("'{0}' is not a valid quantity (expected <number><suffix>, e.g. 10Gi, 500M, 1e9)")]
    Malformed(String),

    #[error("quantity '{0}' is out of range")]
    OutOfRange(String),
}

/// Pattern: sign, number, then one of exponent / binary SI / decimal SI suffix.
static QUANTITY_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)([0-9]+)(?:\.([0-9]*))?([eE][+-]?[0-9]+|[KMGTPE]i|[numkMGTPE])?$")
        .ok()
});

/// Same as above for numbers written as `.5`.
static FRACTION_ONLY_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)()\.([0-9]+)([eE][+-]?[0-9]+|[KMGTPE]i|[numkMGTPE])?$").ok()
});

/// Scale implied by a quantity suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    /// Multiply by 2^n.
    Binary(u32),
    /// Multiply by 10^n.
    Decimal(i64),
}

impl Scale {
    fn from_suffix(suffix: &str) -> Option<Self> {
        let scale = match suffix {
            "" => Scale::Decimal(0),
            "Ki" => Scale::Binary(10),
            "Mi" => Scale::Binary(20),
            "Gi" => Scale::Binary(30),
            "Ti" => Scale::Binary(40),
            "Pi" => Scale::Binary(50),
            "Ei" => Scale::Binary(60),
            "n" => Scale::Decimal(-9),
            "u" => Scale::Decimal(-6),
            "m" => Scale::Decimal(-3),
            "k" => Scale::Decimal(3),
            "M" => Scale::Decimal(6),
            "G" => Scale::Decimal(9),
            "T" => Scale::Decimal(12),
            "P" => Scale::Decimal(15),
            "E" => Scale::Decimal(18),
            exp if exp.starts_with(['e', 'E']) => Scale::Decimal(exp.get(1..)?.parse().ok()?),
            _ => return None,
        };
        Some(scale)
    }
}

/// A parsed resource quantity.
///
/// Equality and ordering use the numeric magnitude, so `1Gi == 1024Mi`.
/// `Display` echoes the text the quantity was parsed from.
#[derive(Debug, Clone)]
pub struct Quantity {
    nanos: i128,
    text: String,
}

impl Quantity {
    /// Parse a quantity string.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        if input.is_empty() {
            return Err(QuantityError::Empty);
        }

        let malformed = || QuantityError::Malformed(input.to_string());
        let out_of_range = || QuantityError::OutOfRange(input.to_string());

        // No trimming: surrounding whitespace is malformed
        let caps = [&*QUANTITY_RE, &*FRACTION_ONLY_RE]
            .into_iter()
            .flatten()
            .find_map(|re| re.captures(input))
            .ok_or_else(malformed)?;

        let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
        let whole = caps.get(2).map_or("", |m| m.as_str());
        let fraction = caps.get(3).map_or("", |m| m.as_str());
        let suffix = caps.get(4).map_or("", |m| m.as_str());

        let scale = Scale::from_suffix(suffix).ok_or_else(out_of_range)?;

        // Mantissa as an integer with `fraction.len()` implied decimal places.
        let mut mantissa: i128 = 0;
        for digit in whole.bytes().chain(fraction.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add(i128::from(digit - b'0')))
                .ok_or_else(out_of_range)?;
        }

        let fraction_digits = i64::try_from(fraction.len()).map_err(|_| out_of_range())?;
        let (binary_exp, decimal_exp) = match scale {
            Scale::Binary(exp) => (exp, 0),
            Scale::Decimal(exp) => (0, exp),
        };

        let numerator = mantissa
            .checked_mul(2i128.checked_pow(binary_exp).ok_or_else(out_of_range)?)
            .ok_or_else(out_of_range)?;

        let pow10 = NANOS_PER_UNIT_EXP
            .checked_sub(fraction_digits)
            .and_then(|p| p.checked_add(decimal_exp))
            .ok_or_else(out_of_range)?;

        let magnitude = if pow10 >= 0 {
            let exp = u32::try_from(pow10).map_err(|_| out_of_range())?;
            if exp > MAX_POW10 && numerator != 0 {
                return Err(out_of_range());
            }
            numerator
                .checked_mul(10i128.checked_pow(exp.min(MAX_POW10)).ok_or_else(out_of_range)?)
                .ok_or_else(out_of_range)?
        } else {
            let exp = u32::try_from(-pow10).map_err(|_| out_of_range())?;
            match 10i128.checked_pow(exp) {
                Some(divisor) => ceil_div(numerator, divisor),
                // Anything non-zero is smaller than one nano-unit
                None => i128::from(numerator != 0),
            }
        };

        Ok(Self {
            nanos: if negative { -magnitude } else { magnitude },
            text: input.to_string(),
        })
    }

    /// Whole units, rounded up (bytes for storage sizes).
    pub fn value(&self) -> i128 {
        ceil_div(self.nanos.abs(), 1_000_000_000) * self.nanos.signum()
    }

    /// The text this quantity was parsed from.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

fn ceil_div(numerator: i128, divisor: i128) -> i128 {
    let quotient = numerator / divisor;
    if numerator % divisor == 0 {
        quotient
    } else {
        quotient + 1
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nanos.cmp(&other.nanos)
    }
}
