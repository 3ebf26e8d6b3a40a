//! Exact decimal values
//!
//! A decimal is the rational `numerator / 10^scale`. It is parsed from the
//! driver's text form and never passes through floating point.

use std::fmt;
use std::str::FromStr;

use super::errors::{CodecError, CodecResult};

/// Largest scale whose denominator fits in an i128
const MAX_SCALE: u32 = 38;

/// Exact rational with a power-of-ten denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    numerator: i128,
    scale: u32,
}

impl Decimal {
    /// Creates a decimal from an unscaled value and a scale
    pub fn new(numerator: i128, scale: u32) -> CodecResult<Self> {
        if scale > MAX_SCALE {
            return Err(CodecError::invalid_value(format!(
                "decimal scale {} exceeds {}",
                scale, MAX_SCALE
            )));
        }
        Ok(Self { numerator, scale })
    }

    /// Parses `[+-]digits[.digits]`
    pub fn parse(text: &str) -> CodecResult<Self> {
        let invalid = || CodecError::invalid_value(format!("bad decimal '{}'", text));

        let trimmed = text.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let scale = u32::try_from(frac_part.len()).map_err(|_| invalid())?;
        let mut numerator: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            numerator = numerator
                .checked_mul(10)
                .and_then(|n| n.checked_add(i128::from(b - b'0')))
                .ok_or_else(|| {
                    CodecError::invalid_value(format!("decimal '{}' out of range", text))
                })?;
        }
        if negative {
            numerator = -numerator;
        }
        Self::new(numerator, scale)
    }

    pub fn numerator(&self) -> i128 {
        self.numerator
    }

    /// `10^scale`
    pub fn denominator(&self) -> i128 {
        10i128.pow(self.scale)
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Number of significant digits in the unscaled value
    pub fn digits(&self) -> u32 {
        match self.numerator.unsigned_abs() {
            0 => 1,
            n => n.ilog10() + 1,
        }
    }

    /// Same value at `scale`; fails if digits would be dropped
    pub fn rescale(&self, scale: u32) -> CodecResult<Self> {
        if scale >= self.scale {
            let factor = 10i128
                .checked_pow(scale - self.scale)
                .filter(|_| scale <= MAX_SCALE)
                .ok_or_else(|| CodecError::invalid_value(format!("decimal scale {} too large", scale)))?;
            let numerator = self.numerator.checked_mul(factor).ok_or_else(|| {
                CodecError::invalid_value(format!("decimal {} out of range at scale {}", self, scale))
            })?;
            return Self::new(numerator, scale);
        }
        let divisor = 10i128.pow(self.scale - scale);
        if self.numerator % divisor != 0 {
            return Err(CodecError::invalid_value(format!(
                "decimal {} does not fit scale {}",
                self, scale
            )));
        }
        Self::new(self.numerator / divisor, scale)
    }

    /// Rescales to `scale` and checks the result holds at most `precision`
    /// digits. A zero precision is unchecked.
    pub fn fit(&self, precision: u32, scale: u32) -> CodecResult<Self> {
        let fitted = self.rescale(scale)?;
        if precision > 0 && fitted.digits() > precision {
            return Err(CodecError::invalid_value(format!(
                "decimal {} exceeds precision {}",
                fitted, precision
            )));
        }
        Ok(fitted)
    }
}

impl FromStr for Decimal {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::parse(s)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.numerator.unsigned_abs().to_string();
        let sign = if self.numerator < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
        } else {
            digits
        };
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact() {
        let d = Decimal::parse("12.50").unwrap();
        assert_eq!(d.numerator(), 1250);
        assert_eq!(d.denominator(), 100);
        assert_eq!(d.to_string(), "12.50");
    }

    #[test]
    fn test_parse_signs_and_fractions() {
        assert_eq!(Decimal::parse("-0.05").unwrap().to_string(), "-0.05");
        assert_eq!(Decimal::parse("+7").unwrap().to_string(), "7");
        assert_eq!(Decimal::parse(".5").unwrap().to_string(), "0.5");
        assert_eq!(Decimal::parse("3.").unwrap().to_string(), "3");
    }

    #[test]
    fn test_no_float_rounding() {
        let d: Decimal = "0.1000000000000000055511151231257827".parse().unwrap();
        assert_eq!(d.to_string(), "0.1000000000000000055511151231257827");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Decimal::parse("").is_err());
        assert!(Decimal::parse("-").is_err());
        assert!(Decimal::parse("1e5").is_err());
        assert!(Decimal::parse("1.2.3").is_err());
        assert!(Decimal::parse("123456789012345678901234567890123456789012").is_err());
    }

    #[test]
    fn test_rescale_to_declared_scale() {
        let d = Decimal::parse("12.5").unwrap();
        assert_eq!(d.rescale(2).unwrap().to_string(), "12.50");
        assert_eq!(d.rescale(2).unwrap().numerator(), 1250);
        assert_eq!(Decimal::parse("3.100").unwrap().rescale(1).unwrap().to_string(), "3.1");
        assert_eq!(Decimal::parse("3.14").unwrap().rescale(1).unwrap_err().code(), "INVALID_VALUE");
    }

    #[test]
    fn test_fit_checks_precision() {
        let d = Decimal::parse("1234.5").unwrap();
        assert_eq!(d.fit(6, 2).unwrap().to_string(), "1234.50");
        assert!(d.fit(5, 2).is_err());
        assert_eq!(Decimal::parse("0").unwrap().digits(), 1);
        assert_eq!(Decimal::parse("-0.05").unwrap().digits(), 1);
    }
}
