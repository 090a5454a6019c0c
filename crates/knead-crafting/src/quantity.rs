//! Craft multipliers.
//!
//! A craft runs a recipe `n` times, where `n` is a [`Multiplier`]. Callers can
//! hand in raw integers, floats or text; all of them are checked through
//! [`IntoMultiplier`] before any recipe or inventory is looked up.

use std::fmt;
use std::num::NonZeroU32;
use thiserror::Error;

/// Reasons a requested craft quantity is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    /// Quantity is zero or negative
    #[error("Quantity must be 1 or larger")]
    BelowOne,
    /// Quantity has a fractional part (or is not a finite number)
    #[error("Quantity must be an integer number")]
    NotInteger,
    /// Quantity does not fit the multiplier range
    #[error("Quantity must be at most {max}")]
    TooLarge {
        /// Largest accepted multiplier
        max: u32,
    },
    /// Text is not a number at all
    #[error("Quantity {0:?} is not a number")]
    Unparseable(String),
}

/// How many times a recipe is applied in one craft. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Multiplier(NonZeroU32);

impl Multiplier {
    /// A single application.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Largest multiplier.
    pub const MAX: Self = Self(NonZeroU32::MAX);

    /// Creates a multiplier, rejecting zero.
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        NonZeroU32::new(value).map(Self).ok_or(QuantityError::BelowOne)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Scales a per-craft quantity. Two `u32` factors always fit a `u64`.
    #[must_use]
    pub fn scale(self, per_craft: u32) -> u64 {
        u64::from(self.get()) * u64::from(per_craft)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Conversion of a caller-supplied quantity into a [`Multiplier`].
///
/// The "below one" check runs before the integer check, so `0.5` reports
/// [`QuantityError::BelowOne`] and `1.5` reports [`QuantityError::NotInteger`].
pub trait IntoMultiplier {
    /// Validates and converts.
    fn into_multiplier(self) -> Result<Multiplier, QuantityError>;
}

impl IntoMultiplier for Multiplier {
    fn into_multiplier(self) -> Result<Multiplier, QuantityError> {
        Ok(self)
    }
}

impl IntoMultiplier for u32 {
    fn into_multiplier(self) -> Result<Multiplier, QuantityError> {
        Multiplier::new(self)
    }
}

impl IntoMultiplier for i32 {
    fn into_multiplier(self) -> Result<Multiplier, QuantityError> {
        i64::from(self).into_multiplier()
    }
}

impl IntoMultiplier for i64 {
    fn into_multiplier(self) -> Result<Multiplier, QuantityError> {
        if self < 1 {
            return Err(QuantityError::BelowOne);
        }
        let value = u32::try_from(self).map_err(|_| QuantityError::TooLarge { max: u32::MAX })?;
        Multiplier::new(value)
    }
}

impl IntoMultiplier for f64 {
    fn into_multiplier(self) -> Result<Multiplier, QuantityError> {
        if self < 1.0 {
            return Err(QuantityError::BelowOne);
        }
        if !self.is_finite() || self.fract() != 0.0 {
            return Err(QuantityError::NotInteger);
        }
        if self > f64::from(u32::MAX) {
            return Err(QuantityError::TooLarge { max: u32::MAX });
        }
        Multiplier::new(self as u32)
    }
}

impl IntoMultiplier for &str {
    fn into_multiplier(self) -> Result<Multiplier, QuantityError> {
        let text = self.trim();
        if let Ok(whole) = text.parse::<i64>() {
            return whole.into_multiplier();
        }
        match text.parse::<f64>() {
            Ok(value) if !value.is_nan() => value.into_multiplier(),
            _ => Err(QuantityError::Unparseable(self.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(0u32.into_multiplier(), Err(QuantityError::BelowOne));
        assert_eq!((-1i64).into_multiplier(), Err(QuantityError::BelowOne));
        assert_eq!(0.0f64.into_multiplier(), Err(QuantityError::BelowOne));
    }

    #[test]
    fn test_below_one_checked_before_integer() {
        assert_eq!(0.5f64.into_multiplier(), Err(QuantityError::BelowOne));
        assert_eq!(1.5f64.into_multiplier(), Err(QuantityError::NotInteger));
    }

    #[test]
    fn test_whole_float_accepted() {
        assert_eq!(3.0f64.into_multiplier().map(Multiplier::get), Ok(3));
    }

    #[test]
    fn test_non_finite_float() {
        assert_eq!(f64::INFINITY.into_multiplier(), Err(QuantityError::NotInteger));
        assert_eq!(f64::NAN.into_multiplier(), Err(QuantityError::NotInteger));
    }

    #[test]
    fn test_too_large() {
        assert!(matches!(
            (i64::from(u32::MAX) + 1).into_multiplier(),
            Err(QuantityError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_from_text() {
        assert_eq!("20".into_multiplier().map(Multiplier::get), Ok(20));
        assert_eq!(" 2 ".into_multiplier().map(Multiplier::get), Ok(2));
        assert_eq!("1.5".into_multiplier(), Err(QuantityError::NotInteger));
        assert_eq!("-1".into_multiplier(), Err(QuantityError::BelowOne));
        assert_eq!(
            "lots".into_multiplier(),
            Err(QuantityError::Unparseable("lots".to_string()))
        );
    }

    #[test]
    fn test_scale() {
        let m = Multiplier::new(20).expect("valid");
        assert_eq!(m.scale(25), 500);
        assert_eq!(
            Multiplier::MAX.scale(u32::MAX),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }
}
