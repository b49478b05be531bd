//! Bounded mastery level
//!
//! Mastery is a newtype wrapper around an integer percentage that enforces
//! the [0, 100] range at construction. Every stored mastery value in the
//! system goes through this type, so out-of-range values can never reach a
//! store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bounded mastery level [0, 100]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Mastery(u8);

#[derive(Error, Debug)]
pub enum MasteryError {
    #[error("mastery out of bounds: {value} (must be {min} to {max})")]
    OutOfBounds { value: u8, min: u8, max: u8 },
}

impl Mastery {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    /// Create a new mastery level with bounds validation
    ///
    /// # Errors
    /// Returns `MasteryError::OutOfBounds` if value > 100.
    pub fn new(value: u8) -> Result<Self, MasteryError> {
        if value > Self::MAX {
            return Err(MasteryError::OutOfBounds {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Create a mastery level, saturating into range
    ///
    /// Used where the input is produced internally (policy defaults, boost
    /// arithmetic) rather than accepted from a caller.
    pub const fn clamped(value: u8) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Get the underlying value
    pub fn get(self) -> u8 {
        self.0
    }

    /// Raise by an increment, capped at 100
    pub fn boosted(self, increment: u8) -> Self {
        Self::clamped(self.0.saturating_add(increment))
    }

    /// Deficit against a target, floored at zero
    pub fn gap_to(self, target: Mastery) -> u8 {
        target.0.saturating_sub(self.0)
    }
}

impl TryFrom<u8> for Mastery {
    type Error = MasteryError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for Mastery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mastery_valid() {
        assert!(Mastery::new(0).is_ok());
        assert!(Mastery::new(50).is_ok());
        assert!(Mastery::new(100).is_ok());
    }

    #[test]
    fn test_mastery_rejects_out_of_bounds() {
        assert!(matches!(
            Mastery::new(101),
            Err(MasteryError::OutOfBounds { .. })
        ));
        assert!(Mastery::new(255).is_err());
    }

    #[test]
    fn test_clamped_saturates() {
        assert_eq!(Mastery::clamped(130).get(), 100);
        assert_eq!(Mastery::clamped(42).get(), 42);
    }

    #[test]
    fn test_boosted_caps_at_max() {
        let m = Mastery::new(95).unwrap();
        assert_eq!(m.boosted(10).get(), 100);

        let m = Mastery::new(40).unwrap();
        assert_eq!(m.boosted(10).get(), 50);
    }

    #[test]
    fn test_gap_to_floors_at_zero() {
        let current = Mastery::new(80).unwrap();
        let target = Mastery::new(70).unwrap();
        assert_eq!(current.gap_to(target), 0);
        assert_eq!(target.gap_to(current), 10);
    }

    #[test]
    fn test_default_is_zero() {
        assert_eq!(Mastery::default().get(), 0);
    }
}
