use std::fmt;

use super::BoundError;

/// A closed interval `[lower, upper]` of SI magnitudes known only at runtime.
///
/// Either end may be infinite. Used for design-variable bounds and for the
/// declared physical domain of block outputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lower: f64,
    upper: f64,
}

impl Interval {
    /// The interval covering every finite value.
    pub const UNBOUNDED: Self = Self {
        lower: f64::NEG_INFINITY,
        upper: f64::INFINITY,
    };

    /// `[0, +∞)`, the domain of masses, lengths and other magnitudes.
    pub const NON_NEGATIVE: Self = Self {
        lower: 0.0,
        upper: f64::INFINITY,
    };

    /// Creates the interval `[lower, upper]`.
    ///
    /// # Errors
    ///
    /// Returns [`BoundError::NotANumber`] if either limit is `NaN`, or
    /// [`BoundError::Inverted`] if `lower > upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, BoundError> {
        if lower.is_nan() || upper.is_nan() {
            return Err(BoundError::NotANumber);
        }
        if lower > upper {
            return Err(BoundError::Inverted);
        }
        Ok(Self { lower, upper })
    }

    /// Creates `[lower, upper]` from limits known to be ordered and not `NaN`.
    pub(crate) const fn new_unchecked(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Creates the interval `[lower, +∞)`.
    ///
    /// # Errors
    ///
    /// Returns an error if `lower` is `NaN`.
    pub fn at_least(lower: f64) -> Result<Self, BoundError> {
        Self::new(lower, f64::INFINITY)
    }

    /// Creates the interval `(-∞, upper]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `upper` is `NaN`.
    pub fn at_most(upper: f64) -> Result<Self, BoundError> {
        Self::new(f64::NEG_INFINITY, upper)
    }

    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if `value` lies inside the interval. `NaN` never does.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Clamps `value` onto the interval.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// Checks `value` against the interval.
    ///
    /// # Errors
    ///
    /// Returns which side was violated, or [`BoundError::NotANumber`].
    pub fn check(&self, value: f64) -> Result<(), BoundError> {
        if value.is_nan() {
            Err(BoundError::NotANumber)
        } else if value < self.lower {
            Err(BoundError::BelowMinimum)
        } else if value > self.upper {
            Err(BoundError::AboveMaximum)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_limits() {
        assert_eq!(Interval::new(2.0, 1.0), Err(BoundError::Inverted));
        assert_eq!(Interval::new(f64::NAN, 1.0), Err(BoundError::NotANumber));
        assert!(Interval::new(1.0, 1.0).is_ok());
    }

    #[test]
    fn clamps_and_checks() {
        let unit = Interval::new(0.0, 1.0).unwrap();

        assert_eq!(unit.clamp(1.5), 1.0);
        assert_eq!(unit.clamp(-3.0), 0.0);
        assert_eq!(unit.clamp(0.25), 0.25);

        assert!(unit.contains(1.0));
        assert!(!unit.contains(f64::NAN));
        assert_eq!(unit.check(1.5), Err(BoundError::AboveMaximum));
        assert_eq!(unit.check(-0.5), Err(BoundError::BelowMinimum));
    }

    #[test]
    fn half_open_helpers() {
        let positive = Interval::at_least(0.0).unwrap();
        assert!(positive.contains(1e300));
        assert!(!positive.contains(-1e-12));

        let capped = Interval::at_most(10.0).unwrap();
        assert!(capped.contains(-1e300));
        assert_eq!(capped.to_string(), "[-inf, 10]");
    }
}
