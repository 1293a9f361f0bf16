use std::cmp::Ordering;

use uom::si::{f64::Ratio, ratio::ratio};

use super::{Bound, BoundError, Bounded};

/// Supplies 0 and 1 for types used with unit-interval bounds.
pub trait UnitBounds: PartialOrd {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for Ratio {
    fn zero() -> Self {
        Ratio::new::<ratio>(0.0)
    }
    fn one() -> Self {
        Ratio::new::<ratio>(1.0)
    }
}

/// Marker type enforcing that a value lies in the left-open unit interval: `0 < x ≤ 1`.
///
/// Relaxation factors live here: zero would freeze an iteration and
/// anything above one over-relaxes it.
///
/// # Examples
///
/// ```
/// use twine_mda::support::bound::UnitIntervalLowerOpen;
///
/// let alpha = UnitIntervalLowerOpen::new(0.7).unwrap();
/// assert_eq!(alpha.into_inner(), 0.7);
///
/// assert_eq!(UnitIntervalLowerOpen::one::<f64>().into_inner(), 1.0);
///
/// assert!(UnitIntervalLowerOpen::new(0.0).is_err());
/// assert!(UnitIntervalLowerOpen::new(1.2).is_err());
/// assert!(UnitIntervalLowerOpen::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitIntervalLowerOpen;

impl UnitIntervalLowerOpen {
    /// Constructs a [`Bounded<T, UnitIntervalLowerOpen>`] if `0 < value ≤ 1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside `(0, 1]` or not a number.
    pub fn new<T: UnitBounds>(value: T) -> Result<Bounded<T, UnitIntervalLowerOpen>, BoundError> {
        Bounded::new(value)
    }

    /// Returns the upper endpoint, which is always in bounds.
    #[must_use]
    pub fn one<T: UnitBounds>() -> Bounded<T, UnitIntervalLowerOpen> {
        Bounded::new_unchecked(T::one())
    }
}

impl<T: UnitBounds> Bound<T> for UnitIntervalLowerOpen {
    fn check(value: &T) -> Result<(), BoundError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(BoundError::NotANumber),
            (Some(Ordering::Less | Ordering::Equal), _) => Err(BoundError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(BoundError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_interior_and_upper_endpoint() {
        assert!(UnitIntervalLowerOpen::new(1e-12).is_ok());
        assert!(UnitIntervalLowerOpen::new(0.5).is_ok());
        assert!(UnitIntervalLowerOpen::new(1.0).is_ok());
    }

    #[test]
    fn rejects_outside() {
        assert_eq!(UnitIntervalLowerOpen::new(0.0), Err(BoundError::BelowMinimum));
        assert_eq!(UnitIntervalLowerOpen::new(-0.1), Err(BoundError::BelowMinimum));
        assert_eq!(UnitIntervalLowerOpen::new(1.0001), Err(BoundError::AboveMaximum));
    }

    #[test]
    fn ratio_values() {
        let r = UnitIntervalLowerOpen::new(Ratio::new::<ratio>(0.25)).unwrap();
        assert_eq!(r.as_ref().get::<ratio>(), 0.25);
    }
}
