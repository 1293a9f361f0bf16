use std::cmp::Ordering;

use num_traits::Zero;

use super::{Bound, BoundError, Bounded};

/// Marker type enforcing that a value is strictly positive (greater than zero).
///
/// # Examples
///
/// ```
/// use twine_mda::support::bound::StrictlyPositive;
///
/// let passes = StrictlyPositive::new(50_usize).unwrap();
/// assert_eq!(passes.into_inner(), 50);
///
/// assert!(StrictlyPositive::new(0.0).is_err());
/// assert!(StrictlyPositive::new(-1.0).is_err());
/// assert!(StrictlyPositive::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs a [`Bounded<T, StrictlyPositive>`] if the value is strictly positive.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is zero, negative, or not a number (`NaN`).
    pub fn new<T: PartialOrd + Zero>(value: T) -> Result<Bounded<T, StrictlyPositive>, BoundError> {
        Bounded::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Bound<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), BoundError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(BoundError::Zero),
            Some(Ordering::Less) => Err(BoundError::Negative),
            None => Err(BoundError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Time, time::second};

    #[test]
    fn floats() {
        assert!(StrictlyPositive::new(1e-9).is_ok());
        assert_eq!(StrictlyPositive::new(0.0), Err(BoundError::Zero));
        assert_eq!(StrictlyPositive::new(-2.0), Err(BoundError::Negative));
        assert_eq!(StrictlyPositive::new(f64::NAN), Err(BoundError::NotANumber));
    }

    #[test]
    fn counts() {
        assert_eq!(StrictlyPositive::new(3_usize).map(Bounded::into_inner), Ok(3));
        assert_eq!(StrictlyPositive::new(0_usize), Err(BoundError::Zero));
    }

    #[test]
    fn uom_quantities() {
        let budget = StrictlyPositive::new(Time::new::<second>(2.0)).unwrap();
        assert_eq!(budget.as_ref().get::<second>(), 2.0);
        assert!(StrictlyPositive::new(Time::new::<second>(0.0)).is_err());
    }
}
