//! Numeric bounds enforced at construction time.
//!
//! Solver settings such as tolerances and relaxation factors only make sense
//! inside a range. Wrapping them in [`Bounded<T, B>`] checks that range once,
//! when the value is built, so the engine never re-validates them per run.
//!
//! # Provided bounds
//!
//! - [`StrictlyPositive`]: Greater than zero
//! - [`UnitIntervalLowerOpen`]: Lower-open unit interval `0 < x ≤ 1`
//!
//! Limits only known at runtime (design-variable bounds, output domains)
//! are expressed with [`Interval`] instead.
//!
//! # Extending
//!
//! Implement [`Bound<T>`] for your own zero-sized marker type to express a
//! different invariant.

mod interval;
mod strictly_positive;
mod unit_interval_lower_open;

use std::marker::PhantomData;

use thiserror::Error;

pub use interval::Interval;
pub use strictly_positive::StrictlyPositive;
pub use unit_interval_lower_open::{UnitBounds, UnitIntervalLowerOpen};

/// A trait for enforcing numeric invariants at construction time.
pub trait Bound<T> {
    /// Checks that the given value satisfies this bound.
    ///
    /// # Errors
    ///
    /// Returns a [`BoundError`] if the value does not satisfy the bound.
    fn check(value: &T) -> Result<(), BoundError>;
}

/// An error returned when a [`Bound`] or an [`Interval`] is violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BoundError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
    #[error("value is above the maximum allowed")]
    AboveMaximum,
    #[error("lower limit exceeds upper limit")]
    Inverted,
}

/// A wrapper enforcing a numeric bound at construction time.
///
/// # Example
///
/// ```
/// use twine_mda::support::bound::{Bounded, StrictlyPositive};
///
/// let tolerance = Bounded::<_, StrictlyPositive>::new(1e-6).unwrap();
/// assert_eq!(tolerance.into_inner(), 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Bounded<T, B: Bound<T>> {
    value: T,
    _marker: PhantomData<B>,
}

impl<T, B: Bound<T>> Bounded<T, B> {
    /// Constructs a new bounded value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not satisfy the bound.
    pub fn new(value: T) -> Result<Self, BoundError> {
        B::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    /// Wraps a value the caller already knows to be in bounds.
    ///
    /// Reserved for compile-time defaults inside this crate.
    pub(crate) const fn new_unchecked(value: T) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Copy, B: Bound<T>> Bounded<T, B> {
    /// Returns a copy of the inner value.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T, B: Bound<T>> AsRef<T> for Bounded<T, B> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}
