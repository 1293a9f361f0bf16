use std::fmt;

use thiserror::Error;

use crate::support::units::{Dimension, SiQuantity};

/// The numeric payload of a [`Value`], in SI base units.
#[derive(Debug, Clone, PartialEq)]
pub enum Magnitude {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Magnitude {
    /// Returns the magnitude as a slice of components.
    #[must_use]
    pub fn components(&self) -> &[f64] {
        match self {
            Self::Scalar(x) => std::slice::from_ref(x),
            Self::Vector(xs) => xs,
        }
    }

    fn same_shape(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(_), Self::Scalar(_)) => true,
            (Self::Vector(a), Self::Vector(b)) => a.len() == b.len(),
            _ => false,
        }
    }

    fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(f(*a, *b)),
            _ => Self::Vector(
                self.components()
                    .iter()
                    .zip(other.components())
                    .map(|(&a, &b)| f(a, b))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(x) => write!(f, "{x}"),
            Self::Vector(xs) => write!(f, "{xs:?}"),
        }
    }
}

/// A dimension-tagged magnitude exchanged between blocks.
///
/// Magnitudes are stored in SI base units, so two values with the same
/// [`Dimension`] are always directly comparable.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    magnitude: Magnitude,
    dimension: Dimension,
}

impl Value {
    /// Wraps a typed quantity.
    ///
    /// ```
    /// use uom::si::{f64::Mass, mass::kilogram};
    /// use twine_mda::mda::Value;
    ///
    /// let payload = Value::new(Mass::new::<kilogram>(4.0));
    /// assert_eq!(payload.as_scalar(), Some(4.0));
    /// ```
    pub fn new<Q: SiQuantity>(quantity: Q) -> Self {
        Self::si::<Q>(quantity.to_si())
    }

    /// Builds a scalar of type `Q` from a magnitude already in SI units.
    #[must_use]
    pub fn si<Q: SiQuantity>(value: f64) -> Self {
        Self {
            magnitude: Magnitude::Scalar(value),
            dimension: Q::dimension(),
        }
    }

    #[must_use]
    pub fn dimensionless(value: f64) -> Self {
        Self::si::<f64>(value)
    }

    /// Builds a vector of quantities sharing one dimension.
    pub fn vector<Q: SiQuantity>(items: impl IntoIterator<Item = Q>) -> Self {
        Self {
            magnitude: Magnitude::Vector(items.into_iter().map(|q| q.to_si()).collect()),
            dimension: Q::dimension(),
        }
    }

    #[must_use]
    pub fn from_parts(magnitude: Magnitude, dimension: Dimension) -> Self {
        Self {
            magnitude,
            dimension,
        }
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn magnitude(&self) -> &Magnitude {
        &self.magnitude
    }

    #[must_use]
    pub fn components(&self) -> &[f64] {
        self.magnitude.components()
    }

    /// Returns the SI magnitude if this value is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self.magnitude {
            Magnitude::Scalar(x) => Some(x),
            Magnitude::Vector(_) => None,
        }
    }

    /// Reads a scalar back as a typed quantity.
    ///
    /// # Errors
    ///
    /// Fails if the value is a vector or if `Q` has a different dimension.
    pub fn get<Q: SiQuantity>(&self) -> Result<Q, ValueError> {
        self.expect_dimension(Q::dimension())?;
        self.as_scalar()
            .map(Q::from_si)
            .ok_or(ValueError::NotScalar)
    }

    pub(crate) fn expect_dimension(&self, expected: Dimension) -> Result<(), ValueError> {
        if self.dimension == expected {
            Ok(())
        } else {
            Err(ValueError::Dimension {
                expected,
                found: self.dimension,
            })
        }
    }

    pub(crate) fn same_shape(&self, other: &Self) -> bool {
        self.magnitude.same_shape(&other.magnitude)
    }

    /// Returns the first component that is `NaN` or infinite.
    pub(crate) fn first_non_finite(&self) -> Option<f64> {
        self.components().iter().copied().find(|x| !x.is_finite())
    }

    /// Under-relaxed update `alpha·self + (1 − alpha)·previous`.
    ///
    /// Shapes must match; otherwise `self` is returned unchanged and the
    /// store reports the mismatch when it is written.
    pub(crate) fn relaxed_towards(&self, previous: &Self, alpha: f64) -> Self {
        if alpha >= 1.0 || !self.same_shape(previous) {
            return self.clone();
        }
        Self {
            magnitude: self
                .magnitude
                .zip_with(&previous.magnitude, |new, old| alpha * new + (1.0 - alpha) * old),
            dimension: self.dimension,
        }
    }

    /// Largest componentwise `|new − old| / max(|old|, floor)`.
    pub(crate) fn relative_change(&self, previous: &Self, floor: f64) -> f64 {
        if !self.same_shape(previous) {
            return f64::INFINITY;
        }
        self.components()
            .iter()
            .zip(previous.components())
            .map(|(new, old)| (new - old).abs() / old.abs().max(floor))
            .fold(0.0, f64::max)
    }

    /// Applies `f` to every component.
    pub(crate) fn map_components(&self, f: impl Fn(f64) -> f64) -> Self {
        let magnitude = match &self.magnitude {
            Magnitude::Scalar(x) => Magnitude::Scalar(f(*x)),
            Magnitude::Vector(xs) => Magnitude::Vector(xs.iter().map(|&x| f(x)).collect()),
        };
        Self {
            magnitude,
            dimension: self.dimension,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dimension.is_dimensionless() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.dimension)
        }
    }
}

/// Misuse of a [`Value`] by the code reading it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected dimension `{expected}`, found `{found}`")]
    Dimension { expected: Dimension, found: Dimension },
    #[error("expected a scalar, found a vector")]
    NotScalar,
}

/// Who writes a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Producer {
    /// The block with this id.
    Block(String),
    /// A design variable bound from the design point.
    DesignVariable,
    /// A fixed parameter.
    Constant,
}

impl fmt::Display for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(id) => write!(f, "block `{id}`"),
            Self::DesignVariable => f.write_str("a design variable"),
            Self::Constant => f.write_str("a constant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Length, Mass},
        length::millimeter,
        mass::kilogram,
    };

    #[test]
    fn typed_round_trip_checks_dimension() {
        let d = Value::new(Length::new::<millimeter>(254.0));
        assert_relative_eq!(d.as_scalar().unwrap(), 0.254);
        assert!(d.get::<Length>().is_ok());
        assert_eq!(
            d.get::<Mass>(),
            Err(ValueError::Dimension {
                expected: Dimension::MASS,
                found: Dimension::LENGTH,
            })
        );
    }

    #[test]
    fn vectors_are_not_scalars() {
        let v = Value::vector([1.0, 2.0]);
        assert_eq!(v.as_scalar(), None);
        assert_eq!(v.get::<f64>(), Err(ValueError::NotScalar));
    }

    #[test]
    fn relaxation_blends_components() {
        let old = Value::vector([0.0, 10.0]);
        let new = Value::vector([10.0, 20.0]);

        let blended = new.relaxed_towards(&old, 0.25);
        assert_eq!(blended.components(), &[2.5, 12.5]);

        let full = new.relaxed_towards(&old, 1.0);
        assert_eq!(full, new);
    }

    #[test]
    fn relative_change_uses_floor() {
        let old = Value::new(Mass::new::<kilogram>(8.0));
        let new = Value::new(Mass::new::<kilogram>(8.8));
        assert_relative_eq!(new.relative_change(&old, 1e-9), 0.1, epsilon = 1e-12);

        let zero = Value::dimensionless(0.0);
        let tiny = Value::dimensionless(1e-12);
        assert_relative_eq!(tiny.relative_change(&zero, 1e-9), 1e-3, epsilon = 1e-15);

        let scalar = Value::dimensionless(1.0);
        assert_eq!(Value::vector([1.0]).relative_change(&scalar, 1e-9), f64::INFINITY);
    }

    #[test]
    fn finds_non_finite_components() {
        assert_eq!(Value::dimensionless(1.0).first_non_finite(), None);
        assert!(Value::vector([1.0, f64::NAN]).first_non_finite().unwrap().is_nan());
        assert_eq!(
            Value::dimensionless(f64::INFINITY).first_non_finite(),
            Some(f64::INFINITY)
        );
    }
}
