use std::{fmt, marker::PhantomData};

use uom::{
    si::{Dimension as SiDimension, Quantity, SI},
    typenum::Integer,
};

/// Exponents of the seven SI base dimensions, carried at runtime.
///
/// The field order matches [`uom`]'s ISQ: length, mass, time, electric
/// current, thermodynamic temperature, amount of substance, luminous intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub current: i8,
    pub temperature: i8,
    pub amount: i8,
    pub luminosity: i8,
}

impl Dimension {
    pub const DIMENSIONLESS: Self = Self::new(0, 0, 0, 0, 0, 0, 0);
    pub const LENGTH: Self = Self::new(1, 0, 0, 0, 0, 0, 0);
    pub const MASS: Self = Self::new(0, 1, 0, 0, 0, 0, 0);
    pub const TIME: Self = Self::new(0, 0, 1, 0, 0, 0, 0);

    #[must_use]
    pub const fn new(
        length: i8,
        mass: i8,
        time: i8,
        current: i8,
        temperature: i8,
        amount: i8,
        luminosity: i8,
    ) -> Self {
        Self {
            length,
            mass,
            time,
            current,
            temperature,
            amount,
            luminosity,
        }
    }

    /// Reads the exponents of a [`uom`] SI dimension.
    #[must_use]
    pub fn of<D: SiDimension + ?Sized>() -> Self {
        Self::new(
            D::L::I8,
            D::M::I8,
            D::T::I8,
            D::I::I8,
            D::Th::I8,
            D::N::I8,
            D::J::I8,
        )
    }

    #[must_use]
    pub fn is_dimensionless(&self) -> bool {
        *self == Self::DIMENSIONLESS
    }

    fn exponents(&self) -> [(&'static str, i8); 7] {
        [
            ("m", self.length),
            ("kg", self.mass),
            ("s", self.time),
            ("A", self.current),
            ("K", self.temperature),
            ("mol", self.amount),
            ("cd", self.luminosity),
        ]
    }
}

/// Formats as SI base units, e.g. `m^2 kg s^-3 A^-1`, or `1` when dimensionless.
impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return f.write_str("1");
        }
        let mut first = true;
        for (symbol, exponent) in self.exponents() {
            if exponent == 0 {
                continue;
            }
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if exponent == 1 {
                f.write_str(symbol)?;
            } else {
                write!(f, "{symbol}^{exponent}")?;
            }
        }
        Ok(())
    }
}

/// A value with a known SI dimension and an SI magnitude.
///
/// Implemented for every `f64` [`uom`] SI quantity and for `f64` itself,
/// which is treated as dimensionless.
pub trait SiQuantity: Sized {
    /// The dimension shared by all values of this type.
    fn dimension() -> Dimension;

    /// The magnitude expressed in SI base units.
    fn to_si(&self) -> f64;

    /// Builds a value from a magnitude in SI base units.
    fn from_si(value: f64) -> Self;
}

impl<D> SiQuantity for Quantity<D, SI<f64>, f64>
where
    D: SiDimension + ?Sized,
{
    fn dimension() -> Dimension {
        Dimension::of::<D>()
    }

    fn to_si(&self) -> f64 {
        self.value
    }

    fn from_si(value: f64) -> Self {
        Quantity {
            dimension: PhantomData,
            units: PhantomData,
            value,
        }
    }
}

impl SiQuantity for f64 {
    fn dimension() -> Dimension {
        Dimension::DIMENSIONLESS
    }

    fn to_si(&self) -> f64 {
        *self
    }

    fn from_si(value: f64) -> Self {
        value
    }
}
