use crate::support::{
    bound::Interval,
    units::{Dimension, SiQuantity},
};

use super::{error::RunError, evaluation::Warning, quantity::Producer};

/// A quantity supplied from outside the block network.
///
/// Design variables are what an optimizer moves; each one has bounds and,
/// optionally, a default used when the design point omits it. Constants are
/// fixed inputs (mission requirements, reference data) that a design point
/// may still override.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    dimension: Dimension,
    kind: ParameterKind,
    default: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterKind {
    DesignVariable { bounds: Interval },
    Constant,
}

impl Parameter {
    /// Declares a design variable of type `Q` with bounds in SI units.
    pub fn design_variable<Q: SiQuantity>(name: impl Into<String>, bounds: Interval) -> Self {
        Self {
            name: name.into(),
            dimension: Q::dimension(),
            kind: ParameterKind::DesignVariable { bounds },
            default: None,
        }
    }

    /// Declares a constant.
    ///
    /// ```
    /// use uom::si::{f64::Mass, mass::kilogram};
    /// use twine_mda::mda::Parameter;
    ///
    /// let payload = Parameter::constant("spec:payload:mass", Mass::new::<kilogram>(4.0));
    /// assert_eq!(payload.default(), Some(4.0));
    /// ```
    pub fn constant<Q: SiQuantity>(name: impl Into<String>, value: Q) -> Self {
        Self {
            name: name.into(),
            dimension: Q::dimension(),
            kind: ParameterKind::Constant,
            default: Some(value.to_si()),
        }
    }

    /// A constant of the given dimension with value zero.
    pub(crate) fn zero(name: impl Into<String>, dimension: Dimension) -> Self {
        Self {
            name: name.into(),
            dimension,
            kind: ParameterKind::Constant,
            default: Some(0.0),
        }
    }

    /// Sets the value used when a design point omits this parameter, in SI units.
    #[must_use]
    pub fn with_default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    #[must_use]
    pub fn default(&self) -> Option<f64> {
        self.default
    }

    /// Bounds of a design variable, `None` for constants.
    #[must_use]
    pub fn bounds(&self) -> Option<Interval> {
        match self.kind {
            ParameterKind::DesignVariable { bounds } => Some(bounds),
            ParameterKind::Constant => None,
        }
    }

    pub(crate) fn producer(&self) -> Producer {
        match self.kind {
            ParameterKind::DesignVariable { .. } => Producer::DesignVariable,
            ParameterKind::Constant => Producer::Constant,
        }
    }

    /// Resolves the value to write for this run.
    ///
    /// Design variables outside their bounds are clipped onto them and the
    /// clip is reported as a warning.
    pub(crate) fn bind(&self, requested: Option<f64>) -> Result<(f64, Option<Warning>), RunError> {
        let value = requested
            .or(self.default)
            .ok_or_else(|| RunError::MissingDesignVariable {
                name: self.name.clone(),
            })?;
        if value.is_nan() {
            return Err(RunError::NotANumber {
                name: self.name.clone(),
            });
        }
        let Some(bounds) = self.bounds() else {
            return Ok((value, None));
        };
        let clipped = bounds.clamp(value);
        if clipped == value {
            return Ok((value, None));
        }
        tracing::warn!(
            variable = %self.name,
            requested = value,
            clipped,
            "design variable outside its bounds, clipping"
        );
        let warning = Warning::Clipped {
            variable: self.name.clone(),
            requested: value,
            clipped,
        };
        Ok((clipped, Some(warning)))
    }
}
