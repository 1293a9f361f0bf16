use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::support::units::SiQuantity;

use super::{
    block::{BlockError, Inputs, Port},
    error::RunError,
    store::{QuantityId, QuantityStore},
};

pub type ConstraintFn = dyn Fn(&Inputs<'_>) -> Result<f64, BlockError> + Send + Sync;

/// A scalar function of converged quantities; a value `>= 0` means satisfied.
///
/// Constraints are evaluated once, after every cycle has converged, and
/// never feed back into the block network.
#[derive(Clone)]
pub struct Constraint {
    name: String,
    inputs: Vec<Port>,
    function: Arc<ConstraintFn>,
}

impl Constraint {
    pub fn builder(name: impl Into<String>) -> ConstraintBuilder {
        ConstraintBuilder {
            name: name.into(),
            inputs: Vec::new(),
        }
    }

    /// Normalized margin `(capacity − demand) / capacity` between two
    /// quantities of type `Q`.
    ///
    /// ```
    /// use uom::si::f64::Torque;
    /// use twine_mda::mda::Constraint;
    ///
    /// let c = Constraint::margin::<Torque>(
    ///     "motor:torque_margin",
    ///     "motor:torque:max",
    ///     "motor:torque:takeoff",
    /// );
    /// assert_eq!(c.inputs().len(), 2);
    /// ```
    pub fn margin<Q: SiQuantity>(name: impl Into<String>, capacity: &str, demand: &str) -> Self {
        Self::builder(name)
            .input::<Q>(capacity)
            .input::<Q>(demand)
            .compute(|inputs| {
                let capacity = inputs.scalar(0)?;
                let demand = inputs.scalar(1)?;
                Ok((capacity - demand) / capacity)
            })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintBuilder {
    name: String,
    inputs: Vec<Port>,
}

impl ConstraintBuilder {
    #[must_use]
    pub fn input<Q: SiQuantity>(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(Port::new(name, Q::dimension()));
        self
    }

    pub fn compute<F>(self, function: F) -> Constraint
    where
        F: Fn(&Inputs<'_>) -> Result<f64, BlockError> + Send + Sync + 'static,
    {
        Constraint {
            name: self.name,
            inputs: self.inputs,
            function: Arc::new(function),
        }
    }
}

/// A constraint with its inputs resolved to store slots.
#[derive(Debug, Clone)]
pub(crate) struct BoundConstraint {
    pub(crate) constraint: Constraint,
    pub(crate) inputs: Vec<QuantityId>,
}

impl BoundConstraint {
    fn evaluate(&self, store: &QuantityStore<'_>) -> Result<f64, RunError> {
        let values = self
            .inputs
            .iter()
            .map(|&id| store.value(id))
            .collect::<Result<Vec<_>, _>>()?;
        let inputs = Inputs::new(&self.constraint.inputs, &values);
        (self.constraint.function)(&inputs).map_err(|source| RunError::Constraint {
            constraint: self.constraint.name.clone(),
            source,
        })
    }
}

/// Evaluates every constraint, keeping registration order.
pub(crate) fn evaluate_all(
    constraints: &[BoundConstraint],
    store: &QuantityStore<'_>,
) -> Result<IndexMap<String, f64>, RunError> {
    constraints
        .iter()
        .map(|c| Ok((c.constraint.name.clone(), c.evaluate(store)?)))
        .collect()
}
