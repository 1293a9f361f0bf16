mod failure;

use std::{collections::BTreeMap, fmt};

use indexmap::IndexMap;

use crate::support::units::SiQuantity;

use super::quantity::Value;

pub use failure::{ConvergenceError, ConvergenceLimit, DomainError, DomainViolation, Failure};

/// The outcome of one run of the engine.
///
/// A run that hits a physical failure still returns an `Evaluation`, with
/// `converged == false` and the failure in [`Diagnostics::failure`]. In that
/// case `quantities` holds whatever had been computed and `constraints` is
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub quantities: BTreeMap<String, Value>,
    /// Constraint values in registration order; `>= 0` means satisfied.
    pub constraints: IndexMap<String, f64>,
    pub converged: bool,
    pub diagnostics: Diagnostics,
}

impl Evaluation {
    /// Returns a scalar quantity in SI units.
    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.quantities.get(name).and_then(Value::as_scalar)
    }

    /// Returns a scalar quantity as a typed value, if it exists with that dimension.
    #[must_use]
    pub fn quantity<Q: SiQuantity>(&self, name: &str) -> Option<Q> {
        self.quantities.get(name).and_then(|v| v.get::<Q>().ok())
    }

    #[must_use]
    pub fn constraint(&self, name: &str) -> Option<f64> {
        self.constraints.get(name).copied()
    }

    /// `true` if the run converged and every constraint is satisfied.
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.converged && self.constraints.values().all(|&c| c >= 0.0)
    }

    /// Values to seed the next run's cycles with.
    #[must_use]
    pub fn warm_start(&self) -> WarmStart {
        WarmStart {
            values: self.quantities.clone(),
        }
    }
}

/// Everything the engine noticed during a run besides the results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub warnings: Vec<Warning>,
    pub failure: Option<Failure>,
    /// One report per cycle that converged, in execution order.
    pub cycles: Vec<CycleReport>,
}

impl Diagnostics {
    #[must_use]
    pub fn failing_quantity(&self) -> Option<&str> {
        self.failure.as_ref().map(Failure::quantity)
    }

    /// The last relative change of a cycle that failed to converge.
    #[must_use]
    pub fn last_delta(&self) -> Option<f64> {
        match &self.failure {
            Some(Failure::Convergence(e)) => Some(e.last_delta),
            _ => None,
        }
    }
}

/// A non-fatal observation about a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A design variable was moved onto its bounds.
    Clipped {
        variable: String,
        requested: f64,
        clipped: f64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clipped {
                variable,
                requested,
                clipped,
            } => write!(f, "`{variable}` clipped from {requested} to {clipped}"),
        }
    }
}

/// How a converged cycle got there.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub blocks: Vec<String>,
    pub passes: usize,
    pub last_delta: f64,
}

/// Quantity values carried from one run into the cycles of the next.
///
/// Only quantities that belong to a cycle are read; everything else is
/// recomputed from scratch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarmStart {
    values: BTreeMap<String, Value>,
}

impl WarmStart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the starting value of a quantity.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Mass, mass::kilogram};

    fn evaluation(constraints: &[(&str, f64)], converged: bool) -> Evaluation {
        Evaluation {
            quantities: BTreeMap::from([(
                "mtow".to_owned(),
                Value::new(Mass::new::<kilogram>(8.5)),
            )]),
            constraints: constraints
                .iter()
                .map(|&(name, value)| (name.to_owned(), value))
                .collect(),
            converged,
            diagnostics: Diagnostics::default(),
        }
    }

    #[test]
    fn feasibility_needs_convergence_and_margins() {
        assert!(evaluation(&[("a", 0.1), ("b", 0.0)], true).is_feasible());
        assert!(!evaluation(&[("a", 0.1), ("b", -0.01)], true).is_feasible());
        assert!(!evaluation(&[("a", 0.1)], false).is_feasible());
    }

    #[test]
    fn typed_lookup() {
        let e = evaluation(&[], true);
        assert_eq!(e.scalar("mtow"), Some(8.5));
        assert_eq!(
            e.quantity::<Mass>("mtow").map(|m| m.get::<kilogram>()),
            Some(8.5)
        );
        assert!(e.quantity::<f64>("mtow").is_none());
        assert!(e.scalar("missing").is_none());
    }

    #[test]
    fn warm_start_carries_quantities() {
        let e = evaluation(&[], true);
        let warm = e.warm_start();
        assert_eq!(warm.get("mtow").and_then(Value::as_scalar), Some(8.5));
        assert!(WarmStart::new().is_empty());
    }
}
