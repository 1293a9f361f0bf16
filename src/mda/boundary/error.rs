use thiserror::Error;
use twine_solvers::equation::bisection;

use crate::mda::{error::RunError, evaluation::Failure};

/// Errors from a constraint-boundary search.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The searched quantity is not a design variable of the engine.
    #[error("`{name}` is not a design variable")]
    UnknownVariable { name: String },

    /// The engine has no constraint of this name.
    #[error("unknown constraint `{name}`")]
    UnknownConstraint { name: String },

    /// A trial run failed for a reason other than the physics, such as an
    /// unknown name in the base point or a misbehaving block.
    #[error("trial run failed")]
    Run(#[source] RunError),

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual}")]
    MaxIters {
        /// Constraint value closest to zero seen during iteration.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}

impl BoundaryError {
    /// Unwraps run errors that the solver carried out of a trial point.
    pub(super) fn from_bisection(error: bisection::Error) -> Self {
        match error {
            bisection::Error::Model(source) => match source.downcast::<TrialError>() {
                Ok(trial) => match *trial {
                    TrialError::Run(error) => Self::Run(error),
                    failed @ TrialError::Failed(_) => {
                        Self::Bisection(bisection::Error::Model(Box::new(failed)))
                    }
                },
                Err(source) => Self::Bisection(bisection::Error::Model(source)),
            },
            error => Self::Bisection(error),
        }
    }
}

/// Why the engine could not produce a constraint value for a trial point.
#[derive(Debug, Error)]
pub(super) enum TrialError {
    #[error(transparent)]
    Run(#[from] RunError),

    #[error("design point did not converge")]
    Failed(#[source] Failure),
}

/// A converged evaluation that lacks the searched constraint.
#[derive(Debug, Error)]
#[error("constraint `{0}` missing from evaluation")]
pub(super) struct MissingConstraint(pub(super) String);
