//! Constraint-boundary search.
//!
//! Finds the value of one design variable at which a constraint is exactly
//! zero, holding every other parameter fixed. Typical use is answering
//! "how small can the battery be before endurance becomes the active
//! constraint?" without running a full optimizer.

mod config;
mod error;
mod problem;

pub use config::BoundaryConfig;
pub use error::BoundaryError;

use twine_solvers::equation::{EvalError, bisection};

use super::{
    engine::{DesignPoint, Engine},
    evaluation::Evaluation,
    options::RunOptions,
};

use error::TrialError;
use problem::{BoundaryModel, BoundaryProblem};

/// Bisects `variable` over `bracket` until `constraint` is zero.
///
/// The bracket is clipped to the variable's bounds first. Trial points that
/// fail to converge are treated as having a positive constraint value; a
/// [`RunError`](super::RunError) at any trial point ends the search.
///
/// Returns the evaluation at the boundary; the variable's value is
/// `evaluation.scalar(variable)`.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the variable or constraint is unknown, a
/// trial run fails with a [`RunError`](super::RunError), the bracket does
/// not straddle zero, or the solver hits its iteration limit.
pub fn find_boundary(
    engine: &Engine,
    base: &DesignPoint,
    variable: &str,
    constraint: &str,
    bracket: [f64; 2],
    options: &RunOptions,
    config: BoundaryConfig,
) -> Result<Evaluation, BoundaryError> {
    let Some(bounds) = engine.parameter(variable).and_then(|p| p.bounds()) else {
        return Err(BoundaryError::UnknownVariable {
            name: variable.to_owned(),
        });
    };
    if !engine.constraint_names().any(|name| name == constraint) {
        return Err(BoundaryError::UnknownConstraint {
            name: constraint.to_owned(),
        });
    }

    let model = BoundaryModel::new(engine, base, variable, options);
    let problem = BoundaryProblem::new(constraint);

    let solution = bisection::solve(
        &model,
        &problem,
        [bounds.clamp(bracket[0]), bounds.clamp(bracket[1])],
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| match event.result() {
            Err(EvalError::Model(TrialError::Failed(_))) => Some(bisection::Action::assume_positive()),
            _ => None,
        },
    )
    .map_err(BoundaryError::from_bisection)?;

    if solution.status != bisection::Status::Converged {
        return Err(BoundaryError::MaxIters {
            residual: solution.residual,
            iters: solution.iters,
        });
    }

    tracing::debug!(
        variable,
        constraint,
        iters = solution.iters,
        "found constraint boundary"
    );
    Ok(solution.snapshot.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::mda::{
        RunError,
        test_support::{point, square_with_limit},
    };

    #[test]
    fn finds_where_margin_vanishes() {
        let engine = square_with_limit(4.0);
        let evaluation = find_boundary(
            &engine,
            &DesignPoint::new(),
            "x",
            "y:margin",
            [0.0, 5.0],
            &RunOptions::default(),
            BoundaryConfig::default(),
        )
        .expect("boundary search should succeed");

        assert_relative_eq!(evaluation.scalar("x").unwrap(), 2.0, epsilon = 1e-6);
        assert_relative_eq!(evaluation.constraint("y:margin").unwrap(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn bracket_is_clipped_to_bounds() {
        let engine = square_with_limit(4.0);
        let evaluation = find_boundary(
            &engine,
            &DesignPoint::new(),
            "x",
            "y:margin",
            [-50.0, 50.0],
            &RunOptions::default(),
            BoundaryConfig::default(),
        )
        .expect("clipped bracket should still straddle the boundary");

        assert_relative_eq!(evaluation.scalar("x").unwrap(), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn run_errors_end_the_search() {
        let engine = square_with_limit(4.0);
        let result = find_boundary(
            &engine,
            &point(&[("bogus", 1.0)]),
            "x",
            "y:margin",
            [0.0, 5.0],
            &RunOptions::default(),
            BoundaryConfig::default(),
        );

        assert!(matches!(
            result,
            Err(BoundaryError::Run(RunError::UnknownDesignVariable { ref name })) if name == "bogus"
        ));
    }

    #[test]
    fn rejects_unknown_names() {
        let engine = square_with_limit(4.0);
        let search = |variable: &str, constraint: &str| {
            find_boundary(
                &engine,
                &DesignPoint::new(),
                variable,
                constraint,
                [0.0, 5.0],
                &RunOptions::default(),
                BoundaryConfig::default(),
            )
        };

        assert!(matches!(
            search("y", "y:margin"),
            Err(BoundaryError::UnknownVariable { .. })
        ));
        assert!(matches!(
            search("x", "z:margin"),
            Err(BoundaryError::UnknownConstraint { .. })
        ));
    }
}
