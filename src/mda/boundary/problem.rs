//! Problem formulation for constraint-boundary searches.

use twine_core::{EquationProblem, Model};

use crate::mda::{
    engine::{DesignPoint, Engine},
    evaluation::Evaluation,
    options::RunOptions,
};

use super::error::{MissingConstraint, TrialError};

/// Model adapter exposing a single design variable as the model input.
///
/// All other parameters stay at the values in `base`. A trial point that
/// fails to converge is an error, so the search steers away from it.
pub(super) struct BoundaryModel<'a> {
    engine: &'a Engine,
    base: &'a DesignPoint,
    variable: &'a str,
    options: &'a RunOptions,
}

impl<'a> BoundaryModel<'a> {
    pub(super) fn new(
        engine: &'a Engine,
        base: &'a DesignPoint,
        variable: &'a str,
        options: &'a RunOptions,
    ) -> Self {
        Self {
            engine,
            base,
            variable,
            options,
        }
    }
}

impl Model for BoundaryModel<'_> {
    type Input = f64;
    type Output = Evaluation;
    type Error = TrialError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let mut point = self.base.clone();
        point.insert(self.variable.to_owned(), *input);

        let evaluation = self.engine.run(&point, self.options)?;
        if let Some(failure) = evaluation.diagnostics.failure {
            return Err(TrialError::Failed(failure));
        }
        Ok(evaluation)
    }
}

/// Equation problem whose residual is the searched constraint's value.
pub(super) struct BoundaryProblem<'a> {
    constraint: &'a str,
}

impl<'a> BoundaryProblem<'a> {
    pub(super) fn new(constraint: &'a str) -> Self {
        Self { constraint }
    }
}

impl EquationProblem<1> for BoundaryProblem<'_> {
    type Input = f64;
    type Output = Evaluation;
    type Error = MissingConstraint;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(x[0])
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        output
            .constraint(self.constraint)
            .map(|value| [value])
            .ok_or_else(|| MissingConstraint(self.constraint.to_owned()))
    }
}
