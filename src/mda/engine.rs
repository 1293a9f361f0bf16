use std::{
    collections::{BTreeMap, HashMap},
    time::Instant,
};

use rayon::prelude::*;

use super::{
    constraint::{self, BoundConstraint},
    error::RunError,
    evaluation::{Diagnostics, Evaluation, Failure, WarmStart},
    graph::{Stage, StageSummary},
    node::{Node, StageFailure},
    options::RunOptions,
    parameter::Parameter,
    quantity::{Magnitude, Value},
    resolver,
    store::{Catalog, QuantityId, QuantityStore},
};

/// Values for design variables (and overridden constants), in SI units.
pub type DesignPoint = BTreeMap<String, f64>;

/// A validated, ready-to-run block network.
///
/// Built once by [`Registry::build`](super::Registry::build), then run any
/// number of times. Runs share nothing mutable, so one engine can evaluate
/// many design points in parallel.
#[derive(Debug)]
pub struct Engine {
    pub(crate) catalog: Catalog,
    pub(crate) blocks: Vec<Node>,
    pub(crate) bootstraps: Vec<Node>,
    pub(crate) parameters: Vec<(Parameter, QuantityId)>,
    pub(crate) parameter_index: HashMap<String, usize>,
    pub(crate) constraints: Vec<BoundConstraint>,
    pub(crate) stages: Vec<Stage>,
}

impl Engine {
    /// Evaluates one design point.
    ///
    /// Parameters missing from `point` take their defaults. Design variables
    /// outside their bounds are clipped and reported as warnings.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] if the design point names an unknown variable,
    /// omits a variable with no default, or a block misbehaves (wrong output
    /// count or dimension). Physical failures are not errors: they come
    /// back as an [`Evaluation`] with `converged == false`.
    pub fn run(&self, point: &DesignPoint, options: &RunOptions) -> Result<Evaluation, RunError> {
        self.evaluate(point, options, None)
    }

    /// Evaluates one design point, seeding cycles from a previous evaluation.
    ///
    /// Cycle quantities present in `warm` replace their bootstrap estimates,
    /// which typically saves passes when `point` is close to the point that
    /// produced `warm`.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::run`], plus a store error if a warm-start value has
    /// the wrong dimension.
    pub fn run_warm_started(
        &self,
        point: &DesignPoint,
        options: &RunOptions,
        warm: &WarmStart,
    ) -> Result<Evaluation, RunError> {
        self.evaluate(point, options, Some(warm))
    }

    /// Evaluates many design points in parallel, preserving their order.
    pub fn run_batch(
        &self,
        points: &[DesignPoint],
        options: &RunOptions,
    ) -> Vec<Result<Evaluation, RunError>> {
        points
            .par_iter()
            .map(|point| self.run(point, options))
            .collect()
    }

    /// The execution plan, in order.
    #[must_use]
    pub fn stages(&self) -> Vec<StageSummary> {
        self.stages
            .iter()
            .map(|stage| stage.summarize(&self.blocks, &self.bootstraps, &self.catalog))
            .collect()
    }

    /// Parameters in registration order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().map(|(parameter, _)| parameter)
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameter_index
            .get(name)
            .map(|&i| &self.parameters[i].0)
    }

    /// Constraint names in registration order.
    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(|c| c.constraint.name())
    }

    /// Every quantity name known to the engine.
    pub fn quantity_names(&self) -> impl Iterator<Item = &str> {
        self.catalog.names()
    }

    fn evaluate(
        &self,
        point: &DesignPoint,
        options: &RunOptions,
        warm: Option<&WarmStart>,
    ) -> Result<Evaluation, RunError> {
        let deadline = options.time_budget.map(|budget| Instant::now() + budget);

        if let Some(name) = point.keys().find(|name| !self.parameter_index.contains_key(*name)) {
            return Err(RunError::UnknownDesignVariable { name: name.clone() });
        }

        let mut store = QuantityStore::new(&self.catalog);
        let mut diagnostics = Diagnostics::default();

        for (parameter, _) in &self.parameters {
            let (value, warning) = parameter.bind(point.get(parameter.name()).copied())?;
            store.set(
                parameter.name(),
                Value::from_parts(Magnitude::Scalar(value), parameter.dimension()),
            )?;
            diagnostics.warnings.extend(warning);
        }

        for stage in &self.stages {
            let outcome = match stage {
                Stage::Block(i) => Self::run_once(&self.blocks[*i], &mut store),
                Stage::Bootstrap(i) => Self::run_once(&self.bootstraps[*i], &mut store),
                Stage::Cycle(cycle) => {
                    if let Some(warm) = warm {
                        seed(&cycle.quantities, warm, &mut store)?;
                    }
                    resolver::resolve(cycle, &self.blocks, &mut store, options, deadline)
                        .map(|report| diagnostics.cycles.push(report))
                }
            };

            let failure = match outcome {
                Ok(()) => continue,
                Err(StageFailure::Run(error)) => return Err(error),
                Err(StageFailure::Domain(error)) => Failure::Domain(error),
                Err(StageFailure::Convergence(error)) => Failure::Convergence(error),
            };
            diagnostics.failure = Some(failure);
            return Ok(Evaluation {
                quantities: store.into_map(),
                constraints: indexmap::IndexMap::new(),
                converged: false,
                diagnostics,
            });
        }

        let constraints = constraint::evaluate_all(&self.constraints, &store)?;
        Ok(Evaluation {
            quantities: store.into_map(),
            constraints,
            converged: true,
            diagnostics,
        })
    }

    fn run_once(node: &Node, store: &mut QuantityStore<'_>) -> Result<(), StageFailure> {
        let outputs = node.evaluate(store)?;
        for (&id, value) in node.outputs.iter().zip(outputs) {
            store.write(id, value)?;
        }
        Ok(())
    }
}

/// Overwrites cycle quantities with warm-start values where available.
fn seed(quantities: &[QuantityId], warm: &WarmStart, store: &mut QuantityStore<'_>) -> Result<(), RunError> {
    for &id in quantities {
        let name = store.name(id);
        if let Some(value) = warm.get(name) {
            store.set(name, value.clone())?;
        }
    }
    Ok(())
}
