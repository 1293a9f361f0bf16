//! Coupled multidisciplinary analysis.
//!
//! A sizing problem is described as a network of [`Block`]s. Each block reads
//! named, dimensioned quantities and writes others. Blocks are collected in
//! a [`Registry`], which checks the network's structure and compiles it into
//! an [`Engine`]:
//!
//! 1. Every quantity must have exactly one producer: a block, or a
//!    [`Parameter`] (design variable or constant).
//! 2. The block/quantity graph is split into strongly connected components.
//!    Components with more than one node are coupled cycles, such as the
//!    classic "takeoff mass depends on component masses, which depend on
//!    takeoff mass" loop of aircraft sizing.
//! 3. Each cycle needs a bootstrap: a small block that estimates one cycle
//!    quantity so the first pass can start.
//!
//! At run time the engine binds a design point, runs acyclic blocks once in
//! dependency order, iterates each cycle to a fixed point (Gauss-Seidel with
//! optional under-relaxation), then evaluates [`Constraint`]s on the converged
//! quantities.
//!
//! ```
//! use uom::si::{
//!     f64::{ElectricCurrent, ElectricPotential, Power},
//!     power::watt,
//! };
//! use twine_mda::mda::{Block, DesignPoint, Parameter, Registry, RunOptions, Value};
//!
//! let mut registry = Registry::new();
//! registry.parameter(Parameter::constant("load:power", Power::new::<watt>(50.0)))?;
//! registry.register(
//!     Block::builder("load:current")
//!         .input::<Power>("load:power")
//!         .input::<ElectricPotential>("bus:voltage")
//!         .output::<ElectricCurrent>("bus:current")
//!         .compute(|i| Ok(vec![Value::si::<ElectricCurrent>(i.scalar(0)? / i.scalar(1)?)])),
//! )?;
//! registry.register(
//!     Block::builder("source:voltage")
//!         .input::<ElectricCurrent>("bus:current")
//!         .output::<ElectricPotential>("bus:voltage")
//!         .compute(|i| Ok(vec![Value::si::<ElectricPotential>(0.1 * i.scalar(0)? + 5.0)])),
//! )?;
//! registry.bootstrap(
//!     Block::builder("bus:voltage:guess")
//!         .output::<ElectricPotential>("bus:voltage")
//!         .compute(|_| Ok(vec![Value::si::<ElectricPotential>(10.0)])),
//! )?;
//!
//! let engine = registry.build()?;
//! let evaluation = engine.run(&DesignPoint::new(), &RunOptions::default())?;
//! assert!(evaluation.converged);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Physical failures (a block producing `NaN`, a cycle that does not settle)
//! do not abort a run; they are reported in [`Evaluation::diagnostics`] so
//! an optimizer can treat the point as infeasible and move on.

mod block;
mod boundary;
mod constraint;
mod deviation;
mod engine;
mod error;
mod evaluation;
mod graph;
mod node;
mod options;
mod parameter;
mod quantity;
mod registry;
mod resolver;
mod store;

#[cfg(test)]
mod test_support;

pub use block::{Block, BlockBuilder, BlockError, BlockFn, Inputs, Port};
pub use boundary::{BoundaryConfig, BoundaryError, find_boundary};
pub use constraint::{Constraint, ConstraintBuilder, ConstraintFn};
pub use deviation::Deviation;
pub use engine::{DesignPoint, Engine};
pub use error::RunError;
pub use evaluation::{
    ConvergenceError, ConvergenceLimit, CycleReport, Diagnostics, DomainError, DomainViolation,
    Evaluation, Failure, WarmStart, Warning,
};
pub use graph::StageSummary;
pub use options::RunOptions;
pub use parameter::{Parameter, ParameterKind};
pub use quantity::{Magnitude, Producer, Value, ValueError};
pub use registry::{BuildError, Registry};
pub use store::StoreError;
