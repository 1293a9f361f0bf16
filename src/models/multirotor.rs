//! Multirotor UAV sizing.
//!
//! [`Multirotor`] wraps an [`Engine`] built from a reference set of
//! multirotor blocks and exposes it as a [`twine_core::Model`] whose input is
//! a typed [`MultirotorDesign`].
//!
//! ```
//! use twine_core::Model;
//! use twine_mda::models::multirotor::{Multirotor, MultirotorDesign, MultirotorSpec, names};
//!
//! let multirotor = Multirotor::new(MultirotorSpec::default())?;
//! let evaluation = multirotor.call(&MultirotorDesign::default())?;
//!
//! assert!(evaluation.converged);
//! let mtow = evaluation.scalar(names::MTOW).unwrap();
//! assert!(mtow > 4.0 && mtow < 10.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod core;

pub use core::{MultirotorDesign, MultirotorSpec, names};

use twine_core::Model;

use crate::mda::{BuildError, Engine, Evaluation, RunError, RunOptions};

/// A sized-on-demand multirotor.
#[derive(Debug)]
pub struct Multirotor {
    engine: Engine,
    options: RunOptions,
}

impl Multirotor {
    /// Builds the block network for `spec`, with design-variable defaults
    /// from [`MultirotorDesign::default`].
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the network is inconsistent.
    pub fn new(spec: MultirotorSpec) -> Result<Self, BuildError> {
        let engine = core::registry(&spec, &MultirotorDesign::default())?.build()?;
        Ok(Self {
            engine,
            options: RunOptions::default(),
        })
    }

    /// Replaces the run options used by [`Model::call`].
    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// The underlying engine, for batch runs, warm starts or boundary searches.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl Model for Multirotor {
    type Input = MultirotorDesign;
    type Output = Evaluation;
    type Error = RunError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.engine.run(&input.to_point(), &self.options)
    }
}
