//! # Twine MDA
//!
//! Multidisciplinary sizing analysis for
//! [Twine](https://github.com/isentropic-dev/twine): networks of coupled
//! sizing blocks, resolved cycle by cycle.
//!
//! ## Crate layout
//!
//! - [`mda`]: The analysis core. Blocks, the registry that validates them,
//!   and the engine that plans and runs them.
//! - [`models`]: Ready-made sizing models built on [`mda`] and exposed as
//!   [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by the core and the models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code in this crate follows a natural progression as needs emerge:
//!
//! 1. **Model-specific**: Starts in a model's internal `core` module
//! 2. **Crate-level**: If useful across models or outside this crate, it
//!    moves to [`support`]
//! 3. **Standalone**: If broadly useful and stable, it may become its own crate
//!    (and be removed from here in a future release)
//!
//! Note: Only utilities at the crate-level (in [`support`]) are part of the public API.
//! Model-specific utility code remains private.

pub mod mda;
pub mod models;
pub mod support;
