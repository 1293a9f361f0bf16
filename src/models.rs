//! Public sizing models.
//!
//! Models are the primary public interface of this crate.
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the block network is assembled. The `core` module is an
//! implementation detail; only the types a caller needs to describe a
//! design are re-exported.
//!
//! The [`twine_core::Model`] implementation is a thin adapter over a built
//! [`Engine`](crate::mda::Engine), so the same engine can also be driven
//! directly for batch runs, warm starts and boundary searches.

pub mod multirotor;
