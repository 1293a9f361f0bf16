//! Extensions to [`uom`].
//!
//! Blocks in the analysis engine exchange values through a shared store
//! rather than through typed Rust signatures, so each value carries its
//! physical [`Dimension`] at runtime. [`SiQuantity`] connects the two
//! worlds: any [`uom`] SI quantity (and plain `f64` for dimensionless
//! values) can report its dimension and convert to and from its SI magnitude.
//!
//! ```
//! use uom::si::{f64::Mass, mass::gram};
//! use twine_mda::support::units::{Dimension, SiQuantity};
//!
//! let m = Mass::new::<gram>(250.0);
//! assert_eq!(m.to_si(), 0.25);
//! assert_eq!(Mass::dimension(), Dimension::MASS);
//! ```
//!
//! ## Additional quantities
//!
//! [`TorqueConstant`] (N·m/A) is not provided by [`uom`] and is needed to
//! size electric motors.

mod dimension;
mod quantities;

pub use dimension::{Dimension, SiQuantity};
pub use quantities::TorqueConstant;
