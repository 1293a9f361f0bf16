//! Supporting utilities shared by the analysis engine and its models.
//!
//! - [`bound`]: Numeric bounds checked once at construction, plus runtime
//!   intervals for design-variable limits and output domains.
//! - [`units`]: Bridges between [`uom`] quantities and the dimension-tagged
//!   values exchanged by analysis blocks.

pub mod bound;
pub mod units;
