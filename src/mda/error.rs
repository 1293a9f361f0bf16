use thiserror::Error;

use super::{block::BlockError, store::StoreError};

/// Errors that abort a run before an [`Evaluation`](super::Evaluation) exists.
///
/// These indicate a malformed design point or a model bug. Physical
/// failures during a run (non-finite values, stalled cycles) are not errors
/// here: they are reported through the evaluation's diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RunError {
    /// The design point names a quantity that is not a parameter.
    #[error("unknown design variable `{name}`")]
    UnknownDesignVariable { name: String },

    /// A design variable without a default was omitted.
    #[error("design variable `{name}` has no value and no default")]
    MissingDesignVariable { name: String },

    #[error("design variable `{name}` is NaN")]
    NotANumber { name: String },

    /// A block returned a different number of values than it declares.
    #[error("block `{block}` returned {found} values for {expected} outputs")]
    OutputArity {
        block: String,
        expected: usize,
        found: usize,
    },

    /// A block read its inputs incorrectly.
    #[error("block `{block}` misread its inputs")]
    Block {
        block: String,
        #[source]
        source: BlockError,
    },

    /// A constraint function failed.
    #[error("constraint `{constraint}` could not be evaluated")]
    Constraint {
        constraint: String,
        #[source]
        source: BlockError,
    },

    /// A write or read was refused by the quantity store.
    #[error(transparent)]
    Store(#[from] StoreError),
}
