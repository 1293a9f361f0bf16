use thiserror::Error;

use crate::support::units::Dimension;

use crate::mda::quantity::Producer;

/// Errors detected while assembling the block network.
///
/// Every structural problem is caught here, before any block runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Two blocks (or parameters) claim the same output.
    #[error("`{quantity}` is produced by both {first} and {second}")]
    DuplicateOutput {
        quantity: String,
        first: Producer,
        second: Producer,
    },

    /// A quantity is declared with two different dimensions.
    #[error("`{quantity}` declared as `{expected}` but {declared_by} uses `{found}`")]
    UnitMismatch {
        quantity: String,
        expected: Dimension,
        found: Dimension,
        declared_by: String,
    },

    /// Something consumes a quantity that nothing produces.
    #[error("`{quantity}` is required by {required_by} but produced by nothing")]
    UnresolvedInput {
        quantity: String,
        required_by: String,
    },

    #[error("block id `{id}` is registered twice")]
    DuplicateBlock { id: String },

    #[error("constraint `{name}` is registered twice")]
    DuplicateConstraint { name: String },

    /// A block reads a constraint as if it were a quantity.
    #[error("constraint `{constraint}` is used as an input of block `{block}`")]
    ConstraintAsInput { constraint: String, block: String },

    /// A bootstrap must write exactly one quantity.
    #[error("bootstrap `{id}` declares {outputs} outputs, expected exactly one")]
    InvalidBootstrap { id: String, outputs: usize },

    #[error("`{quantity}` already has bootstrap `{first}`; `{second}` would be a second one")]
    DuplicateBootstrap {
        quantity: String,
        first: String,
        second: String,
    },

    /// A cycle's first pass cannot start.
    ///
    /// Starting from the bootstrapped quantities, every block of the cycle
    /// must become runnable once the blocks before it have run. `quantity`
    /// is a cycle input that is still unavailable when no block can run;
    /// bootstrapping it (or another quantity upstream of it) fixes the plan.
    #[error("cycle [{}] needs a bootstrap for `{quantity}`", .blocks.join(", "))]
    MissingBootstrap { blocks: Vec<String>, quantity: String },

    /// A bootstrap's own inputs depend on the cycle it seeds.
    #[error("bootstrap `{bootstrap}` depends on the cycle it seeds through `{quantity}`")]
    BootstrapInCycle { bootstrap: String, quantity: String },

    /// A bootstrap targets a quantity that is not part of any cycle.
    #[error("bootstrap `{bootstrap}` seeds `{quantity}`, which is not part of a cycle")]
    BootstrapOutsideCycle { bootstrap: String, quantity: String },

    /// An uncertainty deviation names an output its block does not declare.
    #[error("block `{block}` has no output `{quantity}` to apply a deviation to")]
    UnknownDeviationOutput { block: String, quantity: String },
}
