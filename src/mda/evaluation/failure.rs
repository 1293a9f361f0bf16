use std::fmt;

use thiserror::Error;

use crate::support::bound::Interval;

/// Why a run stopped before producing a consistent design.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Failure {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
}

impl Failure {
    /// The quantity the failure is attributed to.
    #[must_use]
    pub fn quantity(&self) -> &str {
        match self {
            Self::Domain(e) => &e.quantity,
            Self::Convergence(e) => &e.quantity,
        }
    }
}

/// A block produced a physically invalid value, or refused its inputs.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("block `{block}` produced an invalid `{quantity}`: {violation}")]
pub struct DomainError {
    pub block: String,
    pub quantity: String,
    pub violation: DomainViolation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainViolation {
    /// The value was `NaN` or infinite.
    NonFinite { value: f64 },
    /// The value left the output's declared domain.
    OutOfRange { value: f64, domain: Interval },
    /// The block itself rejected its inputs.
    Rejected { reason: String },
}

impl fmt::Display for DomainViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { value } => write!(f, "non-finite value {value}"),
            Self::OutOfRange { value, domain } => write!(f, "{value} is outside {domain}"),
            Self::Rejected { reason } => write!(f, "inputs rejected ({reason})"),
        }
    }
}

/// A cycle did not settle within its budget.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "cycle [{}] stopped after {passes} passes ({limit}); `{quantity}` still changing by {last_delta:e}",
    .blocks.join(", ")
)]
pub struct ConvergenceError {
    /// Blocks of the cycle, in pass order.
    pub blocks: Vec<String>,
    /// The quantity with the largest relative change in the last pass.
    pub quantity: String,
    pub last_delta: f64,
    pub passes: usize,
    /// Largest relative change of each completed pass.
    pub history: Vec<f64>,
    pub limit: ConvergenceLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceLimit {
    Iterations,
    TimeBudget,
}

impl fmt::Display for ConvergenceLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Iterations => "iteration limit",
            Self::TimeBudget => "time budget",
        })
    }
}
