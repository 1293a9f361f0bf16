use std::time::Duration;

use crate::support::bound::{Bounded, StrictlyPositive, UnitIntervalLowerOpen};

/// Solver settings for one run of the engine.
///
/// The defaults suit well-conditioned sizing loops:
/// - `tolerance`: 1e-6 relative change per pass
/// - `max_iterations`: 50 passes per cycle
/// - `relaxation`: 1.0 (no damping)
/// - `delta_floor`: 1e-9, the denominator floor for quantities near zero
/// - `time_budget`: none
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// A cycle converges once the largest relative change of a pass drops below this.
    pub tolerance: Bounded<f64, StrictlyPositive>,

    /// Maximum Gauss-Seidel passes per cycle.
    pub max_iterations: Bounded<usize, StrictlyPositive>,

    /// Under-relaxation factor `α`; each cycle quantity is updated to
    /// `α·new + (1 − α)·old`.
    pub relaxation: Bounded<f64, UnitIntervalLowerOpen>,

    /// Lower bound on `|old|` when computing relative changes.
    pub delta_floor: Bounded<f64, StrictlyPositive>,

    /// Wall-clock budget for the whole run, checked before every cycle pass.
    pub time_budget: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tolerance: Bounded::new_unchecked(1e-6),
            max_iterations: Bounded::new_unchecked(50),
            relaxation: Bounded::new_unchecked(1.0),
            delta_floor: Bounded::new_unchecked(1e-9),
            time_budget: None,
        }
    }
}

impl RunOptions {
    /// Returns these options with a different relaxation factor.
    #[must_use]
    pub fn with_relaxation(mut self, relaxation: Bounded<f64, UnitIntervalLowerOpen>) -> Self {
        self.relaxation = relaxation;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: Bounded<usize, StrictlyPositive>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Bounded<f64, StrictlyPositive>) -> Self {
        self.tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}
