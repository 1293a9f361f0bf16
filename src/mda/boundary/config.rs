use twine_solvers::equation::bisection;

/// Solver configuration for a constraint-boundary search.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the design variable, in SI units.
    pub variable_tol: f64,

    /// Absolute tolerance on the constraint value.
    pub constraint_tol: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            variable_tol: 1e-9,
            constraint_tol: 1e-9,
        }
    }
}

impl BoundaryConfig {
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.variable_tol,
            x_rel_tol: 0.0,
            residual_tol: self.constraint_tol,
        }
    }
}
