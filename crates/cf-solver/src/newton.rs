//! Newton solver with projection onto the admissible state.

use crate::error::{SolverError, SolverResult};
use cf_components::AssemblyPass;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

/// Newton solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance for residual norm
    pub abs_tol: f64,
    /// Relative tolerance for residual norm (against the starting norm)
    pub rel_tol: f64,
    /// Minimum allowed pressure (Pa)
    pub min_pressure: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Only accept steps that reduce the residual norm.
    ///
    /// Off by default: residuals mix kg/s, Pa and W, so the raw norm is a
    /// poor merit function and full projected steps converge faster.
    pub require_decrease: bool,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-6,
            rel_tol: 1e-12,
            min_pressure: 1.0,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            require_decrease: false,
        }
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// A square nonlinear system `F(x) = 0`.
///
/// The Jacobian matrix persists between calls: on [`AssemblyPass::Full`]
/// every row is written, on [`AssemblyPass::VariableOnly`] rows with
/// constant derivatives are left untouched.
pub trait NewtonSystem {
    fn dimension(&self) -> usize;

    fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>>;

    fn jacobian(
        &mut self,
        x: &DVector<f64>,
        jac: &mut DMatrix<f64>,
        pass: AssemblyPass,
    ) -> SolverResult<()>;

    /// Project `x` onto the admissible set (bounds, fraction range).
    fn project(&mut self, x: &mut DVector<f64>, config: &NewtonConfig);
}

fn converged(r_norm: f64, r0_norm: f64, config: &NewtonConfig) -> bool {
    r_norm < config.abs_tol || r_norm < config.rel_tol * r0_norm
}

/// Newton solver with backtracking on invalid trial states.
///
/// A trial is invalid when the residual cannot be evaluated or is not
/// finite (and, with `require_decrease`, when it does not reduce the norm).
pub fn newton_solve<S: NewtonSystem>(
    system: &mut S,
    x0: DVector<f64>,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult> {
    let n = system.dimension();
    if x0.len() != n {
        return Err(SolverError::ProblemSetup {
            what: format!("start vector has {} entries for {n} unknowns", x0.len()),
        });
    }

    let mut x = x0;
    system.project(&mut x, config);
    let mut r = system.residual(&x)?;
    let mut r_norm = r.norm();
    if !r_norm.is_finite() {
        return Err(SolverError::InvalidState {
            what: "residual at the starting point is not finite".to_string(),
        });
    }
    let r0_norm = r_norm;
    let mut jac = DMatrix::zeros(n, n);

    for iter in 0..config.max_iterations {
        trace!(iter, residual_norm = r_norm, "newton iteration");
        if converged(r_norm, r0_norm, config) {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let pass = if iter == 0 {
            AssemblyPass::Full
        } else {
            AssemblyPass::VariableOnly
        };
        system.jacobian(&x, &mut jac, pass)?;

        // Solve J * dx = -r
        let dx = jac
            .clone()
            .lu()
            .solve(&(-&r))
            .ok_or_else(|| SolverError::Numeric {
                what: format!("singular Jacobian at iteration {iter}"),
            })?;

        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..=config.max_line_search_iters {
            let mut x_new = &x + alpha * &dx;
            system.project(&mut x_new, config);
            if let Ok(r_new) = system.residual(&x_new) {
                let r_new_norm = r_new.norm();
                let valid = r_new_norm.is_finite()
                    && (!config.require_decrease || r_new_norm < r_norm);
                if valid {
                    accepted = Some((x_new, r_new, r_new_norm));
                    break;
                }
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            return Err(SolverError::ConvergenceFailed {
                what: format!("Line search stagnated at iteration {iter}"),
            });
        };
        if alpha < 1.0 {
            debug!(iter, alpha, "newton step shortened");
        }

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    if converged(r_norm, r0_norm, config) {
        return Ok(NewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
            converged: true,
        });
    }

    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}
