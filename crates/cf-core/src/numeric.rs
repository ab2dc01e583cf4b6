use crate::CfError;

/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    pub const fn new(abs: Real, rel: Real) -> Self {
        Self { abs, rel }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CfError::NonFinite { what, value: v })
    }
}

/// Step used for central differences around `x`.
///
/// Scales with the magnitude of `x` so that pressures (1e5) and mass
/// fractions (1e-2) get comparable relative perturbations.
pub fn fd_step(x: Real, rel: Real) -> Real {
    rel * x.abs().max(1.0)
}

/// Central finite difference of a scalar function.
pub fn central_difference<F, E>(x: Real, rel: Real, mut f: F) -> Result<Real, E>
where
    F: FnMut(Real) -> Result<Real, E>,
{
    let dx = fd_step(x, rel);
    let plus = f(x + dx)?;
    let minus = f(x - dx)?;
    Ok((plus - minus) / (2.0 * dx))
}

/// Clamp a mass fraction into `[0, 1]`.
pub fn clamp_fraction(x: Real) -> Real {
    x.clamp(0.0, 1.0)
}
