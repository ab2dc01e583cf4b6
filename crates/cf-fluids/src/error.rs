//! Fluid property errors.

use cf_core::CfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative pressure, temperature, fractions).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value outside the validity range of the property correlation.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Species or operation the backend cannot handle.
    #[error("Not supported: {what}")]
    NotSupported { what: String },

    /// Iterative inversion (e.g. T from p, h) failed.
    #[error("Convergence failed for {what}")]
    ConvergenceFailed { what: &'static str },
}

impl From<FluidError> for CfError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => CfError::Invariant {
                what: format!("non-physical fluid value: {what}"),
            },
            FluidError::OutOfRange { what, value } => CfError::InvalidArg {
                what: format!("fluid value out of range: {what} = {value}"),
            },
            FluidError::InvalidArg { what } => CfError::InvalidArg {
                what: format!("invalid fluid argument: {what}"),
            },
            FluidError::NotSupported { what } => CfError::InvalidConfiguration {
                what: format!("fluid operation not supported: {what}"),
            },
            FluidError::ConvergenceFailed { what } => CfError::Invariant {
                what: format!("fluid convergence failed: {what}"),
            },
        }
    }
}
