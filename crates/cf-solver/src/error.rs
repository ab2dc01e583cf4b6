//! Error types for solver operations.

use cf_components::ComponentError;
use cf_core::error::CfError;
use cf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during network solving.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Invalid state: {what}")]
    InvalidState { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    /// Postprocessing of a converged state failed.
    #[error("Postprocessing of {component} failed: {source}")]
    Postprocess {
        component: String,
        #[source]
        source: ComponentError,
    },

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for CfError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { what } => CfError::InvalidConfiguration { what },
            SolverError::ConvergenceFailed { what } => CfError::Invariant {
                what: format!("convergence: {what}"),
            },
            SolverError::InvalidState { what } => CfError::Invariant { what },
            SolverError::Component(e) => e.into(),
            SolverError::Fluid(e) => CfError::Invariant {
                what: e.to_string(),
            },
            SolverError::Postprocess { source, .. } => source.into(),
            SolverError::Numeric { what } => CfError::Invariant { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn postprocess_error_keeps_its_source() {
        let err = SolverError::Postprocess {
            component: "cc".to_string(),
            source: ComponentError::UndefinedComputation {
                what: "thermal input is zero".to_string(),
            },
        };
        assert!(err.to_string().contains("cc"));
        assert!(err.source().is_some());
        assert!(matches!(
            CfError::from(err),
            CfError::UndefinedComputation { .. }
        ));
    }
}
