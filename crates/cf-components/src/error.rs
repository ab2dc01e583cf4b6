//! Error types for component operations.

use cf_core::error::CfError;
use cf_fluids::FluidError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// User input rejected when it is set.
    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },

    /// A derived quantity has no defined value at the current state.
    #[error("Undefined computation: {what}")]
    UndefinedComputation { what: String },

    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<FluidError> for ComponentError {
    fn from(e: FluidError) -> Self {
        ComponentError::Backend {
            message: format!("Fluid model error: {}", e),
        }
    }
}

impl From<ComponentError> for CfError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::InvalidConfiguration { what } => CfError::InvalidConfiguration { what },
            ComponentError::UndefinedComputation { what } => CfError::UndefinedComputation { what },
            ComponentError::NonPhysical { what } => CfError::Invariant {
                what: what.to_string(),
            },
            ComponentError::Backend { message } => CfError::Invariant { what: message },
            ComponentError::InvalidArg { what } => CfError::InvalidArg {
                what: what.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::InvalidConfiguration {
            what: "eta = 1.2 above maximum 1".into(),
        };
        assert!(err.to_string().contains("eta = 1.2"));
    }

    #[test]
    fn error_conversion() {
        let err: CfError = ComponentError::UndefinedComputation {
            what: "efficiency".into(),
        }
        .into();
        assert!(matches!(err, CfError::UndefinedComputation { .. }));
    }

    #[test]
    fn fluid_error_becomes_backend() {
        let err: ComponentError = FluidError::NonPhysical { what: "pressure" }.into();
        assert!(matches!(err, ComponentError::Backend { .. }));
    }
}
