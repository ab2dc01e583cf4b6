use thiserror::Error;

pub type CfResult<T> = Result<T, CfError>;

/// Workspace-wide error. Crate-specific errors convert into this at API edges.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },

    #[error("Undefined computation: {what}")]
    UndefinedComputation { what: String },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
