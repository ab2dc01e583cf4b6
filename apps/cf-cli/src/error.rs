use cf_components::ComponentError;
use cf_fluids::FluidError;
use cf_solver::SolverError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Case file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid case: {what}")]
    Case { what: String },

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error(transparent)]
    Fluid(#[from] FluidError),
}

pub type CliResult<T> = Result<T, CliError>;
