//! Steady-state network solver for combustion systems.
//!
//! Connections carry mass flow, pressure, enthalpy and mass fractions.
//! Components contribute equation blocks over those states and their own
//! free variables; the solver assembles them into one square system and
//! runs Newton's method on it. Temperatures are either computed from the
//! (p, h, x) state or imposed through an extra equation per connection.

pub mod error;
pub mod initialization;
mod layout;
pub mod network;
pub mod newton;
pub mod solve;

pub use error::{SolverError, SolverResult};
pub use initialization::DEFAULT_START_TEMPERATURE;
pub use network::Network;
pub use newton::{NewtonConfig, NewtonResult, NewtonSystem, newton_solve};
pub use solve::{SolveReport, solve};
