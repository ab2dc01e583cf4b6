//! cf-components: combustion chamber models for steady network solving.
//!
//! Components contribute blocks of residual equations over the states of
//! the connections attached to their ports and, optionally, over their own
//! free variables. Each equation has an analytic Jacobian row, written into
//! a [`JacobianView`] of the solver's matrix.
//!
//! - [`CombustionChamber`]: adiabatic, equal pressures at all ports
//! - [`DiabaticCombustionChamber`]: pressure ratio and combustion efficiency
//!
//! # Example
//!
//! ```
//! use cf_components::{Component, DiabaticCombustionChamber, VariableKind};
//! use cf_fluids::Species;
//!
//! let species = [Species::Ar, Species::N2, Species::O2, Species::CO2, Species::CH4, Species::H2O];
//! let mut cc = DiabaticCombustionChamber::new("cc", &species).unwrap();
//! cc.set_fixed(VariableKind::Pr, 0.95).unwrap();
//! cc.set_fixed(VariableKind::Eta, 0.9).unwrap();
//! assert_eq!(cc.num_equations(), 1 + species.len() + 2);
//! assert!(cc.set_fixed(VariableKind::QLoss, -1.0e4).is_err());
//! ```

pub mod combustion;
pub mod common;
pub mod connection;
pub mod diabatic;
pub mod diagnostic;
pub mod error;
pub mod fuel;
pub mod jacobian;
pub mod report;
pub mod traits;
pub mod variable;

#[cfg(test)]
mod test_support;

pub use combustion::{CombustionChamber, CombustionModel, OxygenBalance};
pub use connection::{Connection, Port, StateVar};
pub use diabatic::DiabaticCombustionChamber;
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{ComponentError, ComponentResult};
pub use fuel::{Chemistry, Fuel};
pub use jacobian::{AssemblyPass, Column, ColumnMap, JacobianView, PortColumns};
pub use report::EquationReport;
pub use traits::{Component, EquationBlock, EvalContext, PortStates};
pub use variable::{Bound, ComponentVariable, Setting, VariableDescriptor, VariableKind};
