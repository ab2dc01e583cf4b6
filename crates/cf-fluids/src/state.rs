//! Scalar property aliases.
//!
//! Specific quantities are not part of uom's standard set used here, so they
//! are plain `f64` in SI units.

/// Specific enthalpy [J/kg].
pub type SpecEnthalpy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Mass fraction [-].
pub type MassFraction = f64;
