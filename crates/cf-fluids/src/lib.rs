//! cf-fluids: fluid property calculations for combustflow.
//!
//! Provides:
//! - Chemical species definitions (O2, CH4, H2O, etc.)
//! - Mass-fraction compositions over a fixed species list
//! - FluidModel trait for property calculations
//! - Ideal-gas mixture backend (NASA-7 polynomials) with water condensation
//!
//! # Architecture
//!
//! The `FluidModel` trait isolates the rest of combustflow from the property
//! backend. Enthalpies carry the enthalpy of formation, so reaction heat is
//! captured by enthalpy differences between compositions.
//!
//! # Example
//!
//! ```
//! use cf_fluids::{Composition, FluidModel, IdealGasModel, Species};
//! use cf_core::units::{k, pa};
//!
//! let model = IdealGasModel::new();
//! let comp = Composition::pure(Species::N2);
//! let h = model.h_mix_pt(pa(101325.0), k(300.0), &comp, false).unwrap();
//! let t = model.t_mix_ph(pa(101325.0), h, &comp, None).unwrap();
//! assert!((t.value - 300.0).abs() < 1e-6);
//! ```

pub mod composition;
pub mod error;
pub mod ideal_gas;
pub mod model;
pub mod nasa;
pub mod species;
pub mod state;
pub mod water;

pub use composition::Composition;
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasModel;
pub use model::{FluidModel, T_MAX, T_MIN};
pub use species::Species;
pub use state::{MassFraction, SpecEnthalpy, SpecHeatCapacity};
