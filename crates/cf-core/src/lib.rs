//! cf-core: shared foundation for combustflow.
//!
//! Contains:
//! - units (uom SI types, constructors, reference state)
//! - numeric (tolerances, finite checks, finite-difference helper)
//! - ids (typed compact ids for connections and components)
//! - error (shared error type)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{CfError, CfResult};
pub use ids::{CompId, ConnId};
pub use numeric::*;
pub use units::*;
