//! Common utilities for component calculations.

use crate::error::{ComponentError, ComponentResult};
use cf_core::numeric::ensure_finite;
use cf_core::units::constants::{p_ref, t_ref};
use cf_fluids::{Composition, FluidModel, SpecEnthalpy};

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<()> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })?;
    Ok(())
}

/// Enthalpy of `comp` at the reference state (298.15 K, 1 bar) with water
/// held gaseous, which pins energy balances to the lower heating value.
pub fn reference_enthalpy(
    fluid: &dyn FluidModel,
    comp: &Composition,
) -> ComponentResult<SpecEnthalpy> {
    Ok(fluid.h_mix_pt(p_ref(), t_ref(), comp, true)?)
}

/// Mass-fraction derivatives of [`reference_enthalpy`].
pub fn reference_enthalpy_dx(
    fluid: &dyn FluidModel,
    comp: &Composition,
) -> ComponentResult<Vec<f64>> {
    Ok(fluid.dh_mix_dx_pt(p_ref(), t_ref(), comp, true)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_fluids::{IdealGasModel, Species};

    #[test]
    fn finite_check() {
        assert!(check_finite(1.0, "x").is_ok());
        assert!(matches!(
            check_finite(f64::NAN, "x"),
            Err(ComponentError::NonPhysical { what: "x" })
        ));
    }

    #[test]
    fn reference_water_is_vapour() {
        let fluid = IdealGasModel::new();
        let water = Composition::pure(Species::H2O);
        let h = reference_enthalpy(&fluid, &water).unwrap();
        // formation enthalpy of water vapour, -241.8 kJ/mol
        let expected = -241.83e6 / Species::H2O.molar_mass();
        assert!((h - expected).abs() < 1e-3 * expected.abs());
    }
}
