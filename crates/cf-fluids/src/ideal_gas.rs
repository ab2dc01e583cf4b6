//! Ideal-gas mixture backend built on NASA-7 polynomials.
//!
//! Mixture enthalpy is the mass-weighted sum of species enthalpies. Water
//! may partly condense: the vapour is capped at the saturation partial
//! pressure and the remainder is charged the latent heat.

use crate::composition::Composition;
use crate::error::FluidResult;
use crate::model::{FluidModel, cp_by_difference, dh_dx_by_difference, validation};
use crate::nasa;
use crate::species::Species;
use crate::state::{SpecEnthalpy, SpecHeatCapacity};
use crate::water;
use cf_core::units::{Pressure, Temperature};

/// Ideal-gas mixture model.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdealGasModel;

impl IdealGasModel {
    pub fn new() -> Self {
        Self
    }

    /// Mass of liquid water per kg of mixture at `(p, t)`.
    pub fn liquid_water_fraction(
        &self,
        p: Pressure,
        t: Temperature,
        comp: &Composition,
        force_gas: bool,
    ) -> FluidResult<f64> {
        let w_water = comp.mass_fraction(Species::H2O);
        if force_gas || w_water <= 0.0 || t.value >= water::T_CRIT {
            return Ok(0.0);
        }
        let p_sat = water::saturation_pressure(t.value)?;
        if p_sat >= p.value {
            return Ok(0.0);
        }

        let n_gas: f64 = comp
            .iter()
            .filter(|(s, _)| *s != Species::H2O)
            .map(|(s, w)| w / s.molar_mass())
            .sum();
        let y_sat = p_sat / p.value;
        let n_vapour_max = y_sat * n_gas / (1.0 - y_sat);
        Ok((w_water - n_vapour_max * Species::H2O.molar_mass()).max(0.0))
    }

    fn check(&self, p: Pressure, t: Temperature, comp: &Composition) -> FluidResult<()> {
        validation::validate_pressure(p)?;
        validation::validate_temperature(t)?;
        validation::validate_fractions(comp)
    }
}

impl FluidModel for IdealGasModel {
    fn name(&self) -> &str {
        "ideal-gas (NASA-7)"
    }

    fn supports_composition(&self, comp: &Composition) -> bool {
        !comp.is_empty()
    }

    fn h_mix_pt(
        &self,
        p: Pressure,
        t: Temperature,
        comp: &Composition,
        force_gas: bool,
    ) -> FluidResult<SpecEnthalpy> {
        self.check(p, t, comp)?;
        let gas: f64 = comp
            .iter()
            .map(|(s, w)| w * nasa::specific_enthalpy(s, t.value))
            .sum();
        let liquid = self.liquid_water_fraction(p, t, comp, force_gas)?;
        let h = gas - liquid * water::latent_heat(t.value);
        validation::validate_enthalpy(h)?;
        Ok(h)
    }

    fn dh_mix_dx_pt(
        &self,
        p: Pressure,
        t: Temperature,
        comp: &Composition,
        force_gas: bool,
    ) -> FluidResult<Vec<f64>> {
        self.check(p, t, comp)?;
        if self.liquid_water_fraction(p, t, comp, force_gas)? > 0.0 {
            return dh_dx_by_difference(self, p, t, comp, force_gas);
        }
        Ok(comp
            .species()
            .map(|s| nasa::specific_enthalpy(s, t.value))
            .collect())
    }

    fn cp_mix_pt(
        &self,
        p: Pressure,
        t: Temperature,
        comp: &Composition,
        force_gas: bool,
    ) -> FluidResult<SpecHeatCapacity> {
        self.check(p, t, comp)?;
        if self.liquid_water_fraction(p, t, comp, force_gas)? > 0.0 {
            return cp_by_difference(self, p, t, comp, force_gas);
        }
        let cp: f64 = comp
            .iter()
            .map(|(s, w)| w * nasa::specific_cp(s, t.value))
            .sum();
        validation::validate_cp(cp)?;
        Ok(cp)
    }
}
