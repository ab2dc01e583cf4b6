//! Stream state between components.
//!
//! A connection carries mass flow, pressure, specific enthalpy and a
//! mass-fraction vector over the network species. Each quantity is either
//! fixed by the user or free for the solver. Components only read
//! connections; the solver writes the free values between iterations.

use crate::error::{ComponentError, ComponentResult};
use cf_core::units::{MassRate, Pressure, Temperature};
use cf_fluids::{Composition, Species};
use uom::si::mass_rate::kilogram_per_second;
use uom::si::pressure::pascal;
use uom::si::thermodynamic_temperature::kelvin;

/// Named slot of a component a connection is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    In1,
    In2,
    Out1,
}

impl Port {
    pub const ALL: [Port; 3] = [Port::In1, Port::In2, Port::Out1];

    pub fn index(self) -> usize {
        match self {
            Port::In1 => 0,
            Port::In2 => 1,
            Port::Out1 => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Port::In1 => "in1",
            Port::In2 => "in2",
            Port::Out1 => "out1",
        }
    }

    pub fn is_inlet(self) -> bool {
        !matches!(self, Port::Out1)
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One scalar of a connection's state vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateVar {
    MassFlow,
    Pressure,
    Enthalpy,
    /// Mass fraction of the species at this index of the network list.
    Fraction(usize),
}

/// Current value plus whether the user fixed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateValue {
    pub value: f64,
    pub fixed: bool,
}

impl StateValue {
    fn free(value: f64) -> Self {
        Self {
            value,
            fixed: false,
        }
    }
}

/// Default starting mass flow for free streams [kg/s].
pub const DEFAULT_MASS_FLOW_START: f64 = 1.0;

/// Default starting pressure for free streams [Pa].
pub const DEFAULT_PRESSURE_START: f64 = 1.0e5;

/// A stream between two components (or a boundary and a component).
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    label: String,
    m: StateValue,
    p: StateValue,
    h: StateValue,
    /// Whether `h.value` holds a meaningful enthalpy (fixed, seeded or solved).
    h_seeded: bool,
    fluid: Composition,
    fluid_fixed: Vec<bool>,
    temperature: Option<f64>,
    temperature_start: Option<f64>,
}

impl Connection {
    /// New connection over the network species with every quantity free.
    pub fn new(label: impl Into<String>, species: &[Species]) -> Self {
        Self {
            label: label.into(),
            m: StateValue::free(DEFAULT_MASS_FLOW_START),
            p: StateValue::free(DEFAULT_PRESSURE_START),
            h: StateValue::free(0.0),
            h_seeded: false,
            fluid: Composition::zeros(species),
            fluid_fixed: vec![false; species.len()],
            temperature: None,
            temperature_start: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Mass flow rate [kg/s].
    pub fn m(&self) -> f64 {
        self.m.value
    }

    /// Pressure [Pa].
    pub fn p(&self) -> f64 {
        self.p.value
    }

    /// Specific enthalpy [J/kg].
    pub fn h(&self) -> f64 {
        self.h.value
    }

    pub fn fluid(&self) -> &Composition {
        &self.fluid
    }

    pub fn mass_flow(&self) -> MassRate {
        MassRate::new::<kilogram_per_second>(self.m.value)
    }

    pub fn pressure(&self) -> Pressure {
        Pressure::new::<pascal>(self.p.value)
    }

    /// User-specified temperature, if any.
    pub fn temperature_spec(&self) -> Option<Temperature> {
        self.temperature.map(Temperature::new::<kelvin>)
    }

    /// Starting temperature used to seed a free enthalpy.
    pub fn temperature_start(&self) -> Option<Temperature> {
        self.temperature_start.map(Temperature::new::<kelvin>)
    }

    pub fn has_enthalpy_seed(&self) -> bool {
        self.h_seeded
    }

    pub fn num_fractions(&self) -> usize {
        self.fluid.len()
    }

    pub fn fluid_fully_fixed(&self) -> bool {
        self.fluid_fixed.iter().all(|&f| f)
    }

    pub fn value(&self, var: StateVar) -> f64 {
        match var {
            StateVar::MassFlow => self.m.value,
            StateVar::Pressure => self.p.value,
            StateVar::Enthalpy => self.h.value,
            StateVar::Fraction(i) => self.fluid.get(i),
        }
    }

    pub fn is_fixed(&self, var: StateVar) -> bool {
        match var {
            StateVar::MassFlow => self.m.fixed,
            StateVar::Pressure => self.p.fixed,
            StateVar::Enthalpy => self.h.fixed,
            StateVar::Fraction(i) => self.fluid_fixed.get(i).copied().unwrap_or(true),
        }
    }

    /// Overwrite a state value without touching its fixed flag.
    ///
    /// Used by the solver for iteration updates and by tests that evaluate
    /// residuals at arbitrary states.
    pub fn set_value(&mut self, var: StateVar, value: f64) {
        match var {
            StateVar::MassFlow => self.m.value = value,
            StateVar::Pressure => self.p.value = value,
            StateVar::Enthalpy => {
                self.h.value = value;
                self.h_seeded = true;
            }
            StateVar::Fraction(i) => {
                if i < self.fluid.len() {
                    self.fluid.set(i, value);
                }
            }
        }
    }

    /// State vector layout of this connection: m, p, h, then fractions.
    pub fn state_vars(&self) -> impl Iterator<Item = StateVar> + '_ {
        [StateVar::MassFlow, StateVar::Pressure, StateVar::Enthalpy]
            .into_iter()
            .chain((0..self.fluid.len()).map(StateVar::Fraction))
    }

    pub fn set_mass_flow(&mut self, m: MassRate) -> ComponentResult<()> {
        let v = m.get::<kilogram_per_second>();
        if !v.is_finite() || v < 0.0 {
            return Err(ComponentError::InvalidConfiguration {
                what: format!("{}: mass flow must be finite and non-negative, got {v}", self.label),
            });
        }
        self.m = StateValue {
            value: v,
            fixed: true,
        };
        Ok(())
    }

    pub fn unset_mass_flow(&mut self) {
        self.m.fixed = false;
    }

    pub fn set_pressure(&mut self, p: Pressure) -> ComponentResult<()> {
        let v = p.get::<pascal>();
        if !v.is_finite() || v <= 0.0 {
            return Err(ComponentError::InvalidConfiguration {
                what: format!("{}: pressure must be positive, got {v}", self.label),
            });
        }
        self.p = StateValue {
            value: v,
            fixed: true,
        };
        Ok(())
    }

    pub fn unset_pressure(&mut self) {
        self.p.fixed = false;
    }

    pub fn set_enthalpy(&mut self, h: f64) -> ComponentResult<()> {
        if !h.is_finite() {
            return Err(ComponentError::InvalidConfiguration {
                what: format!("{}: enthalpy must be finite", self.label),
            });
        }
        self.h = StateValue {
            value: h,
            fixed: true,
        };
        self.h_seeded = true;
        Ok(())
    }

    pub fn unset_enthalpy(&mut self) {
        self.h.fixed = false;
    }

    /// Specify the stream temperature. Fixing both enthalpy and temperature
    /// over-determines the stream and is rejected.
    pub fn set_temperature(&mut self, t: Temperature) -> ComponentResult<()> {
        let v = t.get::<kelvin>();
        if !v.is_finite() || v <= 0.0 {
            return Err(ComponentError::InvalidConfiguration {
                what: format!("{}: temperature must be positive, got {v}", self.label),
            });
        }
        if self.h.fixed {
            return Err(ComponentError::InvalidConfiguration {
                what: format!("{}: enthalpy and temperature cannot both be fixed", self.label),
            });
        }
        self.temperature = Some(v);
        Ok(())
    }

    pub fn unset_temperature(&mut self) {
        self.temperature = None;
    }

    /// Fix every mass fraction to `comp`, expanded to the network species.
    pub fn set_fluid(&mut self, comp: &Composition) -> ComponentResult<()> {
        let species: Vec<Species> = self.fluid.species().collect();
        let expanded = comp
            .expand_to(&species)
            .map_err(|e| ComponentError::InvalidConfiguration {
                what: format!("{}: {e}", self.label),
            })?;
        self.fluid = expanded;
        self.fluid_fixed.iter_mut().for_each(|f| *f = true);
        Ok(())
    }

    pub fn unset_fluid(&mut self) {
        self.fluid_fixed.iter_mut().for_each(|f| *f = false);
    }

    pub fn set_mass_flow_start(&mut self, m: MassRate) {
        if !self.m.fixed {
            self.m.value = m.get::<kilogram_per_second>();
        }
    }

    pub fn set_pressure_start(&mut self, p: Pressure) {
        if !self.p.fixed {
            self.p.value = p.get::<pascal>();
        }
    }

    pub fn set_enthalpy_start(&mut self, h: f64) {
        if !self.h.fixed {
            self.h.value = h;
            self.h_seeded = true;
        }
    }

    pub fn set_temperature_start(&mut self, t: Temperature) {
        self.temperature_start = Some(t.get::<kelvin>());
    }

    /// Seed free fractions from `comp` (expanded to the network species).
    pub fn set_fluid_start(&mut self, comp: &Composition) -> ComponentResult<()> {
        let species: Vec<Species> = self.fluid.species().collect();
        let expanded = comp
            .expand_to(&species)
            .map_err(|e| ComponentError::InvalidConfiguration {
                what: format!("{}: {e}", self.label),
            })?;
        for i in 0..expanded.len() {
            if !self.fluid_fixed[i] {
                self.fluid.set(i, expanded.get(i));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::units::{bar, celsius, kgps};

    fn species() -> Vec<Species> {
        vec![Species::N2, Species::O2, Species::CH4]
    }

    #[test]
    fn new_connection_is_free() {
        let c = Connection::new("c1", &species());
        assert_eq!(c.state_vars().count(), 6);
        assert!(c.state_vars().all(|v| !c.is_fixed(v)));
        assert!(!c.has_enthalpy_seed());
    }

    #[test]
    fn fixing_fluid_expands_to_network_species() {
        let mut c = Connection::new("air", &species());
        let air =
            Composition::new_mass_fractions(vec![(Species::O2, 0.23), (Species::N2, 0.77)])
                .unwrap();
        c.set_fluid(&air).unwrap();
        assert!(c.fluid_fully_fixed());
        assert!((c.value(StateVar::Fraction(0)) - 0.77).abs() < 1e-12);
        assert_eq!(c.value(StateVar::Fraction(2)), 0.0);
    }

    #[test]
    fn fluid_with_unknown_species_is_rejected() {
        let mut c = Connection::new("fuel", &species());
        let err = c.set_fluid(&Composition::pure(Species::H2)).unwrap_err();
        assert!(matches!(err, ComponentError::InvalidConfiguration { .. }));
    }

    #[test]
    fn enthalpy_and_temperature_conflict() {
        let mut c = Connection::new("c", &species());
        c.set_enthalpy(1.0e5).unwrap();
        assert!(c.set_temperature(celsius(20.0)).is_err());
        c.unset_enthalpy();
        assert!(c.set_temperature(celsius(20.0)).is_ok());
    }

    #[test]
    fn start_values_do_not_override_fixed() {
        let mut c = Connection::new("c", &species());
        c.set_pressure(bar(2.0)).unwrap();
        c.set_pressure_start(bar(5.0));
        c.set_mass_flow_start(kgps(0.4));
        assert_eq!(c.p(), 2.0e5);
        assert_eq!(c.m(), 0.4);
    }

    #[test]
    fn negative_pressure_rejected() {
        let mut c = Connection::new("c", &species());
        assert!(c.set_pressure(bar(-1.0)).is_err());
    }
}
