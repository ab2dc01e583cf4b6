//! Fuel data and reaction bookkeeping over the network species list.
//!
//! Complete combustion of `C_c H_h` consumes `c + h/4` mol O2 and yields
//! `c` mol CO2 and `h/2` mol H2O per mol fuel.

use crate::error::{ComponentError, ComponentResult};
use cf_fluids::Species;

const HF_CO2: f64 = -393.5;
const HF_H2O_GAS: f64 = -241.826;

/// Standard enthalpy of formation of a supported fuel [kJ/mol].
pub fn formation_enthalpy(species: Species) -> Option<f64> {
    match species {
        Species::CH4 => Some(-74.85),
        Species::Ethane => Some(-84.68),
        Species::Propane => Some(-103.8),
        Species::Butane => Some(-125.6),
        Species::H2 => Some(0.0),
        _ => None,
    }
}

/// Combustible species with its reaction data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fuel {
    pub species: Species,
    pub carbon: f64,
    pub hydrogen: f64,
    /// Lower heating value [J/kg].
    pub lhv: f64,
}

impl Fuel {
    /// Reaction data for `species`, or `None` if it does not burn here.
    pub fn new(species: Species) -> Option<Self> {
        let hf = formation_enthalpy(species)?;
        let carbon = f64::from(species.carbon_atoms());
        let hydrogen = f64::from(species.hydrogen_atoms());
        // kJ/mol over kg/kmol gives MJ/kg
        let released = -(carbon * HF_CO2 + hydrogen / 2.0 * HF_H2O_GAS - hf);
        let lhv = released / species.molar_mass() * 1.0e6;
        Some(Self {
            species,
            carbon,
            hydrogen,
            lhv,
        })
    }

    /// mol O2 per mol fuel.
    pub fn oxygen_demand(&self) -> f64 {
        self.carbon + self.hydrogen / 4.0
    }
}

/// Reaction layout resolved against the network species order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chemistry {
    species: Vec<Species>,
    o2: usize,
    co2: usize,
    h2o: usize,
    fuels: Vec<(usize, Fuel)>,
}

impl Chemistry {
    /// Resolve species indices; O2, CO2, H2O and one fuel are required.
    pub fn new(species: &[Species]) -> ComponentResult<Self> {
        let find = |s: Species| {
            species
                .iter()
                .position(|&x| x == s)
                .ok_or_else(|| ComponentError::InvalidConfiguration {
                    what: format!("combustion requires {s} in the network species"),
                })
        };
        let o2 = find(Species::O2)?;
        let co2 = find(Species::CO2)?;
        let h2o = find(Species::H2O)?;

        let fuels: Vec<(usize, Fuel)> = species
            .iter()
            .enumerate()
            .filter_map(|(i, &s)| Fuel::new(s).map(|f| (i, f)))
            .collect();
        if fuels.is_empty() {
            return Err(ComponentError::InvalidConfiguration {
                what: "combustion requires at least one fuel \
                       (CH4, C2H6, C3H8, C4H10, H2) in the network species"
                    .into(),
            });
        }

        Ok(Self {
            species: species.to_vec(),
            o2,
            co2,
            h2o,
            fuels,
        })
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn o2(&self) -> usize {
        self.o2
    }

    pub fn fuels(&self) -> &[(usize, Fuel)] {
        &self.fuels
    }

    /// Fuel data if the species at index `k` is a fuel.
    pub fn fuel_at(&self, k: usize) -> Option<&Fuel> {
        self.fuels.iter().find(|(i, _)| *i == k).map(|(_, f)| f)
    }

    pub fn molar_mass(&self, j: usize) -> f64 {
        self.species[j].molar_mass()
    }

    /// mol of species `j` produced (positive) or consumed per mol of `fuel`.
    pub fn coefficient(&self, j: usize, fuel_index: usize, fuel: &Fuel) -> f64 {
        let mut nu = 0.0;
        if j == self.co2 {
            nu += fuel.carbon;
        }
        if j == self.h2o {
            nu += fuel.hydrogen / 2.0;
        }
        if j == self.o2 {
            nu -= fuel.oxygen_demand();
        }
        if j == fuel_index {
            nu -= 1.0;
        }
        nu
    }
}
