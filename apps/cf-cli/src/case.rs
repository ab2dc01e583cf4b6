//! YAML case files: one chamber fed by an air and a fuel stream.

use crate::error::{CliError, CliResult};
use cf_components::{Component, DiabaticCombustionChamber, Port, Setting, VariableKind};
use cf_core::units::{bar, celsius, kgps};
use cf_core::{CompId, ConnId};
use cf_fluids::{Composition, IdealGasModel, Species};
use cf_solver::{NewtonConfig, Network};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    /// Species carried by every connection, in this order.
    pub species: Vec<String>,
    pub air: Stream,
    pub fuel: Stream,
    #[serde(default)]
    pub flue_gas: Stream,
    pub chamber: ChamberSpec,
    #[serde(default)]
    pub solver: SolverSpec,
}

/// Fixed values and start values of one connection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stream {
    /// Fixed mass fractions by species key; missing species are zero.
    pub fractions: Option<BTreeMap<String, f64>>,
    /// Fixed mass flow [kg/s].
    pub m: Option<f64>,
    pub m_start: Option<f64>,
    pub p_bar: Option<f64>,
    pub p_start_bar: Option<f64>,
    pub t_celsius: Option<f64>,
    pub t_start_celsius: Option<f64>,
}

/// `{fixed: value}` or `{free: start}`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Param {
    pub fixed: Option<f64>,
    pub free: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChamberSpec {
    #[serde(default = "default_label")]
    pub label: String,
    pub lamb: Option<Param>,
    pub ti: Option<Param>,
    pub pr: Option<Param>,
    pub eta: Option<Param>,
}

fn default_label() -> String {
    "combustion chamber".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolverSpec {
    pub max_iterations: Option<usize>,
    pub abs_tol: Option<f64>,
}

impl SolverSpec {
    pub fn config(&self) -> NewtonConfig {
        let mut cfg = NewtonConfig::default();
        if let Some(n) = self.max_iterations {
            cfg.max_iterations = n;
        }
        if let Some(tol) = self.abs_tol {
            cfg.abs_tol = tol;
        }
        cfg
    }
}

/// Network built from a case, with the ids the report needs.
pub struct Plant {
    pub network: Network,
    pub chamber: CompId,
    pub streams: [ConnId; 3],
}

pub fn load(path: &Path) -> CliResult<Case> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&text)?)
}

fn parse_species(key: &str) -> CliResult<Species> {
    key.parse().map_err(|e: &'static str| CliError::Case {
        what: format!("{e}: {key}"),
    })
}

impl Param {
    fn setting(&self, kind: VariableKind) -> CliResult<(Setting, f64)> {
        match (self.fixed, self.free) {
            (Some(v), None) => Ok((Setting::Fixed, v)),
            (None, Some(v)) => Ok((Setting::Free, v)),
            _ => Err(CliError::Case {
                what: format!("{kind} needs exactly one of `fixed` or `free`"),
            }),
        }
    }
}

impl Stream {
    fn apply(&self, network: &mut Network, id: ConnId) -> CliResult<()> {
        let c = network.connection_mut(id)?;
        if let Some(fractions) = &self.fractions {
            let parsed = fractions
                .iter()
                .map(|(key, x)| Ok((parse_species(key)?, *x)))
                .collect::<CliResult<Vec<_>>>()?;
            c.set_fluid(&Composition::new_mass_fractions(parsed)?)?;
        }
        if let Some(m) = self.m {
            c.set_mass_flow(kgps(m))?;
        }
        if let Some(m) = self.m_start {
            c.set_mass_flow_start(kgps(m));
        }
        if let Some(p) = self.p_bar {
            c.set_pressure(bar(p))?;
        }
        if let Some(p) = self.p_start_bar {
            c.set_pressure_start(bar(p));
        }
        if let Some(t) = self.t_celsius {
            c.set_temperature(celsius(t))?;
        }
        if let Some(t) = self.t_start_celsius {
            c.set_temperature_start(celsius(t));
        }
        Ok(())
    }
}

impl Case {
    pub fn build(&self) -> CliResult<Plant> {
        let species = self
            .species
            .iter()
            .map(|s| parse_species(s))
            .collect::<CliResult<Vec<_>>>()?;

        let mut cc = DiabaticCombustionChamber::new(self.chamber.label.as_str(), &species)?;
        let params = [
            (VariableKind::Lamb, self.chamber.lamb),
            (VariableKind::Ti, self.chamber.ti),
            (VariableKind::Pr, self.chamber.pr),
            (VariableKind::Eta, self.chamber.eta),
        ];
        for (kind, param) in params {
            if let Some(param) = param {
                let (setting, value) = param.setting(kind)?;
                cc.set_variable(kind, setting, value)?;
            }
        }

        let mut network = Network::new(species, IdealGasModel::new());
        let chamber = network.add_component(cc)?;
        let streams = [
            network.add_connection("air"),
            network.add_connection("fuel"),
            network.add_connection("flue gas"),
        ];
        for (port, id) in Port::ALL.into_iter().zip(streams) {
            network.connect(chamber, port, id)?;
        }
        self.air.apply(&mut network, streams[0])?;
        self.fuel.apply(&mut network, streams[1])?;
        self.flue_gas.apply(&mut network, streams[2])?;

        Ok(Plant {
            network,
            chamber,
            streams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE: &str = r#"
species: [Ar, N2, H2, O2, CO2, CH4, H2O]
air:
  fractions: {Ar: 0.0129, N2: 0.7553, CO2: 0.0004, O2: 0.2314}
  p_bar: 1.0
  t_celsius: 20.0
  m_start: 0.5
fuel:
  fractions: {CO2: 0.03, H2: 0.01, CH4: 0.96}
  p_bar: 1.2
  t_celsius: 25.0
  m_start: 0.01
flue_gas:
  t_celsius: 1200.0
chamber:
  ti: {fixed: 500000.0}
  pr: {fixed: 0.95}
  eta: {fixed: 1.0}
solver:
  max_iterations: 80
"#;

    #[test]
    fn parses_case_file() {
        let case: Case = serde_yaml::from_str(CASE).unwrap();
        assert_eq!(case.species.len(), 7);
        assert_eq!(case.chamber.label, "combustion chamber");
        assert_eq!(case.chamber.ti.unwrap().fixed, Some(500000.0));
        assert!(case.chamber.lamb.is_none());
        assert_eq!(case.fuel.fractions.as_ref().unwrap()["CH4"], 0.96);
        assert_eq!(case.solver.config().max_iterations, 80);
    }

    #[test]
    fn builds_square_network() {
        let case: Case = serde_yaml::from_str(CASE).unwrap();
        let plant = case.build().unwrap();
        let chamber = plant.network.component(plant.chamber).unwrap();
        assert_eq!(chamber.kind(), "diabatic combustion chamber");
        let flue = plant.network.connection(plant.streams[2]).unwrap();
        assert!(flue.temperature_spec().is_some());
    }

    #[test]
    fn ambiguous_parameter_is_rejected() {
        let text = CASE.replace("pr: {fixed: 0.95}", "pr: {fixed: 0.95, free: 0.9}");
        let case: Case = serde_yaml::from_str(&text).unwrap();
        assert!(matches!(case.build(), Err(CliError::Case { .. })));
    }

    #[test]
    fn unknown_species_is_rejected() {
        let text = CASE.replace("[Ar, N2,", "[Xe, N2,");
        let case: Case = serde_yaml::from_str(&text).unwrap();
        assert!(matches!(case.build(), Err(CliError::Case { .. })));
    }
}
