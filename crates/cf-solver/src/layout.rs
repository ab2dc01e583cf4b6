//! Unknown and equation indexing for one solve.
//!
//! Columns: per connection its free m, p, h and mass fractions, then the
//! free variables of every component. Rows: component equation blocks in
//! component order, then one temperature equation per connection whose
//! specified temperature cannot be turned into a fixed enthalpy up front.

use crate::error::{SolverError, SolverResult};
use crate::network::Network;
use cf_components::{ColumnMap, EquationBlock, PortColumns, StateVar, VariableKind};
use tracing::debug;

/// Quantity behind one column of the Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unknown {
    State { conn: usize, var: StateVar },
    Variable { comp: usize, kind: VariableKind },
}

/// Row range and column lookup of one component.
#[derive(Debug, Clone)]
pub(crate) struct ComponentRows {
    pub ports: [usize; 3],
    pub offset: usize,
    pub blocks: Vec<EquationBlock>,
    pub columns: ColumnMap,
}

impl ComponentRows {
    pub fn num_rows(&self) -> usize {
        self.blocks.iter().map(|b| b.num_eq).sum()
    }
}

/// `h - h(p, T, x) = 0` on one connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TemperatureRow {
    pub conn: usize,
    pub row: usize,
    pub t: f64,
}

#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub unknowns: Vec<Unknown>,
    pub connection_columns: Vec<PortColumns>,
    pub components: Vec<ComponentRows>,
    pub temperature_rows: Vec<TemperatureRow>,
    /// Connections whose enthalpy follows from a fixed p, T and fluid.
    pub enthalpy_from_temperature: Vec<(usize, f64)>,
    pub num_rows: usize,
}

impl Layout {
    pub fn build(network: &Network) -> SolverResult<Self> {
        let wiring = network.resolved_wiring()?;
        let mut unknowns = Vec::new();
        let mut connection_columns = Vec::new();
        let mut temperature_specs = Vec::new();
        let mut enthalpy_from_temperature = Vec::new();

        for (ci, (_, conn)) in network.connections().enumerate() {
            let mut columns = PortColumns {
                fluid: vec![None; conn.num_fractions()],
                ..PortColumns::default()
            };

            let h_fixed = conn.is_fixed(StateVar::Enthalpy);
            let mut h_from_t = false;
            if let Some(t) = conn.temperature_spec() {
                if h_fixed {
                    return Err(SolverError::ProblemSetup {
                        what: format!(
                            "{}: enthalpy and temperature cannot both be fixed",
                            conn.label()
                        ),
                    });
                }
                if conn.is_fixed(StateVar::Pressure) && conn.fluid_fully_fixed() {
                    enthalpy_from_temperature.push((ci, t.value));
                    h_from_t = true;
                } else {
                    temperature_specs.push((ci, t.value));
                }
            }

            for var in conn.state_vars() {
                if conn.is_fixed(var) || (var == StateVar::Enthalpy && h_from_t) {
                    continue;
                }
                let col = Some(unknowns.len());
                match var {
                    StateVar::MassFlow => columns.m = col,
                    StateVar::Pressure => columns.p = col,
                    StateVar::Enthalpy => columns.h = col,
                    StateVar::Fraction(i) => columns.fluid[i] = col,
                }
                unknowns.push(Unknown::State { conn: ci, var });
            }
            connection_columns.push(columns);
        }

        let mut components = Vec::new();
        let mut offset = 0;
        for (i, ((_, comp), ports)) in network.components().zip(wiring).enumerate() {
            let mut columns = ColumnMap::default();
            for (slot, &conn) in columns.ports.iter_mut().zip(&ports) {
                *slot = connection_columns[conn].clone();
            }
            for kind in comp.free_variables() {
                columns.variables[kind.index()] = Some(unknowns.len());
                unknowns.push(Unknown::Variable { comp: i, kind });
            }
            let rows = ComponentRows {
                ports,
                offset,
                blocks: comp.equation_blocks(),
                columns,
            };
            offset += rows.num_rows();
            components.push(rows);
        }

        let temperature_rows: Vec<TemperatureRow> = temperature_specs
            .into_iter()
            .enumerate()
            .map(|(k, (conn, t))| TemperatureRow {
                conn,
                row: offset + k,
                t,
            })
            .collect();
        let num_rows = offset + temperature_rows.len();

        debug!(
            equations = num_rows,
            unknowns = unknowns.len(),
            components = components.len(),
            "network layout"
        );
        if num_rows != unknowns.len() {
            return Err(SolverError::ProblemSetup {
                what: format!(
                    "{num_rows} equations for {} unknowns; the network is {}-determined",
                    unknowns.len(),
                    if num_rows > unknowns.len() { "over" } else { "under" }
                ),
            });
        }

        Ok(Self {
            unknowns,
            connection_columns,
            components,
            temperature_rows,
            enthalpy_from_temperature,
            num_rows,
        })
    }

    pub fn dimension(&self) -> usize {
        self.unknowns.len()
    }
}
