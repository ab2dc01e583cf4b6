//! Shared fixtures for component unit tests.

use crate::connection::{Connection, Port, StateVar};
use crate::jacobian::{AssemblyPass, ColumnMap, JacobianView, PortColumns};
use crate::traits::{Component, EvalContext, PortStates};
use crate::variable::VariableKind;
use cf_core::numeric::fd_step;
use cf_core::units::{k, pa};
use cf_fluids::{Composition, FluidModel, IdealGasModel, Species};
use nalgebra::DMatrix;

pub(crate) fn network_species() -> Vec<Species> {
    vec![
        Species::Ar,
        Species::N2,
        Species::H2,
        Species::O2,
        Species::CO2,
        Species::CH4,
        Species::H2O,
    ]
}

pub(crate) fn air() -> Composition {
    Composition::new_mass_fractions(vec![
        (Species::Ar, 0.0129),
        (Species::N2, 0.7553),
        (Species::CO2, 0.0004),
        (Species::O2, 0.2314),
    ])
    .unwrap()
}

pub(crate) fn fuel_gas() -> Composition {
    Composition::new_mass_fractions(vec![
        (Species::CO2, 0.03),
        (Species::H2, 0.01),
        (Species::CH4, 0.96),
    ])
    .unwrap()
}

/// Air, fuel and product streams around one chamber.
#[derive(Clone)]
pub(crate) struct Fixture {
    pub fluid: IdealGasModel,
    pub in1: Connection,
    pub in2: Connection,
    pub out1: Connection,
    /// Supplied over stoichiometric oxygen.
    pub lambda: f64,
}

impl Fixture {
    pub fn lean() -> Self {
        Self::with_air_flow(0.35)
    }

    pub fn rich() -> Self {
        Self::with_air_flow(0.08)
    }

    /// Inlets at 1 bar / 20 °C (air) and 1.2 bar / 25 °C (fuel); the outlet
    /// carries the complete reaction products at 0.95 bar and 1200 °C.
    pub fn with_air_flow(m_air: f64) -> Self {
        let species = network_species();
        let fluid = IdealGasModel::new();
        let m_fuel = 0.0102;

        let stream = |label: &str, comp: &Composition, m: f64, p: f64, t: f64| {
            let mut c = Connection::new(label, &species);
            c.set_fluid_start(comp).unwrap();
            c.set_value(StateVar::MassFlow, m);
            c.set_value(StateVar::Pressure, p);
            let h = fluid.h_mix_pt(pa(p), k(t), c.fluid(), false).unwrap();
            c.set_value(StateVar::Enthalpy, h);
            c
        };
        let in1 = stream("air", &air(), m_air, 1.0e5, 293.15);
        let in2 = stream("fuel", &fuel_gas(), m_fuel, 1.2e5, 298.15);

        let flow =
            |s: Species| m_air * air().mass_fraction(s) + m_fuel * fuel_gas().mass_fraction(s);
        let n_ch4 = flow(Species::CH4) / Species::CH4.molar_mass();
        let n_h2 = flow(Species::H2) / Species::H2.molar_mass();
        let supplied = flow(Species::O2) / Species::O2.molar_mass();
        let demand = 2.0 * n_ch4 + 0.5 * n_h2;
        let phi = (supplied / demand).min(1.0);

        let products: Vec<f64> = species
            .iter()
            .map(|&s| {
                let reacted = match s {
                    Species::CO2 => n_ch4 * s.molar_mass(),
                    Species::H2O => (2.0 * n_ch4 + n_h2) * s.molar_mass(),
                    Species::O2 => -demand * s.molar_mass(),
                    Species::CH4 => -n_ch4 * s.molar_mass(),
                    Species::H2 => -n_h2 * s.molar_mass(),
                    _ => 0.0,
                };
                (flow(s) + phi * reacted).max(0.0)
            })
            .collect();
        let m_out = m_air + m_fuel;

        let mut out1 = Connection::new("flue gas", &species);
        out1.set_value(StateVar::MassFlow, m_out);
        out1.set_value(StateVar::Pressure, 0.95e5);
        for (i, f) in products.iter().enumerate() {
            out1.set_value(StateVar::Fraction(i), f / m_out);
        }
        let h = fluid
            .h_mix_pt(pa(0.95e5), k(1473.15), out1.fluid(), false)
            .unwrap();
        out1.set_value(StateVar::Enthalpy, h);

        Self {
            fluid,
            in1,
            in2,
            out1,
            lambda: supplied / demand,
        }
    }

    pub fn port_mut(&mut self, port: Port) -> &mut Connection {
        match port {
            Port::In1 => &mut self.in1,
            Port::In2 => &mut self.in2,
            Port::Out1 => &mut self.out1,
        }
    }

    pub fn ctx(&self) -> EvalContext<'_> {
        EvalContext {
            fluid: &self.fluid,
            ports: PortStates {
                in1: &self.in1,
                in2: &self.in2,
                out1: &self.out1,
            },
        }
    }
}

fn residuals<C: Component>(component: &C, fx: &Fixture) -> Vec<f64> {
    let mut out = Vec::new();
    component.residuals(&fx.ctx(), &mut out).unwrap();
    out
}

/// Compare the analytic Jacobian of `component` at `fx` with central
/// differences of its residuals, column by column.
pub(crate) fn check_derivatives<C: Component + Clone>(component: &C, fx: &Fixture) {
    let ports = fx.ctx().ports;
    let mut columns = ColumnMap::default();
    let mut perturbed: Vec<(usize, Option<(Port, StateVar)>, Option<VariableKind>)> = Vec::new();
    let mut next = 0;
    for port in Port::ALL {
        let conn = ports.get(port);
        let mut pc = PortColumns {
            fluid: vec![None; conn.num_fractions()],
            ..PortColumns::default()
        };
        for var in conn.state_vars() {
            match var {
                StateVar::MassFlow => pc.m = Some(next),
                StateVar::Pressure => pc.p = Some(next),
                StateVar::Enthalpy => pc.h = Some(next),
                StateVar::Fraction(i) => pc.fluid[i] = Some(next),
            }
            perturbed.push((next, Some((port, var)), None));
            next += 1;
        }
        columns.ports[port.index()] = pc;
    }
    for kind in component.free_variables() {
        columns.variables[kind.index()] = Some(next);
        perturbed.push((next, None, Some(kind)));
        next += 1;
    }

    let rows = component.num_equations();
    let mut jac = DMatrix::zeros(rows, next);
    {
        let mut view = JacobianView::new(&mut jac, 0, rows, &columns);
        component
            .derivatives(&fx.ctx(), &mut view, AssemblyPass::Full)
            .unwrap();
    }

    for (col, state, var) in perturbed {
        let numeric: Vec<f64> = if let Some((port, sv)) = state {
            let x = ports.get(port).value(sv);
            // the stoichiometry rows are strongly curved in the fractions
            let rel = if matches!(sv, StateVar::Fraction(_)) { 1e-8 } else { 1e-6 };
            let step = fd_step(x, rel);
            let at = |v: f64| {
                let mut shifted = fx.clone();
                shifted.port_mut(port).set_value(sv, v);
                residuals(component, &shifted)
            };
            if x - step >= 0.0 {
                let (up, down) = (at(x + step), at(x - step));
                (0..rows).map(|r| (up[r] - down[r]) / (2.0 * step)).collect()
            } else {
                // fluid properties reject negative fractions: second-order
                // forward difference at the lower bound
                let (f0, f1, f2) = (at(x), at(x + step), at(x + 2.0 * step));
                (0..rows)
                    .map(|r| (-3.0 * f0[r] + 4.0 * f1[r] - f2[r]) / (2.0 * step))
                    .collect()
            }
        } else if let Some(kind) = var {
            let x = component.variable(kind).unwrap().value;
            let step = fd_step(x, 1e-6);
            let mut c_up = component.clone();
            c_up.update_free_variable(kind, x + step).unwrap();
            let mut c_down = component.clone();
            c_down.update_free_variable(kind, x - step).unwrap();
            let (up, down) = (residuals(&c_up, fx), residuals(&c_down, fx));
            (0..rows).map(|r| (up[r] - down[r]) / (2.0 * step)).collect()
        } else {
            unreachable!()
        };

        for row in 0..rows {
            let numeric = numeric[row];
            let analytic = jac[(row, col)];
            let scale = jac.row(row).amax().max(numeric.abs());
            assert!(
                (analytic - numeric).abs() <= 1e-5 * scale + 1e-9,
                "row {row}, column {col} ({state:?} {var:?}): \
                 analytic {analytic}, numeric {numeric}"
            );
        }
    }
}
