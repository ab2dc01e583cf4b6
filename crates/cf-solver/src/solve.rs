//! High-level solver interface.

use crate::error::{SolverError, SolverResult};
use crate::initialization::{prepare, start_vector};
use crate::layout::{ComponentRows, Layout, Unknown};
use crate::network::Network;
use crate::newton::{NewtonConfig, NewtonSystem, newton_solve};
use cf_components::{
    AssemblyPass, Component, Connection, Diagnostic, EvalContext, JacobianView, PortStates,
    StateVar,
};
use cf_core::numeric::{central_difference, clamp_fraction};
use cf_core::units::{k, pa};
use cf_fluids::FluidModel;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, info, warn};

/// Outcome of a converged solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    pub iterations: usize,
    pub residual_norm: f64,
    pub num_unknowns: usize,
    /// Postprocessing findings of all components.
    pub diagnostics: Vec<Diagnostic>,
}

fn context<'a>(
    fluid: &'a dyn FluidModel,
    connections: &'a [Connection],
    rows: &ComponentRows,
) -> EvalContext<'a> {
    EvalContext {
        fluid,
        ports: PortStates {
            in1: &connections[rows.ports[0]],
            in2: &connections[rows.ports[1]],
            out1: &connections[rows.ports[2]],
        },
    }
}

/// The network's equations as a Newton system over the layout's unknowns.
struct NetworkSystem<'a> {
    network: &'a mut Network,
    layout: &'a Layout,
}

impl NetworkSystem<'_> {
    fn write_state(&mut self, x: &DVector<f64>) -> SolverResult<()> {
        let (_, connections, components) = self.network.parts_mut();
        for (col, unknown) in self.layout.unknowns.iter().enumerate() {
            match *unknown {
                Unknown::State { conn, var } => connections[conn].set_value(var, x[col]),
                Unknown::Variable { comp, kind } => {
                    components[comp].update_free_variable(kind, x[col])?
                }
            }
        }
        Ok(())
    }

    fn temperature_residual(fluid: &dyn FluidModel, c: &Connection, t: f64) -> SolverResult<f64> {
        Ok(c.h() - fluid.h_mix_pt(pa(c.p()), k(t), c.fluid(), false)?)
    }
}

impl NewtonSystem for NetworkSystem<'_> {
    fn dimension(&self) -> usize {
        self.layout.dimension()
    }

    fn residual(&mut self, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        self.write_state(x)?;
        let network = &*self.network;
        let fluid = network.fluid();
        let connections = network.connections_slice();

        let mut out = Vec::with_capacity(self.layout.num_rows);
        for (rows, comp) in self.layout.components.iter().zip(network.components_slice()) {
            comp.residuals(&context(fluid, connections, rows), &mut out)?;
        }
        for tr in &self.layout.temperature_rows {
            out.push(Self::temperature_residual(fluid, &connections[tr.conn], tr.t)?);
        }
        Ok(DVector::from_vec(out))
    }

    fn jacobian(
        &mut self,
        x: &DVector<f64>,
        jac: &mut DMatrix<f64>,
        pass: AssemblyPass,
    ) -> SolverResult<()> {
        self.write_state(x)?;
        let network = &*self.network;
        let fluid = network.fluid();
        let connections = network.connections_slice();

        for (rows, comp) in self.layout.components.iter().zip(network.components_slice()) {
            let mut row = rows.offset;
            for block in &rows.blocks {
                if pass.includes(block.constant_deriv) {
                    jac.rows_mut(row, block.num_eq).fill(0.0);
                }
                row += block.num_eq;
            }
            let mut view = JacobianView::new(jac, rows.offset, rows.num_rows(), &rows.columns);
            comp.derivatives(&context(fluid, connections, rows), &mut view, pass)?;
        }

        for tr in &self.layout.temperature_rows {
            let c = &connections[tr.conn];
            let columns = &self.layout.connection_columns[tr.conn];
            jac.row_mut(tr.row).fill(0.0);
            if let Some(col) = columns.h {
                jac[(tr.row, col)] = 1.0;
            }
            if let Some(col) = columns.p {
                let dh_dp = central_difference(c.p(), 1e-6, |p| {
                    fluid.h_mix_pt(pa(p), k(tr.t), c.fluid(), false)
                })?;
                jac[(tr.row, col)] = -dh_dp;
            }
            let dh_dx = fluid.dh_mix_dx_pt(pa(c.p()), k(tr.t), c.fluid(), false)?;
            for (i, d) in dh_dx.iter().enumerate() {
                if let Some(col) = columns.fluid.get(i).copied().flatten() {
                    jac[(tr.row, col)] = -d;
                }
            }
        }
        Ok(())
    }

    fn project(&mut self, x: &mut DVector<f64>, config: &NewtonConfig) {
        let (_, _, components) = self.network.parts_mut();
        for (col, unknown) in self.layout.unknowns.iter().enumerate() {
            match *unknown {
                Unknown::State {
                    var: StateVar::Fraction(_),
                    ..
                } => x[col] = clamp_fraction(x[col]),
                Unknown::State {
                    var: StateVar::Pressure,
                    ..
                } => x[col] = x[col].max(config.min_pressure),
                Unknown::State { .. } => {}
                Unknown::Variable { comp, kind } => {
                    let c = &mut components[comp];
                    if c.update_free_variable(kind, x[col]).is_ok() {
                        if let Some(v) = c.variable(kind) {
                            x[col] = v.value;
                        }
                    }
                }
            }
        }
    }
}

/// Run every component's postprocessing once on the converged state.
fn postprocess(network: &mut Network, layout: &Layout) -> SolverResult<Vec<Diagnostic>> {
    let (fluid, connections, components) = network.parts_mut();
    let connections = &*connections;
    let mut diagnostics = Vec::new();
    for (rows, comp) in layout.components.iter().zip(components.iter_mut()) {
        let found = comp
            .calc_parameters(&context(fluid, connections, rows))
            .map_err(|source| SolverError::Postprocess {
                component: comp.label().to_string(),
                source,
            })?;
        for d in &found {
            warn!(component = %d.component, kind = ?d.kind, "{}", d.message);
        }
        diagnostics.extend(found);
    }
    Ok(diagnostics)
}

/// Solve a network.
///
/// This function:
/// 1. Indexes unknowns and equations and checks the system is square
/// 2. Seeds starting values (previous state, start values, inlet mixing)
/// 3. Runs Newton's method on all component and connection equations
/// 4. Writes the solution back and runs postprocessing once
///
/// The network keeps the converged state, so the next solve starts from it.
pub fn solve(network: &mut Network, config: Option<NewtonConfig>) -> SolverResult<SolveReport> {
    let cfg = config.unwrap_or_default();
    let layout = Layout::build(network)?;
    prepare(network, &layout)?;

    let x0 = start_vector(network, &layout);
    let result = {
        let mut system = NetworkSystem {
            network: &mut *network,
            layout: &layout,
        };
        let result = newton_solve(&mut system, x0, &cfg)?;
        system.write_state(&result.x)?;
        result
    };
    info!(
        iterations = result.iterations,
        residual_norm = result.residual_norm,
        "network converged"
    );

    let diagnostics = postprocess(network, &layout)?;
    debug!(count = diagnostics.len(), "postprocessing finished");

    Ok(SolveReport {
        iterations: result.iterations,
        residual_norm: result.residual_norm,
        num_unknowns: layout.dimension(),
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_components::{DiabaticCombustionChamber, Port, VariableKind};
    use cf_core::units::{bar, celsius, kgps};
    use cf_fluids::{Composition, IdealGasModel, Species};

    fn species() -> Vec<Species> {
        vec![Species::N2, Species::O2, Species::CO2, Species::CH4, Species::H2O]
    }

    fn network(air_flow: f64) -> (Network, cf_core::CompId, cf_core::ConnId) {
        let mut nw = Network::new(species(), IdealGasModel::new());
        let mut cc = DiabaticCombustionChamber::new("cc", &species()).unwrap();
        cc.set_fixed(VariableKind::Pr, 0.97).unwrap();
        cc.set_fixed(VariableKind::Eta, 0.95).unwrap();
        let cc = nw.add_component(cc).unwrap();
        let air = nw.add_connection("air");
        let fuel = nw.add_connection("fuel");
        let flue = nw.add_connection("flue gas");
        nw.connect(cc, Port::In1, air).unwrap();
        nw.connect(cc, Port::In2, fuel).unwrap();
        nw.connect(cc, Port::Out1, flue).unwrap();

        let a = nw.connection_mut(air).unwrap();
        a.set_fluid(
            &Composition::new_mass_fractions(vec![(Species::N2, 0.767), (Species::O2, 0.233)])
                .unwrap(),
        )
        .unwrap();
        a.set_mass_flow(kgps(air_flow)).unwrap();
        a.set_pressure(bar(1.0)).unwrap();
        a.set_temperature(celsius(20.0)).unwrap();

        let f = nw.connection_mut(fuel).unwrap();
        f.set_fluid(&Composition::pure(Species::CH4)).unwrap();
        f.set_mass_flow(kgps(0.01)).unwrap();
        f.set_pressure(bar(1.2)).unwrap();
        f.set_temperature(celsius(25.0)).unwrap();
        (nw, cc, flue)
    }

    #[test]
    fn converged_state_closes_the_balances() {
        let (mut nw, cc, flue) = network(0.4);
        let report = solve(&mut nw, None).unwrap();
        assert_eq!(report.num_unknowns, 8);
        assert!(report.residual_norm < 1e-6);

        let out = nw.connection(flue).unwrap();
        assert!((out.m() - 0.41).abs() < 1e-9);
        assert!((out.p() - 0.97e5).abs() < 1e-6);
        assert!((out.fluid().sum() - 1.0).abs() < 1e-9);
        assert!(out.fluid().get(3).abs() < 1e-10, "fuel left in the flue gas");

        let chamber = nw.component(cc).unwrap();
        let eta = chamber.variable(VariableKind::Eta).unwrap().value;
        assert!((eta - 0.95).abs() < 1e-6);
        let t = nw.temperature(flue).unwrap().value;
        assert!(t > 1000.0 && t < 2500.0, "T = {t}");
    }

    #[test]
    fn second_solve_starts_converged() {
        let (mut nw, _, _) = network(0.4);
        solve(&mut nw, None).unwrap();
        let again = solve(&mut nw, None).unwrap();
        assert_eq!(again.iterations, 0);
    }

    #[test]
    fn under_determined_network_is_rejected() {
        let (mut nw, cc, _) = network(0.4);
        nw.component_mut(cc)
            .unwrap()
            .set_variable(VariableKind::Eta, cf_components::Setting::Unset, 0.0)
            .unwrap();
        let err = solve(&mut nw, None).unwrap_err();
        assert!(matches!(err, SolverError::ProblemSetup { .. }));
        assert!(err.to_string().contains("under"));
    }

    #[test]
    fn rich_mixture_reports_lambda_below_one() {
        let (mut nw, _, _) = network(0.1);
        let report = solve(&mut nw, None).unwrap();
        assert!(
            report
                .diagnostics
                .iter()
                .any(|d| d.message.contains("lamb"))
        );
    }
}
