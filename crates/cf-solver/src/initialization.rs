//! Starting values for the Newton iteration.
//!
//! Free outlet compositions start as the mass-weighted mix of the inlets of
//! the component feeding them. Free enthalpies keep a seeded value (user
//! start value or previous solve); otherwise they are computed from the
//! specified temperature, the start temperature, or
//! [`DEFAULT_START_TEMPERATURE`], in that order.

use crate::error::SolverResult;
use crate::layout::{Layout, Unknown};
use crate::network::Network;
use cf_components::{Port, StateVar};
use cf_core::units::{k, pa};
use nalgebra::DVector;

/// Start temperature of connections without any temperature hint [K].
pub const DEFAULT_START_TEMPERATURE: f64 = 1000.0;

/// Seed free compositions and enthalpies, and write enthalpies that follow
/// from a fixed temperature.
pub(crate) fn prepare(network: &mut Network, layout: &Layout) -> SolverResult<()> {
    let (fluid, connections, _) = network.parts_mut();

    for rows in &layout.components {
        let inlets = [rows.ports[Port::In1.index()], rows.ports[Port::In2.index()]];
        let outlet = rows.ports[Port::Out1.index()];
        if connections[outlet].fluid_fully_fixed() || connections[outlet].fluid().sum() > 0.0 {
            continue;
        }
        let m_in: f64 = inlets.iter().map(|&c| connections[c].m()).sum();
        if m_in <= 0.0 {
            continue;
        }
        let mix: Vec<f64> = (0..connections[outlet].num_fractions())
            .map(|i| {
                inlets
                    .iter()
                    .map(|&c| connections[c].m() * connections[c].fluid().get(i))
                    .sum::<f64>()
                    / m_in
            })
            .collect();
        let out = &mut connections[outlet];
        for (i, x) in mix.into_iter().enumerate() {
            if !out.is_fixed(StateVar::Fraction(i)) {
                out.set_value(StateVar::Fraction(i), x);
            }
        }
    }

    for &(ci, t) in &layout.enthalpy_from_temperature {
        let c = &mut connections[ci];
        let h = fluid.h_mix_pt(pa(c.p()), k(t), c.fluid(), false)?;
        c.set_value(StateVar::Enthalpy, h);
    }

    for c in connections.iter_mut() {
        if c.is_fixed(StateVar::Enthalpy) || c.has_enthalpy_seed() {
            continue;
        }
        let t = c
            .temperature_spec()
            .or(c.temperature_start())
            .map(|t| t.value)
            .unwrap_or(DEFAULT_START_TEMPERATURE);
        let h = fluid.h_mix_pt(pa(c.p()), k(t), c.fluid(), false)?;
        c.set_value(StateVar::Enthalpy, h);
    }
    Ok(())
}

/// Current network values of every unknown, in column order.
pub(crate) fn start_vector(network: &Network, layout: &Layout) -> DVector<f64> {
    let connections = network.connections_slice();
    let components = network.components_slice();
    DVector::from_iterator(
        layout.dimension(),
        layout.unknowns.iter().map(|u| match *u {
            Unknown::State { conn, var } => connections[conn].value(var),
            Unknown::Variable { comp, kind } => components[comp]
                .variable(kind)
                .map(|v| v.value)
                .unwrap_or_default(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_components::{DiabaticCombustionChamber, VariableKind};
    use cf_core::units::{bar, celsius, kgps};
    use cf_fluids::{Composition, FluidModel, IdealGasModel, Species};

    fn species() -> Vec<Species> {
        vec![Species::N2, Species::O2, Species::CO2, Species::CH4, Species::H2O]
    }

    fn network() -> (Network, [cf_core::ConnId; 3]) {
        let mut nw = Network::new(species(), IdealGasModel::new());
        let mut cc = DiabaticCombustionChamber::new("cc", &species()).unwrap();
        cc.set_fixed(VariableKind::Pr, 0.95).unwrap();
        cc.set_fixed(VariableKind::Eta, 1.0).unwrap();
        let cc = nw.add_component(cc).unwrap();
        let air = nw.add_connection("air");
        let fuel = nw.add_connection("fuel");
        let flue = nw.add_connection("flue gas");
        nw.connect(cc, Port::In1, air).unwrap();
        nw.connect(cc, Port::In2, fuel).unwrap();
        nw.connect(cc, Port::Out1, flue).unwrap();

        let a = nw.connection_mut(air).unwrap();
        a.set_fluid(
            &Composition::new_mass_fractions(vec![(Species::N2, 0.77), (Species::O2, 0.23)])
                .unwrap(),
        )
        .unwrap();
        a.set_mass_flow(kgps(0.3)).unwrap();
        a.set_pressure(bar(1.0)).unwrap();
        a.set_temperature(celsius(20.0)).unwrap();

        let f = nw.connection_mut(fuel).unwrap();
        f.set_fluid(&Composition::pure(Species::CH4)).unwrap();
        f.set_mass_flow(kgps(0.1)).unwrap();
        f.set_pressure(bar(1.2)).unwrap();
        f.set_temperature(celsius(25.0)).unwrap();
        (nw, [air, fuel, flue])
    }

    #[test]
    fn outlet_starts_as_inlet_mix() {
        let (mut nw, [_, _, flue]) = network();
        let layout = Layout::build(&nw).unwrap();
        prepare(&mut nw, &layout).unwrap();
        let out = nw.connection(flue).unwrap();
        assert!((out.fluid().get(0) - 0.3 * 0.77 / 0.4).abs() < 1e-12);
        assert!((out.fluid().get(3) - 0.1 / 0.4).abs() < 1e-12);
        assert!((out.fluid().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn enthalpy_follows_fixed_temperature() {
        let (mut nw, [air, _, flue]) = network();
        let layout = Layout::build(&nw).unwrap();
        prepare(&mut nw, &layout).unwrap();
        let a = nw.connection(air).unwrap();
        let h = IdealGasModel::new()
            .h_mix_pt(bar(1.0), celsius(20.0), a.fluid(), false)
            .unwrap();
        assert_eq!(a.h(), h);

        // no hint on the outlet: default start temperature
        let out = nw.connection(flue).unwrap();
        let t = nw.temperature(flue).unwrap();
        assert!((t.value - DEFAULT_START_TEMPERATURE).abs() < 1e-6, "{}", t.value);
        assert!(out.has_enthalpy_seed());
    }

    #[test]
    fn seeded_enthalpy_is_kept() {
        let (mut nw, [_, _, flue]) = network();
        nw.connection_mut(flue).unwrap().set_enthalpy_start(1.0e5);
        let layout = Layout::build(&nw).unwrap();
        prepare(&mut nw, &layout).unwrap();
        assert_eq!(nw.connection(flue).unwrap().h(), 1.0e5);
    }

    #[test]
    fn start_vector_follows_columns() {
        let (mut nw, _) = network();
        let layout = Layout::build(&nw).unwrap();
        prepare(&mut nw, &layout).unwrap();
        let x = start_vector(&nw, &layout);
        // outlet m, p, h and five fractions
        assert_eq!(x.len(), 8);
        assert_eq!(x[0], 1.0);
        assert_eq!(x[1], 1.0e5);
    }
}
