//! Smoke tests for the ideal-gas backend through the public API.

use cf_core::units::{celsius, k, pa};
use cf_fluids::{Composition, FluidModel, IdealGasModel, Species};

fn natural_gas_products() -> Composition {
    Composition::new_mass_fractions(vec![
        (Species::N2, 0.7317),
        (Species::O2, 0.1134),
        (Species::CO2, 0.0822),
        (Species::H2O, 0.0601),
        (Species::Ar, 0.0126),
    ])
    .unwrap()
}

#[test]
fn methane_heating_value_from_enthalpies() {
    // Burning 1 kg CH4 with 4 kg O2 gives 2.744 kg CO2 and 2.246 kg H2O.
    let model = IdealGasModel::new();
    let p = pa(1e5);
    let t = k(298.15);
    let h = |s| model.h_mix_pt(p, t, &Composition::pure(s), true).unwrap();

    let m_o2 = 2.0 * Species::O2.molar_mass() / Species::CH4.molar_mass();
    let m_co2 = Species::CO2.molar_mass() / Species::CH4.molar_mass();
    let m_h2o = 2.0 * Species::H2O.molar_mass() / Species::CH4.molar_mass();

    let reactants = h(Species::CH4) + m_o2 * h(Species::O2);
    let products = m_co2 * h(Species::CO2) + m_h2o * h(Species::H2O);
    let lhv = reactants - products;
    assert!((lhv - 50.0e6).abs() < 0.1e6, "lhv = {lhv}");
}

#[test]
fn flue_gas_round_trip_through_temperature() {
    let model = IdealGasModel::new();
    let comp = natural_gas_products();
    let p = pa(1.2e5);
    let t = celsius(1206.6);
    let h = model.h_mix_pt(p, t, &comp, false).unwrap();
    let back = model.t_mix_ph(p, h, &comp, Some(k(1000.0))).unwrap();
    assert!((back.value - t.value).abs() < 1e-6);
}

#[test]
fn forced_gas_matters_only_below_dew_point() {
    let model = IdealGasModel::new();
    let comp = natural_gas_products();
    let p = pa(1e5);

    let hot_real = model.h_mix_pt(p, k(400.0), &comp, false).unwrap();
    let hot_gas = model.h_mix_pt(p, k(400.0), &comp, true).unwrap();
    assert_eq!(hot_real, hot_gas);

    let cold_real = model.h_mix_pt(p, k(298.15), &comp, false).unwrap();
    let cold_gas = model.h_mix_pt(p, k(298.15), &comp, true).unwrap();
    assert!(cold_gas > cold_real);
}
