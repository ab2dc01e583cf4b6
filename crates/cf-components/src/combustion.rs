//! Adiabatic combustion chamber and the shared combustion equations.
//!
//! Two inlets (air and fuel in either order) feed one outlet. Fuels burn
//! completely while oxygen suffices; below stoichiometric oxygen every fuel
//! is converted by the same factor `phi = supplied / demand`, so all oxygen
//! is consumed.
//!
//! The equations live as provided methods of [`CombustionModel`] so that
//! derived chambers reuse them by implementing the two accessors.

use crate::common::{check_finite, reference_enthalpy, reference_enthalpy_dx};
use crate::connection::{Port, StateVar};
use crate::diagnostic::Diagnostic;
use crate::error::{ComponentError, ComponentResult};
use crate::fuel::Chemistry;
use crate::jacobian::{AssemblyPass, Column, JacobianView};
use crate::traits::{Component, EquationBlock, EvalContext};
use crate::variable::{
    self, Bound, ComponentVariable, Setting, VariableDescriptor, VariableKind, VariableSet,
};
use cf_fluids::Species;

pub const MASS_FLOW: &str = "mass_flow";
pub const STOICHIOMETRY: &str = "stoichiometry";
pub const COMBUSTION_PRESSURE: &str = "combustion_pressure";
pub const ENERGY_BALANCE: &str = "energy_balance";

/// Molar oxygen supply and stoichiometric demand over both inlets [kmol/s].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OxygenBalance {
    pub supplied: f64,
    pub demand: f64,
}

impl OxygenBalance {
    /// Oxygen covers complete combustion (also true without fuel).
    pub fn is_lean(&self) -> bool {
        self.demand <= 0.0 || self.supplied >= self.demand
    }

    /// Share of the entering fuel that reacts.
    pub fn conversion(&self) -> f64 {
        if self.is_lean() {
            1.0
        } else {
            self.supplied / self.demand
        }
    }
}

/// Equations shared by all combustion chambers.
pub trait CombustionModel {
    fn chemistry(&self) -> &Chemistry;

    /// Current value of a variable the model exposes.
    fn variable_value(&self, kind: VariableKind) -> f64;

    /// Molar inflow of each fuel, in `chemistry().fuels()` order [kmol/s].
    fn fuel_inflow(&self, ctx: &EvalContext<'_>) -> Vec<f64> {
        self.chemistry()
            .fuels()
            .iter()
            .map(|&(k, fuel)| {
                ctx.ports
                    .inlets()
                    .iter()
                    .map(|(_, c)| c.m() * c.fluid().get(k))
                    .sum::<f64>()
                    / fuel.species.molar_mass()
            })
            .collect()
    }

    fn oxygen_balance(&self, ctx: &EvalContext<'_>) -> OxygenBalance {
        let chem = self.chemistry();
        let o2 = chem.o2();
        let supplied = ctx
            .ports
            .inlets()
            .iter()
            .map(|(_, c)| c.m() * c.fluid().get(o2))
            .sum::<f64>()
            / chem.molar_mass(o2);
        let demand = chem
            .fuels()
            .iter()
            .zip(self.fuel_inflow(ctx))
            .map(|((_, fuel), n)| n * fuel.oxygen_demand())
            .sum();
        OxygenBalance { supplied, demand }
    }

    /// `sum_in m - sum_out m`
    fn mass_flow_func(&self, ctx: &EvalContext<'_>) -> ComponentResult<f64> {
        let inflow: f64 = ctx.ports.inlets().iter().map(|(_, c)| c.m()).sum();
        let outflow: f64 = ctx.ports.outlets().iter().map(|(_, c)| c.m()).sum();
        Ok(inflow - outflow)
    }

    fn mass_flow_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        for (port, _) in ctx.ports.inlets() {
            jac.add_state(row, port, StateVar::MassFlow, 1.0);
        }
        for (port, _) in ctx.ports.outlets() {
            jac.add_state(row, port, StateVar::MassFlow, -1.0);
        }
        Ok(())
    }

    /// Reaction source of each species at full conversion [kg/s].
    fn reaction_source(&self, ctx: &EvalContext<'_>) -> Vec<f64> {
        let chem = self.chemistry();
        let n_fuel = self.fuel_inflow(ctx);
        (0..chem.len())
            .map(|j| {
                chem.fuels()
                    .iter()
                    .zip(&n_fuel)
                    .map(|(&(k, fuel), &n)| n * chem.coefficient(j, k, &fuel))
                    .sum::<f64>()
                    * chem.molar_mass(j)
            })
            .collect()
    }

    /// One residual per species: inflow plus converted source minus outflow.
    fn stoichiometry_func(&self, ctx: &EvalContext<'_>, out: &mut Vec<f64>) -> ComponentResult<()> {
        let phi = self.oxygen_balance(ctx).conversion();
        let source = self.reaction_source(ctx);
        for (j, s) in source.iter().enumerate() {
            let inflow: f64 = ctx
                .ports
                .inlets()
                .iter()
                .map(|(_, c)| c.m() * c.fluid().get(j))
                .sum();
            let outflow: f64 = ctx
                .ports
                .outlets()
                .iter()
                .map(|(_, c)| c.m() * c.fluid().get(j))
                .sum();
            out.push(inflow + phi * s - outflow);
        }
        Ok(())
    }

    fn stoichiometry_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        let chem = self.chemistry();
        let n = chem.len();
        let o2 = chem.o2();
        let m_o2 = chem.molar_mass(o2);
        let balance = self.oxygen_balance(ctx);
        let phi = balance.conversion();
        let lean = balance.is_lean();
        let source = self.reaction_source(ctx);

        for (port, c) in ctx.ports.inlets() {
            let m = c.m();
            let x = c.fluid();

            // d(phi)/d(m) and d(phi)/d(x_k); zero while oxygen suffices
            let mut dphi_dx = vec![0.0; n];
            let mut dphi_dm = 0.0;
            if !lean {
                let d = balance.demand;
                let ddemand_dm: f64 = chem
                    .fuels()
                    .iter()
                    .map(|(k, f)| f.oxygen_demand() * x.get(*k) / f.species.molar_mass())
                    .sum();
                dphi_dm = (x.get(o2) / m_o2 - phi * ddemand_dm) / d;
                dphi_dx[o2] = m / m_o2 / d;
                for (k, f) in chem.fuels() {
                    dphi_dx[*k] -= phi * f.oxygen_demand() * m / f.species.molar_mass() / d;
                }
            }

            for j in 0..n {
                let mj = chem.molar_mass(j);
                let dsource_dm: f64 = chem
                    .fuels()
                    .iter()
                    .map(|(k, f)| chem.coefficient(j, *k, f) * x.get(*k) / f.species.molar_mass())
                    .sum::<f64>()
                    * mj;
                jac.add_state(
                    row + j,
                    port,
                    StateVar::MassFlow,
                    x.get(j) + phi * dsource_dm + source[j] * dphi_dm,
                );

                for k in 0..n {
                    let mut value = source[j] * dphi_dx[k];
                    if k == j {
                        value += m;
                    }
                    if let Some(f) = chem.fuel_at(k) {
                        value += phi * mj * chem.coefficient(j, k, f) * m / f.species.molar_mass();
                    }
                    if value != 0.0 {
                        jac.add_state(row + j, port, StateVar::Fraction(k), value);
                    }
                }
            }
        }

        for (port, c) in ctx.ports.outlets() {
            for j in 0..n {
                jac.add_state(row + j, port, StateVar::MassFlow, -c.fluid().get(j));
                jac.add_state(row + j, port, StateVar::Fraction(j), -c.m());
            }
        }
        Ok(())
    }

    /// `n_O2,in - lamb * n_O2,stoich`
    fn lambda_func(&self, ctx: &EvalContext<'_>) -> ComponentResult<f64> {
        let balance = self.oxygen_balance(ctx);
        Ok(balance.supplied - self.variable_value(VariableKind::Lamb) * balance.demand)
    }

    fn lambda_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        let chem = self.chemistry();
        let o2 = chem.o2();
        let m_o2 = chem.molar_mass(o2);
        let lamb = self.variable_value(VariableKind::Lamb);

        for (port, c) in ctx.ports.inlets() {
            let m = c.m();
            let x = c.fluid();
            let ddemand_dm: f64 = chem
                .fuels()
                .iter()
                .map(|(k, f)| f.oxygen_demand() * x.get(*k) / f.species.molar_mass())
                .sum();
            jac.add_state(row, port, StateVar::MassFlow, x.get(o2) / m_o2 - lamb * ddemand_dm);
            jac.add_state(row, port, StateVar::Fraction(o2), m / m_o2);
            for (k, f) in chem.fuels() {
                jac.add_state(
                    row,
                    port,
                    StateVar::Fraction(*k),
                    -lamb * f.oxygen_demand() * m / f.species.molar_mass(),
                );
            }
        }
        jac.add(
            row,
            Column::Variable(VariableKind::Lamb),
            -self.oxygen_balance(ctx).demand,
        );
        Ok(())
    }

    /// Heating-value weighted fuel consumed in the chamber [W].
    fn calc_ti(&self, ctx: &EvalContext<'_>) -> f64 {
        self.chemistry()
            .fuels()
            .iter()
            .map(|(k, fuel)| {
                let inflow: f64 = ctx
                    .ports
                    .inlets()
                    .iter()
                    .map(|(_, c)| c.m() * c.fluid().get(*k))
                    .sum();
                let outflow: f64 = ctx
                    .ports
                    .outlets()
                    .iter()
                    .map(|(_, c)| c.m() * c.fluid().get(*k))
                    .sum();
                fuel.lhv * (inflow - outflow)
            })
            .sum()
    }

    /// Accumulate `scale * d(calc_ti)` into `row`.
    fn calc_ti_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
        scale: f64,
    ) {
        let fuels = self.chemistry().fuels();
        let ports = ctx
            .ports
            .inlets()
            .into_iter()
            .map(|(p, c)| (p, c, scale))
            .chain(ctx.ports.outlets().into_iter().map(|(p, c)| (p, c, -scale)));
        for (port, c, sign) in ports {
            let dm: f64 = fuels.iter().map(|(k, f)| f.lhv * c.fluid().get(*k)).sum();
            jac.add_state(row, port, StateVar::MassFlow, sign * dm);
            for (k, f) in fuels {
                jac.add_state(row, port, StateVar::Fraction(*k), sign * f.lhv * c.m());
            }
        }
    }

    /// `ti - calc_ti`
    fn ti_func(&self, ctx: &EvalContext<'_>) -> ComponentResult<f64> {
        Ok(self.variable_value(VariableKind::Ti) - self.calc_ti(ctx))
    }

    fn ti_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        self.calc_ti_deriv(ctx, jac, row, -1.0);
        jac.add(row, Column::Variable(VariableKind::Ti), 1.0);
        Ok(())
    }

    /// `sum_in m (h - h_ref) - sum_out m (h - h_ref)` with reference
    /// enthalpies at 298.15 K, 1 bar and gaseous water.
    fn reference_balance(&self, ctx: &EvalContext<'_>) -> ComponentResult<f64> {
        let mut res = 0.0;
        for (_, c) in ctx.ports.inlets() {
            res += c.m() * (c.h() - reference_enthalpy(ctx.fluid, c.fluid())?);
        }
        for (_, c) in ctx.ports.outlets() {
            res -= c.m() * (c.h() - reference_enthalpy(ctx.fluid, c.fluid())?);
        }
        check_finite(res, "energy balance residual")?;
        Ok(res)
    }

    fn reference_balance_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        let ports = ctx
            .ports
            .inlets()
            .into_iter()
            .map(|(p, c)| (p, c, 1.0))
            .chain(ctx.ports.outlets().into_iter().map(|(p, c)| (p, c, -1.0)));
        for (port, c, sign) in ports {
            let h_ref = reference_enthalpy(ctx.fluid, c.fluid())?;
            jac.add_state(row, port, StateVar::MassFlow, sign * (c.h() - h_ref));
            jac.add_state(row, port, StateVar::Enthalpy, sign * c.m());
            let dh_ref = reference_enthalpy_dx(ctx.fluid, c.fluid())?;
            for (k, d) in dh_ref.iter().enumerate() {
                jac.add_state(row, port, StateVar::Fraction(k), -sign * c.m() * d);
            }
        }
        Ok(())
    }

    /// Energy balance with the released heat scaled by `eta`.
    fn energy_balance_with(&self, ctx: &EvalContext<'_>, eta: f64) -> ComponentResult<f64> {
        Ok(self.reference_balance(ctx)? + self.calc_ti(ctx) * eta)
    }

    fn energy_balance_deriv_with(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
        eta: f64,
    ) -> ComponentResult<()> {
        self.reference_balance_deriv(ctx, jac, row)?;
        self.calc_ti_deriv(ctx, jac, row, eta);
        Ok(())
    }
}

static VARIABLES: [VariableDescriptor<CombustionChamber>; 2] = [
    VariableDescriptor {
        kind: VariableKind::Lamb,
        min: Some(Bound::Inclusive(1.0)),
        max: None,
        result_only: false,
        constant_when_fixed: false,
        residual: Some(<CombustionChamber as CombustionModel>::lambda_func),
        derivative: Some(<CombustionChamber as CombustionModel>::lambda_deriv),
    },
    VariableDescriptor {
        kind: VariableKind::Ti,
        min: Some(Bound::Exclusive(0.0)),
        max: None,
        result_only: false,
        constant_when_fixed: false,
        residual: Some(<CombustionChamber as CombustionModel>::ti_func),
        derivative: Some(<CombustionChamber as CombustionModel>::ti_deriv),
    },
];

/// Adiabatic combustion chamber with equal inlet and outlet pressures.
#[derive(Debug, Clone, PartialEq)]
pub struct CombustionChamber {
    label: String,
    chemistry: Chemistry,
    vars: VariableSet,
}

impl CombustionChamber {
    /// Build a chamber for the network `species`.
    ///
    /// Fails with `InvalidConfiguration` unless O2, CO2, H2O and a fuel are
    /// present.
    pub fn new(label: impl Into<String>, species: &[Species]) -> ComponentResult<Self> {
        Ok(Self {
            label: label.into(),
            chemistry: Chemistry::new(species)?,
            vars: VariableSet::default(),
        })
    }

    pub fn variables() -> &'static [VariableDescriptor<Self>] {
        &VARIABLES
    }

    pub fn set_fixed(&mut self, kind: VariableKind, value: f64) -> ComponentResult<()> {
        self.set_variable(kind, Setting::Fixed, value)
    }

    pub fn set_free(&mut self, kind: VariableKind, start: f64) -> ComponentResult<()> {
        self.set_variable(kind, Setting::Free, start)
    }

    pub fn unset(&mut self, kind: VariableKind) -> ComponentResult<()> {
        self.set_variable(kind, Setting::Unset, 0.0)
    }

    pub(crate) fn slot_mut(&mut self, kind: VariableKind) -> &mut ComponentVariable {
        self.vars.get_mut(kind)
    }

    pub(crate) fn slot(&self, kind: VariableKind) -> &ComponentVariable {
        self.vars.get(kind)
    }

    /// Adiabatic energy balance: all released heat stays in the outlet.
    pub fn energy_balance_func(&self, ctx: &EvalContext<'_>) -> ComponentResult<f64> {
        self.energy_balance_with(ctx, 1.0)
    }

    pub fn energy_balance_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        self.energy_balance_deriv_with(ctx, jac, row, 1.0)
    }

    /// `p_in1 - p_out1` and `p_in2 - p_out1`.
    pub fn combustion_pressure_func(&self, ctx: &EvalContext<'_>) -> [f64; 2] {
        let p_out = ctx.ports.out1.p();
        [ctx.ports.in1.p() - p_out, ctx.ports.in2.p() - p_out]
    }

    pub fn combustion_pressure_deriv(&self, jac: &mut JacobianView<'_>, row: usize) {
        for (i, port) in [Port::In1, Port::In2].into_iter().enumerate() {
            jac.add_state(row + i, port, StateVar::Pressure, 1.0);
            jac.add_state(row + i, Port::Out1, StateVar::Pressure, -1.0);
        }
    }

    fn active_variables(&self) -> impl Iterator<Item = &'static VariableDescriptor<Self>> + '_ {
        VARIABLES
            .iter()
            .filter(|d| d.residual.is_some() && self.vars.get(d.kind).is_active())
    }
}

impl CombustionModel for CombustionChamber {
    fn chemistry(&self) -> &Chemistry {
        &self.chemistry
    }

    fn variable_value(&self, kind: VariableKind) -> f64 {
        self.vars.get(kind).value
    }
}

impl Component for CombustionChamber {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> &'static str {
        "combustion chamber"
    }

    fn species(&self) -> &[Species] {
        self.chemistry.species()
    }

    fn equation_blocks(&self) -> Vec<EquationBlock> {
        let mut blocks = vec![
            EquationBlock {
                name: MASS_FLOW,
                num_eq: 1,
                constant_deriv: true,
            },
            EquationBlock {
                name: COMBUSTION_PRESSURE,
                num_eq: 2,
                constant_deriv: true,
            },
            EquationBlock {
                name: STOICHIOMETRY,
                num_eq: self.chemistry.len(),
                constant_deriv: false,
            },
            EquationBlock {
                name: ENERGY_BALANCE,
                num_eq: 1,
                constant_deriv: false,
            },
        ];
        blocks.extend(self.active_variables().map(|d| EquationBlock {
            name: d.kind.name(),
            num_eq: 1,
            constant_deriv: false,
        }));
        blocks
    }

    fn variable(&self, kind: VariableKind) -> Option<ComponentVariable> {
        variable::lookup(&VARIABLES, kind)
            .ok()
            .map(|_| *self.vars.get(kind))
    }

    fn set_variable(
        &mut self,
        kind: VariableKind,
        setting: Setting,
        value: f64,
    ) -> ComponentResult<()> {
        variable::specify(&VARIABLES, self.vars.get_mut(kind), kind, setting, value)
    }

    fn update_free_variable(&mut self, kind: VariableKind, value: f64) -> ComponentResult<()> {
        let descriptor = variable::lookup(&VARIABLES, kind)?;
        self.vars.get_mut(kind).value = descriptor.clamp(value);
        Ok(())
    }

    fn residuals(&self, ctx: &EvalContext<'_>, out: &mut Vec<f64>) -> ComponentResult<()> {
        out.push(self.mass_flow_func(ctx)?);
        out.extend(self.combustion_pressure_func(ctx));
        self.stoichiometry_func(ctx, out)?;
        out.push(self.energy_balance_func(ctx)?);
        for d in self.active_variables() {
            if let Some(residual) = d.residual {
                out.push(residual(self, ctx)?);
            }
        }
        Ok(())
    }

    fn derivatives(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        pass: AssemblyPass,
    ) -> ComponentResult<()> {
        let mut row = 0;
        for block in self.equation_blocks() {
            if pass.includes(block.constant_deriv) {
                match block.name {
                    MASS_FLOW => self.mass_flow_deriv(ctx, jac, row)?,
                    COMBUSTION_PRESSURE => self.combustion_pressure_deriv(jac, row),
                    STOICHIOMETRY => self.stoichiometry_deriv(ctx, jac, row)?,
                    ENERGY_BALANCE => self.energy_balance_deriv(ctx, jac, row)?,
                    name => {
                        let kind: VariableKind = name.parse()?;
                        if let Some(derivative) = variable::lookup(&VARIABLES, kind)?.derivative {
                            derivative(self, ctx, jac, row)?;
                        }
                    }
                }
            }
            row += block.num_eq;
        }
        Ok(())
    }

    /// Recompute `ti` and `lamb` from the converged state.
    fn calc_parameters(&mut self, ctx: &EvalContext<'_>) -> ComponentResult<Vec<Diagnostic>> {
        let balance = self.oxygen_balance(ctx);
        if balance.demand <= 0.0 {
            return Err(ComponentError::UndefinedComputation {
                what: format!(
                    "no fuel enters {}; lambda and thermal input are undefined",
                    self.label
                ),
            });
        }
        let ti = self.calc_ti(ctx);
        let lamb = balance.supplied / balance.demand;
        self.vars.get_mut(VariableKind::Ti).value = ti;
        self.vars.get_mut(VariableKind::Lamb).value = lamb;

        Ok([(VariableKind::Lamb, lamb), (VariableKind::Ti, ti)]
            .into_iter()
            .filter_map(|(kind, value)| {
                variable::lookup(&VARIABLES, kind)
                    .ok()
                    .and_then(|d| d.check_result(&self.label, value))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::test_support::{Fixture, check_derivatives, network_species};

    fn chamber() -> CombustionChamber {
        CombustionChamber::new("cc", &network_species()).unwrap()
    }

    #[test]
    fn mandatory_blocks() {
        let cc = chamber();
        let names: Vec<&str> = cc.equation_blocks().iter().map(|b| b.name).collect();
        assert_eq!(
            names,
            vec![MASS_FLOW, COMBUSTION_PRESSURE, STOICHIOMETRY, ENERGY_BALANCE]
        );
        assert_eq!(cc.num_equations(), 1 + 2 + 7 + 1);
    }

    #[test]
    fn optional_blocks_follow_settings() {
        let mut cc = chamber();
        cc.set_fixed(VariableKind::Ti, 5.0e5).unwrap();
        cc.set_free(VariableKind::Lamb, 2.0).unwrap();
        let names: Vec<&str> = cc.equation_blocks().iter().map(|b| b.name).collect();
        assert_eq!(&names[4..], &["lamb", "ti"]);
        assert_eq!(cc.free_variables(), vec![VariableKind::Lamb]);

        cc.unset(VariableKind::Ti).unwrap();
        assert_eq!(cc.num_equations(), 12);
    }

    #[test]
    fn rejects_variables_it_does_not_have() {
        let mut cc = chamber();
        assert!(cc.set_fixed(VariableKind::Pr, 0.95).is_err());
        assert!(cc.variable(VariableKind::Eta).is_none());
        assert!(cc.set_fixed(VariableKind::Lamb, 0.8).is_err());
    }

    #[test]
    fn stoichiometry_closes_on_complete_products() {
        let fx = Fixture::lean();
        let cc = chamber();
        let mut out = Vec::new();
        cc.stoichiometry_func(&fx.ctx(), &mut out).unwrap();
        for (j, r) in out.iter().enumerate() {
            assert!(r.abs() < 1e-12, "species {j}: {r}");
        }
    }

    #[test]
    fn rich_mixture_consumes_all_oxygen() {
        let fx = Fixture::rich();
        let cc = chamber();
        let balance = cc.oxygen_balance(&fx.ctx());
        assert!(!balance.is_lean());
        let phi = balance.conversion();
        let source = cc.reaction_source(&fx.ctx());
        let o2 = cc.chemistry().o2();
        let o2_in = fx.in1.m() * fx.in1.fluid().get(o2) + fx.in2.m() * fx.in2.fluid().get(o2);
        assert!((o2_in + phi * source[o2]).abs() < 1e-12);
    }

    #[test]
    fn mass_flow_derivative_is_constant() {
        let cc = chamber();
        let fx = Fixture::lean();
        let blocks = cc.equation_blocks();
        assert!(blocks[0].constant_deriv);
        assert!(blocks[1].constant_deriv);
        assert!(!blocks[2].constant_deriv);
        assert!(cc.mass_flow_func(&fx.ctx()).unwrap().abs() < 1e-12);
    }

    #[test]
    fn analytic_derivatives_lean() {
        let mut cc = chamber();
        cc.set_free(VariableKind::Lamb, 2.0).unwrap();
        cc.set_free(VariableKind::Ti, 4.0e5).unwrap();
        check_derivatives(&cc, &Fixture::lean());
    }

    #[test]
    fn analytic_derivatives_rich() {
        let mut cc = chamber();
        cc.set_free(VariableKind::Lamb, 1.5).unwrap();
        cc.set_free(VariableKind::Ti, 4.0e5).unwrap();
        check_derivatives(&cc, &Fixture::rich());
    }

    #[test]
    fn postprocessing_recovers_lambda_and_ti() {
        let fx = Fixture::lean();
        let mut cc = chamber();
        let diagnostics = cc.calc_parameters(&fx.ctx()).unwrap();
        assert!(diagnostics.is_empty());
        let lamb = cc.variable(VariableKind::Lamb).unwrap().value;
        assert!((lamb - fx.lambda).abs() < 1e-9, "lamb = {lamb}");
        let ti = cc.variable(VariableKind::Ti).unwrap().value;
        assert!((ti - cc.calc_ti(&fx.ctx())).abs() < 1e-9);
        assert!(ti > 0.0);
    }

    #[test]
    fn rich_postprocessing_flags_lambda() {
        let fx = Fixture::rich();
        let mut cc = chamber();
        let diagnostics = cc.calc_parameters(&fx.ctx()).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::ResultOutOfBounds);
        assert!(diagnostics[0].message.contains("lamb"));
    }

    #[test]
    fn postprocessing_without_fuel_is_undefined() {
        let mut fx = Fixture::lean();
        fx.in2.set_value(StateVar::MassFlow, 0.0);
        let mut cc = chamber();
        let err = cc.calc_parameters(&fx.ctx()).unwrap_err();
        assert!(matches!(err, ComponentError::UndefinedComputation { .. }));
    }
}
