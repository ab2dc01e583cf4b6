//! Diabatic combustion chamber.
//!
//! Extends the adiabatic [`CombustionChamber`] with a pressure ratio between
//! inlet 1 and the outlet and an energy balance in which only the share
//! `eta` of the thermal input stays in the flue gas. Inlet 2 pressure is
//! not tied to anything, so air and fuel may enter at different pressures.

use crate::combustion::{CombustionChamber, CombustionModel, MASS_FLOW, STOICHIOMETRY};
use crate::connection::{Port, StateVar};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::{ComponentError, ComponentResult};
use crate::fuel::Chemistry;
use crate::jacobian::{AssemblyPass, Column, JacobianView};
use crate::traits::{Component, EquationBlock, EvalContext};
use crate::variable::{
    self, Bound, ComponentVariable, Setting, VariableDescriptor, VariableKind, VariableSet,
};
use cf_fluids::Species;

static VARIABLES: [VariableDescriptor<DiabaticCombustionChamber>; 5] = [
    VariableDescriptor {
        kind: VariableKind::Lamb,
        min: Some(Bound::Inclusive(1.0)),
        max: None,
        result_only: false,
        constant_when_fixed: false,
        residual: Some(<DiabaticCombustionChamber as CombustionModel>::lambda_func),
        derivative: Some(<DiabaticCombustionChamber as CombustionModel>::lambda_deriv),
    },
    VariableDescriptor {
        kind: VariableKind::Ti,
        min: Some(Bound::Exclusive(0.0)),
        max: None,
        result_only: false,
        constant_when_fixed: false,
        residual: Some(<DiabaticCombustionChamber as CombustionModel>::ti_func),
        derivative: Some(<DiabaticCombustionChamber as CombustionModel>::ti_deriv),
    },
    VariableDescriptor {
        kind: VariableKind::Pr,
        min: Some(Bound::Exclusive(0.0)),
        max: None,
        result_only: false,
        constant_when_fixed: true,
        residual: Some(DiabaticCombustionChamber::pr_func),
        derivative: Some(DiabaticCombustionChamber::pr_deriv),
    },
    VariableDescriptor {
        kind: VariableKind::Eta,
        min: Some(Bound::Inclusive(0.0)),
        max: Some(Bound::Inclusive(1.0)),
        result_only: false,
        constant_when_fixed: false,
        residual: Some(DiabaticCombustionChamber::energy_balance_func),
        derivative: Some(DiabaticCombustionChamber::energy_balance_deriv),
    },
    VariableDescriptor {
        kind: VariableKind::QLoss,
        min: None,
        max: Some(Bound::Inclusive(0.0)),
        result_only: true,
        constant_when_fixed: false,
        residual: None,
        derivative: None,
    },
];

/// Combustion chamber with pressure loss and heat loss.
///
/// `lamb` and `ti` are stored on the wrapped base chamber; `pr`, `eta` and
/// `Q_loss` here.
#[derive(Debug, Clone, PartialEq)]
pub struct DiabaticCombustionChamber {
    base: CombustionChamber,
    vars: VariableSet,
}

impl DiabaticCombustionChamber {
    pub fn new(label: impl Into<String>, species: &[Species]) -> ComponentResult<Self> {
        Ok(Self {
            base: CombustionChamber::new(label, species)?,
            vars: VariableSet::default(),
        })
    }

    pub fn base(&self) -> &CombustionChamber {
        &self.base
    }

    pub fn variables() -> &'static [VariableDescriptor<Self>] {
        &VARIABLES
    }

    fn slot(&self, kind: VariableKind) -> &ComponentVariable {
        match kind {
            VariableKind::Lamb | VariableKind::Ti => self.base.slot(kind),
            _ => self.vars.get(kind),
        }
    }

    fn slot_mut(&mut self, kind: VariableKind) -> &mut ComponentVariable {
        match kind {
            VariableKind::Lamb | VariableKind::Ti => self.base.slot_mut(kind),
            _ => self.vars.get_mut(kind),
        }
    }

    /// Fix a parameter; out-of-range values and `Q_loss` are rejected.
    pub fn set_fixed(&mut self, kind: VariableKind, value: f64) -> ComponentResult<()> {
        self.set_variable(kind, Setting::Fixed, value)
    }

    /// Activate a parameter's equation and let the solver find its value.
    pub fn set_free(&mut self, kind: VariableKind, start: f64) -> ComponentResult<()> {
        self.set_variable(kind, Setting::Free, start)
    }

    pub fn unset(&mut self, kind: VariableKind) -> ComponentResult<()> {
        self.set_variable(kind, Setting::Unset, 0.0)
    }

    /// `p_in1 * pr - p_out1`
    pub fn pr_func(&self, ctx: &EvalContext<'_>) -> ComponentResult<f64> {
        Ok(ctx.ports.in1.p() * self.variable_value(VariableKind::Pr) - ctx.ports.out1.p())
    }

    pub fn pr_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        jac.add_state(row, Port::In1, StateVar::Pressure, self.variable_value(VariableKind::Pr));
        jac.add_state(row, Port::Out1, StateVar::Pressure, -1.0);
        jac.add(row, Column::Variable(VariableKind::Pr), ctx.ports.in1.p());
        Ok(())
    }

    /// Reference-state energy balance plus `ti_calc * eta`.
    ///
    /// With `eta = 1` this is the adiabatic balance of the base chamber.
    pub fn energy_balance_func(&self, ctx: &EvalContext<'_>) -> ComponentResult<f64> {
        self.energy_balance_with(ctx, self.variable_value(VariableKind::Eta))
    }

    pub fn energy_balance_deriv(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        row: usize,
    ) -> ComponentResult<()> {
        self.energy_balance_deriv_with(ctx, jac, row, self.variable_value(VariableKind::Eta))?;
        jac.add(row, Column::Variable(VariableKind::Eta), self.calc_ti(ctx));
        Ok(())
    }

    fn active_variables(&self) -> impl Iterator<Item = &'static VariableDescriptor<Self>> + '_ {
        VARIABLES
            .iter()
            .filter(|d| d.residual.is_some() && self.slot(d.kind).is_active())
    }
}

impl CombustionModel for DiabaticCombustionChamber {
    fn chemistry(&self) -> &Chemistry {
        self.base.chemistry()
    }

    fn variable_value(&self, kind: VariableKind) -> f64 {
        self.slot(kind).value
    }
}

impl Component for DiabaticCombustionChamber {
    fn label(&self) -> &str {
        self.base.label()
    }

    fn kind(&self) -> &'static str {
        "diabatic combustion chamber"
    }

    fn species(&self) -> &[Species] {
        self.base.species()
    }

    fn equation_blocks(&self) -> Vec<EquationBlock> {
        let mut blocks = vec![
            EquationBlock {
                name: MASS_FLOW,
                num_eq: 1,
                constant_deriv: true,
            },
            EquationBlock {
                name: STOICHIOMETRY,
                num_eq: self.chemistry().len(),
                constant_deriv: false,
            },
        ];
        blocks.extend(self.active_variables().map(|d| EquationBlock {
            name: d.kind.name(),
            num_eq: 1,
            constant_deriv: d.constant_when_fixed && self.slot(d.kind).setting == Setting::Fixed,
        }));
        blocks
    }

    fn variable(&self, kind: VariableKind) -> Option<ComponentVariable> {
        Some(*self.slot(kind))
    }

    fn set_variable(
        &mut self,
        kind: VariableKind,
        setting: Setting,
        value: f64,
    ) -> ComponentResult<()> {
        variable::specify(&VARIABLES, self.slot_mut(kind), kind, setting, value)
    }

    fn update_free_variable(&mut self, kind: VariableKind, value: f64) -> ComponentResult<()> {
        let descriptor = variable::lookup(&VARIABLES, kind)?;
        self.slot_mut(kind).value = descriptor.clamp(value);
        Ok(())
    }

    fn residuals(&self, ctx: &EvalContext<'_>, out: &mut Vec<f64>) -> ComponentResult<()> {
        out.push(self.mass_flow_func(ctx)?);
        self.stoichiometry_func(ctx, out)?;
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
                    STOICHIOMETRY => self.stoichiometry_deriv(ctx, jac, row)?,
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

    /// Base results (`ti`, `lamb`), then `eta = -res / ti` and
    /// `Q_loss = -(1 - eta) ti` where `res` is the energy balance without
    /// the heat release term.
    fn calc_parameters(&mut self, ctx: &EvalContext<'_>) -> ComponentResult<Vec<Diagnostic>> {
        let mut diagnostics = self.base.calc_parameters(ctx)?;

        let ti = self.variable_value(VariableKind::Ti);
        if ti.is_nan() || ti <= 0.0 {
            return Err(ComponentError::UndefinedComputation {
                what: format!(
                    "thermal input of {} is {ti} W; efficiency is undefined",
                    self.label()
                ),
            });
        }

        let res = self.reference_balance(ctx)?;
        let eta = -res / ti;
        let q_loss = -(1.0 - eta) * ti;
        self.vars.get_mut(VariableKind::Eta).value = eta;
        self.vars.get_mut(VariableKind::QLoss).value = q_loss;

        for (kind, value) in [(VariableKind::Eta, eta), (VariableKind::QLoss, q_loss)] {
            if let Some(d) = variable::lookup(&VARIABLES, kind)?.check_result(self.label(), value) {
                diagnostics.push(d);
            }
        }

        if ctx.ports.in2.p() < ctx.ports.in1.p() {
            diagnostics.push(Diagnostic::new(
                self.label(),
                DiagnosticKind::PhysicalImplausibility,
                format!(
                    "The pressure at inlet 2 is lower than the pressure at inlet 1 \
                     at component {}.",
                    self.label()
                ),
            ));
        }
        Ok(diagnostics)
    }
}
