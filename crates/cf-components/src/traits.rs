//! Core traits for component models.

use crate::connection::{Connection, Port};
use crate::diagnostic::Diagnostic;
use crate::error::ComponentResult;
use crate::jacobian::{AssemblyPass, JacobianView};
use crate::report::{self, EquationReport};
use crate::variable::{ComponentVariable, Setting, VariableKind};
use cf_fluids::{FluidModel, Species};

/// References to the connections attached to a two-inlet, one-outlet
/// component.
#[derive(Clone, Copy)]
pub struct PortStates<'a> {
    pub in1: &'a Connection,
    pub in2: &'a Connection,
    pub out1: &'a Connection,
}

impl<'a> PortStates<'a> {
    pub fn get(&self, port: Port) -> &'a Connection {
        match port {
            Port::In1 => self.in1,
            Port::In2 => self.in2,
            Port::Out1 => self.out1,
        }
    }

    pub fn inlets(&self) -> [(Port, &'a Connection); 2] {
        [(Port::In1, self.in1), (Port::In2, self.in2)]
    }

    pub fn outlets(&self) -> [(Port, &'a Connection); 1] {
        [(Port::Out1, self.out1)]
    }
}

/// Everything an equation needs to evaluate.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub fluid: &'a dyn FluidModel,
    pub ports: PortStates<'a>,
}

/// Metadata of a group of consecutive equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquationBlock {
    pub name: &'static str,
    pub num_eq: usize,
    /// Jacobian rows do not change between iterations.
    pub constant_deriv: bool,
}

/// A component contributing equations to the global Newton system.
///
/// Residuals and derivatives are pure functions of the connection states
/// and the component's own variables. Postprocessing runs once per solve
/// and may update result variables.
pub trait Component: Send + Sync {
    /// Component label for diagnostics and reports.
    fn label(&self) -> &str;

    /// Human-readable component type.
    fn kind(&self) -> &'static str;

    /// Network species the component was built for.
    fn species(&self) -> &[Species];

    /// Active equation blocks in row order.
    fn equation_blocks(&self) -> Vec<EquationBlock>;

    fn num_equations(&self) -> usize {
        self.equation_blocks().iter().map(|b| b.num_eq).sum()
    }

    /// Current value and setting of a variable, if the component has it.
    fn variable(&self, kind: VariableKind) -> Option<ComponentVariable>;

    /// Variables that are solver unknowns.
    fn free_variables(&self) -> Vec<VariableKind> {
        VariableKind::ALL
            .into_iter()
            .filter(|&k| self.variable(k).is_some_and(|v| v.is_free()))
            .collect()
    }

    /// Apply a user setting. Out-of-range values, result-only variables and
    /// variables the component does not have are rejected.
    fn set_variable(
        &mut self,
        kind: VariableKind,
        setting: Setting,
        value: f64,
    ) -> ComponentResult<()>;

    /// Write a solver iterate into a free variable, projected into its range.
    fn update_free_variable(&mut self, kind: VariableKind, value: f64) -> ComponentResult<()>;

    /// Append one residual per active equation, in block order.
    fn residuals(&self, ctx: &EvalContext<'_>, out: &mut Vec<f64>) -> ComponentResult<()>;

    /// Accumulate partial derivatives of the blocks selected by `pass`.
    ///
    /// Rows of selected blocks must be zero on entry.
    fn derivatives(
        &self,
        ctx: &EvalContext<'_>,
        jac: &mut JacobianView<'_>,
        pass: AssemblyPass,
    ) -> ComponentResult<()>;

    /// Post-convergence results. Runs once per solve.
    fn calc_parameters(&mut self, ctx: &EvalContext<'_>) -> ComponentResult<Vec<Diagnostic>>;

    /// LaTeX description of every active equation block.
    fn describe_equations(&self) -> Vec<EquationReport> {
        self.equation_blocks()
            .iter()
            .filter_map(|block| report::describe(self.kind(), self.label(), block))
            .collect()
    }
}
