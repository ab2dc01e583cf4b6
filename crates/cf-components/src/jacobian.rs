//! Component-local view of the solver's Jacobian.
//!
//! The solver owns the full matrix. During assembly it lends each component
//! a [`JacobianView`] restricted to that component's rows, together with a
//! [`ColumnMap`] from (port, state variable) and component variables to
//! global columns. Writes to quantities without a column (fixed values) are
//! dropped.

use crate::connection::{Port, StateVar};
use crate::variable::VariableKind;
use nalgebra::DMatrix;

/// Which equation blocks to (re)write in an assembly call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyPass {
    /// Every block; used on the first iteration.
    Full,
    /// Only blocks whose derivatives change with the state.
    VariableOnly,
}

impl AssemblyPass {
    pub fn includes(self, constant_deriv: bool) -> bool {
        match self {
            AssemblyPass::Full => true,
            AssemblyPass::VariableOnly => !constant_deriv,
        }
    }
}

/// Column address of a partial derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    State(Port, StateVar),
    Variable(VariableKind),
}

/// Global columns of one port's connection state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortColumns {
    pub m: Option<usize>,
    pub p: Option<usize>,
    pub h: Option<usize>,
    pub fluid: Vec<Option<usize>>,
}

impl PortColumns {
    pub fn get(&self, var: StateVar) -> Option<usize> {
        match var {
            StateVar::MassFlow => self.m,
            StateVar::Pressure => self.p,
            StateVar::Enthalpy => self.h,
            StateVar::Fraction(i) => self.fluid.get(i).copied().flatten(),
        }
    }
}

/// Column lookup for one component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    pub ports: [PortColumns; 3],
    pub variables: [Option<usize>; VariableKind::COUNT],
}

impl ColumnMap {
    pub fn column(&self, column: Column) -> Option<usize> {
        match column {
            Column::State(port, var) => self.ports[port.index()].get(var),
            Column::Variable(kind) => self.variables[kind.index()],
        }
    }
}

/// Mutable access to a component's rows of the global Jacobian.
pub struct JacobianView<'a> {
    matrix: &'a mut DMatrix<f64>,
    row_offset: usize,
    rows: usize,
    columns: &'a ColumnMap,
}

impl<'a> JacobianView<'a> {
    pub fn new(
        matrix: &'a mut DMatrix<f64>,
        row_offset: usize,
        rows: usize,
        columns: &'a ColumnMap,
    ) -> Self {
        debug_assert!(row_offset + rows <= matrix.nrows());
        Self {
            matrix,
            row_offset,
            rows,
            columns,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Accumulate `value` at local `row` and the global column of `column`.
    pub fn add(&mut self, row: usize, column: Column, value: f64) {
        debug_assert!(row < self.rows, "row {row} outside component block");
        if let Some(col) = self.columns.column(column) {
            self.matrix[(self.row_offset + row, col)] += value;
        }
    }

    pub fn add_state(&mut self, row: usize, port: Port, var: StateVar, value: f64) {
        self.add(row, Column::State(port, var), value);
    }

    /// Current entry at local `row`, or zero if `column` is not mapped.
    pub fn get(&self, row: usize, column: Column) -> f64 {
        self.columns
            .column(column)
            .map(|col| self.matrix[(self.row_offset + row, col)])
            .unwrap_or(0.0)
    }
}
