//! Component parameters that can be fixed, freed or computed.
//!
//! Each component owns a static descriptor table indexed by
//! [`VariableKind`]; the descriptor holds the bounds and the function
//! pointers of the equation the variable activates.

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::{ComponentError, ComponentResult};
use crate::jacobian::JacobianView;
use crate::traits::EvalContext;

/// Relative slack when judging computed results against their bounds.
const RESULT_TOLERANCE: f64 = 1e-6;

/// Fixed set of parameters exposed by combustion components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    /// Air ratio, supplied oxygen over stoichiometric oxygen.
    Lamb,
    /// Thermal input [W].
    Ti,
    /// Pressure ratio outlet 1 over inlet 1.
    Pr,
    /// Combustion efficiency.
    Eta,
    /// Heat loss to the surroundings [W].
    QLoss,
}

impl VariableKind {
    pub const COUNT: usize = 5;

    pub const ALL: [VariableKind; Self::COUNT] = [
        VariableKind::Lamb,
        VariableKind::Ti,
        VariableKind::Pr,
        VariableKind::Eta,
        VariableKind::QLoss,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            VariableKind::Lamb => "lamb",
            VariableKind::Ti => "ti",
            VariableKind::Pr => "pr",
            VariableKind::Eta => "eta",
            VariableKind::QLoss => "Q_loss",
        }
    }
}

impl std::fmt::Display for VariableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for VariableKind {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ComponentError::InvalidConfiguration {
                what: format!("unknown component variable '{s}'"),
            })
    }
}

/// One side of a variable's admissible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Inclusive(f64),
    Exclusive(f64),
}

impl Bound {
    pub fn value(self) -> f64 {
        match self {
            Bound::Inclusive(v) | Bound::Exclusive(v) => v,
        }
    }
}

/// How a variable takes part in the solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Setting {
    /// Equation inactive.
    #[default]
    Unset,
    /// User value; the equation is active.
    Fixed,
    /// Equation active and the value is a solver unknown.
    Free,
}

/// Stored state of one component variable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentVariable {
    pub value: f64,
    pub setting: Setting,
}

impl ComponentVariable {
    pub fn is_active(&self) -> bool {
        self.setting != Setting::Unset
    }

    pub fn is_free(&self) -> bool {
        self.setting == Setting::Free
    }
}

/// Storage for every [`VariableKind`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VariableSet {
    items: [ComponentVariable; VariableKind::COUNT],
}

impl VariableSet {
    pub fn get(&self, kind: VariableKind) -> &ComponentVariable {
        &self.items[kind.index()]
    }

    pub fn get_mut(&mut self, kind: VariableKind) -> &mut ComponentVariable {
        &mut self.items[kind.index()]
    }
}

pub type ResidualFn<C> = fn(&C, &EvalContext<'_>) -> ComponentResult<f64>;

pub type DerivativeFn<C> =
    fn(&C, &EvalContext<'_>, &mut JacobianView<'_>, usize) -> ComponentResult<()>;

/// Static description of a variable on component type `C`.
pub struct VariableDescriptor<C> {
    pub kind: VariableKind,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
    /// Computed in postprocessing only; never set by the user.
    pub result_only: bool,
    /// Whether the equation's Jacobian row stays fixed while the variable is.
    pub constant_when_fixed: bool,
    pub residual: Option<ResidualFn<C>>,
    pub derivative: Option<DerivativeFn<C>>,
}

impl<C> Clone for VariableDescriptor<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for VariableDescriptor<C> {}

impl<C> std::fmt::Debug for VariableDescriptor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableDescriptor")
            .field("kind", &self.kind)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("result_only", &self.result_only)
            .finish_non_exhaustive()
    }
}

impl<C> VariableDescriptor<C> {
    /// Whether `value` lies in the declared range, with slack `tol`.
    pub fn admits_within(&self, value: f64, tol: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let above_min = match self.min {
            None => true,
            Some(Bound::Inclusive(lo)) => value >= lo - tol,
            Some(Bound::Exclusive(lo)) => value > lo - tol,
        };
        let below_max = match self.max {
            None => true,
            Some(Bound::Inclusive(hi)) => value <= hi + tol,
            Some(Bound::Exclusive(hi)) => value < hi + tol,
        };
        above_min && below_max
    }

    pub fn admits(&self, value: f64) -> bool {
        self.admits_within(value, 0.0)
    }

    /// Reject values the user may not assign.
    pub fn check_user_value(&self, value: f64) -> ComponentResult<()> {
        if self.result_only {
            return Err(ComponentError::InvalidConfiguration {
                what: format!("{} is a result and cannot be specified", self.kind),
            });
        }
        if !self.admits(value) {
            return Err(ComponentError::InvalidConfiguration {
                what: format!("{} = {value} is outside {}", self.kind, self.range_text()),
            });
        }
        Ok(())
    }

    /// Project a solver iterate into the admissible range.
    pub fn clamp(&self, value: f64) -> f64 {
        let mut v = value;
        if let Some(lo) = self.min {
            let floor = match lo {
                Bound::Inclusive(lo) => lo,
                Bound::Exclusive(lo) => lo + 1e-9 * lo.abs().max(1.0),
            };
            v = v.max(floor);
        }
        if let Some(hi) = self.max {
            let ceil = match hi {
                Bound::Inclusive(hi) => hi,
                Bound::Exclusive(hi) => hi - 1e-9 * hi.abs().max(1.0),
            };
            v = v.min(ceil);
        }
        v
    }

    /// Diagnostic for a computed value outside the declared range.
    pub fn check_result(&self, component: &str, value: f64) -> Option<Diagnostic> {
        let tol = RESULT_TOLERANCE * value.abs().max(1.0);
        if self.admits_within(value, tol) {
            return None;
        }
        Some(Diagnostic::new(
            component,
            DiagnosticKind::ResultOutOfBounds,
            format!(
                "computed {} = {value} is outside {} at component {component}",
                self.kind,
                self.range_text()
            ),
        ))
    }

    pub fn range_text(&self) -> String {
        let lo = match self.min {
            None => "(-inf".to_string(),
            Some(Bound::Inclusive(v)) => format!("[{v}"),
            Some(Bound::Exclusive(v)) => format!("({v}"),
        };
        let hi = match self.max {
            None => "inf)".to_string(),
            Some(Bound::Inclusive(v)) => format!("{v}]"),
            Some(Bound::Exclusive(v)) => format!("{v})"),
        };
        format!("{lo}, {hi}")
    }
}

/// Find the descriptor for `kind` in a component's table.
pub fn lookup<C>(
    table: &[VariableDescriptor<C>],
    kind: VariableKind,
) -> ComponentResult<&VariableDescriptor<C>> {
    table
        .iter()
        .find(|d| d.kind == kind)
        .ok_or_else(|| ComponentError::InvalidConfiguration {
            what: format!("variable {kind} is not available on this component"),
        })
}

/// Apply a user setting to `slot` after validating it against `table`.
pub fn specify<C>(
    table: &[VariableDescriptor<C>],
    slot: &mut ComponentVariable,
    kind: VariableKind,
    setting: Setting,
    value: f64,
) -> ComponentResult<()> {
    let descriptor = lookup(table, kind)?;
    match setting {
        Setting::Unset => slot.setting = Setting::Unset,
        Setting::Fixed | Setting::Free => {
            descriptor.check_user_value(value)?;
            *slot = ComponentVariable { value, setting };
        }
    }
    Ok(())
}
