//! Advisory findings from postprocessing.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Converged state is solvable but physically questionable.
    PhysicalImplausibility,
    /// A computed result lies outside its declared range.
    ResultOutOfBounds,
}

/// A non-fatal message about a component's converged state.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub component: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(component: &str, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            component: component.to_string(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.component, self.message)
    }
}
