// Controller-scoped parameters

use serde::{Deserialize, Serialize};

/// Value kind of a controller parameter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParameterKind {
    /// Boolean flag
    Bool,
    /// Signed integer
    Int,
    /// Floating point value
    Float,
    /// One-shot trigger, consumed when a transition fires
    Trigger,
}

/// A parameter declared at controller scope.
///
/// Parameters are shared across all layers; transition conditions refer to
/// them by name only, never by object reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    /// Unique parameter name
    pub name: String,
    /// Value kind
    pub kind: ParameterKind,
}

impl Parameter {
    /// Create a parameter declaration
    pub fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
