// Attributed transitions and their gating conditions

use serde::{Deserialize, Serialize};

/// Comparison mode of a condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConditionMode {
    /// Bool/trigger is set
    If,
    /// Bool is unset
    IfNot,
    /// Numeric parameter greater than threshold
    Greater,
    /// Numeric parameter less than threshold
    Less,
    /// Integer parameter equals threshold
    Equals,
    /// Integer parameter differs from threshold
    NotEqual,
}

/// A (mode, threshold, parameter-name) triple gating a transition.
///
/// The parameter is stored as a string key; it is never re-validated against
/// a target controller's parameter list when copied, because the target's
/// parameters are seeded from the source before any transition is copied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    /// Comparison mode
    pub mode: ConditionMode,
    /// Comparison threshold
    pub threshold: f32,
    /// Name of the gating parameter
    pub parameter: String,
}

impl Condition {
    /// Create a condition
    pub fn new(mode: ConditionMode, threshold: f32, parameter: impl Into<String>) -> Self {
        Self {
            mode,
            threshold,
            parameter: parameter.into(),
        }
    }
}

/// Which in-flight transition may interrupt this one
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum InterruptionSource {
    /// No interruption
    #[default]
    None,
    /// Transitions from the source state
    Source,
    /// Transitions from the destination state
    Destination,
    /// Source first, then destination
    SourceThenDestination,
    /// Destination first, then source
    DestinationThenSource,
}

/// A directed, attributed transition between two states.
///
/// The source state is implicit: concrete transitions are owned by the
/// source state's outgoing edge list, so only attributes live here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transition {
    /// Transition name, may be empty
    #[serde(default)]
    pub name: String,
    /// Whether `exit_time` is honored
    pub has_exit_time: bool,
    /// Normalized exit time
    pub exit_time: f32,
    /// Whether `duration` is in seconds rather than normalized
    pub has_fixed_duration: bool,
    /// Blend duration
    pub duration: f32,
    /// Normalized destination start offset
    pub offset: f32,
    /// Interruption policy
    #[serde(default)]
    pub interruption_source: InterruptionSource,
    /// Queue interruptions in order
    #[serde(default = "default_true")]
    pub ordered_interruption: bool,
    /// Ordered gating conditions
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

fn default_true() -> bool {
    true
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            name: String::new(),
            has_exit_time: true,
            exit_time: 0.75,
            has_fixed_duration: true,
            duration: 0.25,
            offset: 0.0,
            interruption_source: InterruptionSource::None,
            ordered_interruption: true,
            conditions: Vec::new(),
        }
    }
}

impl Transition {
    /// Append a condition
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }
}

/// A transition whose logical source is the virtual "any state" origin.
///
/// Stored at machine scope, never in a state's outgoing list; the
/// destination is a name key so the machine's broadcast set survives state
/// re-linking across controllers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnyStateTransition {
    /// Destination state name
    pub destination: String,
    /// Transition attributes and conditions
    #[serde(flatten)]
    pub transition: Transition,
}

impl AnyStateTransition {
    /// Create an any-state transition to the named destination
    pub fn new(destination: impl Into<String>, transition: Transition) -> Self {
        Self {
            destination: destination.into(),
            transition,
        }
    }
}
