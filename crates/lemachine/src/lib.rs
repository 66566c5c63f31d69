//! lemachine - Controller Model Core
//!
//! *La Machine* (The Machine) - In-memory model of an animation state-transition
//! controller: layered state machines, attributed transitions, graph-scoped
//! any-state transitions, and a shared parameter namespace.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Controller aggregate: parameters plus ordered layers.
pub mod controller;
/// Layer metadata wrapping a state machine.
pub mod layer;
/// The state machine graph and its invariant-preserving mutators.
pub mod machine;
/// Controller-scoped parameter declarations.
pub mod parameter;
/// Per-state attributes and attached behaviors.
pub mod state;
/// Attributed transitions, conditions, and any-state transitions.
pub mod transition;

pub use controller::Controller;
pub use layer::{BlendMode, Layer};
pub use machine::{StateId, StateMachine, TransitionId, ANY_STATE};
pub use parameter::{Parameter, ParameterKind};
pub use state::{Behavior, State};
pub use transition::{AnyStateTransition, Condition, ConditionMode, InterruptionSource, Transition};

use thiserror::Error;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, MachineError>;

/// Errors raised by invariant-preserving model mutations
#[derive(Debug, Error)]
pub enum MachineError {
    /// A state with the same name already exists in the machine
    #[error("duplicate state name: {0}")]
    DuplicateState(String),

    /// The referenced state is not a member of the machine
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// A parameter with the same name is already declared
    #[error("duplicate parameter name: {0}")]
    DuplicateParameter(String),
}
