//! leretouche - Transition Rewriting and Authoring Sessions
//!
//! *La Retouche* (The Touch-up) - Batch rewriting of transition timing
//! attributes plus stateful authoring sessions for wiring transitions and
//! trigger conditions across a machine under edit.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Flat timing rewrites across a machine's transitions.
pub mod batch;
/// Two-step transition wiring between marked and target states.
pub mod link;
/// Ordered trigger-condition attachment with a cursor.
pub mod trigger;

pub use batch::TransitionRetime;
pub use link::LinkSession;
pub use trigger::TriggerSession;

use thiserror::Error;

/// Result type for rewriting operations
pub type Result<T> = std::result::Result<T, RetoucheError>;

/// Errors raised while rewriting or wiring transitions
#[derive(Debug, Error)]
pub enum RetoucheError {
    /// An operation was given no states or transitions to work on
    #[error("no states or transitions selected")]
    EmptySelection,

    /// Completion was requested before any start state was marked
    #[error("no start states marked")]
    NothingMarked,

    /// Linking from several states to several states has no defined pairing
    #[error("cannot link multiple start states to multiple target states")]
    AmbiguousLink,

    /// Every declared trigger has already been attached
    #[error("all {0} declared triggers have been attached")]
    TriggersExhausted(usize),

    /// The next trigger in line is not declared on the controller
    #[error("trigger parameter not declared on controller: {0}")]
    UndeclaredTrigger(String),

    /// A named layer does not exist on the controller
    #[error("unknown layer: {0}")]
    UnknownLayer(String),

    /// A transition referenced by ID is not present in the machine
    #[error("unknown transition index: {0}")]
    UnknownTransition(usize),

    /// Forwarded model-level failures
    #[error(transparent)]
    Machine(#[from] lemachine::MachineError),
}
