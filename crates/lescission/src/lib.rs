//! lescission - Controller Partition Engine
//!
//! *La Scission* (The Split) - Partitions a state-transition controller into
//! independent, self-contained controllers: classify root states, expand each
//! root set by reachability, deep-clone the induced sub-machine into a fresh
//! controller, and optionally prune the extracted states from the source.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Root classification predicates and grouping.
pub mod classify;
/// Subset cloning with name-keyed re-linking.
pub mod clone;
/// Extraction orchestration across classified groups.
pub mod orchestrate;
/// Breadth-first reachability under exclusion rules.
pub mod reach;

pub use classify::{find_any_state_transition_to, Classifier, GroupSpec, RootGroup, RootRule};
pub use clone::{copy_layer, copy_states_and_transitions, copy_state};
pub use orchestrate::{ControllerSink, GroupOutcome, SplitOptions, SplitReport, Splitter};
pub use reach::reachable_from;

use thiserror::Error;

/// Result type for partition operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors raised while partitioning a controller
#[derive(Debug, Error)]
pub enum SplitError {
    /// A layer required by a downstream cloning step was not found
    #[error("layer not found: {0}")]
    LayerNotFound(String),

    /// A classified root state has no inbound any-state transition although
    /// its classification implied one must exist
    #[error("no any-state transition into root state: {0}")]
    MissingAnyStateTransition(String),

    /// Two classified groups expanded to overlapping reachable sets
    #[error("groups {first} and {second} both reach state {state}")]
    OverlappingGroups {
        /// Name of the earlier group
        first: String,
        /// Name of the later group
        second: String,
        /// A state reached by both
        state: String,
    },

    /// The classifier has no group specifications
    #[error("classifier declares no groups")]
    EmptyClassifier,

    /// Model invariant violation surfaced by the graph store
    #[error(transparent)]
    Machine(#[from] lemachine::MachineError),

    /// The persistence sink failed to store an extracted controller
    #[error("persistence sink failure: {0}")]
    Sink(#[source] anyhow::Error),
}
