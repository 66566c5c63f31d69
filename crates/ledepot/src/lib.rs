//! ledepot - Controller Persistence
//!
//! *Le Dépôt* (The Depot) - Loads and stores controllers as self-contained
//! JSON documents. The depot is both the source locator (handing the engine a
//! fully loaded controller) and the persistence sink for extracted artifacts.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Serde document form of a controller.
pub mod document;
/// Directory-backed depot.
pub mod store;

pub use document::{ControllerDoc, LayerDoc, TransitionDoc};
pub use store::DirectoryDepot;

use std::path::PathBuf;
use thiserror::Error;

/// Result type for depot operations
pub type Result<T> = std::result::Result<T, DepotError>;

/// Errors raised while loading or storing controller documents
#[derive(Debug, Error)]
pub enum DepotError {
    /// I/O failure with path context
    #[error("I/O error: {context} (path: {path:?})")]
    Io {
        /// What was being attempted
        context: String,
        /// Affected path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Document (de)serialization failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A transition or default-state entry references a state the layer's
    /// document does not declare
    #[error("layer {layer} references unknown state: {state}")]
    UnknownStateRef {
        /// Layer name
        layer: String,
        /// Missing state name
        state: String,
    },

    /// Model invariant violation while rebuilding the controller
    #[error(transparent)]
    Machine(#[from] lemachine::MachineError),
}
