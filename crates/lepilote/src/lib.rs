//! lepilote - Command-line Driver
//!
//! *Le Pilote* (The Pilot) - Command-line front end over the LeScission
//! crates: split a controller document by a TOML plan, batch-retime
//! transition attributes, and inspect documents.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Command-line interface and command implementations.
pub mod cli;
/// TOML split-plan loading and validation.
pub mod plan;

pub use cli::Cli;
pub use plan::{GroupEntry, SplitPlan};
