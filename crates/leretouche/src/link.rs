// Two-step transition wiring session

use crate::{Result, RetoucheError};
use lemachine::{StateId, StateMachine, Transition, TransitionId};
use tracing::debug;

/// A two-step wiring session: mark start states, then complete towards
/// target states.
///
/// Completion fans out from many marked states to a single target, or from
/// a single marked state to many targets. Many-to-many has no defined
/// pairing and is rejected. Each session instance carries its own marks,
/// so concurrent edits on different machines never interfere.
#[derive(Debug, Default)]
pub struct LinkSession {
    marked: Option<Vec<StateId>>,
}

impl LinkSession {
    /// Start a session with nothing marked
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether start states are currently marked
    pub fn has_marks(&self) -> bool {
        self.marked.is_some()
    }

    /// Remember the given states as the start of the next link
    pub fn mark(&mut self, states: &[StateId]) -> Result<()> {
        if states.is_empty() {
            return Err(RetoucheError::EmptySelection);
        }
        debug!(count = states.len(), "marked start states");
        self.marked = Some(states.to_vec());
        Ok(())
    }

    /// Create transitions from the marked states to the given targets.
    ///
    /// Created transitions carry default attributes and no conditions. The
    /// marks are consumed whether or not wiring succeeds, matching a fresh
    /// session after every completion attempt.
    pub fn complete(
        &mut self,
        machine: &mut StateMachine,
        targets: &[StateId],
    ) -> Result<Vec<TransitionId>> {
        let marked = self.marked.take().ok_or(RetoucheError::NothingMarked)?;
        if targets.is_empty() {
            return Err(RetoucheError::EmptySelection);
        }
        if marked.len() > 1 && targets.len() > 1 {
            return Err(RetoucheError::AmbiguousLink);
        }

        let mut created = Vec::new();
        if targets.len() == 1 {
            for from in &marked {
                created.push(machine.add_transition(*from, targets[0], Transition::default())?);
            }
        } else {
            for to in targets {
                created.push(machine.add_transition(marked[0], *to, Transition::default())?);
            }
        }
        debug!(count = created.len(), "created transitions");
        Ok(created)
    }

    /// Drop any marked states
    pub fn forget(&mut self) {
        self.marked = None;
    }
}
