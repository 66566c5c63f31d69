// Flat batch timing rewrite

use lemachine::StateMachine;
use tracing::debug;

/// Replacement timing values applied uniformly across a machine.
///
/// The rewrite is flat: it touches every concrete transition and every
/// any-state transition of the given machine, and nothing below nested
/// machines (there are none in this model).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionRetime {
    /// Normalized exit time written to every transition
    pub exit_time: f32,
    /// Transition duration written to every transition
    pub duration: f32,
    /// Destination-state offset written to every transition
    pub offset: f32,
}

impl TransitionRetime {
    /// Rewrite every transition in the machine, returning the count touched
    pub fn apply(&self, machine: &mut StateMachine) -> usize {
        let mut count = 0;

        let ids: Vec<_> = machine
            .state_ids()
            .flat_map(|state| machine.outgoing_ids(state))
            .collect();
        for id in ids {
            if let Some(transition) = machine.transition_mut(id) {
                transition.exit_time = self.exit_time;
                transition.duration = self.duration;
                transition.offset = self.offset;
                count += 1;
            }
        }

        for broadcast in machine.any_state_transitions_mut() {
            broadcast.transition.exit_time = self.exit_time;
            broadcast.transition.duration = self.duration;
            broadcast.transition.offset = self.offset;
            count += 1;
        }

        debug!(count, "rewrote transition timing");
        count
    }
}
