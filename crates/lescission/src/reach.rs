// Breadth-first reachability with sentinel exclusion

use lemachine::{StateId, StateMachine, ANY_STATE};
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Compute the set of states reachable from `start`, including `start`.
///
/// Follows only concrete outgoing transitions of already-visited states,
/// breadth-first. Destinations named with the "Any State" sentinel are never
/// enqueued nor included. Membership is a set-add, so cycles terminate
/// naturally and repeated runs from the same start yield the same set; this
/// is a pure function of the machine.
pub fn reachable_from(machine: &StateMachine, start: StateId) -> HashSet<StateId> {
    let mut visited: HashSet<StateId> = HashSet::new();
    let mut queue: VecDeque<StateId> = VecDeque::new();

    match machine.state(start) {
        // The sentinel is never traversed as a real state, start included.
        None => return visited,
        Some(state) if state.name == ANY_STATE => return visited,
        Some(_) => {}
    }
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for (next, _) in machine.outgoing(current) {
            if visited.contains(&next) {
                continue;
            }
            let Some(state) = machine.state(next) else {
                continue;
            };
            if state.name == ANY_STATE {
                continue;
            }
            visited.insert(next);
            queue.push_back(next);
        }
    }

    if let Some(root) = machine.state(start) {
        debug!(
            root = %root.name,
            reached = visited.len(),
            "reachability expansion complete"
        );
    }

    visited
}
