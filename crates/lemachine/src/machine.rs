// State machine graph implementation

use crate::state::State;
use crate::transition::{AnyStateTransition, Transition};
use crate::{MachineError, Result};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// State ID type (stable across removals)
pub type StateId = petgraph::stable_graph::NodeIndex;

/// Transition ID type
pub type TransitionId = petgraph::stable_graph::EdgeIndex;

/// Reserved destination name for the virtual "any state" origin.
///
/// A state carrying this name must never be traversed as a real state.
pub const ANY_STATE: &str = "Any State";

/// A single layer's state machine.
///
/// Wraps a stable directed graph of states and concrete transitions with a
/// name index, the machine-scoped any-state transition set, and the
/// designated default state. State names are unique within a machine and a
/// state belongs to exactly one machine at a time.
pub struct StateMachine {
    /// Internal graph structure
    graph: StableGraph<State, Transition>,

    /// State name to ID mapping
    name_index: HashMap<String, StateId>,

    /// Transitions originating from the virtual "any state" source
    any_state_transitions: Vec<AnyStateTransition>,

    /// Designated initial state, if set
    default_state: Option<StateId>,
}

impl StateMachine {
    /// Create a new empty machine
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            name_index: HashMap::new(),
            any_state_transitions: Vec::new(),
            default_state: None,
        }
    }

    /// Add a state, rejecting duplicate names
    pub fn add_state(&mut self, state: State) -> Result<StateId> {
        if self.name_index.contains_key(&state.name) {
            return Err(MachineError::DuplicateState(state.name));
        }
        let name = state.name.clone();
        let id = self.graph.add_node(state);
        self.name_index.insert(name, id);
        Ok(id)
    }

    /// Remove a state and everything referencing it.
    ///
    /// Incident concrete transitions are removed by the underlying graph;
    /// any-state transitions targeting the state are dropped here, and the
    /// default-state designation is cleared if it pointed at the state.
    pub fn remove_state(&mut self, id: StateId) -> Option<State> {
        let state = self.graph.remove_node(id)?;
        self.name_index.remove(&state.name);
        self.any_state_transitions
            .retain(|t| t.destination != state.name);
        if self.default_state == Some(id) {
            self.default_state = None;
        }
        Some(state)
    }

    /// Find a state ID by name
    pub fn find_state(&self, name: &str) -> Option<StateId> {
        self.name_index.get(name).copied()
    }

    /// Get a state by ID
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.graph.node_weight(id)
    }

    /// Get a state mutably by ID
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.graph.node_weight_mut(id)
    }

    /// Iterate all state IDs in insertion order
    pub fn state_ids(&self) -> impl Iterator<Item = StateId> + '_ {
        self.graph.node_indices()
    }

    /// Number of states
    pub fn state_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of concrete transitions
    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a concrete transition between two member states
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        transition: Transition,
    ) -> Result<TransitionId> {
        for id in [from, to] {
            if self.graph.node_weight(id).is_none() {
                return Err(MachineError::UnknownState(format!(
                    "state index {}",
                    id.index()
                )));
            }
        }
        Ok(self.graph.add_edge(from, to, transition))
    }

    /// Get a transition by ID
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.graph.edge_weight(id)
    }

    /// Get a transition mutably by ID
    pub fn transition_mut(&mut self, id: TransitionId) -> Option<&mut Transition> {
        self.graph.edge_weight_mut(id)
    }

    /// Get a transition's (source, destination) endpoints
    pub fn transition_endpoints(&self, id: TransitionId) -> Option<(StateId, StateId)> {
        self.graph.edge_endpoints(id)
    }

    /// Iterate a state's outgoing transitions as (destination, transition)
    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = (StateId, &Transition)> + '_ {
        self.graph
            .edges_directed(id, Direction::Outgoing)
            .map(|e| (e.target(), e.weight()))
    }

    /// Collect a state's outgoing transition IDs
    pub fn outgoing_ids(&self, id: StateId) -> Vec<TransitionId> {
        self.graph
            .edges_directed(id, Direction::Outgoing)
            .map(|e| e.id())
            .collect()
    }

    /// Add an any-state transition; the destination must be a member state
    pub fn add_any_state_transition(&mut self, transition: AnyStateTransition) -> Result<()> {
        if !self.name_index.contains_key(&transition.destination) {
            return Err(MachineError::UnknownState(transition.destination));
        }
        self.any_state_transitions.push(transition);
        Ok(())
    }

    /// The machine-scoped any-state transition set
    pub fn any_state_transitions(&self) -> &[AnyStateTransition] {
        &self.any_state_transitions
    }

    /// Iterate any-state transitions mutably
    pub fn any_state_transitions_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut AnyStateTransition> + '_ {
        self.any_state_transitions.iter_mut()
    }

    /// Designate the default state; it must be a member
    pub fn set_default_state(&mut self, id: StateId) -> Result<()> {
        if self.graph.node_weight(id).is_none() {
            return Err(MachineError::UnknownState(format!(
                "state index {}",
                id.index()
            )));
        }
        self.default_state = Some(id);
        Ok(())
    }

    /// The designated default state, if set
    pub fn default_state(&self) -> Option<StateId> {
        self.default_state
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("states", &self.graph.node_count())
            .field("transitions", &self.graph.edge_count())
            .field("any_state_transitions", &self.any_state_transitions.len())
            .field("default_state", &self.default_state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{Condition, ConditionMode};

    fn machine_with(names: &[&str]) -> (StateMachine, Vec<StateId>) {
        let mut machine = StateMachine::new();
        let ids = names
            .iter()
            .map(|n| machine.add_state(State::new(*n)).unwrap())
            .collect();
        (machine, ids)
    }

    #[test]
    fn add_state_rejects_duplicate_names() {
        let mut machine = StateMachine::new();
        machine.add_state(State::new("Idle")).unwrap();
        let err = machine.add_state(State::new("Idle")).unwrap_err();
        assert!(matches!(err, MachineError::DuplicateState(name) if name == "Idle"));
    }

    #[test]
    fn find_state_by_name() {
        let (machine, ids) = machine_with(&["Idle", "Walk"]);
        assert_eq!(machine.find_state("Walk"), Some(ids[1]));
        assert_eq!(machine.find_state("Run"), None);
    }

    #[test]
    fn remove_state_drops_incident_transitions() {
        let (mut machine, ids) = machine_with(&["Idle", "Walk", "Run"]);
        machine
            .add_transition(ids[0], ids[1], Transition::default())
            .unwrap();
        machine
            .add_transition(ids[1], ids[2], Transition::default())
            .unwrap();

        machine.remove_state(ids[1]);

        assert_eq!(machine.state_count(), 2);
        assert_eq!(machine.transition_count(), 0);
        assert_eq!(machine.find_state("Walk"), None);
    }

    #[test]
    fn remove_state_drops_targeting_any_state_transitions() {
        let (mut machine, ids) = machine_with(&["Idle", "Walk"]);
        machine
            .add_any_state_transition(AnyStateTransition::new(
                "Idle",
                Transition::default().with_condition(Condition::new(
                    ConditionMode::If,
                    0.0,
                    "Enter",
                )),
            ))
            .unwrap();
        machine
            .add_any_state_transition(AnyStateTransition::new("Walk", Transition::default()))
            .unwrap();

        machine.remove_state(ids[0]);

        assert_eq!(machine.any_state_transitions().len(), 1);
        assert_eq!(machine.any_state_transitions()[0].destination, "Walk");
    }

    #[test]
    fn remove_state_clears_default_designation() {
        let (mut machine, ids) = machine_with(&["Idle", "Walk"]);
        machine.set_default_state(ids[0]).unwrap();
        machine.remove_state(ids[0]);
        assert_eq!(machine.default_state(), None);

        // Removing a non-default state leaves the designation alone.
        machine.set_default_state(ids[1]).unwrap();
        let walk = machine.find_state("Walk").unwrap();
        assert_eq!(machine.default_state(), Some(walk));
    }

    #[test]
    fn any_state_transition_requires_member_destination() {
        let (mut machine, _) = machine_with(&["Idle"]);
        let err = machine
            .add_any_state_transition(AnyStateTransition::new("Walk", Transition::default()))
            .unwrap_err();
        assert!(matches!(err, MachineError::UnknownState(name) if name == "Walk"));
    }

    #[test]
    fn outgoing_lists_destinations() {
        let (mut machine, ids) = machine_with(&["Idle", "Walk", "Run"]);
        machine
            .add_transition(ids[0], ids[1], Transition::default())
            .unwrap();
        machine
            .add_transition(ids[0], ids[2], Transition::default())
            .unwrap();

        let mut targets: Vec<StateId> = machine.outgoing(ids[0]).map(|(to, _)| to).collect();
        targets.sort();
        assert_eq!(targets, vec![ids[1], ids[2]]);
    }

    #[test]
    fn state_ids_survive_unrelated_removals() {
        let (mut machine, ids) = machine_with(&["Idle", "Walk", "Run"]);
        machine.remove_state(ids[0]);
        assert_eq!(machine.state(ids[2]).unwrap().name, "Run");
    }
}
