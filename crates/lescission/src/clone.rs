// Subset cloning with name-keyed re-linking

use crate::{Result, SplitError};
use lemachine::{AnyStateTransition, Behavior, Layer, State, StateId, StateMachine};
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Clone a state's attributes verbatim, re-instantiating behaviors by kind.
///
/// Behavior instance state is deliberately not carried over (see
/// [`lemachine::Behavior`]); everything else is a value copy.
pub fn copy_state(source: &State) -> State {
    let mut state = source.clone();
    state.behaviors = source
        .behaviors
        .iter()
        .map(|b| Behavior::new(b.kind.clone()))
        .collect();
    state
}

/// Deep-copy a subset of states from `source` into `target`, re-linking
/// transitions through a name-keyed identity map.
///
/// The target is expected to be freshly created; its controller's parameter
/// list must already mirror the source's, which is why condition parameter
/// names are copied as string keys without re-validation.
///
/// Any-state transitions are copied when their destination lies in `subset`,
/// or - when `roots` is supplied - exactly when it lies in `roots`; in that
/// root-aware variant every root must have an inbound any-state transition,
/// since the subset was built from classification state implying one exists.
/// Concrete transitions whose destination falls outside `subset` are dropped
/// with a warning; this uniform policy matches the historical tool while
/// keeping every occurrence visible.
pub fn copy_states_and_transitions(
    source: &StateMachine,
    target: &mut StateMachine,
    subset: &HashSet<StateId>,
    roots: Option<&HashSet<StateId>>,
) -> Result<()> {
    let mut name_map: HashMap<String, StateId> = HashMap::with_capacity(subset.len());

    for id in source.state_ids().filter(|id| subset.contains(id)) {
        let Some(state) = source.state(id) else {
            continue;
        };
        let new_id = target.add_state(copy_state(state))?;
        if source.default_state() == Some(id) {
            target.set_default_state(new_id)?;
        }
        name_map.insert(state.name.clone(), new_id);
    }

    if let Some(roots) = roots {
        for &root in roots {
            let Some(state) = source.state(root) else {
                continue;
            };
            if !source
                .any_state_transitions()
                .iter()
                .any(|t| t.destination == state.name)
            {
                return Err(SplitError::MissingAnyStateTransition(state.name.clone()));
            }
        }
    }

    for any_state in source.any_state_transitions() {
        let Some(dest) = source.find_state(&any_state.destination) else {
            continue;
        };
        let eligible = match roots {
            Some(roots) => roots.contains(&dest),
            None => subset.contains(&dest),
        };
        if eligible {
            target.add_any_state_transition(AnyStateTransition::new(
                any_state.destination.clone(),
                any_state.transition.clone(),
            ))?;
        }
    }

    for id in source.state_ids().filter(|id| subset.contains(id)) {
        let Some(from_state) = source.state(id) else {
            continue;
        };
        let new_from = name_map[&from_state.name];
        for (dest, transition) in source.outgoing(id) {
            let Some(to_state) = source.state(dest) else {
                continue;
            };
            match name_map.get(&to_state.name) {
                Some(&new_to) => {
                    target.add_transition(new_from, new_to, transition.clone())?;
                }
                None => {
                    warn!(
                        from = %from_state.name,
                        to = %to_state.name,
                        "dropping transition to state outside the copied subset"
                    );
                }
            }
        }
    }

    Ok(())
}

/// Copy a layer's structural metadata and, when requested, its entire state
/// machine (the wholesale variant used for carry layers).
pub fn copy_layer(source: &Layer, target: &mut Layer, copy_states: bool) -> Result<()> {
    target.name = source.name.clone();
    target.weight = source.weight;
    target.mask = source.mask.clone();
    target.blend_mode = source.blend_mode;
    target.ik_pass = source.ik_pass;
    target.synced_layer_index = source.synced_layer_index;
    target.synced_layer_affects_timing = source.synced_layer_affects_timing;

    if copy_states {
        let all: HashSet<StateId> = source.machine.state_ids().collect();
        copy_states_and_transitions(&source.machine, &mut target.machine, &all, None)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lemachine::{BlendMode, Condition, ConditionMode, Transition};

    fn source_machine() -> (StateMachine, Vec<StateId>) {
        let mut machine = StateMachine::new();
        let mut idle = State::new("Idle").with_motion("idle.anim");
        idle.speed = 1.5;
        idle.mirror = true;
        idle.cycle_offset = 0.25;
        idle.ik_on_feet = true;
        idle.write_default_values = false;
        idle.behaviors.push(Behavior {
            kind: "FootstepAudio".to_string(),
            settings: serde_json::json!({"volume": 0.8}),
        });
        let idle = machine.add_state(idle).unwrap();
        let walk = machine.add_state(State::new("Walk")).unwrap();
        let attack = machine.add_state(State::new("Attack")).unwrap();
        machine
            .add_transition(
                idle,
                walk,
                Transition {
                    name: "to_walk".to_string(),
                    exit_time: 0.9,
                    ..Transition::default()
                },
            )
            .unwrap();
        machine
            .add_transition(walk, attack, Transition::default())
            .unwrap();
        machine.set_default_state(idle).unwrap();
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
        (machine, vec![idle, walk, attack])
    }

    #[test]
    fn name_identity_round_trip() {
        let (source, ids) = source_machine();
        let subset: HashSet<StateId> = [ids[0], ids[1]].into_iter().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &subset, None).unwrap();

        let mut names: Vec<String> = target
            .state_ids()
            .map(|id| target.state(id).unwrap().name.clone())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Idle".to_string(), "Walk".to_string()]);
    }

    #[test]
    fn attribute_fidelity() {
        let (source, ids) = source_machine();
        let subset: HashSet<StateId> = ids.iter().copied().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &subset, None).unwrap();

        let copied = target.state(target.find_state("Idle").unwrap()).unwrap();
        let original = source.state(ids[0]).unwrap();
        assert_eq!(copied.motion, original.motion);
        assert_eq!(copied.speed, original.speed);
        assert_eq!(copied.mirror, original.mirror);
        assert_eq!(copied.cycle_offset, original.cycle_offset);
        assert_eq!(copied.ik_on_feet, original.ik_on_feet);
        assert_eq!(copied.write_default_values, original.write_default_values);
    }

    #[test]
    fn behaviors_reinstantiated_by_kind_only() {
        let (source, ids) = source_machine();
        let subset: HashSet<StateId> = ids.iter().copied().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &subset, None).unwrap();

        let copied = target.state(target.find_state("Idle").unwrap()).unwrap();
        assert_eq!(copied.behaviors.len(), 1);
        assert_eq!(copied.behaviors[0].kind, "FootstepAudio");
        assert_eq!(copied.behaviors[0].settings, serde_json::Value::Null);
    }

    #[test]
    fn default_state_propagates_only_when_in_subset() {
        let (source, ids) = source_machine();

        let with_default: HashSet<StateId> = [ids[0], ids[1]].into_iter().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &with_default, None).unwrap();
        let default = target.default_state().unwrap();
        assert_eq!(target.state(default).unwrap().name, "Idle");

        let without_default: HashSet<StateId> = [ids[1], ids[2]].into_iter().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &without_default, None).unwrap();
        assert_eq!(target.default_state(), None);
    }

    #[test]
    fn transitions_copied_verbatim_inside_subset() {
        let (source, ids) = source_machine();
        let subset: HashSet<StateId> = [ids[0], ids[1]].into_iter().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &subset, None).unwrap();

        let from = target.find_state("Idle").unwrap();
        let copied: Vec<_> = target.outgoing(from).collect();
        assert_eq!(copied.len(), 1);
        let (to, transition) = copied[0];
        assert_eq!(target.state(to).unwrap().name, "Walk");
        assert_eq!(transition.name, "to_walk");
        assert_eq!(transition.exit_time, 0.9);
    }

    #[test]
    fn out_of_subset_destination_is_dropped() {
        let (source, ids) = source_machine();
        let subset: HashSet<StateId> = [ids[0], ids[1]].into_iter().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &subset, None).unwrap();

        // Walk -> Attack crosses the subset boundary and is not copied.
        assert_eq!(target.transition_count(), 1);
    }

    #[test]
    fn any_state_transitions_follow_subset_membership() {
        let (source, ids) = source_machine();

        let with_idle: HashSet<StateId> = [ids[0], ids[1]].into_iter().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &with_idle, None).unwrap();
        assert_eq!(target.any_state_transitions().len(), 1);
        assert_eq!(target.any_state_transitions()[0].destination, "Idle");
        assert_eq!(
            target.any_state_transitions()[0].transition.conditions[0].parameter,
            "Enter"
        );

        let without_idle: HashSet<StateId> = [ids[1], ids[2]].into_iter().collect();
        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &without_idle, None).unwrap();
        assert!(target.any_state_transitions().is_empty());
    }

    #[test]
    fn root_aware_variant_copies_root_inbound_only() {
        let (source, ids) = source_machine();
        let subset: HashSet<StateId> = ids.iter().copied().collect();
        let roots: HashSet<StateId> = [ids[0]].into_iter().collect();

        let mut target = StateMachine::new();
        copy_states_and_transitions(&source, &mut target, &subset, Some(&roots)).unwrap();
        assert_eq!(target.any_state_transitions().len(), 1);
    }

    #[test]
    fn missing_root_any_state_transition_is_fatal() {
        let (source, ids) = source_machine();
        let subset: HashSet<StateId> = ids.iter().copied().collect();
        // Walk was classified as a root but has no inbound any-state
        // transition anywhere.
        let roots: HashSet<StateId> = [ids[1]].into_iter().collect();

        let mut target = StateMachine::new();
        let err =
            copy_states_and_transitions(&source, &mut target, &subset, Some(&roots)).unwrap_err();
        assert!(matches!(err, SplitError::MissingAnyStateTransition(name) if name == "Walk"));
    }

    #[test]
    fn layer_metadata_copy() {
        let mut source = Layer::new("EyeBlink");
        source.weight = 0.7;
        source.mask = Some("face.mask".to_string());
        source.blend_mode = BlendMode::Additive;
        source.ik_pass = true;
        source.synced_layer_index = 2;
        source.synced_layer_affects_timing = true;

        let mut target = Layer::new("");
        copy_layer(&source, &mut target, false).unwrap();

        assert_eq!(target.name, "EyeBlink");
        assert_eq!(target.weight, 0.7);
        assert_eq!(target.mask.as_deref(), Some("face.mask"));
        assert_eq!(target.blend_mode, BlendMode::Additive);
        assert!(target.ik_pass);
        assert_eq!(target.synced_layer_index, 2);
        assert!(target.synced_layer_affects_timing);
        assert_eq!(target.machine.state_count(), 0);
    }

    #[test]
    fn layer_wholesale_copy_includes_whole_machine() {
        let (machine, _) = source_machine();
        let mut source = Layer::new("EyeBlink");
        source.machine = machine;

        let mut target = Layer::new("");
        copy_layer(&source, &mut target, true).unwrap();

        assert_eq!(target.machine.state_count(), 3);
        assert_eq!(target.machine.transition_count(), 2);
        assert_eq!(target.machine.any_state_transitions().len(), 1);
        let default = target.machine.default_state().unwrap();
        assert_eq!(target.machine.state(default).unwrap().name, "Idle");
    }
}
