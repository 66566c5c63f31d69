//! Directory depot integration tests against real temporary directories.

use ledepot::{DepotError, DirectoryDepot};
use lemachine::{
    AnyStateTransition, Condition, ConditionMode, Controller, Layer, Parameter, ParameterKind,
    State, Transition,
};
use lescission::ControllerSink;
use tempfile::TempDir;

fn sample_controller() -> Controller {
    let mut controller = Controller::new("Fighter");
    controller
        .add_parameter(Parameter::new("Engage", ParameterKind::Trigger))
        .unwrap();
    controller
        .add_parameter(Parameter::new("Speed", ParameterKind::Float))
        .unwrap();

    let mut layer = Layer::new("Base Layer");
    let idle = layer.machine.add_state(State::new("Idle")).unwrap();
    let walk = layer
        .machine
        .add_state(State::new("Walk").with_motion("WalkCycle"))
        .unwrap();
    layer
        .machine
        .add_transition(
            idle,
            walk,
            Transition::default().with_condition(Condition::new(
                ConditionMode::Greater,
                0.1,
                "Speed",
            )),
        )
        .unwrap();
    layer
        .machine
        .add_any_state_transition(AnyStateTransition::new(
            "Idle",
            Transition::default().with_condition(Condition::new(ConditionMode::If, 0.0, "Engage")),
        ))
        .unwrap();
    layer.machine.set_default_state(idle).unwrap();
    controller.add_layer(layer);
    controller
}

#[test]
fn save_then_load_preserves_the_controller() {
    let dir = TempDir::new().unwrap();
    let depot = DirectoryDepot::new(dir.path().join("depot")).unwrap();

    let controller = sample_controller();
    let path = depot.save(&controller).unwrap();
    assert!(path.ends_with("Fighter.controller.json"));

    let loaded = depot.load("Fighter").unwrap();
    assert_eq!(loaded.name, "Fighter");
    assert_eq!(loaded.parameters().len(), 2);

    let layer = loaded.layer("Base Layer").unwrap();
    assert_eq!(layer.machine.state_count(), 2);
    assert_eq!(layer.machine.transition_count(), 1);
    assert_eq!(layer.machine.any_state_transitions().len(), 1);

    let default = layer.machine.default_state().unwrap();
    assert_eq!(layer.machine.state(default).unwrap().name, "Idle");

    let walk = layer.machine.find_state("Walk").unwrap();
    assert_eq!(
        layer.machine.state(walk).unwrap().motion.as_deref(),
        Some("WalkCycle")
    );
}

#[test]
fn persist_through_the_sink_trait_writes_a_loadable_document() {
    let dir = TempDir::new().unwrap();
    let mut depot = DirectoryDepot::new(dir.path()).unwrap();

    let controller = sample_controller();
    ControllerSink::persist(&mut depot, &controller, "Fighter0").unwrap();

    let loaded = depot.load("Fighter0").unwrap();
    assert_eq!(loaded.name, "Fighter");
    assert!(loaded.layer("Base Layer").is_some());
}

#[test]
fn loading_a_missing_document_reports_the_path() {
    let dir = TempDir::new().unwrap();
    let depot = DirectoryDepot::new(dir.path()).unwrap();

    let err = depot.load("Nowhere").unwrap_err();
    match err {
        DepotError::Io { path, .. } => {
            assert!(path.ends_with("Nowhere.controller.json"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn loading_garbage_surfaces_a_json_error() {
    let dir = TempDir::new().unwrap();
    let depot = DirectoryDepot::new(dir.path()).unwrap();
    std::fs::write(depot.controller_path("Broken"), "not json").unwrap();

    let err = depot.load("Broken").unwrap_err();
    assert!(matches!(err, DepotError::Json(_)));
}
