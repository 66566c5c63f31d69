// Controller document form
//
// The in-memory machine sits on a stable graph, which has no direct serde
// form; documents flatten it into name-keyed records instead, the names
// doubling as the re-linking keys on load.

use crate::{DepotError, Result};
use lemachine::{
    AnyStateTransition, BlendMode, Controller, Layer, Parameter, State, Transition,
};
use serde::{Deserialize, Serialize};

/// A concrete transition record with explicit endpoint names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionDoc {
    /// Source state name
    pub from: String,
    /// Destination state name
    pub to: String,
    /// Transition attributes and conditions
    #[serde(flatten)]
    pub transition: Transition,
}

/// One layer of a controller document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerDoc {
    /// Layer name
    pub name: String,
    /// Default blend weight
    pub weight: f32,
    /// Opaque mask asset reference
    #[serde(default)]
    pub mask: Option<String>,
    /// Blend mode against lower layers
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// IK pass enabled
    #[serde(default)]
    pub ik_pass: bool,
    /// Synchronized layer index, -1 when none
    #[serde(default = "default_sync_index")]
    pub synced_layer_index: i32,
    /// Synchronized layer affects timing
    #[serde(default)]
    pub synced_layer_affects_timing: bool,
    /// Default state name, if designated
    #[serde(default)]
    pub default_state: Option<String>,
    /// States in declaration order
    #[serde(default)]
    pub states: Vec<State>,
    /// Concrete transitions
    #[serde(default)]
    pub transitions: Vec<TransitionDoc>,
    /// Any-state transitions
    #[serde(default)]
    pub any_state_transitions: Vec<AnyStateTransition>,
}

fn default_sync_index() -> i32 {
    -1
}

/// A complete, self-contained controller document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerDoc {
    /// Controller name
    pub name: String,
    /// Declared parameters
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Ordered layers
    #[serde(default)]
    pub layers: Vec<LayerDoc>,
}

impl ControllerDoc {
    /// Flatten a controller into its document form
    pub fn from_controller(controller: &Controller) -> Self {
        Self {
            name: controller.name.clone(),
            parameters: controller.parameters().to_vec(),
            layers: controller.layers().iter().map(layer_to_doc).collect(),
        }
    }

    /// Rebuild the in-memory controller, re-linking transitions by name
    pub fn into_controller(self) -> Result<Controller> {
        let mut controller = Controller::new(self.name);
        for parameter in self.parameters {
            controller.add_parameter(parameter)?;
        }
        for doc in self.layers {
            controller.add_layer(doc_to_layer(doc)?);
        }
        Ok(controller)
    }
}

fn layer_to_doc(layer: &Layer) -> LayerDoc {
    let machine = &layer.machine;
    let mut transitions = Vec::with_capacity(machine.transition_count());
    for id in machine.state_ids() {
        let Some(from) = machine.state(id) else {
            continue;
        };
        for (to, transition) in machine.outgoing(id) {
            let Some(to_state) = machine.state(to) else {
                continue;
            };
            transitions.push(TransitionDoc {
                from: from.name.clone(),
                to: to_state.name.clone(),
                transition: transition.clone(),
            });
        }
    }

    LayerDoc {
        name: layer.name.clone(),
        weight: layer.weight,
        mask: layer.mask.clone(),
        blend_mode: layer.blend_mode,
        ik_pass: layer.ik_pass,
        synced_layer_index: layer.synced_layer_index,
        synced_layer_affects_timing: layer.synced_layer_affects_timing,
        default_state: machine
            .default_state()
            .and_then(|id| machine.state(id))
            .map(|s| s.name.clone()),
        states: machine
            .state_ids()
            .filter_map(|id| machine.state(id).cloned())
            .collect(),
        transitions,
        any_state_transitions: machine.any_state_transitions().to_vec(),
    }
}

fn doc_to_layer(doc: LayerDoc) -> Result<Layer> {
    let mut layer = Layer::new(doc.name.clone());
    layer.weight = doc.weight;
    layer.mask = doc.mask;
    layer.blend_mode = doc.blend_mode;
    layer.ik_pass = doc.ik_pass;
    layer.synced_layer_index = doc.synced_layer_index;
    layer.synced_layer_affects_timing = doc.synced_layer_affects_timing;

    for state in doc.states {
        layer.machine.add_state(state)?;
    }

    for record in doc.transitions {
        let from = layer.machine.find_state(&record.from).ok_or_else(|| {
            DepotError::UnknownStateRef {
                layer: doc.name.clone(),
                state: record.from.clone(),
            }
        })?;
        let to = layer.machine.find_state(&record.to).ok_or_else(|| {
            DepotError::UnknownStateRef {
                layer: doc.name.clone(),
                state: record.to.clone(),
            }
        })?;
        layer.machine.add_transition(from, to, record.transition)?;
    }

    for any_state in doc.any_state_transitions {
        layer.machine.add_any_state_transition(any_state)?;
    }

    if let Some(name) = doc.default_state {
        let id = layer
            .machine
            .find_state(&name)
            .ok_or_else(|| DepotError::UnknownStateRef {
                layer: doc.name.clone(),
                state: name,
            })?;
        layer.machine.set_default_state(id)?;
    }

    Ok(layer)
}
