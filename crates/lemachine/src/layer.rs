// Layer metadata over a state machine

use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};

/// How a layer's output combines with the layers below it
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BlendMode {
    /// Replace the result of lower layers
    #[default]
    Override,
    /// Add on top of lower layers
    Additive,
}

/// A controller layer: structural metadata plus its own state machine.
///
/// Layers share the controller's parameter namespace but own their states
/// and transitions independently.
#[derive(Debug)]
pub struct Layer {
    /// Layer name, unique within a controller
    pub name: String,
    /// Default blend weight
    pub weight: f32,
    /// Opaque mask asset reference
    pub mask: Option<String>,
    /// Blend mode against lower layers
    pub blend_mode: BlendMode,
    /// IK pass enabled
    pub ik_pass: bool,
    /// Index of the layer this one is synchronized with, -1 when none
    pub synced_layer_index: i32,
    /// Synchronized layer affects timing
    pub synced_layer_affects_timing: bool,
    /// The layer's state machine
    pub machine: StateMachine,
}

impl Layer {
    /// Create an empty layer with default metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: 1.0,
            mask: None,
            blend_mode: BlendMode::Override,
            ik_pass: false,
            synced_layer_index: -1,
            synced_layer_affects_timing: false,
            machine: StateMachine::new(),
        }
    }
}
