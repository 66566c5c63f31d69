// Per-state attributes

use serde::{Deserialize, Serialize};

/// A behavior descriptor attached to a state.
///
/// Behaviors are identified by `kind`; their instance state lives in
/// `settings`. Cloning a state across controllers re-instantiates each
/// behavior by kind with default settings - instance state is intentionally
/// not carried over. This is a known fidelity limitation preserved from the
/// historical tool: downstream output comparisons rely on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Behavior {
    /// Behavior type key
    pub kind: String,
    /// Opaque instance state
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl Behavior {
    /// Create a behavior with default settings
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            settings: serde_json::Value::Null,
        }
    }
}

/// A single state in a state machine.
///
/// The name is the identity key: unique within a machine and used for
/// re-linking when states are cloned into another controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct State {
    /// Unique state name within its machine
    pub name: String,
    /// Free-form tag
    #[serde(default)]
    pub tag: String,
    /// Opaque motion/content reference, copied by reference
    #[serde(default)]
    pub motion: Option<String>,
    /// Playback speed multiplier
    pub speed: f32,
    /// Whether `speed_parameter` drives the speed
    #[serde(default)]
    pub speed_parameter_active: bool,
    /// Parameter name bound to speed
    #[serde(default)]
    pub speed_parameter: String,
    /// Whether `time_parameter` drives normalized time
    #[serde(default)]
    pub time_parameter_active: bool,
    /// Parameter name bound to normalized time
    #[serde(default)]
    pub time_parameter: String,
    /// Mirror the motion
    #[serde(default)]
    pub mirror: bool,
    /// Whether `mirror_parameter` drives mirroring
    #[serde(default)]
    pub mirror_parameter_active: bool,
    /// Parameter name bound to mirroring
    #[serde(default)]
    pub mirror_parameter: String,
    /// Cycle offset into the motion
    #[serde(default)]
    pub cycle_offset: f32,
    /// Whether `cycle_offset_parameter` drives the cycle offset
    #[serde(default)]
    pub cycle_offset_parameter_active: bool,
    /// Parameter name bound to the cycle offset
    #[serde(default)]
    pub cycle_offset_parameter: String,
    /// Foot IK enabled for this state
    #[serde(default)]
    pub ik_on_feet: bool,
    /// Write back default values when the state exits
    #[serde(default = "default_true")]
    pub write_default_values: bool,
    /// Ordered attached behavior descriptors
    #[serde(default)]
    pub behaviors: Vec<Behavior>,
}

fn default_true() -> bool {
    true
}

impl State {
    /// Create a state with default playback attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: String::new(),
            motion: None,
            speed: 1.0,
            speed_parameter_active: false,
            speed_parameter: String::new(),
            time_parameter_active: false,
            time_parameter: String::new(),
            mirror: false,
            mirror_parameter_active: false,
            mirror_parameter: String::new(),
            cycle_offset: 0.0,
            cycle_offset_parameter_active: false,
            cycle_offset_parameter: String::new(),
            ik_on_feet: false,
            write_default_values: true,
            behaviors: Vec::new(),
        }
    }

    /// Set the motion reference
    pub fn with_motion(mut self, motion: impl Into<String>) -> Self {
        self.motion = Some(motion.into());
        self
    }
}
