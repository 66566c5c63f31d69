// Controller aggregate

use crate::layer::Layer;
use crate::parameter::{Parameter, ParameterKind};
use crate::{MachineError, Result};

/// A complete controller: a shared parameter namespace and ordered layers.
#[derive(Debug, Default)]
pub struct Controller {
    /// Controller name, used as the artifact identity by persistence
    pub name: String,
    parameters: Vec<Parameter>,
    layers: Vec<Layer>,
}

impl Controller {
    /// Create an empty controller
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Declare a parameter, rejecting duplicate names
    pub fn add_parameter(&mut self, parameter: Parameter) -> Result<()> {
        if self.parameters.iter().any(|p| p.name == parameter.name) {
            return Err(MachineError::DuplicateParameter(parameter.name));
        }
        self.parameters.push(parameter);
        Ok(())
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// True if a parameter with the given name and kind is declared
    pub fn has_parameter(&self, name: &str, kind: ParameterKind) -> bool {
        self.parameter(name).map(|p| p.kind) == Some(kind)
    }

    /// All declared parameters in declaration order
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Append a layer
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Look up a layer by name
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Look up a layer mutably by name
    pub fn layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.name == name)
    }

    /// All layers in order
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// All layers, mutably
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }
}
