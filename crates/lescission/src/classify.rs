// Root state classification

use crate::{Result, SplitError};
use lemachine::{AnyStateTransition, Controller, State, StateId};
use tracing::{debug, warn};

/// Locate, across all layers, the any-state transition whose destination is
/// the given state. Returns the first match; `None` when no layer carries
/// one (a valid outcome, not an error).
pub fn find_any_state_transition_to<'a>(
    controller: &'a Controller,
    state_name: &str,
) -> Option<&'a AnyStateTransition> {
    controller
        .layers()
        .iter()
        .flat_map(|layer| layer.machine.any_state_transitions())
        .find(|t| t.destination == state_name)
}

/// A predicate selecting root states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootRule {
    /// State name starts with the literal prefix
    NamePrefix(String),
    /// State name equals the literal
    NameExact(String),
    /// The state has an inbound any-state transition, in any layer, whose
    /// condition list references the given parameter name
    AnyStateConditionOn(String),
}

impl RootRule {
    /// True if members selected by this rule are guaranteed an inbound
    /// any-state transition, which the cloner then treats as required.
    pub fn requires_any_state_transition(&self) -> bool {
        matches!(self, Self::AnyStateConditionOn(_))
    }

    fn matches(&self, controller: &Controller, state: &State) -> bool {
        match self {
            Self::NamePrefix(prefix) => state.name.starts_with(prefix.as_str()),
            Self::NameExact(name) => state.name == *name,
            Self::AnyStateConditionOn(parameter) => {
                match find_any_state_transition_to(controller, &state.name) {
                    Some(transition) => transition
                        .transition
                        .conditions
                        .iter()
                        .any(|c| c.parameter == *parameter),
                    None => false,
                }
            }
        }
    }
}

/// A named group specification: first-match-wins rule priority follows the
/// declaration order of the specs.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    /// Group name, used for diagnostics and artifact naming
    pub name: String,
    /// Membership predicate
    pub rule: RootRule,
}

impl GroupSpec {
    /// Create a group specification
    pub fn new(name: impl Into<String>, rule: RootRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// One classified group of root states
#[derive(Debug)]
pub struct RootGroup {
    /// Group name from the declaring `GroupSpec`
    pub name: String,
    /// Whether every member must have an inbound any-state transition
    pub requires_any_state_transition: bool,
    /// Root states in layer insertion order
    pub roots: Vec<StateId>,
}

/// Partitions a layer's states into disjoint root groups.
#[derive(Debug)]
pub struct Classifier {
    groups: Vec<GroupSpec>,
}

impl Classifier {
    /// Create a classifier from ordered group specifications
    pub fn new(groups: Vec<GroupSpec>) -> Result<Self> {
        if groups.is_empty() {
            return Err(SplitError::EmptyClassifier);
        }
        Ok(Self { groups })
    }

    /// The ordered group specifications
    pub fn groups(&self) -> &[GroupSpec] {
        &self.groups
    }

    /// Assign every state of the named layer to the first group whose rule
    /// matches. A state never lands in a second group; states matching no
    /// rule are left unclassified. Empty groups are kept in the result and
    /// reported as a diagnostic - "no root found" is never fatal.
    pub fn classify(&self, controller: &Controller, layer_name: &str) -> Result<Vec<RootGroup>> {
        let layer = controller
            .layer(layer_name)
            .ok_or_else(|| SplitError::LayerNotFound(layer_name.to_string()))?;

        for spec in &self.groups {
            if let RootRule::AnyStateConditionOn(parameter) = &spec.rule {
                if controller.parameter(parameter).is_none() {
                    warn!(
                        group = %spec.name,
                        parameter = %parameter,
                        "controller does not declare the rule's parameter"
                    );
                }
            }
        }

        let mut groups: Vec<RootGroup> = self
            .groups
            .iter()
            .map(|spec| RootGroup {
                name: spec.name.clone(),
                requires_any_state_transition: spec.rule.requires_any_state_transition(),
                roots: Vec::new(),
            })
            .collect();

        for id in layer.machine.state_ids() {
            let Some(state) = layer.machine.state(id) else {
                continue;
            };
            if let Some(slot) = self
                .groups
                .iter()
                .position(|spec| spec.rule.matches(controller, state))
            {
                groups[slot].roots.push(id);
            }
        }

        for group in &groups {
            if group.roots.is_empty() {
                warn!(group = %group.name, "found no root state for group");
            } else {
                debug!(
                    group = %group.name,
                    roots = group.roots.len(),
                    "classified root states"
                );
            }
        }

        Ok(groups)
    }
}
