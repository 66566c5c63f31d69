// Ordered trigger-condition attachment session

use crate::{Result, RetoucheError};
use lemachine::{Condition, ConditionMode, Controller, Parameter, ParameterKind, TransitionId};
use tracing::{debug, info};

/// An ordered trigger list with a cursor over it.
///
/// Each `apply_next` call attaches the trigger under the cursor as an `If`
/// condition to a batch of transitions, then advances. The cursor belongs
/// to the session instance and resets only through [`TriggerSession::forget`].
#[derive(Debug)]
pub struct TriggerSession {
    triggers: Vec<String>,
    cursor: usize,
}

impl TriggerSession {
    /// Start a session over an ordered, non-empty trigger list
    pub fn new(triggers: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        let triggers: Vec<String> = triggers.into_iter().map(Into::into).collect();
        if triggers.is_empty() {
            return Err(RetoucheError::EmptySelection);
        }
        Ok(Self {
            triggers,
            cursor: 0,
        })
    }

    /// The trigger the next `apply_next` call will attach, if any remain
    pub fn next_trigger(&self) -> Option<&str> {
        self.triggers.get(self.cursor).map(String::as_str)
    }

    /// Number of triggers not yet attached
    pub fn remaining(&self) -> usize {
        self.triggers.len().saturating_sub(self.cursor)
    }

    /// Declare the session's triggers as parameters on the controller.
    ///
    /// Triggers already declared are left alone. Returns the count added.
    pub fn declare_parameters(&self, controller: &mut Controller) -> Result<usize> {
        let mut added = 0;
        for name in &self.triggers {
            if controller.has_parameter(name, ParameterKind::Trigger) {
                continue;
            }
            controller.add_parameter(Parameter::new(name.clone(), ParameterKind::Trigger))?;
            added += 1;
        }
        info!(added, "declared trigger parameters");
        Ok(added)
    }

    /// Attach the trigger under the cursor to the given transitions as an
    /// `If` condition, then advance the cursor.
    ///
    /// The trigger must already be declared on the controller and the
    /// transitions must belong to the named layer's machine. The cursor
    /// advances only when every transition was rewritten.
    pub fn apply_next(
        &mut self,
        controller: &mut Controller,
        layer: &str,
        transitions: &[TransitionId],
    ) -> Result<()> {
        let trigger = self
            .triggers
            .get(self.cursor)
            .ok_or(RetoucheError::TriggersExhausted(self.triggers.len()))?
            .clone();
        if !controller.has_parameter(&trigger, ParameterKind::Trigger) {
            return Err(RetoucheError::UndeclaredTrigger(trigger));
        }
        if transitions.is_empty() {
            return Err(RetoucheError::EmptySelection);
        }

        let machine = &mut controller
            .layer_mut(layer)
            .ok_or_else(|| RetoucheError::UnknownLayer(layer.to_string()))?
            .machine;
        for id in transitions {
            if machine.transition(*id).is_none() {
                return Err(RetoucheError::UnknownTransition(id.index()));
            }
        }
        for id in transitions {
            if let Some(transition) = machine.transition_mut(*id) {
                transition
                    .conditions
                    .push(Condition::new(ConditionMode::If, 0.0, trigger.clone()));
            }
        }

        self.cursor += 1;
        debug!(trigger = %trigger, count = transitions.len(), "attached trigger condition");
        Ok(())
    }

    /// Reset the cursor to the first trigger
    pub fn forget(&mut self) {
        self.cursor = 0;
    }
}
