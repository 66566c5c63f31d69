// Extraction orchestration

use crate::classify::{Classifier, RootGroup};
use crate::clone::{copy_layer, copy_states_and_transitions};
use crate::reach::reachable_from;
use crate::{Result, SplitError};
use lemachine::{Controller, Layer, StateId};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Persistence sink for extracted controllers.
///
/// Called once per successfully cloned group, after cloning completes and
/// before any pruning of the source; fire-and-forget beyond error
/// propagation.
pub trait ControllerSink {
    /// Durably store a fully populated controller under the given name
    fn persist(&mut self, controller: &Controller, name: &str) -> anyhow::Result<()>;
}

/// Options controlling a split run
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Layer whose machine is partitioned
    pub source_layer: String,
    /// Layer copied wholesale into every artifact, skipped with a warning
    /// when absent
    pub carry_layer: Option<String>,
    /// Artifact name prefix; the source controller's name when empty
    pub name_prefix: String,
    /// Remove extracted states from the source after persisting
    pub prune: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            source_layer: "Base Layer".to_string(),
            carry_layer: None,
            name_prefix: String::new(),
            prune: true,
        }
    }
}

/// Per-group outcome of a split run
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    /// Group name from the classifier
    pub group: String,
    /// Name of the persisted artifact, `None` when the group was skipped
    pub artifact: Option<String>,
    /// Number of classified root states
    pub roots: usize,
    /// Size of the group's reachable-state union
    pub states: usize,
    /// States removed from the source
    pub pruned: usize,
}

/// Outcome of a full split run
#[derive(Debug, Clone, Default)]
pub struct SplitReport {
    /// Outcomes in classification order
    pub groups: Vec<GroupOutcome>,
}

impl SplitReport {
    /// Number of groups that produced an artifact
    pub fn extracted(&self) -> usize {
        self.groups.iter().filter(|g| g.artifact.is_some()).count()
    }
}

/// Sequences classification, reachability, cloning, persistence, and
/// optional source pruning across all groups.
pub struct Splitter {
    options: SplitOptions,
}

impl Splitter {
    /// Create a splitter
    pub fn new(options: SplitOptions) -> Self {
        Self { options }
    }

    /// Run one extraction over the controller.
    ///
    /// Groups are processed in classification order; empty groups are
    /// skipped with a diagnostic. Reachable-state unions are checked for
    /// disjointness before any cloning, so a state is never extracted
    /// twice. A cloning or persistence failure aborts the run; artifacts
    /// persisted by earlier groups remain, and when pruning is enabled the
    /// source already reflects those earlier extractions.
    pub fn run(
        &self,
        controller: &mut Controller,
        classifier: &Classifier,
        sink: &mut dyn ControllerSink,
    ) -> Result<SplitReport> {
        let groups = classifier.classify(controller, &self.options.source_layer)?;

        let expansions = self.expand(controller, &groups)?;
        self.check_disjoint(controller, &groups, &expansions)?;

        let carry_layer = match self.options.carry_layer.as_deref() {
            Some(name) if controller.layer(name).is_none() => {
                warn!(layer = %name, "carry layer not found, artifacts will omit it");
                None
            }
            other => other.map(str::to_string),
        };

        let prefix = if self.options.name_prefix.is_empty() {
            controller.name.clone()
        } else {
            self.options.name_prefix.clone()
        };

        let mut report = SplitReport::default();
        for (index, (group, union)) in groups.iter().zip(&expansions).enumerate() {
            if group.roots.is_empty() {
                info!(group = %group.name, "skipping group with no root states");
                report.groups.push(GroupOutcome {
                    group: group.name.clone(),
                    artifact: None,
                    roots: 0,
                    states: 0,
                    pruned: 0,
                });
                continue;
            }

            let artifact_name = format!("{}{}", prefix, index);
            info!(
                group = %group.name,
                states = union.len(),
                artifact = %artifact_name,
                "extracting group"
            );

            let artifact =
                self.build_artifact(controller, group, union, carry_layer.as_deref(), &artifact_name)?;
            sink.persist(&artifact, &artifact_name)
                .map_err(SplitError::Sink)?;

            let mut pruned = 0;
            if self.options.prune {
                let machine = &mut controller
                    .layer_mut(&self.options.source_layer)
                    .ok_or_else(|| SplitError::LayerNotFound(self.options.source_layer.clone()))?
                    .machine;
                for id in union {
                    if machine.remove_state(*id).is_some() {
                        pruned += 1;
                    }
                }
                info!(group = %group.name, pruned, "pruned extracted states from source");
            }

            report.groups.push(GroupOutcome {
                group: group.name.clone(),
                artifact: Some(artifact_name),
                roots: group.roots.len(),
                states: union.len(),
                pruned,
            });
        }

        Ok(report)
    }

    /// Expand each group's roots into the union of their reachable sets
    fn expand(
        &self,
        controller: &Controller,
        groups: &[RootGroup],
    ) -> Result<Vec<HashSet<StateId>>> {
        let layer = controller
            .layer(&self.options.source_layer)
            .ok_or_else(|| SplitError::LayerNotFound(self.options.source_layer.clone()))?;

        Ok(groups
            .iter()
            .map(|group| {
                let mut union = HashSet::new();
                for &root in &group.roots {
                    union.extend(reachable_from(&layer.machine, root));
                }
                union
            })
            .collect())
    }

    /// Classification is assumed disjoint but never trusted: overlapping
    /// reachable unions would silently double-extract, so they are rejected
    /// before any cloning.
    fn check_disjoint(
        &self,
        controller: &Controller,
        groups: &[RootGroup],
        expansions: &[HashSet<StateId>],
    ) -> Result<()> {
        let layer = controller
            .layer(&self.options.source_layer)
            .ok_or_else(|| SplitError::LayerNotFound(self.options.source_layer.clone()))?;

        let mut owner: HashMap<StateId, usize> = HashMap::new();
        for (index, union) in expansions.iter().enumerate() {
            for &id in union {
                if let Some(&first) = owner.get(&id) {
                    let state = layer
                        .machine
                        .state(id)
                        .map(|s| s.name.clone())
                        .unwrap_or_default();
                    return Err(SplitError::OverlappingGroups {
                        first: groups[first].name.clone(),
                        second: groups[index].name.clone(),
                        state,
                    });
                }
                owner.insert(id, index);
            }
        }
        Ok(())
    }

    /// Build one self-contained artifact controller for a group
    fn build_artifact(
        &self,
        controller: &Controller,
        group: &RootGroup,
        union: &HashSet<StateId>,
        carry_layer: Option<&str>,
        artifact_name: &str,
    ) -> Result<Controller> {
        let source_layer = controller
            .layer(&self.options.source_layer)
            .ok_or_else(|| SplitError::LayerNotFound(self.options.source_layer.clone()))?;

        let mut artifact = Controller::new(artifact_name);
        for parameter in controller.parameters() {
            artifact.add_parameter(parameter.clone())?;
        }

        let roots: Option<HashSet<StateId>> = group
            .requires_any_state_transition
            .then(|| group.roots.iter().copied().collect());

        let mut base = Layer::new("");
        copy_layer(source_layer, &mut base, false)?;
        copy_states_and_transitions(
            &source_layer.machine,
            &mut base.machine,
            union,
            roots.as_ref(),
        )?;
        artifact.add_layer(base);

        if let Some(name) = carry_layer {
            if let Some(layer) = controller.layer(name) {
                let mut copied = Layer::new("");
                copy_layer(layer, &mut copied, true)?;
                artifact.add_layer(copied);
            }
        }

        Ok(artifact)
    }
}
