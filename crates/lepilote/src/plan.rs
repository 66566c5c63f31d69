// Split Plan Configuration
//
// *Le Plan* (The Plan) - TOML description of a split run

use anyhow::{bail, Context, Result};
use lescission::{Classifier, GroupSpec, RootRule, SplitOptions};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

fn default_source_layer() -> String {
    "Base Layer".to_string()
}

fn default_prune() -> bool {
    true
}

/// One `[[group]]` table of a split plan.
///
/// Exactly one of `prefix`, `exact`, or `any_state_parameter` selects the
/// group's root states.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupEntry {
    /// Group name used in reports and diagnostics
    pub name: String,
    /// Select states whose name starts with this literal
    pub prefix: Option<String>,
    /// Select the state with exactly this name
    pub exact: Option<String>,
    /// Select states with an inbound any-state transition conditioned on
    /// this parameter
    pub any_state_parameter: Option<String>,
}

impl GroupEntry {
    fn rule(&self) -> Result<RootRule> {
        let mut rules = Vec::new();
        if let Some(prefix) = &self.prefix {
            rules.push(RootRule::NamePrefix(prefix.clone()));
        }
        if let Some(exact) = &self.exact {
            rules.push(RootRule::NameExact(exact.clone()));
        }
        if let Some(parameter) = &self.any_state_parameter {
            rules.push(RootRule::AnyStateConditionOn(parameter.clone()));
        }
        match rules.len() {
            1 => Ok(rules.remove(0)),
            0 => bail!(
                "group '{}' needs one of prefix, exact, any_state_parameter",
                self.name
            ),
            _ => bail!(
                "group '{}' sets more than one of prefix, exact, any_state_parameter",
                self.name
            ),
        }
    }
}

/// A split run described as TOML
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitPlan {
    /// Layer whose machine is partitioned
    #[serde(default = "default_source_layer")]
    pub source_layer: String,

    /// Layer copied wholesale into every artifact
    pub carry_layer: Option<String>,

    /// Whether extracted states are removed from the source
    #[serde(default = "default_prune")]
    pub prune: bool,

    /// Directory receiving the artifact documents
    pub output_dir: PathBuf,

    /// Artifact name prefix; the source controller's name when empty
    #[serde(default)]
    pub name_prefix: String,

    /// Root groups, in declaration order
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupEntry>,
}

impl SplitPlan {
    /// Parse a plan from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        let plan: SplitPlan = toml::from_str(text).context("Failed to parse split plan")?;
        Ok(plan)
    }

    /// Load a plan from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read split plan: {:?}", path))?;
        Self::parse(&content)
    }

    /// Build the classifier declared by the plan's groups
    pub fn classifier(&self) -> Result<Classifier> {
        let mut specs = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            specs.push(GroupSpec::new(group.name.clone(), group.rule()?));
        }
        Classifier::new(specs).context("Invalid split plan groups")
    }

    /// Build the orchestrator options declared by the plan
    pub fn options(&self) -> SplitOptions {
        SplitOptions {
            source_layer: self.source_layer.clone(),
            carry_layer: self.carry_layer.clone(),
            name_prefix: self.name_prefix.clone(),
            prune: self.prune,
        }
    }
}
