//! JSON inputs standing in for the analyzer and the change detector.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use recomp_core::{
    CompiledUnitId, ConstantBearingRule, DependencyGraph, FileChange, GeneratedSourceRule,
    GraphSnapshot, PlannerConfig, RuleSet, SourceMapping,
};

/// Post-compile analysis: the dependency graph plus backend detector results.
#[derive(Debug, Default, serde::Deserialize)]
pub struct AnalysisFile {
    #[serde(flatten)]
    pub graph: GraphSnapshot,

    /// Units exposing inlinable compile-time constants
    #[serde(default)]
    pub constant_bearing: Vec<CompiledUnitId>,

    /// Units taking part in untracked code generation
    #[serde(default)]
    pub generated: Vec<CompiledUnitId>,
}

impl AnalysisFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse analysis {}", path.display()))
    }

    /// Canonical rules wired to this analysis' detector results.
    pub fn rules(&self) -> RuleSet {
        RuleSet::canonical(
            ConstantBearingRule::from_units(self.constant_bearing.iter().cloned()),
            GeneratedSourceRule::from_units(self.generated.iter().cloned()),
        )
    }

    pub fn into_graph(self) -> Arc<DependencyGraph> {
        Arc::new(self.graph.into())
    }
}

/// One build's change window.
#[derive(Debug, serde::Deserialize)]
pub struct ChangeWindow {
    #[serde(default)]
    pub mapping: SourceMapping,
    #[serde(default)]
    pub changes: Vec<FileChange>,
}

impl ChangeWindow {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read change window {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse change window {}", path.display()))
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<PlannerConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
}
