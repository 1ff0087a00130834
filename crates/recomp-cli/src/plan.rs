//! `recomp plan`: run one planning pass and print the result.

use std::path::PathBuf;

use recomp_core::{
    CompiledUnitId, FullRebuildCause, PlannerConfig, PlanningSession, RecompilationSpec, RuleSet,
};

use crate::OutputFormat;
use crate::input::{AnalysisFile, ChangeWindow, load_config};

pub struct PlanOptions {
    pub analysis: Option<PathBuf>,
    pub changes: PathBuf,
    pub config: Option<PathBuf>,
    pub parallel: bool,
    pub workers: Option<usize>,
    pub format: OutputFormat,
}

#[derive(serde::Serialize)]
struct PlanReport<'a> {
    full_rebuild: bool,
    cause: Option<&'a FullRebuildCause>,
    units_to_compile: Vec<&'a CompiledUnitId>,
    units_to_delete: Vec<&'a CompiledUnitId>,
}

impl<'a> From<&'a RecompilationSpec> for PlanReport<'a> {
    fn from(spec: &'a RecompilationSpec) -> Self {
        Self {
            full_rebuild: spec.is_full_rebuild_needed(),
            cause: spec.full_rebuild_cause(),
            units_to_compile: spec.units_to_compile().iter().collect(),
            units_to_delete: spec.units_to_delete().iter().collect(),
        }
    }
}

pub fn execute(options: &PlanOptions) -> anyhow::Result<()> {
    let mut config = match &options.config {
        Some(path) => load_config(path)?,
        None => PlannerConfig::default(),
    };
    if options.parallel || options.workers.is_some() {
        config.parallel_closure = true;
    }
    if options.workers.is_some() {
        config.max_workers = options.workers;
    }

    // An unreadable analysis is "no usable graph", not a failure
    let (graph, rules) = match &options.analysis {
        Some(path) => match AnalysisFile::load(path) {
            Ok(analysis) => {
                let rules = analysis.rules();
                (Some(analysis.into_graph()), rules)
            }
            Err(e) => {
                tracing::warn!("Ignoring dependency analysis: {:#}", e);
                (None, RuleSet::default())
            }
        },
        None => (None, RuleSet::default()),
    };

    let window = ChangeWindow::load(&options.changes)?;

    let mut session = PlanningSession::new(config, rules)?;
    let spec = session.plan_files(graph, &window.mapping, window.changes)?;
    session.finish();

    match options.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&PlanReport::from(&spec))?);
        }
        OutputFormat::Text => print_text(&spec),
    }

    Ok(())
}

fn print_text(spec: &RecompilationSpec) {
    if let Some(cause) = spec.full_rebuild_cause() {
        println!("Full rebuild required: {}", cause);
        return;
    }

    if spec.is_up_to_date() {
        println!("Up to date: nothing to recompile");
        return;
    }

    println!("{} units to compile:", spec.units_to_compile().len());
    for unit in spec.units_to_compile() {
        println!("  {}", unit);
    }

    if !spec.units_to_delete().is_empty() {
        println!("{} outputs to delete:", spec.units_to_delete().len());
        for unit in spec.units_to_delete() {
            println!("  {}", unit);
        }
    }
}
