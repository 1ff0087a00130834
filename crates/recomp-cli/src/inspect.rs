//! `recomp dependents` and `recomp cycles`: graph diagnostics.

use std::path::Path;

use recomp_core::CompiledUnitId;

use crate::input::AnalysisFile;

pub fn dependents(analysis: &Path, unit: &str, transitive: bool) -> anyhow::Result<()> {
    let graph = AnalysisFile::load(analysis)?.into_graph();
    let unit = CompiledUnitId::new(unit);

    if !graph.contains(&unit) {
        anyhow::bail!("Unit {} has no dependency record in {}", unit, analysis.display());
    }

    let mut units: Vec<CompiledUnitId> = if transitive {
        graph
            .transitive_dependents(&unit)
            .into_iter()
            .filter(|dependent| dependent != &unit)
            .collect()
    } else {
        graph.dependents_of(&unit)
    };
    units.sort();

    for dependent in units {
        println!("{}", dependent);
    }
    Ok(())
}

pub fn cycles(analysis: &Path) -> anyhow::Result<()> {
    let graph = AnalysisFile::load(analysis)?.into_graph();
    let cycles = graph.cycles();

    if cycles.is_empty() {
        println!("No dependency cycles");
        return Ok(());
    }

    for cycle in cycles {
        let names: Vec<&str> = cycle.iter().map(CompiledUnitId::as_str).collect();
        println!("{}", names.join(" -> "));
    }
    Ok(())
}
