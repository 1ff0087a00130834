//! recomp CLI - inspect incremental recompilation plans.

mod input;
mod inspect;
mod plan;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "recomp")]
#[command(about = "Plan incremental recompilation from a dependency analysis and a change window")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the recompilation plan for a change window
    Plan {
        /// Dependency analysis from the previous build (JSON)
        #[arg(short, long)]
        analysis: Option<PathBuf>,

        /// Change window: source mapping and file changes (JSON)
        #[arg(short, long)]
        changes: PathBuf,

        /// Planner configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Expand the closure on a worker pool
        #[arg(long)]
        parallel: bool,

        /// Worker pool size (implies --parallel)
        #[arg(long)]
        workers: Option<usize>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List units depending on a unit
    Dependents {
        /// Dependency analysis (JSON)
        #[arg(short, long)]
        analysis: PathBuf,

        /// Unit to query
        unit: String,

        /// Follow dependents transitively
        #[arg(long)]
        transitive: bool,
    },

    /// Report dependency cycles in an analysis
    Cycles {
        /// Dependency analysis (JSON)
        #[arg(short, long)]
        analysis: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format recomp-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<recomp_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Plan {
            analysis,
            changes,
            config,
            parallel,
            workers,
            format,
        } => {
            let options = plan::PlanOptions {
                analysis,
                changes,
                config,
                parallel,
                workers,
                format,
            };
            plan::execute(&options).map_err(format_error)?;
        }

        Commands::Dependents {
            analysis,
            unit,
            transitive,
        } => inspect::dependents(&analysis, &unit, transitive).map_err(format_error)?,

        Commands::Cycles { analysis } => inspect::cycles(&analysis).map_err(format_error)?,
    }

    Ok(())
}
