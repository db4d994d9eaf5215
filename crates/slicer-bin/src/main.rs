//! Vector Slicer entrypoint.
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result;
use clap::Parser;
use core_bayes::BayesianOutcome;
use core_config::{FillingConfig, SimulationConfig};
use core_engine::FilledPattern;
use core_io::IoError;
use core_pattern::DesiredPattern;
use tracing::{error, info, info_span};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "vector-slicer", version, about = "Director-field-to-tool-path slicer")]
struct Args {
    /// One or more pattern directories, each containing `shape.csv`, a
    /// director field and `config.txt`.
    patterns: Vec<PathBuf>,
    /// Optional simulation config TOML (disagreement weights, Bayesian
    /// search budget, aggregation parameters). Falls back to defaults.
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("vector-slicer.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "vector-slicer.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}

/// One Bayesian search per expanded `config.txt` template (one per declared
/// `Seed`), then the best `layer_count` results pooled across all of them
/// (§9 "multi-seed config expansion": each template seeds an independent
/// search rather than sharing one).
fn search_all_templates(
    pattern: &DesiredPattern,
    templates: &[FillingConfig],
    simulation: &SimulationConfig,
) -> Result<Vec<(FillingConfig, core_quantify::SeedResult)>, IoError> {
    let mut pooled = Vec::new();
    for template in templates {
        let outcome: BayesianOutcome = core_bayes::run(
            pattern,
            template,
            &simulation.filling,
            &simulation.disagreement,
            &simulation.bayesian,
            &simulation.aggregation,
        )?;
        info!(
            seed = template.seed,
            disagreement = outcome.winning_metrics.disagreement,
            "bayesian search finished for template"
        );
        for result in outcome.final_results {
            pooled.push((outcome.winning_config, result));
        }
    }
    pooled.sort_by(|a, b| a.1.metrics.disagreement.partial_cmp(&b.1.metrics.disagreement).unwrap());
    pooled.truncate(simulation.aggregation.layer_count.max(1));
    Ok(pooled)
}

fn process_pattern_directory(directory: &Path, simulation: &SimulationConfig) -> Result<(), IoError> {
    let span = info_span!("pattern", directory = %directory.display());
    let _enter = span.enter();
    info!("loading pattern");

    let pattern = core_io::load_desired_pattern(directory, simulation.filling.splay_line_policy, 0)?;
    let templates = core_io::read_filling_configs(&directory.join("config.txt"))?;

    let pooled = search_all_templates(&pattern, &templates, simulation)?;

    let mut layers = Vec::with_capacity(pooled.len());
    let mut best_coverage_snapshot = None;
    for (config, result) in &pooled {
        let seeded = config.with_seed(result.seed);
        let filled = FilledPattern::generate(&pattern, &seeded, &simulation.filling)?;
        if best_coverage_snapshot.is_none() {
            best_coverage_snapshot = Some(filled.coverage().clone());
        }
        let sorted = core_sort::sort_paths(filled.into_paths(), &simulation.filling, seeded.seed_spacing);
        layers.push(sorted);
    }

    let generated_at = format!("{:?}", SystemTime::now());
    let winning_config = pooled.first().map(|(c, _)| *c).ok_or(IoError::EmptyTable)?;
    let pattern_name = directory.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
    let header = core_io::generate_header(
        &pattern_name,
        winning_config.print_radius * 2.0,
        &simulation.disagreement,
        &simulation.bayesian,
        &generated_at,
    );

    core_io::write_path_sequence(&layers, &directory.join("paths.csv"), &header)?;
    core_io::write_overlap(&layers, &directory.join("overlap.csv"), &header)?;
    core_io::write_filling_config(&[winning_config], &directory.join("best_config.txt"))?;
    if let Some(first_layer) = layers.first() {
        core_io::write_seeds(first_layer, &directory.join("seeds.csv"))?;
    }
    if let Some(coverage) = &best_coverage_snapshot {
        core_io::write_filled_matrix(coverage, &directory.join("filled_matrix.csv"))?;
        core_io::write_director_disagreement_histogram(&pattern, coverage, 20, &directory.join("disagreement_histogram.csv"))?;
    }

    info!(layers = layers.len(), "pattern complete");
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    let args = Args::parse();

    let simulation = match &args.config {
        Some(path) => core_config::load_simulation_config(path)?,
        None => core_config::default_simulation_config(),
    };

    if args.patterns.is_empty() {
        anyhow::bail!("no pattern directories given");
    }

    let (tx, rx) = crossbeam_channel::bounded(args.patterns.len());
    std::thread::scope(|scope| {
        for directory in &args.patterns {
            let tx = tx.clone();
            let simulation = &simulation;
            scope.spawn(move || {
                let result = process_pattern_directory(directory, simulation);
                let _ = tx.send((directory.clone(), result));
            });
        }
        drop(tx);

        let mut any_failed = false;
        for (directory, result) in rx {
            if let Err(err) = result {
                error!(directory = %directory.display(), error = %err, "pattern failed, continuing with the rest");
                any_failed = true;
            } else {
                info!(directory = %directory.display(), "pattern succeeded");
            }
        }

        if any_failed {
            anyhow::bail!("one or more patterns failed; see the log for details");
        }
        Ok(())
    })
}
