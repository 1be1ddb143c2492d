//! Subcommand execution.

use anyhow::{Context, Result};
use tracing::info;

use spacecar_core::config::validate_threshold;
use spacecar_core::persistence::save_snapshot_to_path;
use spacecar_core::prelude::*;

use crate::{AnalyzeArgs, CleanArgs, Commands, GenerateArgs, LabelArgs, PipelineArgs, SimulateArgs};

pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Generate(args) => generate(args),
        Commands::Clean(args) => clean(args),
        Commands::Label(args) => label(args),
        Commands::Simulate(args) => simulate(args),
        Commands::Analyze(args) => analyze(args),
        Commands::Pipeline(args) => pipeline(args),
    }
}

fn generate(args: GenerateArgs) -> Result<()> {
    RawFeatureGenerator::new(args.seed)
        .export_to_csv(&args.output, args.rows)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(())
}

fn clean(args: CleanArgs) -> Result<()> {
    let report = clean_raw_data(&args.input, &args.output)?;
    info!(
        loaded = report.loaded,
        after_dedup = report.after_dedup,
        kept = report.after_required,
        numeric_filled = report.numeric_filled,
        text_filled = report.text_filled,
        "cleaning finished"
    );
    Ok(())
}

fn label(args: LabelArgs) -> Result<()> {
    let settings = LabelSettings {
        seed: args.seed,
        obstacles: args.obstacles,
        ..LabelSettings::default()
    };
    let summary = generate_crash_labels(&args.input, &args.output, &settings)?;
    info!(
        rows = summary.rows,
        crashes = summary.crashes,
        "crash rate {:.3}",
        summary.crash_rate()
    );
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<()> {
    let mut batch = BatchSimulator::new(args.limit, args.seed);
    batch.run_from_csv(&args.input)?;
    batch.save_results(&args.output)?;

    if let Some(path) = &args.snapshot {
        save_snapshot_to_path(path, &SimulationSnapshot::from_batch(&batch))
            .with_context(|| format!("writing snapshot {}", path.display()))?;
    }

    for (i, record) in batch.results().iter().enumerate() {
        info!(
            "trip {}: {} {} danger={} fuel={} cost={} turn={} score={} {:?}",
            i + 1,
            record.test_id,
            record.car_model,
            record.DangerScore,
            record.FuelUsed,
            record.total_cost,
            record.TurnAngle,
            record.TripScore,
            record.Evaluation
        );
    }
    Ok(())
}

fn analyze(args: AnalyzeArgs) -> Result<()> {
    validate_threshold(args.threshold)?;
    let features = (!args.features.is_empty()).then_some(args.features.as_slice());
    let report = analyze_csv(&args.input, features, args.threshold, args.target.as_deref())?;
    write_report(&report, &args.output)?;

    for pair in &report.high_correlation_pairs {
        info!(
            "{} ~ {}: r = {:.3}",
            pair.feature_a, pair.feature_b, pair.correlation
        );
    }
    for entry in &report.vif {
        match entry.vif {
            Some(v) => info!("VIF {}: {:.3}", entry.feature, v),
            None => info!("VIF {}: undefined", entry.feature),
        }
    }
    if let Some(fit) = &report.regression {
        info!(
            column = %fit.target,
            intercept = fit.intercept,
            residual_mean = fit.residual_mean,
            residual_std = fit.residual_std,
            "regression r2 {:?}",
            fit.r_squared
        );
    }
    Ok(())
}

/// Defaults, then the JSON file, then explicit flags.
pub fn resolve_config(args: &PipelineArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(limit) = args.limit {
        config.limit = limit;
    }
    config.validate()?;
    Ok(config)
}

fn pipeline(args: PipelineArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let summary = run_pipeline(&config)?;

    info!(
        raw = summary.raw_rows,
        cleaned = summary.cleaning.after_required,
        crashes = summary.labels.crashes,
        simulated = summary.simulated,
        skipped = summary.skipped,
        correlated_pairs = summary.high_correlation_pairs,
        "pipeline finished"
    );
    for path in &summary.outputs {
        info!("wrote {}", path.display());
    }
    Ok(())
}
