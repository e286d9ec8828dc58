use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemagen_core::artifact::{write_artifact, write_json};
use schemagen_core::{
    Config, Location, Report, Result as StageResult, SchemaModel, Severity, Stage, StageOutcome,
    StageStatus,
};
use schemagen_delta::{load_config_map, save_config_map, Delta, DeltaEngine};
use schemagen_engine::{DocumentEmitter, EmitOptions, MetaExtractor};
use schemagen_model::SchemaModelBuilder;

/// Config file picked up from the working directory when `--config` is absent
const DEFAULT_CONFIG_FILE: &str = "schemagen.toml";

/// schemagen - configuration artifacts from a class/aggregation schema
#[derive(Parser)]
#[command(name = "schemagen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemagen.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// XML schema description
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Base flat configuration (JSON)
    #[arg(long, global = true)]
    base: Option<PathBuf>,

    /// Target flat configuration (JSON)
    #[arg(long, global = true)]
    target: Option<PathBuf>,

    /// Directory for generated artifacts
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage: config.xml, meta.json, delta.json, patched config
    Generate {
        /// Output file for the run report
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Emit the nested element document
    ConfigXml {
        /// Output file (default: config.xml in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit per-class meta descriptors
    Meta {
        /// Output file (default: meta.json in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute the delta between base and target configuration
    Delta {
        /// Output file (default: delta.json in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a delta document to the base configuration
    Patch {
        /// Delta document to apply (default: the configured delta output)
        #[arg(short, long)]
        delta: Option<PathBuf>,

        /// Output file (default: res_patched_config.json in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// One stage to run and where its artifact goes
struct StageRequest {
    stage: Stage,
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    std::fs::create_dir_all(config.output_dir()).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir().display()
        )
    })?;

    let (requests, delta_input, report_path) = match cli.command {
        Commands::Generate { report } => {
            let requests = Stage::ALL
                .iter()
                .map(|stage| StageRequest {
                    stage: *stage,
                    output: config.output_path(*stage),
                })
                .collect::<Vec<_>>();
            (requests, None, report)
        }
        Commands::ConfigXml { output } => (vec![request(&config, Stage::ConfigXml, output)], None, None),
        Commands::Meta { output } => (vec![request(&config, Stage::Meta, output)], None, None),
        Commands::Delta { output } => (vec![request(&config, Stage::Delta, output)], None, None),
        Commands::Patch { delta, output } => {
            (vec![request(&config, Stage::Patch, output)], delta, None)
        }
    };

    let delta_input = delta_input.unwrap_or_else(|| config.output_path(Stage::Delta));
    let report = run_stages(&config, &requests, &delta_input);

    if let Some(path) = report_path {
        report
            .save_to_file(&path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        if cli.verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    print_report_summary(&report);

    // Exit with error code if any stage failed
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// Stderr logging; `RUST_LOG` wins over the `--verbose` default
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load the config file, then apply flag overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG_FILE))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    // Flags are relative to the working directory, not the config file
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    if let Some(schema) = &cli.schema {
        config.inputs.schema = cwd.join(schema);
    }
    if let Some(base) = &cli.base {
        config.inputs.base = cwd.join(base);
    }
    if let Some(target) = &cli.target {
        config.inputs.target = cwd.join(target);
    }
    if let Some(out_dir) = &cli.out_dir {
        config.outputs.dir = Some(cwd.join(out_dir));
    }

    tracing::debug!(
        schema = %config.schema_path().display(),
        base = %config.base_path().display(),
        target = %config.target_path().display(),
        out_dir = %config.output_dir().display(),
        "configuration resolved"
    );

    Ok(config)
}

fn request(config: &Config, stage: Stage, output: Option<PathBuf>) -> StageRequest {
    StageRequest {
        stage,
        output: output.unwrap_or_else(|| config.output_path(stage)),
    }
}

/// Run each requested stage; a failed stage never stops the ones after it
///
/// The one exception: patch is skipped when this run's delta stage failed,
/// since the delta document on disk would be stale.
fn run_stages(config: &Config, requests: &[StageRequest], delta_input: &Path) -> Report {
    let mut report = Report::new();
    let mut model: Option<StageResult<SchemaModel>> = None;

    for request in requests {
        let delta_failed = report
            .stage(Stage::Delta)
            .is_some_and(|o| o.status == StageStatus::Failed);
        if request.stage == Stage::Patch && delta_failed {
            tracing::warn!(stage = %request.stage, "skipped after delta failure");
            report.record_stage(StageOutcome::skipped(
                request.stage,
                "delta stage failed in this run",
            ));
            continue;
        }

        let result = if request.stage.needs_model() {
            match model.get_or_insert_with(|| load_model(config, &mut report)) {
                Ok(schema) if request.stage == Stage::ConfigXml => {
                    write_config_xml(config, schema, &request.output)
                }
                Ok(schema) => write_meta(schema, &request.output),
                Err(e) => Err(e.clone()),
            }
        } else if request.stage == Stage::Delta {
            write_delta(config, &request.output)
        } else {
            write_patched(config, delta_input, &request.output, &mut report)
        };

        let outcome = match result {
            Ok(digest) => {
                tracing::info!(stage = %request.stage, output = %request.output.display(), "stage succeeded");
                StageOutcome::succeeded(request.stage, request.output.display().to_string(), digest)
            }
            Err(e) => {
                tracing::warn!(stage = %request.stage, error = %e, "stage failed");
                StageOutcome::failed(request.stage, &e)
            }
        };
        report.record_stage(outcome);
    }

    report
}

/// Build the schema model, moving its findings into the report
fn load_model(config: &Config, report: &mut Report) -> StageResult<SchemaModel> {
    let built = SchemaModelBuilder::load(&config.schema_path())?;
    report.extend_diagnostics(built.diagnostics);
    Ok(built.model)
}

fn write_config_xml(config: &Config, model: &SchemaModel, output: &Path) -> StageResult<String> {
    let document = DocumentEmitter::new(model)
        .with_options(EmitOptions::from(&config.emit))
        .emit()?;
    write_artifact(output, &document)
}

fn write_meta(model: &SchemaModel, output: &Path) -> StageResult<String> {
    write_json(output, &MetaExtractor::extract(model))
}

fn write_delta(config: &Config, output: &Path) -> StageResult<String> {
    let base = load_config_map(&config.base_path())?;
    let target = load_config_map(&config.target_path())?;

    let delta = DeltaEngine::compute(&base, &target);
    tracing::info!(summary = %delta.summary(), "delta computed");

    delta.save_to_file(output)
}

fn write_patched(
    config: &Config,
    delta_input: &Path,
    output: &Path,
    report: &mut Report,
) -> StageResult<String> {
    let base = load_config_map(&config.base_path())?;
    let delta = Delta::from_file(delta_input)?;

    let location = Location::new(delta_input.display().to_string());
    report.extend_diagnostics(
        delta
            .validate()
            .into_iter()
            .map(|d| d.with_location(location.clone())),
    );

    let patched = DeltaEngine::apply(&base, &delta);
    save_config_map(output, &patched)
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Artifact Generation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Stages:".bold());
    for outcome in &report.stages {
        let status = match outcome.status {
            StageStatus::Succeeded => "OK".green().bold(),
            StageStatus::Failed => "FAILED".red().bold(),
            StageStatus::Skipped => "SKIPPED".yellow(),
        };
        print!("  [{}] {}", status, outcome.stage);
        if let Some(output) = &outcome.output {
            print!(" -> {}", output);
        }
        println!();

        if let Some(code) = &outcome.error_code {
            println!("    {}: {}", code.as_str().red(), outcome.message.as_deref().unwrap_or_default());
        } else if let Some(message) = &outcome.message {
            println!("    {}", message);
        }
    }
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if !report.diagnostics.is_empty() {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(loc) = &diag.location {
                println!("    at {}", loc);
            }

            if !diag.related.is_empty() {
                println!("    Related: {}", diag.related.join(", "));
            }
        }
        println!();
    }

    if report.has_failures() {
        println!(
            "{}",
            format!("✗ {} stage(s) failed", report.summary.stages_failed)
                .red()
                .bold()
        );
    } else {
        println!("{}", "✓ All stages succeeded".green().bold());
    }

    println!("{}", "=".repeat(60).bright_blue());
}
