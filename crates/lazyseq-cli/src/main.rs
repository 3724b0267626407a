//! lazyseq CLI: run YAML operator pipelines over JSON input.

use clap::{Parser, Subcommand};
use lazyseq_core::config::RunConfig;
use lazyseq_operators::OpPlan;
use lazyseq_pipeline::{decode_input, load_pipeline, run, PipelineConfig};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lazyseq")]
#[command(about = "Deferred-execution sequence operators over JSON values", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline over a JSON array
    Run {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// JSON input file (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Pretty-print the JSON output (overrides config)
        #[arg(long)]
        pretty: bool,

        /// Reject inputs with more elements than this (overrides config)
        #[arg(long)]
        max_input: Option<usize>,
    },

    /// Validate a pipeline YAML file (syntax and expressions)
    Validate {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,
    },

    /// Show how each step of a pipeline evaluates
    Explain {
        /// Path to the pipeline YAML file
        #[arg(short, long)]
        pipeline: PathBuf,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pipeline,
            input,
            pretty,
            max_input,
        } => {
            if let Err(e) = run_pipeline(&pipeline, input.as_deref(), pretty, max_input) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { pipeline } => {
            init_logging(&RunConfig::from_env());
            if let Err(e) = validate_pipeline(&pipeline) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline is valid");
        }
        Commands::Explain { pipeline, json } => {
            init_logging(&RunConfig::from_env());
            if let Err(e) = explain_pipeline(&pipeline, json) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn init_logging(cfg: &RunConfig) {
    let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_pipeline(
    pipeline_path: &Path,
    input_path: Option<&Path>,
    pretty: bool,
    max_input: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load_pipeline(pipeline_path)?;

    // env < pipeline config < CLI flags
    let mut config = RunConfig::from_env();
    apply_pipeline_config(&mut config, &parsed.config);
    if pretty {
        config.pretty = true;
    }
    if let Some(max) = max_input {
        config.max_input = Some(max);
    }
    init_logging(&config);

    let src = match input_path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read input '{}': {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let values = decode_input(&src, &config)?;
    tracing::info!(
        pipeline = %pipeline_path.display(),
        steps = parsed.steps.len(),
        elements = values.len(),
        "running"
    );
    let output = run(&parsed, values)?;
    println!("{}", output.to_json(config.pretty)?);

    Ok(())
}

fn validate_pipeline(pipeline_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let _ = load_pipeline(pipeline_path)?;
    Ok(())
}

fn explain_pipeline(pipeline_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let parsed = load_pipeline(pipeline_path)?;
    let plans = parsed.explain();

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    println!("Pipeline Plan");
    println!("=============");
    println!();
    for (i, plan) in plans.iter().enumerate() {
        println!("  {}. {}", i + 1, describe(plan));
    }
    println!();
    if parsed.is_streaming() {
        println!("Streaming: yes (safe on unbounded input)");
    } else {
        println!("Streaming: no (a buffering step reads the whole input first)");
    }

    Ok(())
}

fn describe(plan: &OpPlan) -> String {
    let mode = format!("{:?}", plan.evaluation).to_lowercase();
    match &plan.detail {
        Some(detail) => format!("{} [{}] {}", plan.name, mode, detail),
        None => format!("{} [{}]", plan.name, mode),
    }
}

fn apply_pipeline_config(cfg: &mut RunConfig, doc: &PipelineConfig) {
    if let Some(pretty) = doc.pretty {
        cfg.pretty = pretty;
    }
    if let Some(max) = doc.max_input {
        cfg.max_input = Some(max);
    }
    if let Some(log) = &doc.log {
        cfg.log_filter = log.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_pipeline_config, describe, RunConfig};
    use lazyseq_operators::OpKind;
    use lazyseq_pipeline::PipelineConfig;

    #[test]
    fn pipeline_config_overrides_env_defaults() {
        let mut config = RunConfig::default();
        let pipeline = PipelineConfig {
            pretty: Some(true),
            max_input: Some(10),
            log: Some("lazyseq_operators=trace".into()),
        };
        apply_pipeline_config(&mut config, &pipeline);
        assert!(config.pretty);
        assert_eq!(config.max_input, Some(10));
        assert_eq!(config.log_filter, "lazyseq_operators=trace");
    }

    #[test]
    fn unset_fields_keep_env_values() {
        let mut config = RunConfig::from_lookup(|key| match key {
            "LAZYSEQ_MAX_INPUT" => Some("5".into()),
            _ => None,
        });
        apply_pipeline_config(&mut config, &PipelineConfig::default());
        assert_eq!(config.max_input, Some(5));
        assert_eq!(config.log_filter, "warn");

        // Simulate CLI override after config
        config.max_input = Some(50);
        assert_eq!(config.max_input, Some(50));
    }

    #[test]
    fn describe_includes_mode_and_detail() {
        let plan = OpKind::GroupBy.plan().with_detail("key = x % 2");
        assert_eq!(describe(&plan), "group_by [buffering] key = x % 2");
        assert_eq!(describe(&OpKind::Distinct.plan()), "distinct [retaining]");
    }
}
