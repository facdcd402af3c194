//! Promptlab - parameter sweep laboratory CLI
//!
//! The `promptlab` command creates experiments, runs decoding-parameter
//! sweeps against a generation backend, and inspects the scored results.
//!
//! ## Commands
//!
//! - `new`: Create an experiment for a prompt
//! - `run`: Expand parameter ranges and sweep the generation service
//! - `show`: Show an experiment with its stored responses
//! - `responses`: List responses with sorting
//! - `export`: Export an experiment as JSON or CSV
//! - `list`: List experiments

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use promptlab_core::{
    render_experiment_csv, render_experiment_document, ExperimentService, ExperimentStore,
    FsExperimentStore, GenerationClient, ParameterRanges, ResponseSort, SortOrder,
};
use promptlab_gemini::{GeminiClient, GeminiConfig};
use tracing::{info, Level};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "promptlab")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parameter sweep laboratory for text-generation services", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Data directory for experiment artifacts
    #[arg(long, global = true, default_value = ".promptlab")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new experiment
    New {
        /// The prompt every sweep of this experiment will use
        #[arg(short, long)]
        prompt: String,

        /// Temperature range, comma separated (count preview only)
        #[arg(long, value_delimiter = ',')]
        temperature: Vec<f64>,

        /// Nucleus probability range, comma separated
        #[arg(long, value_delimiter = ',')]
        top_p: Vec<f64>,

        /// Top-k range, comma separated
        #[arg(long, value_delimiter = ',')]
        top_k: Vec<u32>,

        /// Max output token range, comma separated
        #[arg(long, value_delimiter = ',')]
        max_output_tokens: Vec<u32>,
    },

    /// Run a parameter sweep for an experiment
    Run {
        /// Experiment ID
        #[arg(long)]
        experiment: Uuid,

        /// Temperature range, comma separated (e.g. 0.2,0.7,1.0)
        #[arg(long, value_delimiter = ',')]
        temperature: Vec<f64>,

        /// Nucleus probability range, comma separated
        #[arg(long, value_delimiter = ',')]
        top_p: Vec<f64>,

        /// Top-k range, comma separated
        #[arg(long, value_delimiter = ',')]
        top_k: Vec<u32>,

        /// Max output token range, comma separated
        #[arg(long, value_delimiter = ',')]
        max_output_tokens: Vec<u32>,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Gemini model override
        #[arg(long, env = "GEMINI_MODEL")]
        model: Option<String>,
    },

    /// Show an experiment with its stored responses
    Show {
        /// Experiment ID
        experiment: Uuid,
    },

    /// List an experiment's responses with sorting
    Responses {
        /// Experiment ID
        #[arg(long)]
        experiment: Uuid,

        /// Sort key
        #[arg(long, value_enum, default_value = "overall-score")]
        sort_by: SortKey,

        /// Sort direction
        #[arg(long, value_enum, default_value = "desc")]
        order: Direction,
    },

    /// Export an experiment as JSON or CSV
    Export {
        /// Experiment ID
        #[arg(long)]
        experiment: Uuid,

        /// Export format
        #[arg(long, value_enum, default_value = "json")]
        format: Format,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List experiments, newest-updated first
    List {
        /// Maximum number of experiments to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Number of experiments to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortKey {
    OverallScore,
    Temperature,
    CreatedAt,
}

impl From<SortKey> for ResponseSort {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::OverallScore => ResponseSort::OverallScore,
            SortKey::Temperature => ResponseSort::Temperature,
            SortKey::CreatedAt => ResponseSort::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Direction {
    Asc,
    Desc,
}

impl From<Direction> for SortOrder {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => SortOrder::Asc,
            Direction::Desc => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    promptlab_core::init_tracing(cli.json, level);

    let store = Arc::new(FsExperimentStore::new(&cli.data_dir));

    match cli.command {
        Commands::New {
            prompt,
            temperature,
            top_p,
            top_k,
            max_output_tokens,
        } => {
            let ranges = ParameterRanges {
                temperature: non_empty(temperature),
                top_p: non_empty(top_p),
                top_k: non_empty(top_k),
                max_output_tokens: non_empty(max_output_tokens),
            };
            cmd_new(store, &prompt, &ranges).await
        }
        Commands::Run {
            experiment,
            temperature,
            top_p,
            top_k,
            max_output_tokens,
            api_key,
            model,
        } => {
            let ranges = ParameterRanges {
                temperature: non_empty(temperature),
                top_p: non_empty(top_p),
                top_k: non_empty(top_k),
                max_output_tokens: non_empty(max_output_tokens),
            };
            cmd_run(store, experiment, ranges, &api_key, model.as_deref()).await
        }
        Commands::Show { experiment } => cmd_show(store, experiment).await,
        Commands::Responses {
            experiment,
            sort_by,
            order,
        } => cmd_responses(store, experiment, sort_by.into(), order.into()).await,
        Commands::Export {
            experiment,
            format,
            output,
        } => cmd_export(store, experiment, format, output.as_deref()).await,
        Commands::List { limit, offset } => cmd_list(store, limit, offset).await,
    }
}

/// A flag that was never passed stays `None` so validation reports it as
/// a missing range rather than an empty one.
fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Create a new experiment
async fn cmd_new(
    store: Arc<FsExperimentStore>,
    prompt: &str,
    ranges: &ParameterRanges,
) -> Result<()> {
    promptlab_core::validate_prompt(prompt)?;

    // Validate the ranges up front so a bad sweep request fails here,
    // before anything is persisted.
    let combination_count = if *ranges == ParameterRanges::default() {
        None
    } else {
        Some(promptlab_core::expand_combinations(ranges)?.len())
    };

    let record = store
        .create_experiment(prompt)
        .await
        .context("Failed to create experiment")?;

    info!(experiment_id = %record.id, "experiment created");

    let mut output = serde_json::to_value(&record)?;
    if let Some(count) = combination_count {
        output["parameter_combinations_count"] = count.into();
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run a parameter sweep against the Gemini backend
async fn cmd_run(
    store: Arc<FsExperimentStore>,
    experiment: Uuid,
    ranges: ParameterRanges,
    api_key: &str,
    model: Option<&str>,
) -> Result<()> {
    let mut config = GeminiConfig::new(api_key);
    if let Some(model) = model {
        config = config.with_model(model);
    }

    let backend = Arc::new(GeminiClient::new(config));
    let service = ExperimentService::new(store, GenerationClient::new(backend));

    let report = service
        .run_sweep(experiment, &ranges)
        .await
        .context("Sweep execution failed")?;

    if report.generated_count < report.total_combinations {
        info!(
            attempted = report.total_combinations,
            generated = report.generated_count,
            "sweep finished with partial results"
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Show an experiment with every stored response
async fn cmd_show(store: Arc<FsExperimentStore>, experiment: Uuid) -> Result<()> {
    let record = store
        .get_experiment(experiment)
        .await
        .context("Failed to load experiment")?;
    let responses = store
        .list_responses(experiment, ResponseSort::CreatedAt, SortOrder::Asc)
        .await
        .context("Failed to load responses")?;

    let document = render_experiment_document(&record, &responses);
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

/// List responses in the requested order
async fn cmd_responses(
    store: Arc<FsExperimentStore>,
    experiment: Uuid,
    sort: ResponseSort,
    order: SortOrder,
) -> Result<()> {
    let responses = store
        .list_responses(experiment, sort, order)
        .await
        .context("Failed to load responses")?;

    println!("{}", serde_json::to_string_pretty(&responses)?);
    Ok(())
}

/// Export an experiment as JSON or CSV
async fn cmd_export(
    store: Arc<FsExperimentStore>,
    experiment: Uuid,
    format: Format,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let record = store
        .get_experiment(experiment)
        .await
        .context("Failed to load experiment")?;
    let responses = store
        .list_responses(experiment, ResponseSort::CreatedAt, SortOrder::Asc)
        .await
        .context("Failed to load responses")?;

    let rendered = match format {
        Format::Json => {
            let document = render_experiment_document(&record, &responses);
            serde_json::to_string_pretty(&document)?
        }
        Format::Csv => render_experiment_csv(&responses),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("write {:?}", path))?;
            println!("Exported experiment {} to {:?}", experiment, path);
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// List experiments
async fn cmd_list(store: Arc<FsExperimentStore>, limit: usize, offset: usize) -> Result<()> {
    let page = store
        .list_experiments(limit, offset)
        .await
        .context("Failed to list experiments")?;

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
