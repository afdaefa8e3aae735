//! CLI entry point for feedback_digest.
//!
//! Loads a performance-feedback export, then answers queries of the form
//! `<subject> [year]` with positive/negative comment summaries and
//! per-attribute averages.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use feedback_digest::analyzers::analyzer::Pipeline;
use feedback_digest::config::{DEFAULT_INFERENCE_BASE_URL, DEFAULT_SENTIMENT_MODEL, PipelineConfig};
use feedback_digest::fetch::auth::ApiKey;
use feedback_digest::fetch::{BasicClient, HttpClient};
use feedback_digest::infra::huggingface::{HuggingFaceClassifier, HuggingFaceSummarizer, model_endpoint};
use feedback_digest::output::{append_averages, print_pretty, render_text, to_json};
use feedback_digest::query::Query;
use feedback_digest::table::schema::check_columns;
use feedback_digest::table::{FeedbackTable, read_table};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "feedback_digest")]
#[command(about = "Summarize performance feedback for one person", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Feedback export to analyze (.csv, .csv.gz or .xlsx)
    #[arg(short, long, value_name = "FILE")]
    file: String,

    /// Optional JSON pipeline config
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Args)]
struct ReportArgs {
    /// Leave out feedback the subject wrote about themselves
    #[arg(long, default_value_t = false)]
    exclude_self: bool,

    /// Print the report as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Optional: CSV file to append attribute averages to
    #[arg(long)]
    averages_csv: Option<String>,

    /// Classify comments one at a time
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze feedback for a single query, e.g. "alice@corp.com 2024"
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Subject identifier, optionally followed or preceded by a 4-digit year
        #[arg(short, long)]
        query: String,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Load the file once and answer one query per line from stdin
    Interactive {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Check that the file has every required column
    CheckSchema {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/feedback_digest.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("feedback_digest.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            query,
            report,
        } => {
            let config = load_config(&input, &report)?;
            let table = load_table(&input.file, &config)?;
            let pipeline = build_pipeline(config)?;
            run_query(&pipeline, &table, &query, &report).await?;
        }
        Commands::Interactive { input, report } => {
            let config = load_config(&input, &report)?;
            let table = load_table(&input.file, &config)?;
            let pipeline = build_pipeline(config)?;
            interactive(&pipeline, &table, &report).await?;
        }
        Commands::CheckSchema { input } => {
            let config = match &input.config {
                Some(path) => PipelineConfig::load(path)?,
                None => PipelineConfig::default(),
            };
            let raw = read_table(&input.file)?;
            let check = check_columns(&raw.headers, &config.columns.required_columns());
            if check.is_valid() {
                info!(file = %input.file, rows = raw.rows.len(), "All required columns present");
            } else {
                error!(file = %input.file, missing = ?check.missing, "Required columns missing");
                check.ensure()?;
            }
        }
    }

    Ok(())
}

fn load_config(input: &InputArgs, report: &ReportArgs) -> Result<PipelineConfig> {
    let mut config = match &input.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => PipelineConfig::default(),
    };
    if report.sequential {
        config.parallel_classification = false;
    }
    Ok(config)
}

#[tracing::instrument(skip(config))]
fn load_table(path: &str, config: &PipelineConfig) -> Result<FeedbackTable> {
    let raw = read_table(path).with_context(|| format!("Failed to read {path}"))?;
    match FeedbackTable::from_raw(raw, &config.columns) {
        Ok(table) => Ok(table),
        Err(e) => {
            error!(error = %e, "Error processing file");
            Err(e.into())
        }
    }
}

/// Builds the HTTP collaborators once for the whole process.
///
/// `HF_API_TOKEN` enables bearer auth; `SENTIMENT_ENDPOINT`,
/// `SUMMARIZER_ENDPOINT` and `HF_INFERENCE_URL` override where calls go.
fn build_pipeline(config: PipelineConfig) -> Result<Pipeline> {
    let base_url = std::env::var("HF_INFERENCE_URL")
        .unwrap_or_else(|_| DEFAULT_INFERENCE_BASE_URL.to_string());
    let sentiment_endpoint = std::env::var("SENTIMENT_ENDPOINT")
        .unwrap_or_else(|_| model_endpoint(&base_url, DEFAULT_SENTIMENT_MODEL));
    let summarizer_endpoint = std::env::var("SUMMARIZER_ENDPOINT")
        .unwrap_or_else(|_| model_endpoint(&base_url, config.summarizer_backend.model_id()));

    let basic = BasicClient::with_timeouts(
        Duration::from_secs(config.request_timeout_secs),
        Duration::from_secs(config.connect_timeout_secs),
    )?;

    let http: Arc<dyn HttpClient> = match std::env::var("HF_API_TOKEN") {
        Ok(token) if !token.is_empty() => Arc::new(ApiKey::bearer(basic, &token)?),
        _ => {
            warn!("HF_API_TOKEN not set, calling inference endpoints anonymously");
            Arc::new(basic)
        }
    };

    info!(
        sentiment = %sentiment_endpoint,
        summarizer = %summarizer_endpoint,
        parallel = config.parallel_classification,
        max_parallelism = config.max_parallelism,
        "Collaborators configured"
    );

    let classifier = Arc::new(HuggingFaceClassifier::new(http.clone(), sentiment_endpoint));
    let summarizer = Arc::new(HuggingFaceSummarizer::new(http, summarizer_endpoint));

    Ok(Pipeline::new(classifier, summarizer, config))
}

/// Runs one full pipeline pass and prints the result to stdout.
async fn run_query(
    pipeline: &Pipeline,
    table: &FeedbackTable,
    input: &str,
    args: &ReportArgs,
) -> Result<()> {
    let query = Query::parse(input);
    let report = pipeline
        .analyze(table, &query, !args.exclude_self)
        .await?;
    print_pretty(&report);

    if args.json {
        println!("{}", to_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    if let Some(path) = &args.averages_csv {
        append_averages(path, &report)?;
    }

    Ok(())
}

/// Reads queries from stdin until EOF. A failing query is logged and the
/// loop moves on to the next line.
async fn interactive(pipeline: &Pipeline, table: &FeedbackTable, args: &ReportArgs) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stderr = tokio::io::stderr();

    info!(records = table.len(), "Ready for queries");

    loop {
        stderr
            .write_all(b"Enter the email of the resource and optionally the year: ")
            .await?;
        stderr.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Err(e) = run_query(pipeline, table, line, args).await {
            error!(error = %e, query = line, "Query failed");
        }
    }

    Ok(())
}
