//! docclassify CLI — batch-classify documents under a request-rate ceiling.
//!
//! Usage:
//!   docclassify-cli --classifier <id> [--token <t>] [--rpm <n>] [--batch <n>]
//!                   [--input <file>] [--base-url <url>]
//!
//! Documents are read from `--input` (one per line) or from stdin. Results
//! are printed to stdout as one JSON object per batch, in completion order.

use anyhow::Context;
use docclassify::{batch, ClassifyClientBuilder, Dispatcher, DispatcherConfig};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

struct CliOptions {
    token: Option<String>,
    classifier: String,
    rpm: f64,
    batch_size: usize,
    input: Option<PathBuf>,
    base_url: Option<String>,
}

fn print_usage() {
    println!(
        r#"docclassify-cli — rate-limited batch text classification

USAGE:
    docclassify-cli --classifier <id> [OPTIONS]

OPTIONS:
    --classifier <id>    Classifier ID (mandatory)
    --token <token>      API token (default: OS keyring, then DOCCLASSIFY_API_TOKEN)
    --rpm <n>            Requests per minute, should be lower than the
                         service rate limit (default: 120)
    --batch <n>          Documents per batch (default: 1)
    --input <file>       Newline-delimited documents (default: stdin)
    --base-url <url>     Service base URL override
    --version            Show version information
    -h, --help           Show this help message

ENVIRONMENT:
    DOCCLASSIFY_API_TOKEN          API token fallback
    DOCCLASSIFY_HTTP_TIMEOUT_SECS  Per-request HTTP timeout (default 30)
    RUST_LOG                       Log filter (default "info")"#
    );
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut token = None;
    let mut classifier = None;
    let mut rpm = 120.0_f64;
    let mut batch_size = 1_usize;
    let mut input = None;
    let mut base_url = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--token" => token = Some(value("--token")?),
            "--classifier" => classifier = Some(value("--classifier")?),
            "--rpm" => {
                rpm = value("--rpm")?
                    .parse::<f64>()
                    .map_err(|e| format!("invalid --rpm value: {e}"))?;
            }
            "--batch" => {
                batch_size = value("--batch")?
                    .parse::<usize>()
                    .map_err(|e| format!("invalid --batch value: {e}"))?;
            }
            "--input" => input = Some(PathBuf::from(value("--input")?)),
            "--base-url" => base_url = Some(value("--base-url")?),
            "version" | "--version" | "-V" => {
                println!("docclassify-cli {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "help" | "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    let classifier = classifier.ok_or("--classifier is mandatory")?;
    Ok(CliOptions {
        token,
        classifier,
        rpm,
        batch_size,
        input,
        base_url,
    })
}

fn load_documents(input: Option<&PathBuf>) -> anyhow::Result<Vec<String>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read documents from stdin")?;
            buf
        }
    };
    Ok(raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let documents = load_documents(opts.input.as_ref())?;
    println!("Documents to classify: {}", documents.len());
    println!("Batch size: {}", opts.batch_size);

    let batches = batch::split(documents, opts.batch_size)?;
    println!("Number of batches: {}", batches.len());

    let mut builder = ClassifyClientBuilder::new();
    if let Some(token) = opts.token {
        builder = builder.token(token);
    }
    if let Some(base_url) = opts.base_url {
        builder = builder.base_url_override(base_url);
    }
    let client = builder.build()?;

    let total = batches.len();
    let dispatcher = Dispatcher::new(DispatcherConfig::from_rpm(opts.rpm)?);
    let mut outcomes = dispatcher.dispatch(batches, opts.classifier, Arc::new(client));

    let mut processed = 0_usize;
    let mut failed = 0_usize;
    while let Some(outcome) = outcomes.recv().await {
        match outcome.result {
            Ok(response) => {
                tracing::info!(
                    batch = outcome.batch,
                    documents = outcome.documents,
                    records = response.records.len(),
                    "batch classified"
                );
                let line = serde_json::json!({
                    "batch": outcome.batch,
                    "records": response.records,
                });
                println!("{line}");
            }
            Err(err) => {
                failed += 1;
                tracing::error!(
                    batch = outcome.batch,
                    documents = outcome.documents,
                    retryable = err.is_retryable(),
                    error = %err,
                    "batch classification failed"
                );
            }
        }
        processed += 1;
    }

    println!("Processed {processed} out of {total} batches ({failed} failed)");
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
