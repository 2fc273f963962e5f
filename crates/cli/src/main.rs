// ABOUTME: CLI that ranks the articles of a Wikipedia category by readability.
// ABOUTME: Prints the ranking as text, an HTML table, or JSON; logs go to stderr via tracing.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wiki_readscore::{formats, Client, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Html,
    Json,
}

/// Rank the articles of a Wikipedia category from least to most readable.
#[derive(Parser, Debug)]
#[command(name = "readscore")]
#[command(about = "Score Wikipedia category articles with the Flesch reading-ease test", long_about = None)]
struct Args {
    /// Category name, with or without the "Category:" prefix (e.g. "Trees").
    category: String,

    /// Output format.
    #[arg(short = 'f', long = "format", value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Shorthand for --format json.
    #[arg(long = "json")]
    json_output: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Maximum number of category members to request.
    #[arg(long, default_value_t = wiki_readscore::options::DEFAULT_PAGE_LIMIT)]
    limit: u32,

    /// MediaWiki API endpoint.
    #[arg(long, default_value = wiki_readscore::options::DEFAULT_API_ENDPOINT)]
    endpoint: String,

    /// Overall per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Output file path (default: stdout).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Print elapsed time in ms to stderr.
    #[arg(long = "timing")]
    timing: bool,

    /// Log pipeline progress to stderr. RUST_LOG takes precedence when set.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

fn render(outcome: &Outcome, format: Format, compact: bool) -> anyhow::Result<String> {
    Ok(match format {
        Format::Text => formats::render_outcome_text(outcome),
        Format::Html => formats::render_outcome_html(outcome),
        Format::Json => formats::render_outcome_json(outcome, compact)?,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let format = if args.json_output {
        Format::Json
    } else {
        args.format
    };

    let client = match Client::builder()
        .api_endpoint(&args.endpoint)
        .page_limit(args.limit)
        .timeout(Duration::from_secs(args.timeout))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    let start = Instant::now();
    let result = client.score_category(&args.category).await;
    let elapsed = start.elapsed();

    let mut had_error = false;
    match result {
        Ok(outcome) => match render(&outcome, format, args.compact) {
            Ok(output_str) => {
                if let Some(output_path) = &args.output {
                    if let Err(e) = fs::write(output_path, &output_str) {
                        eprintln!("error writing to {:?}: {}", output_path, e);
                        had_error = true;
                    }
                } else {
                    println!("{}", output_str);
                }
            }
            Err(e) => {
                eprintln!("error rendering results: {}", e);
                had_error = true;
            }
        },
        Err(e) => {
            debug!(error = ?e, "run failed");
            eprintln!("error: could not score category {:?}: {}", args.category, e.code);
            had_error = true;
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
