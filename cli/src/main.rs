mod output;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use usage_pattern_core::{Response, ResponseKind};
use usage_pattern_parser::{HandlerConfig, UsageDoc};

use crate::output::{DocSummary, OutputFormat, format_response, format_summary};

#[derive(Debug, Parser)]
#[command(name = "usage-match")]
#[command(about = "Match argument vectors against usage docs", version)]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Match one argv against a usage doc and print the bound values.
    Match(MatchArgs),
    /// Show the options and compiled pattern of a usage doc.
    Inspect(InspectArgs),
    /// Match every line of a file (one argv per line) in parallel.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct HandlingArgs {
    /// YAML file with handler settings; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not answer -h/--help with the usage doc.
    #[arg(long)]
    no_help: bool,
    /// Answer --version with this string.
    #[arg(long)]
    program_version: Option<String>,
    /// Treat everything from the first positional on as positional.
    #[arg(long)]
    options_first: bool,
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Path to the usage doc.
    #[arg(long)]
    doc: PathBuf,
    #[command(flatten)]
    handling: HandlingArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// The argv to match (program name excluded); put it after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Path to the usage doc.
    #[arg(long)]
    doc: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Path to the usage doc.
    #[arg(long)]
    doc: PathBuf,
    /// File with one whitespace-separated argv per line.
    #[arg(long)]
    input: PathBuf,
    /// Number of parallel jobs (default: number of CPUs).
    #[arg(long)]
    jobs: Option<usize>,
    #[command(flatten)]
    handling: HandlingArgs,
}

/// One line of `batch` output.
#[derive(Debug, Serialize)]
struct BatchRecord<'a> {
    line: usize,
    argv: Vec<&'a str>,
    response: Response,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.parse().unwrap_or_default()),
        )
        .init();

    let result = match cli.command {
        Command::Match(args) => run_match(args),
        Command::Inspect(args) => run_inspect(args),
        Command::Batch(args) => run_batch(args),
    };

    match result {
        Ok(0) => {}
        Ok(status) => std::process::exit(status),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    }
}

fn run_match(args: MatchArgs) -> Result<i32, String> {
    let config = handler_config(&args.handling)?;
    let doc = compile_doc(&args.doc)?;
    let response = doc.parse_argv(&args.argv, &config);
    debug!(kind = ?response.kind(), "Matched argv");

    if config.exit {
        response.exit_unless_matched();
    }

    let raw = format_response(&response, args.format)?;
    if response.exit_status() == 0 {
        print!("{}", with_newline(raw));
    } else {
        eprint!("{}", with_newline(raw));
    }
    Ok(response.exit_status())
}

fn run_inspect(args: InspectArgs) -> Result<i32, String> {
    let doc = compile_doc(&args.doc)?;
    let raw = format_summary(&DocSummary::new(&doc), args.format)?;
    print!("{}", with_newline(raw));
    Ok(0)
}

fn run_batch(args: BatchArgs) -> Result<i32, String> {
    use rayon::prelude::*;

    let config = handler_config(&args.handling)?;
    let doc = compile_doc(&args.doc)?;
    let input = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;

    let lines: Vec<(usize, Vec<&str>)> = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line.split_whitespace().collect()))
        .collect();

    let jobs = args
        .jobs
        .filter(|jobs| *jobs > 0)
        .unwrap_or_else(rayon::current_num_threads);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|err| format!("Failed to build thread pool: {err}"))?;
    info!(lines = lines.len(), jobs, "Matching batch");

    let records: Vec<BatchRecord<'_>> = pool.install(|| {
        lines
            .par_iter()
            .map(|(line, argv)| BatchRecord {
                line: *line,
                argv: argv.clone(),
                response: doc.parse_argv(argv.iter().copied(), &config),
            })
            .collect()
    });

    let mut out = String::new();
    for record in &records {
        let raw = serde_json::to_string(record)
            .map_err(|err| format!("JSON serialization failed: {err}"))?;
        out.push_str(&raw);
        out.push('\n');
    }
    print!("{out}");

    let failed = records
        .iter()
        .filter(|r| r.response.kind() != ResponseKind::Matched)
        .count();
    if failed > 0 {
        eprintln!("{failed} of {} argv line(s) did not match.", records.len());
    }
    Ok(0)
}

fn handler_config(args: &HandlingArgs) -> Result<HandlerConfig, String> {
    let mut config = match &args.config {
        Some(path) => HandlerConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => HandlerConfig::default(),
    };
    if args.no_help {
        config.help = false;
    }
    if let Some(version) = &args.program_version {
        config.version = Some(version.clone());
    }
    if args.options_first {
        config.options_first = true;
    }
    Ok(config)
}

fn compile_doc(path: &Path) -> Result<UsageDoc, String> {
    let text = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    UsageDoc::compile(&text).map_err(|err| format!("Invalid usage doc '{}': {err}", path.display()))
}

fn with_newline(mut raw: String) -> String {
    if !raw.ends_with('\n') {
        raw.push('\n');
    }
    raw
}
