mod echo;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::Parser;
use docx2mdx_core::{ConvertConfig, Converter};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convert Word documents to MDX with front-matter
#[derive(Parser, Debug)]
#[command(name = "docx2mdx")]
#[command(author = "docx2mdx Contributors")]
#[command(version)]
#[command(about = "Convert Word documents to MDX", long_about = None)]
struct Args {
    /// A .docx file, or a directory with --directory
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file, or output directory with --directory (default: next to the input)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Convert every .docx file in INPUT
    #[arg(short, long)]
    directory: bool,

    /// Front-matter description
    #[arg(long, value_name = "TEXT")]
    description: Option<String>,

    /// Front-matter author
    #[arg(long, value_name = "NAME")]
    author: Option<String>,

    /// Print the result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn convert_config(&self) -> ConvertConfig {
        let mut builder = ConvertConfig::builder();
        if let Some(description) = &self.description {
            builder = builder.description(description);
        }
        if let Some(author) = &self.author {
            builder = builder.author(author);
        }
        builder.build()
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn convert_single(converter: &Converter, args: &Args) -> anyhow::Result<()> {
    if args.verbose {
        let size = fs::metadata(&args.input).map(|m| m.len()).unwrap_or_default();
        echo::print_step(1, 2, &format!("Converting {}", args.input.display().bright_white()));
        eprintln!("  {} {}\n", "Size:".dimmed(), echo::format_size(size).bright_white());
    }

    let started = Instant::now();
    let destination = converter
        .convert_file(&args.input, args.output.as_deref())
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    if args.verbose {
        echo::print_step(2, 2, "Done");
        echo::print_timing("Conversion", started.elapsed());
        eprintln!();
    }

    if args.json {
        let summary = serde_json::json!({ "source": args.input, "destination": destination });
        println!("{}", serde_json::to_string_pretty(&summary).context("Failed to serialize result")?);
    } else {
        echo::print_success(&format!("Output written to {}", destination.display().bright_white()));
    }
    Ok(())
}

fn convert_batch(converter: &Converter, args: &Args) -> anyhow::Result<()> {
    if args.verbose {
        echo::print_step(1, 2, &format!("Scanning {}", args.input.display().bright_white()));
    }

    let started = Instant::now();
    let report = converter
        .convert_directory(&args.input, args.output.as_deref())
        .with_context(|| format!("Failed to read directory {}", args.input.display()))?;

    if args.verbose {
        echo::print_step(2, 2, &format!("Processed {} file(s)", report.len()));
        echo::print_timing("Batch", started.elapsed());
        eprintln!();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).context("Failed to serialize batch report")?);
    } else if report.is_empty() {
        echo::print_info(&format!("No .docx files found in {}", args.input.display()));
    } else {
        echo::print_batch_summary(&report);
    }

    if report.all_failed() {
        bail!("All {} file(s) in {} failed to convert", report.len(), args.input.display());
    }
    if report.failures().next().is_some() && !args.json {
        echo::print_warning("Some files failed; see above");
    }
    Ok(())
}

fn run(args: &Args) -> anyhow::Result<()> {
    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    if is_dir(&args.input) && !args.directory {
        bail!(
            "{} is a directory; pass --directory to convert every .docx file in it",
            args.input.display()
        );
    }

    let converter = Converter::new(args.convert_config());
    if args.directory { convert_batch(&converter, args) } else { convert_single(&converter, args) }
}

fn is_dir(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|m| m.is_dir())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            echo::print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
