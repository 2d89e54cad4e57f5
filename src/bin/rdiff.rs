//! rdiff - Structural diff of two YAML/JSON documents
//!
//! Prints every divergence between the two documents and exits with 0 when
//! they are equal, 1 when they differ and 2 on error.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use reflect_diff::value::{self, Value};
use reflect_diff::{DiffConfig, Differ};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Yaml,
}

/// Structural diff of two YAML/JSON documents.
#[derive(Debug, Parser)]
#[command(name = "rdiff", version)]
struct Cli {
    /// Left-hand document.
    #[arg(long)]
    lhs: PathBuf,

    /// Right-hand document.
    #[arg(long)]
    rhs: PathBuf,

    /// Omission pattern; may be repeated.
    #[arg(long = "omit", value_name = "PATTERN")]
    omit: Vec<String>,

    /// YAML file with differ settings.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output location. Use '-' for stdout.
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Only report through the exit code.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let mut differ = match &cli.config {
        Some(path) => Differ::with_config(&DiffConfig::load(path)?),
        None => Differ::new(),
    };
    differ.omit_path(&cli.omit);

    let lhs = read_document(&cli.lhs)?;
    let rhs = read_document(&cli.rhs)?;

    if cli.quiet {
        return Ok(differ.equals(&lhs, &rhs));
    }

    let patch = differ.make_patch(&lhs, &rhs);
    tracing::info!(events = patch.len(), "compared documents");

    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.format {
        Format::Text if patch.is_empty() => writeln!(output, "No differences.")?,
        Format::Text => writeln!(output, "{}", patch)?,
        Format::Json => writeln!(output, "{}", patch.to_json()?)?,
        Format::Yaml => write!(output, "{}", patch.to_yaml()?)?,
    }

    Ok(patch.is_empty())
}

fn read_document(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file {:?}: {}", path, e))?;
    let parsed = if path.extension().is_some_and(|ext| ext == "json") {
        value::from_json(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?
    } else {
        value::from_yaml(&content).map_err(|e| format!("Failed to parse {:?}: {}", path, e))?
    };
    Ok(parsed)
}
