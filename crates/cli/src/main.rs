mod manifest;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{fs, path::PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::manifest::{DEFAULT_MANIFEST_NAME, Manifest};

#[derive(Parser)]
#[command(name = "optset")]
#[command(version, about = "Inspect and trace option manifests", long_about = None)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter optset.json
    Init(InitArgs),

    /// Compile every prototype in the manifest
    Check(CheckArgs),

    /// Print option descriptions for the manifest
    Help(HelpArgs),

    /// Parse tokens against the manifest and report what ran
    Parse(ParseArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the option manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,

    /// Only output JSON (no human-readable output)
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct HelpArgs {
    /// Path to the option manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the option manifest
    #[arg(short, long, default_value = DEFAULT_MANIFEST_NAME, value_name = "FILE")]
    manifest: PathBuf,

    /// Only output JSON (no human-readable output)
    #[arg(long)]
    json: bool,

    /// Tokens to parse; put them after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Check(args) => check_command(args),
        Commands::Help(args) => help_command(args),
        Commands::Parse(args) => parse_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let manifest_path = manifest::write_default_manifest(&dir)?;

    eprintln!("Created: {}", manifest_path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_MANIFEST_NAME} to declare your options");
    eprintln!("  2. Run: optset check");
    eprintln!("  3. Run: optset parse -- <ARGS>");

    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let manifest = Manifest::from_file(&args.manifest)?;
    let report = report::check_options(&args.manifest, &manifest)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    eprintln!();
    eprintln!("=== Option Check Results ===");
    eprintln!("Manifest: {}", report.manifest);
    eprintln!("Options: {}", report.options.len());
    for option in &report.options {
        let separators = option
            .separators
            .as_ref()
            .map(|s| format!(" separators={}", s.join(" ")))
            .unwrap_or_default();
        eprintln!(
            "  {:<24} names={} value={} max={}{}",
            option.prototype,
            option.names.join(","),
            option.value_arity,
            option.max_values,
            separators
        );
    }
    eprintln!("OK: All prototypes compile");

    Ok(())
}

fn help_command(args: HelpArgs) -> Result<()> {
    tracing::debug!("executing help command");

    let manifest = Manifest::from_file(&args.manifest)?;
    print!("{}", report::describe_options(&manifest)?);
    Ok(())
}

fn parse_command(args: ParseArgs) -> Result<()> {
    tracing::debug!(tokens = args.tokens.len(), "executing parse command");

    let manifest = Manifest::from_file(&args.manifest)?;
    let report = report::trace_parse(&args.manifest, &manifest, &args.tokens)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    eprintln!();
    eprintln!("=== Parse Results ===");
    eprintln!("Manifest: {}", report.manifest);
    for invocation in &report.invocations {
        let values: Vec<&str> = invocation
            .values
            .iter()
            .map(|v| v.as_deref().unwrap_or("<none>"))
            .collect();
        eprintln!(
            "  [{}] {} ({}) = {}",
            invocation.index,
            invocation.option,
            invocation.name.as_deref().unwrap_or("<default>"),
            values.join(", ")
        );
    }
    if report.extras.is_empty() {
        eprintln!("Extras: none");
    } else {
        eprintln!("Extras:");
        for extra in &report.extras {
            eprintln!("  - {extra}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
