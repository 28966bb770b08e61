//! Stepgraph CLI
//!
//! - `check`: parse a schema declaration file, register every vertex, edge
//!   and relationship entity, and print the derived steps.
//! - `fmt`: print a declaration file in canonical form.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use stepgraph_schema::{
    format_schema_decl, parse_schema_decl, RegistryConfig, SchemaDecl, SchemaRegistry,
};

mod report;

use report::SchemaReport;

#[derive(Parser)]
#[command(name = "stepgraph")]
#[command(author, version, about = "Stepgraph: cardinality-typed graph traversal steps")]
struct Cli {
    /// Log registration details to stderr (repeat for more).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a schema declaration file and show its derived steps.
    Check {
        /// Declaration file
        input: PathBuf,
        /// Registry configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit the checked schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a declaration file in canonical form.
    Fmt {
        /// Declaration file
        input: PathBuf,
        /// Exit non-zero instead of printing when the file is not canonical
        #[arg(long)]
        check: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Check {
            input,
            config,
            json,
        } => cmd_check(&input, config.as_deref(), json),
        Commands::Fmt { input, check } => cmd_fmt(&input, check),
    }
}

fn read_decl(input: &Path) -> Result<SchemaDecl> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    parse_schema_decl(&text).with_context(|| format!("in {}", input.display()))
}

fn cmd_check(input: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = match config {
        Some(path) => RegistryConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    let decl = read_decl(input)?;
    tracing::info!(
        vertices = decl.vertices.len(),
        edges = decl.edges.len(),
        relationships = decl.relationships.len(),
        "parsed declaration file"
    );

    let schema = SchemaRegistry::from_decl(&decl, config)
        .with_context(|| format!("schema {} is invalid", input.display()))?
        .finish();
    let report = SchemaReport::new(&schema);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", "Checking".green().bold(), input.display());
    report.print();
    println!("{}", "ok".green().bold());
    Ok(())
}

fn cmd_fmt(input: &Path, check: bool) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let decl = parse_schema_decl(&text).with_context(|| format!("in {}", input.display()))?;
    let formatted = format_schema_decl(&decl)?;

    if check {
        if formatted != text {
            anyhow::bail!("{} is not in canonical form", input.display());
        }
        return Ok(());
    }
    print!("{formatted}");
    Ok(())
}
