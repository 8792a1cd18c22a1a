//! `fqk` CLI: flatten JSON documents into fully-qualified keys and back.
//!
//! ## Usage
//!
//! ```sh
//! # Flatten JSON (stdin → stdout)
//! echo '{"db":{"host":"localhost","port":5432}}' | fqk flatten
//!
//! # Flatten with a custom separator and prefix, file to file
//! fqk flatten -i config.json -o flat.json --separator / --prefix app/
//!
//! # Keep arrays as grouped values instead of walking them
//! fqk flatten --numeric-not-flattened -i data.json
//!
//! # Unflatten, merging repeated keys into lists
//! fqk unflatten -i flat.json
//!
//! # Inflate without merging (first write wins)
//! fqk expand -i flat.json
//!
//! # Load session settings from a JSON file; flags still override
//! fqk flatten --config fqk.json --prefix env_
//! ```
//!
//! Set `RUST_LOG=fqk_core=debug` to see session events on stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fqk_core::json::{expand_json, flatten_json, unflatten_json};
use fqk_core::{Config, Flattener};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "fqk",
    version,
    about = "Flatten nested JSON into fully-qualified keys, and back"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten a JSON document into an object keyed by fully-qualified keys
    Flatten {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        session: SessionArgs,
        /// Emit numeric-keyed entries (array items) as one grouped value
        #[arg(long)]
        numeric_not_flattened: bool,
    },
    /// Unflatten an object of fully-qualified keys, merging repeated keys
    Unflatten {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        session: SessionArgs,
    },
    /// Inflate an object of fully-qualified keys without merging
    Expand {
        #[command(flatten)]
        io: IoArgs,
        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct SessionArgs {
    /// Separator placed between path segments [default: "."]
    #[arg(short, long)]
    separator: Option<String>,
    /// Prefix glued to the front of every key [default: ""]
    #[arg(short, long)]
    prefix: Option<String>,
    /// JSON file with session settings (separator, prefix, numeric_not_flattened)
    #[arg(long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Flatten {
            io,
            session,
            numeric_not_flattened,
        } => {
            let mut config = build_config(&session)?;
            if numeric_not_flattened {
                config = config.with_numeric_not_flattened(true);
            }
            let json = read_input(io.input.as_deref())?;
            let flat = flatten_json(&json, &Flattener::new(config))
                .context("Failed to flatten JSON")?;
            write_output(io.output.as_deref(), &pretty(&flat)?)?;
        }
        Commands::Unflatten { io, session } => {
            let config = build_config(&session)?;
            let json = read_input(io.input.as_deref())?;
            let nested = unflatten_json(&json, &Flattener::new(config))
                .context("Failed to unflatten JSON")?;
            write_output(io.output.as_deref(), &pretty(&nested)?)?;
        }
        Commands::Expand { io, session } => {
            let config = build_config(&session)?;
            let json = read_input(io.input.as_deref())?;
            let nested = expand_json(&json, &Flattener::new(config))
                .context("Failed to expand JSON")?;
            write_output(io.output.as_deref(), &pretty(&nested)?)?;
        }
    }

    Ok(())
}

/// Start from `--config` (or defaults), then apply `--separator` / `--prefix`.
fn build_config(args: &SessionArgs) -> Result<Config> {
    let mut config = match args.config.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            serde_json::from_str::<Config>(&raw)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => Config::default(),
    };

    if let Some(separator) = &args.separator {
        config = config.with_separator(separator.as_str());
    }
    if let Some(prefix) = &args.prefix {
        config = config.with_prefix(prefix.as_str());
    }
    tracing::debug!(?config, "resolved session config");
    Ok(config)
}

/// Re-render compact JSON output from the library as pretty-printed JSON.
fn pretty(json: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
