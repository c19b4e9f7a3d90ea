//! Resource Multiplier CLI
//!
//! Usage:
//!   resource-multiplier [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>  Configuration file (TOML format)
//!   -p, --pretty         Pretty-print the response JSON
//!   -v, --verbose        Log every resource processed
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use resource_multiplier::{handle_json, MultiplyConfig};

#[derive(Parser)]
#[command(name = "resource-multiplier")]
#[command(about = "Replicate marked template resources from a macro request")]
struct Cli {
    /// Request file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the response JSON
    #[arg(short, long)]
    pretty: bool,

    /// Log every resource processed
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "resource_multiplier=debug"
    } else {
        "resource_multiplier=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => match MultiplyConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => MultiplyConfig::default(),
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let response = handle_json(&source, &config);
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&response)
    } else {
        serde_json::to_string(&response)
    };

    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error encoding response: {}", e);
            std::process::exit(1);
        }
    }

    if !response.is_success() {
        std::process::exit(1);
    }
}
