//! pnmedit - line-oriented PNM image editor
//!
//! Reads one command per line from stdin (or a script file) and prints one
//! status line per command to stdout. Diagnostics go to stderr.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod command;
mod interpreter;

#[derive(Parser)]
#[command(name = "pnmedit")]
#[command(author, version, about = "Interactive PNM (P2/P3/P5/P6) image editor")]
#[command(long_about = "
Reads editing commands, one per line, and prints a status line for each.

Commands:
  LOAD <path>                  SAVE <path> [ascii]
  SELECT ALL                   SELECT <x1> <y1> <x2> <y2>
  CROP                         ROTATE <angle>
  APPLY EDGE|SHARPEN|BLUR|GAUSSIAN_BLUR
  HISTOGRAM <max_stars> <bins> EQUALIZE
  EXIT
")]
struct Cli {
    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log operation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            interpreter::run(BufReader::new(file), &mut out)
        }
        None => interpreter::run(io::stdin().lock(), &mut out),
    }
}
