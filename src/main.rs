// Written in 2025 by Joshua Doman <joshsdoman@gmail.com>
// SPDX-License-Identifier: CC0-1.0

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{Level, LevelFilter, log};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::io::Read;
use std::path::PathBuf;

use shamir_recover::SearchOptions;

// stderr carries only the JSON error line unless verbosity is raised
const FAILURE_LEVEL: Level = Level::Info;

#[derive(Parser)]
#[clap(name = "shamir-recover")]
#[clap(author = "Joshua Doman <joshsdoman@gmail.com>")]
#[clap(version = "0.1.0")]
#[clap(about = "CLI tool to recover a Shamir-shared secret from possibly corrupted shares.", long_about = None)]
struct Cli {
    /// JSON share document to read (stdin when omitted or "-")
    input: Option<PathBuf>,
    /// Interpolate and score subsets in parallel
    #[clap(long)]
    parallel: bool,
    /// Refuse to search more than this many share subsets
    #[clap(long, value_name = "N")]
    max_subsets: Option<u128>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.verbose)?;

    let input = read_input(cli.input.as_ref())?;
    let options = SearchOptions {
        parallel: cli.parallel,
        max_subsets: cli.max_subsets,
        ..Default::default()
    };

    match shamir_recover::recover_from_json(&input, &options) {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(err) => {
            log!(FAILURE_LEVEL, "recovery failed: {}", err);
            eprintln!("{}", shamir_recover::encode_error(&err));
            std::process::exit(1);
        }
    }
}

fn level_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn init_logger(verbose: u8) -> Result<()> {
    TermLogger::init(
        level_filter(verbose),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read share document: {}", path.display())),
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read share document from stdin")?;
            Ok(buffer)
        }
    }
}
