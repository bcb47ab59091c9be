//! Headless arena match runner.
//!
//! Runs scripted-vs-scripted matches without graphics, for balance
//! testing and CI verification.
//!
//! # Usage
//!
//! ```bash
//! # Run a single match with the built-in roster
//! cargo run -p arena_headless -- run
//!
//! # Run with a custom roster and decks
//! cargo run -p arena_headless -- run --roster balance.ron --left knight,giant --right archer,wizard
//!
//! # Verify determinism over repeated runs
//! cargo run -p arena_headless -- verify --runs 5
//!
//! # Raw tick throughput
//! cargo run -p arena_headless -- bench --ticks 100000
//! ```
//!
//! Match summaries print as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use arena_core::prelude::*;
use arena_headless::runner::{run_match, verify_determinism, RunConfig};

#[derive(Parser)]
#[command(name = "arena_headless")]
#[command(about = "Headless arena match runner for balance testing and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single scripted match and print the summary as JSON
    Run {
        /// Template roster RON file (defaults to the built-in roster)
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Friendly-side deck, comma separated template ids
        #[arg(long, default_value = "knight,archer,giant", value_delimiter = ',')]
        left: Vec<String>,

        /// Opponent-side deck, comma separated template ids
        #[arg(long, default_value = "archer,knight,wizard", value_delimiter = ',')]
        right: Vec<String>,

        /// Ticks between deploy attempts
        #[arg(long, default_value = "20")]
        cadence: u64,

        /// Regulation duration in seconds
        #[arg(long, default_value = "180")]
        duration: u64,

        /// Overtime duration in seconds
        #[arg(long, default_value = "60")]
        overtime: u64,

        /// Number of matches to run (one JSON summary per line)
        #[arg(long, default_value = "1")]
        count: u32,
    },

    /// Verify determinism by running the same match multiple times
    Verify {
        /// Number of verification runs
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },

    /// Run N ticks of a populated battle for throughput measurement
    Bench {
        /// Number of ticks to run
        #[arg(short, long, default_value = "100000")]
        ticks: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON summaries
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let exit = match cli.command {
        Commands::Run {
            roster,
            left,
            right,
            cadence,
            duration,
            overtime,
            count,
        } => cmd_run(roster, left, right, cadence, duration, overtime, count),
        Commands::Verify { runs } => cmd_verify(runs),
        Commands::Bench { ticks } => cmd_bench(ticks),
    };
    std::process::exit(exit);
}

fn cmd_run(
    roster: Option<PathBuf>,
    left: Vec<String>,
    right: Vec<String>,
    cadence: u64,
    duration: u64,
    overtime: u64,
    count: u32,
) -> i32 {
    let config = RunConfig {
        roster_path: roster,
        left_deck: left,
        right_deck: right,
        cadence,
        match_config: MatchConfig {
            duration_ticks: duration * u64::from(TICK_RATE),
            overtime_ticks: overtime * u64::from(TICK_RATE),
            ..MatchConfig::default()
        },
    };

    for index in 0..count {
        let summary = match run_match(&config) {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("Match {index} failed: {e}");
                return 1;
            }
        };
        match serde_json::to_string(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize summary: {e}");
                return 1;
            }
        }
    }
    0
}

fn cmd_verify(runs: u32) -> i32 {
    let config = RunConfig::default();
    match verify_determinism(&config, runs) {
        Ok(true) => {
            eprintln!("PASS: all {runs} runs produced identical state hashes");
            0
        }
        Ok(false) => {
            eprintln!("FAIL: non-determinism detected");
            1
        }
        Err(e) => {
            eprintln!("Verification failed to run: {e}");
            1
        }
    }
}

fn cmd_bench(ticks: u64) -> i32 {
    use std::time::Instant;

    let config = MatchConfig {
        // Long enough that the timer never ends the benchmark match
        duration_ticks: ticks + 1,
        ..MatchConfig::default()
    };
    let mut battle = Battle::new(config);
    if let Err(e) = battle.start(&StructurePlacement::standard(&config.bounds)) {
        eprintln!("Failed to start benchmark match: {e}");
        return 1;
    }

    let roster = TemplateRoster::base();
    let mut left = ScriptedDriver::new(
        Side::Friendly,
        vec!["knight".into(), "archer".into(), "wizard".into()],
        10,
    );
    let mut right = ScriptedDriver::new(
        Side::Opponent,
        vec!["archer".into(), "giant".into()],
        10,
    );

    // Warmup to populate the field
    for _ in 0..100 {
        let _ = left.act(&mut battle, &roster);
        let _ = right.act(&mut battle, &roster);
        battle.tick();
    }

    eprintln!("Running {ticks} ticks...");
    let start = Instant::now();
    for _ in 0..ticks {
        let _ = left.act(&mut battle, &roster);
        let _ = right.act(&mut battle, &roster);
        battle.tick();
    }
    let elapsed = start.elapsed();

    let tps = ticks as f64 / elapsed.as_secs_f64();
    eprintln!("Ticks: {ticks}");
    eprintln!("Duration: {:.3}s", elapsed.as_secs_f64());
    eprintln!("Ticks/second: {tps:.1}");
    eprintln!("State hash: {:016x}", battle.state_hash());
    0
}
