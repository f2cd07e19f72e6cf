//! Relay CLI — the command-line interface for the Relay circuit simulator.
//!
//! Provides `relay run` to simulate a circuit and print its recorded
//! traces, and `relay check` to validate a circuit description without
//! running it. Circuit descriptions are JSON netlists; an optional
//! `relay.toml` supplies defaults for the circuit path and simulation
//! options.

#![warn(missing_docs)]

mod check;
mod netlist;
mod run;

use std::process;

use clap::{Parser, Subcommand};

/// Relay — a synchronous boolean circuit simulator.
#[derive(Parser, Debug)]
#[command(name = "relay", version, about = "Relay circuit simulator")]
pub struct Cli {
    /// Suppress all output except results and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print the environment after every simulated cycle.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `relay.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate a circuit and print its recorded traces.
    Run(RunArgs),
    /// Validate a circuit description without simulating.
    Check(CheckArgs),
}

/// Arguments for the `relay run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Circuit netlist file. Defaults to the circuit named in `relay.toml`.
    pub circuit: Option<String>,

    /// Output path for a VCD waveform file.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Disable waveform recording even if configured in `relay.toml`.
    #[arg(long)]
    pub no_waveform: bool,
}

/// Arguments for the `relay check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Circuit netlist file. Defaults to the circuit named in `relay.toml`.
    pub circuit: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-result output.
    pub quiet: bool,
    /// Whether to print per-cycle environments.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
