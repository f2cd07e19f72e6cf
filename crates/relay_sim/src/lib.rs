//! Cycle-driven evaluation engine for the Relay circuit simulator.
//!
//! This crate takes a fully built [`relay_ir::Circuit`] — signal
//! classification, function definitions, update list, input traces — and
//! executes it cycle by cycle, producing one recorded trace per declared
//! output and per latch. Loading circuit descriptions and rendering the
//! results are the caller's concern.
//!
//! # Architecture
//!
//! The [`SimKernel`] owns the single long-lived [`Env`] of a run and
//! drives the state machine `Uninitialized → Cycle(0) → … → Cycle(L-1) →
//! Done`. Expressions are pure data evaluated strictly against the
//! environment; user-defined functions evaluate their arguments in the
//! caller's scope and their body in a fresh scope holding only the
//! parameter bindings. Latch outputs are captured before each cycle's
//! updates run, giving them their one-cycle delay.
//!
//! # Usage
//!
//! ```ignore
//! use relay_sim::{simulate, SimConfig};
//!
//! let result = simulate(&circuit, &names, &SimConfig::default())?;
//! for trace in &result.traces {
//!     println!("{} = {}", trace.signal.display(&names), trace.bits());
//! }
//! ```
//!
//! # Modules
//!
//! - `error` — the fatal error taxonomy
//! - `env` — signal bindings and the definitions index
//! - `evaluator` — strict boolean expression evaluation
//! - `kernel` — the cycle driver and run results
//! - `waveform` — VCD recording of output traces

#![warn(missing_docs)]

pub mod env;
pub mod error;
pub mod evaluator;
pub mod kernel;
pub mod waveform;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use relay_common::NameTable;
use relay_ir::Circuit;

pub use env::{DefIndex, Env};
pub use error::SimError;
pub use evaluator::{eval_expr, EvalContext, DEFAULT_MAX_CALL_DEPTH};
pub use kernel::{KernelState, SimKernel, SimResult, StepResult};
pub use waveform::{VcdRecorder, WaveformRecorder};

/// Configuration for a simulation run.
#[derive(Debug, Clone, Default)]
pub struct SimConfig {
    /// Override for the bound on nested function applications.
    /// `None` uses [`DEFAULT_MAX_CALL_DEPTH`].
    pub max_call_depth: Option<u32>,
    /// Optional path for VCD waveform output.
    pub waveform_path: Option<PathBuf>,
    /// Whether to record a waveform. Ignored if `waveform_path` is `None`.
    pub record_waveform: bool,
}

/// High-level entry point: runs a circuit to completion.
///
/// Creates a [`SimKernel`], optionally attaches a VCD recorder, and
/// executes every cycle. The `names` table must be the one the circuit's
/// identifiers were interned into; it is used for error messages and
/// waveform signal names.
pub fn simulate(
    circuit: &Circuit,
    names: &NameTable,
    config: &SimConfig,
) -> Result<SimResult, SimError> {
    let mut kernel = SimKernel::new(circuit, names)?;

    if let Some(depth) = config.max_call_depth {
        kernel.set_max_call_depth(depth);
    }

    if config.record_waveform {
        if let Some(path) = &config.waveform_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            kernel.set_recorder(Box::new(VcdRecorder::new(writer)));
        }
    }

    kernel.run_to_completion()
}
