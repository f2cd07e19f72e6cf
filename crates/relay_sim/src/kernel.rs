//! The cycle-driven simulation kernel.
//!
//! [`SimKernel`] owns the one long-lived environment of a run and walks the
//! explicit state machine `Uninitialized → Cycle(0) → … → Cycle(L-1) →
//! Done`, where `L` is the common input-trace length. Each cycle proceeds
//! in a fixed order: input binding, latch-output capture, combinational
//! updates in declaration order, output recording. The latch capture runs
//! *before* the updates, which is what gives a latch its one-cycle delay —
//! the registered output always reflects the value its input held at the
//! end of the previous cycle.
//!
//! Configuration problems (missing or mismatched traces, bad definitions)
//! are rejected at construction, before any cycle executes. Once running,
//! the first error aborts the run; there is no partial simulation.

use relay_common::{Name, NameTable};
use relay_ir::{Circuit, SigRef, Trace};

use crate::env::{DefIndex, Env};
use crate::error::SimError;
use crate::evaluator::{eval_expr, EvalContext, DEFAULT_MAX_CALL_DEPTH};
use crate::waveform::WaveformRecorder;

/// Where the kernel is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelState {
    /// Constructed and validated; no cycle has executed.
    Uninitialized,
    /// The given cycle has completed and its outputs are recorded.
    Cycle(usize),
    /// All cycles have completed; output traces are final.
    Done,
}

/// The result of one [`SimKernel::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// A cycle executed; more may remain.
    Advanced,
    /// The run is complete; stepping further has no effect.
    Done,
}

/// The outcome of a completed run.
#[derive(Debug, Clone)]
pub struct SimResult {
    /// The number of cycles simulated.
    pub cycles: usize,
    /// One recorded trace per declared output and per latch output,
    /// each of length `cycles`.
    pub traces: Vec<Trace>,
    /// The final environment: every signal binding as of the last cycle,
    /// sorted by display name.
    pub bindings: Vec<(SigRef, bool)>,
}

/// The simulation kernel for one circuit run.
///
/// Construct with [`SimKernel::new`], optionally attach a waveform
/// recorder or pre-seed signal values, then either call
/// [`run_to_completion`](SimKernel::run_to_completion) or drive the run
/// manually with [`step`](SimKernel::step). Re-running requires a fresh
/// kernel; `Done` is terminal.
pub struct SimKernel<'a> {
    circuit: &'a Circuit,
    names: &'a NameTable,
    defs: DefIndex<'a>,
    env: Env,
    state: KernelState,
    sim_length: usize,
    traces: Vec<Trace>,
    recorder: Option<Box<dyn WaveformRecorder>>,
    max_call_depth: u32,
}

impl std::fmt::Debug for SimKernel<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimKernel")
            .field("state", &self.state)
            .field("sim_length", &self.sim_length)
            .field("max_call_depth", &self.max_call_depth)
            .field("has_recorder", &self.recorder.is_some())
            .finish_non_exhaustive()
    }
}

impl<'a> SimKernel<'a> {
    /// Creates a kernel over a circuit, validating its configuration.
    ///
    /// Fails — performing no simulation — on an empty input-trace list, an
    /// empty or length-mismatched trace, a declared input with no trace,
    /// or a definition with duplicate parameters.
    pub fn new(circuit: &'a Circuit, names: &'a NameTable) -> Result<Self, SimError> {
        if circuit.input_traces.is_empty() {
            return Err(SimError::NoInputTraces);
        }

        let sim_length = circuit.input_traces[0].len();
        for trace in &circuit.input_traces {
            if trace.is_empty() {
                return Err(SimError::EmptyTrace(trace.signal.display(names)));
            }
            if trace.len() != sim_length {
                return Err(SimError::TraceLengthMismatch {
                    signal: trace.signal.display(names),
                    expected: sim_length,
                    actual: trace.len(),
                });
            }
        }

        for &input in &circuit.inputs {
            if circuit.input_trace(input).is_none() {
                return Err(SimError::MissingTrace(names.resolve(input).to_string()));
            }
        }

        for def in &circuit.definitions {
            let mut seen = std::collections::HashSet::new();
            for &param in &def.params {
                if !seen.insert(param) {
                    return Err(SimError::DuplicateParameter {
                        function: names.resolve(def.name).to_string(),
                        param: names.resolve(param).to_string(),
                    });
                }
            }
        }

        let mut traces = Vec::with_capacity(circuit.outputs.len() + circuit.latches.len());
        for &output in &circuit.outputs {
            traces.push(Trace::empty(SigRef::Named(output)));
        }
        for &latch in &circuit.latches {
            traces.push(Trace::empty(SigRef::LatchOut(latch)));
        }

        Ok(Self {
            circuit,
            names,
            defs: DefIndex::build(&circuit.definitions),
            env: Env::new(),
            state: KernelState::Uninitialized,
            sim_length,
            traces,
            recorder: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        })
    }

    /// Returns the kernel's position in the run.
    pub fn state(&self) -> KernelState {
        self.state
    }

    /// Returns the simulation length in cycles.
    pub fn sim_length(&self) -> usize {
        self.sim_length
    }

    /// Returns the most recently completed cycle, if any.
    pub fn current_cycle(&self) -> Option<usize> {
        match self.state {
            KernelState::Uninitialized => None,
            KernelState::Cycle(i) => Some(i),
            KernelState::Done => Some(self.sim_length - 1),
        }
    }

    /// Overrides the bound on nested function applications.
    pub fn set_max_call_depth(&mut self, depth: u32) {
        self.max_call_depth = depth;
    }

    /// Attaches a waveform recorder.
    ///
    /// Must be attached before the first cycle so that every recorded
    /// signal is registered in the waveform header.
    pub fn set_recorder(&mut self, recorder: Box<dyn WaveformRecorder>) {
        self.recorder = Some(recorder);
    }

    /// Pre-seeds a signal value before the run starts.
    ///
    /// Only meaningful while the kernel is `Uninitialized`; once the run
    /// has started the call has no effect, by contract.
    pub fn preset(&mut self, name: Name, value: bool) {
        if self.state == KernelState::Uninitialized {
            self.env.bind(SigRef::Named(name), value);
        }
    }

    /// Returns the current binding of a signal, if any.
    pub fn signal_value(&self, sig: SigRef) -> Option<bool> {
        self.env.lookup(sig)
    }

    /// Resolves a display name to a signal reference.
    ///
    /// A trailing `'` denotes a latch's registered output: `"D'"` resolves
    /// to the latch output of `D`.
    pub fn find_signal(&self, name: &str) -> Option<SigRef> {
        match name.strip_suffix('\'') {
            Some(base) => self.names.get(base).map(SigRef::LatchOut),
            None => self.names.get(name).map(SigRef::Named),
        }
    }

    /// Returns a view of the long-lived environment.
    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Returns the output traces recorded so far.
    pub fn output_traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Executes the `Uninitialized → Cycle(0)` transition.
    ///
    /// Binds every trace's cycle-0 value, default-binds unbound latch
    /// inputs to `false`, resets every latch output to `false`, evaluates
    /// the updates in declaration order, and records cycle 0. A no-op if
    /// the run has already started.
    pub fn initialize(&mut self) -> Result<(), SimError> {
        if self.state != KernelState::Uninitialized {
            return Ok(());
        }

        self.register_waveform_signals()?;

        let circuit = self.circuit;
        let names = self.names;

        for trace in &circuit.input_traces {
            let value = trace
                .value_at(0)
                .ok_or_else(|| SimError::EmptyTrace(trace.signal.display(names)))?;
            self.env.bind(trace.signal, value);
        }

        // A latch that is also a driven input already has a binding here.
        for &latch in &circuit.latches {
            if !self.env.has_binding(SigRef::Named(latch)) {
                self.env.bind(SigRef::Named(latch), false);
            }
        }

        // Latch reset: registered outputs start false regardless of input.
        for &latch in &circuit.latches {
            self.env.bind(SigRef::LatchOut(latch), false);
        }

        self.run_updates()?;
        self.record_cycle(0)?;
        self.state = KernelState::Cycle(0);
        Ok(())
    }

    /// Advances the run by one cycle.
    ///
    /// From `Uninitialized` this performs [`initialize`](Self::initialize);
    /// from the final cycle it transitions to `Done` and finalizes any
    /// attached recorder; from `Done` it is a no-op.
    pub fn step(&mut self) -> Result<StepResult, SimError> {
        let cycle = match self.state {
            KernelState::Uninitialized => {
                self.initialize()?;
                return Ok(StepResult::Advanced);
            }
            KernelState::Cycle(i) if i + 1 < self.sim_length => i + 1,
            KernelState::Cycle(_) => {
                self.finish()?;
                return Ok(StepResult::Done);
            }
            KernelState::Done => return Ok(StepResult::Done),
        };

        let circuit = self.circuit;
        let names = self.names;

        for trace in &circuit.input_traces {
            let value = trace
                .value_at(cycle)
                .ok_or_else(|| SimError::CycleOutOfRange {
                    signal: trace.signal.display(names),
                    cycle,
                    length: trace.len(),
                })?;
            self.env.bind(trace.signal, value);
        }

        // Capture each latch input as it stood at the end of the previous
        // cycle, before this cycle's updates can overwrite it.
        for &latch in &circuit.latches {
            let value = self
                .env
                .lookup(SigRef::Named(latch))
                .ok_or_else(|| SimError::UnboundSignal(names.resolve(latch).to_string()))?;
            self.env.bind(SigRef::LatchOut(latch), value);
        }

        self.run_updates()?;
        self.record_cycle(cycle)?;
        self.state = KernelState::Cycle(cycle);
        Ok(StepResult::Advanced)
    }

    /// Runs initialization and every remaining cycle, returning the result.
    pub fn run_to_completion(&mut self) -> Result<SimResult, SimError> {
        while self.step()? == StepResult::Advanced {}
        Ok(self.result())
    }

    /// Builds the run result from the recorded traces and final bindings.
    fn result(&self) -> SimResult {
        let mut bindings: Vec<(SigRef, bool)> = self.env.bindings().collect();
        bindings.sort_by_cached_key(|(sig, _)| sig.display(self.names));
        SimResult {
            cycles: self.sim_length,
            traces: self.traces.clone(),
            bindings,
        }
    }

    /// Evaluates every update in declaration order.
    ///
    /// Order is the contract: an update may read a signal written by an
    /// earlier update in the same pass, and reading a later-declared
    /// target observes the previous cycle's binding. No dependency
    /// analysis or reordering is performed.
    fn run_updates(&mut self) -> Result<(), SimError> {
        let circuit = self.circuit;
        for update in &circuit.updates {
            let ctx = EvalContext {
                names: self.names,
                defs: &self.defs,
                max_call_depth: self.max_call_depth,
            };
            let value = eval_expr(&ctx, &self.env, &update.expr)?;
            self.env.bind(SigRef::Named(update.target), value);
        }
        Ok(())
    }

    /// Records the current value of every output and latch output.
    fn record_cycle(&mut self, cycle: usize) -> Result<(), SimError> {
        let names = self.names;
        for trace in &mut self.traces {
            let value = self
                .env
                .lookup(trace.signal)
                .ok_or_else(|| SimError::UnboundSignal(trace.signal.display(names)))?;
            trace.push(value);
            if let Some(recorder) = self.recorder.as_deref_mut() {
                recorder.record_change(cycle, trace.signal, value)?;
            }
        }
        Ok(())
    }

    /// Writes the waveform header, if a recorder is attached: one scope
    /// named after the circuit, containing every recorded signal.
    fn register_waveform_signals(&mut self) -> Result<(), SimError> {
        let names = self.names;
        let scope = names.resolve(self.circuit.name).to_string();
        if let Some(recorder) = self.recorder.as_deref_mut() {
            recorder.begin_scope(&scope)?;
            for trace in &self.traces {
                recorder.register_signal(trace.signal, &trace.signal.display(names))?;
            }
            recorder.end_scope()?;
        }
        Ok(())
    }

    /// Transitions to `Done` and finalizes the recorder.
    fn finish(&mut self) -> Result<(), SimError> {
        self.state = KernelState::Done;
        if let Some(mut recorder) = self.recorder.take() {
            recorder.finalize()?;
        }
        Ok(())
    }
}
