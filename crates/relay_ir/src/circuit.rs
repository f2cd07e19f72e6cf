//! The aggregate circuit description.

use crate::def::Definition;
use crate::sigref::SigRef;
use crate::trace::Trace;
use crate::update::Update;
use relay_common::Name;
use serde::{Deserialize, Serialize};

/// A complete synchronous circuit, ready to simulate.
///
/// Holds the signal classification (inputs, outputs, latches), the function
/// definitions, the ordered update list, and the input traces that drive
/// the run. A `Circuit` is pure data: configuration validation (non-empty
/// traces, matching lengths, every input covered) happens when the
/// simulation kernel is constructed over it, before any cycle executes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    /// The circuit name.
    pub name: Name,
    /// Declared input signals, driven from input traces each cycle.
    pub inputs: Vec<Name>,
    /// Declared output signals, recorded each cycle.
    pub outputs: Vec<Name>,
    /// Declared latches; each contributes a registered output signal.
    pub latches: Vec<Name>,
    /// User-defined functions, resolvable from any expression.
    pub definitions: Vec<Definition>,
    /// Combinational updates, evaluated in declaration order every cycle.
    pub updates: Vec<Update>,
    /// The input traces; all must share one length, the simulation length.
    pub input_traces: Vec<Trace>,
}

impl Circuit {
    /// Returns the simulation length: the length of the first input trace.
    ///
    /// `None` when no input traces are present. Whether the remaining
    /// traces agree is the kernel's construction-time check.
    pub fn sim_length(&self) -> Option<usize> {
        self.input_traces.first().map(Trace::len)
    }

    /// Finds the input trace for the given signal name, if one was supplied.
    pub fn input_trace(&self, name: Name) -> Option<&Trace> {
        self.input_traces
            .iter()
            .find(|t| t.signal == SigRef::Named(name))
    }
}
