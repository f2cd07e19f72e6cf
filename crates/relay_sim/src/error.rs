//! Simulation error types.
//!
//! All errors that can occur while validating a circuit configuration or
//! executing a run are variants of [`SimError`]. Every one is fatal: the
//! engine reports the first failure and abandons the run; nothing is caught
//! or retried internally. Messages carry resolved signal and function names
//! so the caller can present them without a name table.

use std::io;

/// Errors that can occur during simulation setup or execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The circuit supplied no input traces at all.
    #[error("no input traces supplied")]
    NoInputTraces,

    /// An input trace's length disagrees with the simulation length.
    #[error("input trace for '{signal}' has length {actual}, expected {expected}")]
    TraceLengthMismatch {
        /// The signal whose trace has the wrong length.
        signal: String,
        /// The simulation length established by the first trace.
        expected: usize,
        /// The offending trace's actual length.
        actual: usize,
    },

    /// A declared input signal has no corresponding input trace.
    #[error("input signal '{0}' has no input trace")]
    MissingTrace(String),

    /// An input trace covers zero cycles.
    #[error("input trace for '{0}' is empty")]
    EmptyTrace(String),

    /// A function definition repeats a formal parameter name.
    #[error("duplicate parameter '{param}' in definition of '{function}'")]
    DuplicateParameter {
        /// The function whose parameter list is invalid.
        function: String,
        /// The repeated parameter name.
        param: String,
    },

    /// A signal reference has no binding in the current evaluation scope.
    #[error("signal '{0}' is not bound in the current scope")]
    UnboundSignal(String),

    /// A call expression names a function with no definition.
    #[error("call to undefined function '{0}'")]
    UndefinedFunction(String),

    /// A call supplies the wrong number of arguments.
    #[error("function '{function}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        /// The function being called.
        function: String,
        /// The definition's parameter count.
        expected: usize,
        /// The number of arguments supplied.
        actual: usize,
    },

    /// A cycle index exceeds a trace's length.
    ///
    /// Construction-time validation makes this unreachable from well-formed
    /// drivers; hitting it indicates a bug in the caller, not bad input.
    #[error("cycle {cycle} is out of range for trace '{signal}' (length {length})")]
    CycleOutOfRange {
        /// The trace's signal.
        signal: String,
        /// The requested cycle index.
        cycle: usize,
        /// The trace's length.
        length: usize,
    },

    /// Function applications nested deeper than the configured limit.
    #[error("function call depth exceeded the limit of {0}")]
    CallDepthExceeded(u32),

    /// An I/O error occurred while writing waveform data.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_traces_display() {
        let e = SimError::NoInputTraces;
        assert_eq!(e.to_string(), "no input traces supplied");
    }

    #[test]
    fn trace_length_mismatch_display() {
        let e = SimError::TraceLengthMismatch {
            signal: "B".into(),
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            e.to_string(),
            "input trace for 'B' has length 2, expected 3"
        );
    }

    #[test]
    fn missing_trace_display() {
        let e = SimError::MissingTrace("clk".into());
        assert_eq!(e.to_string(), "input signal 'clk' has no input trace");
    }

    #[test]
    fn empty_trace_display() {
        let e = SimError::EmptyTrace("A".into());
        assert_eq!(e.to_string(), "input trace for 'A' is empty");
    }

    #[test]
    fn duplicate_parameter_display() {
        let e = SimError::DuplicateParameter {
            function: "xor".into(),
            param: "X".into(),
        };
        assert_eq!(
            e.to_string(),
            "duplicate parameter 'X' in definition of 'xor'"
        );
    }

    #[test]
    fn unbound_signal_display() {
        let e = SimError::UnboundSignal("Q'".into());
        assert_eq!(e.to_string(), "signal 'Q'' is not bound in the current scope");
    }

    #[test]
    fn undefined_function_display() {
        let e = SimError::UndefinedFunction("mux".into());
        assert_eq!(e.to_string(), "call to undefined function 'mux'");
    }

    #[test]
    fn arity_mismatch_display() {
        let e = SimError::ArityMismatch {
            function: "xor".into(),
            expected: 2,
            actual: 3,
        };
        assert_eq!(
            e.to_string(),
            "function 'xor' expects 2 argument(s), got 3"
        );
    }

    #[test]
    fn cycle_out_of_range_display() {
        let e = SimError::CycleOutOfRange {
            signal: "A".into(),
            cycle: 5,
            length: 3,
        };
        assert_eq!(
            e.to_string(),
            "cycle 5 is out of range for trace 'A' (length 3)"
        );
    }

    #[test]
    fn call_depth_exceeded_display() {
        let e = SimError::CallDepthExceeded(64);
        assert_eq!(
            e.to_string(),
            "function call depth exceeded the limit of 64"
        );
    }

    #[test]
    fn waveform_io_display() {
        let e = SimError::WaveformIo(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(e.to_string().starts_with("waveform I/O error:"));
    }
}
