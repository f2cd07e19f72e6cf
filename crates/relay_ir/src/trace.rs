//! Per-cycle value sequences.

use crate::sigref::SigRef;
use serde::{Deserialize, Serialize};

/// An ordered sequence of boolean values for one signal, indexed by cycle.
///
/// Traces serve double duty: the circuit's input traces drive the
/// simulation, and the kernel records one output trace per declared output
/// and per latch. All input traces of a circuit must share one length — the
/// simulation length — which the kernel validates before running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    /// The signal this trace belongs to.
    pub signal: SigRef,
    /// The per-cycle values, index 0 first.
    pub values: Vec<bool>,
}

impl Trace {
    /// Creates a trace with the given values.
    pub fn new(signal: SigRef, values: Vec<bool>) -> Self {
        Self { signal, values }
    }

    /// Creates an empty trace ready to record into.
    pub fn empty(signal: SigRef) -> Self {
        Self {
            signal,
            values: Vec::new(),
        }
    }

    /// Returns the number of cycles covered.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the trace covers no cycles.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value at `cycle`, or `None` past the end.
    pub fn value_at(&self, cycle: usize) -> Option<bool> {
        self.values.get(cycle).copied()
    }

    /// Appends the value for the next cycle.
    pub fn push(&mut self, value: bool) {
        self.values.push(value);
    }

    /// Renders the values as a `0`/`1` string, one character per cycle.
    pub fn bits(&self) -> String {
        self.values.iter().map(|&v| if v { '1' } else { '0' }).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_common::Name;

    fn named(raw: u32) -> SigRef {
        SigRef::Named(Name::from_raw(raw))
    }

    #[test]
    fn len_and_value_at() {
        let t = Trace::new(named(0), vec![true, false, true]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.value_at(0), Some(true));
        assert_eq!(t.value_at(1), Some(false));
        assert_eq!(t.value_at(3), None);
    }

    #[test]
    fn empty_then_push() {
        let mut t = Trace::empty(named(1));
        assert!(t.is_empty());
        t.push(false);
        t.push(true);
        assert_eq!(t.len(), 2);
        assert_eq!(t.value_at(1), Some(true));
    }

    #[test]
    fn bits_rendering() {
        let t = Trace::new(named(0), vec![false, true, true, false]);
        assert_eq!(t.bits(), "0110");
    }

    #[test]
    fn bits_of_empty_trace() {
        let t = Trace::empty(named(0));
        assert_eq!(t.bits(), "");
    }

    #[test]
    fn serde_roundtrip() {
        let t = Trace::new(SigRef::LatchOut(Name::from_raw(4)), vec![false, false, true]);
        let json = serde_json::to_string(&t).unwrap();
        let back: Trace = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
