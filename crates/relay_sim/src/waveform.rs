//! Waveform recording for simulation output.
//!
//! The [`WaveformRecorder`] trait abstracts how recorded signal values
//! leave the kernel; [`VcdRecorder`] implements the IEEE 1364 Value Change
//! Dump text format with one VCD timestep per simulation cycle, viewable
//! in GTKWave, Surfer, or any other waveform viewer. Values are scalar
//! `0`/`1` — this simulator has no unknown or high-impedance states.

use std::collections::HashMap;
use std::io::Write;

use relay_ir::SigRef;

use crate::error::SimError;

/// Trait for recording per-cycle signal values.
///
/// The kernel registers every recorded signal before the first cycle, then
/// reports each signal's value once per cycle; implementations decide what
/// actually gets written.
pub trait WaveformRecorder {
    /// Opens a scope (hierarchy level) in the waveform.
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError>;

    /// Registers a signal under the current scope.
    fn register_signal(&mut self, sig: SigRef, name: &str) -> Result<(), SimError>;

    /// Closes the current scope.
    fn end_scope(&mut self) -> Result<(), SimError>;

    /// Reports a signal's value at the given cycle.
    fn record_change(&mut self, cycle: usize, sig: SigRef, value: bool) -> Result<(), SimError>;

    /// Finalizes the output (flush, trailer).
    fn finalize(&mut self) -> Result<(), SimError>;
}

/// VCD (Value Change Dump) recorder.
///
/// Emits a value only when it differs from the signal's previous value,
/// so a constant signal appears once. Identifier codes use printable
/// ASCII starting from `!` (0x21), multi-character past 93 signals.
pub struct VcdRecorder<W: Write> {
    writer: W,
    id_map: Vec<(SigRef, String)>,
    last_value: HashMap<SigRef, bool>,
    next_id: u32,
    header_written: bool,
    current_cycle: Option<usize>,
}

impl<W: Write> VcdRecorder<W> {
    /// Creates a recorder writing to the given output.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            id_map: Vec::new(),
            last_value: HashMap::new(),
            next_id: 0,
            header_written: false,
            current_cycle: None,
        }
    }

    fn write_header(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$version")?;
        writeln!(self.writer, "  Relay circuit simulator")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$comment")?;
        writeln!(self.writer, "  one timestep per clock cycle")?;
        writeln!(self.writer, "$end")?;
        writeln!(self.writer, "$timescale")?;
        writeln!(self.writer, "  1ns")?;
        writeln!(self.writer, "$end")?;
        Ok(())
    }

    /// Generates an identifier code from a sequential index.
    fn make_id_code(index: u32) -> String {
        let mut result = String::new();
        let mut idx = index;
        loop {
            let c = (b'!' + (idx % 94) as u8) as char;
            result.push(c);
            idx /= 94;
            if idx == 0 {
                break;
            }
            idx -= 1;
        }
        result
    }

    fn id_code(&self, sig: SigRef) -> Result<&str, SimError> {
        self.id_map
            .iter()
            .find(|(s, _)| *s == sig)
            .map(|(_, code)| code.as_str())
            .ok_or_else(|| {
                SimError::UnboundSignal(format!("unregistered VCD signal {sig:?}"))
            })
    }
}

impl<W: Write> WaveformRecorder for VcdRecorder<W> {
    fn begin_scope(&mut self, name: &str) -> Result<(), SimError> {
        if !self.header_written {
            self.write_header()?;
            self.header_written = true;
        }
        writeln!(self.writer, "$scope module {name} $end")?;
        Ok(())
    }

    fn register_signal(&mut self, sig: SigRef, name: &str) -> Result<(), SimError> {
        let code = Self::make_id_code(self.next_id);
        self.next_id += 1;
        writeln!(self.writer, "$var wire 1 {code} {name} $end")?;
        self.id_map.push((sig, code));
        Ok(())
    }

    fn end_scope(&mut self) -> Result<(), SimError> {
        writeln!(self.writer, "$upscope $end")?;
        Ok(())
    }

    fn record_change(&mut self, cycle: usize, sig: SigRef, value: bool) -> Result<(), SimError> {
        if self.last_value.get(&sig) == Some(&value) {
            return Ok(());
        }
        self.last_value.insert(sig, value);

        if !self.header_written {
            self.write_header()?;
            self.header_written = true;
        }

        if self.current_cycle != Some(cycle) {
            if self.current_cycle.is_none() {
                writeln!(self.writer, "$enddefinitions $end")?;
                writeln!(self.writer, "$dumpvars")?;
            }
            writeln!(self.writer, "#{cycle}")?;
            self.current_cycle = Some(cycle);
        }

        let code = self.id_code(sig)?.to_string();
        writeln!(self.writer, "{}{code}", if value { '1' } else { '0' })?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SimError> {
        if self.current_cycle.is_none() {
            if !self.header_written {
                self.write_header()?;
                self.header_written = true;
            }
            writeln!(self.writer, "$enddefinitions $end")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
