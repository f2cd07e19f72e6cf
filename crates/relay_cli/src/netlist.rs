//! JSON circuit description loading.
//!
//! A netlist file is the serialized form of everything the engine needs:
//! signal classification, function definitions, updates, and input traces
//! as `0`/`1` strings. Deserialization goes through serde; this module
//! then lowers the string-keyed file shapes into `relay_ir` types,
//! interning every name into the session's [`NameTable`].
//!
//! In expressions, a trailing `'` references a latch's registered output
//! (`"D'"` reads latch `D`'s output). Declared names — inputs, outputs,
//! latches, parameters, update targets, trace keys — must not contain the
//! marker at all; it is reserved so rendered latch outputs can never
//! collide with a user name.

use std::collections::BTreeMap;
use std::path::Path;

use relay_common::{Name, NameTable};
use relay_ir::sigref::LATCH_OUT_MARKER;
use relay_ir::{Circuit, Definition, Expr, SigRef, Trace, Update};
use serde::Deserialize;

/// Errors that can occur while loading a netlist file.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// An I/O error occurred while reading the file.
    #[error("failed to read netlist: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON content could not be deserialized.
    #[error("failed to parse netlist: {0}")]
    Parse(#[from] serde_json::Error),

    /// A declared name contains the reserved latch-output marker.
    #[error("invalid name '{0}': the latch-output marker is reserved")]
    ReservedMarker(String),

    /// A trace string contains a character other than `0` or `1`.
    #[error("invalid trace character '{ch}' for signal '{signal}' (expected 0 or 1)")]
    BadTraceBit {
        /// The trace's signal name.
        signal: String,
        /// The offending character.
        ch: char,
    },
}

/// The top-level netlist file shape.
#[derive(Debug, Deserialize)]
pub struct CircuitFile {
    /// The circuit name.
    pub name: String,
    /// Declared input signal names.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Declared output signal names.
    #[serde(default)]
    pub outputs: Vec<String>,
    /// Declared latch names.
    #[serde(default)]
    pub latches: Vec<String>,
    /// User-defined functions.
    #[serde(default)]
    pub functions: Vec<FunctionFile>,
    /// Combinational updates, in evaluation order.
    #[serde(default)]
    pub updates: Vec<UpdateFile>,
    /// Input traces: signal name to `0`/`1` string, one character per cycle.
    #[serde(default)]
    pub traces: BTreeMap<String, String>,
}

/// A user-defined function in the netlist file.
#[derive(Debug, Deserialize)]
pub struct FunctionFile {
    /// The function name.
    pub name: String,
    /// The ordered formal parameter names.
    #[serde(default)]
    pub params: Vec<String>,
    /// The function body.
    pub body: ExprFile,
}

/// An update statement in the netlist file.
#[derive(Debug, Deserialize)]
pub struct UpdateFile {
    /// The target signal name.
    pub target: String,
    /// The expression assigned to the target.
    pub expr: ExprFile,
}

/// The serialized expression encoding (externally tagged).
///
/// `{"signal": "A"}`, `{"and": [lhs, rhs]}`, `{"or": [lhs, rhs]}`,
/// `{"not": operand}`, `{"call": {"func": "xor", "args": […]}}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExprFile {
    /// A signal reference; a trailing `'` selects a latch output.
    Signal(String),
    /// Conjunction.
    And(Box<ExprFile>, Box<ExprFile>),
    /// Disjunction.
    Or(Box<ExprFile>, Box<ExprFile>),
    /// Negation.
    Not(Box<ExprFile>),
    /// Function application.
    Call {
        /// The function name.
        func: String,
        /// The argument expressions.
        args: Vec<ExprFile>,
    },
}

/// Reads and lowers a netlist file into a [`Circuit`].
pub fn load_circuit(path: &Path, names: &NameTable) -> Result<Circuit, NetlistError> {
    let content = std::fs::read_to_string(path)?;
    parse_circuit(&content, names)
}

/// Parses and lowers a netlist from a JSON string.
pub fn parse_circuit(json: &str, names: &NameTable) -> Result<Circuit, NetlistError> {
    let file: CircuitFile = serde_json::from_str(json)?;
    lower_circuit(file, names)
}

fn lower_circuit(file: CircuitFile, names: &NameTable) -> Result<Circuit, NetlistError> {
    let mut definitions = Vec::with_capacity(file.functions.len());
    for function in file.functions {
        let params = function
            .params
            .iter()
            .map(|p| declared_name(p, names))
            .collect::<Result<Vec<_>, _>>()?;
        definitions.push(Definition {
            name: declared_name(&function.name, names)?,
            params,
            body: lower_expr(function.body, names)?,
        });
    }

    let mut updates = Vec::with_capacity(file.updates.len());
    for update in file.updates {
        updates.push(Update {
            target: declared_name(&update.target, names)?,
            expr: lower_expr(update.expr, names)?,
        });
    }

    let mut input_traces = Vec::with_capacity(file.traces.len());
    for (signal, bits) in &file.traces {
        let name = declared_name(signal, names)?;
        input_traces.push(Trace::new(SigRef::Named(name), parse_bits(signal, bits)?));
    }

    Ok(Circuit {
        name: names.intern(&file.name),
        inputs: lower_names(&file.inputs, names)?,
        outputs: lower_names(&file.outputs, names)?,
        latches: lower_names(&file.latches, names)?,
        definitions,
        updates,
        input_traces,
    })
}

fn lower_names(raw: &[String], names: &NameTable) -> Result<Vec<Name>, NetlistError> {
    raw.iter().map(|s| declared_name(s, names)).collect()
}

/// Interns a declared name, rejecting the reserved marker anywhere in it.
fn declared_name(s: &str, names: &NameTable) -> Result<Name, NetlistError> {
    if s.contains(LATCH_OUT_MARKER) {
        return Err(NetlistError::ReservedMarker(s.to_string()));
    }
    Ok(names.intern(s))
}

/// Lowers a signal reference occurring in an expression.
///
/// Unlike declared names, a single trailing marker is meaningful here: it
/// selects the latch output of the base name.
fn expr_sig(s: &str, names: &NameTable) -> Result<SigRef, NetlistError> {
    match s.strip_suffix(LATCH_OUT_MARKER) {
        Some(base) if !base.contains(LATCH_OUT_MARKER) && !base.is_empty() => {
            Ok(SigRef::LatchOut(names.intern(base)))
        }
        Some(_) => Err(NetlistError::ReservedMarker(s.to_string())),
        None if s.contains(LATCH_OUT_MARKER) => Err(NetlistError::ReservedMarker(s.to_string())),
        None => Ok(SigRef::Named(names.intern(s))),
    }
}

fn lower_expr(expr: ExprFile, names: &NameTable) -> Result<Expr, NetlistError> {
    Ok(match expr {
        ExprFile::Signal(s) => Expr::Signal(expr_sig(&s, names)?),
        ExprFile::And(lhs, rhs) => {
            Expr::and(lower_expr(*lhs, names)?, lower_expr(*rhs, names)?)
        }
        ExprFile::Or(lhs, rhs) => Expr::or(lower_expr(*lhs, names)?, lower_expr(*rhs, names)?),
        ExprFile::Not(operand) => Expr::not(lower_expr(*operand, names)?),
        ExprFile::Call { func, args } => {
            let lowered = args
                .into_iter()
                .map(|a| lower_expr(a, names))
                .collect::<Result<Vec<_>, _>>()?;
            Expr::call(declared_name(&func, names)?, lowered)
        }
    })
}

fn parse_bits(signal: &str, bits: &str) -> Result<Vec<bool>, NetlistError> {
    bits.chars()
        .map(|ch| match ch {
            '0' => Ok(false),
            '1' => Ok(true),
            _ => Err(NetlistError::BadTraceBit {
                signal: signal.to_string(),
                ch,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"{
        "name": "example",
        "inputs": ["A", "B"],
        "outputs": ["C"],
        "latches": ["D"],
        "functions": [
            { "name": "xor", "params": ["X", "Y"],
              "body": { "or": [
                  { "and": [ { "signal": "X" }, { "not": { "signal": "Y" } } ] },
                  { "and": [ { "not": { "signal": "X" } }, { "signal": "Y" } ] }
              ] } }
        ],
        "updates": [
            { "target": "C", "expr": { "call": { "func": "xor",
                "args": [ { "signal": "A" }, { "signal": "B" } ] } } },
            { "target": "D", "expr": { "or": [ { "signal": "C" }, { "signal": "D'" } ] } }
        ],
        "traces": { "A": "101", "B": "011" }
    }"#;

    #[test]
    fn parse_example_netlist() {
        let names = NameTable::new();
        let circuit = parse_circuit(EXAMPLE, &names).unwrap();

        assert_eq!(names.resolve(circuit.name), "example");
        assert_eq!(circuit.inputs.len(), 2);
        assert_eq!(circuit.outputs.len(), 1);
        assert_eq!(circuit.latches.len(), 1);
        assert_eq!(circuit.definitions.len(), 1);
        assert_eq!(circuit.definitions[0].arity(), 2);
        assert_eq!(circuit.updates.len(), 2);
        assert_eq!(circuit.sim_length(), Some(3));
    }

    #[test]
    fn trace_bits_lower_to_bools() {
        let names = NameTable::new();
        let circuit = parse_circuit(EXAMPLE, &names).unwrap();
        let a = names.get("A").unwrap();
        assert_eq!(circuit.input_trace(a).unwrap().values, vec![true, false, true]);
    }

    #[test]
    fn latch_marker_in_expression_selects_latch_out() {
        let names = NameTable::new();
        let circuit = parse_circuit(EXAMPLE, &names).unwrap();
        let d = names.get("D").unwrap();
        match &circuit.updates[1].expr {
            Expr::Or { rhs, .. } => {
                assert_eq!(**rhs, Expr::Signal(SigRef::LatchOut(d)));
            }
            other => panic!("expected Or, got {other:?}"),
        }
    }

    #[test]
    fn reserved_marker_in_declared_name_rejected() {
        let names = NameTable::new();
        let err = parse_circuit(
            r#"{ "name": "bad", "inputs": ["A'"], "traces": { "A'": "1" } }"#,
            &names,
        )
        .unwrap_err();
        assert!(matches!(err, NetlistError::ReservedMarker(name) if name == "A'"));
    }

    #[test]
    fn reserved_marker_in_update_target_rejected() {
        let names = NameTable::new();
        let err = parse_circuit(
            r#"{ "name": "bad",
                 "updates": [ { "target": "D'", "expr": { "signal": "A" } } ] }"#,
            &names,
        )
        .unwrap_err();
        assert!(matches!(err, NetlistError::ReservedMarker(_)));
    }

    #[test]
    fn doubled_marker_in_expression_rejected() {
        let names = NameTable::new();
        let err = parse_circuit(
            r#"{ "name": "bad",
                 "updates": [ { "target": "C", "expr": { "signal": "D''" } } ] }"#,
            &names,
        )
        .unwrap_err();
        assert!(matches!(err, NetlistError::ReservedMarker(_)));
    }

    #[test]
    fn bad_trace_character_rejected() {
        let names = NameTable::new();
        let err = parse_circuit(
            r#"{ "name": "bad", "traces": { "A": "01x" } }"#,
            &names,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetlistError::BadTraceBit { signal, ch: 'x' } if signal == "A"
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        let names = NameTable::new();
        let err = parse_circuit("{ not json", &names).unwrap_err();
        assert!(matches!(err, NetlistError::Parse(_)));
    }

    #[test]
    fn sections_default_to_empty() {
        let names = NameTable::new();
        let circuit = parse_circuit(r#"{ "name": "empty" }"#, &names).unwrap();
        assert!(circuit.inputs.is_empty());
        assert!(circuit.updates.is_empty());
        assert!(circuit.input_traces.is_empty());
    }

    #[test]
    fn loaded_circuit_simulates() {
        // The example is runnable end to end: C = xor(A, B).
        let names = NameTable::new();
        let circuit = parse_circuit(EXAMPLE, &names).unwrap();
        let result =
            relay_sim::simulate(&circuit, &names, &relay_sim::SimConfig::default()).unwrap();
        let c = result
            .traces
            .iter()
            .find(|t| t.signal.display(&names) == "C")
            .unwrap();
        assert_eq!(c.bits(), "110");
    }
}
