//! `relay check` — validate a circuit description without simulating.
//!
//! Loads and lowers the netlist, then constructs the simulation kernel,
//! which performs every configuration check (trace coverage and lengths,
//! definition parameter lists) without executing a cycle.

use relay_common::NameTable;
use relay_sim::SimKernel;

use crate::netlist;
use crate::run::resolve_project;
use crate::{CheckArgs, GlobalArgs};

/// Runs the `relay check` command.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = resolve_project(args.circuit.as_deref(), global)?;

    let names = NameTable::new();
    let circuit = netlist::load_circuit(&project.circuit_path, &names)?;
    let kernel = SimKernel::new(&circuit, &names)?;

    println!(
        "ok: {} ({} cycles, {} inputs, {} outputs, {} latches, {} updates)",
        names.resolve(circuit.name),
        kernel.sim_length(),
        circuit.inputs.len(),
        circuit.outputs.len(),
        circuit.latches.len(),
        circuit.updates.len(),
    );

    Ok(0)
}
