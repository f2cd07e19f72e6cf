//! `relay run` — simulate a circuit and print its recorded traces.
//!
//! Resolves the circuit file (explicit argument or `relay.toml`), loads
//! and lowers the netlist, runs the simulation to completion, and prints
//! one line per recorded trace. Under `--verbose` the kernel is stepped
//! manually and the full environment is printed after every cycle.

use std::path::{Path, PathBuf};

use relay_common::NameTable;
use relay_ir::Circuit;
use relay_sim::{SimConfig, SimKernel, SimResult, StepResult, VcdRecorder};

use crate::netlist;
use crate::{GlobalArgs, RunArgs};

/// The resolved inputs of one invocation: where the circuit lives and the
/// simulation settings contributed by `relay.toml`, if present.
pub(crate) struct Project {
    /// Path to the circuit netlist file.
    pub circuit_path: PathBuf,
    /// Call-depth override from the config file.
    pub max_call_depth: Option<u32>,
    /// Waveform output path from the config file.
    pub waveform: Option<PathBuf>,
}

/// Runs the `relay run` command.
///
/// Returns exit code 0 on success; any failure propagates as an error and
/// is mapped to exit code 1 by `main`.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = resolve_project(args.circuit.as_deref(), global)?;

    let names = NameTable::new();
    let circuit = netlist::load_circuit(&project.circuit_path, &names)?;

    if !global.quiet {
        eprintln!("   Simulating {}", names.resolve(circuit.name));
    }

    let waveform_path = if args.no_waveform {
        None
    } else {
        args.output.as_ref().map(PathBuf::from).or(project.waveform)
    };

    let sim_config = SimConfig {
        max_call_depth: project.max_call_depth,
        record_waveform: waveform_path.is_some(),
        waveform_path,
    };

    let result = if global.verbose {
        run_stepwise(&circuit, &names, &sim_config)?
    } else {
        relay_sim::simulate(&circuit, &names, &sim_config)?
    };

    print_traces(&result, &names);

    if !global.quiet {
        eprintln!("   Simulation finished: {} cycle(s)", result.cycles);
        if let Some(path) = &sim_config.waveform_path {
            eprintln!("   Waveform: {}", path.display());
        }
    }

    Ok(0)
}

/// Resolves the circuit path and config-file settings for one invocation.
///
/// Precedence: an explicit `--config` file is always honored; otherwise a
/// `relay.toml` next to the circuit file (or in the working directory when
/// no circuit argument was given) supplies defaults. The circuit argument
/// always wins over the config's `project.circuit`.
pub(crate) fn resolve_project(
    circuit_arg: Option<&str>,
    global: &GlobalArgs,
) -> Result<Project, Box<dyn std::error::Error>> {
    if let Some(config_path) = &global.config {
        let content = std::fs::read_to_string(config_path)?;
        let config = relay_config::load_config_from_str(&content)?;
        let base = Path::new(config_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let circuit_path = match circuit_arg {
            Some(c) => PathBuf::from(c),
            None => base.join(&config.project.circuit),
        };
        return Ok(Project {
            circuit_path,
            max_call_depth: config.simulation.max_call_depth,
            waveform: config.simulation.waveform.map(|w| base.join(w)),
        });
    }

    if let Some(circuit) = circuit_arg {
        let circuit_path = PathBuf::from(circuit);
        let dir = circuit_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        if dir.join("relay.toml").is_file() {
            let config = relay_config::load_config(&dir)?;
            return Ok(Project {
                circuit_path,
                max_call_depth: config.simulation.max_call_depth,
                waveform: config.simulation.waveform.map(|w| dir.join(w)),
            });
        }
        return Ok(Project {
            circuit_path,
            max_call_depth: None,
            waveform: None,
        });
    }

    let cwd = Path::new(".");
    if cwd.join("relay.toml").is_file() {
        let config = relay_config::load_config(cwd)?;
        return Ok(Project {
            circuit_path: cwd.join(&config.project.circuit),
            max_call_depth: config.simulation.max_call_depth,
            waveform: config.simulation.waveform.map(|w| cwd.join(w)),
        });
    }

    Err("no circuit file specified and no relay.toml found".into())
}

/// Steps the kernel one cycle at a time, dumping the environment after
/// each, then returns the completed run's result.
fn run_stepwise(
    circuit: &Circuit,
    names: &NameTable,
    config: &SimConfig,
) -> Result<SimResult, Box<dyn std::error::Error>> {
    let mut kernel = SimKernel::new(circuit, names)?;
    if let Some(depth) = config.max_call_depth {
        kernel.set_max_call_depth(depth);
    }
    if config.record_waveform {
        if let Some(path) = &config.waveform_path {
            let file = std::fs::File::create(path)?;
            kernel.set_recorder(Box::new(VcdRecorder::new(std::io::BufWriter::new(file))));
        }
    }

    while kernel.step()? == StepResult::Advanced {
        if let Some(cycle) = kernel.current_cycle() {
            println!("cycle {cycle}:");
        }
        let mut bindings: Vec<_> = kernel.env().bindings().collect();
        bindings.sort_by_cached_key(|(sig, _)| sig.display(names));
        for (sig, value) in bindings {
            println!("  {} = {}", sig.display(names), u8::from(value));
        }
    }

    Ok(kernel.run_to_completion()?)
}

/// Prints the recorded traces, one `NAME = 0110` line each, with the name
/// column left-aligned to the widest signal.
fn print_traces(result: &SimResult, names: &NameTable) {
    let width = result
        .traces
        .iter()
        .map(|t| t.signal.display(names).len())
        .max()
        .unwrap_or(0)
        .max(10);
    for trace in &result.traces {
        println!("{:<width$} = {}", trace.signal.display(names), trace.bits());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const EXAMPLE: &str = r#"{
        "name": "example",
        "inputs": ["A", "B"],
        "outputs": ["C"],
        "latches": ["D"],
        "updates": [
            { "target": "C", "expr": { "and": [ { "signal": "A" }, { "signal": "B" } ] } },
            { "target": "D", "expr": { "or": [ { "signal": "C" }, { "signal": "D'" } ] } }
        ],
        "traces": { "A": "101", "B": "011" }
    }"#;

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn run_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let circuit = tmp.path().join("example.json");
        fs::write(&circuit, EXAMPLE).unwrap();

        let args = RunArgs {
            circuit: Some(circuit.to_str().unwrap().to_string()),
            output: None,
            no_waveform: true,
        };
        let code = run(&args, &quiet()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn run_writes_waveform() {
        let tmp = TempDir::new().unwrap();
        let circuit = tmp.path().join("example.json");
        fs::write(&circuit, EXAMPLE).unwrap();
        let vcd = tmp.path().join("example.vcd");

        let args = RunArgs {
            circuit: Some(circuit.to_str().unwrap().to_string()),
            output: Some(vcd.to_str().unwrap().to_string()),
            no_waveform: false,
        };
        run(&args, &quiet()).unwrap();

        let output = fs::read_to_string(&vcd).unwrap();
        assert!(output.contains("$scope module example $end"));
        assert!(output.contains("$var wire 1 ! C $end"));
    }

    #[test]
    fn run_in_verbose_mode() {
        let tmp = TempDir::new().unwrap();
        let circuit = tmp.path().join("example.json");
        fs::write(&circuit, EXAMPLE).unwrap();

        let args = RunArgs {
            circuit: Some(circuit.to_str().unwrap().to_string()),
            output: None,
            no_waveform: true,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: true,
            config: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }

    #[test]
    fn run_with_config_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("example.json"), EXAMPLE).unwrap();
        let config_path = tmp.path().join("relay.toml");
        fs::write(
            &config_path,
            r#"
[project]
name = "example"
circuit = "example.json"

[simulation]
waveform = "example.vcd"
"#,
        )
        .unwrap();

        let args = RunArgs {
            circuit: None,
            output: None,
            no_waveform: false,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(config_path.to_str().unwrap().to_string()),
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        assert!(tmp.path().join("example.vcd").is_file());
    }

    #[test]
    fn config_next_to_circuit_is_picked_up() {
        let tmp = TempDir::new().unwrap();
        let circuit = tmp.path().join("example.json");
        fs::write(&circuit, EXAMPLE).unwrap();
        fs::write(
            tmp.path().join("relay.toml"),
            r#"
[project]
name = "example"
circuit = "example.json"

[simulation]
max_call_depth = 16
"#,
        )
        .unwrap();

        let project = resolve_project(Some(circuit.to_str().unwrap()), &quiet()).unwrap();
        assert_eq!(project.max_call_depth, Some(16));
    }

    #[test]
    fn no_waveform_overrides_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("example.json"), EXAMPLE).unwrap();
        let config_path = tmp.path().join("relay.toml");
        fs::write(
            &config_path,
            r#"
[project]
name = "example"
circuit = "example.json"

[simulation]
waveform = "example.vcd"
"#,
        )
        .unwrap();

        let args = RunArgs {
            circuit: None,
            output: None,
            no_waveform: true,
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(config_path.to_str().unwrap().to_string()),
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        assert!(!tmp.path().join("example.vcd").exists());
    }

    #[test]
    fn broken_circuit_propagates_error() {
        let tmp = TempDir::new().unwrap();
        let circuit = tmp.path().join("bad.json");
        // Mismatched trace lengths are a configuration error.
        fs::write(
            &circuit,
            r#"{ "name": "bad", "inputs": ["A", "B"],
                 "traces": { "A": "101", "B": "01" } }"#,
        )
        .unwrap();

        let args = RunArgs {
            circuit: Some(circuit.to_str().unwrap().to_string()),
            output: None,
            no_waveform: true,
        };
        let err = run(&args, &quiet()).unwrap_err();
        assert!(err.to_string().contains("length"));
    }

    #[test]
    fn missing_everything_is_an_error() {
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some("/nonexistent/relay.toml".to_string()),
        };
        let args = RunArgs {
            circuit: None,
            output: None,
            no_waveform: true,
        };
        assert!(run(&args, &global).is_err());
    }
}
