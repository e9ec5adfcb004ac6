//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::sync::Once;

use venice::{CompiledProgram, RuntimeError, Value, Vm, VmConfig, ENTRY_FUNCTION};
use venice_ast::Module;

static INIT: Once = Once::new();

/// Send `tracing` output to the test harness. Honors `RUST_LOG`.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Outcome of running a program's entry function.
pub struct Run {
    pub result: Result<Option<Value>, RuntimeError>,
    pub output: String,
}

/// Run `main` with the given limits, capturing what it prints.
pub fn run_with(program: &CompiledProgram, config: VmConfig) -> Run {
    init_test_logging();
    let mut output = Vec::new();
    let result = Vm::new(program)
        .with_config(config)
        .with_output(&mut output)
        .run(ENTRY_FUNCTION);
    Run {
        result,
        output: String::from_utf8(output).expect("output is UTF-8"),
    }
}

pub fn run(program: &CompiledProgram) -> Run {
    run_with(program, VmConfig::default())
}

/// Compile and run a module that must succeed, returning its output.
pub fn output_of(module: &Module<'_>) -> String {
    init_test_logging();
    let program = venice::compile(module).expect("module compiles");
    let run = run(&program);
    run.result.expect("program runs");
    run.output
}
