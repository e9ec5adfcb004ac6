//! Venice: a statically typed scripting language.
//!
//! This crate ties the pipeline together: a syntax tree from
//! [`venice_ast`] is type-checked and compiled by [`venice_compiler`] into a
//! [`CompiledProgram`], which the [`vm`] executes.
//!
//! ```
//! use bumpalo::Bump;
//! use venice::vm::Value;
//! use venice_ast::build::AstBuilder;
//!
//! // let x = 1 + 2
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let module = b.module(&[b.let_stmt("x", b.infix(b.int(1), "+", b.int(2)))]);
//!
//! let program = venice::compile(&module).unwrap();
//! let mut vm = venice::Vm::new(&program);
//! vm.run("main").unwrap();
//! assert_eq!(vm.global("x"), Some(&Value::Integer(3)));
//! ```

pub mod vm;

use std::path::{Path, PathBuf};

pub use venice_compiler::{CompiledProgram, Compiler, CompilerOptions, ENTRY_FUNCTION, ModuleLoader};
pub use venice_core::{BytecodeError, CompileError, RuntimeError, VeniceError};
pub use vm::{Value, Vm, VmConfig};

use venice_ast::Module;

/// File extension of the bytecode text format.
pub const BYTECODE_EXTENSION: &str = "vnb";

// Re-export main types
pub mod prelude {
    pub use crate::vm::{Environment, Value, VeniceMap, Vm, VmConfig};
    pub use crate::{compile, execute};
    pub use venice_compiler::{
        CompiledProgram, Compiler, CompilerOptions, FunctionRef, Instruction, ModuleLoader,
    };
    pub use venice_core::{CompileError, RuntimeError, TypeError, VeniceError};
}

/// Compile a module with default options.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile(module: &Module<'_>) -> Result<CompiledProgram, CompileError> {
    venice_compiler::compile(module)
}

/// Run `entry` in a fresh VM that prints to stdout.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn execute(program: &CompiledProgram, entry: &str) -> Result<Option<Value>, RuntimeError> {
    Vm::new(program).run(entry)
}

/// Parse a program from the bytecode text format and run its entry
/// function.
pub fn execute_text(text: &str) -> Result<Option<Value>, VeniceError> {
    let program = CompiledProgram::parse(text)?;
    Ok(execute(&program, ENTRY_FUNCTION)?)
}

/// Where the bytecode for `source` is written: `X.<ext>` becomes `X.vnb`.
pub fn bytecode_path(source: impl AsRef<Path>) -> PathBuf {
    source.as_ref().with_extension(BYTECODE_EXTENSION)
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Once;

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
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use venice_ast::build::AstBuilder;

    #[test]
    fn bytecode_path_swaps_extension() {
        assert_eq!(bytecode_path("prog/main.vn"), PathBuf::from("prog/main.vnb"));
        assert_eq!(bytecode_path("script"), PathBuf::from("script.vnb"));
    }

    #[test]
    fn compiled_text_runs() {
        test_utils::init_test_logging();
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let module = b.module(&[b.let_stmt("x", b.int(2))]);
        let program = compile(&module).unwrap();

        let text = program.to_text();
        assert_eq!(execute_text(&text).unwrap(), None);
        assert!(matches!(
            execute_text("not bytecode"),
            Err(VeniceError::Bytecode(_))
        ));
    }
}
