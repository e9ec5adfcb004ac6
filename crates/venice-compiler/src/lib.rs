//! Venice Compiler
//!
//! Type checks a Venice syntax tree and compiles it to stack-machine
//! bytecode.
//!
//! ## Architecture
//!
//! - **Imports**: compile imported modules under an `Alias::` prefix and
//!   merge their functions
//! - **Registration**: hoist classes, enums, and functions with complete
//!   signatures
//! - **Compilation**: type check bodies and generate bytecode, in
//!   statement order
//!
//! ## Modules
//!
//! - [`types`]: The type system, compatibility checks, and generics
//! - [`symbols`]: Scope chains for value and type symbols
//! - [`bytecode`]: Instructions, the compiled program, and its text format
//! - [`emit`]: Instruction emission with jump patching
//! - [`expr`]: Expression compiler with bidirectional type checking
//! - [`stmt`]: Statement compiler for control flow, bindings, and match
//! - [`function_compiler`]: Function and method bodies
//! - [`passes`]: The passes run over one module
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use venice_ast::build::AstBuilder;
//! use venice_compiler::bytecode::Instruction;
//!
//! // let x = 1 + 2
//! let arena = Bump::new();
//! let b = AstBuilder::new(&arena);
//! let module = b.module(&[b.let_stmt("x", b.infix(b.int(1), "+", b.int(2)))]);
//!
//! let program = venice_compiler::compile(&module).unwrap();
//! assert_eq!(
//!     program.function("main").unwrap(),
//!     &[
//!         Instruction::PushConstInt(1),
//!         Instruction::PushConstInt(2),
//!         Instruction::BinaryAdd,
//!         Instruction::StoreName("x".to_string()),
//!     ][..]
//! );
//! ```

pub mod builtins;
pub mod bytecode;
pub mod context;
pub mod emit;
pub mod expr;
pub mod function_compiler;
pub mod passes;
pub mod stmt;
pub mod symbols;
pub mod types;

pub use bytecode::{CompiledProgram, ENTRY_FUNCTION, FunctionRef, Import, Instruction};
pub use context::{CompilationContext, ModuleLoader};
pub use emit::{BreakError, BytecodeEmitter, JumpIntent, JumpLabel};
pub use expr::ExprCompiler;
pub use function_compiler::FunctionCompiler;
pub use stmt::{ReturnContext, StmtCompiler};
pub use types::{FunctionType, VeniceType};

pub use venice_core::CompileError;

use venice_ast::Module;

/// Compiler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Version written to the program header
    pub bytecode_version: u32,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            bytecode_version: 1,
        }
    }
}

/// The main compiler entry point.
#[derive(Default)]
pub struct Compiler<'l> {
    options: CompilerOptions,
    loader: Option<&'l dyn ModuleLoader>,
}

impl<'l> Compiler<'l> {
    /// A compiler with default options and no import support.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `options` instead of the defaults.
    pub fn with_options(mut self, options: CompilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve imports through `loader`.
    pub fn with_loader(mut self, loader: &'l dyn ModuleLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Compile a module into a program whose entry function is `main`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, module: &Module<'_>) -> Result<CompiledProgram, CompileError> {
        let mut ctx = CompilationContext::new(self.options.clone(), self.loader);
        passes::compile_module(&mut ctx, module)?;
        tracing::debug!(
            functions = ctx.program.functions.len(),
            imports = ctx.program.imports.len(),
            "compiled module"
        );
        Ok(ctx.program)
    }
}

/// Compile a module with default options and no import support.
pub fn compile(module: &Module<'_>) -> Result<CompiledProgram, CompileError> {
    Compiler::new().compile(module)
}
