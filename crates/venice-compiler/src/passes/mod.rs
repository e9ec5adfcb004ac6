//! Compiler passes.
//!
//! A module is compiled in three steps:
//!
//! - [`imports`]: compile every imported module and merge its functions
//! - [`registration`]: hoist class, enum, and function declarations with
//!   complete signatures, so bodies may refer to any of them
//! - [`compilation`]: compile function and method bodies and the
//!   top-level code, in statement order

pub mod compilation;
pub mod imports;
pub mod registration;

pub use compilation::CompilationPass;
pub use registration::{RegistrationOutput, RegistrationPass};

use venice_ast::Module;
use venice_core::CompileError;

use crate::context::CompilationContext;

/// Run every pass over `module`.
pub fn compile_module(
    ctx: &mut CompilationContext<'_>,
    module: &Module<'_>,
) -> Result<(), CompileError> {
    imports::compile_imports(ctx, module.stmts())?;
    let registered = RegistrationPass::new(ctx).run(module.stmts())?;
    tracing::debug!(
        types = registered.types_registered,
        functions = registered.functions_registered,
        "registered declarations"
    );
    CompilationPass::new(ctx).run(module.stmts())
}
