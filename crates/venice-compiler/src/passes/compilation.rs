//! Compilation Pass - compile bodies and top-level code to bytecode.
//!
//! Runs after registration, walking the top level in statement order:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ CompilationPass                                             │
//! │   - functions and methods  -> FunctionCompiler              │
//! │   - everything else        -> StmtCompiler (entry function) │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A function body sees the module-level variables declared above it. The
//! top-level code becomes the entry function, which has no trailing
//! `RETURN`; for an imported module it is type-checked and discarded.

use venice_ast::{ClassDecl, FunctionDecl, Ident, Stmt};
use venice_core::CompileError;

use crate::bytecode::{ENTRY_FUNCTION, FunctionRef};
use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::function_compiler::FunctionCompiler;
use crate::stmt::{ReturnContext, StmtCompiler};
use crate::symbols::SymbolKind;
use crate::types::VeniceType;

type Result<T> = std::result::Result<T, CompileError>;

/// Compiles the bodies of one module.
pub struct CompilationPass<'a, 'l> {
    ctx: &'a mut CompilationContext<'l>,
    /// Top-level code
    main: BytecodeEmitter,
}

impl<'a, 'l> CompilationPass<'a, 'l> {
    /// Create a new compilation pass.
    pub fn new(ctx: &'a mut CompilationContext<'l>) -> Self {
        Self {
            ctx,
            main: BytecodeEmitter::new(),
        }
    }

    /// Compile every body among `stmts` and the top-level code.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, stmts: &[Stmt<'_>]) -> Result<()> {
        for stmt in stmts {
            match stmt {
                Stmt::Function(decl) => self.compile_function(decl)?,
                Stmt::Class(decl) => self.compile_methods(decl)?,
                Stmt::Enum(_) | Stmt::Import(_) => {}
                other => {
                    StmtCompiler::new(self.ctx, &mut self.main, ReturnContext::TopLevel, None)
                        .compile(other)?;
                }
            }
        }

        if !self.ctx.is_import {
            let code = self.main.finish();
            tracing::debug!(instructions = code.len(), "compiled top-level code");
            self.ctx.program.insert_function(ENTRY_FUNCTION, code);
        }
        Ok(())
    }

    fn compile_function(&mut self, decl: &FunctionDecl<'_>) -> Result<()> {
        let symbol = self
            .ctx
            .values
            .get(decl.name.name)
            .cloned()
            .ok_or_else(|| undefined(&decl.name))?;
        let (VeniceType::Function(signature), SymbolKind::Function(FunctionRef::User(name))) =
            (symbol.ty, symbol.kind)
        else {
            return Err(undefined(&decl.name));
        };
        FunctionCompiler::new(self.ctx, decl, *signature, name).compile()
    }

    fn compile_methods(&mut self, decl: &ClassDecl<'_>) -> Result<()> {
        let Some(VeniceType::Class(class)) = self.ctx.types.get(decl.name.name).cloned() else {
            return Err(undefined(&decl.name));
        };
        let methods = self
            .ctx
            .registry
            .class(class.id)
            .map(|registered| registered.methods.clone())
            .unwrap_or_default();

        for (method, info) in decl.methods.iter().zip(methods) {
            FunctionCompiler::new(self.ctx, &method.function, info.signature, info.function)
                .method_of(class.clone())
                .compile()?;
        }
        Ok(())
    }
}

fn undefined(name: &Ident<'_>) -> CompileError {
    CompileError::UndefinedSymbol {
        name: name.name.to_string(),
        span: name.span,
    }
}
