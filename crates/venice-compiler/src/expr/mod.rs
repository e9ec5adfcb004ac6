//! Expression compiler.
//!
//! The [`ExprCompiler`] type checks an expression and emits the code that
//! leaves its value on top of the operand stack. Types flow both ways:
//! - [`ExprCompiler::infer`] synthesizes the type from the expression
//! - [`ExprCompiler::check`] verifies it against an expected type, which
//!   also serves as a hint for empty collection literals
//!
//! # Example
//!
//! ```ignore
//! let mut compiler = ExprCompiler::new(&mut ctx, &mut emitter, None);
//! let ty = compiler.infer(&expr)?;
//! compiler.check(&other, &VeniceType::INTEGER)?;
//! ```

mod binary;
mod calls;
mod collections;
mod identifiers;
mod literals;
pub(crate) mod member;
mod ternary;
mod unary;

use venice_ast::Expr;
use venice_core::{CompileError, TypeHash};

use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::types::{VeniceType, check_type};

type Result<T> = std::result::Result<T, CompileError>;

/// Compiles expressions of one function body.
pub struct ExprCompiler<'a, 'l> {
    /// Compilation context with scopes and the type registry
    ctx: &'a mut CompilationContext<'l>,
    /// Bytecode emitter of the enclosing function
    emitter: &'a mut BytecodeEmitter,
    /// Class whose method is being compiled, for private member access
    current_class: Option<TypeHash>,
}

impl<'a, 'l> ExprCompiler<'a, 'l> {
    /// Create a new expression compiler.
    pub fn new(
        ctx: &'a mut CompilationContext<'l>,
        emitter: &'a mut BytecodeEmitter,
        current_class: Option<TypeHash>,
    ) -> Self {
        Self {
            ctx,
            emitter,
            current_class,
        }
    }

    /// Compile `expr`, returning its type or `None` for a void call.
    ///
    /// `hint` is the type the context expects, if known. It only guides
    /// literals that cannot be typed on their own; the caller still checks
    /// the result.
    pub fn compile(
        &mut self,
        expr: &Expr<'_>,
        hint: Option<&VeniceType>,
    ) -> Result<Option<VeniceType>> {
        match expr {
            Expr::Literal(lit) => Ok(Some(literals::compile_literal(self, lit))),
            Expr::Symbol(ident) => identifiers::compile_symbol(self, ident).map(Some),
            Expr::Qualified(qualified) => {
                identifiers::compile_qualified(self, qualified).map(Some)
            }
            Expr::Call(call) => calls::compile_call(self, call),
            Expr::Field(field) => member::compile_field(self, field).map(Some),
            Expr::TupleField(field) => member::compile_tuple_field(self, field).map(Some),
            Expr::Index(index) => member::compile_index(self, index).map(Some),
            Expr::Infix(infix) => binary::compile_infix(self, infix).map(Some),
            Expr::Unary(unary) => unary::compile_unary(self, unary).map(Some),
            Expr::Ternary(ternary) => ternary::compile_ternary(self, ternary, hint).map(Some),
            Expr::List(list) => collections::compile_list(self, list, hint).map(Some),
            Expr::Map(map) => collections::compile_map(self, map, hint).map(Some),
            Expr::Tuple(tuple) => collections::compile_tuple(self, tuple, hint).map(Some),
        }
    }

    /// Compile `expr`, which must produce a value.
    pub fn infer(&mut self, expr: &Expr<'_>) -> Result<VeniceType> {
        self.infer_with_hint(expr, None)
    }

    /// Compile `expr` with a type hint; it must produce a value.
    pub fn infer_with_hint(
        &mut self,
        expr: &Expr<'_>,
        hint: Option<&VeniceType>,
    ) -> Result<VeniceType> {
        self.compile(expr, hint)?
            .ok_or_else(|| CompileError::TypeMismatch {
                expected: "a value".to_string(),
                found: "void".to_string(),
                span: expr.span(),
            })
    }

    /// Compile `expr` and require its type to be compatible with `expected`.
    pub fn check(&mut self, expr: &Expr<'_>, expected: &VeniceType) -> Result<VeniceType> {
        let actual = self.infer_with_hint(expr, Some(expected))?;
        if check_type(expected, &actual) {
            Ok(actual)
        } else {
            Err(mismatch(expected, &actual, expr))
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the compilation context (immutable).
    pub fn ctx(&self) -> &CompilationContext<'l> {
        self.ctx
    }

    /// Get the compilation context (mutable).
    pub fn ctx_mut(&mut self) -> &mut CompilationContext<'l> {
        self.ctx
    }

    /// Get the bytecode emitter.
    pub fn emitter(&mut self) -> &mut BytecodeEmitter {
        self.emitter
    }

    /// Get the class whose method is being compiled.
    pub fn current_class(&self) -> Option<TypeHash> {
        self.current_class
    }
}

/// A [`CompileError::TypeMismatch`] at `expr`.
pub(crate) fn mismatch(expected: &VeniceType, found: &VeniceType, expr: &Expr<'_>) -> CompileError {
    CompileError::TypeMismatch {
        expected: expected.to_string(),
        found: found.to_string(),
        span: expr.span(),
    }
}
