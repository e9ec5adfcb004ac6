//! Statement compiler for Venice.
//!
//! The [`StmtCompiler`] compiles statements of one function body (or of the
//! module's top level) to bytecode:
//! - `let`/`var` bindings and assignments
//! - return statements checked against the enclosing function
//! - if/else, while, and for-in with break/continue
//! - match over enum values
//!
//! Every block pushes a scope frame that is popped when the block ends.
//! Function, class, enum, and import declarations are handled by the
//! module passes and are rejected here.

mod assign;
mod for_stmt;
mod if_stmt;
mod let_stmt;
mod match_stmt;
mod return_stmt;
mod while_stmt;

use venice_ast::{Block, ExprStmt, Stmt};
use venice_core::{CompileError, Span, TypeHash};

use crate::bytecode::Instruction;
use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::expr::ExprCompiler;
use crate::symbols::FrameKind;
use crate::types::VeniceType;

type Result<T> = std::result::Result<T, CompileError>;

/// What the enclosing code returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnContext {
    /// Module top level, where `return` is not allowed
    TopLevel,
    /// A function body returning the given type, `None` for void
    Function(Option<VeniceType>),
}

/// Compiles statements to bytecode.
pub struct StmtCompiler<'a, 'l> {
    /// Compilation context with scopes and the type registry
    ctx: &'a mut CompilationContext<'l>,
    /// Bytecode emitter
    emitter: &'a mut BytecodeEmitter,
    /// What `return` must produce
    returns: ReturnContext,
    /// Class whose method is being compiled
    current_class: Option<TypeHash>,
}

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Create a new statement compiler.
    pub fn new(
        ctx: &'a mut CompilationContext<'l>,
        emitter: &'a mut BytecodeEmitter,
        returns: ReturnContext,
        current_class: Option<TypeHash>,
    ) -> Self {
        Self {
            ctx,
            emitter,
            returns,
            current_class,
        }
    }

    /// Compile a statement.
    pub fn compile(&mut self, stmt: &Stmt<'_>) -> Result<()> {
        match stmt {
            Stmt::Let(let_stmt) => self.compile_let(let_stmt),
            Stmt::Assign(assign) => self.compile_assign(assign),
            Stmt::Return(ret) => self.compile_return(ret),
            Stmt::If(if_stmt) => self.compile_if(if_stmt),
            Stmt::While(while_stmt) => self.compile_while(while_stmt),
            Stmt::For(for_stmt) => self.compile_for(for_stmt),
            Stmt::Match(match_stmt) => self.compile_match(match_stmt),
            Stmt::Break(brk) => self.compile_loop_jump("break", brk.span),
            Stmt::Continue(cont) => self.compile_loop_jump("continue", cont.span),
            Stmt::Expr(expr_stmt) => self.compile_expr_stmt(expr_stmt),
            Stmt::Function(decl) => misplaced("function", decl.span),
            Stmt::Class(decl) => misplaced("class", decl.span),
            Stmt::Enum(decl) => misplaced("enum", decl.span),
            Stmt::Import(decl) => misplaced("import", decl.span),
        }
    }

    /// Compile statements in the current scope.
    pub fn compile_stmts(&mut self, stmts: &[Stmt<'_>]) -> Result<()> {
        stmts.iter().try_for_each(|stmt| self.compile(stmt))
    }

    /// Compile a block in a fresh scope.
    pub fn compile_block(&mut self, block: &Block<'_>) -> Result<()> {
        self.ctx.push_scope(FrameKind::Block);
        let result = self.compile_stmts(block.stmts);
        self.ctx.pop_scope();
        result
    }

    /// Evaluate an expression for its effect, dropping any value.
    fn compile_expr_stmt(&mut self, expr_stmt: &ExprStmt<'_>) -> Result<()> {
        let ty = self.expr_compiler().compile(expr_stmt.expr, None)?;
        if ty.is_some() {
            self.emitter.emit(Instruction::PopTop);
        }
        Ok(())
    }

    fn compile_loop_jump(&mut self, keyword: &'static str, span: Span) -> Result<()> {
        let emitted = if keyword == "break" {
            self.emitter.emit_break()
        } else {
            self.emitter.emit_continue()
        };
        emitted.map_err(|_| CompileError::BreakOrContinueOutsideLoop { keyword, span })
    }

    /// An expression compiler sharing this compiler's context and emitter.
    pub fn expr_compiler(&mut self) -> ExprCompiler<'_, 'l> {
        ExprCompiler::new(self.ctx, self.emitter, self.current_class)
    }
}

fn misplaced(what: &'static str, span: Span) -> Result<()> {
    Err(CompileError::MisplacedDeclaration { what, span })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use venice_ast::build::AstBuilder;

    #[test]
    fn expression_statement_drops_value() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let code = compile_top_level(&[b.expr_stmt(b.int(4))]).unwrap();
        assert_eq!(code, vec![Instruction::PushConstInt(4), Instruction::PopTop]);

        let code = compile_top_level(&[b.expr_stmt(b.call(b.sym("print"), &[b.int(4)]))]).unwrap();
        assert_ne!(code.last(), Some(&Instruction::PopTop));
    }

    #[test]
    fn break_outside_loop() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = compile_top_level(&[b.continue_stmt()]).unwrap_err();
        assert!(matches!(
            err,
            CompileError::BreakOrContinueOutsideLoop {
                keyword: "continue",
                ..
            }
        ));
    }

    #[test]
    fn nested_declarations_are_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.function_stmt(b.function("inner", &[], &[], None, &[]));
        let err = compile_body(&[inner], None).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MisplacedDeclaration {
                what: "function",
                ..
            }
        ));
        let err = compile_body(&[b.import("m", "M")], None).unwrap_err();
        assert!(matches!(err, CompileError::MisplacedDeclaration { .. }));
    }

    #[test]
    fn block_scope_ends_with_block() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let stmts = [
            b.if_stmt(b.boolean(true), &[b.let_stmt("y", b.int(1))]),
            b.expr_stmt(b.sym("y")),
        ];
        let err = compile_body(&stmts, None).unwrap_err();
        assert!(matches!(err, CompileError::UndefinedSymbol { name, .. } if name == "y"));
    }
}
