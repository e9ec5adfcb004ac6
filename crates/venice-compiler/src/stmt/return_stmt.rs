//! Return statement compilation.

use venice_ast::ReturnStmt;
use venice_core::CompileError;

use super::{Result, ReturnContext, StmtCompiler};
use crate::bytecode::Instruction;

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Compile a return statement.
    ///
    /// A returned value is left on the operand stack for the caller. A bare
    /// `return` inside for loops first drops the loops' iterators, so the
    /// function returns nothing rather than an iterator.
    pub fn compile_return(&mut self, stmt: &ReturnStmt<'_>) -> Result<()> {
        let expected = match &self.returns {
            ReturnContext::TopLevel => {
                return Err(CompileError::ReturnOutsideFunction { span: stmt.span });
            }
            ReturnContext::Function(ret) => ret.clone(),
        };

        match (stmt.value, expected) {
            (Some(value), Some(ret)) => {
                self.expr_compiler().check(value, &ret)?;
            }
            (None, None) => {
                for _ in 0..self.emitter.open_iterators() {
                    self.emitter.emit(Instruction::PopTop);
                }
            }
            (Some(value), None) => {
                let found = self.expr_compiler().compile(value, None)?;
                return Err(CompileError::TypeMismatch {
                    expected: "void".to_string(),
                    found: found.map_or_else(|| "void".to_string(), |ty| ty.to_string()),
                    span: value.span(),
                });
            }
            (None, Some(ret)) => {
                return Err(CompileError::TypeMismatch {
                    expected: ret.to_string(),
                    found: "void".to_string(),
                    span: stmt.span,
                });
            }
        }

        self.emitter.emit_return();
        Ok(())
    }
}
