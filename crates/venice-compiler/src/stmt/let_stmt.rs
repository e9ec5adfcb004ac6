//! `let` and `var` binding compilation.

use venice_ast::LetStmt;
use venice_core::TypeError;

use super::{Result, StmtCompiler};
use crate::bytecode::Instruction;
use crate::symbols::Symbol;
use crate::types::resolve_type;

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Compile a binding.
    ///
    /// The initializer is compiled before the name is bound, so it still
    /// sees any outer binding of the same name. With a type annotation the
    /// variable takes the annotated type; otherwise the initializer's, which
    /// must not leave a type argument unfixed.
    pub fn compile_let(&mut self, stmt: &LetStmt<'_>) -> Result<()> {
        let declared = stmt
            .ty
            .map(|ty| resolve_type(ty, &self.ctx.types).map_err(|e| e.at(ty.span)))
            .transpose()?;

        let ty = match declared {
            Some(declared) => {
                self.expr_compiler().check(stmt.value, &declared)?;
                declared
            }
            None => {
                let inferred = self.expr_compiler().infer(stmt.value)?;
                if let Some(name) = inferred.unknown_name() {
                    return Err(TypeError::UnboundGeneric {
                        name: name.to_string(),
                    }
                    .at(stmt.value.span()));
                }
                inferred
            }
        };

        let slot = self.ctx.slot_for(stmt.name.name);
        self.emitter.emit(Instruction::StoreName(slot.clone()));
        self.ctx.values.put(
            stmt.name.name,
            Symbol::variable(ty, stmt.mutable, slot),
            stmt.name.span,
        )
    }
}
