//! Assignment compilation.
//!
//! The new value is always evaluated first. For element and field
//! targets the container follows, then the index, so the store instruction
//! finds them on top of the value:
//!
//! ```text
//! x = v        v STORE_NAME x
//! xs[i] = v    v xs i STORE_INDEX
//! m[k] = v     v m k STORE_MAP_INDEX
//! o.f = v      v o STORE_FIELD <f>
//! ```

use venice_ast::{AssignStmt, Expr, FieldExpr, Ident, IndexExpr};
use venice_core::CompileError;

use super::{Result, StmtCompiler};
use crate::bytecode::Instruction;
use crate::expr::member::resolve_field;
use crate::symbols::SymbolKind;
use crate::types::VeniceType;

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Compile an assignment.
    pub fn compile_assign(&mut self, stmt: &AssignStmt<'_>) -> Result<()> {
        match stmt.target {
            Expr::Symbol(ident) => self.assign_name(ident, stmt),
            Expr::Index(index) => self.assign_index(index, stmt),
            Expr::Field(field) => self.assign_field(field, stmt),
            _ => Err(CompileError::InvalidAssignmentTarget { span: stmt.span }),
        }
    }

    fn assign_name(&mut self, ident: &Ident<'_>, stmt: &AssignStmt<'_>) -> Result<()> {
        let undefined = || CompileError::UndefinedSymbol {
            name: ident.name.to_string(),
            span: ident.span,
        };
        let lookup = self.ctx.values.lookup(ident.name).ok_or_else(undefined)?;
        let global = lookup.module_level && lookup.crossed_function;
        let symbol = lookup.value.clone();

        let SymbolKind::Variable { slot } = symbol.kind else {
            return Err(CompileError::InvalidAssignmentTarget { span: stmt.span });
        };
        if global && self.ctx.is_import {
            return Err(undefined());
        }
        if !symbol.mutable {
            return Err(CompileError::AssignToConst {
                name: ident.name.to_string(),
                span: stmt.span,
            });
        }

        self.expr_compiler().check(stmt.value, &symbol.ty)?;
        self.emitter.emit(if global {
            Instruction::StoreGlobal(slot)
        } else {
            Instruction::StoreName(slot)
        });
        Ok(())
    }

    fn assign_index(&mut self, target: &IndexExpr<'_>, stmt: &AssignStmt<'_>) -> Result<()> {
        let start = self.emitter.current_offset();
        let container = self.expr_compiler().infer(target.object)?;
        let container_code = self.emitter.drain_from(start);

        let (key, value, store) = match container {
            VeniceType::List(item) => (VeniceType::INTEGER, *item, Instruction::StoreIndex),
            VeniceType::Map(key, value) => (*key, *value, Instruction::StoreMapIndex),
            other => {
                return Err(CompileError::IndexOnNonIndexable {
                    ty: other.to_string(),
                    span: target.span,
                });
            }
        };

        let mut exprs = self.expr_compiler();
        exprs.check(stmt.value, &value)?;
        exprs.emitter().append(container_code);
        exprs.check(target.index, &key)?;
        self.emitter.emit(store);
        Ok(())
    }

    fn assign_field(&mut self, target: &FieldExpr<'_>, stmt: &AssignStmt<'_>) -> Result<()> {
        let start = self.emitter.current_offset();
        let object = self.expr_compiler().infer(target.object)?;
        let object_code = self.emitter.drain_from(start);

        let VeniceType::Class(class) = object else {
            return Err(CompileError::InvalidAssignmentTarget { span: stmt.span });
        };

        let mut exprs = self.expr_compiler();
        let (index, field_ty) = resolve_field(&exprs, class.id, target.field.name, target.span)?;
        exprs.check(stmt.value, &field_ty)?;
        exprs.emitter().append(object_code);
        self.emitter.emit(Instruction::StoreField(index));
        Ok(())
    }
}
