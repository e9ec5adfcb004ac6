//! For-in loop compilation.
//!
//! The iterator stays on the operand stack for the whole loop. `FOR_ITER`
//! pushes the next element, or pops the exhausted iterator and jumps to the
//! exit. A `break` leaves the iterator behind, so breaks land on a
//! `POP_TOP` just before the exit.

use venice_ast::{ForStmt, Ident};
use venice_core::CompileError;

use super::{Result, StmtCompiler};
use crate::bytecode::Instruction;
use crate::emit::JumpIntent;
use crate::symbols::{FrameKind, Symbol};
use crate::types::{AtomicType, VeniceType};

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Compile a for-in loop over a list, map, or string.
    ///
    /// ```text
    ///     <iterable>
    ///     GET_ITER
    /// head:
    ///     FOR_ITER exit
    ///     UNPACK_TUPLE          (several variables over a list of tuples)
    ///     STORE_NAME <var>...
    ///     <body>
    ///     REL_JUMP head
    ///     POP_TOP               (break target)
    /// exit:
    /// ```
    ///
    /// A map yields the key on top of the value, so `for k, v in m` binds
    /// `k` first.
    pub fn compile_for(&mut self, stmt: &ForStmt<'_>) -> Result<()> {
        let iterable = self.expr_compiler().infer(stmt.iterable)?;
        let (bindings, unpack) = loop_variables(&iterable, stmt)?;

        self.emitter.emit(Instruction::GetIter);
        let head = self.emitter.current_offset();
        let exit = self.emitter.emit_placeholder(JumpIntent::LoopExit);
        if unpack {
            self.emitter.emit(Instruction::UnpackTuple);
        }

        self.ctx.push_scope(FrameKind::Block);
        let body = self.compile_loop_body(stmt, bindings, head);
        self.ctx.pop_scope();
        body?;

        self.emitter.emit(Instruction::PopTop);
        self.emitter.patch_here(exit);
        Ok(())
    }

    fn compile_loop_body(
        &mut self,
        stmt: &ForStmt<'_>,
        bindings: Vec<VeniceType>,
        head: usize,
    ) -> Result<()> {
        for (ident, ty) in stmt.variables.iter().zip(bindings) {
            self.bind_loop_variable(ident, ty)?;
        }

        self.emitter.enter_loop(head, true);
        let body = self.compile_block(&stmt.body);
        self.emitter.emit_jump_back(head);
        let break_pad = self.emitter.current_offset();
        self.emitter.exit_loop(break_pad);
        body
    }

    fn bind_loop_variable(&mut self, ident: &Ident<'_>, ty: VeniceType) -> Result<()> {
        let slot = self.ctx.slot_for(ident.name);
        self.emitter.emit(Instruction::StoreName(slot.clone()));
        self.ctx
            .values
            .put(ident.name, Symbol::variable(ty, false, slot), ident.span)
    }
}

/// The types bound to the loop variables, in declaration order, and
/// whether each element must be unpacked first.
fn loop_variables(iterable: &VeniceType, stmt: &ForStmt<'_>) -> Result<(Vec<VeniceType>, bool)> {
    let count = stmt.variables.len();
    let wrong_count = |expected: &str| CompileError::TypeMismatch {
        expected: expected.to_string(),
        found: format!("{count} loop variable(s) over {iterable}"),
        span: stmt.span,
    };

    match iterable {
        VeniceType::List(item) if count == 1 => Ok((vec![(**item).clone()], false)),
        VeniceType::List(item) => match &**item {
            VeniceType::Tuple(items) if items.len() == count => Ok((items.clone(), true)),
            _ => Err(wrong_count("one loop variable, or one per tuple element")),
        },
        VeniceType::Map(key, value) if count == 2 => {
            Ok((vec![(**key).clone(), (**value).clone()], false))
        }
        VeniceType::Map(..) => Err(wrong_count("two loop variables")),
        VeniceType::Atomic(AtomicType::String) if count == 1 => {
            Ok((vec![VeniceType::CHARACTER], false))
        }
        VeniceType::Atomic(AtomicType::String) => Err(wrong_count("one loop variable")),
        other => Err(CompileError::TypeMismatch {
            expected: "list, map, or string".to_string(),
            found: other.to_string(),
            span: stmt.iterable.span(),
        }),
    }
}
