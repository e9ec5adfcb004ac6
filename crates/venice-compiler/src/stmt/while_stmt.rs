//! While loop compilation.

use venice_ast::WhileStmt;

use super::{Result, StmtCompiler};
use crate::emit::JumpIntent;
use crate::types::VeniceType;

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Compile a while loop.
    ///
    /// `continue` jumps back to the condition, `break` to the exit.
    ///
    /// ```text
    /// start:
    ///     <condition>
    ///     REL_JUMP_IF_FALSE exit
    ///     <body>
    ///     REL_JUMP start
    /// exit:
    /// ```
    pub fn compile_while(&mut self, stmt: &WhileStmt<'_>) -> Result<()> {
        let start = self.emitter.current_offset();
        self.expr_compiler()
            .check(stmt.condition, &VeniceType::BOOLEAN)?;
        let exit = self.emitter.emit_placeholder(JumpIntent::SkipClause);

        self.emitter.enter_loop(start, false);
        let body = self.compile_block(&stmt.body);
        self.emitter.emit_jump_back(start);
        let end = self.emitter.current_offset();
        self.emitter.exit_loop(end);
        body?;

        self.emitter.patch_here(exit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::bytecode::Instruction;
    use crate::stmt::test_support::*;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use venice_ast::build::AstBuilder;

    #[test]
    fn loop_layout() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let code = compile_top_level(&[b.while_stmt(b.boolean(true), &[b.break_stmt()])]).unwrap();
        assert_eq!(
            code,
            vec![
                Instruction::PushConstBool(true),
                Instruction::RelJumpIfFalse(3),
                Instruction::RelJump(2),
                Instruction::RelJump(-3),
            ]
        );
    }

    #[test]
    fn nested_break_and_continue_target_their_own_loop() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let inner = b.while_stmt(b.boolean(false), &[b.continue_stmt()]);
        let outer = b.while_stmt(b.boolean(true), &[inner, b.break_stmt()]);
        let code = compile_top_level(&[outer]).unwrap();
        assert_eq!(
            code,
            vec![
                Instruction::PushConstBool(true),  // 0 outer start
                Instruction::RelJumpIfFalse(7),    // 1 -> 8
                Instruction::PushConstBool(false), // 2 inner start
                Instruction::RelJumpIfFalse(3),    // 3 -> 6
                Instruction::RelJump(-2),          // 4 continue -> 2
                Instruction::RelJump(-3),          // 5 -> 2
                Instruction::RelJump(2),           // 6 break -> 8
                Instruction::RelJump(-7),          // 7 -> 0
            ]
        );
    }
}
