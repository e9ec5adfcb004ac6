//! If/else compilation.

use venice_ast::{ElseBranch, IfStmt};

use super::{Result, StmtCompiler};
use crate::emit::JumpIntent;
use crate::types::VeniceType;

impl<'a, 'l> StmtCompiler<'a, 'l> {
    /// Compile an if statement.
    ///
    /// ```text
    ///     <condition>
    ///     REL_JUMP_IF_FALSE else
    ///     <body>
    ///     REL_JUMP end          (only with an else branch)
    /// else:
    ///     <else branch>
    /// end:
    /// ```
    pub fn compile_if(&mut self, stmt: &IfStmt<'_>) -> Result<()> {
        self.expr_compiler()
            .check(stmt.condition, &VeniceType::BOOLEAN)?;
        let skip = self.emitter.emit_placeholder(JumpIntent::SkipClause);
        self.compile_block(&stmt.body)?;

        let Some(else_branch) = &stmt.else_branch else {
            self.emitter.patch_here(skip);
            return Ok(());
        };

        let end = self.emitter.emit_placeholder(JumpIntent::EndOfClause);
        self.emitter.patch_here(skip);
        match else_branch {
            ElseBranch::If(nested) => self.compile_if(nested)?,
            ElseBranch::Block(block) => self.compile_block(block)?,
        }
        self.emitter.patch_here(end);
        Ok(())
    }
}
