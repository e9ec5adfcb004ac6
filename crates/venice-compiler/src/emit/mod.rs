//! Bytecode emitter for the Venice compiler.
//!
//! The [`BytecodeEmitter`] builds the instruction list of one function.
//! Forward jumps are emitted as placeholders tagged with a [`JumpIntent`]
//! and patched once their target is known; offsets are instruction counts
//! relative to the jumping instruction.
//!
//! # Example
//!
//! ```
//! use venice_compiler::bytecode::Instruction;
//! use venice_compiler::emit::{BytecodeEmitter, JumpIntent};
//!
//! let mut emitter = BytecodeEmitter::new();
//! emitter.emit(Instruction::PushConstBool(true));
//! let skip = emitter.emit_placeholder(JumpIntent::SkipClause);
//! emitter.emit(Instruction::PushConstInt(1));
//! emitter.patch_here(skip);
//!
//! assert_eq!(emitter.code()[1], Instruction::RelJumpIfFalse(2));
//! ```

mod jumps;

use thiserror::Error;

use crate::bytecode::Instruction;
use jumps::JumpManager;

/// What a placeholder jump is for. Decides which jump instruction it
/// becomes once patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpIntent {
    /// Skip a clause when its condition is false
    SkipClause,
    /// Jump from the end of a taken clause past the remaining ones
    EndOfClause,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// Jump from the end of a match clause past the match
    EndOfMatch,
    /// Leave a pattern when a test fails
    PatternFail,
    /// Short-circuit `and`
    ShortCircuitAnd,
    /// Short-circuit `or`
    ShortCircuitOr,
    /// Leave a for loop when its iterator is exhausted
    LoopExit,
}

impl JumpIntent {
    fn resolve(self, offset: i64) -> Instruction {
        match self {
            JumpIntent::SkipClause | JumpIntent::PatternFail => Instruction::RelJumpIfFalse(offset),
            JumpIntent::EndOfClause
            | JumpIntent::Break
            | JumpIntent::Continue
            | JumpIntent::EndOfMatch => Instruction::RelJump(offset),
            JumpIntent::ShortCircuitAnd => Instruction::RelJumpIfFalseOrPop(offset),
            JumpIntent::ShortCircuitOr => Instruction::RelJumpIfTrueOrPop(offset),
            JumpIntent::LoopExit => Instruction::ForIter(offset),
        }
    }
}

/// A placeholder waiting to be patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpLabel {
    /// Position of the placeholder
    pub index: usize,
    /// What the jump is for
    pub intent: JumpIntent,
}

/// Errors from loop control statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BreakError {
    /// `break` or `continue` outside of any loop.
    #[error("not inside a loop")]
    NotInLoop,
}

/// Emits the instructions of one function.
#[derive(Debug, Default)]
pub struct BytecodeEmitter {
    code: Vec<Instruction>,
    jumps: JumpManager,
    has_return: bool,
}

impl BytecodeEmitter {
    /// Create an empty emitter.
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Append one instruction.
    pub fn emit(&mut self, instruction: Instruction) {
        self.code.push(instruction);
    }

    /// Position the next instruction will occupy.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Instructions emitted so far.
    pub fn code(&self) -> &[Instruction] {
        &self.code
    }

    /// Remove and return everything emitted from `start` on.
    ///
    /// Used to emit a callee after its arguments even though the callee is
    /// compiled first. The removed code must not hold unpatched labels.
    pub fn drain_from(&mut self, start: usize) -> Vec<Instruction> {
        self.code.split_off(start.min(self.code.len()))
    }

    /// Append previously drained code.
    pub fn append(&mut self, code: Vec<Instruction>) {
        self.code.extend(code);
    }

    // ==========================================================================
    // Jumps
    // ==========================================================================

    /// Emit a placeholder jump to be patched later.
    pub fn emit_placeholder(&mut self, intent: JumpIntent) -> JumpLabel {
        let index = self.current_offset();
        self.emit(Instruction::Placeholder);
        JumpLabel { index, intent }
    }

    /// Patch a placeholder so it jumps to `target`.
    pub fn patch(&mut self, label: JumpLabel, target: usize) {
        let offset = target as i64 - label.index as i64;
        if let Some(slot) = self.code.get_mut(label.index) {
            *slot = label.intent.resolve(offset);
        }
    }

    /// Patch a placeholder so it jumps to the next instruction emitted.
    pub fn patch_here(&mut self, label: JumpLabel) {
        self.patch(label, self.current_offset());
    }

    /// Emit an unconditional jump back to `target`.
    pub fn emit_jump_back(&mut self, target: usize) {
        let offset = target as i64 - self.current_offset() as i64;
        self.emit(Instruction::RelJump(offset));
    }

    // ==========================================================================
    // Loop Control (Break/Continue)
    // ==========================================================================

    /// Open a loop whose `continue` resumes at `continue_target`.
    ///
    /// `holds_iterator` marks loops that keep an iterator on the operand
    /// stack while their body runs.
    pub fn enter_loop(&mut self, continue_target: usize, holds_iterator: bool) {
        self.jumps.enter_loop(continue_target, holds_iterator);
    }

    /// Close the innermost loop, patching its breaks to `break_target` and
    /// its continues to the loop's continue target.
    pub fn exit_loop(&mut self, break_target: usize) {
        if let Some(ctx) = self.jumps.exit_loop() {
            for label in ctx.breaks {
                self.patch(label, break_target);
            }
            for label in ctx.continues {
                self.patch(label, ctx.continue_target);
            }
        }
    }

    /// Emit a `break`.
    pub fn emit_break(&mut self) -> Result<(), BreakError> {
        if !self.jumps.in_loop() {
            return Err(BreakError::NotInLoop);
        }
        let label = self.emit_placeholder(JumpIntent::Break);
        self.jumps.add_break(label);
        Ok(())
    }

    /// Emit a `continue`.
    pub fn emit_continue(&mut self) -> Result<(), BreakError> {
        if !self.jumps.in_loop() {
            return Err(BreakError::NotInLoop);
        }
        let label = self.emit_placeholder(JumpIntent::Continue);
        self.jumps.add_continue(label);
        Ok(())
    }

    /// Number of iterators the open loops keep on the operand stack.
    pub fn open_iterators(&self) -> usize {
        self.jumps.open_iterators()
    }

    // ==========================================================================
    // Returns
    // ==========================================================================

    /// Emit `RETURN` for a return statement.
    pub fn emit_return(&mut self) {
        self.has_return = true;
        self.emit(Instruction::Return);
    }

    /// Whether a return statement was emitted.
    pub fn has_return(&self) -> bool {
        self.has_return
    }

    /// Finish and return the instruction list.
    pub fn finish(self) -> Vec<Instruction> {
        self.code
    }
}
