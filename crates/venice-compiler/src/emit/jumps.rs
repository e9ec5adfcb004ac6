//! Loop bookkeeping for break and continue.
//!
//! Each open loop records the placeholders emitted for its `break` and
//! `continue` statements. They are patched together when the loop closes,
//! once the loop's exit is known.

use super::JumpLabel;

/// Tracks the open loops of one function.
#[derive(Debug, Default)]
pub struct JumpManager {
    /// Open loops, innermost last
    loops: Vec<LoopContext>,
}

/// One open loop.
#[derive(Debug)]
pub struct LoopContext {
    /// Where `continue` resumes
    pub continue_target: usize,
    /// Whether the loop keeps an iterator on the operand stack
    pub holds_iterator: bool,
    /// Pending `break` placeholders
    pub breaks: Vec<JumpLabel>,
    /// Pending `continue` placeholders
    pub continues: Vec<JumpLabel>,
}

impl JumpManager {
    /// Create a new jump manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a loop.
    pub fn enter_loop(&mut self, continue_target: usize, holds_iterator: bool) {
        self.loops.push(LoopContext {
            continue_target,
            holds_iterator,
            breaks: Vec::new(),
            continues: Vec::new(),
        });
    }

    /// Close the innermost loop and hand back its pending placeholders.
    pub fn exit_loop(&mut self) -> Option<LoopContext> {
        self.loops.pop()
    }

    /// Whether any loop is open.
    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }

    /// Record a `break` placeholder for the innermost loop. Callers check
    /// [`in_loop`](Self::in_loop) first.
    pub fn add_break(&mut self, label: JumpLabel) {
        if let Some(ctx) = self.loops.last_mut() {
            ctx.breaks.push(label);
        }
    }

    /// Record a `continue` placeholder for the innermost loop. Callers check
    /// [`in_loop`](Self::in_loop) first.
    pub fn add_continue(&mut self, label: JumpLabel) {
        if let Some(ctx) = self.loops.last_mut() {
            ctx.continues.push(label);
        }
    }

    /// Number of open loops that keep an iterator on the stack.
    pub fn open_iterators(&self) -> usize {
        self.loops.iter().filter(|ctx| ctx.holds_iterator).count()
    }
}
