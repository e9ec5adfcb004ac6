//! Call frames.
//!
//! A frame holds the code of one active call, its instruction pointer, its
//! operand stack and, for user functions, its local bindings.

use venice_compiler::Instruction;
use venice_core::RuntimeError;

use super::environment::Environment;
use super::value::Value;

/// One active call.
///
/// Every call owns its operand stack. The entry function has no local
/// environment: its bindings are the globals.
#[derive(Debug)]
pub(crate) struct StackFrame<'p> {
    /// Function name, for tracing
    pub(crate) function: &'p str,
    pub(crate) code: &'p [Instruction],
    /// Index of the next instruction
    pub(crate) ip: usize,
    pub(crate) stack: Vec<Value>,
    pub(crate) locals: Option<Environment>,
}

impl<'p> StackFrame<'p> {
    /// Frame for the entry function.
    pub(crate) fn entry(function: &'p str, code: &'p [Instruction]) -> Self {
        Self {
            function,
            code,
            ip: 0,
            stack: Vec::new(),
            locals: None,
        }
    }

    /// Frame for a called function with its initial stack.
    pub(crate) fn call(function: &'p str, code: &'p [Instruction], stack: Vec<Value>) -> Self {
        Self {
            function,
            code,
            ip: 0,
            stack,
            locals: Some(Environment::new()),
        }
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub(crate) fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or_else(|| RuntimeError::internal(format!("stack underflow in {}", self.function)))
    }

    pub(crate) fn peek(&self) -> Result<&Value, RuntimeError> {
        self.stack
            .last()
            .ok_or_else(|| RuntimeError::internal(format!("stack underflow in {}", self.function)))
    }

    /// Move to `offset` instructions from the one just executed.
    pub(crate) fn jump(&mut self, offset: i64) -> Result<(), RuntimeError> {
        let from = self.ip as i64 - 1;
        let target = from + offset;
        if target < 0 || target as usize > self.code.len() {
            return Err(RuntimeError::internal(format!(
                "jump from {from} by {offset} leaves {}",
                self.function
            )));
        }
        self.ip = target as usize;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jumps_are_relative_to_the_jumping_instruction() {
        let code = vec![Instruction::PopTop; 4];
        let mut frame = StackFrame::entry("main", &code);
        frame.ip = 2;
        frame.jump(3).unwrap();
        assert_eq!(frame.ip, 4);
        frame.jump(-2).unwrap();
        assert_eq!(frame.ip, 1);
        assert!(frame.jump(-5).is_err());
        assert!(frame.jump(10).is_err());
    }

    #[test]
    fn empty_stack_is_an_internal_error() {
        let mut frame = StackFrame::call("f", &[], Vec::new());
        let err = frame.pop().unwrap_err();
        assert!(!err.is_panic());
        frame.push(Value::Integer(1));
        assert_eq!(frame.peek().unwrap(), &Value::Integer(1));
    }
}
