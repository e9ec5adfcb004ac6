//! The Venice virtual machine.
//!
//! A [`Vm`] runs one [`CompiledProgram`]. Calls do not share an operand
//! stack: `CALL_FUNCTION` moves the arguments off the caller's stack into a
//! fresh stack frame with its own stack and local environment, and
//! `RETURN` pushes at most one value back onto the caller's stack. Frames
//! live on an explicit call stack, so deep Venice recursion is bounded by
//! [`VmConfig::max_call_depth`] rather than the host stack.
//!
//! # Example
//!
//! ```
//! use venice::vm::{Value, Vm};
//! use venice_compiler::{CompiledProgram, Instruction};
//!
//! let mut program = CompiledProgram::new(1);
//! program.insert_function(
//!     "main",
//!     vec![
//!         Instruction::PushConstInt(1),
//!         Instruction::PushConstInt(2),
//!         Instruction::BinaryAdd,
//!         Instruction::StoreName("x".to_string()),
//!     ],
//! );
//!
//! let mut vm = Vm::new(&program);
//! vm.run("main").unwrap();
//! assert_eq!(vm.global("x"), Some(&Value::Integer(3)));
//! ```

mod builtins;
mod environment;
mod frame;
mod ops;
pub mod value;

pub use environment::Environment;
pub use value::{BoundMethod, ClassObject, Element, EnumObject, Value, ValueIter, VeniceMap};

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use venice_compiler::{CompiledProgram, FunctionRef, Instruction};
use venice_core::RuntimeError;

use environment::Scope;
use frame::StackFrame;

type Result<T> = std::result::Result<T, RuntimeError>;

/// Virtual machine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Deepest call stack allowed, counting the entry function.
    pub max_call_depth: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum VmState {
    Running,
    Finished(Option<Value>),
}

/// Executes a compiled program.
pub struct Vm<'p> {
    program: &'p CompiledProgram,
    config: VmConfig,
    call_stack: Vec<StackFrame<'p>>,
    globals: Environment,
    output: Box<dyn Write + 'p>,
}

impl<'p> Vm<'p> {
    /// A VM with default settings that prints to stdout.
    pub fn new(program: &'p CompiledProgram) -> Self {
        Self {
            program,
            config: VmConfig::default(),
            call_stack: Vec::new(),
            globals: Environment::new(),
            output: Box::new(io::stdout()),
        }
    }

    /// Use `config` instead of the defaults.
    pub fn with_config(mut self, config: VmConfig) -> Self {
        self.config = config;
        self
    }

    /// Send `print` output to `output`.
    pub fn with_output(mut self, output: impl Write + 'p) -> Self {
        self.output = Box::new(output);
        self
    }

    /// A module-level binding, after [`Vm::run`].
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Run `entry` to completion and return its result, if any.
    ///
    /// The entry function binds its names in the global environment, so
    /// they stay readable through [`Vm::global`] afterwards.
    pub fn run(&mut self, entry: &str) -> Result<Option<Value>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("Vm::run");

        let (function, code) = self
            .program
            .functions
            .get_key_value(entry)
            .ok_or_else(|| RuntimeError::internal(format!("no function named '{entry}'")))?;
        self.call_stack.clear();
        self.call_stack.push(StackFrame::entry(function, code));

        let result = self.execute();
        if let Err(error) = &result {
            tracing::debug!(%error, depth = self.call_stack.len(), "execution aborted");
            self.call_stack.clear();
        }
        result
    }

    fn execute(&mut self) -> Result<Option<Value>> {
        loop {
            let frame = self.current_frame_mut()?;
            let code = frame.code;
            let Some(instruction) = code.get(frame.ip) else {
                // Falling off the end returns like RETURN
                let result = frame.stack.pop();
                if let VmState::Finished(result) = self.return_from_call(result)? {
                    return Ok(result);
                }
                continue;
            };
            tracing::trace!(
                function = frame.function,
                ip = frame.ip,
                opcode = instruction.opcode(),
                "execute"
            );
            frame.ip += 1;

            if let VmState::Finished(result) = self.execute_instruction(instruction)? {
                return Ok(result);
            }
        }
    }

    fn current_frame(&self) -> Result<&StackFrame<'p>> {
        self.call_stack
            .last()
            .ok_or_else(|| RuntimeError::internal("call stack is empty"))
    }

    fn current_frame_mut(&mut self) -> Result<&mut StackFrame<'p>> {
        self.call_stack
            .last_mut()
            .ok_or_else(|| RuntimeError::internal("call stack is empty"))
    }

    fn push(&mut self, value: Value) -> Result<()> {
        self.current_frame_mut()?.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value> {
        self.current_frame_mut()?.pop()
    }

    fn scope(&mut self) -> Result<Scope<'_>> {
        let frame = self
            .call_stack
            .last_mut()
            .ok_or_else(|| RuntimeError::internal("call stack is empty"))?;
        Ok(Scope {
            locals: frame.locals.as_mut(),
            globals: &mut self.globals,
        })
    }

    fn execute_instruction(&mut self, instruction: &'p Instruction) -> Result<VmState> {
        use Instruction::*;

        match instruction {
            BinaryAdd | BinarySub | BinaryMul | BinaryModulo | BinaryRealAdd | BinaryRealSub
            | BinaryRealMul | BinaryRealDiv | BinaryConcat | BinaryEq | BinaryNotEq | BinaryLt
            | BinaryLtEq | BinaryGt | BinaryGtEq | BinaryIn | BinaryListIndex
            | BinaryMapIndex | BinaryStringIndex => {
                let right = self.pop()?;
                let left = self.pop()?;
                let result = ops::binary(instruction, left, right)?;
                self.push(result)?;
            }

            UnaryMinus | UnaryNot => {
                let operand = self.pop()?;
                let result = ops::unary(instruction, operand)?;
                self.push(result)?;
            }

            BuildClass(class, n) => {
                let fields = self.pop_n(*n)?;
                self.push(Value::object(class.as_str(), fields))?;
            }

            BuildList(n) => {
                let items = self.pop_n(*n)?;
                self.push(Value::list(items))?;
            }

            BuildMap(n) => {
                let mut map = VeniceMap::new();
                for _ in 0..*n {
                    let value = self.pop()?;
                    let key = self.pop()?;
                    map.insert(key, value);
                }
                self.push(Value::map(map))?;
            }

            BuildTuple(n) => {
                let items = self.pop_n(*n)?;
                self.push(Value::tuple(items))?;
            }

            PushEnum(label, n) => {
                let payload = self.pop_n(*n)?;
                self.push(Value::enum_case(label.as_str(), payload))?;
            }

            CallFunction(n) => {
                let callee = self.pop()?;
                let args = self.pop_n(*n)?;
                match callee {
                    Value::Function(function) => self.call(&function, None, args)?,
                    Value::BoundMethod(method) => {
                        self.call(&method.function, Some(method.receiver.clone()), args)?
                    }
                    other => {
                        return Err(RuntimeError::internal(format!(
                            "cannot call {}",
                            other.kind()
                        )));
                    }
                }
            }

            LookupMethod(function) => {
                let receiver = self.pop()?;
                self.push(Value::BoundMethod(Rc::new(BoundMethod {
                    function: function.clone(),
                    receiver,
                })))?;
            }

            PushConstFunction(function) => self.push(Value::Function(function.clone()))?,

            Return => {
                let result = self.current_frame_mut()?.stack.pop();
                return self.return_from_call(result);
            }

            CheckLabel(label) => {
                let matches = self.current_frame()?.peek()?.as_enum()?.label == *label;
                self.push(Value::Boolean(matches))?;
            }

            PushEnumIndex(i) => {
                let item = self
                    .current_frame()?
                    .peek()?
                    .as_enum()?
                    .payload
                    .get(*i)
                    .cloned()
                    .ok_or_else(|| RuntimeError::internal(format!("enum has no payload {i}")))?;
                self.push(item)?;
            }

            DupTop => {
                let top = self.current_frame()?.peek()?.clone();
                self.push(top)?;
            }

            PopTop => {
                self.pop()?;
            }

            GetIter => {
                let iterable = self.pop()?;
                let iter = ValueIter::over(&iterable)?;
                self.push(Value::Iterator(Rc::new(RefCell::new(iter))))?;
            }

            ForIter(offset) => {
                let frame = self.current_frame_mut()?;
                let next = match frame.peek()? {
                    Value::Iterator(iter) => iter.borrow_mut().next(),
                    other => {
                        return Err(RuntimeError::internal(format!(
                            "FOR_ITER on {}",
                            other.kind()
                        )));
                    }
                };
                match next {
                    Some(Element::Item(item)) => frame.push(item),
                    Some(Element::Entry(key, value)) => {
                        frame.push(value);
                        frame.push(key);
                    }
                    None => {
                        frame.pop()?;
                        frame.jump(*offset)?;
                    }
                }
            }

            UnpackTuple => {
                let items = match self.pop()? {
                    Value::Tuple(items) => items,
                    other => {
                        return Err(RuntimeError::internal(format!(
                            "cannot unpack {}",
                            other.kind()
                        )));
                    }
                };
                let frame = self.current_frame_mut()?;
                for item in items.iter().rev() {
                    frame.push(item.clone());
                }
            }

            PushConstBool(b) => self.push(Value::Boolean(*b))?,
            PushConstInt(i) => self.push(Value::Integer(*i))?,
            PushConstReal(r) => self.push(Value::RealNumber(r.into_inner()))?,
            PushConstStr(s) => self.push(Value::string(s.as_str()))?,
            PushConstChar(c) => self.push(Value::Character(*c))?,

            // A function may run before a global it reads has been bound.
            PushName(name) => {
                let value = self.scope()?.lookup(name).cloned().ok_or_else(|| {
                    RuntimeError::panic(format!("name '{name}' read before assignment"))
                })?;
                self.push(value)?;
            }

            StoreName(name) => {
                let value = self.pop()?;
                self.scope()?.store(name, value);
            }

            StoreGlobal(name) => {
                let value = self.pop()?;
                self.globals.put(name, value);
            }

            PushField(i) => {
                let object = match self.pop()? {
                    Value::ClassObject(object) => object,
                    other => {
                        return Err(RuntimeError::internal(format!(
                            "PUSH_FIELD on {}",
                            other.kind()
                        )));
                    }
                };
                let field = object.fields.borrow().get(*i).cloned();
                let field =
                    field.ok_or_else(|| RuntimeError::internal(format!("object has no field {i}")))?;
                self.push(field)?;
            }

            PushTupleField(i) => {
                let items = match self.pop()? {
                    Value::Tuple(items) => items,
                    other => {
                        return Err(RuntimeError::internal(format!(
                            "PUSH_TUPLE_FIELD on {}",
                            other.kind()
                        )));
                    }
                };
                let item = items
                    .get(*i)
                    .cloned()
                    .ok_or_else(|| RuntimeError::internal(format!("tuple has no item {i}")))?;
                self.push(item)?;
            }

            StoreField(i) => {
                let object = match self.pop()? {
                    Value::ClassObject(object) => object,
                    other => {
                        return Err(RuntimeError::internal(format!(
                            "STORE_FIELD on {}",
                            other.kind()
                        )));
                    }
                };
                let value = self.pop()?;
                let mut fields = object.fields.borrow_mut();
                let slot = fields
                    .get_mut(*i)
                    .ok_or_else(|| RuntimeError::internal(format!("object has no field {i}")))?;
                *slot = value;
            }

            StoreIndex => {
                let index = self.pop()?.as_int()?;
                let list = self.pop()?;
                let value = self.pop()?;
                let mut items = list.as_list()?.borrow_mut();
                let index = ops::checked_index(index, items.len())?;
                items[index] = value;
            }

            StoreMapIndex => {
                let key = self.pop()?;
                let map = self.pop()?;
                let value = self.pop()?;
                map.as_map()?.borrow_mut().insert(key, value);
            }

            RelJump(offset) => self.current_frame_mut()?.jump(*offset)?,

            RelJumpIfFalse(offset) => {
                if !self.pop()?.as_bool()? {
                    self.current_frame_mut()?.jump(*offset)?;
                }
            }

            RelJumpIfFalseOrPop(offset) => {
                let frame = self.current_frame_mut()?;
                if frame.peek()?.as_bool()? {
                    frame.pop()?;
                } else {
                    frame.jump(*offset)?;
                }
            }

            RelJumpIfTrueOrPop(offset) => {
                let frame = self.current_frame_mut()?;
                if frame.peek()?.as_bool()? {
                    frame.jump(*offset)?;
                } else {
                    frame.pop()?;
                }
            }

            Placeholder => {
                return Err(RuntimeError::internal("unpatched jump placeholder"));
            }
        }

        Ok(VmState::Running)
    }

    /// Pop `n` values; the first popped is element 0.
    fn pop_n(&mut self, n: usize) -> Result<Vec<Value>> {
        let frame = self.current_frame_mut()?;
        let mut values = Vec::with_capacity(n);
        for _ in 0..n {
            values.push(frame.pop()?);
        }
        Ok(values)
    }

    /// Call `function`. A builtin runs immediately; a user function gets a
    /// new frame whose stack holds the arguments with argument 0 on top,
    /// and the receiver above them.
    fn call(&mut self, function: &FunctionRef, receiver: Option<Value>, args: Vec<Value>) -> Result<()> {
        match function {
            FunctionRef::Builtin(builtin) => {
                let args = receiver.into_iter().chain(args).collect();
                if let Some(result) = builtins::call(*builtin, args, &mut *self.output)? {
                    self.push(result)?;
                }
            }
            FunctionRef::User(name) => {
                if self.call_stack.len() >= self.config.max_call_depth {
                    return Err(RuntimeError::panic("call stack overflow"));
                }
                let (function, code) = self
                    .program
                    .functions
                    .get_key_value(name.as_str())
                    .ok_or_else(|| RuntimeError::internal(format!("no function named '{name}'")))?;

                let mut stack: Vec<Value> = args.into_iter().rev().collect();
                stack.extend(receiver);
                tracing::trace!(function = %function, depth = self.call_stack.len() + 1, "call");
                self.call_stack.push(StackFrame::call(function, code, stack));
            }
        }
        Ok(())
    }

    /// Discard the current frame and hand `result` to the caller.
    fn return_from_call(&mut self, result: Option<Value>) -> Result<VmState> {
        let finished = self
            .call_stack
            .pop()
            .ok_or_else(|| RuntimeError::internal("return with an empty call stack"))?;
        tracing::trace!(
            function = finished.function,
            depth = self.call_stack.len(),
            "return"
        );

        match self.call_stack.last_mut() {
            Some(caller) => {
                caller.stack.extend(result);
                Ok(VmState::Running)
            }
            None => Ok(VmState::Finished(result)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use venice_compiler::ENTRY_FUNCTION;
    use venice_core::Builtin;

    fn program(functions: Vec<(&str, Vec<Instruction>)>) -> CompiledProgram {
        let mut program = CompiledProgram::new(1);
        for (name, code) in functions {
            program.insert_function(name, code);
        }
        program
    }

    fn user(name: &str) -> Instruction {
        Instruction::PushConstFunction(FunctionRef::User(name.to_string()))
    }

    fn name(s: &str) -> String {
        s.to_string()
    }

    #[test]
    fn arguments_arrive_in_declaration_order() {
        // sub(a, b) = a - b, called as sub(10, 3)
        let program = program(vec![
            (
                ENTRY_FUNCTION,
                vec![
                    Instruction::PushConstInt(3),
                    Instruction::PushConstInt(10),
                    user("sub"),
                    Instruction::CallFunction(2),
                    Instruction::StoreName(name("r")),
                ],
            ),
            (
                "sub",
                vec![
                    Instruction::StoreName(name("a")),
                    Instruction::StoreName(name("b")),
                    Instruction::PushName(name("a")),
                    Instruction::PushName(name("b")),
                    Instruction::BinarySub,
                    Instruction::Return,
                ],
            ),
        ]);
        let mut vm = Vm::new(&program);
        vm.run(ENTRY_FUNCTION).unwrap();
        assert_eq!(vm.global("r"), Some(&Value::Integer(7)));
        assert_eq!(vm.global("a"), None);
    }

    #[test]
    fn bound_methods_receive_self_on_top() {
        let program = program(vec![
            (
                ENTRY_FUNCTION,
                vec![
                    Instruction::PushConstInt(5),
                    user("Counter"),
                    Instruction::CallFunction(1),
                    Instruction::StoreName(name("c")),
                    Instruction::PushConstInt(2),
                    Instruction::PushName(name("c")),
                    Instruction::LookupMethod(FunctionRef::User(name("Counter__add"))),
                    Instruction::CallFunction(1),
                    Instruction::PushName(name("c")),
                    Instruction::PushField(0),
                    Instruction::Return,
                ],
            ),
            ("Counter", vec![Instruction::BuildClass(name("Counter"), 1), Instruction::Return]),
            (
                "Counter__add",
                vec![
                    Instruction::StoreName(name("self")),
                    Instruction::StoreName(name("n")),
                    Instruction::PushName(name("self")),
                    Instruction::PushField(0),
                    Instruction::PushName(name("n")),
                    Instruction::BinaryAdd,
                    Instruction::PushName(name("self")),
                    Instruction::StoreField(0),
                    Instruction::Return,
                ],
            ),
        ]);
        let mut vm = Vm::new(&program);
        assert_eq!(vm.run(ENTRY_FUNCTION).unwrap(), Some(Value::Integer(7)));
    }

    #[test]
    fn builtin_methods_get_receiver_first() {
        let program = program(vec![(
            ENTRY_FUNCTION,
            vec![
                Instruction::BuildList(0),
                Instruction::StoreName(name("xs")),
                Instruction::PushConstInt(4),
                Instruction::PushName(name("xs")),
                Instruction::LookupMethod(FunctionRef::Builtin(Builtin::ListAppend)),
                Instruction::CallFunction(1),
                Instruction::PushName(name("xs")),
                Instruction::PushConstFunction(FunctionRef::Builtin(Builtin::Print)),
                Instruction::CallFunction(1),
            ],
        )]);
        let mut out = Vec::new();
        let mut vm = Vm::new(&program).with_output(&mut out);
        assert_eq!(vm.run(ENTRY_FUNCTION).unwrap(), None);
        drop(vm);
        assert_eq!(String::from_utf8(out).unwrap(), "[4]\n");
    }

    #[test]
    fn for_iter_walks_map_entries() {
        // for k, v in {"a": 1, "b": 2} { total = total + v }
        let program = program(vec![(
            ENTRY_FUNCTION,
            vec![
                Instruction::PushConstInt(0),
                Instruction::StoreName(name("total")),
                Instruction::PushConstStr(name("b")),
                Instruction::PushConstInt(2),
                Instruction::PushConstStr(name("a")),
                Instruction::PushConstInt(1),
                Instruction::BuildMap(2),
                Instruction::GetIter,
                Instruction::ForIter(9),
                Instruction::StoreName(name("k")),
                Instruction::StoreName(name("v")),
                Instruction::PushName(name("total")),
                Instruction::PushName(name("v")),
                Instruction::BinaryAdd,
                Instruction::StoreName(name("total")),
                Instruction::RelJump(-7),
                Instruction::PopTop,
            ],
        )]);
        let mut vm = Vm::new(&program);
        vm.run(ENTRY_FUNCTION).unwrap();
        assert_eq!(vm.global("total"), Some(&Value::Integer(3)));
        assert_eq!(vm.global("k"), Some(&Value::string("b")));
    }

    #[test]
    fn match_instructions_peek_at_the_scrutinee() {
        let program = program(vec![(
            ENTRY_FUNCTION,
            vec![
                Instruction::PushConstInt(9),
                Instruction::PushEnum(name("Some"), 1),
                Instruction::CheckLabel(name("Some")),
                Instruction::StoreName(name("is_some")),
                Instruction::PushEnumIndex(0),
                Instruction::StoreName(name("inner")),
                Instruction::DupTop,
                Instruction::BinaryEq,
                Instruction::Return,
            ],
        )]);
        let mut vm = Vm::new(&program);
        assert_eq!(vm.run(ENTRY_FUNCTION).unwrap(), Some(Value::Boolean(true)));
        assert_eq!(vm.global("is_some"), Some(&Value::Boolean(true)));
        assert_eq!(vm.global("inner"), Some(&Value::Integer(9)));
    }

    #[test]
    fn short_circuit_jumps_keep_or_pop() {
        let program = program(vec![(
            ENTRY_FUNCTION,
            vec![
                Instruction::PushConstBool(false),
                Instruction::RelJumpIfFalseOrPop(2),
                Instruction::PushConstBool(true),
                Instruction::StoreName(name("and")),
                Instruction::PushConstBool(true),
                Instruction::RelJumpIfTrueOrPop(2),
                Instruction::PushConstBool(false),
                Instruction::StoreName(name("or")),
            ],
        )]);
        let mut vm = Vm::new(&program);
        vm.run(ENTRY_FUNCTION).unwrap();
        assert_eq!(vm.global("and"), Some(&Value::Boolean(false)));
        assert_eq!(vm.global("or"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn stores_into_containers() {
        let program = program(vec![(
            ENTRY_FUNCTION,
            vec![
                Instruction::PushConstInt(0),
                Instruction::BuildList(1),
                Instruction::StoreName(name("xs")),
                Instruction::PushConstInt(5),
                Instruction::PushName(name("xs")),
                Instruction::PushConstInt(0),
                Instruction::StoreIndex,
                Instruction::BuildMap(0),
                Instruction::StoreName(name("m")),
                Instruction::PushConstBool(true),
                Instruction::PushName(name("m")),
                Instruction::PushConstStr(name("k")),
                Instruction::StoreMapIndex,
                Instruction::PushConstInt(1),
                Instruction::PushName(name("xs")),
                Instruction::PushConstInt(3),
                Instruction::StoreIndex,
            ],
        )]);
        let mut vm = Vm::new(&program);
        let err = vm.run(ENTRY_FUNCTION).unwrap_err();
        assert_eq!(err, RuntimeError::panic("index out of bounds"));
        assert_eq!(vm.global("xs"), Some(&Value::list(vec![Value::Integer(5)])));
        let map: VeniceMap = [(Value::string("k"), Value::Boolean(true))].into_iter().collect();
        assert_eq!(vm.global("m"), Some(&Value::map(map)));
    }

    #[test]
    fn unpack_tuple_puts_first_item_on_top() {
        let program = program(vec![(
            ENTRY_FUNCTION,
            vec![
                Instruction::PushConstInt(2),
                Instruction::PushConstInt(1),
                Instruction::BuildTuple(2),
                Instruction::UnpackTuple,
                Instruction::StoreName(name("first")),
                Instruction::StoreName(name("second")),
            ],
        )]);
        let mut vm = Vm::new(&program);
        vm.run(ENTRY_FUNCTION).unwrap();
        assert_eq!(vm.global("first"), Some(&Value::Integer(1)));
        assert_eq!(vm.global("second"), Some(&Value::Integer(2)));
    }

    #[test]
    fn store_global_escapes_the_call() {
        let program = program(vec![
            (ENTRY_FUNCTION, vec![user("set"), Instruction::CallFunction(0)]),
            (
                "set",
                vec![
                    Instruction::PushConstInt(1),
                    Instruction::StoreGlobal(name("g")),
                    Instruction::Return,
                ],
            ),
        ]);
        let mut vm = Vm::new(&program);
        vm.run(ENTRY_FUNCTION).unwrap();
        assert_eq!(vm.global("g"), Some(&Value::Integer(1)));
    }

    #[test]
    fn unbounded_recursion_overflows() {
        let program = program(vec![
            (ENTRY_FUNCTION, vec![user("loop"), Instruction::CallFunction(0)]),
            ("loop", vec![user("loop"), Instruction::CallFunction(0), Instruction::Return]),
        ]);
        let mut vm = Vm::new(&program).with_config(VmConfig { max_call_depth: 50 });
        let err = vm.run(ENTRY_FUNCTION).unwrap_err();
        assert_eq!(err, RuntimeError::panic("call stack overflow"));
    }

    #[test]
    fn contract_violations_are_internal() {
        let cases = vec![
            vec![Instruction::PopTop],
            vec![Instruction::Placeholder],
            vec![Instruction::PushConstInt(1), Instruction::CallFunction(0)],
            vec![Instruction::RelJump(-3)],
        ];
        for code in cases {
            let program = program(vec![(ENTRY_FUNCTION, code)]);
            let err = Vm::new(&program).run(ENTRY_FUNCTION).unwrap_err();
            assert!(!err.is_panic(), "{err}");
        }

        let program = program(vec![]);
        assert!(Vm::new(&program).run("nowhere").is_err());
    }

    #[test]
    fn reading_an_unbound_global_panics() {
        let program = program(vec![
            (
                ENTRY_FUNCTION,
                vec![
                    user("show"),
                    Instruction::CallFunction(0),
                    Instruction::PushConstInt(1),
                    Instruction::StoreName(name("x")),
                ],
            ),
            ("show", vec![Instruction::PushName(name("x")), Instruction::Return]),
        ]);
        let err = Vm::new(&program).run(ENTRY_FUNCTION).unwrap_err();
        assert_eq!(err, RuntimeError::panic("name 'x' read before assignment"));
    }
}
