//! The Venice instruction set.
//!
//! The virtual machine is a stack machine. Instructions pop their operands
//! from the operand stack and push their result back. All control flow uses
//! relative jumps: an offset of `n` moves the instruction pointer `n`
//! instructions forward (or back, if negative) from the jumping instruction.

use std::fmt;

use ordered_float::OrderedFloat;
use venice_core::Builtin;

/// A callable referenced from bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FunctionRef {
    /// A builtin function or method
    Builtin(Builtin),
    /// A function in the program's function map
    User(String),
}

impl FunctionRef {
    /// The name used in bytecode.
    pub fn name(&self) -> &str {
        match self {
            FunctionRef::Builtin(builtin) => builtin.name(),
            FunctionRef::User(name) => name,
        }
    }

    /// Whether this refers to a builtin.
    pub fn is_builtin(&self) -> bool {
        matches!(self, FunctionRef::Builtin(_))
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One bytecode instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    // =========================================================================
    // Arithmetic and comparison
    // =========================================================================
    /// Integer addition.
    BinaryAdd,
    /// Integer subtraction.
    BinarySub,
    /// Integer multiplication.
    BinaryMul,
    /// Integer remainder.
    BinaryModulo,
    /// Real addition.
    BinaryRealAdd,
    /// Real subtraction.
    BinaryRealSub,
    /// Real multiplication.
    BinaryRealMul,
    /// Division; integer operands are widened, the result is always real.
    BinaryRealDiv,
    /// String or list concatenation.
    BinaryConcat,
    /// Structural equality.
    BinaryEq,
    /// Structural inequality.
    BinaryNotEq,
    /// `<`
    BinaryLt,
    /// `<=`
    BinaryLtEq,
    /// `>`
    BinaryGt,
    /// `>=`
    BinaryGtEq,
    /// Membership test. Stack: `[item, container]`.
    BinaryIn,
    /// Stack: `[list, index]`. Out of range panics.
    BinaryListIndex,
    /// Stack: `[map, key]`. Pushes an `Optional`.
    BinaryMapIndex,
    /// Stack: `[string, index]`. Pushes a character.
    BinaryStringIndex,

    // =========================================================================
    // Unary
    // =========================================================================
    /// Negate an integer or real.
    UnaryMinus,
    /// Negate a boolean.
    UnaryNot,

    // =========================================================================
    // Constructors
    // =========================================================================
    /// Pop N field values (first popped is field 0) and build an object.
    BuildClass(String, usize),
    /// Pop N values (first popped is element 0) and build a list.
    BuildList(usize),
    /// Pop N key/value pairs (value, then key) and build a map.
    BuildMap(usize),
    /// Pop N values (first popped is element 0) and build a tuple.
    BuildTuple(usize),
    /// Pop N payload values (first popped is element 0) and build an enum
    /// object with the given case label.
    PushEnum(String, usize),

    // =========================================================================
    // Calls
    // =========================================================================
    /// Pop the callee, then N arguments (first popped is argument 0), and
    /// call it. Pushes the result unless the callee returned nothing.
    CallFunction(usize),
    /// Pop a receiver and push a bound method object.
    LookupMethod(FunctionRef),
    /// Push a function object.
    PushConstFunction(FunctionRef),
    /// Return from the current call with the top of the stack, if any.
    Return,

    // =========================================================================
    // Enum patterns
    // =========================================================================
    /// Peek at an enum object and push whether its label matches.
    CheckLabel(String),
    /// Peek at an enum object and push its i-th payload value.
    PushEnumIndex(usize),

    // =========================================================================
    // Stack
    // =========================================================================
    /// Duplicate the top of the stack.
    DupTop,
    /// Discard the top of the stack.
    PopTop,

    // =========================================================================
    // Iteration
    // =========================================================================
    /// Replace a list, map, or string with an iterator over it.
    GetIter,
    /// Advance the iterator on top of the stack. When it is exhausted, pop it
    /// and jump by the offset; otherwise push the next element (a map pushes
    /// its value, then its key).
    ForIter(i64),
    /// Pop a tuple and push its items, last item first.
    UnpackTuple,

    // =========================================================================
    // Constants
    // =========================================================================
    /// Push a boolean.
    PushConstBool(bool),
    /// Push an integer.
    PushConstInt(i64),
    /// Push a real number.
    PushConstReal(OrderedFloat<f64>),
    /// Push a string.
    PushConstStr(String),
    /// Push a character.
    PushConstChar(u8),

    // =========================================================================
    // Names and fields
    // =========================================================================
    /// Push the value bound to a name, searching the environment chain.
    PushName(String),
    /// Bind the popped value to a name in the current environment.
    StoreName(String),
    /// Bind the popped value to a name in the global environment.
    StoreGlobal(String),
    /// Pop an object and push its i-th field.
    PushField(usize),
    /// Pop a tuple and push its i-th item.
    PushTupleField(usize),
    /// Pop an object, then a value, and store the value in field i.
    StoreField(usize),
    /// Pop an index, a list, and a value, and store the value in the list.
    StoreIndex,
    /// Pop a key, a map, and a value, and store the entry in the map.
    StoreMapIndex,

    // =========================================================================
    // Jumps
    // =========================================================================
    /// Unconditional jump.
    RelJump(i64),
    /// Pop a boolean and jump if it is false.
    RelJumpIfFalse(i64),
    /// Jump if the top is false, keeping it; otherwise pop it.
    RelJumpIfFalseOrPop(i64),
    /// Jump if the top is true, keeping it; otherwise pop it.
    RelJumpIfTrueOrPop(i64),

    /// An unpatched jump. Never present in a finished program.
    Placeholder,
}

impl Instruction {
    /// The opcode name used in the text format.
    pub fn opcode(&self) -> &'static str {
        use Instruction::*;

        match self {
            BinaryAdd => "BINARY_ADD",
            BinarySub => "BINARY_SUB",
            BinaryMul => "BINARY_MUL",
            BinaryModulo => "BINARY_MODULO",
            BinaryRealAdd => "BINARY_REAL_ADD",
            BinaryRealSub => "BINARY_REAL_SUB",
            BinaryRealMul => "BINARY_REAL_MUL",
            BinaryRealDiv => "BINARY_REAL_DIV",
            BinaryConcat => "BINARY_CONCAT",
            BinaryEq => "BINARY_EQ",
            BinaryNotEq => "BINARY_NOT_EQ",
            BinaryLt => "BINARY_LT",
            BinaryLtEq => "BINARY_LT_EQ",
            BinaryGt => "BINARY_GT",
            BinaryGtEq => "BINARY_GT_EQ",
            BinaryIn => "BINARY_IN",
            BinaryListIndex => "BINARY_LIST_INDEX",
            BinaryMapIndex => "BINARY_MAP_INDEX",
            BinaryStringIndex => "BINARY_STRING_INDEX",
            UnaryMinus => "UNARY_MINUS",
            UnaryNot => "UNARY_NOT",
            BuildClass(..) => "BUILD_CLASS",
            BuildList(_) => "BUILD_LIST",
            BuildMap(_) => "BUILD_MAP",
            BuildTuple(_) => "BUILD_TUPLE",
            PushEnum(..) => "PUSH_ENUM",
            CallFunction(_) => "CALL_FUNCTION",
            LookupMethod(_) => "LOOKUP_METHOD",
            PushConstFunction(_) => "PUSH_CONST_FUNCTION",
            Return => "RETURN",
            CheckLabel(_) => "CHECK_LABEL",
            PushEnumIndex(_) => "PUSH_ENUM_INDEX",
            DupTop => "DUP_TOP",
            PopTop => "POP_TOP",
            GetIter => "GET_ITER",
            ForIter(_) => "FOR_ITER",
            UnpackTuple => "UNPACK_TUPLE",
            PushConstBool(_) => "PUSH_CONST_BOOL",
            PushConstInt(_) => "PUSH_CONST_INT",
            PushConstReal(_) => "PUSH_CONST_REAL_NUMBER",
            PushConstStr(_) => "PUSH_CONST_STR",
            PushConstChar(_) => "PUSH_CONST_CHAR",
            PushName(_) => "PUSH_NAME",
            StoreName(_) => "STORE_NAME",
            StoreGlobal(_) => "STORE_GLOBAL",
            PushField(_) => "PUSH_FIELD",
            PushTupleField(_) => "PUSH_TUPLE_FIELD",
            StoreField(_) => "STORE_FIELD",
            StoreIndex => "STORE_INDEX",
            StoreMapIndex => "STORE_MAP_INDEX",
            RelJump(_) => "REL_JUMP",
            RelJumpIfFalse(_) => "REL_JUMP_IF_FALSE",
            RelJumpIfFalseOrPop(_) => "REL_JUMP_IF_FALSE_OR_POP",
            RelJumpIfTrueOrPop(_) => "REL_JUMP_IF_TRUE_OR_POP",
            Placeholder => "PLACEHOLDER",
        }
    }

    /// The relative offset of a jump instruction.
    pub fn jump_offset(&self) -> Option<i64> {
        match self {
            Instruction::RelJump(n)
            | Instruction::RelJumpIfFalse(n)
            | Instruction::RelJumpIfFalseOrPop(n)
            | Instruction::RelJumpIfTrueOrPop(n)
            | Instruction::ForIter(n) => Some(*n),
            _ => None,
        }
    }
}

/// Write a string operand with quotes and escapes.
pub(crate) fn write_quoted(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        f.write_str(self.opcode())?;
        match self {
            BuildClass(name, n) | PushEnum(name, n) => {
                f.write_str(" ")?;
                write_quoted(f, name)?;
                write!(f, " {n}")
            }
            BuildList(n) | BuildMap(n) | BuildTuple(n) | CallFunction(n) | PushEnumIndex(n)
            | PushField(n) | PushTupleField(n) | StoreField(n) => write!(f, " {n}"),
            LookupMethod(func) | PushConstFunction(func) => {
                f.write_str(" ")?;
                write_quoted(f, func.name())?;
                write!(f, " {}", u8::from(func.is_builtin()))
            }
            CheckLabel(s) | PushConstStr(s) | PushName(s) | StoreName(s) | StoreGlobal(s) => {
                f.write_str(" ")?;
                write_quoted(f, s)
            }
            ForIter(n) | RelJump(n) | RelJumpIfFalse(n) | RelJumpIfFalseOrPop(n)
            | RelJumpIfTrueOrPop(n) | PushConstInt(n) => write!(f, " {n}"),
            PushConstBool(b) => write!(f, " {}", u8::from(*b)),
            PushConstReal(r) => write!(f, " {:?}", r.into_inner()),
            PushConstChar(c) => write!(f, " {c}"),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_operands() {
        assert_eq!(Instruction::PushConstInt(-3).to_string(), "PUSH_CONST_INT -3");
        assert_eq!(
            Instruction::StoreName("x".to_string()).to_string(),
            "STORE_NAME \"x\""
        );
        assert_eq!(
            Instruction::BuildClass("Point".to_string(), 2).to_string(),
            "BUILD_CLASS \"Point\" 2"
        );
        assert_eq!(Instruction::PushConstBool(true).to_string(), "PUSH_CONST_BOOL 1");
        assert_eq!(
            Instruction::PushConstReal(OrderedFloat(2.0)).to_string(),
            "PUSH_CONST_REAL_NUMBER 2.0"
        );
        assert_eq!(Instruction::BinaryAdd.to_string(), "BINARY_ADD");
    }

    #[test]
    fn display_function_refs() {
        assert_eq!(
            Instruction::PushConstFunction(FunctionRef::Builtin(Builtin::Int)).to_string(),
            "PUSH_CONST_FUNCTION \"int\" 1"
        );
        assert_eq!(
            Instruction::LookupMethod(FunctionRef::User("Point__norm".to_string())).to_string(),
            "LOOKUP_METHOD \"Point__norm\" 0"
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(
            Instruction::PushConstStr("say \"hi\"\n".to_string()).to_string(),
            "PUSH_CONST_STR \"say \\\"hi\\\"\\n\""
        );
    }

    #[test]
    fn jump_offsets() {
        assert_eq!(Instruction::RelJump(-4).jump_offset(), Some(-4));
        assert_eq!(Instruction::ForIter(7).jump_offset(), Some(7));
        assert_eq!(Instruction::PopTop.jump_offset(), None);
    }
}
