//! Error types for every phase of the Venice back end.
//!
//! ## Error Hierarchy
//!
//! ```text
//! VeniceError (top-level wrapper)
//! ├── CompileError   - Type checking and code generation errors
//! │   └── TypeError  - Type resolution and generic binding errors
//! ├── BytecodeError  - Text bytecode parse errors
//! └── RuntimeError   - Internal (bytecode contract) and panic errors
//! ```
//!
//! The compiler stops at the first error; no phase attempts recovery.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Type Errors
// ============================================================================

/// Errors raised by type resolution and generic matching.
///
/// These carry no location of their own; the compiler wraps them in
/// [`CompileError::Type`] together with the span of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A type name is not bound in the type-symbol table.
    #[error("unknown type '{name}'")]
    UnknownType {
        /// The name that failed to resolve.
        name: String,
    },

    /// A generic parameter was bound to two incompatible types.
    #[error("generic parameter '{name}' bound to both {first} and {second}")]
    GenericConflict {
        /// The generic parameter.
        name: String,
        /// The type it was first bound to.
        first: String,
        /// The incompatible type seen later.
        second: String,
    },

    /// A generic parameter is used in a result type but no argument bound it.
    #[error("generic parameter '{name}' cannot be inferred")]
    UnboundGeneric {
        /// The unbound parameter.
        name: String,
    },

    /// A generic type was given the wrong number of type arguments.
    #[error("type '{name}' expects {expected} type argument(s), got {found}")]
    TypeArgCount {
        /// The generic type.
        name: String,
        /// Declared generic parameter count.
        expected: usize,
        /// Count written at the use site.
        found: usize,
    },
}

// ============================================================================
// Compile Errors
// ============================================================================

/// Errors that abort compilation of a Venice module.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A name is not bound in any enclosing scope.
    #[error("at {span}: undefined symbol '{name}'")]
    UndefinedSymbol {
        /// The unresolved name.
        name: String,
        /// Where it was referenced.
        span: Span,
    },

    /// A name was declared twice in the same scope.
    #[error("at {span}: symbol '{name}' is already declared in this scope")]
    DuplicateSymbol {
        /// The redeclared name.
        name: String,
        /// Where the second declaration occurred.
        span: Span,
    },

    /// Two types that must agree do not.
    #[error("at {span}: type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type required by context.
        expected: String,
        /// The type actually produced.
        found: String,
        /// Where the mismatch occurred.
        span: Span,
    },

    /// A call passed the wrong number of arguments.
    #[error("at {span}: wrong number of arguments: expected {expected}, found {found}")]
    WrongArgCount {
        /// Declared parameter count.
        expected: usize,
        /// Arguments at the call site.
        found: usize,
        /// The call.
        span: Span,
    },

    /// A call argument does not match its parameter type.
    #[error("at {span}: wrong function parameter type for argument {index}: expected {expected}, found {found}")]
    WrongArgType {
        /// Zero-based argument position.
        index: usize,
        /// Declared parameter type.
        expected: String,
        /// Argument type.
        found: String,
        /// The argument.
        span: Span,
    },

    /// Assignment to a constant (`let`) binding.
    #[error("at {span}: cannot assign to constant '{name}'")]
    AssignToConst {
        /// The constant.
        name: String,
        /// The assignment.
        span: Span,
    },

    /// Access to a private member from outside its class.
    #[error("at {span}: use of private field or method '{name}'")]
    PrivateFieldOrMethodAccess {
        /// The member.
        name: String,
        /// The access.
        span: Span,
    },

    /// `break` or `continue` outside a loop.
    #[error("at {span}: {keyword} statement outside of loop")]
    BreakOrContinueOutsideLoop {
        /// `break` or `continue`.
        keyword: &'static str,
        /// The statement.
        span: Span,
    },

    /// `return` outside a function body.
    #[error("at {span}: return statement outside of function")]
    ReturnOutsideFunction {
        /// The statement.
        span: Span,
    },

    /// A non-void function body contains no return statement.
    #[error("at {span}: non-void function '{name}' has no return statement")]
    NonVoidFunctionMissingReturn {
        /// The function.
        name: String,
        /// The declaration.
        span: Span,
    },

    /// An operator symbol the language does not define.
    #[error("at {span}: unknown operator '{op}'")]
    UnknownOperator {
        /// The operator as written.
        op: String,
        /// The expression.
        span: Span,
    },

    /// Indexing a value whose type has no index operation.
    #[error("at {span}: type {ty} cannot be indexed")]
    IndexOnNonIndexable {
        /// The indexed type.
        ty: String,
        /// The index expression.
        span: Span,
    },

    /// A type resolution or generic binding failure.
    #[error("at {span}: {source}")]
    Type {
        /// The underlying failure.
        source: TypeError,
        /// Where it occurred.
        span: Span,
    },

    /// An import path reached twice in one import tree.
    #[error("at {span}: module '{path}' is imported more than once")]
    RecursiveImport {
        /// The repeated path.
        path: String,
        /// The import statement.
        span: Span,
    },

    /// The module loader could not provide a module.
    #[error("at {span}: cannot resolve import '{path}'")]
    UnresolvedImport {
        /// The requested path.
        path: String,
        /// The import statement.
        span: Span,
    },

    /// A match statement does not cover every enum case.
    #[error("at {span}: match on {ty} does not cover case(s) {missing}")]
    NonExhaustiveMatch {
        /// The scrutinee type.
        ty: String,
        /// Comma-separated missing labels.
        missing: String,
        /// The match statement.
        span: Span,
    },

    /// A pattern that cannot match the scrutinee's shape.
    #[error("at {span}: {message}")]
    InvalidPattern {
        /// Description of the problem.
        message: String,
        /// The pattern.
        span: Span,
    },

    /// A field or method that the type does not have.
    #[error("at {span}: type {ty} has no member '{name}'")]
    NoSuchMember {
        /// The receiver type.
        ty: String,
        /// The member name.
        name: String,
        /// The access.
        span: Span,
    },

    /// Calling a value that is not a function.
    #[error("at {span}: type {ty} is not callable")]
    NotCallable {
        /// The callee type.
        ty: String,
        /// The call.
        span: Span,
    },

    /// The left side of an assignment is not assignable.
    #[error("at {span}: invalid assignment target")]
    InvalidAssignmentTarget {
        /// The assignment.
        span: Span,
    },

    /// A declaration that may only appear at module level.
    #[error("at {span}: {what} declarations are only allowed at module level")]
    MisplacedDeclaration {
        /// `function`, `class`, `enum`, or `import`.
        what: &'static str,
        /// The declaration.
        span: Span,
    },
}

impl CompileError {
    /// The source location of this error.
    pub fn span(&self) -> Span {
        match self {
            Self::UndefinedSymbol { span, .. }
            | Self::DuplicateSymbol { span, .. }
            | Self::TypeMismatch { span, .. }
            | Self::WrongArgCount { span, .. }
            | Self::WrongArgType { span, .. }
            | Self::AssignToConst { span, .. }
            | Self::PrivateFieldOrMethodAccess { span, .. }
            | Self::BreakOrContinueOutsideLoop { span, .. }
            | Self::ReturnOutsideFunction { span }
            | Self::NonVoidFunctionMissingReturn { span, .. }
            | Self::UnknownOperator { span, .. }
            | Self::IndexOnNonIndexable { span, .. }
            | Self::Type { span, .. }
            | Self::RecursiveImport { span, .. }
            | Self::UnresolvedImport { span, .. }
            | Self::NonExhaustiveMatch { span, .. }
            | Self::InvalidPattern { span, .. }
            | Self::NoSuchMember { span, .. }
            | Self::NotCallable { span, .. }
            | Self::InvalidAssignmentTarget { span }
            | Self::MisplacedDeclaration { span, .. } => *span,
        }
    }
}

impl TypeError {
    /// Attach a location, producing a [`CompileError`].
    pub fn at(self, span: Span) -> CompileError {
        CompileError::Type { source: self, span }
    }
}

// ============================================================================
// Bytecode Errors
// ============================================================================

/// Errors from parsing the text bytecode format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytecodeError {
    /// The first non-empty line is not `version <N>`.
    #[error("line {line}: expected 'version <N>' header")]
    MissingVersion {
        /// 1-indexed line number.
        line: usize,
    },

    /// An opcode mnemonic that is not part of the instruction set.
    #[error("line {line}: unknown opcode '{opcode}'")]
    UnknownOpcode {
        /// 1-indexed line number.
        line: usize,
        /// The mnemonic.
        opcode: String,
    },

    /// An operand is missing, malformed, or of the wrong kind.
    #[error("line {line}: invalid operand for {opcode}: {message}")]
    InvalidOperand {
        /// 1-indexed line number.
        line: usize,
        /// The mnemonic.
        opcode: String,
        /// What went wrong.
        message: String,
    },

    /// A line that fits nowhere in the format.
    #[error("line {line}: unexpected '{text}'")]
    UnexpectedLine {
        /// 1-indexed line number.
        line: usize,
        /// The offending text.
        text: String,
    },
}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Errors that abort execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// The bytecode or operand-stack contract was violated. Unreachable
    /// for compiler-produced programs.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the violation.
        message: String,
    },

    /// A legitimate dynamic failure, such as an out-of-bounds index.
    #[error("panic: {message}")]
    Panic {
        /// The panic message.
        message: String,
    },
}

impl RuntimeError {
    /// Build an [`RuntimeError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        RuntimeError::Internal {
            message: message.into(),
        }
    }

    /// Build a [`RuntimeError::Panic`].
    pub fn panic(message: impl Into<String>) -> Self {
        RuntimeError::Panic {
            message: message.into(),
        }
    }

    /// Whether this is a panic rather than an internal error.
    pub fn is_panic(&self) -> bool {
        matches!(self, RuntimeError::Panic { .. })
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Any error produced while compiling, loading, or running a program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VeniceError {
    /// A compile error.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// A bytecode text error.
    #[error(transparent)]
    Bytecode(#[from] BytecodeError),

    /// A runtime error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_display_includes_span() {
        let err = CompileError::UndefinedSymbol {
            name: "x".to_string(),
            span: Span::new(4, 9, 1),
        };
        assert_eq!(err.to_string(), "at 4:9: undefined symbol 'x'");
        assert_eq!(err.span(), Span::new(4, 9, 1));
    }

    #[test]
    fn type_error_lifts_with_location() {
        let err = TypeError::UnboundGeneric {
            name: "T".to_string(),
        }
        .at(Span::new(2, 1, 0));
        assert_eq!(
            err.to_string(),
            "at 2:1: generic parameter 'T' cannot be inferred"
        );
        assert!(matches!(
            err,
            CompileError::Type {
                source: TypeError::UnboundGeneric { .. },
                ..
            }
        ));
    }

    #[test]
    fn runtime_error_kinds() {
        let panic = RuntimeError::panic("index out of bounds");
        assert!(panic.is_panic());
        assert_eq!(panic.to_string(), "panic: index out of bounds");

        let internal = RuntimeError::internal("stack underflow");
        assert!(!internal.is_panic());
    }

    #[test]
    fn unified_conversion() {
        let err: VeniceError = RuntimeError::panic("boom").into();
        assert!(matches!(err, VeniceError::Runtime(_)));

        let err: VeniceError = BytecodeError::MissingVersion { line: 1 }.into();
        assert_eq!(err.to_string(), "line 1: expected 'version <N>' header");
    }
}
