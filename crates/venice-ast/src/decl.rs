//! Declaration nodes: functions, classes, enums, and imports.
//!
//! Declarations are only valid at module level. Their names are registered
//! before any body is compiled, so declarations may refer to each other in
//! any order.

use crate::stmt::Block;
use crate::types::TypeExpr;
use crate::{Ident, Visibility};
use venice_core::Span;

/// A function declaration.
///
/// Example: `func first<T>(xs: list<T>) -> Optional<T> { ... }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    /// Function name
    pub name: Ident<'ast>,
    /// Generic parameter names
    pub generics: &'ast [Ident<'ast>],
    /// Parameters
    pub params: &'ast [Param<'ast>],
    /// Return type, absent for void
    pub return_type: Option<&'ast TypeExpr<'ast>>,
    /// Body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// A function parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    /// Parameter name
    pub name: Ident<'ast>,
    /// Declared type
    pub ty: TypeExpr<'ast>,
    /// Source location
    pub span: Span,
}

/// A class declaration.
///
/// ```text
/// class Account {
///     public owner: string
///     private balance: int
///
///     public func deposit(amount: int) { self.balance = self.balance + amount }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDecl<'ast> {
    /// Class name
    pub name: Ident<'ast>,
    /// Fields in declaration order
    pub fields: &'ast [FieldDecl<'ast>],
    /// Methods; each receives `self` implicitly
    pub methods: &'ast [MethodDecl<'ast>],
    /// Source location
    pub span: Span,
}

/// A class field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    /// Field name
    pub name: Ident<'ast>,
    /// Field type
    pub ty: TypeExpr<'ast>,
    /// Visibility
    pub visibility: Visibility,
    /// Source location
    pub span: Span,
}

/// A class method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MethodDecl<'ast> {
    /// Visibility
    pub visibility: Visibility,
    /// The method as a function; `self` is not listed in its parameters
    pub function: FunctionDecl<'ast>,
}

/// An enum declaration.
///
/// Example: `enum Tree<T> { Leaf(T), Node(Tree<T>, Tree<T>), Empty }`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumDecl<'ast> {
    /// Enum name
    pub name: Ident<'ast>,
    /// Generic parameter names
    pub generics: &'ast [Ident<'ast>],
    /// Cases in declaration order
    pub cases: &'ast [EnumCaseDecl<'ast>],
    /// Source location
    pub span: Span,
}

/// One enum case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnumCaseDecl<'ast> {
    /// Case label
    pub label: Ident<'ast>,
    /// Payload types, empty for a bare case
    pub payload: &'ast [TypeExpr<'ast>],
    /// Source location
    pub span: Span,
}

/// `import "path" as Alias`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportDecl<'ast> {
    /// Path handed to the module loader
    pub path: &'ast str,
    /// Name the module's members are reached through
    pub alias: Ident<'ast>,
    /// Source location
    pub span: Span,
}
