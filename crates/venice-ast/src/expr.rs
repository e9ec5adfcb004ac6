//! Expression nodes.
//!
//! Operators are kept as written (`"+"`, `"and"`, `"++"`); the compiler
//! resolves them and rejects any it does not know.

use crate::Ident;
use venice_core::Span;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value
    Literal(LiteralExpr<'ast>),
    /// Name reference
    Symbol(Ident<'ast>),
    /// Function or method call
    Call(&'ast CallExpr<'ast>),
    /// Field or method access (`obj.name`)
    Field(&'ast FieldExpr<'ast>),
    /// Index access (`xs[i]`, `m[k]`, `s[i]`)
    Index(&'ast IndexExpr<'ast>),
    /// Tuple element access (`t.0`)
    TupleField(&'ast TupleFieldExpr<'ast>),
    /// Binary operation
    Infix(&'ast InfixExpr<'ast>),
    /// Prefix operation
    Unary(&'ast UnaryExpr<'ast>),
    /// `cond ? a : b`
    Ternary(&'ast TernaryExpr<'ast>),
    /// `[a, b, c]`
    List(ListExpr<'ast>),
    /// `{k: v, ...}`
    Map(MapExpr<'ast>),
    /// `(a, b)`
    Tuple(TupleExpr<'ast>),
    /// `Scope::name`, an enum case or an imported module member
    Qualified(QualifiedExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Symbol(e) => e.span,
            Self::Call(e) => e.span,
            Self::Field(e) => e.span,
            Self::Index(e) => e.span,
            Self::TupleField(e) => e.span,
            Self::Infix(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Ternary(e) => e.span,
            Self::List(e) => e.span,
            Self::Map(e) => e.span,
            Self::Tuple(e) => e.span,
            Self::Qualified(e) => e.span,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    /// The literal kind
    pub kind: LiteralKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The kind of literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    /// Integer literal
    Int(i64),
    /// Real number literal
    Real(f64),
    /// String literal, escapes already processed
    String(&'ast str),
    /// Boolean literal
    Bool(bool),
    /// Character literal
    Char(u8),
}

/// A call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    /// The callee (any expression)
    pub callee: &'ast Expr<'ast>,
    /// Arguments in source order
    pub args: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// Field or method access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldExpr<'ast> {
    /// The object
    pub object: &'ast Expr<'ast>,
    /// The member name
    pub field: Ident<'ast>,
    /// Source location
    pub span: Span,
}

/// Index access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    /// The container
    pub object: &'ast Expr<'ast>,
    /// The index or key
    pub index: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// Tuple element access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TupleFieldExpr<'ast> {
    /// The tuple
    pub object: &'ast Expr<'ast>,
    /// Zero-based element position
    pub index: usize,
    /// Source location
    pub span: Span,
}

/// A binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfixExpr<'ast> {
    /// Left operand
    pub left: &'ast Expr<'ast>,
    /// Operator as written
    pub op: &'ast str,
    /// Right operand
    pub right: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A prefix operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    /// Operator as written (`-`, `not`)
    pub op: &'ast str,
    /// Operand
    pub operand: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A ternary conditional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TernaryExpr<'ast> {
    /// Condition
    pub condition: &'ast Expr<'ast>,
    /// Value when true
    pub then_expr: &'ast Expr<'ast>,
    /// Value when false
    pub else_expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A list literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListExpr<'ast> {
    /// Elements in source order
    pub items: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A map literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExpr<'ast> {
    /// Entries in source order
    pub entries: &'ast [MapEntry<'ast>],
    /// Source location
    pub span: Span,
}

/// One `key: value` entry of a map literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapEntry<'ast> {
    /// Key
    pub key: Expr<'ast>,
    /// Value
    pub value: Expr<'ast>,
}

/// A tuple literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TupleExpr<'ast> {
    /// Elements in source order
    pub items: &'ast [Expr<'ast>],
    /// Source location
    pub span: Span,
}

/// A qualified name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualifiedExpr<'ast> {
    /// Enum or module alias
    pub scope: Ident<'ast>,
    /// Case label or member name
    pub name: Ident<'ast>,
    /// Source location
    pub span: Span,
}
