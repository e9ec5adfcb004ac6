//! Statement nodes.
//!
//! Control flow (if, while, for, match), bindings (let/var, assignment),
//! jumps (return, break, continue), and expression statements. Declarations
//! live in [`crate::decl`].

use crate::decl::{ClassDecl, EnumDecl, FunctionDecl, ImportDecl};
use crate::expr::Expr;
use crate::types::TypeExpr;
use crate::Ident;
use venice_core::Span;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `let x = e` or `var x: T = e`
    Let(LetStmt<'ast>),
    /// `target = e`
    Assign(AssignStmt<'ast>),
    /// `return` or `return e`
    Return(ReturnStmt<'ast>),
    /// If statement with optional else branch
    If(&'ast IfStmt<'ast>),
    /// While loop
    While(&'ast WhileStmt<'ast>),
    /// For-in loop
    For(&'ast ForStmt<'ast>),
    /// Break statement
    Break(BreakStmt),
    /// Continue statement
    Continue(ContinueStmt),
    /// Expression evaluated for its effect
    Expr(ExprStmt<'ast>),
    /// Function declaration
    Function(&'ast FunctionDecl<'ast>),
    /// Class declaration
    Class(&'ast ClassDecl<'ast>),
    /// Enum declaration
    Enum(&'ast EnumDecl<'ast>),
    /// Match statement
    Match(&'ast MatchStmt<'ast>),
    /// Module import
    Import(ImportDecl<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Let(s) => s.span,
            Self::Assign(s) => s.span,
            Self::Return(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
            Self::Break(s) => s.span,
            Self::Continue(s) => s.span,
            Self::Expr(s) => s.span,
            Self::Function(s) => s.span,
            Self::Class(s) => s.span,
            Self::Enum(s) => s.span,
            Self::Match(s) => s.span,
            Self::Import(s) => s.span,
        }
    }
}

/// A brace-delimited statement list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    /// Statements in the block
    pub stmts: &'ast [Stmt<'ast>],
    /// Source location
    pub span: Span,
}

/// A binding declaration.
///
/// Examples:
/// - `let x = 5` (constant)
/// - `var total: int = 0` (mutable, with type hint)
/// - `let names: list<string> = []`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetStmt<'ast> {
    /// Bound name
    pub name: Ident<'ast>,
    /// Optional type hint
    pub ty: Option<&'ast TypeExpr<'ast>>,
    /// `var` (true) or `let` (false)
    pub mutable: bool,
    /// Initializer
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// An assignment to a name, list element, map entry, or field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignStmt<'ast> {
    /// Assignment target
    pub target: &'ast Expr<'ast>,
    /// New value
    pub value: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A return statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    /// Optional return value
    pub value: Option<&'ast Expr<'ast>>,
    /// Source location
    pub span: Span,
}

/// An if statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    /// Condition, must be `bool`
    pub condition: &'ast Expr<'ast>,
    /// Taken when the condition holds
    pub body: Block<'ast>,
    /// Optional `else` or `else if`
    pub else_branch: Option<ElseBranch<'ast>>,
    /// Source location
    pub span: Span,
}

/// The tail of an if statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElseBranch<'ast> {
    /// `else if ...`
    If(&'ast IfStmt<'ast>),
    /// `else { ... }`
    Block(Block<'ast>),
}

/// A while loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    /// Loop condition
    pub condition: &'ast Expr<'ast>,
    /// Loop body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// A for-in loop.
///
/// Examples:
/// - `for x in xs { }`
/// - `for key, value in m { }`
/// - `for name, age in pairs { }` over a `list<(string, int)>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForStmt<'ast> {
    /// Loop variables in declaration order
    pub variables: &'ast [Ident<'ast>],
    /// The iterated value
    pub iterable: &'ast Expr<'ast>,
    /// Loop body
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// A break statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakStmt {
    /// Source location
    pub span: Span,
}

/// A continue statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinueStmt {
    /// Source location
    pub span: Span,
}

/// An expression statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    /// The expression
    pub expr: &'ast Expr<'ast>,
    /// Source location
    pub span: Span,
}

/// A match statement over an enum value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchStmt<'ast> {
    /// The matched value
    pub scrutinee: &'ast Expr<'ast>,
    /// Clauses tried in order
    pub clauses: &'ast [MatchClause<'ast>],
    /// Taken when no clause matches
    pub default: Option<Block<'ast>>,
    /// Source location
    pub span: Span,
}

/// One `case pattern { body }` clause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchClause<'ast> {
    /// The pattern
    pub pattern: Pattern<'ast>,
    /// Body run when the pattern matches
    pub body: Block<'ast>,
    /// Source location
    pub span: Span,
}

/// A match pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern<'ast> {
    /// `Label(p1, p2)` or `Enum::Label(p1, p2)`
    Compound(&'ast CompoundPattern<'ast>),
    /// A binding that always matches
    Symbol(Ident<'ast>),
    /// `_`, matches without binding
    Wildcard(Span),
}

impl<'ast> Pattern<'ast> {
    /// Get the span of this pattern.
    pub fn span(&self) -> Span {
        match self {
            Self::Compound(p) => p.span,
            Self::Symbol(p) => p.span,
            Self::Wildcard(span) => *span,
        }
    }
}

/// An enum case pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundPattern<'ast> {
    /// Optional enum name qualifier
    pub scope: Option<Ident<'ast>>,
    /// Case label
    pub label: Ident<'ast>,
    /// Sub-patterns for the payload
    pub patterns: &'ast [Pattern<'ast>],
    /// `Label(..)`: remaining payload values are ignored
    pub elided: bool,
    /// Source location
    pub span: Span,
}
