//! Syntax tree consumed by the Venice compiler.
//!
//! The tree is produced by an external parser and handed to the compiler
//! as a [`Module`]. All nodes are allocated in a `bumpalo` arena and borrow
//! from it, so every node is `Copy` and lives as long as the arena.
//!
//! Every node carries a [`Span`] so compile errors can point at source.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use venice_ast::*;
//! use venice_core::Span;
//!
//! // let x = 1 + 2
//! let arena = Bump::new();
//! let span = Span::default();
//! let left = arena.alloc(Expr::Literal(LiteralExpr { kind: LiteralKind::Int(1), span }));
//! let right = arena.alloc(Expr::Literal(LiteralExpr { kind: LiteralKind::Int(2), span }));
//! let sum = arena.alloc(Expr::Infix(arena.alloc(InfixExpr { left, op: "+", right, span })));
//! let stmts = arena.alloc_slice_copy(&[Stmt::Let(LetStmt {
//!     name: Ident::new("x", span),
//!     ty: None,
//!     mutable: false,
//!     value: sum,
//!     span,
//! })]);
//! let module = Module::new(stmts, span);
//! assert_eq!(module.stmts().len(), 1);
//! ```

pub mod build;
pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;

use venice_core::Span;

/// An identifier with its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident<'ast> {
    /// The identifier text.
    pub name: &'ast str,
    /// Source location.
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create an identifier.
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// Member visibility for class fields and methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Accessible everywhere.
    #[default]
    Public,
    /// Accessible only from methods of the declaring class.
    Private,
}

/// A parsed Venice source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Module<'ast> {
    stmts: &'ast [Stmt<'ast>],
    span: Span,
}

impl<'ast> Module<'ast> {
    /// Create a module from its top-level statements.
    pub fn new(stmts: &'ast [Stmt<'ast>], span: Span) -> Self {
        Self { stmts, span }
    }

    /// Top-level statements in source order.
    pub fn stmts(&self) -> &'ast [Stmt<'ast>] {
        self.stmts
    }

    /// The span of the whole file.
    pub fn span(&self) -> Span {
        self.span
    }
}
