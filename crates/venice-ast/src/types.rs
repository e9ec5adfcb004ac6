//! Type annotations as written in source.

use crate::Ident;
use venice_core::Span;

/// A type annotation.
///
/// Examples:
/// - `int`, `Point`, `T`
/// - `Optional<int>`
/// - `list<string>`, `map<string, int>`
/// - `(int, bool)`
/// - `func(int, int) -> bool`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeExpr<'ast> {
    /// The annotation's shape
    pub kind: TypeExprKind<'ast>,
    /// Source location
    pub span: Span,
}

/// The shape of a type annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExprKind<'ast> {
    /// A named type with optional type arguments
    Named {
        /// The type name
        name: Ident<'ast>,
        /// Type arguments (`Optional<int>`)
        args: &'ast [TypeExpr<'ast>],
    },
    /// `list<T>`
    List(&'ast TypeExpr<'ast>),
    /// `map<K, V>`
    Map(&'ast TypeExpr<'ast>, &'ast TypeExpr<'ast>),
    /// `(A, B, ...)`
    Tuple(&'ast [TypeExpr<'ast>]),
    /// `func(A, B) -> R`
    Function {
        /// Parameter types
        params: &'ast [TypeExpr<'ast>],
        /// Return type, absent for void
        ret: Option<&'ast TypeExpr<'ast>>,
    },
}

impl<'ast> TypeExpr<'ast> {
    /// A named type without arguments.
    pub fn named(name: &'ast str, span: Span) -> Self {
        Self {
            kind: TypeExprKind::Named {
                name: Ident::new(name, span),
                args: &[],
            },
            span,
        }
    }
}
