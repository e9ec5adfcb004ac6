//! List, map, and tuple literal compilation.
//!
//! Elements are pushed last to first so that the build instruction pops
//! them in source order. An empty list or map has no element to infer its
//! type from and takes it from the expected type instead.

use venice_ast::{Expr, ListExpr, MapExpr, TupleExpr};
use venice_core::{CompileError, Span};

use super::{ExprCompiler, Result, mismatch};
use crate::bytecode::Instruction;
use crate::types::{VeniceType, check_type};

/// Compile `[a, b, ...]`.
pub fn compile_list(
    compiler: &mut ExprCompiler<'_, '_>,
    expr: &ListExpr<'_>,
    hint: Option<&VeniceType>,
) -> Result<VeniceType> {
    let element_hint = match hint {
        Some(VeniceType::List(item)) => Some(&**item),
        _ => None,
    };
    if expr.items.is_empty() {
        compiler.emitter().emit(Instruction::BuildList(0));
        return empty_literal(hint.filter(|h| matches!(h, VeniceType::List(_))), "[]", expr.span);
    }

    let item = compile_homogeneous(compiler, expr.items, element_hint)?;
    compiler
        .emitter()
        .emit(Instruction::BuildList(expr.items.len()));
    Ok(VeniceType::list(item))
}

/// Compile `{k: v, ...}`.
pub fn compile_map(
    compiler: &mut ExprCompiler<'_, '_>,
    expr: &MapExpr<'_>,
    hint: Option<&VeniceType>,
) -> Result<VeniceType> {
    if expr.entries.is_empty() {
        compiler.emitter().emit(Instruction::BuildMap(0));
        return empty_literal(hint.filter(|h| matches!(h, VeniceType::Map(..))), "{}", expr.span);
    }
    let (key_hint, value_hint) = match hint {
        Some(VeniceType::Map(k, v)) => (Some(&**k), Some(&**v)),
        _ => (None, None),
    };

    let mut keys = Vec::with_capacity(expr.entries.len());
    let mut values = Vec::with_capacity(expr.entries.len());
    for entry in expr.entries.iter().rev() {
        keys.push((compiler.infer_with_hint(&entry.key, key_hint)?, &entry.key));
        values.push((compiler.infer_with_hint(&entry.value, value_hint)?, &entry.value));
    }
    keys.reverse();
    values.reverse();
    let key = unify(&keys)?;
    let value = unify(&values)?;

    compiler
        .emitter()
        .emit(Instruction::BuildMap(expr.entries.len()));
    Ok(VeniceType::map(key, value))
}

/// Compile `(a, b, ...)`.
pub fn compile_tuple(
    compiler: &mut ExprCompiler<'_, '_>,
    expr: &TupleExpr<'_>,
    hint: Option<&VeniceType>,
) -> Result<VeniceType> {
    let hints = match hint {
        Some(VeniceType::Tuple(items)) if items.len() == expr.items.len() => Some(items),
        _ => None,
    };
    let mut items = vec![VeniceType::Any; expr.items.len()];
    for (index, item) in expr.items.iter().enumerate().rev() {
        let hint = hints.map(|h| &h[index]);
        items[index] = compiler.infer_with_hint(item, hint)?;
    }
    compiler
        .emitter()
        .emit(Instruction::BuildTuple(expr.items.len()));
    Ok(VeniceType::Tuple(items))
}

fn empty_literal(hint: Option<&VeniceType>, literal: &str, span: Span) -> Result<VeniceType> {
    hint.cloned().ok_or_else(|| CompileError::TypeMismatch {
        expected: "a type annotation".to_string(),
        found: format!("empty literal {literal}"),
        span,
    })
}

/// Compile `items` last to first; they must all share one type.
fn compile_homogeneous(
    compiler: &mut ExprCompiler<'_, '_>,
    items: &[Expr<'_>],
    hint: Option<&VeniceType>,
) -> Result<VeniceType> {
    let mut typed = Vec::with_capacity(items.len());
    for item in items.iter().rev() {
        typed.push((compiler.infer_with_hint(item, hint)?, item));
    }
    typed.reverse();
    unify(&typed)
}

/// The common type of a non-empty list of typed elements. Elements that
/// are only partially known, such as `Optional::None`, take the type of a
/// fully known one.
fn unify(typed: &[(VeniceType, &Expr<'_>)]) -> Result<VeniceType> {
    let common = typed
        .iter()
        .map(|(ty, _)| ty)
        .find(|ty| !ty.is_open())
        .or_else(|| typed.first().map(|(ty, _)| ty))
        .cloned()
        .unwrap_or(VeniceType::Any);
    for (ty, expr) in typed {
        if !check_type(&common, ty) {
            return Err(mismatch(&common, ty, expr));
        }
    }
    Ok(common)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::test_support::compile_expr;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use venice_ast::build::AstBuilder;

    #[test]
    fn list_items_are_pushed_in_reverse() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (ty, code) = compile_expr(&b.list(&[b.int(1), b.int(2), b.int(3)])).unwrap();
        assert_eq!(ty, Some(VeniceType::list(VeniceType::INTEGER)));
        assert_eq!(
            code,
            vec![
                Instruction::PushConstInt(3),
                Instruction::PushConstInt(2),
                Instruction::PushConstInt(1),
                Instruction::BuildList(3),
            ]
        );
    }

    #[test]
    fn heterogeneous_list_is_rejected() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = compile_expr(&b.list(&[b.int(1), b.boolean(true)])).unwrap_err();
        assert!(matches!(err, CompileError::TypeMismatch { .. }));
    }

    #[test]
    fn empty_literals_need_a_hint() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert!(compile_expr(&b.list(&[])).is_err());
        assert!(compile_expr(&b.map(&[])).is_err());
    }

    #[test]
    fn map_entries_push_key_then_value() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let map = b.map(&[(b.string("a"), b.int(1)), (b.string("b"), b.int(2))]);
        let (ty, code) = compile_expr(&map).unwrap();
        assert_eq!(ty, Some(VeniceType::map(VeniceType::STRING, VeniceType::INTEGER)));
        assert_eq!(
            code,
            vec![
                Instruction::PushConstStr("b".to_string()),
                Instruction::PushConstInt(2),
                Instruction::PushConstStr("a".to_string()),
                Instruction::PushConstInt(1),
                Instruction::BuildMap(2),
            ]
        );
    }

    #[test]
    fn tuples_keep_element_types() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (ty, code) = compile_expr(&b.tuple(&[b.string("x"), b.real(0.5)])).unwrap();
        assert_eq!(
            ty,
            Some(VeniceType::Tuple(vec![VeniceType::STRING, VeniceType::REAL]))
        );
        assert_eq!(code.last(), Some(&Instruction::BuildTuple(2)));
    }

    #[test]
    fn optional_elements_unify() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let some = b.call(b.qualified("Optional", "Some"), &[b.int(1)]);
        let list = b.list(&[b.qualified("Optional", "None"), some]);
        let (ty, _) = compile_expr(&list).unwrap();
        assert_eq!(
            ty,
            Some(VeniceType::list(VeniceType::optional(VeniceType::INTEGER)))
        );
    }
}
