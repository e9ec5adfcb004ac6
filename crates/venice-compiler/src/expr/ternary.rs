//! Ternary conditional compilation.

use venice_ast::TernaryExpr;
use venice_core::CompileError;

use super::{ExprCompiler, Result};
use crate::emit::JumpIntent;
use crate::types::{VeniceType, check_type};

/// Compile `condition ? then_expr : else_expr`.
///
/// ```text
///     <condition>
///     REL_JUMP_IF_FALSE else
///     <then_expr>
///     REL_JUMP end
/// else:
///     <else_expr>
/// end:
/// ```
pub fn compile_ternary(
    compiler: &mut ExprCompiler<'_, '_>,
    expr: &TernaryExpr<'_>,
    hint: Option<&VeniceType>,
) -> Result<VeniceType> {
    compiler.check(expr.condition, &VeniceType::BOOLEAN)?;
    let skip = compiler.emitter().emit_placeholder(JumpIntent::SkipClause);

    let then_ty = compiler.infer_with_hint(expr.then_expr, hint)?;
    let end = compiler.emitter().emit_placeholder(JumpIntent::EndOfClause);
    compiler.emitter().patch_here(skip);

    let else_hint = hint.cloned().unwrap_or_else(|| then_ty.clone());
    let else_ty = compiler.infer_with_hint(expr.else_expr, Some(&else_hint))?;
    compiler.emitter().patch_here(end);

    if !check_type(&then_ty, &else_ty) && !check_type(&else_ty, &then_ty) {
        return Err(CompileError::TypeMismatch {
            expected: then_ty.to_string(),
            found: else_ty.to_string(),
            span: expr.else_expr.span(),
        });
    }
    Ok(if then_ty.is_open() { else_ty } else { then_ty })
}
