//! Binary operator compilation.
//!
//! Both operands are evaluated left to right and the operator instruction
//! pops them. `and` and `or` short-circuit: the right operand is skipped
//! when the left one already decides the result.

use venice_ast::InfixExpr;
use venice_core::CompileError;

use super::{ExprCompiler, Result};
use crate::bytecode::Instruction;
use crate::emit::JumpIntent;
use crate::types::{AtomicType, VeniceType, check_type};

/// Compile a binary operation.
pub fn compile_infix(compiler: &mut ExprCompiler<'_, '_>, expr: &InfixExpr<'_>) -> Result<VeniceType> {
    match expr.op {
        "and" => return compile_logical(compiler, expr, JumpIntent::ShortCircuitAnd),
        "or" => return compile_logical(compiler, expr, JumpIntent::ShortCircuitOr),
        "in" => return compile_membership(compiler, expr),
        "+" | "-" | "*" | "/" | "%" | "++" | "==" | "!=" | "<" | "<=" | ">" | ">=" => {}
        op => {
            return Err(CompileError::UnknownOperator {
                op: op.to_string(),
                span: expr.span,
            });
        }
    }

    let left = compiler.infer(expr.left)?;
    let right = compiler.infer_with_hint(expr.right, Some(&left))?;
    let (instruction, ty) = select(expr.op, &left, &right).ok_or_else(|| {
        CompileError::TypeMismatch {
            expected: format!("operands of '{}'", expr.op),
            found: format!("{left} and {right}"),
            span: expr.span,
        }
    })?;
    compiler.emitter().emit(instruction);
    Ok(ty)
}

/// The instruction and result type of `left op right`, if the operand
/// types allow it.
fn select(op: &str, left: &VeniceType, right: &VeniceType) -> Option<(Instruction, VeniceType)> {
    use AtomicType::{Integer, RealNumber};
    use VeniceType::Atomic;

    let both = |atomic: AtomicType| *left == Atomic(atomic) && *right == Atomic(atomic);
    let numeric = both(Integer) || both(RealNumber);

    let selected = match op {
        "+" | "-" | "*" if both(Integer) => (
            match op {
                "+" => Instruction::BinaryAdd,
                "-" => Instruction::BinarySub,
                _ => Instruction::BinaryMul,
            },
            VeniceType::INTEGER,
        ),
        "+" | "-" | "*" if both(RealNumber) => (
            match op {
                "+" => Instruction::BinaryRealAdd,
                "-" => Instruction::BinaryRealSub,
                _ => Instruction::BinaryRealMul,
            },
            VeniceType::REAL,
        ),
        "/" if numeric => (Instruction::BinaryRealDiv, VeniceType::REAL),
        "%" if both(Integer) => (Instruction::BinaryModulo, VeniceType::INTEGER),
        "++" if both(AtomicType::String) => (Instruction::BinaryConcat, VeniceType::STRING),
        "++" => match (left, right) {
            (VeniceType::List(_), VeniceType::List(_)) if check_type(left, right) => {
                let ty = if left.is_open() { right } else { left };
                (Instruction::BinaryConcat, ty.clone())
            }
            _ => return None,
        },
        "==" | "!=" if check_type(left, right) || check_type(right, left) => (
            if op == "==" {
                Instruction::BinaryEq
            } else {
                Instruction::BinaryNotEq
            },
            VeniceType::BOOLEAN,
        ),
        "<" | "<=" | ">" | ">=" if left.is_ordered() && left == right => (
            match op {
                "<" => Instruction::BinaryLt,
                "<=" => Instruction::BinaryLtEq,
                ">" => Instruction::BinaryGt,
                _ => Instruction::BinaryGtEq,
            },
            VeniceType::BOOLEAN,
        ),
        _ => return None,
    };
    Some(selected)
}

fn compile_logical(
    compiler: &mut ExprCompiler<'_, '_>,
    expr: &InfixExpr<'_>,
    intent: JumpIntent,
) -> Result<VeniceType> {
    compiler.check(expr.left, &VeniceType::BOOLEAN)?;
    let short_circuit = compiler.emitter().emit_placeholder(intent);
    compiler.check(expr.right, &VeniceType::BOOLEAN)?;
    compiler.emitter().patch_here(short_circuit);
    Ok(VeniceType::BOOLEAN)
}

/// `item in container` for lists, map keys, and substrings or characters.
fn compile_membership(compiler: &mut ExprCompiler<'_, '_>, expr: &InfixExpr<'_>) -> Result<VeniceType> {
    let item = compiler.infer(expr.left)?;
    let container = compiler.infer(expr.right)?;
    let fits = match &container {
        VeniceType::List(element) => check_type(element, &item),
        VeniceType::Map(key, _) => check_type(key, &item),
        VeniceType::Atomic(AtomicType::String) => {
            item == VeniceType::STRING || item == VeniceType::CHARACTER
        }
        _ => {
            return Err(CompileError::TypeMismatch {
                expected: "list, map, or string".to_string(),
                found: container.to_string(),
                span: expr.right.span(),
            });
        }
    };
    if !fits {
        return Err(CompileError::TypeMismatch {
            expected: format!("an element of {container}"),
            found: item.to_string(),
            span: expr.left.span(),
        });
    }
    compiler.emitter().emit(Instruction::BinaryIn);
    Ok(VeniceType::BOOLEAN)
}
