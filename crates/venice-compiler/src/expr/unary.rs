//! Prefix operator compilation.

use venice_ast::UnaryExpr;
use venice_core::CompileError;

use super::{ExprCompiler, Result};
use crate::bytecode::Instruction;
use crate::types::VeniceType;

/// Compile `-x` or `not x`.
pub fn compile_unary(compiler: &mut ExprCompiler<'_, '_>, expr: &UnaryExpr<'_>) -> Result<VeniceType> {
    let instruction = match expr.op {
        "-" => Instruction::UnaryMinus,
        "not" => Instruction::UnaryNot,
        op => {
            return Err(CompileError::UnknownOperator {
                op: op.to_string(),
                span: expr.span,
            });
        }
    };

    let operand = compiler.infer(expr.operand)?;
    let valid = match instruction {
        Instruction::UnaryMinus => operand == VeniceType::INTEGER || operand == VeniceType::REAL,
        _ => operand == VeniceType::BOOLEAN,
    };
    if !valid {
        return Err(CompileError::TypeMismatch {
            expected: format!("operand of '{}'", expr.op),
            found: operand.to_string(),
            span: expr.operand.span(),
        });
    }
    compiler.emitter().emit(instruction);
    Ok(operand)
}
