//! Literal expression compilation.

use ordered_float::OrderedFloat;
use venice_ast::{LiteralExpr, LiteralKind};

use super::ExprCompiler;
use crate::bytecode::Instruction;
use crate::types::VeniceType;

/// Compile a literal expression.
pub fn compile_literal(compiler: &mut ExprCompiler<'_, '_>, lit: &LiteralExpr<'_>) -> VeniceType {
    let (instruction, ty) = match lit.kind {
        LiteralKind::Int(value) => (Instruction::PushConstInt(value), VeniceType::INTEGER),
        LiteralKind::Real(value) => (
            Instruction::PushConstReal(OrderedFloat(value)),
            VeniceType::REAL,
        ),
        LiteralKind::String(value) => (
            Instruction::PushConstStr(value.to_string()),
            VeniceType::STRING,
        ),
        LiteralKind::Bool(value) => (Instruction::PushConstBool(value), VeniceType::BOOLEAN),
        LiteralKind::Char(value) => (Instruction::PushConstChar(value), VeniceType::CHARACTER),
    };
    compiler.emitter().emit(instruction);
    ty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::test_support::compile_expr;
    use bumpalo::Bump;
    use venice_ast::build::AstBuilder;

    #[test]
    fn literals_push_constants() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let cases = [
            (b.int(7), Instruction::PushConstInt(7), VeniceType::INTEGER),
            (
                b.real(1.5),
                Instruction::PushConstReal(OrderedFloat(1.5)),
                VeniceType::REAL,
            ),
            (
                b.string("hi"),
                Instruction::PushConstStr("hi".to_string()),
                VeniceType::STRING,
            ),
            (b.boolean(false), Instruction::PushConstBool(false), VeniceType::BOOLEAN),
            (b.character(b'a'), Instruction::PushConstChar(b'a'), VeniceType::CHARACTER),
        ];
        for (expr, instruction, ty) in cases {
            let (found, code) = compile_expr(&expr).unwrap();
            assert_eq!(found, Some(ty));
            assert_eq!(code, vec![instruction]);
        }
    }
}
