//! Name and qualified-name expression compilation.
//!
//! A plain name is a variable, a function, or an imported module alias. A
//! qualified name `Scope::name` is an enum case or an imported module
//! member.

use venice_ast::{Ident, QualifiedExpr};
use venice_core::CompileError;

use super::{ExprCompiler, Result};
use crate::bytecode::{FunctionRef, Instruction};
use crate::symbols::SymbolKind;
use crate::types::VeniceType;

/// Compile a name reference.
pub fn compile_symbol(compiler: &mut ExprCompiler<'_, '_>, ident: &Ident<'_>) -> Result<VeniceType> {
    let undefined = || CompileError::UndefinedSymbol {
        name: ident.name.to_string(),
        span: ident.span,
    };

    let ctx = compiler.ctx();
    let lookup = ctx.values.lookup(ident.name).ok_or_else(undefined)?;
    // Top-level code of an imported module never runs, so its variables
    // do not exist when the module's functions are called.
    let unreachable = ctx.is_import && lookup.module_level && lookup.crossed_function;
    let symbol = lookup.value.clone();

    match symbol.kind {
        SymbolKind::Variable { slot } => {
            if unreachable {
                return Err(undefined());
            }
            compiler.emitter().emit(Instruction::PushName(slot));
            Ok(symbol.ty)
        }
        SymbolKind::Function(function) => {
            compiler
                .emitter()
                .emit(Instruction::PushConstFunction(function));
            Ok(symbol.ty)
        }
        SymbolKind::Module => Err(CompileError::TypeMismatch {
            expected: "a value".to_string(),
            found: symbol.ty.to_string(),
            span: ident.span,
        }),
    }
}

/// Compile `Scope::name`.
pub fn compile_qualified(
    compiler: &mut ExprCompiler<'_, '_>,
    qualified: &QualifiedExpr<'_>,
) -> Result<VeniceType> {
    let scope = qualified.scope.name;
    let name = qualified.name.name;

    let is_module = compiler
        .ctx()
        .values
        .get(scope)
        .is_some_and(|s| s.kind == SymbolKind::Module);
    if is_module {
        return compile_module_member(compiler, qualified);
    }

    let Some(VeniceType::Enum(enum_ref)) = compiler.ctx().types.get(scope).cloned() else {
        return Err(CompileError::UndefinedSymbol {
            name: scope.to_string(),
            span: qualified.scope.span,
        });
    };
    let decl = compiler
        .ctx()
        .registry
        .enum_decl(enum_ref.id)
        .ok_or_else(|| CompileError::UndefinedSymbol {
            name: scope.to_string(),
            span: qualified.scope.span,
        })?;
    let Some((_, case)) = decl.case(name) else {
        return Err(CompileError::NoSuchMember {
            ty: decl.name.clone(),
            name: name.to_string(),
            span: qualified.span,
        });
    };

    let (instruction, ty) = if case.payload.is_empty() {
        (Instruction::PushEnum(case.label.clone(), 0), decl.unfixed_type())
    } else {
        (
            Instruction::PushConstFunction(FunctionRef::User(case.constructor.clone())),
            VeniceType::Function(Box::new(decl.constructor_type(case))),
        )
    };
    compiler.emitter().emit(instruction);
    Ok(ty)
}

fn compile_module_member(
    compiler: &mut ExprCompiler<'_, '_>,
    qualified: &QualifiedExpr<'_>,
) -> Result<VeniceType> {
    let alias = qualified.scope.name;
    let name = qualified.name.name;
    let export = compiler
        .ctx()
        .modules
        .get(alias)
        .and_then(|exports| exports.get(name))
        .cloned()
        .ok_or_else(|| CompileError::NoSuchMember {
            ty: format!("module {alias}"),
            name: name.to_string(),
            span: qualified.span,
        })?;
    compiler
        .emitter()
        .emit(Instruction::PushConstFunction(FunctionRef::User(export.function)));
    Ok(VeniceType::Function(Box::new(export.signature)))
}
