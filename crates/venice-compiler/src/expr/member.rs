//! Member access compilation: fields, methods, tuple elements, indexing.

use venice_ast::{FieldExpr, IndexExpr, TupleFieldExpr, Visibility};
use venice_core::{Builtin, CompileError, Span, TypeHash};

use super::{ExprCompiler, Result};
use crate::builtins;
use crate::bytecode::{FunctionRef, Instruction};
use crate::types::{AtomicType, VeniceType};

/// Compile `object.name`: a class field, a class method, or a builtin
/// method of a list, map, or string.
pub fn compile_field(compiler: &mut ExprCompiler<'_, '_>, expr: &FieldExpr<'_>) -> Result<VeniceType> {
    let object_ty = compiler.infer(expr.object)?;
    let name = expr.field.name;

    if let VeniceType::Class(class) = &object_ty {
        if let Ok((index, ty)) = resolve_field(compiler, class.id, name, expr.span) {
            compiler.emitter().emit(Instruction::PushField(index));
            return Ok(ty);
        }
        let method = compiler
            .ctx()
            .registry
            .class(class.id)
            .and_then(|decl| decl.method(name))
            .map(|m| (m.visibility, m.function.clone(), m.signature.clone()));
        if let Some((visibility, function, signature)) = method {
            check_visibility(compiler, visibility, class.id, name, expr.span)?;
            compiler
                .emitter()
                .emit(Instruction::LookupMethod(FunctionRef::User(function)));
            return Ok(VeniceType::Function(Box::new(signature)));
        }
        // Surface a private-field error rather than a missing member.
        resolve_field(compiler, class.id, name, expr.span)?;
    }

    if let Some(receiver) = builtins::receiver_of(&object_ty)
        && let Some(builtin) = Builtin::method(receiver, name)
    {
        compiler
            .emitter()
            .emit(Instruction::LookupMethod(FunctionRef::Builtin(builtin)));
        let signature = builtins::method_type(builtin, &object_ty);
        return Ok(VeniceType::Function(Box::new(signature)));
    }

    Err(CompileError::NoSuchMember {
        ty: object_ty.to_string(),
        name: name.to_string(),
        span: expr.span,
    })
}

/// Find field `name` of class `class`, checking that the code being
/// compiled may see it. Returns the field's position and type.
pub(crate) fn resolve_field(
    compiler: &ExprCompiler<'_, '_>,
    class: TypeHash,
    name: &str,
    span: Span,
) -> Result<(usize, VeniceType)> {
    let decl = compiler.ctx().registry.class(class);
    let Some((index, field)) = decl.and_then(|d| d.field(name)) else {
        return Err(CompileError::NoSuchMember {
            ty: decl.map(|d| d.name.clone()).unwrap_or_default(),
            name: name.to_string(),
            span,
        });
    };
    check_visibility(compiler, field.visibility, class, name, span)?;
    Ok((index, field.ty.clone()))
}

fn check_visibility(
    compiler: &ExprCompiler<'_, '_>,
    visibility: Visibility,
    class: TypeHash,
    name: &str,
    span: Span,
) -> Result<()> {
    if visibility == Visibility::Private && compiler.current_class() != Some(class) {
        return Err(CompileError::PrivateFieldOrMethodAccess {
            name: name.to_string(),
            span,
        });
    }
    Ok(())
}

/// Compile `object.N` on a tuple.
pub fn compile_tuple_field(
    compiler: &mut ExprCompiler<'_, '_>,
    expr: &TupleFieldExpr<'_>,
) -> Result<VeniceType> {
    let object_ty = compiler.infer(expr.object)?;
    let item = match &object_ty {
        VeniceType::Tuple(items) => items.get(expr.index).cloned(),
        _ => None,
    };
    let Some(item) = item else {
        return Err(CompileError::NoSuchMember {
            ty: object_ty.to_string(),
            name: expr.index.to_string(),
            span: expr.span,
        });
    };
    compiler
        .emitter()
        .emit(Instruction::PushTupleField(expr.index));
    Ok(item)
}

/// Compile `object[index]`.
///
/// Lists and strings take an `int` index; maps take a key and produce an
/// `Optional` of the value type.
pub fn compile_index(compiler: &mut ExprCompiler<'_, '_>, expr: &IndexExpr<'_>) -> Result<VeniceType> {
    let object_ty = compiler.infer(expr.object)?;
    match object_ty {
        VeniceType::List(item) => {
            compiler.check(expr.index, &VeniceType::INTEGER)?;
            compiler.emitter().emit(Instruction::BinaryListIndex);
            Ok(*item)
        }
        VeniceType::Map(key, value) => {
            compiler.check(expr.index, &key)?;
            compiler.emitter().emit(Instruction::BinaryMapIndex);
            Ok(VeniceType::optional(*value))
        }
        VeniceType::Atomic(AtomicType::String) => {
            compiler.check(expr.index, &VeniceType::INTEGER)?;
            compiler.emitter().emit(Instruction::BinaryStringIndex);
            Ok(VeniceType::CHARACTER)
        }
        other => Err(CompileError::IndexOnNonIndexable {
            ty: other.to_string(),
            span: expr.span,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompilerOptions;
    use crate::context::CompilationContext;
    use crate::expr::test_support::compile_in;
    use crate::symbols::Symbol;
    use crate::types::{ClassDecl, FieldInfo, FunctionType, MethodInfo};
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use venice_ast::build::AstBuilder;

    fn context_with(vars: &[(&str, VeniceType)]) -> CompilationContext<'static> {
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        for (name, ty) in vars {
            ctx.values
                .put(name, Symbol::variable(ty.clone(), true, *name), Span::default())
                .unwrap();
        }
        ctx
    }

    fn account(ctx: &mut CompilationContext<'_>) -> VeniceType {
        let id = ctx.declaration_id("Account");
        let decl = ClassDecl {
            id,
            name: "Account".to_string(),
            constructor: "Account".to_string(),
            fields: vec![
                FieldInfo {
                    name: "owner".to_string(),
                    visibility: Visibility::Public,
                    ty: VeniceType::STRING,
                },
                FieldInfo {
                    name: "balance".to_string(),
                    visibility: Visibility::Private,
                    ty: VeniceType::INTEGER,
                },
            ],
            methods: vec![MethodInfo {
                name: "deposit".to_string(),
                visibility: Visibility::Public,
                signature: FunctionType {
                    params: vec![VeniceType::INTEGER],
                    ret: None,
                    generics: Vec::new(),
                },
                function: "Account__deposit".to_string(),
            }],
        };
        let ty = decl.instance_type();
        ctx.registry.register_class(decl);
        ty
    }

    #[test]
    fn public_field_and_method() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_with(&[]);
        let ty = account(&mut ctx);
        ctx.values
            .put("a", Symbol::variable(ty, false, "a"), Span::default())
            .unwrap();

        let (found, code) = compile_in(&mut ctx, &b.field(b.sym("a"), "owner")).unwrap();
        assert_eq!(found, Some(VeniceType::STRING));
        assert_eq!(
            code,
            vec![Instruction::PushName("a".to_string()), Instruction::PushField(0)]
        );

        let (found, code) = compile_in(&mut ctx, &b.field(b.sym("a"), "deposit")).unwrap();
        assert_eq!(
            found,
            Some(VeniceType::function(vec![VeniceType::INTEGER], None))
        );
        assert_eq!(
            code[1],
            Instruction::LookupMethod(FunctionRef::User("Account__deposit".to_string()))
        );
    }

    #[test]
    fn private_field_outside_class() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_with(&[]);
        let ty = account(&mut ctx);
        ctx.values
            .put("a", Symbol::variable(ty, false, "a"), Span::default())
            .unwrap();
        let err = compile_in(&mut ctx, &b.field(b.sym("a"), "balance")).unwrap_err();
        assert!(matches!(err, CompileError::PrivateFieldOrMethodAccess { name, .. } if name == "balance"));

        let err = compile_in(&mut ctx, &b.field(b.sym("a"), "missing")).unwrap_err();
        assert!(matches!(err, CompileError::NoSuchMember { .. }));
    }

    #[test]
    fn builtin_methods_by_receiver() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_with(&[("xs", VeniceType::list(VeniceType::REAL))]);
        let (found, code) = compile_in(&mut ctx, &b.field(b.sym("xs"), "append")).unwrap();
        assert_eq!(found, Some(VeniceType::function(vec![VeniceType::REAL], None)));
        assert_eq!(
            code[1],
            Instruction::LookupMethod(FunctionRef::Builtin(Builtin::ListAppend))
        );
    }

    #[test]
    fn indexing() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = context_with(&[
            ("xs", VeniceType::list(VeniceType::BOOLEAN)),
            ("m", VeniceType::map(VeniceType::STRING, VeniceType::INTEGER)),
            ("s", VeniceType::STRING),
            ("n", VeniceType::INTEGER),
        ]);

        let (ty, code) = compile_in(&mut ctx, &b.index(b.sym("xs"), b.int(0))).unwrap();
        assert_eq!(ty, Some(VeniceType::BOOLEAN));
        assert_eq!(code[2], Instruction::BinaryListIndex);

        let (ty, _) = compile_in(&mut ctx, &b.index(b.sym("m"), b.string("k"))).unwrap();
        assert_eq!(ty, Some(VeniceType::optional(VeniceType::INTEGER)));

        let (ty, _) = compile_in(&mut ctx, &b.index(b.sym("s"), b.int(1))).unwrap();
        assert_eq!(ty, Some(VeniceType::CHARACTER));

        let err = compile_in(&mut ctx, &b.index(b.sym("n"), b.int(1))).unwrap_err();
        assert!(matches!(err, CompileError::IndexOnNonIndexable { .. }));

        let err = compile_in(&mut ctx, &b.index(b.sym("xs"), b.string("0"))).unwrap_err();
        assert!(matches!(err, CompileError::TypeMismatch { .. }));
    }

    #[test]
    fn tuple_elements() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let pair = VeniceType::Tuple(vec![VeniceType::STRING, VeniceType::INTEGER]);
        let mut ctx = context_with(&[("p", pair)]);
        let (ty, code) = compile_in(&mut ctx, &b.tuple_field(b.sym("p"), 1)).unwrap();
        assert_eq!(ty, Some(VeniceType::INTEGER));
        assert_eq!(code[1], Instruction::PushTupleField(1));
        assert!(compile_in(&mut ctx, &b.tuple_field(b.sym("p"), 2)).is_err());
    }
}
