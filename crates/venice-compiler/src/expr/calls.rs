//! Call expression compilation.
//!
//! Arguments are evaluated last to first so that the first argument ends up
//! on top of the stack, followed by the callee and `CALL_FUNCTION n`. The
//! callee is compiled first to learn its signature, then its code is moved
//! after the arguments.
//!
//! Generic parameters are bound per call: every argument whose parameter
//! mentions a generic is matched in source order, and the result type is
//! the declared one with the bindings substituted. Only the callee's own
//! generics bind; those of an enclosing generic function stay rigid.

use venice_ast::CallExpr;
use venice_core::CompileError;

use super::{ExprCompiler, Result};
use crate::bytecode::Instruction;
use crate::types::{
    GenericBindings, VeniceType, check_type, match_generics, substitute_declared,
    substitute_partial,
};

/// Compile a call. Returns `None` for a void callee.
pub fn compile_call(
    compiler: &mut ExprCompiler<'_, '_>,
    call: &CallExpr<'_>,
) -> Result<Option<VeniceType>> {
    let start = compiler.emitter().current_offset();
    let callee_ty = compiler.infer(call.callee)?;
    let callee_code = compiler.emitter().drain_from(start);

    let signature = match callee_ty {
        VeniceType::Function(signature) => signature,
        other => {
            return Err(CompileError::NotCallable {
                ty: other.to_string(),
                span: call.span,
            });
        }
    };
    if signature.params.len() != call.args.len() {
        return Err(CompileError::WrongArgCount {
            expected: signature.params.len(),
            found: call.args.len(),
            span: call.span,
        });
    }

    let mut arg_types = vec![VeniceType::Any; call.args.len()];
    for (index, arg) in call.args.iter().enumerate().rev() {
        let param = &signature.params[index];
        let hint = (!param.has_generics()).then_some(param);
        arg_types[index] = compiler.infer_with_hint(arg, hint)?;
    }

    let mut bindings = GenericBindings::default();
    for (index, (param, arg)) in signature.params.iter().zip(&arg_types).enumerate() {
        let expected = if param.has_generics() {
            match_generics(param, arg, &signature.generics, &mut bindings)
                .map_err(|e| e.at(call.args[index].span()))?;
            substitute_partial(param, &bindings)
        } else {
            param.clone()
        };
        if !check_type(&expected, arg) {
            return Err(CompileError::WrongArgType {
                index,
                expected: expected.to_string(),
                found: arg.to_string(),
                span: call.args[index].span(),
            });
        }
    }

    compiler.emitter().append(callee_code);
    compiler
        .emitter()
        .emit(Instruction::CallFunction(call.args.len()));

    signature
        .ret
        .as_ref()
        .map(|ret| substitute_declared(ret, &bindings, &signature.generics))
        .transpose()
        .map_err(|e| e.at(call.span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompilerOptions;
    use crate::bytecode::FunctionRef;
    use crate::context::CompilationContext;
    use crate::expr::test_support::{compile_expr, compile_in};
    use crate::symbols::Symbol;
    use crate::types::FunctionType;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use venice_ast::build::AstBuilder;
    use venice_core::{Builtin, Span, TypeError};

    fn with_function(name: &str, signature: FunctionType) -> CompilationContext<'static> {
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        ctx.values
            .put(
                name,
                Symbol::function(
                    VeniceType::Function(Box::new(signature)),
                    FunctionRef::User(name.to_string()),
                ),
                Span::default(),
            )
            .unwrap();
        ctx
    }

    #[test]
    fn arguments_are_pushed_last_first() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (ty, code) =
            compile_expr(&b.call(b.sym("maximum"), &[b.int(1), b.int(2)])).unwrap();
        assert_eq!(ty, Some(VeniceType::INTEGER));
        assert_eq!(
            code,
            vec![
                Instruction::PushConstInt(2),
                Instruction::PushConstInt(1),
                Instruction::PushConstFunction(FunctionRef::Builtin(Builtin::Maximum)),
                Instruction::CallFunction(2),
            ]
        );
    }

    #[test]
    fn void_call_has_no_type() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let (ty, _) = compile_expr(&b.call(b.sym("print"), &[b.string("hi")])).unwrap();
        assert_eq!(ty, None);
    }

    #[test]
    fn wrong_argument_type_and_count() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = compile_expr(&b.call(b.sym("int"), &[b.int(1)])).unwrap_err();
        assert!(matches!(err, CompileError::WrongArgType { index: 0, .. }));

        let err = compile_expr(&b.call(b.sym("int"), &[])).unwrap_err();
        assert!(matches!(
            err,
            CompileError::WrongArgCount {
                expected: 1,
                found: 0,
                ..
            }
        ));
    }

    #[test]
    fn calling_a_non_function() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let err = compile_expr(&b.call(b.int(3), &[])).unwrap_err();
        assert!(matches!(err, CompileError::NotCallable { .. }));
    }

    #[test]
    fn generics_bind_per_call() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let t = VeniceType::generic("T");
        let mut ctx = with_function(
            "first",
            FunctionType {
                params: vec![VeniceType::list(t.clone())],
                ret: Some(VeniceType::optional(t)),
                generics: vec!["T".to_string()],
            },
        );

        let call = b.call(b.sym("first"), &[b.list(&[b.string("a")])]);
        let (ty, _) = compile_in(&mut ctx, &call).unwrap();
        assert_eq!(ty, Some(VeniceType::optional(VeniceType::STRING)));

        let call = b.call(b.sym("first"), &[b.list(&[b.real(1.0)])]);
        let (ty, _) = compile_in(&mut ctx, &call).unwrap();
        assert_eq!(ty, Some(VeniceType::optional(VeniceType::REAL)));
    }

    #[test]
    fn conflicting_generic_arguments() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let t = VeniceType::generic("T");
        let mut ctx = with_function(
            "pair",
            FunctionType {
                params: vec![t.clone(), t.clone()],
                ret: Some(t),
                generics: vec!["T".to_string()],
            },
        );
        let call = b.call(b.sym("pair"), &[b.int(1), b.string("x")]);
        let err = compile_in(&mut ctx, &call).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Type {
                source: TypeError::GenericConflict { .. },
                ..
            }
        ));
    }

    #[test]
    fn outer_generic_parameters_do_not_bind() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let t = VeniceType::generic("T");
        let mut ctx = with_function(
            "apply",
            FunctionType {
                params: vec![t.clone()],
                ret: Some(t),
                generics: Vec::new(),
            },
        );
        let err = compile_in(&mut ctx, &b.call(b.sym("apply"), &[b.int(1)])).unwrap_err();
        assert!(matches!(err, CompileError::WrongArgType { index: 0, .. }), "{err:?}");
    }

    #[test]
    fn unbound_result_generic() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let mut ctx = with_function(
            "make",
            FunctionType {
                params: vec![],
                ret: Some(VeniceType::list(VeniceType::generic("T"))),
                generics: vec!["T".to_string()],
            },
        );
        let err = compile_in(&mut ctx, &b.call(b.sym("make"), &[])).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Type {
                source: TypeError::UnboundGeneric { .. },
                ..
            }
        ));
    }

    #[test]
    fn enum_constructor_instantiates_type() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.call(b.qualified("Optional", "Some"), &[b.int(5)]);
        let (ty, code) = compile_expr(&call).unwrap();
        assert_eq!(ty, Some(VeniceType::optional(VeniceType::INTEGER)));
        assert_eq!(
            code,
            vec![
                Instruction::PushConstInt(5),
                Instruction::PushConstFunction(FunctionRef::User("Optional__Some".to_string())),
                Instruction::CallFunction(1),
            ]
        );
    }

    #[test]
    fn method_call_pushes_receiver_before_lookup() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let call = b.method_call(b.string("a b"), "split", &[b.string(" ")]);
        let (ty, code) = compile_expr(&call).unwrap();
        assert_eq!(ty, Some(VeniceType::list(VeniceType::STRING)));
        assert_eq!(
            code,
            vec![
                Instruction::PushConstStr(" ".to_string()),
                Instruction::PushConstStr("a b".to_string()),
                Instruction::LookupMethod(FunctionRef::Builtin(Builtin::StringSplit)),
                Instruction::CallFunction(1),
            ]
        );
    }
}
