//! Function compiler for generating bytecode from function bodies.
//!
//! [`FunctionCompiler`] compiles one function or method body. It handles:
//!
//! - Opening the function scope with its generic parameters
//! - Binding the implicit `self` for methods, then the parameters
//! - Compiling the body statements
//! - Requiring a return statement in non-void functions
//! - Appending the implicit trailing `RETURN`
//!
//! On entry the callee's operand stack holds the receiver (for methods) on
//! top, then the arguments with the first one uppermost, so one
//! `STORE_NAME` per binding in declaration order consumes them.

use venice_ast::FunctionDecl;
use venice_core::CompileError;

use crate::bytecode::Instruction;
use crate::context::CompilationContext;
use crate::emit::BytecodeEmitter;
use crate::stmt::{ReturnContext, StmtCompiler};
use crate::symbols::{FrameKind, Symbol};
use crate::types::{ClassRef, FunctionType, VeniceType};

type Result<T> = std::result::Result<T, CompileError>;

/// Compiles a single function body to bytecode.
pub struct FunctionCompiler<'a, 'l, 'ast> {
    /// Compilation context; the finished code is stored in its program
    ctx: &'a mut CompilationContext<'l>,
    /// The declaration being compiled
    decl: &'a FunctionDecl<'ast>,
    /// Resolved signature, registered before any body was compiled
    signature: FunctionType,
    /// Bytecode function name
    name: String,
    /// Owning class (Some for methods)
    owner: Option<ClassRef>,
    emitter: BytecodeEmitter,
}

impl<'a, 'l, 'ast> FunctionCompiler<'a, 'l, 'ast> {
    /// Create a compiler for a module-level function.
    pub fn new(
        ctx: &'a mut CompilationContext<'l>,
        decl: &'a FunctionDecl<'ast>,
        signature: FunctionType,
        name: String,
    ) -> Self {
        Self {
            ctx,
            decl,
            signature,
            name,
            owner: None,
            emitter: BytecodeEmitter::new(),
        }
    }

    /// Compile the function as a method of `owner`.
    pub fn method_of(mut self, owner: ClassRef) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Compile the body and store it in the program under its name.
    pub fn compile(mut self) -> Result<()> {
        self.ctx.push_scope(FrameKind::Function);
        let result = self.compile_in_scope();
        self.ctx.pop_scope();
        result?;

        let code = self.emitter.finish();
        tracing::debug!(
            function = %self.name,
            instructions = code.len(),
            "compiled function"
        );
        self.ctx.program.insert_function(self.name, code);
        Ok(())
    }

    fn compile_in_scope(&mut self) -> Result<()> {
        for generic in &self.signature.generics {
            self.ctx.types.replace(generic, VeniceType::Generic(generic.clone()));
        }

        if let Some(owner) = &self.owner {
            self.emitter.emit(Instruction::StoreName("self".to_string()));
            self.ctx.values.put(
                "self",
                Symbol::variable(VeniceType::Class(owner.clone()), false, "self"),
                self.decl.span,
            )?;
        }
        for (param, ty) in self.decl.params.iter().zip(&self.signature.params) {
            let slot = self.ctx.slot_for(param.name.name);
            self.emitter.emit(Instruction::StoreName(slot.clone()));
            self.ctx.values.put(
                param.name.name,
                Symbol::variable(ty.clone(), false, slot),
                param.span,
            )?;
        }

        let returns = ReturnContext::Function(self.signature.ret.clone());
        let current_class = self.owner.as_ref().map(|owner| owner.id);
        StmtCompiler::new(self.ctx, &mut self.emitter, returns, current_class)
            .compile_stmts(self.decl.body.stmts)?;

        if self.signature.ret.is_some() && !self.emitter.has_return() {
            return Err(CompileError::NonVoidFunctionMissingReturn {
                name: self.decl.name.name.to_string(),
                span: self.decl.span,
            });
        }
        self.emitter.emit(Instruction::Return);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CompilerOptions;
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;
    use venice_ast::build::AstBuilder;
    use venice_ast::Stmt;
    use venice_core::TypeHash;

    fn signature(params: Vec<VeniceType>, ret: Option<VeniceType>) -> FunctionType {
        FunctionType {
            params,
            ret,
            generics: Vec::new(),
        }
    }

    fn decl_of<'ast>(stmt: Stmt<'ast>) -> &'ast FunctionDecl<'ast> {
        match stmt {
            Stmt::Function(decl) => decl,
            other => panic!("expected a function, got {other:?}"),
        }
    }

    #[test]
    fn parameters_are_stored_in_order() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.function(
            "add",
            &[],
            &[("a", b.ty("int")), ("b", b.ty("int"))],
            Some(b.ty("int")),
            &[b.return_stmt(Some(b.infix(b.sym("a"), "+", b.sym("b"))))],
        );
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        let sig = signature(vec![VeniceType::INTEGER, VeniceType::INTEGER], Some(VeniceType::INTEGER));
        FunctionCompiler::new(&mut ctx, &decl, sig, "add".to_string())
            .compile()
            .unwrap();
        assert_eq!(
            ctx.program.function("add").unwrap(),
            &[
                Instruction::StoreName("a".to_string()),
                Instruction::StoreName("b".to_string()),
                Instruction::PushName("a".to_string()),
                Instruction::PushName("b".to_string()),
                Instruction::BinaryAdd,
                Instruction::Return,
                Instruction::Return,
            ][..]
        );
        assert!(ctx.at_module_level());
    }

    #[test]
    fn non_void_function_needs_a_return() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.function("f", &[], &[], Some(b.ty("int")), &[b.expr_stmt(b.int(1))]);
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        let err = FunctionCompiler::new(&mut ctx, &decl, signature(vec![], Some(VeniceType::INTEGER)), "f".to_string())
            .compile()
            .unwrap_err();
        assert!(matches!(err, CompileError::NonVoidFunctionMissingReturn { name, .. } if name == "f"));
        assert!(ctx.program.function("f").is_none());
    }

    #[test]
    fn void_function_gets_trailing_return() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.function("noop", &[], &[], None, &[]);
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        FunctionCompiler::new(&mut ctx, &decl, signature(vec![], None), "noop".to_string())
            .compile()
            .unwrap();
        assert_eq!(ctx.program.function("noop").unwrap(), &[Instruction::Return][..]);
    }

    #[test]
    fn methods_bind_self_first() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = decl_of(b.function_stmt(b.function(
            "rename",
            &[],
            &[("name", b.ty("string"))],
            None,
            &[],
        )));
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        let owner = ClassRef {
            id: TypeHash::from_name("main::Person"),
            name: "Person".to_string(),
        };
        FunctionCompiler::new(&mut ctx, decl, signature(vec![VeniceType::STRING], None), "Person__rename".to_string())
            .method_of(owner)
            .compile()
            .unwrap();
        assert_eq!(
            ctx.program.function("Person__rename").unwrap(),
            &[
                Instruction::StoreName("self".to_string()),
                Instruction::StoreName("name".to_string()),
                Instruction::Return,
            ][..]
        );
    }

    #[test]
    fn generic_parameters_resolve_inside_body() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let decl = b.function(
            "identity",
            &["T"],
            &[("x", b.ty("T"))],
            Some(b.ty("T")),
            &[
                b.typed_binding("y", b.ty("T"), false, b.sym("x")),
                b.return_stmt(Some(b.sym("y"))),
            ],
        );
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        let sig = FunctionType {
            params: vec![VeniceType::generic("T")],
            ret: Some(VeniceType::generic("T")),
            generics: vec!["T".to_string()],
        };
        FunctionCompiler::new(&mut ctx, &decl, sig, "identity".to_string())
            .compile()
            .unwrap();
        assert!(ctx.types.get("T").is_none());
    }
}
