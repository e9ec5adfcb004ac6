//! Registration Pass - hoist declarations before any body is compiled.
//!
//! Walks the module's top level and registers every class, enum, and
//! function with its complete signature, so bodies can refer to
//! declarations in any order and recurse into themselves.
//!
//! ## Order
//!
//! 1. Class and enum names, so signatures can mention them
//! 2. Enum cases and their constructor functions
//! 3. Class fields, method signatures, and the positional constructor
//! 4. Function signatures
//!
//! Constructors are complete after this pass: an enum case with a payload
//! becomes `[PUSH_ENUM "Case" n, RETURN]` and a class constructor becomes
//! `[BUILD_CLASS "Name" n, RETURN]`.

use rustc_hash::FxHashSet;
use venice_ast::{ClassDecl, EnumDecl, FunctionDecl, Ident, Stmt, TypeExpr};
use venice_core::CompileError;

use crate::bytecode::{FunctionRef, Instruction};
use crate::context::CompilationContext;
use crate::symbols::{FrameKind, Symbol};
use crate::types::{
    self, ClassRef, EnumCase, EnumRef, FieldInfo, FunctionType, MethodInfo, VeniceType,
};

type Result<T> = std::result::Result<T, CompileError>;

/// Output of the registration pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationOutput {
    /// Classes and enums registered
    pub types_registered: usize,
    /// Functions registered, constructors included
    pub functions_registered: usize,
}

/// Registers the declarations of one module.
pub struct RegistrationPass<'a, 'l> {
    ctx: &'a mut CompilationContext<'l>,
    output: RegistrationOutput,
}

impl<'a, 'l> RegistrationPass<'a, 'l> {
    /// Create a new registration pass.
    pub fn new(ctx: &'a mut CompilationContext<'l>) -> Self {
        Self {
            ctx,
            output: RegistrationOutput::default(),
        }
    }

    /// Register every declaration among `stmts`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, stmts: &[Stmt<'_>]) -> Result<RegistrationOutput> {
        for stmt in stmts {
            match stmt {
                Stmt::Class(decl) => self.declare_class(decl)?,
                Stmt::Enum(decl) => self.declare_enum(decl)?,
                _ => {}
            }
        }
        for stmt in stmts {
            if let Stmt::Enum(decl) = stmt {
                self.register_cases(decl)?;
            }
        }
        for stmt in stmts {
            if let Stmt::Class(decl) = stmt {
                self.register_members(decl)?;
            }
        }
        for stmt in stmts {
            if let Stmt::Function(decl) = stmt {
                self.register_function(decl)?;
            }
        }
        Ok(self.output)
    }

    // ==========================================================================
    // Type Names
    // ==========================================================================

    fn declare_class(&mut self, decl: &ClassDecl<'_>) -> Result<()> {
        let name = decl.name.name;
        let id = self.ctx.declaration_id(name);
        self.ctx.types.put(
            name,
            VeniceType::Class(ClassRef {
                id,
                name: name.to_string(),
            }),
            decl.name.span,
        )?;
        self.ctx.registry.register_class(types::ClassDecl {
            id,
            name: name.to_string(),
            constructor: self.ctx.function_name(name),
            fields: Vec::new(),
            methods: Vec::new(),
        });
        self.output.types_registered += 1;
        Ok(())
    }

    fn declare_enum(&mut self, decl: &EnumDecl<'_>) -> Result<()> {
        let name = decl.name.name;
        let id = self.ctx.declaration_id(name);
        let generics: Vec<String> = decl.generics.iter().map(|g| g.name.to_string()).collect();
        self.ctx.types.put(
            name,
            VeniceType::Enum(EnumRef {
                id,
                name: name.to_string(),
                args: generics.iter().map(|g| VeniceType::generic(g)).collect(),
            }),
            decl.name.span,
        )?;
        self.ctx.registry.register_enum(types::EnumDecl {
            id,
            name: name.to_string(),
            generics,
            cases: Vec::new(),
        });
        self.output.types_registered += 1;
        Ok(())
    }

    // ==========================================================================
    // Enum Cases
    // ==========================================================================

    fn register_cases(&mut self, decl: &EnumDecl<'_>) -> Result<()> {
        let id = self.type_id(&decl.name)?;
        self.ctx.push_scope(FrameKind::Block);
        let cases = self.resolve_cases(decl);
        self.ctx.pop_scope();
        let cases = cases?;

        for case in cases.iter().filter(|case| !case.payload.is_empty()) {
            self.ctx.program.insert_function(
                case.constructor.clone(),
                vec![
                    Instruction::PushEnum(case.label.clone(), case.payload.len()),
                    Instruction::Return,
                ],
            );
            self.output.functions_registered += 1;
        }
        if let Some(registered) = self.ctx.registry.enum_mut(id) {
            registered.cases = cases;
        }
        Ok(())
    }

    fn resolve_cases(&mut self, decl: &EnumDecl<'_>) -> Result<Vec<EnumCase>> {
        self.bind_generics(decl.generics);
        let mut labels = FxHashSet::default();
        let mut cases = Vec::with_capacity(decl.cases.len());
        for case in decl.cases {
            let label = case.label.name;
            if !labels.insert(label) {
                return Err(duplicate(&case.label));
            }
            let payload = self.resolve_all(case.payload)?;
            let constructor = if payload.is_empty() {
                String::new()
            } else {
                self.ctx
                    .function_name(&format!("{}__{label}", decl.name.name))
            };
            cases.push(EnumCase {
                label: label.to_string(),
                payload,
                constructor,
            });
        }
        Ok(cases)
    }

    // ==========================================================================
    // Class Members
    // ==========================================================================

    fn register_members(&mut self, decl: &ClassDecl<'_>) -> Result<()> {
        let class_name = decl.name.name;
        let id = self.type_id(&decl.name)?;

        let mut names = FxHashSet::default();
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in decl.fields {
            if !names.insert(field.name.name) {
                return Err(duplicate(&field.name));
            }
            fields.push(FieldInfo {
                name: field.name.name.to_string(),
                visibility: field.visibility,
                ty: self.resolve(&field.ty)?,
            });
        }

        let mut methods = Vec::with_capacity(decl.methods.len());
        for method in decl.methods {
            let function = &method.function;
            if !names.insert(function.name.name) {
                return Err(duplicate(&function.name));
            }
            methods.push(MethodInfo {
                name: function.name.name.to_string(),
                visibility: method.visibility,
                signature: self.resolve_signature(function)?,
                function: self
                    .ctx
                    .function_name(&format!("{class_name}__{}", function.name.name)),
            });
        }

        let constructor = self.ctx.function_name(class_name);
        let signature = FunctionType {
            params: fields.iter().map(|f| f.ty.clone()).collect(),
            ret: Some(VeniceType::Class(ClassRef {
                id,
                name: class_name.to_string(),
            })),
            generics: Vec::new(),
        };
        self.ctx.values.put(
            class_name,
            Symbol::function(
                VeniceType::Function(Box::new(signature)),
                FunctionRef::User(constructor.clone()),
            ),
            decl.name.span,
        )?;
        self.ctx.program.insert_function(
            constructor,
            vec![
                Instruction::BuildClass(class_name.to_string(), fields.len()),
                Instruction::Return,
            ],
        );
        self.output.functions_registered += 1;

        if let Some(registered) = self.ctx.registry.class_mut(id) {
            registered.fields = fields;
            registered.methods = methods;
        }
        Ok(())
    }

    // ==========================================================================
    // Functions
    // ==========================================================================

    fn register_function(&mut self, decl: &FunctionDecl<'_>) -> Result<()> {
        let signature = self.resolve_signature(decl)?;
        let name = self.ctx.function_name(decl.name.name);
        self.ctx.values.put(
            decl.name.name,
            Symbol::function(
                VeniceType::Function(Box::new(signature)),
                FunctionRef::User(name),
            ),
            decl.name.span,
        )?;
        self.output.functions_registered += 1;
        Ok(())
    }

    /// Resolve a function's parameter and return types with its generic
    /// parameters in scope.
    fn resolve_signature(&mut self, decl: &FunctionDecl<'_>) -> Result<FunctionType> {
        self.ctx.push_scope(FrameKind::Block);
        self.bind_generics(decl.generics);
        let params: Result<Vec<VeniceType>> = decl.params.iter().map(|p| self.resolve(&p.ty)).collect();
        let ret = decl.return_type.map(|ty| self.resolve(ty)).transpose();
        self.ctx.pop_scope();

        Ok(FunctionType {
            params: params?,
            ret: ret?,
            generics: decl.generics.iter().map(|g| g.name.to_string()).collect(),
        })
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn bind_generics(&mut self, generics: &[Ident<'_>]) {
        for generic in generics {
            self.ctx
                .types
                .replace(generic.name, VeniceType::generic(generic.name));
        }
    }

    fn resolve(&self, ty: &TypeExpr<'_>) -> Result<VeniceType> {
        types::resolve_type(ty, &self.ctx.types).map_err(|e| e.at(ty.span))
    }

    fn resolve_all(&self, tys: &[TypeExpr<'_>]) -> Result<Vec<VeniceType>> {
        tys.iter().map(|ty| self.resolve(ty)).collect()
    }

    /// The identity registered for a class or enum name in the first step.
    fn type_id(&self, name: &Ident<'_>) -> Result<venice_core::TypeHash> {
        match self.ctx.types.get(name.name) {
            Some(VeniceType::Class(class)) => Ok(class.id),
            Some(VeniceType::Enum(e)) => Ok(e.id),
            _ => Err(CompileError::UndefinedSymbol {
                name: name.name.to_string(),
                span: name.span,
            }),
        }
    }
}

fn duplicate(name: &Ident<'_>) -> CompileError {
    CompileError::DuplicateSymbol {
        name: name.name.to_string(),
        span: name.span,
    }
}
