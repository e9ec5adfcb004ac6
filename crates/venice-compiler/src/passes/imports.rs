//! Import compilation.
//!
//! `import "path" as Alias` asks the [`ModuleLoader`](crate::context::ModuleLoader)
//! for the module's syntax tree and compiles it in a fresh context whose
//! function names are prefixed with `Alias::`. Its functions and type
//! declarations are merged into the importing program; its top-level code
//! is discarded. The module's functions are then reachable as
//! `Alias::name`.
//!
//! Every path may appear at most once in the whole import tree, which
//! rules out import cycles.

use venice_ast::{ImportDecl, Stmt};
use venice_core::CompileError;

use crate::bytecode::{FunctionRef, Import};
use crate::context::{CompilationContext, Export, ModuleExports};
use crate::symbols::{Symbol, SymbolKind};
use crate::types::VeniceType;

type Result<T> = std::result::Result<T, CompileError>;

/// Compile and merge every import among `stmts`, in source order.
pub fn compile_imports(ctx: &mut CompilationContext<'_>, stmts: &[Stmt<'_>]) -> Result<()> {
    for stmt in stmts {
        if let Stmt::Import(decl) = stmt {
            compile_import(ctx, decl)?;
        }
    }
    Ok(())
}

fn compile_import(ctx: &mut CompilationContext<'_>, decl: &ImportDecl<'_>) -> Result<()> {
    let path = decl.path;
    let alias = decl.alias.name;
    if !ctx.seen_imports.insert(path.to_string()) {
        return Err(CompileError::RecursiveImport {
            path: path.to_string(),
            span: decl.span,
        });
    }

    let unresolved = || CompileError::UnresolvedImport {
        path: path.to_string(),
        span: decl.span,
    };
    let loader = ctx.loader().ok_or_else(unresolved)?;
    let module = loader.load(path).ok_or_else(unresolved)?;

    let seen = std::mem::take(&mut ctx.seen_imports);
    let mut sub = ctx.for_import(alias, seen);
    let compiled = super::compile_module(&mut sub, &module);
    ctx.seen_imports = std::mem::take(&mut sub.seen_imports);
    compiled?;

    let exports: ModuleExports = module
        .stmts()
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Function(function) => export_of(&sub, function.name.name),
            _ => None,
        })
        .collect();
    let export_count = exports.len();

    ctx.program.merge_functions(sub.program);
    ctx.registry.merge(sub.registry);
    ctx.modules.insert(alias.to_string(), exports);
    ctx.values.put(
        alias,
        Symbol {
            ty: VeniceType::Module(alias.to_string()),
            mutable: false,
            kind: SymbolKind::Module,
        },
        decl.alias.span,
    )?;
    ctx.program.imports.push(Import {
        path: path.to_string(),
        alias: alias.to_string(),
    });

    tracing::debug!(path, alias, exports = export_count, "merged import");
    Ok(())
}

fn export_of(sub: &CompilationContext<'_>, name: &str) -> Option<(String, Export)> {
    let symbol = sub.values.get(name)?;
    match (&symbol.ty, &symbol.kind) {
        (VeniceType::Function(signature), SymbolKind::Function(FunctionRef::User(function))) => {
            Some((
                name.to_string(),
                Export {
                    function: function.clone(),
                    signature: (**signature).clone(),
                },
            ))
        }
        _ => None,
    }
}
