//! CompilationContext - state shared by every pass over one module.

use rustc_hash::{FxHashMap, FxHashSet};
use venice_ast::Module;
use venice_core::{Builtin, TypeHash};

use crate::CompilerOptions;
use crate::builtins;
use crate::bytecode::{CompiledProgram, FunctionRef, Instruction};
use crate::symbols::{FrameKind, Symbol, TypeTable, ValueTable};
use crate::types::{FunctionType, TypeRegistry, VeniceType};

/// Supplies the syntax trees of imported modules.
pub trait ModuleLoader {
    /// Load the module at `path`, or `None` if it does not exist.
    fn load(&self, path: &str) -> Option<Module<'_>>;
}

impl<'ast, S: std::hash::BuildHasher> ModuleLoader for std::collections::HashMap<String, Module<'ast>, S> {
    fn load(&self, path: &str) -> Option<Module<'_>> {
        self.get(path).copied()
    }
}

/// A function an imported module makes available.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// Qualified bytecode name
    pub function: String,
    /// Signature
    pub signature: FunctionType,
}

/// The functions of one imported module, by member name.
pub type ModuleExports = FxHashMap<String, Export>;

/// Unified compilation context for one module.
///
/// Holds the value and type scope chains, the class and enum registry, the
/// program under construction, and what is needed to compile imports.
pub struct CompilationContext<'l> {
    /// Value symbols
    pub values: ValueTable,
    /// Type symbols
    pub types: TypeTable,
    /// Class and enum declarations
    pub registry: TypeRegistry,
    /// The program being built
    pub program: CompiledProgram,
    /// Compiler settings
    pub options: CompilerOptions,
    loader: Option<&'l dyn ModuleLoader>,
    /// Paths imported so far anywhere in the import graph
    pub(crate) seen_imports: FxHashSet<String>,
    /// Imported modules by alias
    pub(crate) modules: FxHashMap<String, ModuleExports>,
    /// Prefix of every bytecode function name (`Alias::` inside imports)
    pub(crate) prefix: String,
    /// Qualifier of declaration identities (`main`, or the import alias)
    qualifier: String,
    /// Whether this module's top-level code is discarded
    pub(crate) is_import: bool,
    slot_counter: usize,
}

impl<'l> CompilationContext<'l> {
    /// A context for the main module.
    pub fn new(options: CompilerOptions, loader: Option<&'l dyn ModuleLoader>) -> Self {
        let mut ctx = Self {
            values: ValueTable::new(),
            types: TypeTable::new(),
            registry: TypeRegistry::with_builtins(),
            program: CompiledProgram::new(options.bytecode_version),
            options,
            loader,
            seen_imports: FxHashSet::default(),
            modules: FxHashMap::default(),
            prefix: String::new(),
            qualifier: "main".to_string(),
            is_import: false,
            slot_counter: 0,
        };
        ctx.install_builtins();
        ctx.values.push(FrameKind::Module);
        ctx.types.push(FrameKind::Module);
        ctx
    }

    /// A context for an imported module reached through `alias`.
    pub(crate) fn for_import(&self, alias: &str, seen_imports: FxHashSet<String>) -> Self {
        let mut ctx = Self::new(self.options.clone(), self.loader);
        ctx.seen_imports = seen_imports;
        ctx.prefix = format!("{}{alias}::", self.prefix);
        ctx.qualifier = ctx.prefix.trim_end_matches("::").to_string();
        ctx.is_import = true;
        ctx
    }

    fn install_builtins(&mut self) {
        for (name, ty) in [
            ("int", VeniceType::INTEGER),
            ("real", VeniceType::REAL),
            ("string", VeniceType::STRING),
            ("bool", VeniceType::BOOLEAN),
            ("char", VeniceType::CHARACTER),
            ("any", VeniceType::Any),
            ("Optional", VeniceType::optional(VeniceType::generic("T"))),
        ] {
            self.types.replace(name, ty);
        }
        for builtin in Builtin::ALL.iter().filter(|b| b.receiver().is_none()) {
            let ty = VeniceType::Function(Box::new(builtins::signature(*builtin)));
            self.values.replace(
                builtin.name(),
                Symbol::function(ty, FunctionRef::Builtin(*builtin)),
            );
        }
        self.program.insert_function(
            crate::types::OPTIONAL_SOME,
            vec![
                Instruction::PushEnum("Some".to_string(), 1),
                Instruction::Return,
            ],
        );
    }

    /// The module loader, if imports are supported.
    pub(crate) fn loader(&self) -> Option<&'l dyn ModuleLoader> {
        self.loader
    }

    /// The bytecode name of a module-level function.
    pub fn function_name(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }

    /// A fresh identity for a class or enum declared in this module.
    pub fn declaration_id(&self, name: &str) -> TypeHash {
        self.registry.fresh_id(&format!("{}::{name}", self.qualifier))
    }

    /// The runtime binding name for a new variable `name`.
    ///
    /// A variable that shadows another visible variable gets a fresh
    /// `name#N` binding so the outer value survives the inner scope.
    pub fn slot_for(&mut self, name: &str) -> String {
        match self.values.get(name) {
            Some(symbol) if symbol.is_variable() => {
                self.slot_counter += 1;
                format!("{name}#{}", self.slot_counter)
            }
            _ => name.to_string(),
        }
    }

    /// Whether the innermost scope is the module's top level.
    pub fn at_module_level(&self) -> bool {
        // Builtins frame plus the module frame.
        self.values.depth() == 2
    }

    /// Open a child scope in both tables.
    pub fn push_scope(&mut self, kind: FrameKind) {
        self.values.push(kind);
        self.types.push(kind);
    }

    /// Close the innermost scope in both tables.
    pub fn pop_scope(&mut self) {
        self.values.pop();
        self.types.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use venice_core::Span;

    #[test]
    fn builtins_are_visible() {
        let ctx = CompilationContext::new(CompilerOptions::default(), None);
        assert!(matches!(
            ctx.values.get("print").map(|s| &s.kind),
            Some(crate::symbols::SymbolKind::Function(FunctionRef::Builtin(Builtin::Print)))
        ));
        assert_eq!(ctx.types.get("int"), Some(&VeniceType::INTEGER));
        assert!(ctx.program.function("Optional__Some").is_some());
        assert!(ctx.at_module_level());
    }

    #[test]
    fn shadowing_variables_get_fresh_slots() {
        let mut ctx = CompilationContext::new(CompilerOptions::default(), None);
        assert_eq!(ctx.slot_for("x"), "x");
        ctx.values
            .put("x", Symbol::variable(VeniceType::INTEGER, false, "x"), Span::default())
            .unwrap();
        ctx.push_scope(FrameKind::Block);
        assert_eq!(ctx.slot_for("x"), "x#1");
        assert_eq!(ctx.slot_for("print"), "print");
    }

    #[test]
    fn import_names_are_prefixed() {
        let ctx = CompilationContext::new(CompilerOptions::default(), None);
        let sub = ctx.for_import("Geometry", FxHashSet::default());
        assert_eq!(sub.function_name("area"), "Geometry::area");
        assert_ne!(sub.declaration_id("Point"), ctx.declaration_id("Point"));
    }
}
