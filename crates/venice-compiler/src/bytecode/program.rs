//! The compiled program container.

use rustc_hash::FxHashMap;

use super::Instruction;

/// The function executed when a program is run.
pub const ENTRY_FUNCTION: &str = "main";

/// An import recorded in a program header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// Path handed to the module loader
    pub path: String,
    /// Alias the module's members were reached through
    pub alias: String,
}

/// A compiled Venice program.
///
/// Holds one instruction list per function, keyed by qualified name. The
/// module's top-level code is the function [`ENTRY_FUNCTION`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledProgram {
    /// Bytecode format version
    pub version: u32,
    /// Imports in source order
    pub imports: Vec<Import>,
    /// Instruction lists by function name
    pub functions: FxHashMap<String, Vec<Instruction>>,
}

impl CompiledProgram {
    /// An empty program.
    pub fn new(version: u32) -> Self {
        Self {
            version,
            imports: Vec::new(),
            functions: FxHashMap::default(),
        }
    }

    /// The instructions of `name`.
    pub fn function(&self, name: &str) -> Option<&[Instruction]> {
        self.functions.get(name).map(Vec::as_slice)
    }

    /// Store a finished function. Instruction lists are write-once, so an
    /// existing function of the same name is kept.
    pub fn insert_function(&mut self, name: impl Into<String>, code: Vec<Instruction>) {
        self.functions.entry(name.into()).or_insert(code);
    }

    /// Function names with the entry function first and the rest sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .functions
            .keys()
            .map(String::as_str)
            .filter(|name| *name != ENTRY_FUNCTION)
            .collect();
        names.sort_unstable();
        if self.functions.contains_key(ENTRY_FUNCTION) {
            names.insert(0, ENTRY_FUNCTION);
        }
        names
    }

    /// Take over every function of `other` that this program lacks, except
    /// its entry function.
    pub fn merge_functions(&mut self, other: CompiledProgram) {
        for (name, code) in other.functions {
            if name != ENTRY_FUNCTION {
                self.insert_function(name, code);
            }
        }
    }
}
