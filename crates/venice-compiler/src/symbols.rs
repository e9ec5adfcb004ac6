//! Scope chains for value and type symbols.
//!
//! A [`SymbolTable`] is a stack of frames. The bottom frame holds builtins,
//! the next one the module's top-level declarations, and every function
//! body, block, loop, and match clause pushes a child frame that is popped
//! once the construct is compiled. Value symbols and type symbols live in
//! separate tables, so a function and a type may share a name.

use rustc_hash::FxHashMap;
use venice_core::{CompileError, Span};

use crate::bytecode::FunctionRef;
use crate::types::VeniceType;

/// What kind of construct opened a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Builtins or module-level declarations
    Module,
    /// A function or method body
    Function,
    /// A block, loop body, or match clause
    Block,
}

#[derive(Debug)]
struct Frame<V> {
    entries: FxHashMap<String, V>,
    kind: FrameKind,
}

impl<V> Frame<V> {
    fn new(kind: FrameKind) -> Self {
        Self {
            entries: FxHashMap::default(),
            kind,
        }
    }
}

/// Result of resolving a name through the frame chain.
#[derive(Debug)]
pub struct Lookup<'t, V> {
    /// The bound value
    pub value: &'t V,
    /// Whether the binding lives in a module frame
    pub module_level: bool,
    /// Whether the walk left a function body to find the binding
    pub crossed_function: bool,
}

/// A chain of scope frames mapping names to `V`.
#[derive(Debug)]
pub struct SymbolTable<V> {
    frames: Vec<Frame<V>>,
}

impl<V> Default for SymbolTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> SymbolTable<V> {
    /// A table with a single empty root frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(FrameKind::Module)],
        }
    }

    /// Open a child frame.
    pub fn push(&mut self, kind: FrameKind) {
        self.frames.push(Frame::new(kind));
    }

    /// Discard the innermost frame and everything declared in it.
    ///
    /// The root frame is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of open frames.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Find the innermost binding of `name`.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.lookup(name).map(|found| found.value)
    }

    /// Find the innermost binding of `name` along with where it was found.
    pub fn lookup(&self, name: &str) -> Option<Lookup<'_, V>> {
        let mut crossed_function = false;
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.entries.get(name) {
                return Some(Lookup {
                    value,
                    module_level: frame.kind == FrameKind::Module,
                    crossed_function,
                });
            }
            if frame.kind == FrameKind::Function {
                crossed_function = true;
            }
        }
        None
    }

    /// Whether `name` is bound in the innermost frame.
    pub fn declared_here(&self, name: &str) -> bool {
        self.frames
            .last()
            .is_some_and(|frame| frame.entries.contains_key(name))
    }

    /// Bind `name` in the innermost frame.
    ///
    /// Shadowing a binding of an outer frame is allowed; binding a name twice
    /// in the same frame is a [`CompileError::DuplicateSymbol`].
    pub fn put(&mut self, name: &str, value: V, span: Span) -> Result<(), CompileError> {
        if self.declared_here(name) {
            return Err(CompileError::DuplicateSymbol {
                name: name.to_string(),
                span,
            });
        }
        if let Some(frame) = self.frames.last_mut() {
            frame.entries.insert(name.to_string(), value);
        }
        Ok(())
    }

    /// Replace the binding of `name` in the innermost frame.
    pub(crate) fn replace(&mut self, name: &str, value: V) {
        if let Some(frame) = self.frames.last_mut() {
            frame.entries.insert(name.to_string(), value);
        }
    }

    /// Iterate the bindings of the innermost frame.
    pub fn current_entries(&self) -> impl Iterator<Item = (&str, &V)> {
        self.frames
            .last()
            .into_iter()
            .flat_map(|frame| frame.entries.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

/// What a value symbol refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    /// A runtime variable stored under `slot`
    Variable {
        /// Name of the environment binding
        slot: String,
    },
    /// A builtin or user function, including class and enum-case
    /// constructors
    Function(FunctionRef),
    /// An imported module alias
    Module,
}

/// A value symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    /// Static type
    pub ty: VeniceType,
    /// Whether assignment is allowed
    pub mutable: bool,
    /// What the name refers to
    pub kind: SymbolKind,
}

impl Symbol {
    /// A variable bound to `slot`.
    pub fn variable(ty: VeniceType, mutable: bool, slot: impl Into<String>) -> Self {
        Self {
            ty,
            mutable,
            kind: SymbolKind::Variable { slot: slot.into() },
        }
    }

    /// A function value.
    pub fn function(ty: VeniceType, function: FunctionRef) -> Self {
        Self {
            ty,
            mutable: false,
            kind: SymbolKind::Function(function),
        }
    }

    /// Whether this is a runtime variable.
    pub fn is_variable(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable { .. })
    }
}

/// Value symbols.
pub type ValueTable = SymbolTable<Symbol>;

/// Type symbols.
pub type TypeTable = SymbolTable<VeniceType>;

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn get_walks_to_root() {
        let mut table: SymbolTable<i32> = SymbolTable::new();
        table.put("x", 1, span()).unwrap();
        table.push(FrameKind::Block);
        table.push(FrameKind::Block);
        assert_eq!(table.get("x"), Some(&1));
        assert_eq!(table.get("y"), None);
    }

    #[test]
    fn shadowing_outer_frame_is_allowed() {
        let mut table: SymbolTable<i32> = SymbolTable::new();
        table.put("x", 1, span()).unwrap();
        table.push(FrameKind::Block);
        table.put("x", 2, span()).unwrap();
        assert_eq!(table.get("x"), Some(&2));
        table.pop();
        assert_eq!(table.get("x"), Some(&1));
    }

    #[test]
    fn duplicate_in_same_frame_fails() {
        let mut table: SymbolTable<i32> = SymbolTable::new();
        table.put("x", 1, span()).unwrap();
        let err = table.put("x", 2, Span::new(3, 1, 1)).unwrap_err();
        assert_eq!(
            err,
            CompileError::DuplicateSymbol {
                name: "x".to_string(),
                span: Span::new(3, 1, 1),
            }
        );
    }

    #[test]
    fn declarations_do_not_leak_out_of_blocks() {
        let mut table: SymbolTable<i32> = SymbolTable::new();
        table.push(FrameKind::Block);
        table.put("inner", 1, span()).unwrap();
        table.pop();
        assert_eq!(table.get("inner"), None);
    }

    #[test]
    fn lookup_reports_function_boundary() {
        let mut table: SymbolTable<i32> = SymbolTable::new();
        table.push(FrameKind::Module);
        table.put("global", 1, span()).unwrap();
        table.push(FrameKind::Function);
        table.put("local", 2, span()).unwrap();
        table.push(FrameKind::Block);

        let local = table.lookup("local").unwrap();
        assert!(!local.crossed_function);
        assert!(!local.module_level);

        let global = table.lookup("global").unwrap();
        assert!(global.crossed_function);
        assert!(global.module_level);
    }

    #[test]
    fn root_frame_is_never_popped() {
        let mut table: SymbolTable<i32> = SymbolTable::new();
        table.put("x", 1, span()).unwrap();
        table.pop();
        assert_eq!(table.depth(), 1);
        assert_eq!(table.get("x"), Some(&1));
    }
}
