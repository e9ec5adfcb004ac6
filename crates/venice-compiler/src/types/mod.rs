//! The Venice type system.
//!
//! [`VeniceType`] is a closed set of type variants. Lists, maps, tuples, and
//! function types are structural. Classes and enums are nominal: a
//! [`ClassRef`] or [`EnumRef`] names its declaration by [`TypeHash`], and the
//! declaration itself (fields, methods, cases) lives in the
//! [`TypeRegistry`].
//!
//! - [`check_type`]: compatibility of an actual type with an expected one
//! - [`match_generics`]: bind generic parameters at a call site
//! - [`substitute_generics`]: replace bound generic parameters
//! - [`resolve_type`]: turn a source annotation into a [`VeniceType`]

mod check;
mod registry;
mod resolve;

pub use check::{
    GenericBindings, check_type, match_generics, substitute_declared, substitute_generics,
    substitute_partial,
};
pub(crate) use registry::OPTIONAL_SOME;
pub use registry::{ClassDecl, EnumCase, EnumDecl, FieldInfo, MethodInfo, TypeRegistry};
pub use resolve::resolve_type;

use std::fmt;

use venice_core::TypeHash;

/// Atomic (scalar) types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    RealNumber,
    /// Immutable text
    String,
    /// `true` or `false`
    Boolean,
    /// A single byte
    Character,
}

/// A Venice type.
#[derive(Debug, Clone, PartialEq)]
pub enum VeniceType {
    /// A scalar type
    Atomic(AtomicType),
    /// `list<T>`
    List(Box<VeniceType>),
    /// `map<K, V>`
    Map(Box<VeniceType>, Box<VeniceType>),
    /// `(A, B, ...)`
    Tuple(Vec<VeniceType>),
    /// A function signature
    Function(Box<FunctionType>),
    /// An instance of a declared class
    Class(ClassRef),
    /// An instance of a declared enum, with its type arguments
    Enum(EnumRef),
    /// A generic parameter of the enclosing declaration. It only matches
    /// itself.
    Generic(String),
    /// A type argument no value has fixed yet, such as the `T` of
    /// `Optional::None`. Matches anything.
    Unknown(String),
    /// An imported module alias
    Module(String),
    /// Compatible with everything
    Any,
}

/// A function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    /// Parameter types in order
    pub params: Vec<VeniceType>,
    /// Return type, `None` for void
    pub ret: Option<VeniceType>,
    /// Generic parameter names bound per call site
    pub generics: Vec<String>,
}

/// Reference to a class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    /// Declaration identity
    pub id: TypeHash,
    /// Display name
    pub name: String,
}

/// Reference to an enum declaration with type arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumRef {
    /// Declaration identity
    pub id: TypeHash,
    /// Display name
    pub name: String,
    /// One argument per declared generic parameter
    pub args: Vec<VeniceType>,
}

impl VeniceType {
    /// `int`
    pub const INTEGER: VeniceType = VeniceType::Atomic(AtomicType::Integer);
    /// `real`
    pub const REAL: VeniceType = VeniceType::Atomic(AtomicType::RealNumber);
    /// `string`
    pub const STRING: VeniceType = VeniceType::Atomic(AtomicType::String);
    /// `bool`
    pub const BOOLEAN: VeniceType = VeniceType::Atomic(AtomicType::Boolean);
    /// `char`
    pub const CHARACTER: VeniceType = VeniceType::Atomic(AtomicType::Character);

    /// `list<item>`
    pub fn list(item: VeniceType) -> Self {
        VeniceType::List(Box::new(item))
    }

    /// `map<key, value>`
    pub fn map(key: VeniceType, value: VeniceType) -> Self {
        VeniceType::Map(Box::new(key), Box::new(value))
    }

    /// A generic parameter.
    pub fn generic(name: &str) -> Self {
        VeniceType::Generic(name.to_string())
    }

    /// A type argument not yet fixed, named after its parameter.
    pub fn unknown(name: &str) -> Self {
        VeniceType::Unknown(name.to_string())
    }

    /// A function type.
    pub fn function(params: Vec<VeniceType>, ret: Option<VeniceType>) -> Self {
        VeniceType::Function(Box::new(FunctionType {
            params,
            ret,
            generics: Vec::new(),
        }))
    }

    /// The builtin `Optional<inner>`.
    pub fn optional(inner: VeniceType) -> Self {
        VeniceType::Enum(EnumRef {
            id: TypeHash::OPTIONAL,
            name: "Optional".to_string(),
            args: vec![inner],
        })
    }

    /// Whether any generic parameter occurs in this type.
    pub fn has_generics(&self) -> bool {
        match self {
            VeniceType::Generic(_) => true,
            VeniceType::List(item) => item.has_generics(),
            VeniceType::Map(k, v) => k.has_generics() || v.has_generics(),
            VeniceType::Tuple(items) => items.iter().any(VeniceType::has_generics),
            VeniceType::Function(f) => {
                f.params.iter().any(VeniceType::has_generics)
                    || f.ret.as_ref().is_some_and(VeniceType::has_generics)
            }
            VeniceType::Enum(e) => e.args.iter().any(VeniceType::has_generics),
            VeniceType::Atomic(_)
            | VeniceType::Class(_)
            | VeniceType::Module(_)
            | VeniceType::Unknown(_)
            | VeniceType::Any => false,
        }
    }

    /// Whether some type argument in this type is not yet fixed.
    pub fn is_open(&self) -> bool {
        self.unknown_name().is_some()
    }

    /// The name of the first type argument in this type that is not yet
    /// fixed.
    pub fn unknown_name(&self) -> Option<&str> {
        match self {
            VeniceType::Unknown(name) => Some(name),
            VeniceType::List(item) => item.unknown_name(),
            VeniceType::Map(k, v) => k.unknown_name().or_else(|| v.unknown_name()),
            VeniceType::Tuple(items) => items.iter().find_map(VeniceType::unknown_name),
            VeniceType::Function(f) => f
                .params
                .iter()
                .find_map(VeniceType::unknown_name)
                .or_else(|| f.ret.as_ref().and_then(VeniceType::unknown_name)),
            VeniceType::Enum(e) => e.args.iter().find_map(VeniceType::unknown_name),
            _ => None,
        }
    }

    /// Whether values of this type can be ordered with `<`, `<=`, `>`, `>=`.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            VeniceType::Atomic(
                AtomicType::Integer
                    | AtomicType::RealNumber
                    | AtomicType::String
                    | AtomicType::Character
            )
        )
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AtomicType::Integer => "int",
            AtomicType::RealNumber => "real",
            AtomicType::String => "string",
            AtomicType::Boolean => "bool",
            AtomicType::Character => "char",
        })
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[VeniceType]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for VeniceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VeniceType::Atomic(atomic) => write!(f, "{atomic}"),
            VeniceType::List(item) => write!(f, "list<{item}>"),
            VeniceType::Map(k, v) => write!(f, "map<{k}, {v}>"),
            VeniceType::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            VeniceType::Function(func) => write!(f, "{func}"),
            VeniceType::Class(class) => f.write_str(&class.name),
            VeniceType::Enum(e) if e.args.is_empty() => f.write_str(&e.name),
            VeniceType::Enum(e) => {
                write!(f, "{}<", e.name)?;
                write_list(f, &e.args)?;
                f.write_str(">")
            }
            VeniceType::Generic(name) | VeniceType::Unknown(name) => f.write_str(name),
            VeniceType::Module(name) => write!(f, "module {name}"),
            VeniceType::Any => f.write_str("any"),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func(")?;
        write_list(f, &self.params)?;
        f.write_str(")")?;
        if let Some(ret) = &self.ret {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_compound_types() {
        let ty = VeniceType::map(
            VeniceType::STRING,
            VeniceType::list(VeniceType::Tuple(vec![
                VeniceType::INTEGER,
                VeniceType::BOOLEAN,
            ])),
        );
        assert_eq!(ty.to_string(), "map<string, list<(int, bool)>>");
        assert_eq!(
            VeniceType::optional(VeniceType::CHARACTER).to_string(),
            "Optional<char>"
        );
        assert_eq!(
            VeniceType::function(vec![VeniceType::REAL], Some(VeniceType::INTEGER)).to_string(),
            "func(real) -> int"
        );
    }

    #[test]
    fn generic_detection() {
        assert!(VeniceType::list(VeniceType::generic("T")).has_generics());
        assert!(VeniceType::optional(VeniceType::generic("T")).has_generics());
        assert!(!VeniceType::map(VeniceType::STRING, VeniceType::INTEGER).has_generics());
        assert!(!VeniceType::optional(VeniceType::unknown("T")).has_generics());
    }

    #[test]
    fn open_types_name_their_unknown_argument() {
        assert!(VeniceType::list(VeniceType::optional(VeniceType::unknown("T"))).is_open());
        assert!(!VeniceType::optional(VeniceType::generic("T")).is_open());
        let pair = VeniceType::Tuple(vec![
            VeniceType::INTEGER,
            VeniceType::map(VeniceType::STRING, VeniceType::unknown("V")),
        ]);
        assert_eq!(pair.unknown_name(), Some("V"));
    }
}
