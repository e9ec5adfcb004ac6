//! The closed set of builtin operations.
//!
//! Builtin functions and the methods of `list`, `map`, and `string` values
//! are resolved to a [`Builtin`] while the program is type-checked. Bytecode
//! refers to them by their qualified name (`print`, `list__append`), which
//! [`Builtin::from_name`] maps back when a program is loaded. The virtual
//! machine dispatches on the enum and never looks behavior up by string.

use std::fmt;

/// The receiver category of a builtin method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// `list<T>` methods.
    List,
    /// `map<K, V>` methods.
    Map,
    /// `string` methods.
    String,
}

impl Receiver {
    fn prefix(self) -> &'static str {
        match self {
            Receiver::List => "list__",
            Receiver::Map => "map__",
            Receiver::String => "string__",
        }
    }
}

macro_rules! builtins {
    ($($variant:ident => $name:literal,)*) => {
        /// A builtin function or method.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }

        impl Builtin {
            /// Every builtin, in declaration order.
            pub const ALL: &'static [Builtin] = &[$(Builtin::$variant,)*];

            /// The qualified name used in bytecode.
            pub fn name(self) -> &'static str {
                match self {
                    $(Builtin::$variant => $name,)*
                }
            }
        }
    };
}

builtins! {
    // Global functions
    Print => "print",
    Range => "range",
    Int => "int",
    Real => "real",
    String => "string",
    Maximum => "maximum",
    Minimum => "minimum",

    // list<T>
    ListAppend => "list__append",
    ListExtend => "list__extend",
    ListPop => "list__pop",
    ListRemove => "list__remove",
    ListSize => "list__size",
    ListCopy => "list__copy",
    ListFind => "list__find",
    ListReversed => "list__reversed",
    ListReverseInPlace => "list__reverse_in_place",
    ListSlice => "list__slice",
    ListSorted => "list__sorted",
    ListSortInPlace => "list__sort_in_place",

    // map<K, V>
    MapSize => "map__size",
    MapKeys => "map__keys",
    MapValues => "map__values",
    MapEntries => "map__entries",
    MapRemove => "map__remove",
    MapClear => "map__clear",
    MapCopy => "map__copy",

    // string
    StringSize => "string__size",
    StringFind => "string__find",
    StringStartsWith => "string__starts_with",
    StringEndsWith => "string__ends_with",
    StringSplit => "string__split",
    StringSplitSpace => "string__split_space",
    StringToLowercase => "string__to_lowercase",
    StringToUppercase => "string__to_uppercase",
    StringTrim => "string__trim",
    StringReplaceAll => "string__replace_all",
    StringSlice => "string__slice",
    StringQuoted => "string__quoted",
}

impl Builtin {
    /// Look up a builtin by its qualified bytecode name.
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.iter().copied().find(|b| b.name() == name)
    }

    /// Look up a global builtin function by its source name.
    pub fn global(name: &str) -> Option<Builtin> {
        Builtin::from_name(name).filter(|b| b.receiver().is_none())
    }

    /// Look up a method of `receiver` by its source name.
    pub fn method(receiver: Receiver, name: &str) -> Option<Builtin> {
        Builtin::ALL
            .iter()
            .copied()
            .filter(|b| b.receiver() == Some(receiver))
            .find(|b| b.method_name() == name)
    }

    /// The receiver category, or `None` for global functions.
    pub fn receiver(self) -> Option<Receiver> {
        let name = self.name();
        [Receiver::List, Receiver::Map, Receiver::String]
            .into_iter()
            .find(|r| name.starts_with(r.prefix()))
    }

    /// The name as written at a call site (`append` for `list__append`).
    pub fn method_name(self) -> &'static str {
        match self.receiver() {
            Some(receiver) => &self.name()[receiver.prefix().len()..],
            None => self.name(),
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
