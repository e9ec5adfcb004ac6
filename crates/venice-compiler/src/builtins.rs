//! Type signatures of the builtin functions and methods.
//!
//! Method signatures omit the receiver and are written in terms of the
//! receiver's element types: `T` for `list<T>`, `K` and `V` for
//! `map<K, V>`. [`method_type`] substitutes them for a concrete receiver.

use venice_core::{Builtin, Receiver};

use crate::types::{FunctionType, GenericBindings, VeniceType, substitute_partial};

fn t() -> VeniceType {
    VeniceType::generic("T")
}

fn k() -> VeniceType {
    VeniceType::generic("K")
}

fn v() -> VeniceType {
    VeniceType::generic("V")
}

fn sig(params: Vec<VeniceType>, ret: Option<VeniceType>) -> FunctionType {
    FunctionType {
        params,
        ret,
        generics: Vec::new(),
    }
}

/// The declared signature of a builtin.
pub fn signature(builtin: Builtin) -> FunctionType {
    use Builtin::*;
    use VeniceType as Ty;

    match builtin {
        Print => sig(vec![Ty::Any], None),
        Range => sig(vec![Ty::INTEGER, Ty::INTEGER], Some(Ty::list(Ty::INTEGER))),
        Int => sig(vec![Ty::REAL], Some(Ty::INTEGER)),
        Real => sig(vec![Ty::INTEGER], Some(Ty::REAL)),
        String => sig(vec![Ty::Any], Some(Ty::STRING)),
        Maximum | Minimum => sig(vec![Ty::INTEGER, Ty::INTEGER], Some(Ty::INTEGER)),

        ListAppend => sig(vec![t()], None),
        ListExtend => sig(vec![Ty::list(t())], None),
        ListPop => sig(vec![], Some(t())),
        ListRemove => sig(vec![Ty::INTEGER], None),
        ListSize => sig(vec![], Some(Ty::INTEGER)),
        ListCopy | ListReversed | ListSorted => sig(vec![], Some(Ty::list(t()))),
        ListFind => sig(vec![t()], Some(Ty::optional(Ty::INTEGER))),
        ListReverseInPlace | ListSortInPlace => sig(vec![], None),
        ListSlice => sig(vec![Ty::INTEGER, Ty::INTEGER], Some(Ty::list(t()))),

        MapSize => sig(vec![], Some(Ty::INTEGER)),
        MapKeys => sig(vec![], Some(Ty::list(k()))),
        MapValues => sig(vec![], Some(Ty::list(v()))),
        MapEntries => sig(vec![], Some(Ty::list(Ty::Tuple(vec![k(), v()])))),
        MapRemove => sig(vec![k()], None),
        MapClear => sig(vec![], None),
        MapCopy => sig(vec![], Some(Ty::map(k(), v()))),

        StringSize => sig(vec![], Some(Ty::INTEGER)),
        StringFind => sig(vec![Ty::STRING], Some(Ty::optional(Ty::INTEGER))),
        StringStartsWith | StringEndsWith => sig(vec![Ty::STRING], Some(Ty::BOOLEAN)),
        StringSplit => sig(vec![Ty::STRING], Some(Ty::list(Ty::STRING))),
        StringSplitSpace => sig(vec![], Some(Ty::list(Ty::STRING))),
        StringToLowercase | StringToUppercase | StringTrim | StringQuoted => {
            sig(vec![], Some(Ty::STRING))
        }
        StringReplaceAll => sig(vec![Ty::STRING, Ty::STRING], Some(Ty::STRING)),
        StringSlice => sig(vec![Ty::INTEGER, Ty::INTEGER], Some(Ty::STRING)),
    }
}

/// The receiver category of a value type, if it has builtin methods.
pub fn receiver_of(ty: &VeniceType) -> Option<Receiver> {
    match ty {
        VeniceType::List(_) => Some(Receiver::List),
        VeniceType::Map(..) => Some(Receiver::Map),
        VeniceType::Atomic(crate::types::AtomicType::String) => Some(Receiver::String),
        _ => None,
    }
}

/// The signature of `builtin` called on a receiver of type `receiver`.
pub fn method_type(builtin: Builtin, receiver: &VeniceType) -> FunctionType {
    let mut bindings = GenericBindings::default();
    match receiver {
        VeniceType::List(item) => {
            bindings.insert("T".to_string(), (**item).clone());
        }
        VeniceType::Map(key, value) => {
            bindings.insert("K".to_string(), (**key).clone());
            bindings.insert("V".to_string(), (**value).clone());
        }
        _ => {}
    }
    let declared = signature(builtin);
    FunctionType {
        params: declared
            .params
            .iter()
            .map(|p| substitute_partial(p, &bindings))
            .collect(),
        ret: declared.ret.as_ref().map(|r| substitute_partial(r, &bindings)),
        generics: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_has_a_signature() {
        for builtin in Builtin::ALL {
            let _ = signature(*builtin);
        }
    }

    #[test]
    fn list_methods_use_element_type() {
        let receiver = VeniceType::list(VeniceType::STRING);
        let append = method_type(Builtin::ListAppend, &receiver);
        assert_eq!(append.params, vec![VeniceType::STRING]);
        assert_eq!(append.ret, None);

        let find = method_type(Builtin::ListFind, &receiver);
        assert_eq!(find.ret, Some(VeniceType::optional(VeniceType::INTEGER)));
    }

    #[test]
    fn map_entries_are_tuples() {
        let receiver = VeniceType::map(VeniceType::STRING, VeniceType::REAL);
        let entries = method_type(Builtin::MapEntries, &receiver);
        assert_eq!(
            entries.ret,
            Some(VeniceType::list(VeniceType::Tuple(vec![
                VeniceType::STRING,
                VeniceType::REAL
            ])))
        );
    }

    #[test]
    fn receivers() {
        assert_eq!(receiver_of(&VeniceType::STRING), Some(Receiver::String));
        assert_eq!(receiver_of(&VeniceType::INTEGER), None);
    }
}
