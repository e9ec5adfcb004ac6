//! Builtin function implementations.
//!
//! Methods receive their receiver as the first argument. Strings are
//! treated as bytes: sizes, indices, and slices count bytes.

use std::cmp::Ordering;
use std::io::Write;
use std::rc::Rc;

use venice_core::{Builtin, RuntimeError};

use super::value::{Value, VeniceMap};

type Result<T> = std::result::Result<T, RuntimeError>;

fn out_of_bounds() -> RuntimeError {
    RuntimeError::panic("index out of bounds")
}

/// Check the argument count and hand back the arguments as an array.
fn take<const N: usize>(builtin: Builtin, args: Vec<Value>) -> Result<[Value; N]> {
    let count = args.len();
    args.try_into().map_err(|_| {
        RuntimeError::internal(format!(
            "{builtin} takes {N} argument(s), called with {count}"
        ))
    })
}

/// Validate `start..end` against a sequence of length `len`.
fn slice_bounds(start: i64, end: i64, len: usize) -> Result<(usize, usize)> {
    let start = usize::try_from(start).map_err(|_| out_of_bounds())?;
    let end = usize::try_from(end).map_err(|_| out_of_bounds())?;
    if start > end || end > len {
        return Err(out_of_bounds());
    }
    Ok((start, end))
}

/// Run `builtin` on `args`. `print` writes to `output`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub(crate) fn call(
    builtin: Builtin,
    args: Vec<Value>,
    output: &mut dyn Write,
) -> Result<Option<Value>> {
    use Builtin::*;

    let value = match builtin {
        // =====================================================================
        // Global functions
        // =====================================================================
        Print => {
            let [value] = take::<1>(builtin, args)?;
            writeln!(output, "{}", value.to_text())
                .map_err(|e| RuntimeError::internal(format!("failed to write output: {e}")))?;
            return Ok(None);
        }
        Range => {
            let [start, end] = take::<2>(builtin, args)?;
            let (start, end) = (start.as_int()?, end.as_int()?);
            Value::list((start..end).map(Value::Integer).collect())
        }
        Int => {
            let [real] = take::<1>(builtin, args)?;
            Value::Integer(real.as_real()? as i64)
        }
        Real => {
            let [int] = take::<1>(builtin, args)?;
            Value::RealNumber(int.as_int()? as f64)
        }
        String => {
            let [value] = take::<1>(builtin, args)?;
            Value::string(value.to_text())
        }
        Maximum => {
            let [a, b] = take::<2>(builtin, args)?;
            Value::Integer(a.as_int()?.max(b.as_int()?))
        }
        Minimum => {
            let [a, b] = take::<2>(builtin, args)?;
            Value::Integer(a.as_int()?.min(b.as_int()?))
        }

        // =====================================================================
        // list<T>
        // =====================================================================
        ListAppend => {
            let [list, item] = take::<2>(builtin, args)?;
            list.as_list()?.borrow_mut().push(item);
            return Ok(None);
        }
        ListExtend => {
            let [list, other] = take::<2>(builtin, args)?;
            let tail = other.as_list()?.borrow().clone();
            list.as_list()?.borrow_mut().extend(tail);
            return Ok(None);
        }
        ListPop => {
            let [list] = take::<1>(builtin, args)?;
            let popped = list.as_list()?.borrow_mut().pop();
            popped.ok_or_else(out_of_bounds)?
        }
        ListRemove => {
            let [list, index] = take::<2>(builtin, args)?;
            let list = list.as_list()?;
            let index = usize::try_from(index.as_int()?).map_err(|_| out_of_bounds())?;
            if index >= list.borrow().len() {
                return Err(out_of_bounds());
            }
            list.borrow_mut().remove(index);
            return Ok(None);
        }
        ListSize => {
            let [list] = take::<1>(builtin, args)?;
            Value::Integer(list.as_list()?.borrow().len() as i64)
        }
        ListCopy => {
            let [list] = take::<1>(builtin, args)?;
            Value::list(list.as_list()?.borrow().clone())
        }
        ListFind => {
            let [list, needle] = take::<2>(builtin, args)?;
            let position = list.as_list()?.borrow().iter().position(|v| *v == needle);
            Value::optional(position.map(|i| Value::Integer(i as i64)))
        }
        ListReversed => {
            let [list] = take::<1>(builtin, args)?;
            let mut items = list.as_list()?.borrow().clone();
            items.reverse();
            Value::list(items)
        }
        ListReverseInPlace => {
            let [list] = take::<1>(builtin, args)?;
            list.as_list()?.borrow_mut().reverse();
            return Ok(None);
        }
        ListSlice => {
            let [list, start, end] = take::<3>(builtin, args)?;
            let list = list.as_list()?.borrow();
            let (start, end) = slice_bounds(start.as_int()?, end.as_int()?, list.len())?;
            Value::list(list[start..end].to_vec())
        }
        ListSorted => {
            let [list] = take::<1>(builtin, args)?;
            let mut items = list.as_list()?.borrow().clone();
            sort(&mut items);
            Value::list(items)
        }
        ListSortInPlace => {
            let [list] = take::<1>(builtin, args)?;
            sort(&mut list.as_list()?.borrow_mut());
            return Ok(None);
        }

        // =====================================================================
        // map<K, V>
        // =====================================================================
        MapSize => {
            let [map] = take::<1>(builtin, args)?;
            Value::Integer(map.as_map()?.borrow().len() as i64)
        }
        MapKeys => {
            let [map] = take::<1>(builtin, args)?;
            Value::list(map.as_map()?.borrow().keys())
        }
        MapValues => {
            let [map] = take::<1>(builtin, args)?;
            Value::list(map.as_map()?.borrow().values())
        }
        MapEntries => {
            let [map] = take::<1>(builtin, args)?;
            let entries = map
                .as_map()?
                .borrow()
                .iter()
                .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
                .collect();
            Value::list(entries)
        }
        MapRemove => {
            let [map, key] = take::<2>(builtin, args)?;
            map.as_map()?.borrow_mut().remove(&key);
            return Ok(None);
        }
        MapClear => {
            let [map] = take::<1>(builtin, args)?;
            map.as_map()?.borrow_mut().clear();
            return Ok(None);
        }
        MapCopy => {
            let [map] = take::<1>(builtin, args)?;
            let copy: VeniceMap = map.as_map()?.borrow().clone();
            Value::map(copy)
        }

        // =====================================================================
        // string
        // =====================================================================
        StringSize => {
            let [s] = take::<1>(builtin, args)?;
            Value::Integer(s.as_str()?.len() as i64)
        }
        StringFind => {
            let [s, needle] = take::<2>(builtin, args)?;
            let index = s.as_str()?.find(&**needle.as_str()?);
            Value::optional(index.map(|i| Value::Integer(i as i64)))
        }
        StringStartsWith => {
            let [s, prefix] = take::<2>(builtin, args)?;
            Value::Boolean(s.as_str()?.starts_with(&**prefix.as_str()?))
        }
        StringEndsWith => {
            let [s, suffix] = take::<2>(builtin, args)?;
            Value::Boolean(s.as_str()?.ends_with(&**suffix.as_str()?))
        }
        StringSplit => {
            let [s, separator] = take::<2>(builtin, args)?;
            let words = s
                .as_str()?
                .split(&**separator.as_str()?)
                .map(Value::string)
                .collect();
            Value::list(words)
        }
        StringSplitSpace => {
            let [s] = take::<1>(builtin, args)?;
            Value::list(s.as_str()?.split_whitespace().map(Value::string).collect())
        }
        StringToLowercase => {
            let [s] = take::<1>(builtin, args)?;
            Value::string(s.as_str()?.to_lowercase())
        }
        StringToUppercase => {
            let [s] = take::<1>(builtin, args)?;
            Value::string(s.as_str()?.to_uppercase())
        }
        StringTrim => {
            let [s] = take::<1>(builtin, args)?;
            Value::string(s.as_str()?.trim())
        }
        StringReplaceAll => {
            let [s, from, to] = take::<3>(builtin, args)?;
            Value::string(s.as_str()?.replace(&**from.as_str()?, to.as_str()?))
        }
        StringSlice => {
            let [s, start, end] = take::<3>(builtin, args)?;
            let text: &Rc<str> = s.as_str()?;
            let (start, end) = slice_bounds(start.as_int()?, end.as_int()?, text.len())?;
            Value::string(std::string::String::from_utf8_lossy(&text.as_bytes()[start..end]).into_owned())
        }
        StringQuoted => {
            let [s] = take::<1>(builtin, args)?;
            Value::string(s.to_string())
        }
    };
    Ok(Some(value))
}

/// Stable sort; values without an order keep their relative position.
fn sort(items: &mut [Value]) {
    items.sort_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(builtin: Builtin, args: Vec<Value>) -> Result<Option<Value>> {
        call(builtin, args, &mut std::io::sink())
    }

    fn ints(items: &[i64]) -> Value {
        Value::list(items.iter().copied().map(Value::Integer).collect())
    }

    fn strings(items: &[&str]) -> Value {
        Value::list(items.iter().map(|s| Value::string(*s)).collect())
    }

    #[test]
    fn print_writes_unquoted_text() {
        let mut out = Vec::new();
        call(Builtin::Print, vec![Value::string("hi")], &mut out).unwrap();
        call(Builtin::Print, vec![strings(&["a"])], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hi\n[\"a\"]\n");
    }

    #[test]
    fn global_functions() {
        assert_eq!(run(Builtin::Range, vec![Value::Integer(1), Value::Integer(4)]).unwrap(), Some(ints(&[1, 2, 3])));
        assert_eq!(run(Builtin::Range, vec![Value::Integer(4), Value::Integer(1)]).unwrap(), Some(ints(&[])));
        assert_eq!(run(Builtin::Int, vec![Value::RealNumber(2.9)]).unwrap(), Some(Value::Integer(2)));
        assert_eq!(run(Builtin::Real, vec![Value::Integer(2)]).unwrap(), Some(Value::RealNumber(2.0)));
        assert_eq!(run(Builtin::String, vec![Value::Boolean(true)]).unwrap(), Some(Value::string("true")));
        assert_eq!(run(Builtin::Maximum, vec![Value::Integer(3), Value::Integer(7)]).unwrap(), Some(Value::Integer(7)));
        assert_eq!(run(Builtin::Minimum, vec![Value::Integer(3), Value::Integer(7)]).unwrap(), Some(Value::Integer(3)));
    }

    #[test]
    fn list_methods_mutate_in_place() {
        let list = ints(&[3, 1]);
        assert_eq!(run(Builtin::ListAppend, vec![list.clone(), Value::Integer(2)]).unwrap(), None);
        run(Builtin::ListSortInPlace, vec![list.clone()]).unwrap();
        assert_eq!(list, ints(&[1, 2, 3]));

        assert_eq!(run(Builtin::ListPop, vec![list.clone()]).unwrap(), Some(Value::Integer(3)));
        run(Builtin::ListRemove, vec![list.clone(), Value::Integer(0)]).unwrap();
        assert_eq!(list, ints(&[2]));

        run(Builtin::ListExtend, vec![list.clone(), ints(&[5, 4])]).unwrap();
        assert_eq!(run(Builtin::ListSorted, vec![list.clone()]).unwrap(), Some(ints(&[2, 4, 5])));
        assert_eq!(run(Builtin::ListReversed, vec![list.clone()]).unwrap(), Some(ints(&[4, 5, 2])));
        assert_eq!(list, ints(&[2, 5, 4]));
    }

    #[test]
    fn list_queries() {
        let list = ints(&[5, 6, 7]);
        assert_eq!(run(Builtin::ListSize, vec![list.clone()]).unwrap(), Some(Value::Integer(3)));
        assert_eq!(
            run(Builtin::ListFind, vec![list.clone(), Value::Integer(6)]).unwrap(),
            Some(Value::some(Value::Integer(1)))
        );
        assert_eq!(run(Builtin::ListFind, vec![list.clone(), Value::Integer(9)]).unwrap(), Some(Value::none()));
        assert_eq!(
            run(Builtin::ListSlice, vec![list.clone(), Value::Integer(1), Value::Integer(3)]).unwrap(),
            Some(ints(&[6, 7]))
        );

        let copy = run(Builtin::ListCopy, vec![list.clone()]).unwrap().unwrap();
        run(Builtin::ListReverseInPlace, vec![copy.clone()]).unwrap();
        assert_eq!(copy, ints(&[7, 6, 5]));
        assert_eq!(list, ints(&[5, 6, 7]));
    }

    #[test]
    fn list_bounds_panic() {
        let err = run(Builtin::ListPop, vec![ints(&[])]).unwrap_err();
        assert_eq!(err, RuntimeError::panic("index out of bounds"));
        let err = run(Builtin::ListRemove, vec![ints(&[1]), Value::Integer(-1)]).unwrap_err();
        assert!(err.is_panic());
        let err = run(Builtin::ListSlice, vec![ints(&[1]), Value::Integer(0), Value::Integer(2)]).unwrap_err();
        assert!(err.is_panic());
    }

    #[test]
    fn map_methods() {
        let map: VeniceMap = [
            (Value::string("a"), Value::Integer(1)),
            (Value::string("b"), Value::Integer(2)),
        ]
        .into_iter()
        .collect();
        let map = Value::map(map);

        assert_eq!(run(Builtin::MapSize, vec![map.clone()]).unwrap(), Some(Value::Integer(2)));
        assert_eq!(run(Builtin::MapKeys, vec![map.clone()]).unwrap(), Some(strings(&["a", "b"])));
        assert_eq!(run(Builtin::MapValues, vec![map.clone()]).unwrap(), Some(ints(&[1, 2])));
        assert_eq!(
            run(Builtin::MapEntries, vec![map.clone()]).unwrap(),
            Some(Value::list(vec![
                Value::tuple(vec![Value::string("a"), Value::Integer(1)]),
                Value::tuple(vec![Value::string("b"), Value::Integer(2)]),
            ]))
        );

        let copy = run(Builtin::MapCopy, vec![map.clone()]).unwrap().unwrap();
        run(Builtin::MapRemove, vec![map.clone(), Value::string("a")]).unwrap();
        assert_eq!(run(Builtin::MapSize, vec![map.clone()]).unwrap(), Some(Value::Integer(1)));
        run(Builtin::MapClear, vec![map.clone()]).unwrap();
        assert_eq!(run(Builtin::MapSize, vec![map]).unwrap(), Some(Value::Integer(0)));
        assert_eq!(run(Builtin::MapSize, vec![copy]).unwrap(), Some(Value::Integer(2)));
    }

    #[test]
    fn string_methods() {
        let s = || Value::string("  Hello World  ");
        assert_eq!(run(Builtin::StringSize, vec![s()]).unwrap(), Some(Value::Integer(15)));
        assert_eq!(run(Builtin::StringTrim, vec![s()]).unwrap(), Some(Value::string("Hello World")));
        assert_eq!(run(Builtin::StringSplitSpace, vec![s()]).unwrap(), Some(strings(&["Hello", "World"])));
        assert_eq!(
            run(Builtin::StringFind, vec![s(), Value::string("World")]).unwrap(),
            Some(Value::some(Value::Integer(8)))
        );
        assert_eq!(run(Builtin::StringFind, vec![s(), Value::string("x")]).unwrap(), Some(Value::none()));
        assert_eq!(
            run(Builtin::StringSplit, vec![Value::string("a,b,"), Value::string(",")]).unwrap(),
            Some(strings(&["a", "b", ""]))
        );
        assert_eq!(
            run(Builtin::StringReplaceAll, vec![Value::string("aXbX"), Value::string("X"), Value::string("-")]).unwrap(),
            Some(Value::string("a-b-"))
        );
        assert_eq!(
            run(Builtin::StringSlice, vec![Value::string("venice"), Value::Integer(1), Value::Integer(4)]).unwrap(),
            Some(Value::string("eni"))
        );
        assert_eq!(
            run(Builtin::StringStartsWith, vec![Value::string("venice"), Value::string("ven")]).unwrap(),
            Some(Value::Boolean(true))
        );
        assert_eq!(
            run(Builtin::StringEndsWith, vec![Value::string("venice"), Value::string("ven")]).unwrap(),
            Some(Value::Boolean(false))
        );
        assert_eq!(run(Builtin::StringToUppercase, vec![Value::string("ab")]).unwrap(), Some(Value::string("AB")));
        assert_eq!(run(Builtin::StringToLowercase, vec![Value::string("AB")]).unwrap(), Some(Value::string("ab")));
        assert_eq!(
            run(Builtin::StringQuoted, vec![Value::string("a\"b")]).unwrap(),
            Some(Value::string("\"a\\\"b\""))
        );
    }

    #[test]
    fn wrong_arity_is_internal() {
        let err = run(Builtin::Range, vec![Value::Integer(1)]).unwrap_err();
        assert!(!err.is_panic());
    }
}
