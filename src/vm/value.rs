//! Runtime values.
//!
//! Lists, maps, and class objects are shared by reference: copying a
//! [`Value`] clones an `Rc`, and mutation through one copy is visible
//! through every other. Tuples and enum objects are immutable once built.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use venice_compiler::FunctionRef;
use venice_core::RuntimeError;

/// Case label of a present optional.
pub const OPTIONAL_SOME: &str = "Some";
/// Case label of an absent optional.
pub const OPTIONAL_NONE: &str = "None";

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit float
    RealNumber(f64),
    /// Immutable byte string
    String(Rc<str>),
    /// Boolean
    Boolean(bool),
    /// Single byte
    Character(u8),
    /// Growable list, shared by reference
    List(Rc<RefCell<Vec<Value>>>),
    /// Insertion-ordered map, shared by reference
    Map(Rc<RefCell<VeniceMap>>),
    /// Fixed-length tuple
    Tuple(Rc<[Value]>),
    /// Instance of a declared class
    ClassObject(Rc<ClassObject>),
    /// Case of a declared enum
    EnumObject(Rc<EnumObject>),
    /// Builtin or user function
    Function(FunctionRef),
    /// Function paired with its receiver
    BoundMethod(Rc<BoundMethod>),
    /// Cursor produced by `GET_ITER`
    Iterator(Rc<RefCell<ValueIter>>),
}

/// An instance of a class. Fields are stored in declaration order.
#[derive(Debug)]
pub struct ClassObject {
    /// Class name
    pub class: String,
    /// Field values
    pub fields: RefCell<Vec<Value>>,
}

/// A value of an enum case.
#[derive(Debug)]
pub struct EnumObject {
    /// Case label
    pub label: String,
    /// Payload values
    pub payload: Vec<Value>,
}

/// A method looked up on a receiver.
#[derive(Debug)]
pub struct BoundMethod {
    pub function: FunctionRef,
    pub receiver: Value,
}

impl Value {
    /// Build a string value.
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    /// Build a list value.
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// Build a map value.
    pub fn map(map: VeniceMap) -> Value {
        Value::Map(Rc::new(RefCell::new(map)))
    }

    /// Build a tuple value.
    pub fn tuple(items: Vec<Value>) -> Value {
        Value::Tuple(items.into())
    }

    /// Build an enum value.
    pub fn enum_case(label: impl Into<String>, payload: Vec<Value>) -> Value {
        Value::EnumObject(Rc::new(EnumObject {
            label: label.into(),
            payload,
        }))
    }

    /// Build a class instance.
    pub fn object(class: impl Into<String>, fields: Vec<Value>) -> Value {
        Value::ClassObject(Rc::new(ClassObject {
            class: class.into(),
            fields: RefCell::new(fields),
        }))
    }

    /// `Some(value)`
    pub fn some(value: Value) -> Value {
        Value::enum_case(OPTIONAL_SOME, vec![value])
    }

    /// `None`
    pub fn none() -> Value {
        Value::enum_case(OPTIONAL_NONE, Vec::new())
    }

    /// Wrap an `Option` as a Venice `Optional`.
    pub fn optional(value: Option<Value>) -> Value {
        value.map_or_else(Value::none, Value::some)
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::RealNumber(_) => "real",
            Value::String(_) => "string",
            Value::Boolean(_) => "bool",
            Value::Character(_) => "char",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::ClassObject(_) => "object",
            Value::EnumObject(_) => "enum",
            Value::Function(_) => "function",
            Value::BoundMethod(_) => "bound method",
            Value::Iterator(_) => "iterator",
        }
    }

    pub(crate) fn as_int(&self) -> Result<i64, RuntimeError> {
        match self {
            Value::Integer(i) => Ok(*i),
            other => Err(mismatch("int", other)),
        }
    }

    /// Integers are widened.
    pub(crate) fn as_real(&self) -> Result<f64, RuntimeError> {
        match self {
            Value::RealNumber(r) => Ok(*r),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(mismatch("real", other)),
        }
    }

    pub(crate) fn as_bool(&self) -> Result<bool, RuntimeError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    pub(crate) fn as_str(&self) -> Result<&Rc<str>, RuntimeError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    pub(crate) fn as_list(&self) -> Result<&Rc<RefCell<Vec<Value>>>, RuntimeError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(mismatch("list", other)),
        }
    }

    pub(crate) fn as_map(&self) -> Result<&Rc<RefCell<VeniceMap>>, RuntimeError> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(mismatch("map", other)),
        }
    }

    pub(crate) fn as_enum(&self) -> Result<&EnumObject, RuntimeError> {
        match self {
            Value::EnumObject(object) => Ok(object),
            other => Err(mismatch("enum", other)),
        }
    }

    /// Ordering for `<` and sorting. `None` for values with no order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::RealNumber(a), Value::RealNumber(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Character(a), Value::Character(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// The text `print` and `string()` produce. Unlike [`Display`], a
    /// top-level string or character is not quoted.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.to_string(),
            Value::Character(c) => char::from(*c).to_string(),
            other => other.to_string(),
        }
    }
}

fn mismatch(expected: &str, found: &Value) -> RuntimeError {
    RuntimeError::internal(format!("expected {expected}, found {}", found.kind()))
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::RealNumber(a), Value::RealNumber(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::ClassObject(a), Value::ClassObject(b)) => {
                Rc::ptr_eq(a, b) || (a.class == b.class && *a.fields.borrow() == *b.fields.borrow())
            }
            (Value::EnumObject(a), Value::EnumObject(b)) => {
                a.label == b.label && a.payload == b.payload
            }
            // Functions, bound methods, and iterators have no equality
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::RealNumber(r) => write!(f, "{r}"),
            Value::String(s) => write_quoted(f, s),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Character(c) => write!(f, "'{}'", char::from(*c).escape_default()),
            Value::List(items) => {
                f.write_str("[")?;
                write_joined(f, items.borrow().iter())?;
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items.iter())?;
                f.write_str(")")
            }
            Value::ClassObject(object) => {
                f.write_str("<object ")?;
                write_joined(f, object.fields.borrow().iter())?;
                f.write_str(">")
            }
            Value::EnumObject(object) => {
                f.write_str(&object.label)?;
                if !object.payload.is_empty() {
                    f.write_str("(")?;
                    write_joined(f, object.payload.iter())?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            Value::Function(function) => write!(f, "<function {:?}>", function.name()),
            Value::BoundMethod(method) => write!(f, "<bound method {:?}>", method.function.name()),
            Value::Iterator(iter) => f.write_str(iter.borrow().describe()),
        }
    }
}

fn write_joined<'v>(
    f: &mut fmt::Formatter<'_>,
    values: impl Iterator<Item = &'v Value>,
) -> fmt::Result {
    for (i, value) in values.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

/// Write `s` in double quotes with the usual escapes.
pub(crate) fn write_quoted(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

// ============================================================================
// Maps
// ============================================================================

/// An association list of key/value pairs.
///
/// Lookup is a linear scan; iteration follows insertion order. Storing an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct VeniceMap {
    entries: Vec<(Value, Value)>,
}

impl VeniceMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// The value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    /// Store `value` under `key`.
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> Vec<Value> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl FromIterator<(Value, Value)> for VeniceMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = VeniceMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// Maps are equal when they hold equal values under the same keys,
/// regardless of order.
impl PartialEq for VeniceMap {
    fn eq(&self, other: &VeniceMap) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// One step of an iterator.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// A list item or string character
    Item(Value),
    /// A map entry
    Entry(Value, Value),
}

/// A stateful cursor over a list, map, or string.
#[derive(Debug)]
pub enum ValueIter {
    /// Iterates the live list, so appends during the loop are visited.
    List {
        items: Rc<RefCell<Vec<Value>>>,
        next: usize,
    },
    /// Iterates a snapshot of the entries taken by `GET_ITER`.
    Map {
        entries: Vec<(Value, Value)>,
        next: usize,
    },
    /// Iterates the bytes of a string.
    String { text: Rc<str>, next: usize },
}

impl ValueIter {
    /// Start iterating `value`.
    pub fn over(value: &Value) -> Result<ValueIter, RuntimeError> {
        match value {
            Value::List(items) => Ok(ValueIter::List {
                items: Rc::clone(items),
                next: 0,
            }),
            Value::Map(map) => Ok(ValueIter::Map {
                entries: map
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                next: 0,
            }),
            Value::String(text) => Ok(ValueIter::String {
                text: Rc::clone(text),
                next: 0,
            }),
            other => Err(RuntimeError::internal(format!(
                "cannot iterate over {}",
                other.kind()
            ))),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ValueIter::List { .. } => "<list iterator>",
            ValueIter::Map { .. } => "<map iterator>",
            ValueIter::String { .. } => "<string iterator>",
        }
    }
}

impl Iterator for ValueIter {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        match self {
            ValueIter::List { items, next } => {
                let item = items.borrow().get(*next).cloned()?;
                *next += 1;
                Some(Element::Item(item))
            }
            ValueIter::Map { entries, next } => {
                let (key, value) = entries.get(*next).cloned()?;
                *next += 1;
                Some(Element::Entry(key, value))
            }
            ValueIter::String { text, next } => {
                let byte = *text.as_bytes().get(*next)?;
                *next += 1;
                Some(Element::Item(Value::Character(byte)))
            }
        }
    }
}
