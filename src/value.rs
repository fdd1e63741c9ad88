use std::fmt;

use im::OrdMap;
use serde::{Deserialize, Serialize};

/// A single argument value handed to a parameterized test body.
///
/// # Examples
///
/// ```rust
/// use parameterized::value::Value;
/// let n = Value::Int(3);
/// assert_eq!(n.type_name(), "Int");
/// let s = Value::from("hello");
/// assert_eq!(s.repr(), "\"hello\"");
/// assert_eq!(s.to_string(), "hello");
/// assert!(Value::default().is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(OrdMap<String, Value>),
    #[serde(skip_deserializing)]
    Object(ObjectRef),
}

/// An opaque user object, identified by its type path and the address it
/// lived at when the parameter table was built.
///
/// Its representation follows the `<path.Type object at 0x...>` convention;
/// the address part is volatile and gets elided from case labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub type_path: String,
    pub address: usize,
}

impl ObjectRef {
    pub fn new(type_path: impl Into<String>, address: usize) -> Self {
        Self {
            type_path: type_path.into(),
            address,
        }
    }

    /// Captures the type path and current address of `value`.
    pub fn of<T>(value: &T) -> Self {
        let type_path = std::any::type_name::<T>().replace("::", ".");
        Self {
            type_path,
            address: value as *const T as usize,
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} object at {:#x}>", self.type_path, self.address)
    }
}

impl Value {
    /// Returns the type name of the value as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Str(_) => "Str",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Object(_) => "Object",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Truthiness used by the first-argument naming rule.
    ///
    /// Nil, `false`, zero, and empty strings or collections are falsy.
    ///
    /// ```rust
    /// use parameterized::value::Value;
    /// assert!(!Value::from("").is_truthy());
    /// assert!(!Value::Int(0).is_truthy());
    /// assert!(Value::from("Normal").is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(map) => !map.is_empty(),
            Value::Object(_) => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float; integers widen.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&OrdMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Debugging representation: strings are quoted, containers show the
    /// representation of their elements.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.write_repr(&mut out);
        out
    }

    fn write_repr(&self, out: &mut String) {
        match self {
            Value::Str(s) => out.push_str(&format!("{s:?}")),
            Value::Float(n) => out.push_str(&format!("{n:?}")),
            Value::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_repr(out);
                }
                out.push(']');
            }
            Value::Map(map) => {
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&format!("{key:?}: "));
                    value.write_repr(out);
                }
                out.push('}');
            }
            other => out.push_str(&other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Object(obj) => write!(f, "{obj}"),
            Value::List(_) | Value::Map(_) => write!(f, "{}", self.repr()),
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

// ============================================================================
// NAMED ARGUMENTS
// ============================================================================

/// Ordered mapping from argument name to value.
///
/// Insertion order is kept so that labels and documentation list keyword
/// arguments in the order the author wrote them. Re-inserting a name replaces
/// its value in place.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NamedArgs {
    entries: Vec<(String, Value)>,
}

impl NamedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `name`, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for NamedArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = NamedArgs::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn test_repr_quotes_strings_and_nests() {
        let v = Value::from(vec![Value::from("a"), Value::Int(1), Value::Float(2.0)]);
        assert_eq!(v.repr(), r#"["a", 1, 2.0]"#);
        assert_eq!(Value::from("a\"b").repr(), r#""a\"b""#);
    }

    #[test]
    fn test_display_leaves_strings_bare() {
        assert_eq!(Value::from("Normal").to_string(), "Normal");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Nil.to_string(), "nil");
    }

    #[test]
    fn test_map_repr_is_sorted_by_key() {
        let mut map = OrdMap::new();
        map.insert("b".to_string(), Value::Int(2));
        map.insert("a".to_string(), Value::Int(1));
        assert_eq!(Value::Map(map).repr(), r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::Object(ObjectRef::new("m.Foo", 0x10)).is_truthy());
    }

    #[test]
    fn test_object_repr_carries_address() {
        let obj = ObjectRef::new("tests.Foo", 0x23d8610);
        assert_eq!(Value::Object(obj).repr(), "<tests.Foo object at 0x23d8610>");
    }

    #[test]
    fn test_named_args_keep_insertion_order() {
        let mut args: NamedArgs = [("op1", 1), ("op2", 2)].into_iter().collect();
        args.insert("result", 3);
        let previous = args.insert("op1", 10);
        assert_eq!(previous, Some(Value::Int(1)));
        let names: Vec<_> = args.names().collect();
        assert_eq!(names, vec!["op1", "op2", "result"]);
        assert_eq!(args.get("op1"), Some(&Value::Int(10)));
    }

    #[test]
    fn test_float_widening() {
        assert_eq!(Value::Int(4).as_float(), Some(4.0));
        assert_eq!(Value::from("4").as_float(), None);
    }
}
