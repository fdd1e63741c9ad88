//! Parameter sources and their normalization.
//!
//! A caller describes test inputs as a [`ParameterSource`]: an ordered list of
//! tuples, records, bare scalars, or lazy iterators of those. [`normalize`]
//! turns it into the canonical, non-empty list of [`ParameterSet`]s that the
//! materializer consumes. Order is significant and preserved end to end.
//!
//! # Shorthands
//!
//! - A bare scalar entry is one single-argument case. List and map values
//!   are unpacked instead: a list as positional, a map as named arguments.
//!   Wrap a list in a one-element tuple to pass it as a single argument.
//! - A lazy entry expands in place into the entries it yields.
//! - A source made of exactly one list scalar expands into one case per list
//!   element, so a whole table can be passed as one value. Any other lone
//!   scalar (other than a map) is rejected.
//!
//! # Example
//! ```rust
//! use parameterized::params::{normalize, ParameterSet, ParameterSource};
//! use parameterized::{case, record};
//!
//! let source = ParameterSource::from(vec![case!(1, 2, 3), record!(a = 1, b = 2)]);
//! let sets = normalize(source).unwrap();
//! assert_eq!(sets.len(), 2);
//! assert!(matches!(sets[1], ParameterSet::Named(_)));
//! ```

use std::fmt;
use std::path::Path;

use im::OrdMap;

use crate::errors::ConfigurationError;
use crate::repr::stable_repr;
use crate::value::{NamedArgs, Value};

/// One normalized case input.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterSet {
    /// Values unpacked as positional arguments.
    Positional(Vec<Value>),
    /// Values passed by argument name.
    Named(NamedArgs),
    /// A lone value passed as the only positional argument.
    Scalar(Value),
}

impl ParameterSet {
    pub fn kind(&self) -> &'static str {
        match self {
            ParameterSet::Positional(_) => "positional",
            ParameterSet::Named(_) => "named",
            ParameterSet::Scalar(_) => "scalar",
        }
    }

    /// Number of arguments the body receives for this set.
    pub fn arity(&self) -> usize {
        match self {
            ParameterSet::Positional(values) => values.len(),
            ParameterSet::Named(args) => args.len(),
            ParameterSet::Scalar(_) => 1,
        }
    }
}

/// A one-shot iterator of source entries, expanded during normalization.
pub struct LazyEntries(Box<dyn Iterator<Item = SourceEntry>>);

impl LazyEntries {
    pub fn new<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: 'static,
        E: Into<SourceEntry> + 'static,
    {
        Self(Box::new(entries.into_iter().map(Into::into)))
    }
}

impl fmt::Debug for LazyEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyEntries(..)")
    }
}

impl Iterator for LazyEntries {
    type Item = SourceEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

/// A caller-supplied entry, before normalization.
#[derive(Debug)]
pub enum SourceEntry {
    Tuple(Vec<Value>),
    Record(NamedArgs),
    Scalar(Value),
    Lazy(LazyEntries),
}

impl SourceEntry {
    pub fn tuple<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        SourceEntry::Tuple(values.into_iter().map(Into::into).collect())
    }

    pub fn lazy<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: 'static,
        E: Into<SourceEntry> + 'static,
    {
        SourceEntry::Lazy(LazyEntries::new(entries))
    }
}

impl From<Value> for SourceEntry {
    fn from(value: Value) -> Self {
        SourceEntry::Scalar(value)
    }
}

impl From<NamedArgs> for SourceEntry {
    fn from(args: NamedArgs) -> Self {
        SourceEntry::Record(args)
    }
}

impl From<ParameterSet> for SourceEntry {
    fn from(set: ParameterSet) -> Self {
        match set {
            ParameterSet::Positional(values) => SourceEntry::Tuple(values),
            ParameterSet::Named(args) => SourceEntry::Record(args),
            ParameterSet::Scalar(value) => SourceEntry::Scalar(value),
        }
    }
}

macro_rules! impl_scalar_entry {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SourceEntry {
                fn from(value: $ty) -> Self {
                    SourceEntry::Scalar(Value::from(value))
                }
            }
        )*
    };
}

impl_scalar_entry!(bool, i8, i16, i32, i64, u8, u16, u32, f32, f64, &str, String);

macro_rules! impl_tuple_entry {
    ($($name:ident),+) => {
        impl<$($name: Into<Value>),+> From<($($name,)+)> for SourceEntry {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                SourceEntry::Tuple(vec![$($name.into()),+])
            }
        }
    };
}

impl_tuple_entry!(A);
impl_tuple_entry!(A, B);
impl_tuple_entry!(A, B, C);
impl_tuple_entry!(A, B, C, D);
impl_tuple_entry!(A, B, C, D, E);
impl_tuple_entry!(A, B, C, D, E, F);
impl_tuple_entry!(A, B, C, D, E, F, G);
impl_tuple_entry!(A, B, C, D, E, F, G, H);

/// Builds a positional [`SourceEntry`] from a list of values.
///
/// ```rust
/// use parameterized::case;
/// use parameterized::params::SourceEntry;
/// assert!(matches!(case!("Normal", "aa", "aaa", true), SourceEntry::Tuple(v) if v.len() == 4));
/// ```
#[macro_export]
macro_rules! case {
    ($($value:expr),* $(,)?) => {
        $crate::params::SourceEntry::Tuple(vec![$($crate::value::Value::from($value)),*])
    };
}

/// Builds a named [`SourceEntry`] from `name = value` pairs.
#[macro_export]
macro_rules! record {
    ($($name:ident = $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut args = $crate::value::NamedArgs::new();
        $( args.insert(stringify!($name), $crate::value::Value::from($value)); )*
        $crate::params::SourceEntry::Record(args)
    }};
}

/// The ordered entries a caller hands to an expansion.
#[derive(Debug, Default)]
pub struct ParameterSource {
    entries: Vec<SourceEntry>,
}

impl ParameterSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, builder style.
    pub fn with(mut self, entry: impl Into<SourceEntry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn push(&mut self, entry: impl Into<SourceEntry>) {
        self.entries.push(entry.into());
    }

    /// A source consisting of a single lazy iterator.
    pub fn lazy<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        I::IntoIter: 'static,
        E: Into<SourceEntry> + 'static,
    {
        Self::new().with(SourceEntry::lazy(entries))
    }

    /// Number of entries as supplied; lazy entries count once.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ------------------------------------------------------------------------
    // Data-file tables
    // ------------------------------------------------------------------------

    /// Reads a parameter table from a YAML sequence.
    ///
    /// Sequence items become tuples, mapping items become records (keys kept
    /// in document order), anything else is a scalar case.
    ///
    /// ```rust
    /// use parameterized::params::{normalize, ParameterSet, ParameterSource};
    /// let source = ParameterSource::from_yaml_str("- [1, 2, 3]\n- {a: 1, b: 2}\n- -4\n").unwrap();
    /// let sets = normalize(source).unwrap();
    /// assert_eq!(sets.len(), 3);
    /// assert!(matches!(sets[2], ParameterSet::Scalar(_)));
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigurationError> {
        let doc: serde_yaml::Value = serde_yaml::from_str(text)
            .map_err(|e| ConfigurationError::data_format(format!("malformed YAML: {e}")))?;
        let serde_yaml::Value::Sequence(items) = doc else {
            return Err(ConfigurationError::data_format(
                "top-level YAML document must be a sequence of cases",
            ));
        };
        items
            .into_iter()
            .map(yaml_entry)
            .collect::<Result<Vec<_>, _>>()
            .map(|entries| Self { entries })
    }

    /// Reads a parameter table from a JSON array; see [`Self::from_yaml_str`].
    pub fn from_json_str(text: &str) -> Result<Self, ConfigurationError> {
        let doc: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ConfigurationError::data_format(format!("malformed JSON: {e}")))?;
        let serde_json::Value::Array(items) = doc else {
            return Err(ConfigurationError::data_format(
                "top-level JSON document must be an array of cases",
            ));
        };
        items
            .into_iter()
            .map(json_entry)
            .collect::<Result<Vec<_>, _>>()
            .map(|entries| Self { entries })
    }

    /// Reads a YAML parameter table from disk.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::data_format(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }
}

impl<E: Into<SourceEntry>> FromIterator<E> for ParameterSource {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<E: Into<SourceEntry>> From<Vec<E>> for ParameterSource {
    fn from(entries: Vec<E>) -> Self {
        entries.into_iter().collect()
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Turns a parameter source into its ordered, non-empty list of sets.
///
/// # Errors
///
/// [`ConfigurationError::EmptySource`] when nothing remains after expansion,
/// [`ConfigurationError::NestedLazySource`] when a lazy entry yields another,
/// [`ConfigurationError::SingleScalarSource`] when the only entry is a lone
/// value that is neither a list nor a mapping.
pub fn normalize(source: ParameterSource) -> Result<Vec<ParameterSet>, ConfigurationError> {
    let mut entries = source.entries;

    if matches!(entries.as_slice(), [SourceEntry::Scalar(Value::List(_))]) {
        if let Some(SourceEntry::Scalar(Value::List(items))) = entries.pop() {
            return non_empty(items.into_iter().map(list_item).collect());
        }
    }
    if let [SourceEntry::Scalar(value)] = entries.as_slice() {
        if !matches!(value, Value::Map(_)) {
            return Err(ConfigurationError::SingleScalarSource {
                value: stable_repr(value),
            });
        }
    }

    let mut sets = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            SourceEntry::Lazy(lazy) => {
                for inner in lazy {
                    sets.push(classify(inner)?);
                }
            }
            other => sets.push(classify(other)?),
        }
    }
    non_empty(sets)
}

fn non_empty(sets: Vec<ParameterSet>) -> Result<Vec<ParameterSet>, ConfigurationError> {
    if sets.is_empty() {
        return Err(ConfigurationError::EmptySource);
    }
    Ok(sets)
}

fn classify(entry: SourceEntry) -> Result<ParameterSet, ConfigurationError> {
    match entry {
        SourceEntry::Tuple(values) => Ok(ParameterSet::Positional(values)),
        SourceEntry::Record(args) => Ok(ParameterSet::Named(args)),
        SourceEntry::Scalar(value) => Ok(list_item(value)),
        SourceEntry::Lazy(_) => Err(ConfigurationError::NestedLazySource),
    }
}

fn list_item(value: Value) -> ParameterSet {
    match value {
        Value::List(values) => ParameterSet::Positional(values),
        Value::Map(map) => ParameterSet::Named(map.into_iter().collect()),
        other => ParameterSet::Scalar(other),
    }
}

// ============================================================================
// DATA-FILE CONVERSION
// ============================================================================

fn yaml_entry(item: serde_yaml::Value) -> Result<SourceEntry, ConfigurationError> {
    match item {
        serde_yaml::Value::Sequence(values) => values
            .into_iter()
            .map(yaml_value)
            .collect::<Result<Vec<_>, _>>()
            .map(SourceEntry::Tuple),
        serde_yaml::Value::Mapping(mapping) => {
            let mut args = NamedArgs::new();
            for (key, value) in mapping {
                args.insert(yaml_key(key)?, yaml_value(value)?);
            }
            Ok(SourceEntry::Record(args))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_entry(tagged.value),
        scalar => yaml_value(scalar).map(SourceEntry::Scalar),
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, ConfigurationError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        other => Err(ConfigurationError::data_format(format!(
            "argument names must be strings, got {other:?}"
        ))),
    }
}

fn yaml_value(value: serde_yaml::Value) -> Result<Value, ConfigurationError> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Nil,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_yaml::Value::String(s) => Value::Str(s),
        serde_yaml::Value::Sequence(items) => Value::List(
            items
                .into_iter()
                .map(yaml_value)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = OrdMap::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_value(value)?);
            }
            Value::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_value(tagged.value)?,
    })
}

fn json_entry(item: serde_json::Value) -> Result<SourceEntry, ConfigurationError> {
    Ok(match item {
        serde_json::Value::Array(values) => {
            SourceEntry::Tuple(values.into_iter().map(json_value).collect())
        }
        serde_json::Value::Object(object) => SourceEntry::Record(
            object
                .into_iter()
                .map(|(k, v)| (k, json_value(v)))
                .collect(),
        ),
        scalar => SourceEntry::Scalar(json_value(scalar)),
    })
}

fn json_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => Value::List(items.into_iter().map(json_value).collect()),
        serde_json::Value::Object(object) => Value::Map(
            object
                .into_iter()
                .map(|(k, v)| (k, json_value(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod params_tests {
    use super::*;

    #[test]
    fn test_positional_named_and_scalar_entries() {
        let source = ParameterSource::new()
            .with((1, 2, 3))
            .with(record!(a = 1))
            .with(-1);
        let sets = normalize(source).unwrap();
        assert_eq!(
            sets,
            vec![
                ParameterSet::Positional(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
                ParameterSet::Named([("a", 1)].into_iter().collect()),
                ParameterSet::Scalar(Value::Int(-1)),
            ]
        );
    }

    #[test]
    fn test_empty_source_is_rejected() {
        assert_eq!(
            normalize(ParameterSource::new()),
            Err(ConfigurationError::EmptySource)
        );
        assert_eq!(
            normalize(ParameterSource::lazy(Vec::<SourceEntry>::new())),
            Err(ConfigurationError::EmptySource)
        );
    }

    #[test]
    fn test_singleton_lazy_expands_in_place() {
        let source = ParameterSource::lazy((0..3).map(|i| (i, i + 1)));
        let sets = normalize(source).unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(
            sets[2],
            ParameterSet::Positional(vec![Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_lazy_among_other_entries_keeps_order() {
        let source = ParameterSource::new()
            .with(case!("first"))
            .with(SourceEntry::lazy(vec![case!("second"), case!("third")]))
            .with(case!("fourth"));
        let names: Vec<_> = normalize(source)
            .unwrap()
            .into_iter()
            .map(|set| match set {
                ParameterSet::Positional(v) => v[0].to_string(),
                other => other.kind().to_string(),
            })
            .collect();
        assert_eq!(names, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_nested_lazy_is_rejected() {
        let inner = SourceEntry::lazy(vec![case!(1)]);
        let source = ParameterSource::lazy(vec![inner]);
        assert_eq!(normalize(source), Err(ConfigurationError::NestedLazySource));
    }

    #[test]
    fn test_singleton_list_scalar_is_a_table() {
        let table = Value::from(vec![
            Value::from(vec![1, 2]),
            Value::Int(7),
        ]);
        let sets = normalize(ParameterSource::new().with(table)).unwrap();
        assert_eq!(
            sets,
            vec![
                ParameterSet::Positional(vec![Value::Int(1), Value::Int(2)]),
                ParameterSet::Scalar(Value::Int(7)),
            ]
        );
    }

    #[test]
    fn test_singleton_record_and_tuple_stay_single() {
        let sets = normalize(ParameterSource::new().with(record!(a = 1, b = 2, expect = 3))).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].arity(), 3);

        let sets = normalize(ParameterSource::new().with((vec![-1, 0, 1],))).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].arity(), 1);
    }

    #[test]
    fn test_yaml_table_keeps_record_order() {
        let source = ParameterSource::from_yaml_str("- {op2: 2, op1: 1}\n").unwrap();
        let sets = normalize(source).unwrap();
        let ParameterSet::Named(args) = &sets[0] else {
            panic!("expected a named set, got {:?}", sets[0]);
        };
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["op2", "op1"]);
    }

    #[test]
    fn test_yaml_non_sequence_is_rejected() {
        let err = ParameterSource::from_yaml_str("a: 1").unwrap_err();
        assert!(matches!(err, ConfigurationError::DataFormat { .. }));
    }

    #[test]
    fn test_json_table() {
        let source = ParameterSource::from_json_str(r#"[[1, 2.5, "x"], {"a": null}, true]"#).unwrap();
        let sets = normalize(source).unwrap();
        assert_eq!(
            sets[0],
            ParameterSet::Positional(vec![Value::Int(1), Value::Float(2.5), Value::from("x")])
        );
        assert_eq!(sets[1], ParameterSet::Named([("a", Value::Nil)].into_iter().collect()));
        assert_eq!(sets[2], ParameterSet::Scalar(Value::Bool(true)));
    }

    #[test]
    fn test_list_and_map_values_are_unpacked() {
        let mut row = OrdMap::new();
        row.insert("a".to_string(), Value::Int(1));
        let source = ParameterSource::new()
            .with(Value::Map(row.clone()))
            .with(Value::from(vec![1, 2, 3]))
            .with(Value::from(vec![4, 5, 9]));
        let kinds: Vec<_> = normalize(source).unwrap().iter().map(ParameterSet::kind).collect();
        assert_eq!(kinds, vec!["named", "positional", "positional"]);

        let sets = normalize(ParameterSource::lazy(vec![Value::Map(row.clone()), Value::Map(row)])).unwrap();
        assert_eq!(sets[1], ParameterSet::Named([("a", 1)].into_iter().collect()));
    }

    #[test]
    fn test_lone_scalar_source_is_rejected() {
        assert_eq!(
            normalize(ParameterSource::new().with("abc")),
            Err(ConfigurationError::SingleScalarSource {
                value: "\"abc\"".to_string()
            })
        );
        assert!(matches!(
            normalize(ParameterSource::new().with(5)),
            Err(ConfigurationError::SingleScalarSource { .. })
        ));
        let sets = normalize(ParameterSource::new().with((5,))).unwrap();
        assert_eq!(sets, vec![ParameterSet::Positional(vec![Value::Int(5)])]);
    }

    #[test]
    fn test_json_records_keep_document_order() {
        let source = ParameterSource::from_json_str(r#"[{"op2": 2, "op1": 1}]"#).unwrap();
        let sets = normalize(source).unwrap();
        let ParameterSet::Named(args) = &sets[0] else {
            panic!("expected a named set, got {:?}", sets[0]);
        };
        assert_eq!(args.names().collect::<Vec<_>>(), vec!["op2", "op1"]);
    }
}
