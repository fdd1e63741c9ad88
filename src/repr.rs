//! Stable, human-readable rendering of parameter lists.
//!
//! Case labels end up in test IDs, so they must not change between runs.
//! Default object representations embed a memory address; those fragments are
//! collapsed to just the type path.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::params::ParameterSet;
use crate::value::Value;

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([a-zA-Z0-9_\-\.]+) object at 0x[a-fA-F0-9]+>")
        .expect("address pattern is a valid regex")
});

/// Rewrites every `<path.Type object at 0x...>` fragment in `text` to `<path.Type>`.
///
/// ```rust
/// use parameterized::repr::clean_repr;
/// assert_eq!(clean_repr("<tests.Foo object at 0x23d8610>"), "<tests.Foo>");
/// assert_eq!(clean_repr("plain"), "plain");
/// ```
pub fn clean_repr(text: &str) -> String {
    ADDRESS_PATTERN.replace_all(text, "<$1>").into_owned()
}

/// The address-free representation of a single value.
///
/// Objects render as `<type_path>` whatever their type path contains, so
/// generic and reference types lose their address too.
pub fn stable_repr(value: &Value) -> String {
    match value {
        Value::Object(obj) => format!("<{}>", obj.type_path),
        Value::List(items) => format!("[{}]", format_values(items)),
        Value::Map(map) => {
            let entries = map
                .iter()
                .map(|(key, value)| format!("{key:?}: {}", stable_repr(value)))
                .collect::<Vec<_>>();
            format!("{{{}}}", entries.join(", "))
        }
        other => clean_repr(&other.repr()),
    }
}

/// Comma-joined rendering of a positional argument list.
pub fn format_values(values: &[Value]) -> String {
    values.iter().map(stable_repr).collect::<Vec<_>>().join(", ")
}

/// Renders a parameter set the way it appears in labels and case docs:
/// positional values comma-joined, named values as `name=value`.
pub fn format_parameter_list(params: &ParameterSet) -> String {
    match params {
        ParameterSet::Positional(values) => format_values(values),
        ParameterSet::Named(args) => args
            .iter()
            .map(|(name, value)| format!("{name}={}", stable_repr(value)))
            .collect::<Vec<_>>()
            .join(", "),
        ParameterSet::Scalar(value) => stable_repr(value),
    }
}

#[cfg(test)]
mod repr_tests {
    use super::*;
    use crate::value::{NamedArgs, ObjectRef};

    #[test]
    fn test_elides_every_address_fragment() {
        let text = "[<a.Foo object at 0x1>, <b.Bar object at 0xDEADbeef>]";
        assert_eq!(clean_repr(text), "[<a.Foo>, <b.Bar>]");
    }

    #[test]
    fn test_leaves_foreign_angle_brackets_alone() {
        assert_eq!(clean_repr("<lambda>"), "<lambda>");
        assert_eq!(clean_repr("<a b object at 0x1>"), "<a b object at 0x1>");
    }

    #[test]
    fn test_positional_list() {
        let params = ParameterSet::Positional(vec![
            Value::Int(1),
            Value::from("x"),
            Value::Object(ObjectRef::new("m.Foo", 0xabc)),
        ]);
        assert_eq!(format_parameter_list(&params), r#"1, "x", <m.Foo>"#);
    }

    #[test]
    fn test_named_list_keeps_order() {
        let args: NamedArgs = [("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(format_parameter_list(&ParameterSet::Named(args)), "b=2, a=1");
    }

    #[test]
    fn test_scalar_renders_alone() {
        let params = ParameterSet::Scalar(Value::Int(-3));
        assert_eq!(format_parameter_list(&params), "-3");
    }

    #[test]
    fn test_generic_type_paths_lose_their_address() {
        let items = vec![1];
        let object = Value::Object(ObjectRef::of(&items));
        let rendered = stable_repr(&object);
        assert!(!rendered.contains("0x"), "address leaked into {rendered}");
        assert!(rendered.starts_with('<') && rendered.ends_with("Vec<i32>>"), "unexpected {rendered}");

        let nested = Value::List(vec![Value::Object(ObjectRef::of(&&items)), Value::Int(2)]);
        let rendered = stable_repr(&nested);
        assert!(rendered.starts_with("[<&") && rendered.contains("Vec<i32>>,"), "unexpected {rendered}");
        assert!(rendered.ends_with(", 2]"));
    }
}
