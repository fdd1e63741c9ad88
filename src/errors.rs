//! Error types for parameterized test expansion.
//!
//! Two families exist and they never mix:
//!
//! - [`ConfigurationError`]: raised while a container is being defined
//!   (normalizing a parameter source, naming cases, installing members).
//!   These abort the expansion; nothing is installed.
//! - [`TestFailure`]: raised by a test body while a generated case runs.
//!   The engine only carries these through to the runner untouched.

use miette::Diagnostic;
use thiserror::Error;

/// Definition-time failure of an expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ConfigurationError {
    #[error("parameter source produced no test cases")]
    #[diagnostic(
        code(parameterized::config::empty_source),
        help("pass at least one tuple, record or scalar")
    )]
    EmptySource,

    #[error("a lazy parameter source may not yield another lazy source")]
    #[diagnostic(
        code(parameterized::config::nested_lazy),
        help("collect the inner iterator into tuples before handing it over")
    )]
    NestedLazySource,

    #[error("a single parameter entry must be a list, tuple, record or lazy source, got {value}")]
    #[diagnostic(
        code(parameterized::config::single_scalar),
        help("wrap a lone value in a tuple, e.g. `(value,)`, to run it as one case")
    )]
    SingleScalarSource { value: String },

    #[error("case {index} of '{base}' must be a positional tuple to be named by its first argument")]
    #[diagnostic(code(parameterized::config::naming_contract))]
    NamingContract { base: String, index: usize },

    #[error("case {index} of '{base}' has an empty first argument and cannot be named by it")]
    #[diagnostic(
        code(parameterized::config::empty_name_argument),
        help("give every case a non-empty name as its first element")
    )]
    EmptyNameArgument { base: String, index: usize },

    #[error("case {index} of '{base}' names itself '{suffix}', which is not a valid identifier suffix")]
    #[diagnostic(
        code(parameterized::config::invalid_name_suffix),
        help("case names may only contain ASCII letters, digits and underscores")
    )]
    InvalidNameSuffix {
        base: String,
        index: usize,
        suffix: String,
    },

    #[error("name of parameterized test case '{name}' is not unique")]
    #[diagnostic(code(parameterized::config::duplicate_name))]
    DuplicateName { name: String },

    #[error("generated case '{name}' collides with an existing member of '{container}'")]
    #[diagnostic(code(parameterized::config::name_collision))]
    NameCollision { name: String, container: String },

    #[error("cannot add parameters to '{container}', which already has parameterized methods")]
    #[diagnostic(code(parameterized::config::already_expanded))]
    AlreadyExpanded { container: String },

    #[error("'{container}' has no member named '{name}'")]
    #[diagnostic(code(parameterized::config::missing_member))]
    MissingMember { name: String, container: String },

    #[error("member '{name}' is not an ordinary test definition")]
    #[diagnostic(
        code(parameterized::config::not_a_test),
        help("only unexpanded test bodies can be parameterized")
    )]
    NotATestDefinition { name: String },

    #[error("test generator '{name}' must yield callables, got {value}")]
    #[diagnostic(code(parameterized::config::not_callable))]
    NotCallable { name: String, value: String },

    #[error("test group '{name}' lacks the test prefix and would never run")]
    #[diagnostic(
        code(parameterized::config::undiscoverable_group),
        help("rename the group so that it starts with the test prefix")
    )]
    UndiscoverableGroup { name: String },

    #[error("separator token '{token}' must be a non-empty run of identifier characters")]
    #[diagnostic(code(parameterized::config::invalid_separator))]
    InvalidSeparator { token: String },

    #[error("invalid parameter table: {message}")]
    #[diagnostic(code(parameterized::config::data_format))]
    DataFormat { message: String },
}

impl ConfigurationError {
    pub fn data_format(message: impl Into<String>) -> Self {
        ConfigurationError::DataFormat {
            message: message.into(),
        }
    }
}

/// A failure raised by a test body.
///
/// Carries optional expected/actual renderings so the runner can print a
/// comparison next to the case's descriptive label.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(parameterized::test::failure))]
pub struct TestFailure {
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: None,
            actual: None,
        }
    }

    /// Builds an assertion failure comparing two rendered values.
    pub fn mismatch(expected: impl std::fmt::Debug, actual: impl std::fmt::Debug) -> Self {
        let expected = format!("{expected:?}");
        let actual = format!("{actual:?}");
        Self {
            message: format!("expected {expected}, got {actual}"),
            expected: Some(expected),
            actual: Some(actual),
        }
    }
}

/// Fails with a [`TestFailure::mismatch`] unless `expected == actual`.
///
/// ```rust
/// use parameterized::errors::ensure_eq;
/// assert!(ensure_eq(3, 1 + 2).is_ok());
/// assert!(ensure_eq(3, 1 + 1).is_err());
/// ```
pub fn ensure_eq<T: PartialEq + std::fmt::Debug>(expected: T, actual: T) -> Result<(), TestFailure> {
    if expected == actual {
        Ok(())
    } else {
        Err(TestFailure::mismatch(expected, actual))
    }
}

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), TestFailure> {
    if condition {
        Ok(())
    } else {
        Err(TestFailure::new(message))
    }
}

#[cfg(test)]
mod errors_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn test_configuration_error_renders_code_and_help() {
        let report = Report::new(ConfigurationError::EmptySource);
        let output = format!("{report:?}");
        assert!(output.contains("parameterized::config::empty_source"));
        assert!(output.contains("at least one tuple"));
    }

    #[test]
    fn test_mismatch_keeps_both_sides() {
        let failure = TestFailure::mismatch(3, 2);
        assert_eq!(failure.expected.as_deref(), Some("3"));
        assert_eq!(failure.actual.as_deref(), Some("2"));
        assert_eq!(failure.to_string(), "expected 3, got 2");
    }

    #[test]
    fn test_ensure() {
        assert!(ensure(true, "never").is_ok());
        assert_eq!(ensure(false, "boom").unwrap_err().message, "boom");
    }
}
