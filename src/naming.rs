//! Case naming.
//!
//! Every generated case needs a member name that is unique inside its
//! container. Two strategies exist, chosen once per expansion:
//!
//! - [`NamingMode::ByFirstArgument`]: the first element of each positional
//!   tuple is appended to the base name and dropped from the arguments.
//!   Names are stable, greppable and selectable on their own.
//! - [`NamingMode::ByArgumentRepr`]: the base name gets the process
//!   [`SeparatorToken`] plus the case index. The readable text lives in a
//!   side-band label instead of the name.

use std::fmt;

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::value::Value;

/// Name prefix a test runner uses to discover test members.
pub const TEST_PREFIX: &str = "test";

/// Base names in underscore style get an extra `_` before a case name.
const UNDERSCORE_STYLE_PREFIX: &str = "test_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingMode {
    ByFirstArgument,
    #[default]
    ByArgumentRepr,
}

impl fmt::Display for NamingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingMode::ByFirstArgument => write!(f, "by-first-argument"),
            NamingMode::ByArgumentRepr => write!(f, "by-argument-repr"),
        }
    }
}

// ============================================================================
// SEPARATOR TOKEN
// ============================================================================

static PROCESS_TOKEN: Lazy<SeparatorToken> = Lazy::new(SeparatorToken::generate);

/// Opaque token spliced between a base name and a case index.
///
/// The process-wide token is random, so index-based names can never be
/// mistaken for (or collide with) hand-written member names. Tests inject a
/// fixed token to get predictable names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeparatorToken(String);

impl SeparatorToken {
    /// The token shared by every expansion in this process.
    pub fn process() -> SeparatorToken {
        PROCESS_TOKEN.clone()
    }

    /// A caller-chosen token.
    ///
    /// ```rust
    /// use parameterized::naming::SeparatorToken;
    /// assert!(SeparatorToken::fixed("SEP").is_ok());
    /// assert!(SeparatorToken::fixed("").is_err());
    /// assert!(SeparatorToken::fixed("a-b").is_err());
    /// ```
    pub fn fixed(token: impl Into<String>) -> Result<Self, ConfigurationError> {
        let token = token.into();
        if !is_identifier_suffix(&token) {
            return Err(ConfigurationError::InvalidSeparator { token });
        }
        Ok(Self(token))
    }

    fn generate() -> Self {
        let bits: u128 = rand::thread_rng().gen();
        Self(format!("{bits:032x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the base name from an index-based member name.
    ///
    /// Names that do not carry the token are returned unchanged.
    pub fn original_name<'a>(&self, member_name: &'a str) -> &'a str {
        member_name
            .split_once(self.0.as_str())
            .map_or(member_name, |(base, _)| base)
    }
}

impl Default for SeparatorToken {
    fn default() -> Self {
        Self::process()
    }
}

impl fmt::Display for SeparatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SeparatorToken {
    type Error = ConfigurationError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::fixed(token)
    }
}

impl From<SeparatorToken> for String {
    fn from(token: SeparatorToken) -> Self {
        token.0
    }
}

// ============================================================================
// NAME DERIVATION
// ============================================================================

/// True if `text` can be appended to an identifier and keep it an identifier.
pub fn is_identifier_suffix(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Derives a member name from the case's first argument.
///
/// ```rust
/// use parameterized::naming::first_argument_name;
/// use parameterized::value::Value;
/// let name = first_argument_name("test_starts_with", &Value::from("Normal"), 0).unwrap();
/// assert_eq!(name, "test_starts_with_Normal");
/// let name = first_argument_name("testStartsWith", &Value::from("Normal"), 0).unwrap();
/// assert_eq!(name, "testStartsWithNormal");
/// ```
pub fn first_argument_name(
    base: &str,
    first: &Value,
    index: usize,
) -> Result<String, ConfigurationError> {
    if !first.is_truthy() {
        return Err(ConfigurationError::EmptyNameArgument {
            base: base.to_string(),
            index,
        });
    }
    let suffix = first.to_string();
    if !is_identifier_suffix(&suffix) {
        return Err(ConfigurationError::InvalidNameSuffix {
            base: base.to_string(),
            index,
            suffix,
        });
    }

    let mut name = String::with_capacity(base.len() + suffix.len() + 1);
    name.push_str(base);
    if base.starts_with(UNDERSCORE_STYLE_PREFIX) && !suffix.starts_with('_') {
        name.push('_');
    }
    name.push_str(&suffix);
    Ok(name)
}

/// Index-based member name: `{base}{token}{index}`.
pub fn indexed_name(base: &str, token: &SeparatorToken, index: usize) -> String {
    format!("{base}{token}{index}")
}

#[cfg(test)]
mod naming_tests {
    use super::*;

    #[test]
    fn test_underscore_rule() {
        let name = first_argument_name("test_x", &Value::from("_private"), 0).unwrap();
        assert_eq!(name, "test_x_private");
        let name = first_argument_name("check", &Value::from("Case"), 0).unwrap();
        assert_eq!(name, "checkCase");
    }

    #[test]
    fn test_non_string_first_arguments_use_their_text() {
        assert_eq!(
            first_argument_name("test_n", &Value::Int(42), 0).unwrap(),
            "test_n_42"
        );
        assert_eq!(
            first_argument_name("test_b", &Value::Bool(true), 0).unwrap(),
            "test_b_true"
        );
    }

    #[test]
    fn test_falsy_first_argument_is_rejected() {
        for first in [Value::from(""), Value::Nil, Value::Int(0), Value::Bool(false)] {
            let err = first_argument_name("test_x", &first, 3).unwrap_err();
            assert_eq!(
                err,
                ConfigurationError::EmptyNameArgument {
                    base: "test_x".to_string(),
                    index: 3
                }
            );
        }
    }

    #[test]
    fn test_non_identifier_first_argument_is_rejected() {
        let err = first_argument_name("test_x", &Value::from("has space"), 1).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidNameSuffix { suffix, .. } if suffix == "has space"));
        let err = first_argument_name("test_x", &Value::Float(1.5), 1).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidNameSuffix { .. }));
    }

    #[test]
    fn test_process_token_is_stable_and_opaque() {
        let a = SeparatorToken::process();
        let b = SeparatorToken::process();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(is_identifier_suffix(a.as_str()));
    }

    #[test]
    fn test_original_name_splits_at_token() {
        let token = SeparatorToken::fixed("SEP").unwrap();
        let name = indexed_name("test_add", &token, 12);
        assert_eq!(name, "test_addSEP12");
        assert_eq!(token.original_name(&name), "test_add");
        assert_eq!(token.original_name("test_plain"), "test_plain");
    }

    #[test]
    fn test_token_deserialization_is_validated() {
        let token: SeparatorToken = serde_yaml::from_str("XSEPX").unwrap();
        assert_eq!(token.as_str(), "XSEPX");
        assert!(serde_yaml::from_str::<SeparatorToken>("'x y'").is_err());
    }
}
