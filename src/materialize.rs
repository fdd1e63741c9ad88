//! Case materialization: one named, closed-over test invocation per
//! parameter set.
//!
//! [`materialize`] binds a [`TestDefinition`] to each normalized
//! [`ParameterSet`], giving every resulting [`GeneratedCase`] its own
//! arguments, member name, side-band label and doc string.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{ConfigurationError, TestFailure};
use crate::naming::{first_argument_name, indexed_name, NamingMode, SeparatorToken};
use crate::params::ParameterSet;
use crate::repr::format_parameter_list;
use crate::value::{NamedArgs, Value};

/// Shared, immutable test body taking the test context and the case arguments.
pub type TestBody<C> = Arc<dyn Fn(&mut C, CaseArgs) -> Result<(), TestFailure> + Send + Sync>;

/// The unparameterized test: a base name, an optional description and a body.
pub struct TestDefinition<C> {
    name: String,
    description: Option<String>,
    body: TestBody<C>,
}

impl<C> TestDefinition<C> {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut C, CaseArgs) -> Result<(), TestFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            body: Arc::new(body),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Runs the body. Failures come back exactly as the body produced them.
    pub fn call(&self, ctx: &mut C, args: CaseArgs) -> Result<(), TestFailure> {
        (self.body)(ctx, args)
    }
}

impl<C> Clone for TestDefinition<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            body: Arc::clone(&self.body),
        }
    }
}

impl<C> fmt::Debug for TestDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// CASE ARGUMENTS
// ============================================================================

/// Arguments a generated case hands to the body.
///
/// Scalar parameter sets arrive as a single positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseArgs {
    Positional(Vec<Value>),
    Named(NamedArgs),
}

/// Something that addresses one argument: a position or a name.
pub trait ArgKey: fmt::Display + Copy {
    fn lookup(self, args: &CaseArgs) -> Option<&Value>;
}

impl ArgKey for usize {
    fn lookup(self, args: &CaseArgs) -> Option<&Value> {
        match args {
            CaseArgs::Positional(values) => values.get(self),
            CaseArgs::Named(_) => None,
        }
    }
}

impl ArgKey for &str {
    fn lookup(self, args: &CaseArgs) -> Option<&Value> {
        match args {
            CaseArgs::Named(named) => named.get(self),
            CaseArgs::Positional(_) => None,
        }
    }
}

impl CaseArgs {
    /// No arguments at all, as an ordinary test receives.
    pub fn none() -> Self {
        CaseArgs::Positional(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            CaseArgs::Positional(values) => values.len(),
            CaseArgs::Named(named) => named.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positional(&self) -> Option<&[Value]> {
        match self {
            CaseArgs::Positional(values) => Some(values),
            CaseArgs::Named(_) => None,
        }
    }

    pub fn named(&self) -> Option<&NamedArgs> {
        match self {
            CaseArgs::Named(named) => Some(named),
            CaseArgs::Positional(_) => None,
        }
    }

    /// Looks up one argument by position or name.
    pub fn get<K: ArgKey>(&self, key: K) -> Result<&Value, TestFailure> {
        key.lookup(self)
            .ok_or_else(|| TestFailure::new(format!("missing argument {key}")))
    }

    pub fn int<K: ArgKey>(&self, key: K) -> Result<i64, TestFailure> {
        let value = self.get(key)?;
        value.as_int().ok_or_else(|| wrong_type(key, "Int", value))
    }

    pub fn float<K: ArgKey>(&self, key: K) -> Result<f64, TestFailure> {
        let value = self.get(key)?;
        value.as_float().ok_or_else(|| wrong_type(key, "Float", value))
    }

    pub fn bool<K: ArgKey>(&self, key: K) -> Result<bool, TestFailure> {
        let value = self.get(key)?;
        value.as_bool().ok_or_else(|| wrong_type(key, "Bool", value))
    }

    pub fn str<K: ArgKey>(&self, key: K) -> Result<&str, TestFailure> {
        let value = self.get(key)?;
        value.as_str().ok_or_else(|| wrong_type(key, "Str", value))
    }

    pub fn list<K: ArgKey>(&self, key: K) -> Result<&[Value], TestFailure> {
        let value = self.get(key)?;
        value.as_list().ok_or_else(|| wrong_type(key, "List", value))
    }
}

fn wrong_type<K: ArgKey>(key: K, expected: &str, found: &Value) -> TestFailure {
    TestFailure::new(format!(
        "argument {key} should be {expected}, found {} {}",
        found.type_name(),
        found.repr()
    ))
}

impl From<ParameterSet> for CaseArgs {
    fn from(set: ParameterSet) -> Self {
        match set {
            ParameterSet::Positional(values) => CaseArgs::Positional(values),
            ParameterSet::Named(named) => CaseArgs::Named(named),
            ParameterSet::Scalar(value) => CaseArgs::Positional(vec![value]),
        }
    }
}

// ============================================================================
// GENERATED CASES
// ============================================================================

/// One materialized case: a test definition closed over one parameter set.
pub struct GeneratedCase<C> {
    name: String,
    base_name: String,
    label: String,
    doc: String,
    uses_own_name: bool,
    args: CaseArgs,
    definition: TestDefinition<C>,
}

impl<C> GeneratedCase<C> {
    /// A hand-built case that takes its member name from its position in a
    /// test group rather than from its arguments.
    pub fn unnamed(definition: TestDefinition<C>, args: CaseArgs) -> Self {
        let doc = describe(definition.name(), &args_list(&args), definition.description());
        Self {
            name: definition.name().to_string(),
            base_name: definition.name().to_string(),
            label: String::new(),
            doc,
            uses_own_name: false,
            args,
            definition,
        }
    }

    /// Member name; unique within one expansion.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Side-band display suffix; empty when the name already describes the case.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// True when the member name is descriptive and must be kept as is.
    pub fn uses_own_name(&self) -> bool {
        self.uses_own_name
    }

    pub fn args(&self) -> &CaseArgs {
        &self.args
    }

    /// Invokes the base body with this case's arguments.
    pub fn run(&self, ctx: &mut C) -> Result<(), TestFailure> {
        self.definition.call(ctx, self.args.clone())
    }

    pub(crate) fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }
}

impl<C> Clone for GeneratedCase<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            base_name: self.base_name.clone(),
            label: self.label.clone(),
            doc: self.doc.clone(),
            uses_own_name: self.uses_own_name,
            args: self.args.clone(),
            definition: self.definition.clone(),
        }
    }
}

impl<C> fmt::Debug for GeneratedCase<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedCase")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

/// Produces one [`GeneratedCase`] per parameter set, in order.
///
/// # Errors
///
/// Naming-contract violations from [`NamingMode::ByFirstArgument`], and
/// [`ConfigurationError::DuplicateName`] when two sets derive the same name.
pub fn materialize<C>(
    definition: &TestDefinition<C>,
    sets: Vec<ParameterSet>,
    naming: NamingMode,
    token: &SeparatorToken,
) -> Result<Vec<GeneratedCase<C>>, ConfigurationError> {
    let mut seen = HashSet::with_capacity(sets.len());
    let mut cases = Vec::with_capacity(sets.len());

    for (index, set) in sets.into_iter().enumerate() {
        let case = match naming {
            NamingMode::ByFirstArgument => named_case(definition, index, set)?,
            NamingMode::ByArgumentRepr => indexed_case(definition, index, set, token),
        };
        if !seen.insert(case.name.clone()) {
            return Err(ConfigurationError::DuplicateName { name: case.name });
        }
        cases.push(case);
    }

    debug!(
        base = definition.name(),
        cases = cases.len(),
        %naming,
        "materialized parameterized test"
    );
    Ok(cases)
}

fn named_case<C>(
    definition: &TestDefinition<C>,
    index: usize,
    set: ParameterSet,
) -> Result<GeneratedCase<C>, ConfigurationError> {
    let base = definition.name();
    let ParameterSet::Positional(mut values) = set else {
        return Err(ConfigurationError::NamingContract {
            base: base.to_string(),
            index,
        });
    };
    if values.is_empty() {
        return Err(ConfigurationError::EmptyNameArgument {
            base: base.to_string(),
            index,
        });
    }

    let first = values.remove(0);
    let name = first_argument_name(base, &first, index)?;
    let remaining = ParameterSet::Positional(values);
    let doc = describe(&name, &format_parameter_list(&remaining), definition.description());

    Ok(GeneratedCase {
        name,
        base_name: base.to_string(),
        label: String::new(),
        doc,
        uses_own_name: true,
        args: remaining.into(),
        definition: definition.clone(),
    })
}

fn indexed_case<C>(
    definition: &TestDefinition<C>,
    index: usize,
    set: ParameterSet,
    token: &SeparatorToken,
) -> GeneratedCase<C> {
    let base = definition.name();
    let list = format_parameter_list(&set);

    GeneratedCase {
        name: indexed_name(base, token, index),
        base_name: base.to_string(),
        label: format!("({list})"),
        doc: describe(base, &list, definition.description()),
        uses_own_name: false,
        args: set.into(),
        definition: definition.clone(),
    }
}

fn args_list(args: &CaseArgs) -> String {
    match args {
        CaseArgs::Positional(values) => format_parameter_list(&ParameterSet::Positional(values.clone())),
        CaseArgs::Named(named) => format_parameter_list(&ParameterSet::Named(named.clone())),
    }
}

fn describe(display_name: &str, list: &str, description: Option<&str>) -> String {
    let mut doc = format!("{display_name}({list})");
    if let Some(description) = description {
        doc.push('\n');
        doc.push_str(description);
    }
    doc
}
