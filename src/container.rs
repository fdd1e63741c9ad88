//! Test containers and the installation of generated cases into them.
//!
//! A [`Container`] is an immutable description of a test group: its
//! qualified name, its members in declaration order, and a side-table that
//! maps generated member names to the display suffix a runner appends when
//! reporting them. Every expansion returns a new container; the one passed in
//! is never modified, so a failed expansion leaves the caller's container
//! exactly as it was.
//!
//! # Entry points
//!
//! | Function                   | Expands                                   | Repeatable |
//! |----------------------------|-------------------------------------------|------------|
//! | [`ContainerBuilder::build`]| every declared test group                 | once       |
//! | [`expand_method`]          | one ordinary test member                  | per member |
//! | [`expand_container`]       | every ordinary test member, shared source | once       |
//!
//! # Example
//! ```rust
//! use parameterized::container::{expand_method, ContainerBuilder};
//! use parameterized::errors::ensure_eq;
//! use parameterized::materialize::TestDefinition;
//! use parameterized::naming::NamingMode;
//! use parameterized::params::ParameterSource;
//!
//! let container = ContainerBuilder::<()>::new("arith.AdditionExample")
//!     .test(TestDefinition::new("test_addition", |_, args| {
//!         ensure_eq(args.int(2)?, args.int(0)? + args.int(1)?)
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let source = ParameterSource::new().with((1, 2, 3)).with((4, 5, 9));
//! let expanded = expand_method(&container, "test_addition", source, NamingMode::ByArgumentRepr).unwrap();
//! assert_eq!(expanded.test_names().len(), 2);
//! assert!(container.get("test_addition").is_some());
//! ```

use std::collections::HashSet;
use std::fmt;

use im::{HashMap as ImHashMap, Vector};
use tracing::{debug, trace};

use crate::config::ExpansionConfig;
use crate::errors::{ConfigurationError, TestFailure};
use crate::materialize::{materialize, CaseArgs, GeneratedCase, TestDefinition};
use crate::naming::{indexed_name, NamingMode};
use crate::params::{normalize, ParameterSet, ParameterSource};
use crate::repr::stable_repr;
use crate::value::Value;

// ============================================================================
// DECLARATIONS
// ============================================================================

/// What a test author declares under a member name.
pub enum Declaration<C> {
    /// An ordinary test body.
    Test(TestDefinition<C>),
    /// A parameterized group, expanded when the container is built.
    Group(TestGroup<C>),
}

/// A declarative parameterization, expanded at container-definition time.
pub enum TestGroup<C> {
    Parameterized {
        definition: TestDefinition<C>,
        parameters: Vec<ParameterSet>,
        naming: NamingMode,
    },
    /// Items produced by hand; each must be a runnable case.
    Prebuilt(Vec<GroupItem<C>>),
}

/// One item yielded by a prebuilt group.
pub enum GroupItem<C> {
    Callable(GeneratedCase<C>),
    Other(Value),
}

impl<C> TestGroup<C> {
    /// Normalizes `source` now; materialization waits for the build.
    pub fn new(
        definition: TestDefinition<C>,
        source: ParameterSource,
        naming: NamingMode,
    ) -> Result<Self, ConfigurationError> {
        Ok(TestGroup::Parameterized {
            definition,
            parameters: normalize(source)?,
            naming,
        })
    }

    pub fn prebuilt(items: impl IntoIterator<Item = GroupItem<C>>) -> Self {
        TestGroup::Prebuilt(items.into_iter().collect())
    }

    fn into_cases(
        self,
        group_name: &str,
        config: &ExpansionConfig,
    ) -> Result<Vec<GeneratedCase<C>>, ConfigurationError> {
        match self {
            TestGroup::Parameterized {
                definition,
                parameters,
                naming,
            } => materialize(&definition, parameters, naming, &config.separator),
            TestGroup::Prebuilt(items) if items.is_empty() => Err(ConfigurationError::EmptySource),
            TestGroup::Prebuilt(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match item {
                    GroupItem::Callable(case) if case.uses_own_name() => Ok(case),
                    GroupItem::Callable(case) => {
                        Ok(case.renamed(indexed_name(group_name, &config.separator, index)))
                    }
                    GroupItem::Other(value) => Err(ConfigurationError::NotCallable {
                        name: group_name.to_string(),
                        value: stable_repr(&value),
                    }),
                })
                .collect(),
        }
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

/// An installed container member.
pub enum Member<C> {
    /// An ordinary, unparameterized test (or helper, without the test prefix).
    Test(TestDefinition<C>),
    /// A generated case.
    Case(GeneratedCase<C>),
}

impl<C> Member<C> {
    /// Runs the member with only the test context.
    pub fn invoke(&self, ctx: &mut C) -> Result<(), TestFailure> {
        match self {
            Member::Test(definition) => definition.call(ctx, CaseArgs::none()),
            Member::Case(case) => case.run(ctx),
        }
    }

    pub fn as_case(&self) -> Option<&GeneratedCase<C>> {
        match self {
            Member::Case(case) => Some(case),
            Member::Test(_) => None,
        }
    }

    /// Doc text a runner shows for this member.
    pub fn doc(&self) -> Option<&str> {
        match self {
            Member::Test(definition) => definition.description(),
            Member::Case(case) => Some(case.doc()),
        }
    }
}

impl<C> Clone for Member<C> {
    fn clone(&self) -> Self {
        match self {
            Member::Test(definition) => Member::Test(definition.clone()),
            Member::Case(case) => Member::Case(case.clone()),
        }
    }
}

impl<C> fmt::Debug for Member<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Test(definition) => f.debug_tuple("Test").field(definition).finish(),
            Member::Case(case) => f.debug_tuple("Case").field(case).finish(),
        }
    }
}

/// Expansion state of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// No generated case has been installed yet.
    Undecorated,
    /// Generated cases are installed; container-wide expansion is closed.
    Expanded,
}

// ============================================================================
// CONTAINER
// ============================================================================

/// Immutable description of a test container.
pub struct Container<C> {
    qualified_name: String,
    config: ExpansionConfig,
    members: Vector<(String, Member<C>)>,
    suffixes: ImHashMap<String, String>,
}

impl<C> Clone for Container<C> {
    fn clone(&self) -> Self {
        Self {
            qualified_name: self.qualified_name.clone(),
            config: self.config.clone(),
            members: self.members.clone(),
            suffixes: self.suffixes.clone(),
        }
    }
}

impl<C> fmt::Debug for Container<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("qualified_name", &self.qualified_name)
            .field("members", &self.member_names())
            .field("state", &self.state())
            .finish()
    }
}

impl<C> Container<C> {
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn config(&self) -> &ExpansionConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn state(&self) -> ContainerState {
        if self.suffixes.is_empty() {
            ContainerState::Undecorated
        } else {
            ContainerState::Expanded
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.state() == ContainerState::Expanded
    }

    pub fn members(&self) -> impl Iterator<Item = (&str, &Member<C>)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Names a runner discovers as tests, in declaration order.
    pub fn test_names(&self) -> Vec<&str> {
        self.members
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| self.config.is_test_name(name))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Member<C>> {
        self.members
            .iter()
            .find(|(member_name, _)| member_name == name)
            .map(|(_, member)| member)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|(member_name, _)| member_name == name)
    }

    /// Display suffix recorded for a generated member; empty otherwise.
    pub fn id_suffix(&self, name: &str) -> &str {
        self.suffixes.get(name).map_or("", String::as_str)
    }

    /// The base name a member was generated from.
    pub fn original_name<'a>(&self, name: &'a str) -> &'a str {
        self.config.separator.original_name(name)
    }

    /// Reported test ID: container, original base name, descriptive suffix.
    pub fn test_id(&self, name: &str) -> String {
        format!(
            "{}.{}{}",
            self.qualified_name,
            self.original_name(name),
            self.id_suffix(name)
        )
    }

    /// `"{original} ({container})"`, as a runner prints a test.
    pub fn display_name(&self, name: &str) -> String {
        format!("{} ({})", self.original_name(name), self.qualified_name)
    }

    /// First line of the member's doc text.
    pub fn short_description(&self, name: &str) -> Option<&str> {
        self.get(name)?.doc()?.lines().next()
    }

    /// Runs one member with only the test context.
    pub fn invoke(&self, name: &str, ctx: &mut C) -> Result<(), TestFailure> {
        let member = self.get(name).ok_or_else(|| {
            TestFailure::new(format!("'{}' has no member named '{name}'", self.qualified_name))
        })?;
        member.invoke(ctx)
    }
}

/// Inserts `cases` at `position`, failing on any clash with existing members.
fn splice<C>(
    container_name: &str,
    members: &mut Vector<(String, Member<C>)>,
    suffixes: &mut ImHashMap<String, String>,
    position: usize,
    cases: Vec<GeneratedCase<C>>,
) -> Result<(), ConfigurationError> {
    let mut installed = HashSet::with_capacity(cases.len());
    for case in &cases {
        if members.iter().any(|(name, _)| name == case.name()) {
            return Err(ConfigurationError::NameCollision {
                name: case.name().to_string(),
                container: container_name.to_string(),
            });
        }
        if !installed.insert(case.name()) {
            return Err(ConfigurationError::DuplicateName {
                name: case.name().to_string(),
            });
        }
    }

    for (offset, case) in cases.into_iter().enumerate() {
        trace!(
            container = container_name,
            member = case.name(),
            label = case.label(),
            "installed generated case"
        );
        let name = case.name().to_string();
        suffixes.insert(name.clone(), case.label().to_string());
        members.insert(position + offset, (name, Member::Case(case)));
    }
    Ok(())
}

/// Replaces member `base_name` with `cases`, in place and in order.
///
/// # Errors
///
/// [`ConfigurationError::MissingMember`] if `base_name` is absent, and
/// [`ConfigurationError::NameCollision`] if a case would shadow another member.
pub fn install_into_container<C>(
    container: &Container<C>,
    base_name: &str,
    cases: Vec<GeneratedCase<C>>,
) -> Result<Container<C>, ConfigurationError> {
    let position = container
        .position(base_name)
        .ok_or_else(|| ConfigurationError::MissingMember {
            name: base_name.to_string(),
            container: container.qualified_name.clone(),
        })?;

    let mut members = container.members.clone();
    let mut suffixes = container.suffixes.clone();
    members.remove(position);
    splice(&container.qualified_name, &mut members, &mut suffixes, position, cases)?;

    Ok(Container {
        qualified_name: container.qualified_name.clone(),
        config: container.config.clone(),
        members,
        suffixes,
    })
}

/// Member-level application: expands one ordinary test member.
pub fn expand_method<C>(
    container: &Container<C>,
    base_name: &str,
    source: ParameterSource,
    naming: NamingMode,
) -> Result<Container<C>, ConfigurationError> {
    let definition = match container.get(base_name) {
        Some(Member::Test(definition)) => definition,
        Some(Member::Case(_)) => {
            return Err(ConfigurationError::NotATestDefinition {
                name: base_name.to_string(),
            })
        }
        None => {
            return Err(ConfigurationError::MissingMember {
                name: base_name.to_string(),
                container: container.qualified_name.clone(),
            })
        }
    };

    let sets = normalize(source)?;
    let cases = materialize(definition, sets, naming, &container.config.separator)?;
    install_into_container(container, base_name, cases)
}

/// Container-level application: expands every ordinary test member with one
/// shared parameter source.
///
/// # Errors
///
/// [`ConfigurationError::AlreadyExpanded`] if the container already holds
/// generated cases, plus anything normalization or materialization reports.
pub fn expand_container<C>(
    container: &Container<C>,
    source: ParameterSource,
    naming: NamingMode,
) -> Result<Container<C>, ConfigurationError> {
    if container.is_expanded() {
        return Err(ConfigurationError::AlreadyExpanded {
            container: container.qualified_name.clone(),
        });
    }

    let sets = normalize(source)?;
    let targets: Vec<(String, TestDefinition<C>)> = container
        .members
        .iter()
        .filter(|(name, _)| container.config.is_test_name(name))
        .filter_map(|(name, member)| match member {
            Member::Test(definition) => Some((name.clone(), definition.clone())),
            Member::Case(_) => None,
        })
        .collect();

    let mut expanded = container.clone();
    for (name, definition) in &targets {
        let cases = materialize(definition, sets.clone(), naming, &container.config.separator)?;
        expanded = install_into_container(&expanded, name, cases)?;
    }

    debug!(
        container = container.qualified_name.as_str(),
        methods = targets.len(),
        cases_per_method = sets.len(),
        %naming,
        "expanded container"
    );
    Ok(expanded)
}

// ============================================================================
// BUILDER
// ============================================================================

/// Collects declarations and builds a [`Container`], expanding test groups.
pub struct ContainerBuilder<C> {
    qualified_name: String,
    config: ExpansionConfig,
    declarations: Vec<(String, Declaration<C>)>,
}

impl<C> ContainerBuilder<C> {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            config: ExpansionConfig::default(),
            declarations: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ExpansionConfig) -> Self {
        self.config = config;
        self
    }

    /// Declares `name`; a repeated name replaces the earlier declaration.
    pub fn declare(mut self, name: impl Into<String>, declaration: Declaration<C>) -> Self {
        let name = name.into();
        match self.declarations.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = declaration,
            None => self.declarations.push((name, declaration)),
        }
        self
    }

    pub fn test(self, definition: TestDefinition<C>) -> Self {
        let name = definition.name().to_string();
        self.declare(name, Declaration::Test(definition))
    }

    pub fn group(self, name: impl Into<String>, group: TestGroup<C>) -> Self {
        self.declare(name, Declaration::Group(group))
    }

    /// Declares `definition` parameterized by `source`, named by argument repr.
    pub fn parameters(
        self,
        definition: TestDefinition<C>,
        source: ParameterSource,
    ) -> Result<Self, ConfigurationError> {
        self.parameterized(definition, source, NamingMode::ByArgumentRepr)
    }

    /// Declares `definition` parameterized by `source`, named by first argument.
    pub fn named_parameters(
        self,
        definition: TestDefinition<C>,
        source: ParameterSource,
    ) -> Result<Self, ConfigurationError> {
        self.parameterized(definition, source, NamingMode::ByFirstArgument)
    }

    fn parameterized(
        self,
        definition: TestDefinition<C>,
        source: ParameterSource,
        naming: NamingMode,
    ) -> Result<Self, ConfigurationError> {
        let name = definition.name().to_string();
        let group = TestGroup::new(definition, source, naming)?;
        Ok(self.group(name, group))
    }

    /// Builds the container, expanding every declared test group in place.
    pub fn build(self) -> Result<Container<C>, ConfigurationError> {
        let mut members = Vector::new();
        let mut suffixes = ImHashMap::new();

        for (name, declaration) in self.declarations {
            match declaration {
                Declaration::Test(definition) => {
                    if members.iter().any(|(member_name, _)| *member_name == name) {
                        return Err(ConfigurationError::NameCollision {
                            name,
                            container: self.qualified_name,
                        });
                    }
                    members.push_back((name, Member::Test(definition)));
                }
                Declaration::Group(group) => {
                    if !self.config.is_test_name(&name) {
                        return Err(ConfigurationError::UndiscoverableGroup { name });
                    }
                    let cases = group.into_cases(&name, &self.config)?;
                    let position = members.len();
                    splice(&self.qualified_name, &mut members, &mut suffixes, position, cases)?;
                }
            }
        }

        debug!(
            container = self.qualified_name.as_str(),
            members = members.len(),
            generated = suffixes.len(),
            "built test container"
        );
        Ok(Container {
            qualified_name: self.qualified_name,
            config: self.config,
            members,
            suffixes,
        })
    }
}

#[cfg(test)]
mod container_tests {
    use super::*;
    use crate::errors::ensure_eq;
    use crate::naming::SeparatorToken;
    use crate::{case, record};

    type Log = Vec<String>;

    fn config() -> ExpansionConfig {
        ExpansionConfig::with_separator(SeparatorToken::fixed("SEP").unwrap())
    }

    fn logging(name: &str) -> TestDefinition<Log> {
        let tag = name.to_string();
        TestDefinition::new(name, move |log: &mut Log, args| {
            log.push(format!("{tag}:{}", args.len()));
            Ok(())
        })
    }

    fn base() -> Container<Log> {
        ContainerBuilder::new("suite.Example")
            .with_config(config())
            .test(logging("test_first"))
            .test(logging("helper"))
            .test(logging("test_second"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_method_expansion_replaces_member_in_place() {
        let container = base();
        let source = ParameterSource::new().with((1, 2)).with((3, 4));
        let expanded =
            expand_method(&container, "test_first", source, NamingMode::ByArgumentRepr).unwrap();

        assert_eq!(
            expanded.member_names(),
            vec!["test_firstSEP0", "test_firstSEP1", "helper", "test_second"]
        );
        assert_eq!(expanded.id_suffix("test_firstSEP1"), "(3, 4)");
        assert_eq!(expanded.id_suffix("test_second"), "");
        assert_eq!(expanded.state(), ContainerState::Expanded);
        assert_eq!(container.state(), ContainerState::Undecorated);
        assert_eq!(container.len(), 3);
    }

    #[test]
    fn test_ids_and_display_names() {
        let expanded = expand_method(
            &base(),
            "test_first",
            ParameterSource::new().with(record!(a = 1)),
            NamingMode::ByArgumentRepr,
        )
        .unwrap();
        assert_eq!(expanded.test_id("test_firstSEP0"), "suite.Example.test_first(a=1)");
        assert_eq!(expanded.display_name("test_firstSEP0"), "test_first (suite.Example)");
        assert_eq!(expanded.short_description("test_firstSEP0"), Some("test_first(a=1)"));
        assert_eq!(expanded.test_id("test_second"), "suite.Example.test_second");
    }

    #[test]
    fn test_first_argument_names_store_empty_suffix() {
        let expanded = expand_method(
            &base(),
            "test_first",
            ParameterSource::new().with(case!("Alpha", 1)).with(case!("Beta", 2)),
            NamingMode::ByFirstArgument,
        )
        .unwrap();
        assert!(expanded.contains("test_first_Alpha"));
        assert_eq!(expanded.id_suffix("test_first_Beta"), "");
        assert_eq!(expanded.test_id("test_first_Beta"), "suite.Example.test_first_Beta");
    }

    #[test]
    fn test_container_expansion_skips_helpers() {
        let expanded = expand_container(
            &base(),
            ParameterSource::new().with(-1).with(-2),
            NamingMode::ByArgumentRepr,
        )
        .unwrap();
        assert_eq!(
            expanded.member_names(),
            vec![
                "test_firstSEP0",
                "test_firstSEP1",
                "helper",
                "test_secondSEP0",
                "test_secondSEP1"
            ]
        );
        assert_eq!(expanded.test_names().len(), 4);
    }

    #[test]
    fn test_container_expansion_runs_once() {
        let expanded =
            expand_container(&base(), ParameterSource::new().with((1,)), NamingMode::ByArgumentRepr)
                .unwrap();
        let err = expand_container(&expanded, ParameterSource::new().with(2), NamingMode::ByArgumentRepr)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::AlreadyExpanded {
                container: "suite.Example".to_string()
            }
        );
        assert_eq!(expanded.len(), 3);
    }

    #[test]
    fn test_method_expansion_cannot_repeat() {
        let expanded = expand_method(
            &base(),
            "test_first",
            ParameterSource::new().with((1,)),
            NamingMode::ByArgumentRepr,
        )
        .unwrap();
        let err = expand_method(
            &expanded,
            "test_first",
            ParameterSource::new().with(2),
            NamingMode::ByArgumentRepr,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingMember { .. }));

        let err = expand_method(
            &expanded,
            "test_firstSEP0",
            ParameterSource::new().with(2),
            NamingMode::ByArgumentRepr,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::NotATestDefinition { .. }));
    }

    #[test]
    fn test_collision_with_existing_member_aborts() {
        let container = ContainerBuilder::new("suite.Clash")
            .with_config(config())
            .test(logging("test_x"))
            .test(logging("test_x_Taken"))
            .build()
            .unwrap();
        let err = expand_method(
            &container,
            "test_x",
            ParameterSource::new().with(case!("Free")).with(case!("Taken")),
            NamingMode::ByFirstArgument,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::NameCollision { name, .. } if name == "test_x_Taken"));
        assert!(container.contains("test_x"));
        assert!(!container.is_expanded());
    }

    #[test]
    fn test_builder_expands_declared_groups() {
        let container = ContainerBuilder::new("suite.Declared")
            .with_config(config())
            .test(logging("test_plain"))
            .parameters(logging("test_repr"), ParameterSource::new().with(1).with(2))
            .unwrap()
            .named_parameters(logging("test_named"), ParameterSource::new().with(case!("One", 1)))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            container.member_names(),
            vec!["test_plain", "test_reprSEP0", "test_reprSEP1", "test_named_One"]
        );

        let mut log = Log::new();
        for name in container.test_names() {
            container.invoke(name, &mut log).unwrap();
        }
        assert_eq!(log, vec!["test_plain:0", "test_repr:1", "test_repr:1", "test_named:1"]);
    }

    #[test]
    fn test_prebuilt_group_items() {
        let def: TestDefinition<Log> = logging("test_gen");
        let group = TestGroup::prebuilt(vec![
            GroupItem::Callable(GeneratedCase::unnamed(def.clone(), CaseArgs::none())),
            GroupItem::Callable(GeneratedCase::unnamed(
                def,
                CaseArgs::Positional(vec![Value::Int(1)]),
            )),
        ]);
        let container = ContainerBuilder::new("suite.Gen")
            .with_config(config())
            .group("test_gen", group)
            .build()
            .unwrap();
        assert_eq!(container.member_names(), vec!["test_genSEP0", "test_genSEP1"]);
        assert_eq!(container.original_name("test_genSEP1"), "test_gen");
    }

    #[test]
    fn test_prebuilt_group_rejects_non_callables() {
        let group: TestGroup<Log> = TestGroup::prebuilt(vec![GroupItem::Other(Value::Int(5))]);
        let err = ContainerBuilder::new("suite.Gen")
            .group("test_gen", group)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NotCallable {
                name: "test_gen".to_string(),
                value: "5".to_string()
            }
        );
    }

    #[test]
    fn test_empty_prebuilt_group_is_rejected() {
        let group: TestGroup<Log> = TestGroup::prebuilt(Vec::new());
        let err = ContainerBuilder::new("suite.Empty")
            .test(logging("test_kept"))
            .group("test_gen", group)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptySource);
    }

    #[test]
    fn test_group_without_prefix_is_rejected() {
        let group = TestGroup::new(
            logging("helper_cases"),
            ParameterSource::new().with((1,)),
            NamingMode::ByArgumentRepr,
        )
        .unwrap();
        let err = ContainerBuilder::new("suite.Bad")
            .group("helper_cases", group)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UndiscoverableGroup { .. }));
    }

    #[test]
    fn test_body_sees_arguments_through_container() {
        let def: TestDefinition<()> = TestDefinition::new("test_add", |_, args| {
            ensure_eq(args.int("expect")?, args.int("a")? + args.int("b")?)
        });
        let container = ContainerBuilder::new("suite.Named")
            .with_config(config())
            .parameters(def, ParameterSource::new().with(record!(a = 1, b = 2, expect = 3)))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(container.test_names(), vec!["test_addSEP0"]);
        container.invoke("test_addSEP0", &mut ()).unwrap();
    }
}
