//! Parameterized test-case expansion.
//!
//! One test body plus a parameter source becomes one independently named,
//! independently runnable case per parameter set, installed into an immutable
//! test [`Container`](container::Container).
//!
//! Pipeline: [`params::normalize`] → [`materialize::materialize`] →
//! [`container::install_into_container`], driven by
//! [`container::ContainerBuilder::build`], [`container::expand_method`] or
//! [`container::expand_container`].

pub use crate::errors::{ConfigurationError, TestFailure};

pub mod config;
pub mod container;
pub mod errors;
pub mod materialize;
pub mod naming;
pub mod params;
pub mod report;
pub mod repr;
pub mod runner;
pub mod value;

pub mod prelude {
    pub use crate::config::{ExpansionConfig, HarnessConfig, RunnerConfig};
    pub use crate::container::{
        expand_container, expand_method, Container, ContainerBuilder, Declaration, GroupItem,
        Member, TestGroup,
    };
    pub use crate::errors::{ensure, ensure_eq, ConfigurationError, TestFailure};
    pub use crate::materialize::{CaseArgs, GeneratedCase, TestDefinition};
    pub use crate::naming::{NamingMode, SeparatorToken};
    pub use crate::params::{ParameterSet, ParameterSource, SourceEntry};
    pub use crate::runner::{CaseOutcome, CaseRunner, Fixture, RunReport};
    pub use crate::value::{NamedArgs, ObjectRef, Value};
    pub use crate::{case, record};
}
