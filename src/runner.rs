//! Runs the members of a container the way a host test runner would.
//!
//! Each discovered test member gets a fresh fixture, set-up, the body and
//! tear-down. Outcomes are keyed by test ID, so a generated case reports
//! under its base name plus its descriptive suffix. One failing case never
//! stops its siblings unless `fail_fast` is set.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info};

use crate::config::RunnerConfig;
use crate::container::{Container, Member};
use crate::errors::TestFailure;

/// Per-case test context.
///
/// A new value is created for every case; nothing a case does to its
/// fixture is visible to the next one.
pub trait Fixture: Sized {
    fn create() -> Result<Self, TestFailure>;

    fn set_up(&mut self) -> Result<(), TestFailure> {
        Ok(())
    }

    fn tear_down(&mut self) -> Result<(), TestFailure> {
        Ok(())
    }
}

impl Fixture for () {
    fn create() -> Result<Self, TestFailure> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Passed,
    Failed { error: TestFailure },
    Skipped { reason: String },
}

impl CaseOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CaseOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CaseOutcome::Skipped { .. })
    }
}

/// Result of running one container member.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseResult {
    pub test_id: String,
    pub member: String,
    pub description: Option<String>,
    pub outcome: CaseOutcome,
}

/// Outcomes of one run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    results: Vec<CaseResult>,
}

impl RunReport {
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_failed()).count()
    }

    pub fn skipped(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_skipped()).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Percentage of executed (non-skipped) cases that passed.
    pub fn success_rate(&self) -> f64 {
        let executed = self.passed() + self.failed();
        if executed == 0 {
            return 0.0;
        }
        (self.passed() as f64 / executed as f64) * 100.0
    }

    pub fn outcome(&self, test_id: &str) -> Option<&CaseOutcome> {
        self.results
            .iter()
            .find(|r| r.test_id == test_id)
            .map(|r| &r.outcome)
    }
}

pub struct CaseRunner;

impl CaseRunner {
    /// Runs every discovered test member of `container`, in member order.
    pub fn run<C: Fixture>(container: &Container<C>, config: &RunnerConfig) -> RunReport {
        let mut report = RunReport::default();
        let mut stop = false;

        for name in container.test_names() {
            let test_id = container.test_id(name);
            let outcome = if stop {
                CaseOutcome::Skipped {
                    reason: "fail-fast: an earlier case failed".to_string(),
                }
            } else if let Some(reason) = config.skip_reason(&test_id) {
                CaseOutcome::Skipped { reason }
            } else {
                match container.get(name) {
                    Some(member) => Self::run_member(member),
                    None => CaseOutcome::Failed {
                        error: TestFailure::new(format!("member '{name}' disappeared")),
                    },
                }
            };

            debug!(test = test_id.as_str(), ?outcome, "case finished");
            stop = stop || (config.fail_fast && outcome.is_failed());
            report.results.push(CaseResult {
                description: container.short_description(name).map(str::to_string),
                member: name.to_string(),
                test_id,
                outcome,
            });
        }

        info!(
            container = container.qualified_name(),
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            "run complete"
        );
        report
    }

    fn run_member<C: Fixture>(member: &Member<C>) -> CaseOutcome {
        match Self::guarded(|| Self::run_with_fixture(member)) {
            Ok(()) => CaseOutcome::Passed,
            Err(error) => CaseOutcome::Failed { error },
        }
    }

    fn run_with_fixture<C: Fixture>(member: &Member<C>) -> Result<(), TestFailure> {
        let mut fixture = C::create()?;
        fixture.set_up()?;
        let body = Self::guarded(|| member.invoke(&mut fixture));
        let teardown = fixture.tear_down();
        body.and(teardown)
    }

    /// Turns a panic inside `f` into a [`TestFailure`].
    fn guarded<F>(f: F) -> Result<(), TestFailure>
    where
        F: FnOnce() -> Result<(), TestFailure>,
    {
        catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| Err(panic_failure(payload)))
    }
}

fn panic_failure(payload: Box<dyn Any + Send>) -> TestFailure {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test body panicked".to_string()
    };
    TestFailure::new(format!("panicked: {message}"))
}
