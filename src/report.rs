//! Colored run summaries.

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::config::RunnerConfig;
use crate::runner::{CaseOutcome, RunReport};

/// Writes `report` to stderr, colored when the config asks for it.
pub fn print_report(report: &RunReport, config: &RunnerConfig) -> io::Result<()> {
    let choice = if config.use_colors {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    write_report(&mut stderr, report)
}

/// Writes one line per case, the summary line, then the failure list.
pub fn write_report<W: WriteColor>(out: &mut W, report: &RunReport) -> io::Result<()> {
    for result in report.results() {
        match &result.outcome {
            CaseOutcome::Passed => {
                tag(out, "PASS", Color::Green)?;
                writeln!(out, ": {}", result.test_id)?;
            }
            CaseOutcome::Failed { error } => {
                tag(out, "FAIL", Color::Red)?;
                writeln!(out, ": {}", result.test_id)?;
                if let Some(description) = &result.description {
                    writeln!(out, "  Case: {description}")?;
                }
                writeln!(out, "  Error: {}", error.message)?;
                if let (Some(expected), Some(actual)) = (&error.expected, &error.actual) {
                    writeln!(out, "  - expected: {expected}")?;
                    writeln!(out, "  + actual:   {actual}")?;
                }
            }
            CaseOutcome::Skipped { reason } => {
                tag(out, "SKIP", Color::Yellow)?;
                writeln!(out, ": {} ({reason})", result.test_id)?;
            }
        }
    }

    write!(out, "\nTest summary: total {}, ", report.total())?;
    tag(out, "passed", Color::Green)?;
    write!(out, " {}, ", report.passed())?;
    tag(out, "failed", Color::Red)?;
    write!(out, " {}, ", report.failed())?;
    tag(out, "skipped", Color::Yellow)?;
    writeln!(out, " {}", report.skipped())?;

    if report.has_failures() {
        writeln!(out, "\nFailed tests:")?;
        for result in report.results().iter().filter(|r| r.outcome.is_failed()) {
            writeln!(out, "  - {}", result.test_id)?;
        }
    }
    Ok(())
}

fn tag<W: WriteColor>(out: &mut W, text: &str, color: Color) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{text}")?;
    out.reset()
}
