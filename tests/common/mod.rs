//! Shared helpers for the integration suites.
#![allow(dead_code)]

use parameterized::prelude::*;

/// Expansion settings with a readable separator so member names are predictable.
pub fn fixed_config() -> ExpansionConfig {
    ExpansionConfig::with_separator(SeparatorToken::fixed("XSEPX").expect("valid token"))
}

pub fn quiet_runner() -> RunnerConfig {
    RunnerConfig {
        use_colors: false,
        ..RunnerConfig::default()
    }
}

/// `test_addition(a, b, expect)`, accepting positional or named arguments.
pub fn addition<C: 'static>() -> TestDefinition<C> {
    TestDefinition::new("test_addition", |_: &mut C, args: CaseArgs| match &args {
        CaseArgs::Named(_) => ensure_eq(args.int("expect")?, args.int("a")? + args.int("b")?),
        CaseArgs::Positional(_) => ensure_eq(args.int(2)?, args.int(0)? + args.int(1)?),
    })
    .with_description("Adds two numbers.")
}

/// Container `arith.AdditionExample` holding `test_addition` and a helper.
pub fn arithmetic<C: 'static>() -> Container<C> {
    ContainerBuilder::new("arith.AdditionExample")
        .with_config(fixed_config())
        .test(addition())
        .test(TestDefinition::new("make_operands", |_: &mut C, _| Ok(())))
        .build()
        .expect("plain container builds")
}
