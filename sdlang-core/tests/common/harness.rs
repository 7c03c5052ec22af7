//! Test harness for running fixture cases with stochastic variations

use crate::common::{ExpectedEvent, Gen, TestCase};
use sdlang_core::{push, Consumer, EventLog, Scanner, TreeBuilder};

/// Result of running a test
#[derive(Debug)]
pub struct TestResult {
    pub passed: bool,
    pub input: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
    pub seed: u64,
    pub errors: Vec<String>,
}

/// Parse `input` with an event log and a tree builder attached, so that
/// structural errors raised by the builder show up as a final `Error` event.
pub fn collect_events(input: &str) -> Vec<String> {
    let mut log = EventLog::new();
    let mut tree = TreeBuilder::new();
    let outcome = push(
        &mut Scanner::new(input),
        &mut [Consumer::Value(&mut log), Consumer::Value(&mut tree)],
    );

    let mut events: Vec<String> = log.events.iter().map(|e| e.to_string()).collect();
    if let Err(err) = outcome {
        events.push(format!("Error {:?}", err.code()));
    }
    events
}

/// Format expected event for comparison
fn format_expected(event: &ExpectedEvent) -> String {
    match event {
        ExpectedEvent::Bare(name) => name.clone(),
        ExpectedEvent::WithContent(name, content) => format!("{} {:?}", name, content),
    }
}

/// Run a single test case (canonical, no variations)
pub fn run_test(case: &TestCase) -> TestResult {
    let actual = collect_events(&case.sdl);
    let expected: Vec<String> = case.events.iter().map(format_expected).collect();

    let mut errors = Vec::new();

    if actual.len() != expected.len() {
        errors.push(format!(
            "Event count mismatch: expected {}, got {}",
            expected.len(),
            actual.len()
        ));
    }

    for (i, (act, exp)) in actual.iter().zip(expected.iter()).enumerate() {
        if act != exp {
            errors.push(format!("Event {}: expected '{}', got '{}'", i, exp, act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input: case.sdl.clone(),
        expected,
        actual,
        seed: 0,
        errors,
    }
}

/// Run test with stochastic variations
///
/// Applies independent variations:
/// - 40% chance of an unrelated tag above
/// - Geometric indent (α=0.9)
/// - Random blank lines
/// - 20% chance of `;` instead of line breaks
/// - 40% chance of an unrelated tag below
pub fn run_with_variations(case: &TestCase, gen: &mut Gen) -> TestResult {
    let mut input = String::new();

    if gen.chance(0.4) {
        input.push_str(&gen.sdl_fragment(0));
    }

    let indent = " ".repeat(gen.indent_level());
    let separator = if gen.chance(0.2) { ';' } else { '\n' };

    for line in case.sdl.split('\n') {
        input.push_str(&gen.blank_lines());
        if !line.is_empty() {
            input.push_str(&indent);
            input.push_str(line);
        }
        input.push(separator);
    }

    if gen.chance(0.4) {
        input.push_str(&gen.sdl_fragment(indent.len()));
    }

    let actual = collect_events(&input);
    let expected: Vec<String> = case.events.iter().map(format_expected).collect();

    // Context tags add events around the case, so expected events must
    // appear in order, not contiguously.
    let mut errors = Vec::new();
    let mut exp_idx = 0;

    for act in &actual {
        if exp_idx < expected.len() && act == &expected[exp_idx] {
            exp_idx += 1;
        }
    }

    if exp_idx < expected.len() {
        errors.push(format!(
            "Missing expected events starting at index {}: {:?}",
            exp_idx,
            &expected[exp_idx..]
        ));
    }

    for act in &actual {
        if act.starts_with("Error") && !expected.iter().any(|e| e.starts_with("Error")) {
            errors.push(format!("Unexpected error: {}", act));
        }
    }

    TestResult {
        passed: errors.is_empty(),
        input,
        expected,
        actual,
        seed: gen.seed,
        errors,
    }
}

impl TestResult {
    /// Print detailed failure info
    pub fn print_failure(&self, case_id: &str) {
        eprintln!("\n=== FAILED: {} ===", case_id);
        eprintln!("Seed: {} (set SDLANG_TEST_SEED={} to reproduce)", self.seed, self.seed);
        eprintln!("\nInput:");
        eprintln!("{}", self.input);
        eprintln!("\nExpected events:");
        for (i, e) in self.expected.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nActual events:");
        for (i, e) in self.actual.iter().enumerate() {
            eprintln!("  {}: {}", i, e);
        }
        eprintln!("\nErrors:");
        for e in &self.errors {
            eprintln!("  - {}", e);
        }
    }
}
