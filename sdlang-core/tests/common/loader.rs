//! Fixture loading from YAML files

use serde::Deserialize;
use std::path::Path;

/// Every fixture file under `tests/fixtures/`.
pub const FIXTURE_FILES: &[&str] = &["tags", "values", "attributes", "blocks", "comments", "strings", "errors"];

/// A single test case from a fixture file
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub desc: String,
    pub sdl: String,
    pub events: Vec<ExpectedEvent>,
    /// Line structure is significant (multi-line literals, line comments,
    /// end-of-input errors): run the canonical input only.
    #[serde(default)]
    pub fixed: bool,
}

/// Expected event - either a bare name or [name, content]
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExpectedEvent {
    /// Event with no payload (OpenBlock, CloseBlock, EndOfFile)
    Bare(String),
    /// Payload event [EventName, "content"]
    WithContent(String, String),
}

impl ExpectedEvent {
    #[allow(dead_code)]
    pub fn name(&self) -> &str {
        match self {
            ExpectedEvent::Bare(name) => name,
            ExpectedEvent::WithContent(name, _) => name,
        }
    }
}

/// Load all test cases from a YAML fixture file
pub fn load_fixtures(path: &Path) -> Vec<TestCase> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read fixture file {:?}: {}", path, e));
    serde_yaml::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture file {:?}: {}", path, e))
}

/// Load fixtures from the standard fixtures directory
pub fn load_fixtures_by_name(name: &str) -> Vec<TestCase> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.yaml", name));
    load_fixtures(&path)
}
