//! Test infrastructure for the SDLang parser
//!
//! Provides fixture loading, stochastic test generation, and assertion helpers.

mod generators;
mod harness;
mod loader;

#[allow(unused_imports)]
pub use generators::Gen;
#[allow(unused_imports)]
pub use harness::{collect_events, run_test, run_with_variations};
#[allow(unused_imports)]
pub use loader::{load_fixtures_by_name, ExpectedEvent, TestCase, FIXTURE_FILES};
