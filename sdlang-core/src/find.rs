//! Multi-needle byte search.
//!
//! Every "scan to the next X" step in the scanner goes through
//! [`find_any`]. Two implementations share one contract:
//!
//! - **Vector** uses `memchr`/`memchr2`/`memchr3`, which are SIMD
//!   accelerated. More than three needles are searched in groups of three,
//!   each group bounded by the best hit so far.
//! - **Scalar** is a plain byte loop.
//!
//! The strategy is picked once per process. Enabling the `scalar-scan`
//! feature pins it to [`Strategy::Scalar`].

use std::sync::OnceLock;

/// Search implementation behind [`find_any`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Vector,
    Scalar,
}

static STRATEGY: OnceLock<Strategy> = OnceLock::new();

impl Strategy {
    /// The process-wide strategy, detected on first call.
    pub fn current() -> Strategy {
        *STRATEGY.get_or_init(|| {
            let strategy = Strategy::detect();
            tracing::debug!(?strategy, "byte finder strategy selected");
            strategy
        })
    }

    fn detect() -> Strategy {
        if cfg!(feature = "scalar-scan") {
            return Strategy::Scalar;
        }
        if cfg!(any(
            all(target_arch = "x86_64", target_feature = "sse2"),
            target_arch = "aarch64",
            all(target_arch = "wasm32", target_feature = "simd128"),
        )) {
            Strategy::Vector
        } else {
            Strategy::Scalar
        }
    }
}

/// Offset of the first byte in `haystack` equal to any of `needles`, or
/// `haystack.len()` when there is none.
#[inline]
pub fn find_any(haystack: &[u8], needles: &[u8]) -> usize {
    find_any_with(Strategy::current(), haystack, needles)
}

/// [`find_any`] with an explicit strategy.
#[inline]
pub fn find_any_with(strategy: Strategy, haystack: &[u8], needles: &[u8]) -> usize {
    match strategy {
        Strategy::Vector => find_vector(haystack, needles),
        Strategy::Scalar => find_scalar(haystack, needles),
    }
}

/// Combine two partial search results, keeping the earlier hit.
#[inline]
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

fn find_vector(haystack: &[u8], needles: &[u8]) -> usize {
    let mut best: Option<usize> = None;
    for group in needles.chunks(3) {
        // Nothing past the best hit can win.
        let window = &haystack[..best.unwrap_or(haystack.len())];
        let hit = match group {
            &[a] => memchr::memchr(a, window),
            &[a, b] => memchr::memchr2(a, b, window),
            &[a, b, c] => memchr::memchr3(a, b, c, window),
            _ => None,
        };
        best = earliest_of(best, hit);
        if best == Some(0) {
            break;
        }
    }
    best.unwrap_or(haystack.len())
}

fn find_scalar(haystack: &[u8], needles: &[u8]) -> usize {
    haystack
        .iter()
        .position(|b| needles.contains(b))
        .unwrap_or(haystack.len())
}
