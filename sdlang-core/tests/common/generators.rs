//! Stochastic content generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("SDLANG_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| rand::random());
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    /// Returns 0, 1, 2, ... with decreasing probability
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Poisson-like count (simplified)
    pub fn poisson(&mut self, lambda: f64) -> usize {
        let l = (-lambda).exp();
        let mut k = 0;
        let mut p = 1.0;
        loop {
            k += 1;
            p *= self.rng.gen::<f64>();
            if p <= l {
                break;
            }
        }
        k - 1
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Random tag or attribute name. Never collides with a keyword.
    pub fn name(&mut self) -> String {
        let len = 1 + self.geometric(0.7);
        let mut name = String::with_capacity(len);
        // No f, n, o, t: keeps `false`, `null`, `on`, `off`, `true` out.
        let first = b"abcdeghijklmpqrsuvwxyz";
        name.push(first[self.rng.gen_range(0..first.len())] as char);
        let rest = b"abcdefghijklmnopqrstuvwxyz0123456789-_.";
        for _ in 1..len {
            name.push(rest[self.rng.gen_range(0..rest.len())] as char);
        }
        name
    }

    /// Random integer literal
    pub fn integer(&mut self) -> String {
        let val: i32 = self.rng.gen_range(-9999..9999);
        val.to_string()
    }

    /// Random literal of a simple kind
    pub fn literal(&mut self) -> String {
        match self.rng.gen_range(0..4) {
            0 => self.integer(),
            1 => format!("\"{}\"", self.name()),
            2 => format!("`{}`", self.name()),
            _ => ["true", "off", "null"][self.rng.gen_range(0..3)].to_string(),
        }
    }

    /// Random date, date-time or duration literal
    pub fn temporal_value(&mut self) -> String {
        let date = format!(
            "{:04}/{:02}/{:02}",
            self.rng.gen_range(1900..2100),
            self.rng.gen_range(1..=12),
            self.rng.gen_range(1..=28)
        );
        match self.rng.gen_range(0..3) {
            0 => date,
            1 => {
                let mut out = format!(
                    "{} {:02}:{:02}",
                    date,
                    self.rng.gen_range(0..24),
                    self.rng.gen_range(0..60)
                );
                if self.chance(0.7) {
                    out.push_str(&format!(":{:02}", self.rng.gen_range(0..60)));
                    if self.chance(0.5) {
                        out.push_str(&format!(".{:03}", self.rng.gen_range(0..1000)));
                    }
                }
                if self.chance(0.5) {
                    let sign = if self.chance(0.5) { '+' } else { '-' };
                    out.push_str(&format!("-GMT{}{:02}:{:02}", sign, self.rng.gen_range(0..14), 0));
                }
                out
            }
            _ => {
                let mut out = String::new();
                if self.chance(0.3) {
                    out.push('-');
                }
                if self.chance(0.4) {
                    out.push_str(&format!("{}d:", self.rng.gen_range(0..400)));
                }
                out.push_str(&format!(
                    "{:02}:{:02}:{:02}",
                    self.rng.gen_range(0..24),
                    self.rng.gen_range(0..60),
                    self.rng.gen_range(0..60)
                ));
                if self.chance(0.4) {
                    out.push_str(&format!(".{:03}", self.rng.gen_range(0..1000)));
                }
                out
            }
        }
    }

    /// Random valid SDLang tag line (for context wrapping)
    pub fn sdl_fragment(&mut self, base_indent: usize) -> String {
        let mut out = " ".repeat(base_indent);
        out.push_str(&self.name());

        for _ in 0..self.geometric(0.5) {
            out.push(' ');
            out.push_str(&self.literal());
        }

        if self.chance(0.3) {
            out.push(' ');
            out.push_str(&self.name());
            out.push('=');
            out.push_str(&self.literal());
        }

        out.push('\n');
        out
    }

    /// Add random indent (geometric, α=0.9)
    pub fn indent_level(&mut self) -> usize {
        self.geometric(0.9) * 2 // 2 spaces per level
    }

    /// Inject random blank lines
    pub fn blank_lines(&mut self) -> String {
        let count = self.geometric(0.1); // Usually 0
        "\n".repeat(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.name(), g2.name());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_fragments_parse() {
        let mut gen = Gen::new(7);
        for _ in 0..200 {
            let fragment = gen.sdl_fragment(2);
            assert!(
                sdlang_core::Tag::parse(&fragment).is_ok(),
                "fragment failed to parse: {:?}",
                fragment
            );
        }
    }

    #[test]
    fn test_geometric_distribution() {
        let mut gen = Gen::new(12345);
        let samples: Vec<usize> = (0..1000).map(|_| gen.geometric(0.9)).collect();

        // With α=0.9, we expect mean ≈ 9 (geometric mean = α/(1-α))
        let mean: f64 = samples.iter().sum::<usize>() as f64 / samples.len() as f64;
        assert!(mean > 5.0 && mean < 15.0, "Mean {} out of expected range", mean);
    }
}
