//! Common utilities for sigolyze benchmarks.
//!
//! Signature sets are generated from a fixed seed so that runs are
//! comparable across machines and revisions.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sigolyze::{EngineConfig, SignatureEngine};

/// Standard benchmark configuration for consistent testing.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of signatures to generate
    pub signature_count: usize,
    /// Maximum literal patterns per signature
    pub max_patterns: usize,
    /// Maximum tags per signature
    pub max_tags: usize,
    /// Every n-th signature also gets a regex pattern (0 disables)
    pub regex_every: usize,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            signature_count: 10_000,
            max_patterns: 10,
            max_tags: 5,
            regex_every: 0,
        }
    }
}

impl BenchmarkConfig {
    pub fn with_signature_count(mut self, count: usize) -> Self {
        self.signature_count = count;
        self
    }

    pub fn with_regex_every(mut self, every: usize) -> Self {
        self.regex_every = every;
        self
    }
}

/// Deterministic generator so data is identical across runs.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Generate JSON signature definitions: signature `i` carries literals
/// `test{i}_{j}` and tags `tag{i}_{k}`.
pub fn generate_signatures(config: &BenchmarkConfig) -> Vec<String> {
    let mut rng = seeded_rng(42);

    (0..config.signature_count)
        .map(|i| {
            let mut patterns: Vec<String> = (0..rng.random_range(1..=config.max_patterns))
                .map(|j| {
                    format!(r#"{{"name": "pattern{i}_{j}", "value": "test{i}_{j}", "is_regex": false}}"#)
                })
                .collect();
            if config.regex_every > 0 && i % config.regex_every == 0 {
                patterns.push(format!(
                    r#"{{"name": "regex{i}", "value": "rx{i}_[0-9]+", "is_regex": true}}"#
                ));
            }

            let tags: Vec<String> = (0..rng.random_range(1..=config.max_tags))
                .map(|k| format!(r#""tag{i}_{k}""#))
                .collect();

            format!(
                r#"{{"name": "test_signature", "patterns": [{}], "tags": [{}], "meta": []}}"#,
                patterns.join(","),
                tags.join(",")
            )
        })
        .collect()
}

/// Build an engine loaded with a generated signature set.
pub fn create_engine(
    config: &BenchmarkConfig,
    engine_config: EngineConfig,
) -> anyhow::Result<SignatureEngine> {
    let mut engine = SignatureEngine::with_config(engine_config);
    for source in generate_signatures(config) {
        engine.load_str(&source)?;
    }
    Ok(engine)
}
