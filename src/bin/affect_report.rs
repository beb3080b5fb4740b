//! Emotional pattern report for a recorded state log.
//!
//! Reads a JSON array of emotional states (oldest first), runs the pattern
//! detector over it and prints the analysis as JSON on stdout.
//!
//! # Environment Variables
//!
//! - `CODA_CONFIG`: optional YAML configuration file
//! - `RUST_LOG`: tracing filter (default: "info,coda_affect=debug")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin affect_report -- states.json
//! cat states.json | cargo run --bin affect_report -- -
//! ```

use std::io::Read;

use anyhow::Context;
use coda_affect::affect::EmotionalStateLog;
use coda_affect::patterns::EmotionalPatternDetector;
use coda_affect::utilities::config::CodaConfig;
use coda_affect::utilities::logger::{init_logging, DEFAULT_LOG_FILTER};

fn main() -> anyhow::Result<()> {
    init_logging(DEFAULT_LOG_FILTER);

    let input = std::env::args()
        .nth(1)
        .context("usage: affect_report <states.json | ->")?;

    let config = match std::env::var("CODA_CONFIG") {
        Ok(path) => {
            tracing::info!("Loading configuration from {}", path);
            CodaConfig::from_yaml_file(&path)
                .with_context(|| format!("failed to load config {}", path))?
        }
        Err(_) => CodaConfig::default(),
    };

    let raw = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&input).with_context(|| format!("failed to read {}", input))?
    };

    let log = EmotionalStateLog::from_json(input.as_str(), &raw)
        .context("state log must be a JSON array of ordered states")?;
    tracing::info!("Loaded {} states", log.len());

    let detector = EmotionalPatternDetector::new(config.detector)?;
    let result = detector.analyze_patterns(log.states());

    for pattern in &result.patterns {
        tracing::info!(
            "{}: frequency {}, confidence {:.2}",
            pattern.pattern_type,
            pattern.frequency,
            pattern.confidence
        );
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
