//! Policy file loading and logging setup for the `slots` binary.

use std::path::Path;

use anyhow::{Context, Result};
use slot_engine::policy::RecommenderPolicy;
use tracing::debug;

/// Load the recommender policy from a TOML file, or the built-in defaults
/// when no path is given. Fields missing from the file keep their defaults.
///
/// ```toml
/// scan_days = 60
/// timezone = "Africa/Libreville"
///
/// [scores]
/// forward_scan = 50
/// ```
pub fn load_policy(path: Option<&Path>) -> Result<RecommenderPolicy> {
    let policy = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read policy file: {}", path.display()))?;
            let policy: RecommenderPolicy = toml::from_str(&raw)
                .with_context(|| format!("Failed to parse policy file: {}", path.display()))?;
            debug!(path = %path.display(), "loaded policy file");
            policy
        }
        None => RecommenderPolicy::default(),
    };
    policy.validate().context("Invalid recommender policy")?;
    Ok(policy)
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over `level`.
///
/// Logs go to stderr so stdout carries only JSON.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
