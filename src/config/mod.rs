//! Engine configuration loaded from environment variables.

use std::env;

use crate::models::decision::AutonomyLevel;
use crate::rng::JitterPolicy;

/// Engine configuration with hardcoded fallback defaults. Binaries load
/// `.env` via dotenvy before calling [`EngineConfig::from_env`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bounded learning-store capacity.
    pub store_capacity: usize,
    /// Randomness policy for the bounded confidence/risk jitter.
    pub jitter: JitterPolicy,
    /// Initial process-wide operator autonomy level.
    pub default_autonomy_level: AutonomyLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_capacity: 1000,
            jitter: JitterPolicy::Entropy,
            default_autonomy_level: AutonomyLevel::High,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            store_capacity: env::var("AUTOSOC_STORE_CAPACITY")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap_or(1000),
            jitter: parse_jitter(
                &env::var("AUTOSOC_JITTER").unwrap_or_else(|_| "entropy".to_string()),
            ),
            default_autonomy_level: AutonomyLevel::from_str_loose(
                &env::var("AUTOSOC_AUTONOMY_LEVEL").unwrap_or_else(|_| "HIGH".to_string()),
            ),
        }
    }
}

/// Parse a jitter policy: `disabled`, `entropy`, or `seeded:<u64>`.
/// Unrecognized input falls back to `entropy`.
fn parse_jitter(value: &str) -> JitterPolicy {
    let v = value.trim().to_ascii_lowercase();
    if v == "disabled" {
        return JitterPolicy::Disabled;
    }
    if let Some(seed) = v.strip_prefix("seeded:") {
        if let Ok(seed) = seed.parse::<u64>() {
            return JitterPolicy::Seeded(seed);
        }
    }
    JitterPolicy::Entropy
}
