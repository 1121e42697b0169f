//! Classification result produced once per event by the classifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::event::Severity;

/// Threat category. Wire vocabulary is fixed (lowercase) for
/// interoperability with persisted incident records.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum ThreatCategory {
    Malware,
    Phishing,
    Ddos,
    Breach,
    Unauthorized,
    Unknown,
}

impl ThreatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Malware => "malware",
            Self::Phishing => "phishing",
            Self::Ddos => "ddos",
            Self::Breach => "breach",
            Self::Unauthorized => "unauthorized",
            Self::Unknown => "unknown",
        }
    }

    /// The five categories the classifier scores; `Unknown` is only ever a
    /// fallback, never a candidate.
    pub fn candidates() -> [ThreatCategory; 5] {
        [
            Self::Malware,
            Self::Phishing,
            Self::Ddos,
            Self::Breach,
            Self::Unauthorized,
        ]
    }
}

impl std::fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Best-category decision for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub category: ThreatCategory,
    /// 0-100 estimate of classification correctness.
    pub confidence: f64,
    pub severity: Severity,
    /// Small non-negative integer; 0 is the most urgent.
    pub priority: u8,
    /// Per-candidate scores kept for explainability.
    pub category_scores: BTreeMap<ThreatCategory, f64>,
    pub narrative: String,
}
