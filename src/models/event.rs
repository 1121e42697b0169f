//! Security event model: the immutable unit of work entering the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event severity. Wire vocabulary is fixed (`LOW|MEDIUM|HIGH|CRITICAL`)
/// for interoperability with persisted records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Ordinal rank 1-4 used for severity-alignment scoring.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parse a severity string tolerantly (case-insensitive), falling back
    /// to MEDIUM for unrecognized input.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "HIGH" => Self::High,
            "CRITICAL" => Self::Critical,
            _ => Self::Medium,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asset class of the system an event concerns; scales breach risk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetType {
    Api,
    Database,
    Server,
    Storage,
    Workstation,
}

impl AssetType {
    /// Breach-risk multiplier per asset class.
    pub fn risk_multiplier(&self) -> f64 {
        match self {
            Self::Api => 1.8,
            Self::Database => 1.6,
            Self::Server => 1.4,
            Self::Storage => 1.3,
            Self::Workstation => 1.0,
        }
    }
}

/// Asset context supplied by the caller alongside an event, used by the
/// breach-risk scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetContext {
    pub asset_type: AssetType,
    pub vulnerability_count: u32,
    /// Last completed vulnerability scan; `None` counts as maximally stale.
    pub last_scan: Option<DateTime<Utc>>,
}

impl Default for AssetContext {
    fn default() -> Self {
        Self {
            asset_type: AssetType::Server,
            vulnerability_count: 0,
            last_scan: None,
        }
    }
}

/// A single security telemetry event. Immutable once received; `id`
/// identifies the unit of work through the whole decision chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: String,
    pub event_type: String,
    pub action: String,
    pub description: String,
    pub source: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub location: Option<String>,
    pub device: Option<String>,
    /// Keys the behavioral-baseline lookup (user or entity id).
    pub entity_id: Option<String>,
    pub today_count: u32,
    pub frequency: f64,
    pub behavioral_anomaly: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_rank_is_ordinal() {
        assert!(Severity::Low.rank() < Severity::Medium.rank());
        assert!(Severity::Medium.rank() < Severity::High.rank());
        assert!(Severity::High.rank() < Severity::Critical.rank());
    }

    #[test]
    fn severity_from_str_loose_defaults_to_medium() {
        assert_eq!(Severity::from_str_loose("critical"), Severity::Critical);
        assert_eq!(Severity::from_str_loose(" HIGH "), Severity::High);
        assert_eq!(Severity::from_str_loose("garbage"), Severity::Medium);
        assert_eq!(Severity::from_str_loose(""), Severity::Medium);
    }

    #[test]
    fn severity_wire_format_is_uppercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"CRITICAL\""
        );
        let parsed: Severity = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Severity::Low);
    }

    #[test]
    fn asset_multipliers_ordered_by_exposure() {
        assert_eq!(AssetType::Api.risk_multiplier(), 1.8);
        assert_eq!(AssetType::Workstation.risk_multiplier(), 1.0);
        assert!(AssetType::Database.risk_multiplier() > AssetType::Server.risk_multiplier());
    }
}
