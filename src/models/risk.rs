//! Risk assessment types shared by the behavioral and breach scorers.

use serde::{Deserialize, Serialize};

/// Banded risk level derived from a 0-100 score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Band a 0-100 score: `<25 LOW, <50 MEDIUM, <75 HIGH, ≥75 CRITICAL`.
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            Self::Low
        } else if score < 50.0 {
            Self::Medium
        } else if score < 75.0 {
            Self::High
        } else {
            Self::Critical
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
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Business impact rating attached to a risk assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessImpact {
    pub rating: RiskLevel,
    pub description: String,
}

/// Containment state of the underlying incident at assessment time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainmentStatus {
    Uncontained,
    InProgress,
    Contained,
}

/// Estimated incident cost range in whole currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    pub min: f64,
    pub max: f64,
    pub estimated: f64,
}

/// Per-factor behavioral sub-scores, each 0-100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorFactorScores {
    pub login: f64,
    pub session: f64,
    pub access: f64,
    pub time: f64,
    pub location: f64,
    pub device: f64,
}

/// Output of the behavioral anomaly scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorReport {
    pub factors: BehaviorFactorScores,
    /// 0-100 anomaly score over the login-shaped signals.
    pub login_anomaly: f64,
    /// 0-100 anomaly score over the session-shaped signals.
    pub session_anomaly: f64,
    /// Weighted overall score, clamped to 0-100.
    pub overall: f64,
    pub level: RiskLevel,
    /// Set when the overall score reaches the 90-point escalation cutoff.
    pub requires_immediate_action: bool,
}

/// Component contributions to a breach-risk score, pre-multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreachComponents {
    pub vulnerability: f64,
    pub scan_recency: f64,
    pub intel_volume: f64,
    pub behavioral: f64,
    pub network: f64,
    pub auth: f64,
}

/// Output of the breach-risk scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreachRisk {
    /// 0-100 breach likelihood after the asset multiplier and clamp.
    pub score: f64,
    pub components: BreachComponents,
    pub asset_multiplier: f64,
}

/// Combined risk assessment for one event, derived from both scorers plus
/// classification context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub business_impact: BusinessImpact,
    pub containment_status: ContainmentStatus,
    pub compliance_tags: Vec<String>,
    pub estimated_cost: CostEstimate,
    pub behavior: BehaviorReport,
    pub breach: BreachRisk,
    /// True when any contributing provider fell back to a neutral value.
    pub degraded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_band_boundaries() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(24.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(49.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(74.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }

    #[test]
    fn containment_wire_format() {
        assert_eq!(
            serde_json::to_string(&ContainmentStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
    }
}
