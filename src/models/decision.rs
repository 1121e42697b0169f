//! Decision model: the autonomy-gated output of the engine for one event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::risk::RiskLevel;

/// Autonomy tier: how much unattended authority a decision is granted.
/// Ordinal (`LOW < MEDIUM < HIGH < CRITICAL`); wire vocabulary fixed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum AutonomyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl AutonomyLevel {
    /// Confidence an engine decision must reach before this tier permits
    /// unattended execution.
    pub fn confidence_threshold(&self) -> f64 {
        match self {
            Self::Low => 30.0,
            Self::Medium => 60.0,
            Self::High => 85.0,
            Self::Critical => 95.0,
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

    /// Parse tolerantly (case-insensitive); unrecognized input falls back
    /// to HIGH, the most conservative default that still allows automation.
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Self::Low,
            "MEDIUM" => Self::Medium,
            "CRITICAL" => Self::Critical,
            _ => Self::High,
        }
    }
}

impl std::fmt::Display for AutonomyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of executing (or overriding) a decision.
///
/// State machine: `PENDING → {SUCCESS, FAILURE, OVERRIDDEN}`, terminal once
/// set. The store tolerates overwrites for retry semantics but warns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum DecisionOutcome {
    Pending,
    Success,
    Failure,
    /// A human overrode the engine; carries the action actually taken.
    Overridden { action: String },
}

impl DecisionOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Recommended course of action attached to a decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    /// Gate open on a CRITICAL-severity event: act now, unattended.
    ImmediateAutonomousResponse,
    /// Gate open: contain and investigate without waiting for a human.
    AutonomousIsolationAndAnalysis,
    /// Gate closed on a serious event: hand to an analyst.
    EscalateToAnalyst,
    /// Gate closed on a low-grade event: keep watching.
    MonitorAndLog,
}

/// Urgency band derived from classification priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    Immediate,
    Urgent,
    Routine,
    Low,
}

impl Urgency {
    pub fn from_priority(priority: u8) -> Self {
        match priority {
            0 => Self::Immediate,
            1 => Self::Urgent,
            2 => Self::Routine,
            _ => Self::Low,
        }
    }
}

/// Success-rate and timing statistics over same-type past decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalContext {
    pub similar_count: usize,
    /// Successes over similar_count; 0.0 when no history.
    pub success_rate: f64,
    /// Mean resolution time over successful records, seconds.
    pub avg_resolution_secs: f64,
}

impl HistoricalContext {
    pub fn empty() -> Self {
        Self {
            similar_count: 0,
            success_rate: 0.0,
            avg_resolution_secs: 0.0,
        }
    }
}

/// Analysis block explaining how the engine read the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionAnalysis {
    pub threat_level: RiskLevel,
    pub impact_assessment: String,
    pub urgency: Urgency,
    pub patterns: Vec<String>,
    pub correlations: Vec<String>,
    pub historical: HistoricalContext,
}

/// One decision per event; appended to the learning store at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub event_id: String,
    pub analysis: DecisionAnalysis,
    pub required_autonomy: AutonomyLevel,
    /// 0-100, already adjusted by historical context.
    pub confidence: f64,
    /// 0-100, already adjusted by the operator autonomy penalty.
    pub risk: f64,
    pub can_execute_autonomously: bool,
    pub recommended_action: RecommendedAction,
    pub reasoning: String,
    /// True when any scoring input fell back to a neutral value.
    pub degraded: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autonomy_thresholds_are_ordered() {
        assert_eq!(AutonomyLevel::Low.confidence_threshold(), 30.0);
        assert_eq!(AutonomyLevel::Medium.confidence_threshold(), 60.0);
        assert_eq!(AutonomyLevel::High.confidence_threshold(), 85.0);
        assert_eq!(AutonomyLevel::Critical.confidence_threshold(), 95.0);
        assert!(AutonomyLevel::Low < AutonomyLevel::Critical);
    }

    #[test]
    fn autonomy_from_str_loose_defaults_to_high() {
        assert_eq!(AutonomyLevel::from_str_loose("low"), AutonomyLevel::Low);
        assert_eq!(AutonomyLevel::from_str_loose("bogus"), AutonomyLevel::High);
    }

    #[test]
    fn outcome_terminality() {
        assert!(!DecisionOutcome::Pending.is_terminal());
        assert!(DecisionOutcome::Success.is_terminal());
        assert!(DecisionOutcome::Overridden {
            action: "manual_quarantine".to_string()
        }
        .is_terminal());
    }

    #[test]
    fn recommended_action_wire_format() {
        assert_eq!(
            serde_json::to_string(&RecommendedAction::ImmediateAutonomousResponse).unwrap(),
            "\"IMMEDIATE_AUTONOMOUS_RESPONSE\""
        );
        assert_eq!(
            serde_json::to_string(&RecommendedAction::AutonomousIsolationAndAnalysis).unwrap(),
            "\"AUTONOMOUS_ISOLATION_AND_ANALYSIS\""
        );
    }

    #[test]
    fn urgency_from_priority() {
        assert_eq!(Urgency::from_priority(0), Urgency::Immediate);
        assert_eq!(Urgency::from_priority(3), Urgency::Low);
        assert_eq!(Urgency::from_priority(7), Urgency::Low);
    }
}
