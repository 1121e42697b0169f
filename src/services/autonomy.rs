//! Autonomy gate: the single authorization checkpoint for unattended
//! execution.
//!
//! A static matrix maps (category, action) to a required tier and a base
//! confidence hint; tiers carry fixed confidence thresholds. The gate rule
//! is `confidence ≥ threshold AND risk < RISK_CEILING`. No other code path
//! may trigger an unattended action.

use serde::{Deserialize, Serialize};

use crate::models::classification::ThreatCategory;
use crate::models::decision::AutonomyLevel;

/// Fixed risk ceiling; at or above this the gate never opens.
pub const RISK_CEILING: f64 = 50.0;

/// Tier requirement for a (category, action) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TierRequirement {
    pub tier: AutonomyLevel,
    /// Baseline confidence the action table grants a well-matched event.
    pub base_confidence: f64,
}

/// Look up the required tier for a category/action pair. Unknown actions
/// fall back to the category's default row; `unknown` events always demand
/// CRITICAL authority.
pub fn required_tier(category: ThreatCategory, action: &str) -> TierRequirement {
    use AutonomyLevel::*;
    use ThreatCategory::*;

    let (tier, base_confidence) = match (category, action) {
        (Malware, "quarantine_endpoint") => (High, 88.0),
        (Malware, "kill_process") => (High, 82.0),
        (Malware, "full_scan") => (Low, 60.0),
        (Malware, _) => (Medium, 70.0),

        (Phishing, "block_sender") => (Medium, 72.0),
        (Phishing, "reset_credentials") => (High, 86.0),
        (Phishing, _) => (Medium, 65.0),

        (Ddos, "enable_rate_limiting") => (Medium, 75.0),
        (Ddos, "reroute_traffic") => (High, 85.0),
        (Ddos, _) => (Medium, 70.0),

        (Breach, "revoke_tokens") => (High, 85.0),
        (Breach, "isolate_segment") => (Critical, 95.0),
        (Breach, _) => (Critical, 88.0),

        (Unauthorized, "lock_account") => (Medium, 75.0),
        (Unauthorized, "force_mfa") => (Low, 60.0),
        (Unauthorized, _) => (Medium, 70.0),

        (Unknown, _) => (Critical, 50.0),
    };

    TierRequirement {
        tier,
        base_confidence,
    }
}

/// Risk-penalty term for the process-wide operator autonomy level. The
/// operator level adjusts risk only; per-category confidence thresholds
/// stay authoritative (documented asymmetry, see DESIGN.md).
pub fn operator_risk_penalty(level: AutonomyLevel) -> f64 {
    match level {
        AutonomyLevel::Low => 15.0,
        AutonomyLevel::Medium => 5.0,
        AutonomyLevel::High => 0.0,
        AutonomyLevel::Critical => -10.0,
    }
}

/// Outcome of the gate check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GateDecision {
    pub allowed: bool,
    pub threshold: f64,
    /// Risk after the operator penalty, clamped to 0-100.
    pub adjusted_risk: f64,
}

/// Evaluate the gate for a decision.
pub fn evaluate(
    tier: AutonomyLevel,
    confidence: f64,
    risk: f64,
    operator_level: AutonomyLevel,
) -> GateDecision {
    let threshold = tier.confidence_threshold();
    let adjusted_risk = (risk + operator_risk_penalty(operator_level)).clamp(0.0, 100.0);
    GateDecision {
        allowed: confidence >= threshold && adjusted_risk < RISK_CEILING,
        threshold,
        adjusted_risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_denies_at_risk_ceiling_regardless_of_confidence() {
        let g = evaluate(AutonomyLevel::Low, 100.0, 50.0, AutonomyLevel::High);
        assert!(!g.allowed);
        let g = evaluate(AutonomyLevel::Low, 100.0, 99.0, AutonomyLevel::High);
        assert!(!g.allowed);
    }

    #[test]
    fn gate_denies_below_tier_threshold() {
        let g = evaluate(AutonomyLevel::High, 84.9, 10.0, AutonomyLevel::High);
        assert!(!g.allowed);
        let g = evaluate(AutonomyLevel::High, 85.0, 10.0, AutonomyLevel::High);
        assert!(g.allowed);
    }

    #[test]
    fn operator_level_shifts_risk_not_threshold() {
        // risk 47 + LOW penalty 15 = 62 → denied
        let g = evaluate(AutonomyLevel::Medium, 90.0, 47.0, AutonomyLevel::Low);
        assert!(!g.allowed);
        assert_eq!(g.adjusted_risk, 62.0);
        assert_eq!(g.threshold, 60.0);
        // same risk under CRITICAL operator level: 47 - 10 = 37 → allowed
        let g = evaluate(AutonomyLevel::Medium, 90.0, 47.0, AutonomyLevel::Critical);
        assert!(g.allowed);
        assert_eq!(g.adjusted_risk, 37.0);
        assert_eq!(g.threshold, 60.0);
    }

    #[test]
    fn adjusted_risk_is_clamped() {
        let g = evaluate(AutonomyLevel::Low, 50.0, 2.0, AutonomyLevel::Critical);
        assert_eq!(g.adjusted_risk, 0.0);
        let g = evaluate(AutonomyLevel::Low, 50.0, 95.0, AutonomyLevel::Low);
        assert_eq!(g.adjusted_risk, 100.0);
    }

    #[test]
    fn matrix_known_pairs() {
        let r = required_tier(ThreatCategory::Malware, "quarantine_endpoint");
        assert_eq!(r.tier, AutonomyLevel::High);
        assert_eq!(r.base_confidence, 88.0);

        let r = required_tier(ThreatCategory::Breach, "isolate_segment");
        assert_eq!(r.tier, AutonomyLevel::Critical);
    }

    #[test]
    fn matrix_falls_back_per_category() {
        let r = required_tier(ThreatCategory::Malware, "do_a_dance");
        assert_eq!(r.tier, AutonomyLevel::Medium);
        let r = required_tier(ThreatCategory::Breach, "do_a_dance");
        assert_eq!(r.tier, AutonomyLevel::Critical);
    }

    #[test]
    fn unknown_category_demands_critical_authority() {
        let r = required_tier(ThreatCategory::Unknown, "quarantine_endpoint");
        assert_eq!(r.tier, AutonomyLevel::Critical);
        // Even full confidence cannot open the gate at the 95 threshold
        // with meaningful risk.
        let g = evaluate(r.tier, 94.9, 10.0, AutonomyLevel::High);
        assert!(!g.allowed);
    }
}
