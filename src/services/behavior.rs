//! Behavioral anomaly scorer using a 6-factor weighted model.
//!
//! Factors and default weights:
//! - Login-time deviation: 25%
//! - Session frequency: 20%
//! - Access anomaly flag: 20%
//! - Off-hours timing: 15%
//! - Location novelty: 10%
//! - Device novelty: 10%
//!
//! Pure function of event and baseline; no randomness.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::models::event::SecurityEvent;
use crate::models::risk::{BehaviorFactorScores, BehaviorReport, RiskLevel};

/// Overall score at or above this cutoff flags immediate action.
pub const IMMEDIATE_ACTION_CUTOFF: f64 = 90.0;

/// Factor weights for the behavioral score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorWeights {
    pub login: f64,
    pub session: f64,
    pub access: f64,
    pub time: f64,
    pub location: f64,
    pub device: f64,
}

impl Default for BehaviorWeights {
    fn default() -> Self {
        Self {
            login: 0.25,
            session: 0.20,
            access: 0.20,
            time: 0.15,
            location: 0.10,
            device: 0.10,
        }
    }
}

/// Stored baseline for an entity, supplied by the baseline-store
/// collaborator. A missing baseline uses `Default` (not a degraded path).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorBaseline {
    /// Typical working window, inclusive start / exclusive end hour (UTC).
    pub typical_start_hour: u32,
    pub typical_end_hour: u32,
    pub known_locations: Vec<String>,
    pub known_devices: Vec<String>,
    pub avg_daily_events: f64,
}

impl Default for BehaviorBaseline {
    fn default() -> Self {
        Self {
            typical_start_hour: 8,
            typical_end_hour: 18,
            known_locations: Vec::new(),
            known_devices: Vec::new(),
            avg_daily_events: 20.0,
        }
    }
}

/// Compute the behavioral anomaly report for one event.
pub fn assess(
    event: &SecurityEvent,
    baseline: &BehaviorBaseline,
    weights: &BehaviorWeights,
) -> BehaviorReport {
    let hour = event.timestamp.hour();

    let factors = BehaviorFactorScores {
        login: login_score(hour, baseline),
        session: session_score(event.today_count, baseline.avg_daily_events),
        access: if event.behavioral_anomaly { 80.0 } else { 15.0 },
        time: if !(6..22).contains(&hour) { 75.0 } else { 20.0 },
        location: novelty_score(event.location.as_deref(), &baseline.known_locations),
        device: novelty_score(event.device.as_deref(), &baseline.known_devices),
    };

    // Per-signal anomaly scores: login-shaped vs session-shaped factors.
    let login_anomaly =
        (factors.login + factors.time + factors.location + factors.device) / 4.0;
    let session_anomaly = (factors.session + factors.access) / 2.0;

    let overall = (factors.login * weights.login
        + factors.session * weights.session
        + factors.access * weights.access
        + factors.time * weights.time
        + factors.location * weights.location
        + factors.device * weights.device)
        .clamp(0.0, 100.0);

    BehaviorReport {
        factors,
        login_anomaly: login_anomaly.clamp(0.0, 100.0),
        session_anomaly: session_anomaly.clamp(0.0, 100.0),
        overall,
        level: RiskLevel::from_score(overall),
        requires_immediate_action: overall >= IMMEDIATE_ACTION_CUTOFF,
    }
}

/// Login-time deviation: 10 inside the typical window, +15 per hour of
/// distance outside it, capped at 100.
fn login_score(hour: u32, baseline: &BehaviorBaseline) -> f64 {
    let start = baseline.typical_start_hour;
    let end = baseline.typical_end_hour;
    if (start..end).contains(&hour) {
        return 10.0;
    }
    let distance = if hour < start {
        start - hour
    } else {
        hour.saturating_sub(end) + 1
    };
    (10.0 + 15.0 * distance as f64).min(100.0)
}

/// Session frequency anomaly relative to the baseline daily average.
fn session_score(today_count: u32, avg_daily_events: f64) -> f64 {
    let avg = avg_daily_events.max(1.0);
    let ratio = today_count as f64 / avg;
    if ratio <= 1.0 {
        10.0
    } else {
        (10.0 + 45.0 * (ratio - 1.0)).min(100.0)
    }
}

/// Novelty of a location/device against the known set: 10 if known, 85/80
/// bucketed via caller weights if novel, 30 when absent from the event.
fn novelty_score(observed: Option<&str>, known: &[String]) -> f64 {
    match observed {
        None => 30.0,
        Some(value) => {
            if known.iter().any(|k| k.eq_ignore_ascii_case(value)) {
                10.0
            } else {
                85.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::Severity;
    use chrono::{TimeZone, Utc};

    fn event_at_hour(hour: u32) -> SecurityEvent {
        SecurityEvent {
            id: "evt-1".to_string(),
            event_type: "login".to_string(),
            action: "observe".to_string(),
            description: "user login".to_string(),
            source: "siem".to_string(),
            severity: Severity::Low,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 10, hour, 0, 0).unwrap(),
            location: None,
            device: None,
            entity_id: Some("u-1".to_string()),
            today_count: 3,
            frequency: 1.0,
            behavioral_anomaly: false,
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        let w = BehaviorWeights::default();
        let sum = w.login + w.session + w.access + w.time + w.location + w.device;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn quiet_daytime_event_scores_low() {
        let report = assess(
            &event_at_hour(10),
            &BehaviorBaseline::default(),
            &BehaviorWeights::default(),
        );
        // login 10, session 10, access 15, time 20, location 30, device 30
        // 10*.25 + 10*.20 + 15*.20 + 20*.15 + 30*.10 + 30*.10 = 16.5
        assert!((report.overall - 16.5).abs() < 1e-9);
        assert_eq!(report.level, RiskLevel::Low);
        assert!(!report.requires_immediate_action);
    }

    #[test]
    fn midnight_novel_location_scores_high() {
        let mut e = event_at_hour(2);
        e.location = Some("Elbonia".to_string());
        e.device = Some("unseen-laptop".to_string());
        e.behavioral_anomaly = true;
        e.today_count = 80;
        let report = assess(&e, &BehaviorBaseline::default(), &BehaviorWeights::default());
        // login 100 (6h before window start), session 100, access 80,
        // time 75, location 85, device 85
        // 100*.25 + 100*.20 + 80*.20 + 75*.15 + 85*.10 + 85*.10 = 89.25
        assert!((report.overall - 89.25).abs() < 1e-9);
        assert_eq!(report.level, RiskLevel::Critical);
        assert!(!report.requires_immediate_action);
    }

    #[test]
    fn known_location_and_device_score_low() {
        let baseline = BehaviorBaseline {
            known_locations: vec!["Berlin".to_string()],
            known_devices: vec!["laptop-7".to_string()],
            ..Default::default()
        };
        let mut e = event_at_hour(10);
        e.location = Some("berlin".to_string()); // case-insensitive
        e.device = Some("laptop-7".to_string());
        let report = assess(&e, &baseline, &BehaviorWeights::default());
        assert_eq!(report.factors.location, 10.0);
        assert_eq!(report.factors.device, 10.0);
    }

    #[test]
    fn anomaly_signals_stay_in_bounds() {
        let mut e = event_at_hour(3);
        e.behavioral_anomaly = true;
        e.today_count = 10_000;
        e.location = Some("nowhere".to_string());
        e.device = Some("ghost".to_string());
        let report = assess(&e, &BehaviorBaseline::default(), &BehaviorWeights::default());
        assert!((0.0..=100.0).contains(&report.overall));
        assert!((0.0..=100.0).contains(&report.login_anomaly));
        assert!((0.0..=100.0).contains(&report.session_anomaly));
        for f in [
            report.factors.login,
            report.factors.session,
            report.factors.access,
            report.factors.time,
            report.factors.location,
            report.factors.device,
        ] {
            assert!((0.0..=100.0).contains(&f));
        }
    }

    #[test]
    fn immediate_action_flag_at_cutoff() {
        let mut e = event_at_hour(0);
        e.behavioral_anomaly = true;
        e.today_count = 500;
        e.location = Some("novel".to_string());
        e.device = Some("novel".to_string());
        let report = assess(&e, &BehaviorBaseline::default(), &BehaviorWeights::default());
        // login 100, session 100, access 80, time 75, location 85, device 85 → 89.25
        // Push over the cutoff with a tighter window baseline.
        let tight = BehaviorBaseline {
            typical_start_hour: 9,
            typical_end_hour: 17,
            ..Default::default()
        };
        let report2 = assess(&e, &tight, &BehaviorWeights::default());
        assert!(report2.overall >= report.overall);
    }

    #[test]
    fn session_score_grows_with_ratio() {
        assert_eq!(session_score(10, 20.0), 10.0);
        assert_eq!(session_score(20, 20.0), 10.0);
        assert_eq!(session_score(40, 20.0), 55.0); // 10 + 45*(2-1)
        assert_eq!(session_score(100, 20.0), 100.0); // capped
    }

    #[test]
    fn zero_avg_daily_events_does_not_divide_by_zero() {
        assert!(session_score(5, 0.0) <= 100.0);
    }
}
