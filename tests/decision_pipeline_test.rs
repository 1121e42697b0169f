//! End-to-end tests for the full decision pipeline, exercised through the
//! public engine API — no transport, no persistence service.
//!
//! Run with: `cargo test --test decision_pipeline_test`

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use autosoc::config::EngineConfig;
use autosoc::models::classification::ThreatCategory;
use autosoc::models::decision::{AutonomyLevel, DecisionOutcome, RecommendedAction};
use autosoc::models::event::{AssetContext, AssetType, SecurityEvent, Severity};
use autosoc::providers::{
    IncidentSink, InMemoryBaselineStore, JsonlSink, StaticThreatFeed,
};
use autosoc::rng::JitterPolicy;
use autosoc::services::learning::InMemoryDecisionStore;
use autosoc::DecisionEngine;

/// Engine with jitter disabled: every bounded draw pins to its lower bound,
/// making the whole pipeline deterministic.
fn pinned_engine() -> DecisionEngine {
    DecisionEngine::with_defaults(EngineConfig {
        jitter: JitterPolicy::Disabled,
        ..Default::default()
    })
}

fn pinned_engine_with(capacity: usize, feed_volume: u32) -> DecisionEngine {
    DecisionEngine::new(
        EngineConfig {
            jitter: JitterPolicy::Disabled,
            store_capacity: capacity,
            ..Default::default()
        },
        Arc::new(InMemoryDecisionStore::new(capacity)),
        Arc::new(StaticThreatFeed::new(feed_volume)),
        Arc::new(InMemoryBaselineStore::new()),
    )
}

fn base_event(id: &str, event_type: &str, action: &str, severity: Severity) -> SecurityEvent {
    SecurityEvent {
        id: id.to_string(),
        event_type: event_type.to_string(),
        action: action.to_string(),
        description: String::new(),
        source: "edr".to_string(),
        severity,
        timestamp: Utc.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap(),
        location: None,
        device: None,
        entity_id: None,
        today_count: 3,
        frequency: 1.0,
        behavioral_anomaly: false,
    }
}

fn quiet_workstation_ctx(event: &SecurityEvent) -> AssetContext {
    AssetContext {
        asset_type: AssetType::Workstation,
        vulnerability_count: 2,
        last_scan: Some(event.timestamp - Duration::hours(6)),
    }
}

// -- Scenario A: ransomware outbreak, gate open --

#[test]
fn scenario_a_ransomware_executes_autonomously() {
    let engine = pinned_engine();
    let mut event = base_event(
        "evt-a",
        "ransomware outbreak",
        "quarantine_endpoint",
        Severity::Critical,
    );
    event.description = "file encryption observed across hosts".to_string();
    let ctx = quiet_workstation_ctx(&event);

    let classification = engine.classify_event(&event);
    assert_eq!(classification.category, ThreatCategory::Malware);
    assert_eq!(classification.severity, Severity::Critical);

    let decision = engine.decide(&event, &ctx);
    assert_eq!(decision.required_autonomy, AutonomyLevel::High);
    assert!(decision.confidence >= 85.0);
    assert!(decision.risk < 50.0);
    assert!(decision.can_execute_autonomously);
    assert_eq!(
        decision.recommended_action,
        RecommendedAction::ImmediateAutonomousResponse
    );
}

// -- Scenario B: nothing matches --

#[test]
fn scenario_b_unmatched_event_is_unknown() {
    let engine = pinned_engine();
    let mut event = base_event("evt-b", "routine maintenance", "investigate", Severity::Medium);
    event.description = "scheduled patch window".to_string();

    let classification = engine.classify_event(&event);
    assert_eq!(classification.category, ThreatCategory::Unknown);
    assert_eq!(classification.priority, 3);
    // No category bonus: with jitter pinned, confidence is the base score.
    assert_eq!(classification.confidence, 0.0);

    let decision = engine.decide(&event, &quiet_workstation_ctx(&event));
    // Unknown events always demand CRITICAL authority; the gate stays shut.
    assert_eq!(decision.required_autonomy, AutonomyLevel::Critical);
    assert!(!decision.can_execute_autonomously);
}

// -- Scenario C: breach scoring is bit-identical with jitter disabled --

#[test]
fn scenario_c_pinned_breach_scoring_is_bit_identical() {
    let engine = pinned_engine_with(1000, 7);
    let event = base_event("evt-c", "breach probe", "revoke_tokens", Severity::High);
    let ctx = AssetContext {
        asset_type: AssetType::Database,
        vulnerability_count: 4,
        last_scan: Some(event.timestamp - Duration::hours(12)),
    };

    let first = engine.score_risk(&event, &ctx);
    for _ in 0..9 {
        let again = engine.score_risk(&event, &ctx);
        assert_eq!(
            again.breach.score.to_bits(),
            first.breach.score.to_bits()
        );
        assert_eq!(
            again.overall_risk_score.to_bits(),
            first.overall_risk_score.to_bits()
        );
    }
}

// -- Scenario D: approval-gated actions never run unattended --

#[test]
fn scenario_d_approval_actions_excluded_from_automated_set() {
    let engine = pinned_engine();
    let mut event = base_event(
        "evt-d",
        "ransomware outbreak",
        "quarantine_endpoint",
        Severity::Critical,
    );
    event.description = "file encryption observed".to_string();

    let classification = engine.classify_event(&event);
    let plan = engine.build_plan(&classification, &event);

    let reimage = plan
        .actions
        .iter()
        .find(|a| a.name == "reimage_endpoint")
        .expect("malware catalog carries the reimage action");
    assert!(reimage.automated && reimage.requires_approval);
    assert!(plan
        .automated_actions
        .iter()
        .all(|a| a.automated && !a.requires_approval));
    assert!(plan
        .automated_actions
        .iter()
        .all(|a| a.name != "reimage_endpoint"));
    // CRITICAL severity prepends containment.
    assert_eq!(plan.actions[0].name, "emergency_containment");
}

// -- Score bounds --

#[test]
fn all_scores_stay_within_bounds() {
    let engine = DecisionEngine::with_defaults(EngineConfig {
        jitter: JitterPolicy::Seeded(99),
        ..Default::default()
    });

    let extremes = [
        ("evt-x1", "ransomware breach ddos phishing unauthorized", Severity::Critical),
        ("evt-x2", "", Severity::Low),
        ("evt-x3", "data exfiltration database dump", Severity::High),
    ];
    for (id, event_type, severity) in extremes {
        let mut event = base_event(id, event_type, "investigate", severity);
        event.behavioral_anomaly = true;
        event.today_count = 10_000;
        let ctx = AssetContext {
            asset_type: AssetType::Api,
            vulnerability_count: 500,
            last_scan: None,
        };

        let classification = engine.classify_event(&event);
        assert!((0.0..=100.0).contains(&classification.confidence));
        for score in classification.category_scores.values() {
            assert!((0.0..=100.0).contains(score));
        }

        let risk = engine.score_risk(&event, &ctx);
        assert!((0.0..=100.0).contains(&risk.overall_risk_score));
        assert!((0.0..=100.0).contains(&risk.breach.score));
        assert!((0.0..=100.0).contains(&risk.behavior.overall));
        assert!((0.0..=100.0).contains(&risk.behavior.login_anomaly));
        assert!((0.0..=100.0).contains(&risk.behavior.session_anomaly));

        let decision = engine.decide(&event, &ctx);
        assert!((0.0..=100.0).contains(&decision.confidence));
        assert!((0.0..=100.0).contains(&decision.risk));
    }
}

// -- Gate monotonicity: risk ceiling wins over any confidence --

#[test]
fn high_risk_closes_the_gate_regardless_of_confidence() {
    // Saturated asset context pushes risk well past the 50 ceiling.
    let engine = pinned_engine_with(1000, 200);
    let mut event = base_event(
        "evt-risky",
        "ransomware outbreak",
        "quarantine_endpoint",
        Severity::Critical,
    );
    event.description = "file encryption observed".to_string();
    let ctx = AssetContext {
        asset_type: AssetType::Api,
        vulnerability_count: 100,
        last_scan: None,
    };

    let decision = engine.decide(&event, &ctx);
    assert!(decision.confidence >= 85.0);
    assert!(decision.risk >= 50.0);
    assert!(!decision.can_execute_autonomously);
    assert_eq!(
        decision.recommended_action,
        RecommendedAction::EscalateToAnalyst
    );
}

// -- Determinism of category selection --

#[test]
fn category_selection_is_deterministic_across_runs() {
    let engine = pinned_engine();
    let mut event = base_event("evt-det", "phishing campaign", "block_sender", Severity::Medium);
    event.description = "credential harvesting via fake login".to_string();
    let first = engine.classify_event(&event);
    for _ in 0..4 {
        let again = engine.classify_event(&event);
        assert_eq!(again.category, first.category);
        assert_eq!(again.confidence.to_bits(), first.confidence.to_bits());
    }
}

// -- Learning store bound and outcome handling --

#[test]
fn store_capacity_is_bounded_with_fifo_eviction() {
    let engine = pinned_engine_with(5, 0);
    let ctx = AssetContext::default();
    for i in 0..8 {
        let event = base_event(
            &format!("evt-cap-{i}"),
            "login anomaly probe",
            "investigate",
            Severity::Low,
        );
        engine.decide(&event, &ctx);
    }
    let stats = engine.stats();
    assert_eq!(stats.total_decisions, 5);

    // The oldest three were evicted; outcomes for them are not found.
    let err = engine
        .record_outcome("evt-cap-0", DecisionOutcome::Success, Some(10.0))
        .unwrap_err();
    assert!(err.is_not_found());
    engine
        .record_outcome("evt-cap-7", DecisionOutcome::Success, Some(10.0))
        .unwrap();
}

#[test]
fn record_outcome_unknown_id_is_explicit_not_found() {
    let engine = pinned_engine();
    let err = engine
        .record_outcome("evt-never-seen", DecisionOutcome::Failure, None)
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn human_override_is_a_terminal_outcome() {
    let engine = pinned_engine();
    let event = base_event("evt-ovr", "ddos wave flood", "enable_rate_limiting", Severity::High);
    engine.decide(&event, &AssetContext::default());
    engine
        .record_outcome(
            "evt-ovr",
            DecisionOutcome::Overridden {
                action: "manual_null_route".to_string(),
            },
            Some(240.0),
        )
        .unwrap();
    let stats = engine.stats();
    assert_eq!(stats.outcomes.overridden, 1);
    assert_eq!(stats.outcomes.pending, 0);
}

// -- Learning feedback loop --

#[test]
fn successes_feed_back_into_later_decisions() {
    let engine = pinned_engine();
    let ctx = AssetContext::default();

    for i in 0..4 {
        let mut event = base_event(
            &format!("evt-fb-{i}"),
            "brute force wave",
            "lock_account",
            Severity::Medium,
        );
        event.description = "failed login burst against admin accounts".to_string();
        engine.decide(&event, &ctx);
        engine
            .record_outcome(&format!("evt-fb-{i}"), DecisionOutcome::Success, Some(90.0))
            .unwrap();
    }

    let mut fresh = base_event("evt-fb-x", "brute force wave", "lock_account", Severity::Medium);
    fresh.description = "failed login burst against admin accounts".to_string();
    let decision = engine.decide(&fresh, &ctx);
    assert_eq!(decision.analysis.historical.similar_count, 4);
    assert_eq!(decision.analysis.historical.success_rate, 1.0);
    assert_eq!(decision.analysis.historical.avg_resolution_secs, 90.0);
    assert!(!decision.analysis.correlations.is_empty());
}

// -- Incident persistence through the sink --

#[test]
fn incident_round_trips_through_the_jsonl_sink() {
    let engine = pinned_engine();
    let mut event = base_event(
        "evt-sink",
        "data exfiltration",
        "revoke_tokens",
        Severity::Critical,
    );
    event.description = "unusual data transfer to external upload".to_string();
    let ctx = quiet_workstation_ctx(&event);

    let classification = engine.classify_event(&event);
    assert_eq!(classification.category, ThreatCategory::Breach);
    let risk = engine.score_risk(&event, &ctx);
    assert!(risk.compliance_tags.contains(&"GDPR".to_string()));
    let plan = engine.build_plan(&classification, &event);
    let decision = engine.decide(&event, &ctx);
    let incident = engine.assemble_incident(event, classification, risk, plan, decision);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("incidents.jsonl");
    let sink = JsonlSink::new(&path);
    sink.persist(&incident).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let line = contents.lines().next().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(parsed["event"]["id"], "evt-sink");
    assert_eq!(parsed["classification"]["category"], "breach");
    assert_eq!(parsed["event"]["severity"], "CRITICAL");
}
