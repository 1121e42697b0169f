//! Replay script for development — runs bundled sample scenarios through
//! the engine and prints a report.
//!
//! Usage: `cargo run --bin replay`
//!
//! Uses a seeded jitter policy so repeated runs print identical numbers.

use serde_json::json;

use autosoc::config::EngineConfig;
use autosoc::models::event::AssetContext;
use autosoc::providers::{IncidentSink, MemorySink};
use autosoc::rng::JitterPolicy;
use autosoc::services::normalize;
use autosoc::DecisionEngine;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let engine = DecisionEngine::with_defaults(EngineConfig {
        jitter: JitterPolicy::Seeded(1337),
        ..EngineConfig::from_env()
    });
    let sink = MemorySink::new();

    println!("=== autosoc replay ===");

    for raw in sample_events() {
        let event = normalize::from_value(&raw);
        let ctx = AssetContext::default();
        let classification = engine.classify_event(&event);
        let risk = engine.score_risk(&event, &ctx);
        let plan = engine.build_plan(&classification, &event);
        let decision = engine.decide(&event, &ctx);

        println!(
            "[done] {:<28} category={:<12} confidence={:>5.1} risk={:>5.1} autonomous={} action={:?}",
            event.event_type,
            classification.category.as_str(),
            decision.confidence,
            decision.risk,
            decision.can_execute_autonomously,
            decision.recommended_action,
        );

        let incident = engine.assemble_incident(event, classification, risk, plan, decision);
        sink.persist(&incident)?;
    }

    let stats = engine.stats();
    println!("\n=== Replay complete! ===");
    println!(
        "{} decisions, {} autonomous ({:.0}%), {} incidents collected",
        stats.total_decisions,
        stats.autonomous_decisions,
        stats.autonomous_rate * 100.0,
        sink.len()
    );
    for (category, count) in &stats.by_category {
        println!("  {category}: {count}");
    }

    Ok(())
}

fn sample_events() -> Vec<serde_json::Value> {
    vec![
        json!({
            "id": "replay-1",
            "type": "ransomware outbreak",
            "action": "quarantine_endpoint",
            "description": "file encryption observed across three hosts",
            "source": "edr",
            "severity": "CRITICAL",
            "device": "ws-17"
        }),
        json!({
            "id": "replay-2",
            "type": "phishing campaign",
            "action": "block_sender",
            "description": "credential harvesting via fake login page",
            "source": "email_gateway",
            "severity": "MEDIUM"
        }),
        json!({
            "id": "replay-3",
            "type": "ddos wave",
            "action": "enable_rate_limiting",
            "description": "syn flood with traffic spike at the edge",
            "source": "firewall",
            "severity": "HIGH"
        }),
        json!({
            "id": "replay-4",
            "type": "data exfiltration",
            "action": "revoke_tokens",
            "description": "unusual data transfer to external upload endpoint",
            "source": "siem",
            "severity": "CRITICAL",
            "entityId": "svc-batch",
            "behavioralAnomaly": true
        }),
        json!({
            "id": "replay-5",
            "type": "odd maintenance window",
            "action": "investigate",
            "description": "unexpected configuration drift",
            "source": "user_report",
            "severity": "LOW"
        }),
    ]
}
