//! `autosoc` binary: stream JSONL telemetry through the decision engine and
//! persist the resulting incidents.
//!
//! Usage: `autosoc [events.jsonl]` — reads the given file, or stdin when no
//! path is supplied. Incidents are appended to `AUTOSOC_INCIDENT_LOG`
//! (default `incidents.jsonl`).

use std::io::{BufRead, BufReader};

use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autosoc::config::EngineConfig;
use autosoc::models::event::AssetContext;
use autosoc::providers::{IncidentSink, JsonlSink};
use autosoc::services::normalize;
use autosoc::DecisionEngine;

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "autosoc=debug".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = EngineConfig::from_env();
    let engine = DecisionEngine::with_defaults(config);

    let sink_path = std::env::var("AUTOSOC_INCIDENT_LOG")
        .unwrap_or_else(|_| "incidents.jsonl".to_string());
    let sink = JsonlSink::new(&sink_path);

    let reader: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(&path)?)),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    tracing::info!(sink = %sink_path, "autosoc decision engine started");

    let mut processed = 0usize;
    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: serde_json::Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unparseable telemetry line");
                skipped += 1;
                continue;
            }
        };

        let event = normalize::from_value(&raw);
        let ctx = AssetContext::default();

        let classification = engine.classify_event(&event);
        let risk = engine.score_risk(&event, &ctx);
        let plan = engine.build_plan(&classification, &event);
        let decision = engine.decide(&event, &ctx);
        let incident = engine.assemble_incident(event, classification, risk, plan, decision);
        sink.persist(&incident)?;
        processed += 1;
    }

    let stats = engine.stats();
    tracing::info!(
        processed,
        skipped,
        autonomous = stats.autonomous_decisions,
        autonomous_rate = stats.autonomous_rate,
        "processing complete"
    );

    Ok(())
}
