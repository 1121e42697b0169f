//! Tolerant decoding of raw JSON telemetry into [`SecurityEvent`].
//!
//! Malformed or missing fields substitute documented defaults rather than
//! failing: missing source → `"unknown"` (which resolves to credibility 70),
//! missing severity → MEDIUM, missing/blank id → a generated `evt-<uuid>`,
//! missing timestamp → now. Never fails.

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::models::event::{SecurityEvent, Severity};

/// Decode one raw telemetry value into an event, applying defaults.
pub fn from_value(raw: &Value) -> SecurityEvent {
    let id = match non_empty_str(raw, "id") {
        Some(id) => id,
        None => format!("evt-{}", Uuid::new_v4()),
    };

    let timestamp = raw
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    SecurityEvent {
        id,
        event_type: str_or(raw, "type", "unclassified"),
        action: str_or(raw, "action", "investigate"),
        description: str_or(raw, "description", ""),
        source: str_or(raw, "source", "unknown"),
        severity: raw
            .get("severity")
            .and_then(Value::as_str)
            .map(Severity::from_str_loose)
            .unwrap_or(Severity::Medium),
        timestamp,
        location: non_empty_str(raw, "location"),
        device: non_empty_str(raw, "device"),
        entity_id: non_empty_str(raw, "entityId").or_else(|| non_empty_str(raw, "entity_id")),
        today_count: raw
            .get("todayCount")
            .or_else(|| raw.get("today_count"))
            .and_then(Value::as_u64)
            .map(|v| v.min(u32::MAX as u64) as u32)
            .unwrap_or(1),
        frequency: raw
            .get("frequency")
            .and_then(Value::as_f64)
            .filter(|f| f.is_finite() && *f >= 0.0)
            .unwrap_or(1.0),
        behavioral_anomaly: raw
            .get("behavioralAnomaly")
            .or_else(|| raw.get("behavioral_anomaly"))
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn str_or(raw: &Value, key: &str, default: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn non_empty_str(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
