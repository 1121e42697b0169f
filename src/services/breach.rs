//! Breach-risk scorer: weighted components scaled by an asset multiplier.
//!
//! Components (pre-multiplier):
//! - Open vulnerabilities: 4 points each, capped at 25
//! - Scan recency: linear to 15, saturating at 24h (missing scan = 15)
//! - Threat-intel volume: 0.5 per recent report, capped at 20
//! - Simulated behavioral/network/auth contributions: bounded draws through
//!   the injected [`RandomSource`], standing in for unavailable signals
//!
//! Sum × asset multiplier, clamped to 100. Pure given a pinned source.

use chrono::{DateTime, Utc};

use crate::models::event::AssetContext;
use crate::models::risk::{BreachComponents, BreachRisk};
use crate::rng::RandomSource;

const VULN_POINTS: f64 = 4.0;
const VULN_CAP: f64 = 25.0;
const SCAN_RECENCY_CAP: f64 = 15.0;
const INTEL_POINTS: f64 = 0.5;
const INTEL_CAP: f64 = 20.0;

/// Compute the breach-risk score for one asset context.
pub fn assess(
    ctx: &AssetContext,
    intel_volume: u32,
    now: DateTime<Utc>,
    rng: &mut dyn RandomSource,
) -> BreachRisk {
    let components = BreachComponents {
        vulnerability: (ctx.vulnerability_count as f64 * VULN_POINTS).min(VULN_CAP),
        scan_recency: scan_recency_score(ctx.last_scan, now),
        intel_volume: (intel_volume as f64 * INTEL_POINTS).min(INTEL_CAP),
        behavioral: rng.draw(5.0, 15.0),
        network: rng.draw(5.0, 15.0),
        auth: rng.draw(5.0, 10.0),
    };

    let raw = components.vulnerability
        + components.scan_recency
        + components.intel_volume
        + components.behavioral
        + components.network
        + components.auth;

    let asset_multiplier = ctx.asset_type.risk_multiplier();

    BreachRisk {
        score: (raw * asset_multiplier).clamp(0.0, 100.0),
        components,
        asset_multiplier,
    }
}

/// Risk from scan staleness: linear up to the cap over 24 hours. A missing
/// scan counts as maximally stale.
fn scan_recency_score(last_scan: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match last_scan {
        None => SCAN_RECENCY_CAP,
        Some(scanned) => {
            let hours = (now - scanned).num_minutes().max(0) as f64 / 60.0;
            (hours / 24.0 * SCAN_RECENCY_CAP).min(SCAN_RECENCY_CAP)
        }
    }
}
