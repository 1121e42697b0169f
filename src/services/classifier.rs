//! Best-category classification with a bounded confidence boost.
//!
//! Per-category score (100-point scale):
//! `40·keyword_ratio + 30·indicator_ratio + 0.20·credibility +
//! 0.10·severity_alignment`. Winner is picked by (score desc, category name
//! asc) — an explicit tie-break, first alphabetically wins on equal scores.

use std::collections::BTreeMap;

use crate::models::classification::{Classification, ThreatCategory};
use crate::models::event::{SecurityEvent, Severity};
use crate::rng::RandomSource;
use crate::services::indicators::{self, CategoryProfile, MatchRatios};

const KEYWORD_WEIGHT: f64 = 40.0;
const INDICATOR_WEIGHT: f64 = 30.0;
const CREDIBILITY_WEIGHT: f64 = 0.20;
const ALIGNMENT_WEIGHT: f64 = 0.10;

/// Maximum random boost applied on top of the best category score.
const CONFIDENCE_BOOST_MAX: f64 = 20.0;

/// Credibility of a telemetry source, 0-100. Unrecognized sources get the
/// documented default of 70.
pub fn source_credibility(source: &str) -> f64 {
    match source.trim().to_ascii_lowercase().as_str() {
        "edr" | "endpoint" => 90.0,
        "siem" => 85.0,
        "ids" | "ips" => 80.0,
        "firewall" | "email_gateway" => 75.0,
        "user_report" => 50.0,
        _ => 70.0,
    }
}

/// Severity alignment: `max(0, 100 − 25·|event_rank − canonical_rank|)`.
fn severity_alignment(event_severity: Severity, canonical: Severity) -> f64 {
    let gap = (event_severity.rank() as i32 - canonical.rank() as i32).abs() as f64;
    (100.0 - 25.0 * gap).max(0.0)
}

fn category_score(ratios: &MatchRatios, credibility: f64, alignment: f64) -> f64 {
    (ratios.keyword_ratio * KEYWORD_WEIGHT
        + ratios.indicator_ratio * INDICATOR_WEIGHT
        + credibility * CREDIBILITY_WEIGHT
        + alignment * ALIGNMENT_WEIGHT)
        .clamp(0.0, 100.0)
}

/// Classify one event. Draws a bounded confidence boost from the injected
/// source; with a pinned source the result is fully deterministic.
pub fn classify(event: &SecurityEvent, rng: &mut dyn RandomSource) -> Classification {
    let text = indicators::match_text(event);
    let credibility = source_credibility(&event.source);

    let mut scored: Vec<(&'static CategoryProfile, MatchRatios, f64)> = indicators::profiles()
        .iter()
        .map(|profile| {
            let ratios = indicators::match_profile(&text, profile);
            let alignment = severity_alignment(event.severity, profile.canonical_severity);
            // Categories with no textual evidence score zero outright;
            // credibility and alignment alone never select a category.
            let score = if ratios.is_empty() {
                0.0
            } else {
                category_score(&ratios, credibility, alignment)
            };
            (profile, ratios, score)
        })
        .collect();

    // Explicit tie-break: score descending, then category name ascending.
    scored.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.category.as_str().cmp(b.0.category.as_str()))
    });

    let category_scores: BTreeMap<ThreatCategory, f64> = scored
        .iter()
        .map(|(profile, _, score)| (profile.category, *score))
        .collect();

    let (best_profile, best_ratios, best_score) = &scored[0];

    if *best_score <= 0.0 {
        let confidence = rng.draw(0.0, CONFIDENCE_BOOST_MAX).min(100.0);
        return Classification {
            category: ThreatCategory::Unknown,
            confidence,
            severity: Severity::Medium,
            priority: 3,
            category_scores,
            narrative: format!(
                "No category keywords or indicators matched event '{}'; \
                 defaulting to unknown at MEDIUM severity",
                event.event_type
            ),
        };
    }

    let confidence = (best_score + rng.draw(0.0, CONFIDENCE_BOOST_MAX)).min(100.0);

    // CRITICAL event severity promotes the priority one step, saturating
    // at 0 (most urgent).
    let mut priority = best_profile.base_priority;
    if event.severity == Severity::Critical {
        priority = priority.saturating_sub(1);
    }

    Classification {
        category: best_profile.category,
        confidence,
        severity: event.severity,
        priority,
        category_scores,
        narrative: format!(
            "Classified as {} (score {:.1}): keywords [{}], indicators [{}], \
             source credibility {:.0}",
            best_profile.category,
            best_score,
            best_ratios.matched_keywords.join(", "),
            best_ratios.matched_indicators.join(", "),
            credibility,
        ),
    }
}
