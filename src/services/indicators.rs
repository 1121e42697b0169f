//! Category keyword/indicator tables and the substring matcher.
//!
//! Matching is substring containment only over the lower-cased
//! concatenation of event type and description. No fuzzy or partial-word
//! matching. Deterministic; no side effects.

use crate::models::classification::ThreatCategory;
use crate::models::event::{SecurityEvent, Severity};

/// Static matching profile for one threat category.
#[derive(Debug, Clone, Copy)]
pub struct CategoryProfile {
    pub category: ThreatCategory,
    pub keywords: &'static [&'static str],
    pub indicators: &'static [&'static str],
    /// Canonical severity for severity-alignment scoring.
    pub canonical_severity: Severity,
    /// Base priority; 0 is the most urgent.
    pub base_priority: u8,
    pub compliance_tags: &'static [&'static str],
}

const PROFILES: [CategoryProfile; 5] = [
    CategoryProfile {
        category: ThreatCategory::Malware,
        keywords: &[
            "malware",
            "virus",
            "trojan",
            "ransomware",
            "worm",
            "spyware",
            "rootkit",
            "backdoor",
        ],
        indicators: &[
            "file encryption",
            "suspicious process",
            "crypto mining",
            "payload detected",
            "lateral movement",
        ],
        canonical_severity: Severity::High,
        base_priority: 1,
        compliance_tags: &["ISO-27001"],
    },
    CategoryProfile {
        category: ThreatCategory::Phishing,
        keywords: &[
            "phishing",
            "credential",
            "spoof",
            "impersonation",
            "fake login",
            "social engineering",
        ],
        indicators: &[
            "suspicious link",
            "credential harvesting",
            "email spoofing",
            "login page clone",
        ],
        canonical_severity: Severity::Medium,
        base_priority: 2,
        compliance_tags: &["GDPR"],
    },
    CategoryProfile {
        category: ThreatCategory::Ddos,
        keywords: &["ddos", "denial of service", "flood", "amplification", "botnet"],
        indicators: &[
            "traffic spike",
            "syn flood",
            "udp flood",
            "bandwidth saturation",
        ],
        canonical_severity: Severity::High,
        base_priority: 1,
        compliance_tags: &["ISO-27001"],
    },
    CategoryProfile {
        category: ThreatCategory::Breach,
        keywords: &["breach", "exfiltration", "data leak", "data theft", "dump"],
        indicators: &[
            "unusual data transfer",
            "database dump",
            "large download",
            "external upload",
        ],
        canonical_severity: Severity::Critical,
        base_priority: 0,
        compliance_tags: &["GDPR", "SOX"],
    },
    CategoryProfile {
        category: ThreatCategory::Unauthorized,
        keywords: &[
            "unauthorized",
            "privilege escalation",
            "brute force",
            "access violation",
            "account takeover",
        ],
        indicators: &[
            "failed login burst",
            "admin access attempt",
            "token theft",
            "session hijack",
        ],
        canonical_severity: Severity::High,
        base_priority: 2,
        compliance_tags: &["SOX", "PCI-DSS"],
    },
];

/// All candidate category profiles, in classifier tie-break-stable order.
pub fn profiles() -> &'static [CategoryProfile] {
    &PROFILES
}

/// Profile for a category; `None` for `Unknown`.
pub fn profile_for(category: ThreatCategory) -> Option<&'static CategoryProfile> {
    PROFILES.iter().find(|p| p.category == category)
}

/// Match ratios for one category over one event text.
#[derive(Debug, Clone)]
pub struct MatchRatios {
    /// Matched keywords over total keywords, 0.0-1.0.
    pub keyword_ratio: f64,
    /// Matched indicator phrases over total indicators, 0.0-1.0.
    pub indicator_ratio: f64,
    pub matched_keywords: Vec<String>,
    pub matched_indicators: Vec<String>,
}

impl MatchRatios {
    pub fn is_empty(&self) -> bool {
        self.matched_keywords.is_empty() && self.matched_indicators.is_empty()
    }
}

/// Lower-cased match text for an event: `"{event_type} {description}"`.
pub fn match_text(event: &SecurityEvent) -> String {
    format!("{} {}", event.event_type, event.description).to_lowercase()
}

/// Score one category profile against pre-lowercased event text.
pub fn match_profile(text: &str, profile: &CategoryProfile) -> MatchRatios {
    let matched_keywords: Vec<String> = profile
        .keywords
        .iter()
        .filter(|kw| text.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();
    let matched_indicators: Vec<String> = profile
        .indicators
        .iter()
        .filter(|ind| text.contains(*ind))
        .map(|ind| ind.to_string())
        .collect();

    MatchRatios {
        keyword_ratio: matched_keywords.len() as f64 / profile.keywords.len() as f64,
        indicator_ratio: matched_indicators.len() as f64 / profile.indicators.len() as f64,
        matched_keywords,
        matched_indicators,
    }
}

/// Match an event against every candidate category.
pub fn match_all(event: &SecurityEvent) -> Vec<(ThreatCategory, MatchRatios)> {
    let text = match_text(event);
    PROFILES
        .iter()
        .map(|p| (p.category, match_profile(&text, p)))
        .collect()
}
