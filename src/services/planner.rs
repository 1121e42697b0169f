//! Response plan synthesis: static action catalogs and a sequential
//! priority-scaled timeline.
//!
//! The timeline is a pure sequential schedule — no parallelism, no resource
//! contention modeling. Durations are returned values, never actual waits.

use crate::models::classification::{Classification, ThreatCategory};
use crate::models::event::{SecurityEvent, Severity};
use crate::models::plan::{ResponseAction, ResponsePlan, TimelineStep};

/// Containment action prepended to every CRITICAL-severity plan.
fn emergency_containment() -> ResponseAction {
    action(
        "emergency_containment",
        "Immediately cut network access for the affected scope",
        true,
        false,
        90,
    )
}

fn action(
    name: &str,
    description: &str,
    automated: bool,
    requires_approval: bool,
    estimated_secs: u64,
) -> ResponseAction {
    ResponseAction {
        name: name.to_string(),
        description: description.to_string(),
        automated,
        requires_approval,
        estimated_secs,
    }
}

/// Ordered action catalog for a category.
pub fn catalog(category: ThreatCategory) -> Vec<ResponseAction> {
    match category {
        ThreatCategory::Malware => vec![
            action(
                "isolate_endpoint",
                "Isolate the infected endpoint from the network",
                true,
                false,
                120,
            ),
            action("kill_process", "Terminate the malicious process", true, false, 60),
            action("full_scan", "Run a full antimalware scan", true, false, 1800),
            action(
                "reimage_endpoint",
                "Reimage the endpoint from a golden image",
                true,
                true,
                5400,
            ),
            action(
                "notify_security_team",
                "Notify the on-call security team",
                true,
                false,
                30,
            ),
        ],
        ThreatCategory::Phishing => vec![
            action(
                "block_sender",
                "Block the sending address at the mail gateway",
                true,
                false,
                60,
            ),
            action(
                "purge_mailboxes",
                "Remove the message from all recipient mailboxes",
                true,
                false,
                300,
            ),
            action(
                "reset_credentials",
                "Force a credential reset for recipients who clicked",
                true,
                true,
                600,
            ),
            action(
                "user_awareness_notice",
                "Send an awareness notice to affected users",
                false,
                false,
                900,
            ),
        ],
        ThreatCategory::Ddos => vec![
            action(
                "enable_rate_limiting",
                "Enable aggressive rate limiting at the edge",
                true,
                false,
                120,
            ),
            action(
                "reroute_traffic",
                "Reroute traffic through the scrubbing provider",
                true,
                true,
                600,
            ),
            action(
                "scale_capacity",
                "Scale out serving capacity",
                true,
                false,
                300,
            ),
            action(
                "notify_upstream_provider",
                "Open a mitigation ticket with the upstream provider",
                false,
                false,
                600,
            ),
        ],
        ThreatCategory::Breach => vec![
            action(
                "revoke_tokens",
                "Revoke active sessions and API tokens in scope",
                true,
                false,
                180,
            ),
            action(
                "isolate_segment",
                "Isolate the affected network segment",
                true,
                true,
                300,
            ),
            action(
                "snapshot_evidence",
                "Capture forensic snapshots of affected systems",
                true,
                false,
                1200,
            ),
            action(
                "legal_notification",
                "Start the regulatory notification workflow",
                false,
                true,
                3600,
            ),
        ],
        ThreatCategory::Unauthorized => vec![
            action("lock_account", "Lock the affected account", true, false, 60),
            action("force_mfa", "Require MFA re-enrollment", true, false, 300),
            action(
                "review_access_grants",
                "Review recent access grants for the entity",
                false,
                false,
                1800,
            ),
            action(
                "notify_security_team",
                "Notify the on-call security team",
                true,
                false,
                30,
            ),
        ],
        ThreatCategory::Unknown => vec![
            action(
                "triage_event",
                "Manually triage the unclassified event",
                false,
                false,
                900,
            ),
            action(
                "collect_context",
                "Collect surrounding telemetry for the event window",
                true,
                false,
                600,
            ),
            action(
                "notify_security_team",
                "Notify the on-call security team",
                true,
                false,
                30,
            ),
        ],
    }
}

/// Duration multiplier by classification priority: the most urgent plans
/// compress, low-priority plans stretch.
pub fn priority_multiplier(priority: u8) -> f64 {
    match priority {
        0 => 0.5,
        1 => 1.0,
        2 => 1.5,
        _ => 2.0,
    }
}

/// Build the response plan for a classified event.
pub fn build_plan(classification: &Classification, event: &SecurityEvent) -> ResponsePlan {
    let mut actions = catalog(classification.category);
    if event.severity == Severity::Critical {
        actions.insert(0, emergency_containment());
    }

    let multiplier = priority_multiplier(classification.priority);
    let mut timeline = Vec::with_capacity(actions.len());
    let mut offset: u64 = 0;
    for a in &actions {
        let duration = (a.estimated_secs as f64 * multiplier).round() as u64;
        timeline.push(TimelineStep {
            action: a.name.clone(),
            start_offset_secs: offset,
            duration_secs: duration,
            end_offset_secs: offset + duration,
        });
        offset += duration;
    }

    let automated_actions: Vec<ResponseAction> = actions
        .iter()
        .filter(|a| a.is_unattended())
        .cloned()
        .collect();
    let required_approvals = actions.iter().filter(|a| a.requires_approval).count();

    ResponsePlan {
        actions,
        timeline,
        total_secs: offset,
        required_approvals,
        automated_actions,
    }
}
