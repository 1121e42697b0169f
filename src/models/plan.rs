//! Response plan model: ordered, timed remediation actions.

use serde::{Deserialize, Serialize};

/// One remediation action from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseAction {
    pub name: String,
    pub description: String,
    pub automated: bool,
    pub requires_approval: bool,
    pub estimated_secs: u64,
}

impl ResponseAction {
    /// Eligible for unattended execution: automated and approval-free.
    pub fn is_unattended(&self) -> bool {
        self.automated && !self.requires_approval
    }
}

/// One slot in the sequential timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineStep {
    pub action: String,
    pub start_offset_secs: u64,
    pub duration_secs: u64,
    pub end_offset_secs: u64,
}

/// Ordered remediation plan for a classified incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePlan {
    pub actions: Vec<ResponseAction>,
    pub timeline: Vec<TimelineStep>,
    pub total_secs: u64,
    pub required_approvals: usize,
    /// Subset of `actions` eligible for unattended execution.
    pub automated_actions: Vec<ResponseAction>,
}
