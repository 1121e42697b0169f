//! Incident aggregate handed to the persistence sink collaborator.
//!
//! The engine produces these fields; storage lifecycle is owned entirely by
//! the sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::classification::Classification;
use super::decision::Decision;
use super::event::SecurityEvent;
use super::plan::ResponsePlan;
use super::risk::RiskAssessment;

/// Incident lifecycle status. Wire vocabulary fixed for persisted records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum IncidentStatus {
    Active,
    Investigating,
    Contained,
    Resolved,
}

/// Result of executing one plan action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_name: String,
    pub succeeded: bool,
    pub detail: String,
    pub executed_at: DateTime<Utc>,
}

/// Fully formed incident aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: Uuid,
    pub event: SecurityEvent,
    pub classification: Classification,
    pub risk: RiskAssessment,
    pub plan: ResponsePlan,
    pub decision: Decision,
    pub status: IncidentStatus,
    pub executed_actions: Vec<ActionResult>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_format() {
        assert_eq!(
            serde_json::to_string(&IncidentStatus::Investigating).unwrap(),
            "\"INVESTIGATING\""
        );
        let parsed: IncidentStatus = serde_json::from_str("\"CONTAINED\"").unwrap();
        assert_eq!(parsed, IncidentStatus::Contained);
    }
}
