//! Learning store: append-only decision history feeding historical context
//! back into future scoring.
//!
//! The store interface is explicit (injectable, internally synchronized) so
//! eviction and thread-safety are testable. The in-memory implementation is
//! bounded; the oldest entry is evicted first, FIFO by insertion order.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::models::classification::ThreatCategory;
use crate::models::decision::{Decision, DecisionOutcome, HistoricalContext};

/// Default capacity of the in-memory store.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Window for "similar" past decisions in historical context.
pub const HISTORY_WINDOW_HOURS: i64 = 24;

/// A stored decision with its outcome lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningRecord {
    pub decision: Decision,
    pub category: ThreatCategory,
    pub event_type: String,
    pub fingerprint: String,
    pub outcome: DecisionOutcome,
    pub resolution_secs: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LearningRecord {
    /// Fresh PENDING record at decision time.
    pub fn pending(
        decision: Decision,
        category: ThreatCategory,
        event_type: &str,
        fingerprint: &str,
    ) -> Self {
        Self {
            decision,
            category,
            event_type: event_type.to_string(),
            fingerprint: fingerprint.to_string(),
            outcome: DecisionOutcome::Pending,
            resolution_secs: None,
            recorded_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Injected store interface for decision history.
pub trait DecisionStore: Send + Sync {
    /// Insert (or replace) the record for its event id.
    fn put(&self, record: LearningRecord);

    fn get(&self, event_id: &str) -> Option<LearningRecord>;

    /// The only mutator after initial insert. Overwrites outcome,
    /// resolution time and completion timestamp; unknown ids are an
    /// explicit not-found, never a panic.
    fn update_outcome(
        &self,
        event_id: &str,
        outcome: DecisionOutcome,
        resolution_secs: Option<f64>,
    ) -> Result<(), EngineError>;

    /// Same-type records recorded within the window ending at `now`.
    fn recent_for_type(&self, event_type: &str, now: DateTime<Utc>) -> Vec<LearningRecord>;

    /// Stored records with the given event fingerprint.
    fn fingerprint_count(&self, fingerprint: &str) -> usize;

    /// Clone of all stored records, for derived statistics.
    fn snapshot(&self) -> Vec<LearningRecord>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Success-rate statistics over same-type decisions in the window.
    /// All derived from a scan; no separate index.
    fn historical_context(&self, event_type: &str, now: DateTime<Utc>) -> HistoricalContext {
        let similar = self.recent_for_type(event_type, now);
        if similar.is_empty() {
            return HistoricalContext::empty();
        }
        let successes: Vec<&LearningRecord> =
            similar.iter().filter(|r| r.outcome.is_success()).collect();
        let resolution_times: Vec<f64> =
            successes.iter().filter_map(|r| r.resolution_secs).collect();
        let avg_resolution_secs = if resolution_times.is_empty() {
            0.0
        } else {
            resolution_times.iter().sum::<f64>() / resolution_times.len() as f64
        };
        HistoricalContext {
            similar_count: similar.len(),
            success_rate: successes.len() as f64 / similar.len() as f64,
            avg_resolution_secs,
        }
    }
}

struct StoreInner {
    records: HashMap<String, LearningRecord>,
    /// Insertion order for FIFO eviction.
    order: VecDeque<String>,
}

/// Bounded in-memory implementation.
pub struct InMemoryDecisionStore {
    capacity: usize,
    inner: RwLock<StoreInner>,
}

impl InMemoryDecisionStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(StoreInner {
                records: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }
}

impl Default for InMemoryDecisionStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DecisionStore for InMemoryDecisionStore {
    fn put(&self, record: LearningRecord) {
        let mut inner = self.inner.write();
        let event_id = record.decision.event_id.clone();
        if inner.records.insert(event_id.clone(), record).is_none() {
            inner.order.push_back(event_id);
        }
        while inner.records.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.records.remove(&oldest);
                tracing::warn!(event_id = %oldest, "learning store at capacity, evicted oldest decision");
            }
        }
    }

    fn get(&self, event_id: &str) -> Option<LearningRecord> {
        self.inner.read().records.get(event_id).cloned()
    }

    fn update_outcome(
        &self,
        event_id: &str,
        outcome: DecisionOutcome,
        resolution_secs: Option<f64>,
    ) -> Result<(), EngineError> {
        let mut inner = self.inner.write();
        let record = inner
            .records
            .get_mut(event_id)
            .ok_or_else(|| EngineError::NotFound(format!("decision {event_id}")))?;
        if record.outcome.is_terminal() {
            tracing::warn!(
                event_id,
                previous = ?record.outcome,
                "overwriting a terminal decision outcome"
            );
        }
        record.outcome = outcome;
        record.resolution_secs = resolution_secs;
        record.completed_at = Some(Utc::now());
        Ok(())
    }

    fn recent_for_type(&self, event_type: &str, now: DateTime<Utc>) -> Vec<LearningRecord> {
        let cutoff = now - Duration::hours(HISTORY_WINDOW_HOURS);
        self.inner
            .read()
            .records
            .values()
            .filter(|r| r.event_type == event_type && r.recorded_at > cutoff)
            .cloned()
            .collect()
    }

    fn fingerprint_count(&self, fingerprint: &str) -> usize {
        self.inner
            .read()
            .records
            .values()
            .filter(|r| r.fingerprint == fingerprint)
            .count()
    }

    fn snapshot(&self) -> Vec<LearningRecord> {
        self.inner.read().records.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.inner.read().records.len()
    }
}
