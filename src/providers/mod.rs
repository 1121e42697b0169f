//! Outbound collaborator seams: threat feed, behavioral baselines, and the
//! incident persistence sink.
//!
//! The engine consumes these through traits only; the implementations here
//! are the simple ones the binaries and tests use. Real deployments inject
//! their own.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::errors::ProviderError;
use crate::models::incident::Incident;
use crate::services::behavior::BehaviorBaseline;

/// Aggregated threat-count provider: recent external threat volume used by
/// the breach scorer.
pub trait ThreatFeed: Send + Sync {
    fn recent_threat_volume(&self) -> Result<u32, ProviderError>;
}

/// Fixed-volume feed for tests and offline runs.
pub struct StaticThreatFeed {
    volume: u32,
}

impl StaticThreatFeed {
    pub fn new(volume: u32) -> Self {
        Self { volume }
    }
}

impl ThreatFeed for StaticThreatFeed {
    fn recent_threat_volume(&self) -> Result<u32, ProviderError> {
        Ok(self.volume)
    }
}

/// A feed that always fails; used to exercise degraded scoring paths.
pub struct UnavailableThreatFeed;

impl ThreatFeed for UnavailableThreatFeed {
    fn recent_threat_volume(&self) -> Result<u32, ProviderError> {
        Err(ProviderError::Unavailable("threat feed offline".to_string()))
    }
}

/// Behavioral-baseline lookup keyed by entity id.
pub trait BaselineStore: Send + Sync {
    /// `None` means no baseline is known; callers substitute the
    /// documented default baseline (not a degraded path).
    fn baseline_for(&self, entity_id: &str) -> Option<BehaviorBaseline>;

    /// Fold an observation into the entity's baseline.
    fn record_observation(
        &self,
        entity_id: &str,
        location: Option<&str>,
        device: Option<&str>,
        hour: u32,
    );
}

/// In-memory baseline store.
#[derive(Default)]
pub struct InMemoryBaselineStore {
    inner: RwLock<HashMap<String, BehaviorBaseline>>,
}

impl InMemoryBaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entity_id: &str, baseline: BehaviorBaseline) {
        self.inner.write().insert(entity_id.to_string(), baseline);
    }
}

impl BaselineStore for InMemoryBaselineStore {
    fn baseline_for(&self, entity_id: &str) -> Option<BehaviorBaseline> {
        self.inner.read().get(entity_id).cloned()
    }

    fn record_observation(
        &self,
        entity_id: &str,
        location: Option<&str>,
        device: Option<&str>,
        hour: u32,
    ) {
        let mut inner = self.inner.write();
        let baseline = inner.entry(entity_id.to_string()).or_default();
        if let Some(loc) = location {
            if !baseline.known_locations.iter().any(|k| k.eq_ignore_ascii_case(loc)) {
                baseline.known_locations.push(loc.to_string());
            }
        }
        if let Some(dev) = device {
            if !baseline.known_devices.iter().any(|k| k.eq_ignore_ascii_case(dev)) {
                baseline.known_devices.push(dev.to_string());
            }
        }
        // Widen the typical window to cover observed activity hours.
        if hour < baseline.typical_start_hour {
            baseline.typical_start_hour = hour;
        }
        if hour >= baseline.typical_end_hour {
            baseline.typical_end_hour = (hour + 1).min(24);
        }
    }
}

/// Persistence sink accepting fully formed incidents.
pub trait IncidentSink: Send + Sync {
    fn persist(&self, incident: &Incident) -> Result<(), ProviderError>;
}

/// Collecting sink for tests.
#[derive(Default)]
pub struct MemorySink {
    inner: RwLock<Vec<Incident>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn take(&self) -> Vec<Incident> {
        std::mem::take(&mut *self.inner.write())
    }
}

impl IncidentSink for MemorySink {
    fn persist(&self, incident: &Incident) -> Result<(), ProviderError> {
        self.inner.write().push(incident.clone());
        Ok(())
    }
}

/// Append-only JSONL sink used by the `autosoc` binary.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IncidentSink for JsonlSink {
    fn persist(&self, incident: &Incident) -> Result<(), ProviderError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(incident)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}
