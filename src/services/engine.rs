//! Decision engine facade wiring the pipeline:
//! matcher → scorers → classifier → autonomy gate → planner → store.
//!
//! Every public operation returns a complete, well-typed result even on a
//! degraded path; provider failures fall back to neutral contributions and
//! set the `degraded` flag instead of aborting the request.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::models::classification::{Classification, ThreatCategory};
use crate::models::decision::{
    AutonomyLevel, Decision, DecisionAnalysis, DecisionOutcome, HistoricalContext,
    RecommendedAction, Urgency,
};
use crate::models::event::{AssetContext, SecurityEvent, Severity};
use crate::models::incident::{Incident, IncidentStatus};
use crate::models::plan::ResponsePlan;
use crate::models::risk::{
    BusinessImpact, ContainmentStatus, CostEstimate, RiskAssessment, RiskLevel,
};
use crate::providers::{BaselineStore, InMemoryBaselineStore, StaticThreatFeed, ThreatFeed};
use crate::rng::PinnedSource;
use crate::services::behavior::{self, BehaviorWeights};
use crate::services::learning::{DecisionStore, InMemoryDecisionStore, LearningRecord};
use crate::services::{autonomy, breach, classifier, fingerprint, planner};

/// Weights combining the two scorers and severity into the overall risk.
const RISK_WEIGHT_BEHAVIOR: f64 = 0.40;
const RISK_WEIGHT_BREACH: f64 = 0.40;
const RISK_WEIGHT_SEVERITY: f64 = 0.20;

/// Historical context only influences a decision once this many similar
/// prior decisions exist.
const HISTORY_MIN_SIMILAR: usize = 3;

/// Aggregate statistics derived from the learning store.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    pub total_decisions: usize,
    pub autonomous_decisions: usize,
    pub autonomous_rate: f64,
    pub by_category: BTreeMap<ThreatCategory, usize>,
    pub outcomes: OutcomeCounts,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutcomeCounts {
    pub pending: usize,
    pub success: usize,
    pub failure: usize,
    pub overridden: usize,
}

/// The engine facade. Shared across threads behind an `Arc`; all interior
/// state is internally synchronized.
pub struct DecisionEngine {
    config: EngineConfig,
    store: Arc<dyn DecisionStore>,
    feed: Arc<dyn ThreatFeed>,
    baselines: Arc<dyn BaselineStore>,
    weights: BehaviorWeights,
    autonomy_level: RwLock<AutonomyLevel>,
}

impl DecisionEngine {
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn DecisionStore>,
        feed: Arc<dyn ThreatFeed>,
        baselines: Arc<dyn BaselineStore>,
    ) -> Self {
        let autonomy_level = RwLock::new(config.default_autonomy_level);
        Self {
            config,
            store,
            feed,
            baselines,
            weights: BehaviorWeights::default(),
            autonomy_level,
        }
    }

    /// Engine with in-memory collaborators; used by the binaries and tests.
    pub fn with_defaults(config: EngineConfig) -> Self {
        let capacity = config.store_capacity;
        Self::new(
            config,
            Arc::new(InMemoryDecisionStore::new(capacity)),
            Arc::new(StaticThreatFeed::new(0)),
            Arc::new(InMemoryBaselineStore::new()),
        )
    }

    /// Process-wide operator autonomy level. Adjusts the gate's risk
    /// penalty only; per-category confidence thresholds are unaffected.
    pub fn autonomy_level(&self) -> AutonomyLevel {
        *self.autonomy_level.read()
    }

    pub fn set_autonomy_level(&self, level: AutonomyLevel) {
        tracing::info!(level = %level, "operator autonomy level changed");
        *self.autonomy_level.write() = level;
    }

    /// Classify one event: indicator matching, credibility and severity
    /// alignment, with the bounded confidence boost.
    pub fn classify_event(&self, event: &SecurityEvent) -> Classification {
        let mut rng = self.config.jitter.source_for(&event.id);
        let classification = classifier::classify(event, rng.as_mut());
        tracing::debug!(
            event_id = %event.id,
            category = %classification.category,
            confidence = classification.confidence,
            "classified event"
        );
        classification
    }

    /// Score risk for one event: behavioral + breach scorers combined with
    /// event severity, never failing. A threat-feed failure falls back to
    /// zero volume and marks the result degraded.
    pub fn score_risk(&self, event: &SecurityEvent, ctx: &AssetContext) -> RiskAssessment {
        let baseline = event
            .entity_id
            .as_deref()
            .and_then(|id| self.baselines.baseline_for(id))
            .unwrap_or_default();
        let behavior_report = behavior::assess(event, &baseline, &self.weights);

        let (intel_volume, degraded) = match self.feed.recent_threat_volume() {
            Ok(volume) => (volume, false),
            Err(err) => {
                tracing::warn!(event_id = %event.id, error = %err, "threat feed unavailable, scoring with zero volume");
                (0, true)
            }
        };

        let mut rng = self.config.jitter.source_for(&event.id);
        let breach_risk = breach::assess(ctx, intel_volume, event.timestamp, rng.as_mut());

        let severity_score = event.severity.rank() as f64 * 25.0;
        let overall = (behavior_report.overall * RISK_WEIGHT_BEHAVIOR
            + breach_risk.score * RISK_WEIGHT_BREACH
            + severity_score * RISK_WEIGHT_SEVERITY)
            .clamp(0.0, 100.0);
        let risk_level = RiskLevel::from_score(overall);

        // Category drives compliance framing; classified without jitter so
        // risk scoring stays deterministic.
        let category = classifier::classify(event, &mut PinnedSource).category;
        let compliance_tags = crate::services::indicators::profile_for(category)
            .map(|p| p.compliance_tags.iter().map(|t| t.to_string()).collect())
            .unwrap_or_default();

        let cost_base = overall * 1800.0 * ctx.asset_type.risk_multiplier();
        RiskAssessment {
            overall_risk_score: overall,
            risk_level,
            business_impact: BusinessImpact {
                rating: risk_level,
                description: format!(
                    "{risk_level} impact on {:?} assets from a {category} event",
                    ctx.asset_type
                ),
            },
            containment_status: ContainmentStatus::Uncontained,
            compliance_tags,
            estimated_cost: CostEstimate {
                min: (cost_base * 0.6).round(),
                max: (cost_base * 1.6).round(),
                estimated: cost_base.round(),
            },
            behavior: behavior_report,
            breach: breach_risk,
            degraded,
        }
    }

    /// Full decision for one event. The single path through the autonomy
    /// gate; appends a PENDING record to the learning store.
    pub fn decide(&self, event: &SecurityEvent, ctx: &AssetContext) -> Decision {
        let classification = self.classify_event(event);
        let risk_assessment = self.score_risk(event, ctx);
        let historical = self.store.historical_context(&event.event_type, Utc::now());

        let requirement = autonomy::required_tier(classification.category, &event.action);

        // Decision confidence: classification confidence floored by the
        // action table's base hint, then nudged by historical success.
        let mut confidence = classification
            .confidence
            .max(requirement.base_confidence)
            .clamp(0.0, 100.0);
        let mut risk = risk_assessment.overall_risk_score;
        if historical.similar_count >= HISTORY_MIN_SIMILAR {
            confidence = (confidence + (historical.success_rate * 100.0 - 50.0) * 0.1)
                .clamp(0.0, 100.0);
            risk = (risk - (historical.success_rate - 0.5) * 10.0).clamp(0.0, 100.0);
        }

        let operator_level = self.autonomy_level();
        let gate = autonomy::evaluate(requirement.tier, confidence, risk, operator_level);

        let recommended_action = if gate.allowed {
            if event.severity == Severity::Critical {
                RecommendedAction::ImmediateAutonomousResponse
            } else {
                RecommendedAction::AutonomousIsolationAndAnalysis
            }
        } else if risk_assessment.risk_level >= RiskLevel::High
            || classification.severity >= Severity::High
        {
            RecommendedAction::EscalateToAnalyst
        } else {
            RecommendedAction::MonitorAndLog
        };

        let fp = fingerprint::for_event(event);
        let analysis = DecisionAnalysis {
            threat_level: risk_assessment.risk_level,
            impact_assessment: risk_assessment.business_impact.description.clone(),
            urgency: Urgency::from_priority(classification.priority),
            patterns: self.detect_patterns(event, &fp, &risk_assessment),
            correlations: correlations_for(&historical, event),
            historical: historical.clone(),
        };

        let reasoning = build_reasoning(
            &classification,
            &risk_assessment,
            requirement.tier,
            &gate,
            &historical,
            operator_level,
        );

        let decision = Decision {
            event_id: event.id.clone(),
            analysis,
            required_autonomy: requirement.tier,
            confidence,
            risk: gate.adjusted_risk,
            can_execute_autonomously: gate.allowed,
            recommended_action,
            reasoning,
            degraded: risk_assessment.degraded,
            timestamp: Utc::now(),
        };

        self.store.put(LearningRecord::pending(
            decision.clone(),
            classification.category,
            &event.event_type,
            &fp,
        ));
        if let Some(entity_id) = event.entity_id.as_deref() {
            use chrono::Timelike;
            self.baselines.record_observation(
                entity_id,
                event.location.as_deref(),
                event.device.as_deref(),
                event.timestamp.hour(),
            );
        }

        tracing::info!(
            event_id = %event.id,
            category = %classification.category,
            confidence = decision.confidence,
            risk = decision.risk,
            autonomous = decision.can_execute_autonomously,
            action = ?decision.recommended_action,
            "decision recorded"
        );
        decision
    }

    /// Build the response plan for a classified event.
    pub fn build_plan(
        &self,
        classification: &Classification,
        event: &SecurityEvent,
    ) -> ResponsePlan {
        planner::build_plan(classification, event)
    }

    /// Record the terminal outcome for a past decision. PENDING is not a
    /// recordable outcome; unknown ids return an explicit not-found.
    pub fn record_outcome(
        &self,
        event_id: &str,
        outcome: DecisionOutcome,
        resolution_secs: Option<f64>,
    ) -> Result<(), EngineError> {
        if !outcome.is_terminal() {
            return Err(EngineError::Validation(
                "outcome must be terminal (SUCCESS, FAILURE or OVERRIDDEN)".to_string(),
            ));
        }
        self.store.update_outcome(event_id, outcome, resolution_secs)
    }

    /// Assemble the persistence aggregate for a decided event.
    pub fn assemble_incident(
        &self,
        event: SecurityEvent,
        classification: Classification,
        risk: RiskAssessment,
        plan: ResponsePlan,
        decision: Decision,
    ) -> Incident {
        let status = if decision.can_execute_autonomously {
            IncidentStatus::Investigating
        } else {
            IncidentStatus::Active
        };
        Incident {
            id: Uuid::new_v4(),
            event,
            classification,
            risk,
            plan,
            decision,
            status,
            executed_actions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Statistics derived from the learning store; no separate index.
    pub fn stats(&self) -> EngineStats {
        let records = self.store.snapshot();
        let mut by_category: BTreeMap<ThreatCategory, usize> = BTreeMap::new();
        let mut outcomes = OutcomeCounts::default();
        let mut autonomous = 0;
        for record in &records {
            *by_category.entry(record.category).or_insert(0) += 1;
            if record.decision.can_execute_autonomously {
                autonomous += 1;
            }
            match record.outcome {
                DecisionOutcome::Pending => outcomes.pending += 1,
                DecisionOutcome::Success => outcomes.success += 1,
                DecisionOutcome::Failure => outcomes.failure += 1,
                DecisionOutcome::Overridden { .. } => outcomes.overridden += 1,
            }
        }
        let total = records.len();
        EngineStats {
            total_decisions: total,
            autonomous_decisions: autonomous,
            autonomous_rate: if total == 0 {
                0.0
            } else {
                autonomous as f64 / total as f64
            },
            by_category,
            outcomes,
        }
    }

    fn detect_patterns(
        &self,
        event: &SecurityEvent,
        fp: &str,
        risk: &RiskAssessment,
    ) -> Vec<String> {
        let mut patterns = Vec::new();
        let repeats = self.store.fingerprint_count(fp);
        if repeats > 0 {
            patterns.push(format!("repeat-signature:{repeats}x"));
        }
        if event.behavioral_anomaly {
            patterns.push("behavioral-anomaly-flag".to_string());
        }
        if risk.behavior.requires_immediate_action {
            patterns.push("behavior-immediate-action".to_string());
        }
        if event.frequency > 3.0 {
            patterns.push("burst-activity".to_string());
        }
        patterns
    }
}

fn correlations_for(historical: &HistoricalContext, event: &SecurityEvent) -> Vec<String> {
    let mut correlations = Vec::new();
    if historical.similar_count > 0 {
        correlations.push(format!(
            "same-type-events-24h:{} ({})",
            historical.similar_count, event.event_type
        ));
    }
    correlations
}

fn build_reasoning(
    classification: &Classification,
    risk: &RiskAssessment,
    tier: AutonomyLevel,
    gate: &autonomy::GateDecision,
    historical: &HistoricalContext,
    operator_level: AutonomyLevel,
) -> String {
    let gate_clause = if gate.allowed {
        format!(
            "confidence cleared the {tier} threshold ({:.0}) with risk {:.1} under the {:.0} ceiling",
            gate.threshold,
            gate.adjusted_risk,
            autonomy::RISK_CEILING
        )
    } else {
        format!(
            "gate closed: {tier} threshold {:.0}, adjusted risk {:.1} (operator level {operator_level})",
            gate.threshold, gate.adjusted_risk
        )
    };
    let history_clause = if historical.similar_count >= HISTORY_MIN_SIMILAR {
        format!(
            "; {} similar events in 24h with {:.0}% success",
            historical.similar_count,
            historical.success_rate * 100.0
        )
    } else {
        String::new()
    };
    format!(
        "{} | overall risk {:.1} ({}) | {gate_clause}{history_clause}",
        classification.narrative, risk.overall_risk_score, risk.risk_level
    )
}
