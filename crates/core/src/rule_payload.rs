//! Wire payload for the rule storage API and the draft → payload transform.
//!
//! Only fields meaningful for the rule's threshold shape are sent. Optional
//! fields are omitted from the JSON object, never sent as `null`, so a
//! previous mode's thresholds cannot be resurrected by the storage layer.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metric_catalog::{self, MetricScope};
use crate::rule_draft::{
    is_blank, number_text, optional_text, parse_count, parse_id, RuleDraft,
    DEFAULT_COOLDOWN_MINUTES, DEFAULT_DURATION_SECONDS,
};
use crate::threshold::{Condition, Severity, ThresholdSpec};
use crate::types::DbId;

/// Body of a create (`POST`) or update (`PATCH`) rule request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub metric: String,
    pub condition: Condition,
    /// Binary rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    pub severity: Severity,
    /// Continuous rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_threshold: Option<f64>,
    /// Continuous rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_id: Option<DbId>,
    pub cooldown_minutes: i64,
    pub duration_seconds: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_webhook: Option<String>,
}

fn non_empty(s: &str) -> Option<String> {
    (!is_blank(s)).then(|| s.to_string())
}

/// Build the wire payload for a draft.
///
/// Does not validate: callers confirm [`crate::rule_validation::validate`]
/// first, or use the result as a preview only. Fails only when the metric
/// is not in the catalog, since its shape decides the threshold fields.
pub fn build(draft: &RuleDraft) -> Result<RulePayload, CoreError> {
    let def = metric_catalog::require(&draft.metric_id)?;
    let spec = draft.threshold_spec_for(def);

    let (threshold, warning_threshold, critical_threshold) = match spec {
        ThresholdSpec::Binary { threshold, .. } => (Some(threshold), None, None),
        ThresholdSpec::Continuous { warning, critical } => (None, warning, critical),
    };

    let interface_id = match def.scope {
        MetricScope::Interface => parse_id(&draft.interface_id),
        MetricScope::Device => None,
    };

    Ok(RulePayload {
        name: draft.name.trim().to_string(),
        description: non_empty(&draft.description),
        metric: def.id.to_string(),
        condition: draft.condition,
        threshold,
        severity: spec.severity(),
        warning_threshold,
        critical_threshold,
        device_id: parse_id(&draft.device_id),
        interface_id,
        cooldown_minutes: parse_count(&draft.cooldown_minutes).unwrap_or(DEFAULT_COOLDOWN_MINUTES),
        duration_seconds: parse_count(&draft.duration_seconds).unwrap_or(DEFAULT_DURATION_SECONDS),
        notification_email: non_empty(&draft.notification_email),
        notification_webhook: non_empty(&draft.notification_webhook),
    })
}

impl RuleDraft {
    /// Re-hydrate a draft from a payload, e.g. a saved preview file.
    pub fn from_payload(payload: &RulePayload) -> Self {
        Self {
            name: payload.name.clone(),
            description: optional_text(payload.description.as_deref()),
            device_id: payload.device_id.map(|id| id.to_string()).unwrap_or_default(),
            interface_id: payload.interface_id.map(|id| id.to_string()).unwrap_or_default(),
            metric_id: payload.metric.clone(),
            condition: payload.condition,
            binary_threshold: payload.threshold.map(number_text).unwrap_or_default(),
            severity: payload.severity,
            warning_threshold: payload.warning_threshold.map(number_text).unwrap_or_default(),
            critical_threshold: payload.critical_threshold.map(number_text).unwrap_or_default(),
            cooldown_minutes: payload.cooldown_minutes.to_string(),
            duration_seconds: payload.duration_seconds.to_string(),
            notification_email: optional_text(payload.notification_email.as_deref()),
            notification_webhook: optional_text(payload.notification_webhook.as_deref()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
