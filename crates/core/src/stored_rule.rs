//! Alert rules as returned by the rule storage API, and their projection
//! into an editable draft.

use serde::{Deserialize, Deserializer, Serialize};

use crate::rule_draft::{RuleDraft, DEFAULT_COOLDOWN_MINUTES, DEFAULT_DURATION_SECONDS};
use crate::rule_payload::RulePayload;
use crate::threshold::{Condition, Severity};
use crate::types::{DbId, Timestamp};

/// A persisted alert rule.
///
/// Storage may send `null` for any non-key column; nulls take the same
/// defaults as missing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRule {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub metric: String,
    pub condition: Condition,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub severity: Severity,
    #[serde(default)]
    pub warning_threshold: Option<f64>,
    #[serde(default)]
    pub critical_threshold: Option<f64>,
    #[serde(default)]
    pub device_id: Option<DbId>,
    #[serde(default)]
    pub interface_id: Option<DbId>,
    #[serde(default = "default_cooldown", deserialize_with = "null_as_default_cooldown")]
    pub cooldown_minutes: i64,
    #[serde(default = "default_duration", deserialize_with = "null_as_default_duration")]
    pub duration_seconds: i64,
    #[serde(default)]
    pub notification_email: Option<String>,
    #[serde(default)]
    pub notification_webhook: Option<String>,
    #[serde(default = "default_enabled", deserialize_with = "null_as_enabled")]
    pub is_enabled: bool,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

fn default_cooldown() -> i64 {
    DEFAULT_COOLDOWN_MINUTES
}

fn default_duration() -> i64 {
    DEFAULT_DURATION_SECONDS
}

fn default_enabled() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_cooldown<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_else(default_cooldown))
}

fn null_as_default_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_else(default_duration))
}

fn null_as_enabled<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(default_enabled))
}

impl StoredRule {
    /// The rule's editable fields in wire shape.
    pub fn payload(&self) -> RulePayload {
        RulePayload {
            name: self.name.clone(),
            description: self.description.clone(),
            metric: self.metric.clone(),
            condition: self.condition,
            threshold: self.threshold,
            severity: self.severity,
            warning_threshold: self.warning_threshold,
            critical_threshold: self.critical_threshold,
            device_id: self.device_id,
            interface_id: self.interface_id,
            cooldown_minutes: self.cooldown_minutes,
            duration_seconds: self.duration_seconds,
            notification_email: self.notification_email.clone(),
            notification_webhook: self.notification_webhook.clone(),
        }
    }
}

impl RuleDraft {
    /// Project a stored rule into draft shape for editing.
    ///
    /// Nulls become empty text and numbers become their text form.
    pub fn from_stored(rule: &StoredRule) -> Self {
        Self::from_payload(&rule.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_payload::build;
    use crate::rule_validation::validate;

    const STORED_JSON: &str = r#"{
        "id": 12,
        "name": "Core uplink down",
        "description": null,
        "metric": "if_status",
        "condition": "lt",
        "threshold": 1.0,
        "severity": "critical",
        "warning_threshold": null,
        "critical_threshold": null,
        "device_id": 3,
        "interface_id": 7,
        "cooldown_minutes": 30,
        "duration_seconds": 120,
        "notification_email": "noc@example.com",
        "notification_webhook": null,
        "is_enabled": true,
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-02T10:00:00Z"
    }"#;

    #[test]
    fn projects_nulls_to_empty_text() {
        let rule: StoredRule = serde_json::from_str(STORED_JSON).unwrap();
        let draft = RuleDraft::from_stored(&rule);

        assert_eq!(draft.description, "");
        assert_eq!(draft.warning_threshold, "");
        assert_eq!(draft.notification_webhook, "");
        assert_eq!(draft.binary_threshold, "1");
        assert_eq!(draft.device_id, "3");
        assert_eq!(draft.interface_id, "7");
        assert_eq!(draft.cooldown_minutes, "30");
        assert_eq!(draft.duration_seconds, "120");
        assert_eq!(draft.severity, Severity::Critical);
    }

    #[test]
    fn projected_draft_is_valid_and_rebuilds() {
        let rule: StoredRule = serde_json::from_str(STORED_JSON).unwrap();
        let draft = RuleDraft::from_stored(&rule);
        assert!(validate(&draft).is_valid);

        let payload = build(&draft).unwrap();
        assert_eq!(payload.threshold, Some(1.0));
        assert_eq!(payload.interface_id, Some(7));
        assert_eq!(payload.cooldown_minutes, 30);
    }

    #[test]
    fn minimal_stored_rule_uses_defaults() {
        let rule: StoredRule = serde_json::from_str(
            r#"{"id": 1, "name": "cpu", "metric": "cpu_usage", "condition": "gt",
                "warning_threshold": 80}"#,
        )
        .unwrap();
        assert_eq!(rule.cooldown_minutes, 15);
        assert_eq!(rule.duration_seconds, 0);
        assert!(rule.is_enabled);
        assert_eq!(rule.created_at, None);
        assert_eq!(RuleDraft::from_stored(&rule).warning_threshold, "80");
    }

    #[test]
    fn explicit_nulls_take_defaults() {
        let rule: StoredRule = serde_json::from_str(
            r#"{
                "id": 2,
                "name": "Latency",
                "description": null,
                "metric": "ping_latency",
                "condition": "gt",
                "threshold": null,
                "severity": null,
                "warning_threshold": 150.0,
                "critical_threshold": null,
                "device_id": null,
                "interface_id": null,
                "cooldown_minutes": null,
                "duration_seconds": null,
                "notification_email": null,
                "notification_webhook": null,
                "is_enabled": null,
                "created_at": null,
                "updated_at": null
            }"#,
        )
        .unwrap();
        assert_eq!(rule.severity, Severity::Warning);
        assert_eq!(rule.cooldown_minutes, 15);
        assert_eq!(rule.duration_seconds, 0);
        assert!(rule.is_enabled);

        let draft = RuleDraft::from_stored(&rule);
        assert_eq!(draft.warning_threshold, "150");
        assert_eq!(draft.cooldown_minutes, "15");
        assert_eq!(draft.duration_seconds, "0");
        assert!(validate(&draft).is_valid);
    }

    #[test]
    fn payload_carries_editable_fields() {
        let rule: StoredRule = serde_json::from_str(STORED_JSON).unwrap();
        let payload = rule.payload();
        assert_eq!(payload.metric, "if_status");
        assert_eq!(payload.notification_email.as_deref(), Some("noc@example.com"));
        assert_eq!(RuleDraft::from_payload(&payload), RuleDraft::from_stored(&rule));
    }
}
