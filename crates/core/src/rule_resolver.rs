//! Dependent-field transitions for a rule draft.
//!
//! Every edit is a functional update: the old draft is left untouched and
//! a new one is returned. One field changes per call.
//!
//! - Changing the metric clears the interface (policy dependent, see
//!   [`InterfaceRetention`]) and never touches the device.
//! - Changing the metric to one of another threshold shape preselects that
//!   shape's comparison, severity and (binary) threshold.
//! - Changing the device always clears the interface.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metric_catalog::{MetricScope, ThresholdShape};
use crate::rule_draft::{is_blank, RuleDraft};
use crate::threshold::{self, Condition, Severity, DEFAULT_BINARY_THRESHOLD};

/// A single field change requested by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum DraftEdit {
    Name(String),
    Description(String),
    Device(String),
    Interface(String),
    Metric(String),
    Condition(Condition),
    BinaryThreshold(String),
    Severity(Severity),
    WarningThreshold(String),
    CriticalThreshold(String),
    CooldownMinutes(String),
    DurationSeconds(String),
    NotificationEmail(String),
    NotificationWebhook(String),
}

impl DraftEdit {
    /// Build an edit from a draft field name and its text value, as typed on
    /// a command line (`metric_id=if_status`).
    pub fn from_field(field: &str, value: &str) -> Result<Self, CoreError> {
        let v = value.to_string();
        let edit = match field {
            "name" => Self::Name(v),
            "description" => Self::Description(v),
            "device_id" => Self::Device(v),
            "interface_id" => Self::Interface(v),
            "metric_id" => Self::Metric(v),
            "condition" => Self::Condition(value.parse()?),
            "binary_threshold" => Self::BinaryThreshold(v),
            "severity" => Self::Severity(value.parse()?),
            "warning_threshold" => Self::WarningThreshold(v),
            "critical_threshold" => Self::CriticalThreshold(v),
            "cooldown_minutes" => Self::CooldownMinutes(v),
            "duration_seconds" => Self::DurationSeconds(v),
            "notification_email" => Self::NotificationEmail(v),
            "notification_webhook" => Self::NotificationWebhook(v),
            _ => {
                return Err(CoreError::InvalidValue {
                    field: "field",
                    value: field.to_string(),
                })
            }
        };
        Ok(edit)
    }
}

/// What happens to the selected interface when the metric changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceRetention {
    /// Clear the interface on every metric change.
    #[default]
    ClearOnMetricChange,
    /// Keep the interface when both the old and new metric are
    /// interface-scoped (the device is never changed by a metric edit).
    PreserveWithinInterfaceScope,
}

/// Applies [`DraftEdit`]s under a given [`InterfaceRetention`] policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleResolver {
    retention: InterfaceRetention,
}

impl RuleResolver {
    pub fn new(retention: InterfaceRetention) -> Self {
        Self { retention }
    }

    pub fn retention(&self) -> InterfaceRetention {
        self.retention
    }

    /// Return a new draft with `edit` applied and dependent fields resolved.
    ///
    /// Setting a field to the value it already holds is a no-op.
    pub fn apply(&self, draft: &RuleDraft, edit: DraftEdit) -> RuleDraft {
        let mut next = draft.clone();
        match edit {
            DraftEdit::Metric(metric_id) => {
                if metric_id == draft.metric_id {
                    return next;
                }
                let keep_interface = self.retention
                    == InterfaceRetention::PreserveWithinInterfaceScope
                    && draft.scope() == Some(MetricScope::Interface)
                    && next_scope(&metric_id) == Some(MetricScope::Interface);
                let old_shape = draft.threshold_mode().unwrap_or(ThresholdShape::Continuous);
                next.metric_id = metric_id;
                if !keep_interface {
                    next.interface_id.clear();
                }
                let new_shape = next.threshold_mode().unwrap_or(ThresholdShape::Continuous);
                if new_shape != old_shape {
                    reseed_threshold_defaults(&mut next, new_shape);
                }
            }
            DraftEdit::Device(device_id) => {
                if device_id == draft.device_id {
                    return next;
                }
                next.device_id = device_id;
                next.interface_id.clear();
            }
            DraftEdit::Interface(v) => next.interface_id = v,
            DraftEdit::Name(v) => next.name = v,
            DraftEdit::Description(v) => next.description = v,
            DraftEdit::Condition(v) => next.condition = v,
            DraftEdit::BinaryThreshold(v) => next.binary_threshold = v,
            DraftEdit::Severity(v) => next.severity = v,
            DraftEdit::WarningThreshold(v) => next.warning_threshold = v,
            DraftEdit::CriticalThreshold(v) => next.critical_threshold = v,
            DraftEdit::CooldownMinutes(v) => next.cooldown_minutes = v,
            DraftEdit::DurationSeconds(v) => next.duration_seconds = v,
            DraftEdit::NotificationEmail(v) => next.notification_email = v,
            DraftEdit::NotificationWebhook(v) => next.notification_webhook = v,
        }
        next
    }
}

/// Preselect the comparison and severity of a new threshold shape. Typed
/// threshold text is kept; a blank binary threshold gets its default.
fn reseed_threshold_defaults(draft: &mut RuleDraft, shape: ThresholdShape) {
    draft.condition = threshold::default_condition(shape);
    draft.severity = threshold::default_severity(shape);
    if shape == ThresholdShape::Binary && is_blank(&draft.binary_threshold) {
        draft.binary_threshold = DEFAULT_BINARY_THRESHOLD.to_string();
    }
}

fn next_scope(metric_id: &str) -> Option<MetricScope> {
    crate::metric_catalog::lookup(metric_id).map(|d| d.scope)
}

/// Apply an edit under the default (clear on every metric change) policy.
pub fn apply_edit(draft: &RuleDraft, edit: DraftEdit) -> RuleDraft {
    RuleResolver::default().apply(draft, edit)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric_catalog::{
        METRICS, METRIC_CPU_USAGE, METRIC_DEVICE_STATUS, METRIC_IF_IN_UTILIZATION,
        METRIC_IF_STATUS, METRIC_PDU_STATUS,
    };
    use crate::rule_validation::{validate, ValidationFailure};

    fn interface_draft() -> RuleDraft {
        let mut draft = RuleDraft::for_metric(METRIC_IF_STATUS);
        draft.device_id = "3".into();
        draft.interface_id = "7".into();
        draft
    }

    #[test]
    fn metric_change_clears_interface_for_every_other_metric() {
        let draft = interface_draft();
        for def in METRICS.iter().filter(|m| m.id != METRIC_IF_STATUS) {
            let next = apply_edit(&draft, DraftEdit::Metric(def.id.to_string()));
            assert_eq!(next.interface_id, "", "metric {}", def.id);
            assert_eq!(next.metric_id, def.id);
        }
    }

    #[test]
    fn metric_change_never_clears_device() {
        let draft = interface_draft();
        let next = apply_edit(&draft, DraftEdit::Metric(METRIC_CPU_USAGE.into()));
        assert_eq!(next.device_id, "3");

        let back = apply_edit(&next, DraftEdit::Metric(METRIC_IF_STATUS.into()));
        assert_eq!(back.device_id, "3");
    }

    #[test]
    fn device_change_clears_interface() {
        let draft = interface_draft();
        let next = apply_edit(&draft, DraftEdit::Device("4".into()));
        assert_eq!(next.device_id, "4");
        assert_eq!(next.interface_id, "");

        let cleared = apply_edit(&draft, DraftEdit::Device(String::new()));
        assert_eq!(cleared.interface_id, "");
    }

    #[test]
    fn device_change_clears_interface_regardless_of_scope() {
        let mut draft = RuleDraft::new();
        draft.device_id = "1".into();
        draft.interface_id = "7".into();
        let next = apply_edit(&draft, DraftEdit::Device("2".into()));
        assert_eq!(next.interface_id, "");
    }

    #[test]
    fn reselecting_same_values_is_a_noop() {
        let draft = interface_draft();
        assert_eq!(apply_edit(&draft, DraftEdit::Device("3".into())), draft);
        assert_eq!(
            apply_edit(&draft, DraftEdit::Metric(METRIC_IF_STATUS.into())),
            draft
        );
    }

    #[test]
    fn edits_leave_original_untouched() {
        let draft = interface_draft();
        let _ = apply_edit(&draft, DraftEdit::Device("9".into()));
        assert_eq!(draft.interface_id, "7");
    }

    #[test]
    fn preserve_policy_keeps_interface_between_interface_metrics() {
        let resolver = RuleResolver::new(InterfaceRetention::PreserveWithinInterfaceScope);
        let draft = interface_draft();

        let next = resolver.apply(&draft, DraftEdit::Metric(METRIC_IF_IN_UTILIZATION.into()));
        assert_eq!(next.interface_id, "7");

        let device_scoped = resolver.apply(&draft, DraftEdit::Metric(METRIC_CPU_USAGE.into()));
        assert_eq!(device_scoped.interface_id, "");
    }

    #[test]
    fn switching_to_binary_metric_preselects_binary_defaults() {
        let mut draft = RuleDraft::new();
        draft.name = "Device down".into();
        draft.warning_threshold = "80".into();

        let next = apply_edit(&draft, DraftEdit::Metric(METRIC_DEVICE_STATUS.into()));
        assert_eq!(next.condition, Condition::Lt);
        assert_eq!(next.severity, Severity::Critical);
        assert_eq!(next.binary_threshold, DEFAULT_BINARY_THRESHOLD);
        assert_eq!(next.warning_threshold, "80");
        assert!(!validate(&next).has(ValidationFailure::BinaryThresholdRequired));
    }

    #[test]
    fn switching_to_continuous_metric_preselects_continuous_defaults() {
        let mut draft = RuleDraft::for_metric(METRIC_DEVICE_STATUS);
        draft.binary_threshold = "0.5".into();

        let next = apply_edit(&draft, DraftEdit::Metric(METRIC_CPU_USAGE.into()));
        assert_eq!(next.condition, Condition::Gt);
        assert_eq!(next.severity, Severity::Warning);
        assert_eq!(next.binary_threshold, "0.5");

        let back = apply_edit(&next, DraftEdit::Metric(METRIC_DEVICE_STATUS.into()));
        assert_eq!(back.binary_threshold, "0.5");
        assert_eq!(back.severity, Severity::Critical);
    }

    #[test]
    fn same_shape_switch_keeps_operator_choices() {
        let mut draft = RuleDraft::for_metric(METRIC_DEVICE_STATUS);
        draft.condition = Condition::Eq;
        draft.severity = Severity::Info;
        draft.binary_threshold = "0".into();

        let next = apply_edit(&draft, DraftEdit::Metric(METRIC_PDU_STATUS.into()));
        assert_eq!(next.condition, Condition::Eq);
        assert_eq!(next.severity, Severity::Info);
        assert_eq!(next.binary_threshold, "0");
    }

    #[test]
    fn plain_field_edits_touch_only_their_field() {
        let draft = interface_draft();
        let next = apply_edit(&draft, DraftEdit::WarningThreshold("80".into()));
        assert_eq!(next.warning_threshold, "80");
        assert_eq!(next.interface_id, "7");
        assert_eq!(next.device_id, "3");
    }

    #[test]
    fn from_field_parses_typed_values() {
        assert_eq!(
            DraftEdit::from_field("condition", ">=").unwrap(),
            DraftEdit::Condition(Condition::Gte)
        );
        assert_eq!(
            DraftEdit::from_field("severity", "critical").unwrap(),
            DraftEdit::Severity(Severity::Critical)
        );
        assert_eq!(
            DraftEdit::from_field("device_id", "3").unwrap(),
            DraftEdit::Device("3".into())
        );
        assert!(DraftEdit::from_field("colour", "red").is_err());
        assert!(DraftEdit::from_field("severity", "fatal").is_err());
    }
}
