//! Pre-submit validation of a rule draft.
//!
//! Every rule is checked independently so a caller can show all failures at
//! once. Failures block submission; warnings are advisory only.

use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;
use crate::metric_catalog::MetricScope;
use crate::rule_draft::{is_blank, parse_count, parse_id, parse_number, RuleDraft};
use crate::threshold;

/// A blocking problem with a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    NameRequired,
    UnknownMetric,
    DeviceRequired,
    InterfaceRequired,
    DeviceIdMalformed,
    InterfaceIdMalformed,
    /// The interface is not in the selected device's interface list. Only
    /// a caller holding that list can report this.
    InterfaceNotOnDevice,
    BinaryThresholdRequired,
    ContinuousThresholdRequired,
    WarningThresholdMalformed,
    CriticalThresholdMalformed,
    NegativeCooldown,
    NegativeDuration,
}

impl ValidationFailure {
    /// Draft field the failure should be shown next to.
    pub fn field(self) -> &'static str {
        match self {
            Self::NameRequired => "name",
            Self::UnknownMetric => "metric_id",
            Self::DeviceRequired | Self::DeviceIdMalformed => "device_id",
            Self::InterfaceRequired | Self::InterfaceIdMalformed | Self::InterfaceNotOnDevice => {
                "interface_id"
            }
            Self::BinaryThresholdRequired => "binary_threshold",
            Self::ContinuousThresholdRequired | Self::WarningThresholdMalformed => {
                "warning_threshold"
            }
            Self::CriticalThresholdMalformed => "critical_threshold",
            Self::NegativeCooldown => "cooldown_minutes",
            Self::NegativeDuration => "duration_seconds",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NameRequired => "Rule name is required",
            Self::UnknownMetric => "Selected metric is not in the catalog",
            Self::DeviceRequired => "Interface metrics require a device",
            Self::InterfaceRequired => "Interface metrics require an interface",
            Self::DeviceIdMalformed => "Device id must be an integer",
            Self::InterfaceIdMalformed => "Interface id must be an integer",
            Self::InterfaceNotOnDevice => "Interface does not belong to the selected device",
            Self::BinaryThresholdRequired => "Threshold must be a number",
            Self::ContinuousThresholdRequired => {
                "Set at least one of the warning or critical thresholds"
            }
            Self::WarningThresholdMalformed => "Warning threshold must be a number",
            Self::CriticalThresholdMalformed => "Critical threshold must be a number",
            Self::NegativeCooldown => "Cooldown must not be negative",
            Self::NegativeDuration => "Duration must not be negative",
        }
    }
}

/// A non-blocking remark about a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationWarning {
    NotificationEmailFormat,
    NotificationWebhookFormat,
}

impl ValidationWarning {
    pub fn field(self) -> &'static str {
        match self {
            Self::NotificationEmailFormat => "notification_email",
            Self::NotificationWebhookFormat => "notification_webhook",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::NotificationEmailFormat => "Notification email does not look like an address",
            Self::NotificationWebhookFormat => "Notification webhook is not a valid URL",
        }
    }
}

/// Outcome of validating one draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub failures: Vec<ValidationFailure>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn has(&self, failure: ValidationFailure) -> bool {
        self.failures.contains(&failure)
    }

    /// The failure an editor showing one message at a time would display.
    pub fn first_failure(&self) -> Option<ValidationFailure> {
        self.failures.first().copied()
    }

    /// Add a failure found outside [`validate`], e.g. against data the
    /// core crate does not hold.
    pub fn push_failure(&mut self, failure: ValidationFailure) {
        if !self.has(failure) {
            self.failures.push(failure);
        }
        self.is_valid = false;
    }

    /// Collapse the report into a `Result`, joining every failure message.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.is_valid {
            return Ok(());
        }
        let messages: Vec<_> = self.failures.iter().map(|f| f.message()).collect();
        Err(CoreError::Validation(messages.join("; ")))
    }
}

#[derive(Validate)]
struct NotificationTargets {
    #[validate(email)]
    email: Option<String>,
    #[validate(url)]
    webhook: Option<String>,
}

fn non_blank(s: &str) -> Option<String> {
    (!is_blank(s)).then(|| s.trim().to_string())
}

/// Negative whole numbers, including ones too large to parse.
fn is_negative_count(s: &str) -> bool {
    match parse_count(s) {
        Some(v) => v < 0,
        None => s
            .trim()
            .strip_prefix('-')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())),
    }
}

/// Validate a draft against every rule.
pub fn validate(draft: &RuleDraft) -> ValidationReport {
    let mut failures = Vec::new();

    if is_blank(&draft.name) {
        failures.push(ValidationFailure::NameRequired);
    }

    // Malformed ids are reported whatever the scope: the builder would drop
    // them silently.
    if !is_blank(&draft.device_id) && parse_id(&draft.device_id).is_none() {
        failures.push(ValidationFailure::DeviceIdMalformed);
    }

    match draft.definition() {
        None => failures.push(ValidationFailure::UnknownMetric),
        Some(def) => {
            if def.scope == MetricScope::Interface {
                if is_blank(&draft.device_id) {
                    failures.push(ValidationFailure::DeviceRequired);
                }
                if is_blank(&draft.interface_id) {
                    failures.push(ValidationFailure::InterfaceRequired);
                } else if parse_id(&draft.interface_id).is_none() {
                    failures.push(ValidationFailure::InterfaceIdMalformed);
                }
            }

            let active = threshold::active_fields(threshold::threshold_shape(def));
            if active.binary_threshold && parse_number(&draft.binary_threshold).is_none() {
                failures.push(ValidationFailure::BinaryThresholdRequired);
            }
            let warning_set = active.warning_threshold && !is_blank(&draft.warning_threshold);
            let critical_set = active.critical_threshold && !is_blank(&draft.critical_threshold);
            if (active.warning_threshold || active.critical_threshold)
                && !warning_set
                && !critical_set
            {
                failures.push(ValidationFailure::ContinuousThresholdRequired);
            }
            if warning_set && parse_number(&draft.warning_threshold).is_none() {
                failures.push(ValidationFailure::WarningThresholdMalformed);
            }
            if critical_set && parse_number(&draft.critical_threshold).is_none() {
                failures.push(ValidationFailure::CriticalThresholdMalformed);
            }
        }
    }

    if is_negative_count(&draft.cooldown_minutes) {
        failures.push(ValidationFailure::NegativeCooldown);
    }
    if is_negative_count(&draft.duration_seconds) {
        failures.push(ValidationFailure::NegativeDuration);
    }

    let targets = NotificationTargets {
        email: non_blank(&draft.notification_email),
        webhook: non_blank(&draft.notification_webhook),
    };
    let mut warnings = Vec::new();
    if let Err(errors) = targets.validate() {
        let fields = errors.field_errors();
        if fields.contains_key("email") {
            warnings.push(ValidationWarning::NotificationEmailFormat);
        }
        if fields.contains_key("webhook") {
            warnings.push(ValidationWarning::NotificationWebhookFormat);
        }
    }

    ValidationReport {
        is_valid: failures.is_empty(),
        failures,
        warnings,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric_catalog::{
        ThresholdShape, METRICS, METRIC_CPU_USAGE, METRIC_DEVICE_STATUS, METRIC_IF_STATUS,
    };

    fn named(metric_id: &str) -> RuleDraft {
        let mut draft = RuleDraft::for_metric(metric_id);
        draft.name = "Rule".into();
        draft
    }

    fn valid_for(metric_id: &str) -> RuleDraft {
        let mut draft = named(metric_id);
        draft.warning_threshold = "80".into();
        draft.binary_threshold = "1".into();
        draft.device_id = "3".into();
        draft.interface_id = "7".into();
        draft
    }

    #[test]
    fn valid_draft_for_every_metric() {
        for def in METRICS {
            let report = validate(&valid_for(def.id));
            assert!(report.is_valid, "{}: {:?}", def.id, report.failures);
        }
    }

    #[test]
    fn global_continuous_rule_is_valid() {
        let mut draft = named(METRIC_CPU_USAGE);
        draft.name = "High CPU".into();
        draft.warning_threshold = "80".into();
        draft.critical_threshold = "95".into();

        let report = validate(&draft);
        assert!(report.is_valid);
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn interface_metrics_require_interface() {
        for def in METRICS.iter().filter(|m| m.scope == MetricScope::Interface) {
            let mut draft = valid_for(def.id);
            draft.interface_id.clear();
            let report = validate(&draft);
            assert!(!report.is_valid, "{}", def.id);
            assert!(report.has(ValidationFailure::InterfaceRequired));
        }
    }

    #[test]
    fn interface_metric_with_device_but_no_interface() {
        let mut draft = named(METRIC_IF_STATUS);
        draft.device_id = "3".into();

        let report = validate(&draft);
        assert!(!report.is_valid);
        assert_eq!(report.failures, vec![ValidationFailure::InterfaceRequired]);
    }

    #[test]
    fn interface_metric_without_device_reports_both() {
        let report = validate(&named(METRIC_IF_STATUS));
        assert!(report.has(ValidationFailure::DeviceRequired));
        assert!(report.has(ValidationFailure::InterfaceRequired));
    }

    #[test]
    fn continuous_fails_iff_both_thresholds_empty() {
        for def in METRICS.iter().filter(|m| m.shape == ThresholdShape::Continuous) {
            let base = valid_for(def.id);

            let mut neither = base.clone();
            neither.warning_threshold.clear();
            neither.critical_threshold = "  ".into();
            assert!(validate(&neither).has(ValidationFailure::ContinuousThresholdRequired));

            let mut warning_only = neither.clone();
            warning_only.warning_threshold = "70".into();
            assert!(validate(&warning_only).is_valid, "{}", def.id);

            let mut critical_only = neither.clone();
            critical_only.critical_threshold = "90".into();
            assert!(validate(&critical_only).is_valid, "{}", def.id);
        }
    }

    #[test]
    fn binary_threshold_must_be_finite() {
        for text in ["", "abc", "inf"] {
            let mut draft = valid_for(METRIC_DEVICE_STATUS);
            draft.binary_threshold = text.into();
            let report = validate(&draft);
            assert!(report.has(ValidationFailure::BinaryThresholdRequired), "{text:?}");
        }
    }

    #[test]
    fn binary_metric_ignores_continuous_fields() {
        let mut draft = valid_for(METRIC_DEVICE_STATUS);
        draft.warning_threshold = "not a number".into();
        assert!(validate(&draft).is_valid);
    }

    #[test]
    fn blank_name_fails() {
        let mut draft = valid_for(METRIC_CPU_USAGE);
        draft.name = "   ".into();
        assert_eq!(validate(&draft).first_failure(), Some(ValidationFailure::NameRequired));
    }

    #[test]
    fn negative_timing_fails() {
        let mut draft = valid_for(METRIC_CPU_USAGE);
        draft.cooldown_minutes = "-1".into();
        draft.duration_seconds = "-30".into();
        let report = validate(&draft);
        assert!(report.has(ValidationFailure::NegativeCooldown));
        assert!(report.has(ValidationFailure::NegativeDuration));
    }

    #[test]
    fn overflowing_negative_timing_fails() {
        let mut draft = valid_for(METRIC_CPU_USAGE);
        draft.cooldown_minutes = "-99999999999999999999".into();
        draft.duration_seconds = " -99999999999999999999 ".into();
        let report = validate(&draft);
        assert!(report.has(ValidationFailure::NegativeCooldown));
        assert!(report.has(ValidationFailure::NegativeDuration));

        draft.cooldown_minutes = "-".into();
        draft.duration_seconds = "-0".into();
        assert!(validate(&draft).is_valid);
    }

    #[test]
    fn pushed_failure_blocks_report() {
        let mut report = validate(&valid_for(METRIC_IF_STATUS));
        assert!(report.is_valid);
        report.push_failure(ValidationFailure::InterfaceNotOnDevice);
        report.push_failure(ValidationFailure::InterfaceNotOnDevice);
        assert!(!report.is_valid);
        assert_eq!(report.failures, vec![ValidationFailure::InterfaceNotOnDevice]);
    }

    #[test]
    fn unparsable_timing_is_left_to_builder_defaults() {
        let mut draft = valid_for(METRIC_CPU_USAGE);
        draft.cooldown_minutes = String::new();
        draft.duration_seconds = "soon".into();
        assert!(validate(&draft).is_valid);
    }

    #[test]
    fn all_failures_are_reported_together() {
        let mut draft = RuleDraft::for_metric(METRIC_IF_STATUS);
        draft.binary_threshold.clear();
        draft.cooldown_minutes = "-5".into();

        let report = validate(&draft);
        assert_eq!(
            report.failures,
            vec![
                ValidationFailure::NameRequired,
                ValidationFailure::DeviceRequired,
                ValidationFailure::InterfaceRequired,
                ValidationFailure::BinaryThresholdRequired,
                ValidationFailure::NegativeCooldown,
            ]
        );
        let err = report.into_result().unwrap_err();
        assert!(err.to_string().contains("Rule name is required"));
    }

    #[test]
    fn malformed_values_fail() {
        let mut draft = valid_for(METRIC_IF_STATUS);
        draft.device_id = "core-sw-1".into();
        draft.interface_id = "eth0".into();
        let report = validate(&draft);
        assert!(report.has(ValidationFailure::DeviceIdMalformed));
        assert!(report.has(ValidationFailure::InterfaceIdMalformed));

        let mut cpu = valid_for(METRIC_CPU_USAGE);
        cpu.critical_threshold = "ninety".into();
        assert!(validate(&cpu).has(ValidationFailure::CriticalThresholdMalformed));
    }

    #[test]
    fn unknown_metric_fails() {
        let report = validate(&named("fan_speed"));
        assert_eq!(report.failures, vec![ValidationFailure::UnknownMetric]);
    }

    #[test]
    fn notification_format_only_warns() {
        let mut draft = valid_for(METRIC_CPU_USAGE);
        draft.notification_email = "noc-at-example".into();
        draft.notification_webhook = "hooks/alerts".into();

        let report = validate(&draft);
        assert!(report.is_valid);
        assert_eq!(
            report.warnings,
            vec![
                ValidationWarning::NotificationEmailFormat,
                ValidationWarning::NotificationWebhookFormat,
            ]
        );
    }

    #[test]
    fn well_formed_notifications_do_not_warn() {
        let mut draft = valid_for(METRIC_CPU_USAGE);
        draft.notification_email = "noc@example.com".into();
        draft.notification_webhook = "https://hooks.example.com/alerts".into();
        assert!(validate(&draft).warnings.is_empty());
    }

    #[test]
    fn failure_fields_point_at_draft_fields() {
        assert_eq!(ValidationFailure::InterfaceRequired.field(), "interface_id");
        assert_eq!(ValidationFailure::NegativeDuration.field(), "duration_seconds");
    }
}
