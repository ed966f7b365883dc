//! Alert rule draft: the editable form state of a rule being authored.
//!
//! Form fields are kept as the text the operator typed, exactly as an HTML
//! form holds them, so switching metrics back and forth never loses input.
//! Which of those fields actually matter is derived from the selected
//! metric (see [`crate::threshold`]).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metric_catalog::{self, MetricDefinition, MetricScope, ThresholdShape, DEFAULT_METRIC};
use crate::threshold::{self, Condition, Severity, ThresholdSpec, DEFAULT_BINARY_THRESHOLD};
use crate::types::DbId;

/// Minimum minutes between repeated firings when none is given.
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 15;

/// Seconds a condition must hold before firing when none is given.
pub const DEFAULT_DURATION_SECONDS: i64 = 0;

/// Mutable draft of an alert rule. One per open editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleDraft {
    pub name: String,
    pub description: String,
    /// Empty means "all devices" for device-scoped metrics.
    pub device_id: String,
    pub interface_id: String,
    pub metric_id: String,
    pub condition: Condition,
    pub binary_threshold: String,
    pub severity: Severity,
    pub warning_threshold: String,
    pub critical_threshold: String,
    pub cooldown_minutes: String,
    pub duration_seconds: String,
    pub notification_email: String,
    pub notification_webhook: String,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleDraft {
    /// A fresh draft for the default metric.
    pub fn new() -> Self {
        Self::for_metric(DEFAULT_METRIC)
    }

    /// A fresh draft with the threshold defaults of `metric_id` preselected.
    ///
    /// An unknown id still yields a draft; validation reports it.
    pub fn for_metric(metric_id: &str) -> Self {
        let shape = metric_catalog::lookup(metric_id)
            .map_or(ThresholdShape::Continuous, threshold::threshold_shape);
        let binary_threshold = match shape {
            ThresholdShape::Binary => DEFAULT_BINARY_THRESHOLD.to_string(),
            ThresholdShape::Continuous => String::new(),
        };

        Self {
            name: String::new(),
            description: String::new(),
            device_id: String::new(),
            interface_id: String::new(),
            metric_id: metric_id.to_string(),
            condition: threshold::default_condition(shape),
            binary_threshold,
            severity: threshold::default_severity(shape),
            warning_threshold: String::new(),
            critical_threshold: String::new(),
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES.to_string(),
            duration_seconds: DEFAULT_DURATION_SECONDS.to_string(),
            notification_email: String::new(),
            notification_webhook: String::new(),
        }
    }

    /// Catalog entry for the selected metric.
    pub fn definition(&self) -> Option<&'static MetricDefinition> {
        metric_catalog::lookup(&self.metric_id)
    }

    pub fn scope(&self) -> Option<MetricScope> {
        self.definition().map(|d| d.scope)
    }

    /// Threshold mode, derived from the selected metric's shape.
    pub fn threshold_mode(&self) -> Option<ThresholdShape> {
        self.definition().map(threshold::threshold_shape)
    }

    /// A device-scoped rule with no device targets every device.
    pub fn is_global(&self) -> bool {
        self.scope() == Some(MetricScope::Device) && is_blank(&self.device_id)
    }

    /// Device id the interface list should be fetched for, if any.
    ///
    /// Only interface-scoped drafts with a device chosen need interfaces.
    pub fn interface_fetch_key(&self) -> Option<DbId> {
        match self.scope() {
            Some(MetricScope::Interface) => parse_id(&self.device_id),
            _ => None,
        }
    }

    /// Resolve the thresholds that matter for the selected metric.
    ///
    /// A missing or unparsable binary threshold resolves to `0`; continuous
    /// thresholds that are blank or unparsable resolve to `None`.
    pub fn threshold_spec(&self) -> Result<ThresholdSpec, CoreError> {
        let def = metric_catalog::require(&self.metric_id)?;
        Ok(self.threshold_spec_for(def))
    }

    pub(crate) fn threshold_spec_for(&self, def: &MetricDefinition) -> ThresholdSpec {
        match threshold::threshold_shape(def) {
            ThresholdShape::Binary => ThresholdSpec::Binary {
                threshold: parse_number(&self.binary_threshold).unwrap_or(0.0),
                severity: self.severity,
            },
            ThresholdShape::Continuous => ThresholdSpec::Continuous {
                warning: parse_number(&self.warning_threshold),
                critical: parse_number(&self.critical_threshold),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Form text helpers
// ---------------------------------------------------------------------------

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Parse a finite number, treating blank text as absent.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn parse_id(s: &str) -> Option<DbId> {
    s.trim().parse().ok()
}

pub(crate) fn parse_count(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Render a number the way an operator would type it (`80`, not `80.0`).
pub(crate) fn number_text(v: f64) -> String {
    v.to_string()
}

pub(crate) fn optional_text(v: Option<&str>) -> String {
    v.unwrap_or_default().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
