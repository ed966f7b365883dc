//! Threshold model: comparison operators, severities, and the per-shape
//! threshold variants a rule can carry.
//!
//! Pure logic. The shape of a rule's thresholds is always the shape of its
//! metric; nothing here stores state beyond the catalog lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metric_catalog::{MetricDefinition, ThresholdShape};

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// Comparison applied between the observed value and the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    #[default]
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Ne,
}

impl Condition {
    /// All conditions in picker order.
    pub const ALL: [Condition; 6] = [
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::Eq,
        Self::Ne,
    ];

    /// Wire token sent to the rule storage API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Eq => "eq",
            Self::Ne => "ne",
        }
    }

    /// Mathematical symbol shown to operators.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Condition {
    type Err = CoreError;

    /// Accepts either the wire token (`gt`) or the symbol (`>`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s || c.symbol() == s)
            .ok_or_else(|| CoreError::InvalidValue {
                field: "condition",
                value: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity attached to a fired alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            _ => Err(CoreError::InvalidValue {
                field: "severity",
                value: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults per shape
// ---------------------------------------------------------------------------

/// Severity sent for continuous rules. The evaluation engine derives the
/// real severity from whichever threshold is crossed.
pub const CONTINUOUS_SEVERITY: Severity = Severity::Warning;

/// Threshold text preselected for binary metrics (`status < 1` means down).
pub const DEFAULT_BINARY_THRESHOLD: &str = "1";

/// Severity preselected for binary metrics.
pub const DEFAULT_BINARY_SEVERITY: Severity = Severity::Critical;

/// Threshold shape a metric takes. Always the metric's declared shape.
pub fn threshold_shape(def: &MetricDefinition) -> ThresholdShape {
    def.shape
}

/// Comparison preselected for a shape.
pub fn default_condition(shape: ThresholdShape) -> Condition {
    match shape {
        ThresholdShape::Binary => Condition::Lt,
        ThresholdShape::Continuous => Condition::Gt,
    }
}

/// Severity preselected (binary) or fixed (continuous) for a shape.
pub fn default_severity(shape: ThresholdShape) -> Severity {
    match shape {
        ThresholdShape::Binary => DEFAULT_BINARY_SEVERITY,
        ThresholdShape::Continuous => CONTINUOUS_SEVERITY,
    }
}

/// Which draft threshold fields are meaningful for a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActiveFields {
    pub binary_threshold: bool,
    pub severity: bool,
    pub warning_threshold: bool,
    pub critical_threshold: bool,
}

pub fn active_fields(shape: ThresholdShape) -> ActiveFields {
    let binary = shape == ThresholdShape::Binary;
    ActiveFields {
        binary_threshold: binary,
        severity: binary,
        warning_threshold: !binary,
        critical_threshold: !binary,
    }
}

// ---------------------------------------------------------------------------
// Resolved thresholds
// ---------------------------------------------------------------------------

/// Thresholds of a rule, resolved for the shape of its metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdSpec {
    Binary {
        threshold: f64,
        severity: Severity,
    },
    Continuous {
        warning: Option<f64>,
        critical: Option<f64>,
    },
}

impl ThresholdSpec {
    pub fn shape(&self) -> ThresholdShape {
        match self {
            Self::Binary { .. } => ThresholdShape::Binary,
            Self::Continuous { .. } => ThresholdShape::Continuous,
        }
    }

    /// Severity the rule is stored with.
    pub fn severity(&self) -> Severity {
        match self {
            Self::Binary { severity, .. } => *severity,
            Self::Continuous { .. } => CONTINUOUS_SEVERITY,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
