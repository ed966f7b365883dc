//! Catalog of metrics an alert rule can watch.
//!
//! Every metric is intrinsically either *binary* (up/down, one threshold and
//! an explicit severity) or *continuous* (independent warning / critical
//! thresholds), and is evaluated either per device or per interface. The
//! catalog is a static table consulted by lookup only; grouping is
//! presentation metadata layered on the same definitions.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Metric id constants
// ---------------------------------------------------------------------------

/// Device reachability (1 = up, 0 = down).
pub const METRIC_DEVICE_STATUS: &str = "device_status";
/// CPU utilization percentage.
pub const METRIC_CPU_USAGE: &str = "cpu_usage";
/// Memory utilization percentage.
pub const METRIC_MEMORY_USAGE: &str = "memory_usage";
/// ICMP round-trip time in milliseconds.
pub const METRIC_PING_LATENCY: &str = "ping_latency";
/// ICMP packet loss percentage.
pub const METRIC_PACKET_LOSS: &str = "packet_loss";
/// Chassis temperature in degrees Celsius.
pub const METRIC_TEMPERATURE: &str = "temperature";

/// Interface operational status (1 = up, 0 = down).
pub const METRIC_IF_STATUS: &str = "if_status";
/// Inbound bandwidth utilization percentage.
pub const METRIC_IF_IN_UTILIZATION: &str = "if_in_utilization";
/// Outbound bandwidth utilization percentage.
pub const METRIC_IF_OUT_UTILIZATION: &str = "if_out_utilization";
/// Inbound error counter rate.
pub const METRIC_IF_IN_ERRORS: &str = "if_in_errors";
/// Outbound error counter rate.
pub const METRIC_IF_OUT_ERRORS: &str = "if_out_errors";
/// Discarded packet rate.
pub const METRIC_IF_DISCARDS: &str = "if_discards";

/// PDU reachability (1 = up, 0 = down).
pub const METRIC_PDU_STATUS: &str = "pdu_status";
/// Total PDU power draw in watts.
pub const METRIC_PDU_POWER_DRAW: &str = "pdu_power_draw";
/// PDU load in amps.
pub const METRIC_PDU_LOAD: &str = "pdu_load";

/// Metric preselected in a fresh draft.
pub const DEFAULT_METRIC: &str = METRIC_CPU_USAGE;

// ---------------------------------------------------------------------------
// Definition types
// ---------------------------------------------------------------------------

/// Whether a metric is evaluated for a whole device or one of its interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricScope {
    Device,
    Interface,
}

/// Threshold shape a metric takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdShape {
    /// One crossing threshold plus an explicit severity.
    Binary,
    /// Independent warning and critical thresholds.
    Continuous,
}

/// Display grouping for metric pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricGroup {
    Device,
    Interface,
    PduPower,
}

impl MetricGroup {
    /// All groups in display order.
    pub const ALL: [MetricGroup; 3] = [Self::Device, Self::Interface, Self::PduPower];

    /// Human-readable group heading.
    pub fn label(self) -> &'static str {
        match self {
            Self::Device => "Device",
            Self::Interface => "Interface",
            Self::PduPower => "PDU / Power",
        }
    }
}

/// An immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricDefinition {
    pub id: &'static str,
    pub display_label: &'static str,
    pub group: MetricGroup,
    pub shape: ThresholdShape,
    pub scope: MetricScope,
}

const fn metric(
    id: &'static str,
    display_label: &'static str,
    group: MetricGroup,
    shape: ThresholdShape,
    scope: MetricScope,
) -> MetricDefinition {
    MetricDefinition {
        id,
        display_label,
        group,
        shape,
        scope,
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

use MetricGroup::{Device as DeviceGroup, Interface as InterfaceGroup, PduPower};
use MetricScope::{Device, Interface};
use ThresholdShape::{Binary, Continuous};

/// Every known metric, in display order.
pub const METRICS: &[MetricDefinition] = &[
    metric(METRIC_DEVICE_STATUS, "Device Status (Up/Down)", DeviceGroup, Binary, Device),
    metric(METRIC_CPU_USAGE, "CPU Usage (%)", DeviceGroup, Continuous, Device),
    metric(METRIC_MEMORY_USAGE, "Memory Usage (%)", DeviceGroup, Continuous, Device),
    metric(METRIC_PING_LATENCY, "Ping Latency (ms)", DeviceGroup, Continuous, Device),
    metric(METRIC_PACKET_LOSS, "Packet Loss (%)", DeviceGroup, Continuous, Device),
    metric(METRIC_TEMPERATURE, "Temperature (°C)", DeviceGroup, Continuous, Device),
    metric(METRIC_IF_STATUS, "Interface Status (Up/Down)", InterfaceGroup, Binary, Interface),
    metric(
        METRIC_IF_IN_UTILIZATION,
        "Inbound Utilization (%)",
        InterfaceGroup,
        Continuous,
        Interface,
    ),
    metric(
        METRIC_IF_OUT_UTILIZATION,
        "Outbound Utilization (%)",
        InterfaceGroup,
        Continuous,
        Interface,
    ),
    metric(METRIC_IF_IN_ERRORS, "Inbound Errors (/s)", InterfaceGroup, Continuous, Interface),
    metric(METRIC_IF_OUT_ERRORS, "Outbound Errors (/s)", InterfaceGroup, Continuous, Interface),
    metric(METRIC_IF_DISCARDS, "Discards (/s)", InterfaceGroup, Continuous, Interface),
    metric(METRIC_PDU_STATUS, "PDU Status (Up/Down)", PduPower, Binary, Device),
    metric(METRIC_PDU_POWER_DRAW, "Power Draw (W)", PduPower, Continuous, Device),
    metric(METRIC_PDU_LOAD, "Load (A)", PduPower, Continuous, Device),
];

/// Look up a metric definition by id.
pub fn lookup(metric_id: &str) -> Option<&'static MetricDefinition> {
    METRICS.iter().find(|m| m.id == metric_id)
}

/// Look up a metric definition, failing with [`CoreError::UnknownMetric`].
pub fn require(metric_id: &str) -> Result<&'static MetricDefinition, CoreError> {
    lookup(metric_id).ok_or_else(|| CoreError::UnknownMetric(metric_id.to_string()))
}

/// All metrics paired with their display group, in display order.
pub fn all_metrics() -> impl Iterator<Item = (MetricGroup, &'static MetricDefinition)> {
    METRICS.iter().map(|m| (m.group, m))
}

/// Metrics bucketed by group, groups in display order. Empty groups are
/// skipped.
pub fn grouped() -> Vec<(MetricGroup, Vec<&'static MetricDefinition>)> {
    MetricGroup::ALL
        .iter()
        .map(|&group| {
            let members: Vec<_> = METRICS.iter().filter(|m| m.group == group).collect();
            (group, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
