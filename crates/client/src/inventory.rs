//! Device / interface inventory, consumed read-only.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use netmon_core::types::DbId;

use crate::error::ClientError;

/// A monitored device as listed by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DbId,
    pub hostname: String,
    pub ip_address: String,
}

/// A network interface belonging to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub id: DbId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Interface {
    /// Picker label, e.g. `Gi0/1 (Core uplink)`.
    pub fn label(&self) -> String {
        match self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(description) => format!("{} ({description})", self.name),
            None => self.name.clone(),
        }
    }
}

/// Source of the devices and interfaces a rule may target.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn list_devices(&self) -> Result<Vec<Device>, ClientError>;

    async fn list_interfaces_for_device(
        &self,
        device_id: DbId,
    ) -> Result<Vec<Interface>, ClientError>;
}
