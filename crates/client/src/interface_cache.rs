//! Interface lists keyed by device id.
//!
//! Each fetch result is stored under the device it was requested for. The
//! editor only ever reads the entry for the currently selected device, so
//! a late response for a previously selected device is kept but never
//! shown.

use std::collections::HashMap;

use netmon_core::types::DbId;

use crate::error::ClientError;
use crate::inventory::Interface;

/// Load state of one device's interface list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceList {
    Loading,
    Loaded(Vec<Interface>),
    /// The fetch failed; the message is shown inline in the picker.
    Failed(String),
}

impl InterfaceList {
    pub fn interfaces(&self) -> &[Interface] {
        match self {
            Self::Loaded(list) => list,
            Self::Loading | Self::Failed(_) => &[],
        }
    }
}

#[derive(Debug, Default)]
pub struct InterfaceCache {
    entries: HashMap<DbId, InterfaceList>,
}

impl InterfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, device_id: DbId) -> Option<&InterfaceList> {
        self.entries.get(&device_id)
    }

    /// Whether a fetch should be started for `device_id`. Failed entries are
    /// retried; loading and loaded ones are not.
    pub fn needs_fetch(&self, device_id: DbId) -> bool {
        matches!(self.entries.get(&device_id), None | Some(InterfaceList::Failed(_)))
    }

    /// Mark a fetch for `device_id` as in flight.
    pub fn begin(&mut self, device_id: DbId) {
        self.entries.insert(device_id, InterfaceList::Loading);
    }

    /// Store the outcome of a fetch under the device it was issued for.
    pub fn complete(&mut self, device_id: DbId, result: Result<Vec<Interface>, ClientError>) {
        let entry = match result {
            Ok(list) => InterfaceList::Loaded(list),
            Err(e) => InterfaceList::Failed(e.to_string()),
        };
        self.entries.insert(device_id, entry);
    }

    pub fn invalidate(&mut self, device_id: DbId) {
        self.entries.remove(&device_id);
    }

    /// `Some(true/false)` once the device's list is loaded, `None` before.
    pub fn contains_interface(&self, device_id: DbId, interface_id: DbId) -> Option<bool> {
        match self.entries.get(&device_id)? {
            InterfaceList::Loaded(list) => Some(list.iter().any(|i| i.id == interface_id)),
            InterfaceList::Loading | InterfaceList::Failed(_) => None,
        }
    }
}
