//! Rule editor session.
//!
//! Owns one [`RuleDraft`] and drives it through the resolver, validator and
//! payload builder from `netmon_core`. Talks to the inventory service for
//! interface lists and to the rule store on submit. A failed submit leaves
//! the draft exactly as it was so the operator can retry.

use netmon_core::error::CoreError;
use netmon_core::rule_draft::RuleDraft;
use netmon_core::rule_payload::{self, RulePayload};
use netmon_core::rule_resolver::{DraftEdit, RuleResolver};
use netmon_core::rule_validation::{self, ValidationFailure, ValidationReport};
use netmon_core::stored_rule::StoredRule;
use netmon_core::types::DbId;

use crate::error::ClientError;
use crate::interface_cache::{InterfaceCache, InterfaceList};
use crate::inventory::{Interface, InventoryService};
use crate::rule_store::RuleStore;

/// An open rule editor: a new rule, or an existing one being changed.
#[derive(Debug, Default)]
pub struct RuleEditor {
    draft: RuleDraft,
    rule_id: Option<DbId>,
    resolver: RuleResolver,
    interfaces: InterfaceCache,
}

impl RuleEditor {
    /// Editor for a new rule with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor for a new rule starting from an existing draft.
    pub fn with_draft(draft: RuleDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    /// Editor for an existing rule, projected into draft shape.
    pub fn for_rule(rule: &StoredRule) -> Self {
        Self {
            draft: RuleDraft::from_stored(rule),
            rule_id: Some(rule.id),
            ..Self::default()
        }
    }

    /// Editor for an existing rule starting from a draft held elsewhere,
    /// e.g. a file. Submitting updates `rule_id`.
    pub fn for_existing(draft: RuleDraft, rule_id: DbId) -> Self {
        Self {
            draft,
            rule_id: Some(rule_id),
            ..Self::default()
        }
    }

    /// Fetch a stored rule and open it for editing.
    pub async fn open(store: &dyn RuleStore, rule_id: DbId) -> Result<Self, ClientError> {
        let rule = store.get_rule(rule_id).await?;
        tracing::debug!(rule_id, metric = %rule.metric, "Opened rule for editing");
        Ok(Self::for_rule(&rule))
    }

    pub fn with_resolver(mut self, resolver: RuleResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn draft(&self) -> &RuleDraft {
        &self.draft
    }

    /// Id of the rule being edited; `None` until a new rule is saved.
    pub fn rule_id(&self) -> Option<DbId> {
        self.rule_id
    }

    /// Apply one field edit, resolving dependent fields.
    pub fn apply(&mut self, edit: DraftEdit) {
        let next = self.resolver.apply(&self.draft, edit);
        if next.interface_id != self.draft.interface_id && next.interface_id.is_empty() {
            tracing::debug!(
                metric = %next.metric_id,
                device_id = %next.device_id,
                retention = ?self.resolver.retention(),
                "Interface selection cleared"
            );
        }
        self.draft = next;
    }

    /// Current validation state. Cheap enough to call on every change.
    ///
    /// Adds [`ValidationFailure::InterfaceNotOnDevice`] when the selected
    /// device's interface list is loaded and lacks the chosen interface.
    pub fn validation(&self) -> ValidationReport {
        let mut report = rule_validation::validate(&self.draft);
        if self.interface_outside_device() {
            report.push_failure(ValidationFailure::InterfaceNotOnDevice);
        }
        report
    }

    pub fn can_submit(&self) -> bool {
        self.validation().is_valid
    }

    /// Payload the draft would submit right now, valid or not.
    pub fn preview(&self) -> Result<RulePayload, CoreError> {
        rule_payload::build(&self.draft)
    }

    // ---- interfaces ----

    /// Device whose interfaces the picker needs, if the current metric is
    /// interface-scoped and a device is chosen.
    pub fn interface_fetch_key(&self) -> Option<DbId> {
        self.draft.interface_fetch_key()
    }

    /// Interface list for the currently selected device only.
    pub fn available_interfaces(&self) -> Option<&InterfaceList> {
        self.interfaces.get(self.interface_fetch_key()?)
    }

    /// Start a fetch for the current device. Returns the key the result must
    /// be completed under, or `None` when nothing needs fetching.
    pub fn begin_interface_fetch(&mut self) -> Option<DbId> {
        let device_id = self.interface_fetch_key()?;
        if !self.interfaces.needs_fetch(device_id) {
            return None;
        }
        self.interfaces.begin(device_id);
        Some(device_id)
    }

    /// Record a fetch result under the device it was issued for, even if the
    /// selection has moved on since.
    pub fn finish_interface_fetch(
        &mut self,
        device_id: DbId,
        result: Result<Vec<Interface>, ClientError>,
    ) {
        match &result {
            Ok(list) => tracing::debug!(device_id, count = list.len(), "Interfaces loaded"),
            Err(e) => tracing::warn!(device_id, error = %e, "Failed to load interfaces"),
        }
        if self.interface_fetch_key() != Some(device_id) {
            tracing::debug!(device_id, "Interface response for a device no longer selected");
        }
        self.interfaces.complete(device_id, result);
    }

    /// Fetch the current device's interfaces if needed and return the list
    /// for the current selection.
    pub async fn refresh_interfaces(
        &mut self,
        inventory: &dyn InventoryService,
    ) -> Option<&InterfaceList> {
        if let Some(device_id) = self.begin_interface_fetch() {
            let result = inventory.list_interfaces_for_device(device_id).await;
            self.finish_interface_fetch(device_id, result);
        }
        self.available_interfaces()
    }

    /// Forget the current device's list so the next refresh refetches it.
    pub fn reload_interfaces(&mut self) {
        if let Some(device_id) = self.interface_fetch_key() {
            self.interfaces.invalidate(device_id);
        }
    }

    /// Whether the chosen interface is known not to belong to the chosen
    /// device. Unknown while the device's list is not loaded.
    fn interface_outside_device(&self) -> bool {
        let (Some(device_id), Some(interface_id)) = (
            self.interface_fetch_key(),
            self.draft.interface_id.trim().parse::<DbId>().ok(),
        ) else {
            return false;
        };
        self.interfaces.contains_interface(device_id, interface_id) == Some(false)
    }

    // ---- submit ----

    /// Validate, build and send the rule. Creates a new rule or updates the
    /// one being edited.
    ///
    /// Nothing is sent if validation fails. On success the editor switches
    /// to editing the stored rule; on any failure the draft is unchanged.
    pub async fn submit(&mut self, store: &dyn RuleStore) -> Result<StoredRule, ClientError> {
        let report = self.validation();
        if !report.is_valid {
            tracing::debug!(failures = ?report.failures, "Submit blocked by validation");
            return Err(ClientError::Invalid(report));
        }

        let payload = rule_payload::build(&self.draft)?;
        let result = match self.rule_id {
            Some(rule_id) => store.update_rule(rule_id, &payload).await,
            None => store.create_rule(&payload).await,
        };

        match result {
            Ok(stored) => {
                tracing::info!(
                    rule_id = stored.id,
                    metric = %stored.metric,
                    updated = self.rule_id.is_some(),
                    "Alert rule saved"
                );
                self.rule_id = Some(stored.id);
                Ok(stored)
            }
            Err(e) => {
                tracing::warn!(rule_id = ?self.rule_id, error = %e, "Failed to save alert rule");
                Err(e)
            }
        }
    }
}
