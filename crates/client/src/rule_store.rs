//! Rule storage API contract.

use async_trait::async_trait;

use netmon_core::rule_payload::RulePayload;
use netmon_core::stored_rule::StoredRule;
use netmon_core::types::DbId;

use crate::error::ClientError;

/// Persistence for alert rules. Server-side validation errors come back as
/// [`ClientError::Api`] with the body untouched.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Fetch an existing rule for editing.
    async fn get_rule(&self, rule_id: DbId) -> Result<StoredRule, ClientError>;

    async fn create_rule(&self, payload: &RulePayload) -> Result<StoredRule, ClientError>;

    /// Replace the mode-relevant fields of an existing rule. The full
    /// payload is always sent so a previous mode's values are overwritten.
    async fn update_rule(
        &self,
        rule_id: DbId,
        payload: &RulePayload,
    ) -> Result<StoredRule, ClientError>;
}
