//! Alert-rule domain model for the netmon dashboard.
//!
//! Turns an operator's rule editor state into a rule payload for the
//! external alert-evaluation engine. Everything in this crate is pure: no
//! network, no storage, no logging. Async collaborators live in
//! `netmon-client`.
//!
//! Flow: [`rule_resolver`] applies an edit to a [`rule_draft::RuleDraft`],
//! [`rule_validation`] gates submission, and [`rule_payload`] produces the
//! wire body.

pub mod error;
pub mod metric_catalog;
pub mod rule_draft;
pub mod rule_payload;
pub mod rule_resolver;
pub mod rule_validation;
pub mod stored_rule;
pub mod threshold;
pub mod types;
