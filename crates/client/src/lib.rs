//! `netmon-client` library crate.
//!
//! The rule editor session plus the remote collaborators it needs: the
//! inventory service (devices, interfaces) and the rule storage API. The
//! binary entrypoint lives in `main.rs`.

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod interface_cache;
pub mod inventory;
pub mod rule_store;
