//! Contacts Module
//!
//! Account integrity rules, the account lifecycle engine (soft delete,
//! restore, purge), the expiry sweeper and a REST transport over them.
//!
//! ## Public API
//!
//! The public API is defined in the `contacts-sdk` crate and re-exported here:
//! - `ContactsApi` - trait for in-process consumers
//! - `Account`, `NewAccount`, `AccountPatch`, `Company`, ... - data models
//! - `ContactsError` - error types
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use contacts_sdk::{
    Account, AccountPatch, Company, CompanyPatch, ContactsApi, ContactsError, NewAccount,
    NewCompany,
};

// === ERROR CATALOG ===
pub mod errors;

// === MODULE DEFINITION ===
pub mod module;
pub use module::Contacts;

// === LOCAL CLIENT ===
pub mod local_client;

pub use config::ContactsConfig;

// === INTERNAL MODULES ===
// WARNING: These modules are internal implementation details!
// They are exposed only for comprehensive testing and should NOT be used by external consumers.
// Only use the SDK types for stable public APIs.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

#[cfg(test)]
mod test_support;
