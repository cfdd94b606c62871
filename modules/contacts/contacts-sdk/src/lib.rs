//! Contacts SDK
//!
//! This crate provides the public API for the `contacts` module:
//! - `ContactsApi` trait
//! - Model types for accounts, companies and pages
//! - Error type (`ContactsError`)
//!
//! ## Usage
//!
//! ```ignore
//! use contacts_sdk::{ContactsApi, NewAccount};
//!
//! let account = client.create_account(new_account).await?;
//! client.delete_account(account.id, false).await?;
//! client.restore_account(account.id).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod errors;
pub mod models;

pub use api::ContactsApi;
pub use errors::ContactsError;
pub use models::{
    Account, AccountId, AccountPatch, AccountState, Company, CompanyId, CompanyPatch,
    LifecycleFilter, NewAccount, NewCompany, Page, PageRequest,
};
