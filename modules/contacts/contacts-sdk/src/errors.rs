//! Public error types for the `contacts` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

use crate::models::{AccountId, CompanyId};

/// Errors that can be returned by the `ContactsApi`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactsError {
    /// `first_name`, `last_name` or `email` was empty after sanitization.
    #[error("Required fields are empty: {fields}")]
    EmptyRequiredFields { fields: String },

    #[error("Invalid email format: '{email}'")]
    InvalidEmailFormat { email: String },

    #[error("Account with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    /// Malformed phone, phone owned by another account, or the same phone in two slots.
    #[error("Invalid phone: {reason}")]
    InvalidPhoneFormat { reason: String },

    #[error("Account not found: {id}")]
    AccountNotFound { id: AccountId },

    /// Restore of an active account or permanent delete of a live one.
    #[error("Invalid lifecycle transition for account {id}: {reason}")]
    InvalidLifecycleTransition { id: AccountId, reason: String },

    #[error("Company not found: {id}")]
    CompanyNotFound { id: CompanyId },

    #[error("Company with name '{name}' already exists")]
    CompanyNameExists { name: String },

    #[error("Company {id} is referenced by {accounts} account(s)")]
    CompanyInUse { id: CompanyId, accounts: u64 },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Timeout, connectivity loss or an unexpected storage error.
    #[error("Storage failure")]
    StorageFailure,
}

impl ContactsError {
    #[must_use]
    pub fn account_not_found(id: AccountId) -> Self {
        Self::AccountNotFound { id }
    }

    pub fn invalid_phone(reason: impl Into<String>) -> Self {
        Self::InvalidPhoneFormat {
            reason: reason.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// True for rejections caused by the submitted payload rather than the store.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyRequiredFields { .. }
                | Self::InvalidEmailFormat { .. }
                | Self::EmailAlreadyExists { .. }
                | Self::InvalidPhoneFormat { .. }
                | Self::CompanyNameExists { .. }
                | Self::InvalidRequest { .. }
        )
    }
}
