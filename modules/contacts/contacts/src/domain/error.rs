use std::time::Duration;

use contacts_sdk::{AccountId, AccountState, CompanyId, ContactsError};
use thiserror::Error;

/// Which store constraint a late uniqueness violation hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueTarget {
    Email,
    Phone,
    CompanyName,
    Unknown,
}

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Required fields are empty: {}", fields.join(", "))]
    EmptyRequiredFields { fields: Vec<&'static str> },

    #[error("Invalid email format: '{email}'")]
    InvalidEmail { email: String },

    #[error("Account with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    #[error("Invalid phone in slot {slot}: '{value}'")]
    InvalidPhone { slot: u8, value: String },

    #[error("Phone '{phone}' belongs to another account")]
    PhoneAlreadyExists { phone: String },

    /// The store rejected one of these phones without saying which.
    #[error("One of phones {} belongs to another account", candidates.join(", "))]
    PhoneConflict { candidates: Vec<String> },

    #[error("Phone '{phone}' is used in more than one slot")]
    DuplicatePhone { phone: String },

    #[error("Account not found: {id}")]
    AccountNotFound { id: AccountId },

    #[error("Cannot {action} account {id} while it is {state}")]
    InvalidLifecycleTransition {
        id: AccountId,
        state: AccountState,
        action: &'static str,
    },

    #[error("Company not found: {id}")]
    CompanyNotFound { id: CompanyId },

    #[error("Company with name '{name}' already exists")]
    CompanyNameExists { name: String },

    #[error("Company {id} is referenced by {accounts} account(s)")]
    CompanyInUse { id: CompanyId, accounts: u64 },

    #[error("Invalid pagination: page={page}, limit={limit}")]
    InvalidPagination { page: u64, limit: u64 },

    /// A unique constraint rejected a write that validation had admitted.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation {
        target: UniqueTarget,
        constraint: String,
    },

    #[error("Store operation '{operation}' timed out after {}", humantime::format_duration(*timeout))]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn account_not_found(id: AccountId) -> Self {
        Self::AccountNotFound { id }
    }

    #[must_use]
    pub fn company_not_found(id: CompanyId) -> Self {
        Self::CompanyNotFound { id }
    }

    #[must_use]
    pub fn invalid_transition(id: AccountId, state: AccountState, action: &'static str) -> Self {
        Self::InvalidLifecycleTransition { id, state, action }
    }

    /// True for storage-side failures (as opposed to rejected input or state).
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Database { .. } | Self::Timeout { .. } | Self::UniqueViolation { .. }
        )
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for ContactsError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::EmptyRequiredFields { fields } => ContactsError::EmptyRequiredFields {
                fields: fields.join(", "),
            },
            DomainError::InvalidEmail { email } => ContactsError::InvalidEmailFormat { email },
            DomainError::EmailAlreadyExists { email } => {
                ContactsError::EmailAlreadyExists { email }
            }
            e @ (DomainError::InvalidPhone { .. }
            | DomainError::PhoneAlreadyExists { .. }
            | DomainError::PhoneConflict { .. }
            | DomainError::DuplicatePhone { .. }) => ContactsError::invalid_phone(e.to_string()),
            DomainError::AccountNotFound { id } => ContactsError::account_not_found(id),
            e @ DomainError::InvalidLifecycleTransition { id, .. } => {
                ContactsError::InvalidLifecycleTransition {
                    id,
                    reason: e.to_string(),
                }
            }
            DomainError::CompanyNotFound { id } => ContactsError::CompanyNotFound { id },
            DomainError::CompanyNameExists { name } => ContactsError::CompanyNameExists { name },
            DomainError::CompanyInUse { id, accounts } => {
                ContactsError::CompanyInUse { id, accounts }
            }
            e @ DomainError::InvalidPagination { .. } => {
                ContactsError::invalid_request(e.to_string())
            }
            DomainError::UniqueViolation { .. }
            | DomainError::Timeout { .. }
            | DomainError::Database { .. } => ContactsError::StorageFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_variants_share_public_kind() {
        let errors = [
            DomainError::InvalidPhone {
                slot: 2,
                value: "123".to_owned(),
            },
            DomainError::PhoneAlreadyExists {
                phone: "+79991234567".to_owned(),
            },
            DomainError::DuplicatePhone {
                phone: "+79991234567".to_owned(),
            },
            DomainError::PhoneConflict {
                candidates: vec!["+79991234567".to_owned(), "+79997654321".to_owned()],
            },
        ];
        for e in errors {
            let msg = e.to_string();
            match ContactsError::from(e) {
                ContactsError::InvalidPhoneFormat { reason } => assert_eq!(reason, msg),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn transition_error_names_state_and_action() {
        let e = DomainError::invalid_transition(7, AccountState::Active, "restore");
        assert_eq!(e.to_string(), "Cannot restore account 7 while it is active");
        assert!(matches!(
            ContactsError::from(e),
            ContactsError::InvalidLifecycleTransition { id: 7, .. }
        ));
    }

    #[test]
    fn storage_errors_are_opaque() {
        let e = DomainError::database("disk I/O error");
        assert!(e.is_storage());
        assert_eq!(ContactsError::from(e), ContactsError::StorageFailure);
    }

    #[test]
    fn empty_fields_are_listed() {
        let e = DomainError::EmptyRequiredFields {
            fields: vec!["first_name", "email"],
        };
        assert_eq!(e.to_string(), "Required fields are empty: first_name, email");
    }
}
