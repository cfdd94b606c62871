//! Public error catalog: numeric `errorCode`, HTTP status and kind slug.
//!
//! The numeric codes are stable and shared with existing clients.

use axum::http::StatusCode;
use contacts_sdk::ContactsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyRequiredFields,
    InvalidEmailFormat,
    EmailAlreadyExists,
    InvalidPhoneFormat,
    CompanyNameExists,
    InvalidRequest,
    StorageFailure,
    AccountNotFound,
    InvalidLifecycleTransition,
    CompanyNotFound,
    CompanyInUse,
}

impl ErrorCode {
    #[must_use]
    pub fn code(self) -> u16 {
        match self {
            Self::EmptyRequiredFields => 101,
            Self::InvalidEmailFormat => 102,
            Self::EmailAlreadyExists => 103,
            Self::InvalidPhoneFormat => 104,
            Self::CompanyNameExists => 105,
            Self::InvalidRequest => 106,
            Self::StorageFailure => 201,
            Self::AccountNotFound => 206,
            Self::InvalidLifecycleTransition => 207,
            Self::CompanyNotFound => 208,
            Self::CompanyInUse => 209,
        }
    }

    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::EmptyRequiredFields
            | Self::InvalidEmailFormat
            | Self::InvalidPhoneFormat
            | Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::EmailAlreadyExists
            | Self::CompanyNameExists
            | Self::InvalidLifecycleTransition
            | Self::CompanyInUse => StatusCode::CONFLICT,
            Self::AccountNotFound | Self::CompanyNotFound => StatusCode::NOT_FOUND,
            Self::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::EmptyRequiredFields => "empty_required_fields",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::EmailAlreadyExists => "email_already_exists",
            Self::InvalidPhoneFormat => "invalid_phone_format",
            Self::CompanyNameExists => "company_name_exists",
            Self::InvalidRequest => "invalid_request",
            Self::StorageFailure => "storage_failure",
            Self::AccountNotFound => "account_not_found",
            Self::InvalidLifecycleTransition => "invalid_lifecycle_transition",
            Self::CompanyNotFound => "company_not_found",
            Self::CompanyInUse => "company_in_use",
        }
    }
}

impl From<&ContactsError> for ErrorCode {
    fn from(e: &ContactsError) -> Self {
        match e {
            ContactsError::EmptyRequiredFields { .. } => Self::EmptyRequiredFields,
            ContactsError::InvalidEmailFormat { .. } => Self::InvalidEmailFormat,
            ContactsError::EmailAlreadyExists { .. } => Self::EmailAlreadyExists,
            ContactsError::InvalidPhoneFormat { .. } => Self::InvalidPhoneFormat,
            ContactsError::AccountNotFound { .. } => Self::AccountNotFound,
            ContactsError::InvalidLifecycleTransition { .. } => Self::InvalidLifecycleTransition,
            ContactsError::CompanyNotFound { .. } => Self::CompanyNotFound,
            ContactsError::CompanyNameExists { .. } => Self::CompanyNameExists,
            ContactsError::CompanyInUse { .. } => Self::CompanyInUse,
            ContactsError::InvalidRequest { .. } => Self::InvalidRequest,
            ContactsError::StorageFailure => Self::StorageFailure,
        }
    }
}
