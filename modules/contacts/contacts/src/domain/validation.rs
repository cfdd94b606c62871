//! Admissibility checks for account writes.
//!
//! Checks run in a fixed order and the first failure wins: required fields,
//! email syntax, email uniqueness, cross-record phone uniqueness, intra-record
//! phone duplicates, per-slot phone format, company reference. The store
//! constraints remain the integrity guarantee; this is the friendly front.

use std::sync::LazyLock;

use contacts_sdk::{AccountId, CompanyId};
use regex::Regex;
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;
use crate::domain::normalize::{normalize_phone, CanonicalPhone, PhoneRejected};
use crate::domain::repos::{AccountFields, AccountsRepository, CompaniesRepository};

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("static regex should not panic")
});

/// A candidate account: text already sanitized, phones still raw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_id: Option<CompanyId>,
    pub position: Option<String>,
    pub phones: [Option<String>; 3],
}

/// Check email syntax: `local@domain.tld` with no leading, trailing or doubled
/// dots in the local part.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if !EMAIL_RE.is_match(email) {
        return false;
    }
    let local = email.split('@').next().unwrap_or_default();
    !(local.starts_with('.') || local.ends_with('.') || local.contains(".."))
}

/// Steps that need no store access: required fields, then email syntax.
///
/// # Errors
/// `EmptyRequiredFields` listing every blank field, or `InvalidEmail`.
pub fn check_required_and_email(draft: &AccountDraft) -> Result<(), DomainError> {
    let empty: Vec<&'static str> = [
        ("first_name", &draft.first_name),
        ("last_name", &draft.last_name),
        ("email", &draft.email),
    ]
    .into_iter()
    .filter(|(_, v)| v.is_empty())
    .map(|(name, _)| name)
    .collect();

    if !empty.is_empty() {
        return Err(DomainError::EmptyRequiredFields { fields: empty });
    }

    if !is_valid_email(&draft.email) {
        return Err(DomainError::InvalidEmail {
            email: draft.email.clone(),
        });
    }

    Ok(())
}

/// Validate a draft against the store and produce the fields to persist.
///
/// `self_id` is the account being updated; it is excluded from uniqueness
/// checks and nothing else is.
///
/// # Errors
/// The first failing check, in the order documented on the module.
pub async fn validate_account<C, AR, CR>(
    conn: &C,
    accounts: &AR,
    companies: &CR,
    draft: AccountDraft,
    self_id: Option<AccountId>,
) -> Result<AccountFields, DomainError>
where
    C: ConnectionTrait + Send + Sync,
    AR: AccountsRepository,
    CR: CompaniesRepository,
{
    check_required_and_email(&draft)?;

    if accounts.email_exists(conn, &draft.email, self_id).await? {
        return Err(DomainError::EmailAlreadyExists { email: draft.email });
    }

    let normalized: [Result<Option<CanonicalPhone>, PhoneRejected>; 3] =
        draft.phones.each_ref().map(|raw| match raw {
            Some(raw) => normalize_phone(raw),
            None => Ok(None),
        });

    for phone in normalized.iter().filter_map(|r| r.as_ref().ok().and_then(Option::as_ref)) {
        if accounts.phone_exists(conn, phone, self_id).await? {
            return Err(DomainError::PhoneAlreadyExists {
                phone: phone.to_string(),
            });
        }
    }

    if let Some(dup) = first_duplicate(&normalized) {
        return Err(DomainError::DuplicatePhone {
            phone: dup.to_string(),
        });
    }

    let mut phones: [Option<CanonicalPhone>; 3] = [None, None, None];
    for ((slot, result), out) in (1u8..).zip(normalized).zip(phones.iter_mut()) {
        match result {
            Ok(phone) => *out = phone,
            Err(rejected) => {
                return Err(DomainError::InvalidPhone {
                    slot,
                    value: rejected.raw,
                });
            }
        }
    }

    if let Some(company_id) = draft.company_id
        && companies.find_by_id(conn, company_id).await?.is_none()
    {
        return Err(DomainError::company_not_found(company_id));
    }

    Ok(AccountFields {
        first_name: draft.first_name,
        last_name: draft.last_name,
        email: draft.email,
        company_id: draft.company_id,
        position: draft.position,
        phones,
    })
}

fn first_duplicate(
    normalized: &[Result<Option<CanonicalPhone>, PhoneRejected>; 3],
) -> Option<&CanonicalPhone> {
    let present: Vec<&CanonicalPhone> = normalized
        .iter()
        .filter_map(|r| r.as_ref().ok().and_then(Option::as_ref))
        .collect();
    for (i, phone) in present.iter().enumerate() {
        if present[i + 1..].contains(phone) {
            return Some(*phone);
        }
    }
    None
}
