//! Public models for the `contacts` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `contacts` module and its consumers.

use time::OffsetDateTime;

/// Store-assigned account identifier.
pub type AccountId = i32;

/// Store-assigned company identifier.
pub type CompanyId = i32;

/// Lifecycle state of a stored account.
///
/// Derived from `deleted_at`; a purged account no longer exists and has no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountState {
    Active,
    SoftDeleted,
}

impl AccountState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::SoftDeleted => "soft_deleted",
        }
    }
}

impl std::fmt::Display for AccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An account (a person in the directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_id: Option<CompanyId>,
    pub position: Option<String>,
    pub phone_1: Option<String>,
    pub phone_2: Option<String>,
    pub phone_3: Option<String>,
    pub deleted_at: Option<OffsetDateTime>,
}

impl Account {
    #[must_use]
    pub fn state(&self) -> AccountState {
        if self.deleted_at.is_some() {
            AccountState::SoftDeleted
        } else {
            AccountState::Active
        }
    }

    /// The three phone slots in order.
    #[must_use]
    pub fn phones(&self) -> [Option<&str>; 3] {
        [
            self.phone_1.as_deref(),
            self.phone_2.as_deref(),
            self.phone_3.as_deref(),
        ]
    }
}

/// Data for creating a new account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_id: Option<CompanyId>,
    pub position: Option<String>,
    pub phone_1: Option<String>,
    pub phone_2: Option<String>,
    pub phone_3: Option<String>,
}

/// Partial update data for an account.
///
/// `None` keeps the current value. For nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company_id: Option<Option<CompanyId>>,
    pub position: Option<Option<String>>,
    pub phone_1: Option<Option<String>>,
    pub phone_2: Option<Option<String>>,
    pub phone_3: Option<Option<String>>,
}

impl AccountPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A company accounts may be affiliated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub address: Option<String>,
}

/// Data for creating a new company.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewCompany {
    pub name: String,
    pub address: Option<String>,
}

/// Partial update data for a company.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub address: Option<Option<String>>,
}

/// Which side of the lifecycle a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleFilter {
    /// `deleted_at is null`
    #[default]
    Active,
    /// `deleted_at is not null`
    SoftDeleted,
}

impl LifecycleFilter {
    #[must_use]
    pub fn from_include_deleted(include_deleted: bool) -> Self {
        if include_deleted {
            Self::SoftDeleted
        } else {
            Self::Active
        }
    }
}

/// Page-number pagination request. `limit = None` selects the configured default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: Option<u64>,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit: Some(limit),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: None,
        }
    }
}

/// One page of results plus totals computed under the same filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}
