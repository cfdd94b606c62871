use async_trait::async_trait;
use contacts_sdk::{Account, AccountId, CompanyId, LifecycleFilter};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::normalize::CanonicalPhone;

/// Mutable account columns, already sanitized and normalized.
///
/// `id` and `deleted_at` are absent: the store assigns the former and only
/// lifecycle transitions touch the latter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_id: Option<CompanyId>,
    pub position: Option<String>,
    pub phones: [Option<CanonicalPhone>; 3],
}

impl AccountFields {
    /// Non-empty phone slots with their 1-based slot numbers.
    pub fn present_phones(&self) -> impl Iterator<Item = (u8, &CanonicalPhone)> {
        (1u8..)
            .zip(self.phones.iter())
            .filter_map(|(slot, p)| p.as_ref().map(|p| (slot, p)))
    }

    /// Assemble the stored record these fields describe.
    #[must_use]
    pub fn into_account(self, id: AccountId, deleted_at: Option<OffsetDateTime>) -> Account {
        let [phone_1, phone_2, phone_3] = self.phones.map(|p| p.map(CanonicalPhone::into_inner));
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            company_id: self.company_id,
            position: self.position,
            phone_1,
            phone_2,
            phone_3,
            deleted_at,
        }
    }
}

/// Repository trait for Account persistence operations.
///
/// All methods accept a generic connection so the service can run a whole
/// transition (reads, checks and write) inside one `DatabaseTransaction`.
/// Write methods report "no such row" as `Ok(false)` rather than an error.
#[async_trait]
pub trait AccountsRepository: Send + Sync {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
    ) -> Result<Option<Account>, DomainError>;

    /// Whether any account other than `exclude` (active or soft-deleted) has this email.
    async fn email_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
        exclude: Option<AccountId>,
    ) -> Result<bool, DomainError>;

    /// Whether any account other than `exclude` holds this phone in any slot.
    async fn phone_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        phone: &CanonicalPhone,
        exclude: Option<AccountId>,
    ) -> Result<bool, DomainError>;

    /// Insert an active account and return the assigned id.
    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        fields: &AccountFields,
    ) -> Result<AccountId, DomainError>;

    /// Overwrite all mutable columns; `deleted_at` is left untouched.
    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
        fields: &AccountFields,
    ) -> Result<bool, DomainError>;

    async fn set_deleted_at<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
        at: Option<OffsetDateTime>,
    ) -> Result<bool, DomainError>;

    /// Remove the row and its phone index entries.
    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
    ) -> Result<bool, DomainError>;

    /// Accounts under `filter`, ordered by id.
    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: LifecycleFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Account>, DomainError>;

    async fn count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: LifecycleFilter,
    ) -> Result<u64, DomainError>;

    /// Ids of soft-deleted accounts whose `deleted_at` is strictly before `cutoff`.
    async fn find_expired<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<AccountId>, DomainError>;

    /// Active accounts affiliated with a company, ordered by id.
    async fn list_by_company<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: CompanyId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Account>, DomainError>;

    /// Accounts (any state) referencing a company; `active_only` narrows to live ones.
    async fn count_by_company<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: CompanyId,
        active_only: bool,
    ) -> Result<u64, DomainError>;
}
