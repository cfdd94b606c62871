//! `ContactsApi` trait definition.
//!
//! This trait defines the public, transport-agnostic API of the `contacts` module.

use async_trait::async_trait;

use crate::errors::ContactsError;
use crate::models::{
    Account, AccountId, AccountPatch, Company, CompanyId, CompanyPatch, LifecycleFilter,
    NewAccount, NewCompany, Page, PageRequest,
};

/// Public API trait for the `contacts` module.
///
/// ```ignore
/// let account = client.create_account(new_account).await?;
/// let page = client.list_accounts(PageRequest::new(1, 10), LifecycleFilter::Active).await?;
/// ```
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// Create a new account after normalization and validation.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, ContactsError>;

    /// Get an account by ID, active or soft-deleted.
    async fn get_account(&self, id: AccountId) -> Result<Account, ContactsError>;

    /// Update an account with partial data. Never changes its lifecycle state.
    async fn update_account(
        &self,
        id: AccountId,
        patch: AccountPatch,
    ) -> Result<Account, ContactsError>;

    /// Soft-delete (`permanent = false`) or purge (`permanent = true`) an account.
    async fn delete_account(&self, id: AccountId, permanent: bool) -> Result<(), ContactsError>;

    /// Bring a soft-deleted account back to the active set.
    async fn restore_account(&self, id: AccountId) -> Result<Account, ContactsError>;

    /// List one page of active or soft-deleted accounts.
    async fn list_accounts(
        &self,
        page: PageRequest,
        filter: LifecycleFilter,
    ) -> Result<Page<Account>, ContactsError>;

    async fn create_company(&self, new_company: NewCompany) -> Result<Company, ContactsError>;

    async fn get_company(&self, id: CompanyId) -> Result<Company, ContactsError>;

    async fn update_company(
        &self,
        id: CompanyId,
        patch: CompanyPatch,
    ) -> Result<Company, ContactsError>;

    /// Delete a company. Rejected while any account references it.
    async fn delete_company(&self, id: CompanyId) -> Result<(), ContactsError>;

    async fn list_companies(&self, page: PageRequest) -> Result<Page<Company>, ContactsError>;

    /// List the active accounts affiliated with a company.
    async fn list_employees(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> Result<Page<Account>, ContactsError>;
}
