//! Local implementation of `ContactsApi`.
//!
//! This client is used for in-process consumers. It delegates to the domain
//! services and converts errors to SDK error types.

use async_trait::async_trait;
use contacts_sdk::{
    Account, AccountId, AccountPatch, Company, CompanyId, CompanyPatch, ContactsApi,
    ContactsError, LifecycleFilter, NewAccount, NewCompany, Page, PageRequest,
};

use crate::domain::error::DomainError;
use crate::module::ConcreteAppServices;

pub struct ContactsLocalClient {
    services: ConcreteAppServices,
}

impl ContactsLocalClient {
    #[must_use]
    pub fn new(services: ConcreteAppServices) -> Self {
        Self { services }
    }
}

fn to_sdk(e: DomainError) -> ContactsError {
    if e.is_storage() {
        tracing::error!(error = %e, "Storage failure in local client");
    }
    e.into()
}

#[async_trait]
impl ContactsApi for ContactsLocalClient {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, ContactsError> {
        self.services
            .accounts
            .create(new_account)
            .await
            .map_err(to_sdk)
    }

    async fn get_account(&self, id: AccountId) -> Result<Account, ContactsError> {
        self.services.accounts.get(id).await.map_err(to_sdk)
    }

    async fn update_account(
        &self,
        id: AccountId,
        patch: AccountPatch,
    ) -> Result<Account, ContactsError> {
        self.services
            .accounts
            .update(id, patch)
            .await
            .map_err(to_sdk)
    }

    async fn delete_account(&self, id: AccountId, permanent: bool) -> Result<(), ContactsError> {
        self.services
            .accounts
            .delete(id, permanent)
            .await
            .map_err(to_sdk)
    }

    async fn restore_account(&self, id: AccountId) -> Result<Account, ContactsError> {
        self.services.accounts.restore(id).await.map_err(to_sdk)
    }

    async fn list_accounts(
        &self,
        page: PageRequest,
        filter: LifecycleFilter,
    ) -> Result<Page<Account>, ContactsError> {
        self.services
            .accounts
            .list(page, filter)
            .await
            .map_err(to_sdk)
    }

    async fn create_company(&self, new_company: NewCompany) -> Result<Company, ContactsError> {
        self.services
            .companies
            .create(new_company)
            .await
            .map_err(to_sdk)
    }

    async fn get_company(&self, id: CompanyId) -> Result<Company, ContactsError> {
        self.services.companies.get(id).await.map_err(to_sdk)
    }

    async fn update_company(
        &self,
        id: CompanyId,
        patch: CompanyPatch,
    ) -> Result<Company, ContactsError> {
        self.services
            .companies
            .update(id, patch)
            .await
            .map_err(to_sdk)
    }

    async fn delete_company(&self, id: CompanyId) -> Result<(), ContactsError> {
        self.services.companies.delete(id).await.map_err(to_sdk)
    }

    async fn list_companies(&self, page: PageRequest) -> Result<Page<Company>, ContactsError> {
        self.services.companies.list(page).await.map_err(to_sdk)
    }

    async fn list_employees(
        &self,
        company_id: CompanyId,
        page: PageRequest,
    ) -> Result<Page<Account>, ContactsError> {
        self.services
            .companies
            .employees(company_id, page)
            .await
            .map_err(to_sdk)
    }
}
