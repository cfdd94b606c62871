#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Uniqueness enforced by the store when the pre-write checks miss a
//! conflict (two writers racing past validation).

use async_trait::async_trait;
use contacts::domain::error::DomainError;
use contacts::domain::normalize::CanonicalPhone;
use contacts::domain::repos::{AccountFields, AccountsRepository};
use contacts::domain::service::{AppServices, ServiceConfig};
use contacts::infra::storage::{OrmAccountsRepository, OrmCompaniesRepository};
use contacts_sdk::{
    Account, AccountId, AccountPatch, CompanyId, LifecycleFilter, NewAccount, PageRequest,
};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

mod support;
use support::{inmem_db, new_account, with_phones};

/// Store access whose uniqueness probes always answer "free".
#[derive(Default)]
struct BlindAccounts {
    inner: OrmAccountsRepository,
}

#[async_trait]
impl AccountsRepository for BlindAccounts {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
    ) -> Result<Option<Account>, DomainError> {
        self.inner.find_by_id(conn, id).await
    }

    async fn email_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        _conn: &C,
        _email: &str,
        _exclude: Option<AccountId>,
    ) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn phone_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        _conn: &C,
        _phone: &CanonicalPhone,
        _exclude: Option<AccountId>,
    ) -> Result<bool, DomainError> {
        Ok(false)
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        fields: &AccountFields,
    ) -> Result<AccountId, DomainError> {
        self.inner.insert(conn, fields).await
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
        fields: &AccountFields,
    ) -> Result<bool, DomainError> {
        self.inner.update(conn, id, fields).await
    }

    async fn set_deleted_at<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
        at: Option<OffsetDateTime>,
    ) -> Result<bool, DomainError> {
        self.inner.set_deleted_at(conn, id, at).await
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
    ) -> Result<bool, DomainError> {
        self.inner.delete(conn, id).await
    }

    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: LifecycleFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Account>, DomainError> {
        self.inner.list_page(conn, filter, offset, limit).await
    }

    async fn count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: LifecycleFilter,
    ) -> Result<u64, DomainError> {
        self.inner.count(conn, filter).await
    }

    async fn find_expired<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<AccountId>, DomainError> {
        self.inner.find_expired(conn, cutoff).await
    }

    async fn list_by_company<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: CompanyId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Account>, DomainError> {
        self.inner
            .list_by_company(conn, company_id, offset, limit)
            .await
    }

    async fn count_by_company<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: CompanyId,
        active_only: bool,
    ) -> Result<u64, DomainError> {
        self.inner
            .count_by_company(conn, company_id, active_only)
            .await
    }
}

async fn blind_services() -> AppServices<BlindAccounts, OrmCompaniesRepository> {
    AppServices::new(
        BlindAccounts::default(),
        OrmCompaniesRepository::new(),
        inmem_db().await,
        ServiceConfig::default(),
    )
}

async fn active_count(services: &AppServices<BlindAccounts, OrmCompaniesRepository>) -> u64 {
    services
        .accounts
        .list(PageRequest::default(), LifecycleFilter::Active)
        .await
        .unwrap()
        .total_items
}

#[tokio::test]
async fn email_index_rejects_duplicate_insert() {
    let services = blind_services().await;
    services.accounts.create(new_account(1)).await.unwrap();

    let err = services
        .accounts
        .create(NewAccount {
            first_name: "Other".to_owned(),
            ..new_account(1)
        })
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            DomainError::EmailAlreadyExists { ref email } if email == "user1@example.com"
        ),
        "unexpected error: {err}"
    );
    assert_eq!(active_count(&services).await, 1);
}

#[tokio::test]
async fn phone_index_rejects_duplicate_insert() {
    let services = blind_services().await;
    services
        .accounts
        .create(with_phones(1, [Some("9991234567"), None, None]))
        .await
        .unwrap();

    let err = services
        .accounts
        .create(with_phones(2, [None, Some("8 999 123 45 67"), None]))
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            DomainError::PhoneAlreadyExists { ref phone } if phone.contains("+79991234567")
        ),
        "unexpected error: {err}"
    );
    // The rejected insert rolled back with its transaction.
    assert_eq!(active_count(&services).await, 1);
}

#[tokio::test]
async fn phone_index_rejects_conflicting_update() {
    let services = blind_services().await;
    services
        .accounts
        .create(with_phones(1, [Some("9991234567"), None, None]))
        .await
        .unwrap();
    let b = services
        .accounts
        .create(with_phones(2, [Some("9997654321"), None, None]))
        .await
        .unwrap();

    let err = services
        .accounts
        .update(
            b.id,
            AccountPatch {
                phone_2: Some(Some("+79991234567".to_owned())),
                ..AccountPatch::default()
            },
        )
        .await
        .unwrap_err();
    // SQLite does not report the value, and B now carries two phones.
    assert!(
        matches!(
            err,
            DomainError::PhoneConflict { ref candidates }
                if candidates == &["+79997654321", "+79991234567"]
        ),
        "unexpected error: {err}"
    );

    let unchanged = services.accounts.get(b.id).await.unwrap();
    assert_eq!(unchanged, b);
}

#[tokio::test]
async fn soft_deleted_holder_still_blocks_at_store_level() {
    let services = blind_services().await;
    let a = services
        .accounts
        .create(with_phones(1, [Some("9991234567"), None, None]))
        .await
        .unwrap();
    services.accounts.soft_delete(a.id).await.unwrap();

    let err = services
        .accounts
        .create(with_phones(2, [Some("+7 999 123-45-67"), None, None]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::PhoneAlreadyExists { .. }));
}
