#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `contacts` integration tests.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::time::Duration;

use contacts::domain::repos::AccountsRepository;
use contacts::domain::service::{AppServices, ServiceConfig};
use contacts::infra::storage::db::connect;
use contacts::infra::storage::migrations::Migrator;
use contacts::infra::storage::{OrmAccountsRepository, OrmCompaniesRepository};
use contacts::module::ConcreteAppServices;
use contacts_sdk::{Account, AccountId, NewAccount, NewCompany};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use time::OffsetDateTime;

/// Create a fresh in-memory `SQLite` database with migrations applied.
///
/// # Panics
/// Panics if the database connection or migrations fail.
pub async fn inmem_db() -> DatabaseConnection {
    let db = connect("sqlite::memory:", 1, Duration::from_secs(5))
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub services: ConcreteAppServices,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(ServiceConfig::default()).await
    }

    pub async fn with_config(config: ServiceConfig) -> Self {
        let db = inmem_db().await;
        let services = AppServices::new(
            OrmAccountsRepository::new(),
            OrmCompaniesRepository::new(),
            db.clone(),
            config,
        );
        Self { db, services }
    }

    pub async fn create(&self, new_account: NewAccount) -> Account {
        self.services
            .accounts
            .create(new_account)
            .await
            .expect("Failed to create account")
    }

    pub async fn create_company(&self, name: &str) -> i32 {
        self.services
            .companies
            .create(NewCompany {
                name: name.to_owned(),
                address: None,
            })
            .await
            .expect("Failed to create company")
            .id
    }

    /// Backdate `deleted_at` directly in the store.
    pub async fn set_deleted_at(&self, id: AccountId, at: OffsetDateTime) {
        let updated = OrmAccountsRepository::new()
            .set_deleted_at(&self.db, id, Some(at))
            .await
            .expect("Failed to set deleted_at");
        assert!(updated, "account {id} not found");
    }
}

pub fn new_account(n: u32) -> NewAccount {
    NewAccount {
        first_name: format!("First{n}"),
        last_name: format!("Last{n}"),
        email: format!("user{n}@example.com"),
        ..NewAccount::default()
    }
}

pub fn with_phones(n: u32, phones: [Option<&str>; 3]) -> NewAccount {
    let [phone_1, phone_2, phone_3] = phones.map(|p| p.map(str::to_owned));
    NewAccount {
        phone_1,
        phone_2,
        phone_3,
        ..new_account(n)
    }
}
