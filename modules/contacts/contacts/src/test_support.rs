#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use contacts_sdk::{Account, NewAccount};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use crate::domain::service::{AppServices, ServiceConfig};
use crate::infra::storage::db::connect;
use crate::infra::storage::{OrmAccountsRepository, OrmCompaniesRepository};
use crate::module::ConcreteAppServices;

/// Fresh in-memory database with migrations applied. One pooled connection,
/// since every `sqlite::memory:` connection is its own database.
pub async fn inmem_db() -> DatabaseConnection {
    let db = connect("sqlite::memory:", 1, Duration::from_secs(5))
        .await
        .expect("Failed to connect to in-memory database");

    crate::infra::storage::migrations::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn services_with(config: ServiceConfig) -> (DatabaseConnection, ConcreteAppServices) {
    let db = inmem_db().await;
    let services = AppServices::new(
        OrmAccountsRepository::new(),
        OrmCompaniesRepository::new(),
        db.clone(),
        config,
    );
    (db, services)
}

pub fn new_account(n: u32) -> NewAccount {
    NewAccount {
        first_name: format!("First{n}"),
        last_name: format!("Last{n}"),
        email: format!("user{n}@example.com"),
        ..NewAccount::default()
    }
}

pub async fn soft_deleted(services: &ConcreteAppServices, n: u32) -> Account {
    let account = services.accounts.create(new_account(n)).await.unwrap();
    services.accounts.soft_delete(account.id).await.unwrap();
    account
}
