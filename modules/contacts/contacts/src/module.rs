use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use axum::Router;
use contacts_sdk::ContactsApi;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::ContactsConfig;
use crate::domain::service::{AppServices, SweepReport};
use crate::domain::sweeper::{self, run_expiry_sweeper};
use crate::infra::storage::db::connect;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{OrmAccountsRepository, OrmCompaniesRepository};
use crate::local_client::ContactsLocalClient;

/// Type alias for the concrete `AppServices` type used with ORM repositories.
/// This lives in the composition root (module.rs) to avoid infra dependencies in domain.
pub type ConcreteAppServices = AppServices<OrmAccountsRepository, OrmCompaniesRepository>;

/// Contacts module: wires repositories, services, REST routes and the sweeper.
#[derive(Clone)]
pub struct Contacts {
    services: ConcreteAppServices,
    config: ContactsConfig,
}

impl Contacts {
    /// Build the module over an open connection.
    ///
    /// # Errors
    /// Fails if the configuration is inconsistent.
    pub fn init(db: DatabaseConnection, config: ContactsConfig) -> anyhow::Result<Self> {
        info!("Initializing contacts module");

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid contacts config: {e}"))?;
        debug!(
            "Loaded contacts config: default_page_size={}, max_page_size={}, retention={}",
            config.default_page_size,
            config.max_page_size,
            humantime::format_duration(config.retention)
        );

        let services = AppServices::new(
            OrmAccountsRepository::new(),
            OrmCompaniesRepository::new(),
            db,
            config.service_config(),
        );

        Ok(Self { services, config })
    }

    /// Open a connection pool for `dsn`.
    ///
    /// # Errors
    /// Fails if the database cannot be reached within `acquire_timeout`.
    pub async fn connect(
        dsn: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> anyhow::Result<DatabaseConnection> {
        connect(dsn, max_connections, acquire_timeout)
            .await
            .context("failed to connect to contacts database")
    }

    /// Apply pending schema migrations.
    ///
    /// # Errors
    /// Propagates migration failures.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running contacts database migrations");
        Migrator::up(db, None)
            .await
            .context("contacts migrations failed")?;
        info!("Contacts database migrations completed successfully");
        Ok(())
    }

    #[must_use]
    pub fn services(&self) -> &ConcreteAppServices {
        &self.services
    }

    #[must_use]
    pub fn config(&self) -> &ContactsConfig {
        &self.config
    }

    /// Mount the REST routes onto `router`.
    #[must_use]
    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering contacts REST routes");
        routes::register_routes(router, self.services.clone())
    }

    /// In-process client implementing the SDK trait.
    #[must_use]
    pub fn client(&self) -> Arc<dyn ContactsApi> {
        Arc::new(ContactsLocalClient::new(self.services.clone()))
    }

    /// One purge pass, outside the periodic sweeper.
    pub async fn sweep_once(&self) -> Option<SweepReport> {
        sweeper::sweep_once(&self.services.accounts).await
    }

    /// Start the expiry sweeper unless disabled in configuration.
    #[must_use]
    pub fn spawn_sweeper(&self, cancel: CancellationToken) -> Option<JoinHandle<()>> {
        if !self.config.sweeper_enabled {
            info!("Expiry sweeper disabled by configuration");
            return None;
        }
        Some(tokio::spawn(run_expiry_sweeper(
            Arc::clone(&self.services.accounts),
            self.config.sweep_interval,
            cancel,
        )))
    }
}
