//! Domain service layer - lifecycle rules and transactional boundaries.
//!
//! Per-resource submodules:
//! - `accounts` - account state machine (create, update, soft delete, restore,
//!   purge) and the expiry purge pass
//! - `companies` - company CRUD and employee listing
//!
//! Every mutation runs inside one `DatabaseTransaction` (validation reads,
//! write, commit) and the whole unit is bounded by `store_timeout`. Dropping
//! an uncommitted transaction rolls it back.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use contacts_sdk::PageRequest;
use sea_orm::DatabaseConnection;

use crate::domain::error::DomainError;
use crate::domain::repos::{AccountsRepository, CompaniesRepository};

mod accounts;
mod companies;

pub use accounts::{AccountsService, SweepReport};
pub use companies::CompaniesService;

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
    /// How long a soft-deleted account stays restorable.
    pub retention: Duration,
    pub store_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
            retention: Duration::from_secs(72 * 60 * 60),
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Resolved page-number pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    #[must_use]
    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit)
    }
}

impl ServiceConfig {
    /// Resolve a page request: default the limit, clamp it to the maximum.
    ///
    /// # Errors
    /// `InvalidPagination` when page or limit is zero, or the offset overflows.
    pub fn page_window(&self, req: PageRequest) -> Result<PageWindow, DomainError> {
        let requested = req.limit.unwrap_or(self.default_page_size);
        let invalid = || DomainError::InvalidPagination {
            page: req.page,
            limit: requested,
        };

        if req.page == 0 || requested == 0 {
            return Err(invalid());
        }

        let limit = requested.min(self.max_page_size.max(1));
        let offset = (req.page - 1).checked_mul(limit).ok_or_else(invalid)?;

        Ok(PageWindow {
            page: req.page,
            limit,
            offset,
        })
    }
}

/// Run a store operation under the configured deadline.
///
/// # Errors
/// `Timeout` if the deadline passes first, otherwise whatever `fut` returns.
pub(crate) async fn bounded<T, F>(
    timeout: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    if let Ok(result) = tokio::time::timeout(timeout, fut).await {
        result
    } else {
        tracing::error!(operation, ?timeout, "store operation timed out");
        Err(DomainError::Timeout { operation, timeout })
    }
}

// DI Container - aggregates all domain services
pub struct AppServices<AR, CR>
where
    AR: AccountsRepository + 'static,
    CR: CompaniesRepository + 'static,
{
    pub accounts: Arc<AccountsService<AR, CR>>,
    pub companies: Arc<CompaniesService<CR, AR>>,
}

impl<AR, CR> Clone for AppServices<AR, CR>
where
    AR: AccountsRepository + 'static,
    CR: CompaniesRepository + 'static,
{
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            companies: Arc::clone(&self.companies),
        }
    }
}

impl<AR, CR> AppServices<AR, CR>
where
    AR: AccountsRepository + 'static,
    CR: CompaniesRepository + 'static,
{
    pub fn new(
        accounts_repo: AR,
        companies_repo: CR,
        db: DatabaseConnection,
        config: ServiceConfig,
    ) -> Self {
        let accounts_repo = Arc::new(accounts_repo);
        let companies_repo = Arc::new(companies_repo);

        let accounts = Arc::new(AccountsService::new(
            Arc::clone(&accounts_repo),
            Arc::clone(&companies_repo),
            db.clone(),
            config.clone(),
        ));
        let companies = Arc::new(CompaniesService::new(
            companies_repo,
            accounts_repo,
            db,
            config,
        ));

        Self {
            accounts,
            companies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_and_clamps_limit() {
        let cfg = ServiceConfig::default();

        let w = cfg.page_window(PageRequest::default()).unwrap();
        assert_eq!((w.page, w.limit, w.offset), (1, 10, 0));

        let w = cfg.page_window(PageRequest::new(3, 500)).unwrap();
        assert_eq!((w.limit, w.offset), (100, 200));
    }

    #[test]
    fn zero_page_or_limit_rejected() {
        let cfg = ServiceConfig::default();
        for req in [PageRequest::new(0, 10), PageRequest::new(1, 0)] {
            assert!(matches!(
                cfg.page_window(req),
                Err(DomainError::InvalidPagination { .. })
            ));
        }
    }

    #[test]
    fn offset_overflow_rejected() {
        let cfg = ServiceConfig::default();
        assert!(cfg.page_window(PageRequest::new(u64::MAX, 100)).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let w = PageWindow {
            page: 2,
            limit: 10,
            offset: 10,
        };
        assert_eq!(w.total_pages(15), 2);
        assert_eq!(w.total_pages(20), 2);
        assert_eq!(w.total_pages(0), 0);
    }

    #[tokio::test]
    async fn bounded_reports_timeout() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok::<_, DomainError>(())
        };
        let err = bounded(Duration::from_millis(20), "slow", slow)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Timeout { operation: "slow", .. }));
    }
}
