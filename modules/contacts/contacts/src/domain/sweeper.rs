//! Background purge of soft-deleted accounts past their retention window.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

use crate::domain::repos::{AccountsRepository, CompaniesRepository};
use crate::domain::service::{AccountsService, SweepReport};

/// Run one purge pass and log its summary. Never fails.
pub async fn sweep_once<AR, CR>(accounts: &AccountsService<AR, CR>) -> Option<SweepReport>
where
    AR: AccountsRepository,
    CR: CompaniesRepository,
{
    match accounts.purge_expired(OffsetDateTime::now_utc()).await {
        Ok(report) => {
            tracing::info!(
                examined = report.examined,
                purged = report.purged,
                skipped = report.skipped,
                failed = report.failed,
                "Expiry sweep finished"
            );
            Some(report)
        }
        Err(e) => {
            tracing::error!("Expiry sweep could not select expired accounts: {e}");
            None
        }
    }
}

/// Sweep on a fixed interval until `cancellation_token` fires.
///
/// The first tick completes immediately, so a pass runs at startup.
///
/// ```ignore
/// let cancel = CancellationToken::new();
/// let handle = tokio::spawn(run_expiry_sweeper(services.accounts.clone(), interval, cancel.clone()));
///
/// // On shutdown:
/// cancel.cancel();
/// handle.await?;
/// ```
pub async fn run_expiry_sweeper<AR, CR>(
    accounts: Arc<AccountsService<AR, CR>>,
    every: Duration,
    cancellation_token: CancellationToken,
) where
    AR: AccountsRepository,
    CR: CompaniesRepository,
{
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tracing::info!(?every, "Expiry sweeper started");

    loop {
        tokio::select! {
            () = cancellation_token.cancelled() => {
                tracing::info!("Expiry sweeper shutting down");
                break;
            }
            _ = interval.tick() => {
                sweep_once(&accounts).await;
            }
        }
    }
}
