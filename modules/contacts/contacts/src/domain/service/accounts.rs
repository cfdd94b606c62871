use std::sync::Arc;

use contacts_sdk::{
    Account, AccountId, AccountPatch, AccountState, LifecycleFilter, NewAccount, Page,
    PageRequest,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use time::OffsetDateTime;

use super::{bounded, ServiceConfig};
use crate::domain::error::{DomainError, UniqueTarget};
use crate::domain::normalize::{sanitize_optional, sanitize_text};
use crate::domain::repos::{AccountFields, AccountsRepository, CompaniesRepository};
use crate::domain::validation::{validate_account, AccountDraft};

/// Outcome of one expiry purge pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Expired accounts found at the start of the pass.
    pub examined: usize,
    pub purged: usize,
    /// Restored or purged by someone else between selection and purge.
    pub skipped: usize,
    pub failed: usize,
}

/// Account lifecycle engine.
///
/// States are `Active` and `SoftDeleted`, derived from `deleted_at`; a purged
/// account is gone. Only `soft_delete`, `restore` and `permanent_delete` move
/// an account between states.
pub struct AccountsService<AR, CR> {
    repo: Arc<AR>,
    companies: Arc<CR>,
    db: DatabaseConnection,
    config: ServiceConfig,
}

impl<AR, CR> AccountsService<AR, CR>
where
    AR: AccountsRepository,
    CR: CompaniesRepository,
{
    pub fn new(
        repo: Arc<AR>,
        companies: Arc<CR>,
        db: DatabaseConnection,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            companies,
            db,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// # Errors
    /// `AccountNotFound` if no row has this id, or a storage failure.
    pub async fn get(&self, id: AccountId) -> Result<Account, DomainError> {
        tracing::debug!(account_id = id, "Getting account by id");
        bounded(self.config.store_timeout, "get_account", async {
            self.repo
                .find_by_id(&self.db, id)
                .await?
                .ok_or_else(|| DomainError::account_not_found(id))
        })
        .await
    }

    /// Sanitize, validate and insert a new active account.
    ///
    /// # Errors
    /// Any validation failure, or a storage failure.
    pub async fn create(&self, new_account: NewAccount) -> Result<Account, DomainError> {
        tracing::info!("Creating new account");

        let draft = AccountDraft {
            first_name: sanitize_text(&new_account.first_name),
            last_name: sanitize_text(&new_account.last_name),
            email: sanitize_text(&new_account.email),
            company_id: new_account.company_id,
            position: sanitize_optional(new_account.position.as_deref()),
            phones: [new_account.phone_1, new_account.phone_2, new_account.phone_3],
        };

        let account = bounded(self.config.store_timeout, "create_account", async {
            let txn = self.db.begin().await?;
            let fields =
                validate_account(&txn, &*self.repo, &*self.companies, draft, None).await?;
            let id = self
                .repo
                .insert(&txn, &fields)
                .await
                .map_err(|e| remap_conflict(e, &fields))?;
            txn.commit()
                .await
                .map_err(|e| remap_conflict(e.into(), &fields))?;
            Ok(fields.into_account(id, None))
        })
        .await?;

        tracing::info!(account_id = account.id, "Successfully created account");
        Ok(account)
    }

    /// Apply a partial update. Works in either state and never touches `deleted_at`.
    ///
    /// # Errors
    /// `AccountNotFound`, any validation failure, or a storage failure.
    pub async fn update(&self, id: AccountId, patch: AccountPatch) -> Result<Account, DomainError> {
        tracing::info!(account_id = id, "Updating account");

        let account = bounded(self.config.store_timeout, "update_account", async {
            let txn = self.db.begin().await?;
            let current = self
                .repo
                .find_by_id(&txn, id)
                .await?
                .ok_or_else(|| DomainError::account_not_found(id))?;

            if patch.is_empty() {
                return Ok(current);
            }

            let deleted_at = current.deleted_at;
            let draft = merge_patch(current, patch);
            let fields =
                validate_account(&txn, &*self.repo, &*self.companies, draft, Some(id)).await?;

            if !self
                .repo
                .update(&txn, id, &fields)
                .await
                .map_err(|e| remap_conflict(e, &fields))?
            {
                return Err(DomainError::account_not_found(id));
            }
            txn.commit()
                .await
                .map_err(|e| remap_conflict(e.into(), &fields))?;
            Ok(fields.into_account(id, deleted_at))
        })
        .await?;

        tracing::info!(account_id = id, "Successfully updated account");
        Ok(account)
    }

    /// Active -> `SoftDeleted`. Soft-deleting an already soft-deleted account
    /// is a no-op and keeps the original `deleted_at`.
    ///
    /// # Errors
    /// `AccountNotFound`, or a storage failure.
    pub async fn soft_delete(&self, id: AccountId) -> Result<(), DomainError> {
        tracing::info!(account_id = id, "Soft-deleting account");

        bounded(self.config.store_timeout, "soft_delete_account", async {
            let txn = self.db.begin().await?;
            let current = self
                .repo
                .find_by_id(&txn, id)
                .await?
                .ok_or_else(|| DomainError::account_not_found(id))?;

            if current.state() == AccountState::SoftDeleted {
                tracing::debug!(account_id = id, "Account already soft-deleted");
                return Ok(());
            }

            let now = OffsetDateTime::now_utc();
            if !self.repo.set_deleted_at(&txn, id, Some(now)).await? {
                return Err(DomainError::account_not_found(id));
            }
            txn.commit().await.map_err(DomainError::from)
        })
        .await?;

        tracing::info!(account_id = id, "Successfully soft-deleted account");
        Ok(())
    }

    /// `SoftDeleted` -> Active.
    ///
    /// # Errors
    /// `AccountNotFound`, `InvalidLifecycleTransition` for an active account,
    /// or a storage failure.
    pub async fn restore(&self, id: AccountId) -> Result<Account, DomainError> {
        tracing::info!(account_id = id, "Restoring account");

        let account = bounded(self.config.store_timeout, "restore_account", async {
            let txn = self.db.begin().await?;
            let current = self
                .repo
                .find_by_id(&txn, id)
                .await?
                .ok_or_else(|| DomainError::account_not_found(id))?;

            if current.state() == AccountState::Active {
                return Err(DomainError::invalid_transition(
                    id,
                    AccountState::Active,
                    "restore",
                ));
            }

            if !self.repo.set_deleted_at(&txn, id, None).await? {
                return Err(DomainError::account_not_found(id));
            }
            txn.commit().await?;
            Ok(Account {
                deleted_at: None,
                ..current
            })
        })
        .await?;

        tracing::info!(account_id = id, "Successfully restored account");
        Ok(account)
    }

    /// `SoftDeleted` -> gone. The only way a row leaves the store.
    ///
    /// # Errors
    /// `AccountNotFound`, `InvalidLifecycleTransition` for an active account,
    /// or a storage failure.
    pub async fn permanent_delete(&self, id: AccountId) -> Result<(), DomainError> {
        tracing::info!(account_id = id, "Permanently deleting account");

        bounded(self.config.store_timeout, "permanent_delete_account", async {
            let txn = self.db.begin().await?;
            let current = self
                .repo
                .find_by_id(&txn, id)
                .await?
                .ok_or_else(|| DomainError::account_not_found(id))?;

            if current.state() == AccountState::Active {
                return Err(DomainError::invalid_transition(
                    id,
                    AccountState::Active,
                    "permanently delete",
                ));
            }

            if !self.repo.delete(&txn, id).await? {
                return Err(DomainError::account_not_found(id));
            }
            txn.commit().await.map_err(DomainError::from)
        })
        .await?;

        tracing::info!(account_id = id, "Successfully purged account");
        Ok(())
    }

    /// # Errors
    /// See `soft_delete` and `permanent_delete`.
    pub async fn delete(&self, id: AccountId, permanent: bool) -> Result<(), DomainError> {
        if permanent {
            self.permanent_delete(id).await
        } else {
            self.soft_delete(id).await
        }
    }

    /// One page of accounts on one side of the lifecycle, ordered by id.
    ///
    /// # Errors
    /// `InvalidPagination`, or a storage failure.
    pub async fn list(
        &self,
        req: PageRequest,
        filter: LifecycleFilter,
    ) -> Result<Page<Account>, DomainError> {
        tracing::debug!(page = req.page, ?filter, "Listing accounts");
        let window = self.config.page_window(req)?;

        let page = bounded(self.config.store_timeout, "list_accounts", async {
            let items = self
                .repo
                .list_page(&self.db, filter, window.offset, window.limit)
                .await?;
            let total_items = self.repo.count(&self.db, filter).await?;
            Ok(Page {
                items,
                current_page: window.page,
                total_pages: window.total_pages(total_items),
                total_items,
            })
        })
        .await?;

        tracing::debug!("Successfully listed {} accounts in page", page.items.len());
        Ok(page)
    }

    /// Purge every soft-deleted account whose retention window elapsed before `now`.
    ///
    /// Each purge is its own transaction; one failure never stops the pass.
    ///
    /// # Errors
    /// Only if the expired set cannot be selected.
    pub async fn purge_expired(&self, now: OffsetDateTime) -> Result<SweepReport, DomainError> {
        let retention =
            time::Duration::try_from(self.config.retention).unwrap_or(time::Duration::MAX);
        let cutoff = now
            .checked_sub(retention)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH);
        tracing::debug!(%cutoff, "Selecting expired accounts");

        let expired = bounded(self.config.store_timeout, "find_expired_accounts", async {
            self.repo.find_expired(&self.db, cutoff).await
        })
        .await?;

        let mut report = SweepReport {
            examined: expired.len(),
            ..SweepReport::default()
        };

        for id in expired {
            match self.permanent_delete(id).await {
                Ok(()) => report.purged += 1,
                Err(
                    e @ (DomainError::AccountNotFound { .. }
                    | DomainError::InvalidLifecycleTransition { .. }),
                ) => {
                    tracing::debug!(account_id = id, "Skipping expired account: {e}");
                    report.skipped += 1;
                }
                Err(e) => {
                    tracing::warn!(account_id = id, "Failed to purge expired account: {e}");
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

/// Overlay a patch on the stored record. Inbound text is sanitized; stored
/// values are already sanitized and pass through untouched.
fn merge_patch(current: Account, patch: AccountPatch) -> AccountDraft {
    let phone = |patched: Option<Option<String>>, stored: Option<String>| match patched {
        Some(value) => value,
        None => stored,
    };

    AccountDraft {
        first_name: patch
            .first_name
            .map_or(current.first_name, |v| sanitize_text(&v)),
        last_name: patch
            .last_name
            .map_or(current.last_name, |v| sanitize_text(&v)),
        email: patch.email.map_or(current.email, |v| sanitize_text(&v)),
        company_id: patch.company_id.unwrap_or(current.company_id),
        position: match patch.position {
            Some(value) => sanitize_optional(value.as_deref()),
            None => current.position,
        },
        phones: [
            phone(patch.phone_1, current.phone_1),
            phone(patch.phone_2, current.phone_2),
            phone(patch.phone_3, current.phone_3),
        ],
    }
}

/// A unique constraint fired after validation passed: a concurrent writer got
/// there first. Report it as the rejection validation would have produced.
fn remap_conflict(err: DomainError, fields: &AccountFields) -> DomainError {
    match err {
        DomainError::UniqueViolation {
            target: UniqueTarget::Email,
            ..
        } => DomainError::EmailAlreadyExists {
            email: fields.email.clone(),
        },
        DomainError::UniqueViolation {
            target: UniqueTarget::Phone,
            constraint,
        } => phone_conflict(&constraint, fields),
        other => other,
    }
}

/// Name the colliding phone when the backend message carries it or the
/// payload has only one phone; otherwise list every candidate.
fn phone_conflict(constraint: &str, fields: &AccountFields) -> DomainError {
    let candidates: Vec<&str> = fields.present_phones().map(|(_, p)| p.as_str()).collect();
    let named = candidates
        .iter()
        .find(|phone| constraint.contains(**phone))
        .or(match candidates.as_slice() {
            [only] => Some(only),
            _ => None,
        });
    match named {
        Some(phone) => DomainError::PhoneAlreadyExists {
            phone: (*phone).to_owned(),
        },
        None => DomainError::PhoneConflict {
            candidates: candidates.into_iter().map(str::to_owned).collect(),
        },
    }
}
