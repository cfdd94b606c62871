#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Account state machine: soft delete, restore, purge, listing and expiry.

use std::time::Duration;

use contacts::domain::error::DomainError;
use contacts::domain::service::ServiceConfig;
use contacts_sdk::{AccountPatch, AccountState, LifecycleFilter, PageRequest};
use time::OffsetDateTime;
use time::macros::datetime;

mod support;
use support::{new_account, with_phones, TestContext};

#[tokio::test]
async fn soft_delete_then_restore_round_trips() {
    let ctx = TestContext::new().await;
    let created = ctx
        .create(with_phones(1, [Some("9991234567"), None, None]))
        .await;

    ctx.services.accounts.soft_delete(created.id).await.unwrap();
    let deleted = ctx.services.accounts.get(created.id).await.unwrap();
    assert_eq!(deleted.state(), AccountState::SoftDeleted);
    assert!(deleted.deleted_at.is_some());

    let restored = ctx.services.accounts.restore(created.id).await.unwrap();
    assert_eq!(restored, created);
    assert_eq!(ctx.services.accounts.get(created.id).await.unwrap(), created);
}

#[tokio::test]
async fn repeated_soft_delete_keeps_first_timestamp() {
    let ctx = TestContext::new().await;
    let a = ctx.create(new_account(1)).await;

    ctx.services.accounts.soft_delete(a.id).await.unwrap();
    let first = ctx.services.accounts.get(a.id).await.unwrap().deleted_at;

    ctx.services.accounts.soft_delete(a.id).await.unwrap();
    let second = ctx.services.accounts.get(a.id).await.unwrap().deleted_at;
    assert_eq!(first, second);
}

#[tokio::test]
async fn restore_of_active_account_rejected() {
    let ctx = TestContext::new().await;
    let a = ctx.create(new_account(1)).await;

    let err = ctx.services.accounts.restore(a.id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::InvalidLifecycleTransition {
            state: AccountState::Active,
            ..
        }
    ));
}

#[tokio::test]
async fn permanent_delete_requires_soft_delete_first() {
    let ctx = TestContext::new().await;
    let a = ctx.create(new_account(1)).await;

    let err = ctx
        .services
        .accounts
        .permanent_delete(a.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidLifecycleTransition { .. }));
    assert!(ctx.services.accounts.get(a.id).await.is_ok());

    ctx.services.accounts.delete(a.id, false).await.unwrap();
    ctx.services.accounts.delete(a.id, true).await.unwrap();

    let err = ctx.services.accounts.get(a.id).await.unwrap_err();
    assert!(matches!(err, DomainError::AccountNotFound { id } if id == a.id));
    let err = ctx.services.accounts.restore(a.id).await.unwrap_err();
    assert!(matches!(err, DomainError::AccountNotFound { .. }));
}

#[tokio::test]
async fn missing_account_reported_for_every_transition() {
    let ctx = TestContext::new().await;
    let svc = &ctx.services.accounts;

    assert!(matches!(svc.get(99).await, Err(DomainError::AccountNotFound { id: 99 })));
    assert!(matches!(
        svc.update(
            99,
            AccountPatch {
                first_name: Some("X".to_owned()),
                ..AccountPatch::default()
            }
        )
        .await,
        Err(DomainError::AccountNotFound { id: 99 })
    ));
    assert!(matches!(svc.soft_delete(99).await, Err(DomainError::AccountNotFound { .. })));
    assert!(matches!(svc.restore(99).await, Err(DomainError::AccountNotFound { .. })));
    assert!(matches!(
        svc.permanent_delete(99).await,
        Err(DomainError::AccountNotFound { .. })
    ));
}

#[tokio::test]
async fn update_of_soft_deleted_account_keeps_it_deleted() {
    let ctx = TestContext::new().await;
    let a = ctx.create(new_account(1)).await;
    ctx.services.accounts.soft_delete(a.id).await.unwrap();
    let before = ctx.services.accounts.get(a.id).await.unwrap();

    let updated = ctx
        .services
        .accounts
        .update(
            a.id,
            AccountPatch {
                position: Some(Some("Archivist".to_owned())),
                ..AccountPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.deleted_at, before.deleted_at);
    assert_eq!(updated.position.as_deref(), Some("Archivist"));
}

#[tokio::test]
async fn list_paginates_active_accounts() {
    let ctx = TestContext::new().await;
    for n in 0..15 {
        ctx.create(new_account(n)).await;
    }
    let extra = ctx.create(new_account(100)).await;
    ctx.services.accounts.soft_delete(extra.id).await.unwrap();

    let page = ctx
        .services
        .accounts
        .list(PageRequest::new(2, 10), LifecycleFilter::Active)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.total_items, 15);
    assert!(page.items.iter().all(|a| a.deleted_at.is_none()));

    let past_end = ctx
        .services
        .accounts
        .list(PageRequest::new(5, 10), LifecycleFilter::Active)
        .await
        .unwrap();
    assert!(past_end.items.is_empty());
    assert_eq!(past_end.total_items, 15);
    assert_eq!(past_end.total_pages, 2);

    let trash = ctx
        .services
        .accounts
        .list(PageRequest::default(), LifecycleFilter::SoftDeleted)
        .await
        .unwrap();
    assert_eq!(trash.total_items, 1);
    assert_eq!(trash.items[0].id, extra.id);
}

#[tokio::test]
async fn list_rejects_zero_page_and_clamps_limit() {
    let ctx = TestContext::with_config(ServiceConfig {
        max_page_size: 3,
        ..ServiceConfig::default()
    })
    .await;
    for n in 0..5 {
        ctx.create(new_account(n)).await;
    }

    let err = ctx
        .services
        .accounts
        .list(PageRequest::new(0, 10), LifecycleFilter::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidPagination { page: 0, .. }));

    let page = ctx
        .services
        .accounts
        .list(PageRequest::new(1, 50), LifecycleFilter::Active)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn purge_respects_retention_boundary() {
    let retention = Duration::from_secs(72 * 60 * 60);
    let ctx = TestContext::with_config(ServiceConfig {
        retention,
        ..ServiceConfig::default()
    })
    .await;
    let now = OffsetDateTime::now_utc();
    let window = time::Duration::try_from(retention).unwrap();

    let expired = ctx.create(new_account(1)).await;
    let kept = ctx.create(new_account(2)).await;
    let active = ctx.create(new_account(3)).await;
    ctx.set_deleted_at(
        expired.id,
        now.checked_sub(window + time::Duration::seconds(1)).unwrap(),
    )
    .await;
    ctx.set_deleted_at(
        kept.id,
        now.checked_sub(window - time::Duration::seconds(1)).unwrap(),
    )
    .await;

    let report = ctx.services.accounts.purge_expired(now).await.unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.purged, 1);
    assert_eq!(report.failed, 0);

    assert!(ctx.services.accounts.get(expired.id).await.is_err());
    assert!(ctx.services.accounts.get(kept.id).await.is_ok());
    assert!(ctx.services.accounts.get(active.id).await.is_ok());
}

#[tokio::test]
async fn purge_compares_instants_within_the_cutoff_second() {
    let retention = Duration::from_secs(72 * 60 * 60);
    let ctx = TestContext::with_config(ServiceConfig {
        retention,
        ..ServiceConfig::default()
    })
    .await;
    let cutoff = datetime!(2026-10-17 19:02:20.5 UTC);
    let now = cutoff + time::Duration::try_from(retention).unwrap();

    let whole_second = ctx.create(new_account(1)).await;
    let at_cutoff = ctx.create(new_account(2)).await;
    let just_after = ctx.create(new_account(3)).await;
    ctx.set_deleted_at(whole_second.id, datetime!(2026-10-17 19:02:20 UTC))
        .await;
    ctx.set_deleted_at(at_cutoff.id, cutoff).await;
    ctx.set_deleted_at(just_after.id, datetime!(2026-10-17 19:02:20.501 UTC))
        .await;

    let report = ctx.services.accounts.purge_expired(now).await.unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.purged, 1);

    assert!(ctx.services.accounts.get(whole_second.id).await.is_err());
    assert!(ctx.services.accounts.get(at_cutoff.id).await.is_ok());
    assert!(ctx.services.accounts.get(just_after.id).await.is_ok());
}

#[tokio::test]
async fn purge_releases_email_and_phones() {
    let ctx = TestContext::new().await;
    let a = ctx
        .create(with_phones(1, [Some("9991234567"), None, None]))
        .await;
    ctx.services.accounts.soft_delete(a.id).await.unwrap();
    ctx.services.accounts.permanent_delete(a.id).await.unwrap();

    let again = ctx
        .create(with_phones(1, [None, None, Some("89991234567")]))
        .await;
    assert_ne!(again.id, a.id);
    assert_eq!(again.phone_3.as_deref(), Some("+79991234567"));
}
