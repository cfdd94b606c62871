#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The in-process `ContactsApi` client and its public error mapping.

use std::sync::Arc;

use contacts::{Contacts, ContactsConfig};
use contacts_sdk::{
    AccountPatch, AccountState, ContactsApi, ContactsError, LifecycleFilter, NewAccount,
    NewCompany, PageRequest,
};

mod support;
use support::{inmem_db, new_account, with_phones};

async fn client() -> Arc<dyn ContactsApi> {
    Contacts::init(inmem_db().await, ContactsConfig::default())
        .unwrap()
        .client()
}

#[tokio::test]
async fn account_lifecycle_through_client() {
    let api = client().await;
    let created = api.create_account(new_account(1)).await.unwrap();
    assert_eq!(created.state(), AccountState::Active);

    api.delete_account(created.id, false).await.unwrap();
    let trash = api
        .list_accounts(PageRequest::default(), LifecycleFilter::SoftDeleted)
        .await
        .unwrap();
    assert_eq!(trash.total_items, 1);

    let restored = api.restore_account(created.id).await.unwrap();
    assert_eq!(restored, created);

    let err = api.delete_account(created.id, true).await.unwrap_err();
    assert!(matches!(
        err,
        ContactsError::InvalidLifecycleTransition { id, .. } if id == created.id
    ));
}

#[tokio::test]
async fn rejections_use_public_variants() {
    let api = client().await;
    api.create_account(with_phones(1, [Some("9991234567"), None, None]))
        .await
        .unwrap();

    let err = api
        .create_account(NewAccount {
            email: "broken@".to_owned(),
            ..new_account(2)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ContactsError::InvalidEmailFormat { .. }));
    assert!(err.is_validation());

    let err = api
        .create_account(with_phones(3, [Some("+7 999 123 45 67"), None, None]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ContactsError::InvalidPhoneFormat { ref reason } if reason.contains("+79991234567")
    ));

    let err = api
        .create_account(NewAccount {
            last_name: " ".to_owned(),
            email: String::new(),
            ..new_account(4)
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ContactsError::EmptyRequiredFields {
            fields: "last_name, email".to_owned()
        }
    );

    let err = api
        .update_account(
            42,
            AccountPatch {
                first_name: Some("X".to_owned()),
                ..AccountPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, ContactsError::account_not_found(42));
    assert!(!err.is_validation());
}

#[tokio::test]
async fn companies_through_client() {
    let api = client().await;
    let company = api
        .create_company(NewCompany {
            name: "Acme".to_owned(),
            address: None,
        })
        .await
        .unwrap();
    api.create_account(NewAccount {
        company_id: Some(company.id),
        ..new_account(1)
    })
    .await
    .unwrap();

    let employees = api
        .list_employees(company.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(employees.total_items, 1);

    let err = api.delete_company(company.id).await.unwrap_err();
    assert_eq!(
        err,
        ContactsError::CompanyInUse {
            id: company.id,
            accounts: 1
        }
    );
    assert_eq!(api.get_company(company.id).await.unwrap(), company);
    assert_eq!(
        api.list_companies(PageRequest::default())
            .await
            .unwrap()
            .items,
        vec![company]
    );
}
