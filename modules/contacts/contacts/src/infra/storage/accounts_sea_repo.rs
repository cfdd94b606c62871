use async_trait::async_trait;
use contacts_sdk::{Account, AccountId, CompanyId, LifecycleFilter};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::domain::error::DomainError;
use crate::domain::normalize::CanonicalPhone;
use crate::domain::repos::{AccountFields, AccountsRepository};
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::account::{
    ActiveModel as AccountAM, Column, Entity as AccountEntity,
};
use crate::infra::storage::entity::account_phone::{
    self, ActiveModel as PhoneAM, Entity as PhoneEntity,
};

/// ORM-based implementation of the `AccountsRepository` trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrmAccountsRepository;

impl OrmAccountsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn lifecycle_condition(filter: LifecycleFilter) -> Condition {
    match filter {
        LifecycleFilter::Active => Condition::all().add(Column::DeletedAt.is_null()),
        LifecycleFilter::SoftDeleted => Condition::all().add(Column::DeletedAt.is_not_null()),
    }
}

fn excluding(cond: Condition, exclude: Option<AccountId>) -> Condition {
    match exclude {
        Some(id) => cond.add(Column::Id.ne(id)),
        None => cond,
    }
}

fn active_model(fields: &AccountFields) -> AccountAM {
    let [phone_1, phone_2, phone_3] = fields
        .phones
        .each_ref()
        .map(|p| p.as_ref().map(|p| p.as_str().to_owned()));
    AccountAM {
        id: NotSet,
        first_name: Set(fields.first_name.clone()),
        last_name: Set(fields.last_name.clone()),
        email: Set(fields.email.clone()),
        company_id: Set(fields.company_id),
        position: Set(fields.position.clone()),
        phone_1: Set(phone_1),
        phone_2: Set(phone_2),
        phone_3: Set(phone_3),
        deleted_at: NotSet,
    }
}

async fn write_phone_index<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: AccountId,
    fields: &AccountFields,
) -> Result<(), DomainError> {
    PhoneEntity::delete_many()
        .filter(account_phone::Column::AccountId.eq(id))
        .exec(conn)
        .await
        .map_err(db_err)?;

    for (slot, phone) in fields.present_phones() {
        let m = PhoneAM {
            phone: Set(phone.as_str().to_owned()),
            account_id: Set(id),
            slot: Set(i16::from(slot)),
        };
        let _ = m.insert(conn).await.map_err(db_err)?;
    }
    Ok(())
}

#[async_trait]
impl AccountsRepository for OrmAccountsRepository {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
    ) -> Result<Option<Account>, DomainError> {
        let found = AccountEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn email_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        email: &str,
        exclude: Option<AccountId>,
    ) -> Result<bool, DomainError> {
        let count = AccountEntity::find()
            .filter(excluding(
                Condition::all().add(Column::Email.eq(email)),
                exclude,
            ))
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn phone_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        phone: &CanonicalPhone,
        exclude: Option<AccountId>,
    ) -> Result<bool, DomainError> {
        let any_slot = Condition::any()
            .add(Column::Phone1.eq(phone.as_str()))
            .add(Column::Phone2.eq(phone.as_str()))
            .add(Column::Phone3.eq(phone.as_str()));
        let count = AccountEntity::find()
            .filter(excluding(Condition::all().add(any_slot), exclude))
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        fields: &AccountFields,
    ) -> Result<AccountId, DomainError> {
        let mut m = active_model(fields);
        m.deleted_at = Set(None);
        let inserted = m.insert(conn).await.map_err(db_err)?;
        write_phone_index(conn, inserted.id, fields).await?;
        Ok(inserted.id)
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
        fields: &AccountFields,
    ) -> Result<bool, DomainError> {
        let result = AccountEntity::update_many()
            .set(active_model(fields))
            .filter(Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Ok(false);
        }
        write_phone_index(conn, id, fields).await?;
        Ok(true)
    }

    async fn set_deleted_at<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
        at: Option<OffsetDateTime>,
    ) -> Result<bool, DomainError> {
        let result = AccountEntity::update_many()
            .col_expr(Column::DeletedAt, Expr::value(at))
            .filter(Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: AccountId,
    ) -> Result<bool, DomainError> {
        PhoneEntity::delete_many()
            .filter(account_phone::Column::AccountId.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        let result = AccountEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: LifecycleFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Account>, DomainError> {
        let rows = AccountEntity::find()
            .filter(lifecycle_condition(filter))
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: LifecycleFilter,
    ) -> Result<u64, DomainError> {
        AccountEntity::find()
            .filter(lifecycle_condition(filter))
            .count(conn)
            .await
            .map_err(db_err)
    }

    async fn find_expired<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        cutoff: OffsetDateTime,
    ) -> Result<Vec<AccountId>, DomainError> {
        // SQLite keeps timestamps as text with a variable-width fraction, so
        // `deleted_at < cutoff` in SQL would compare strings. Compare instants here.
        let trashed = AccountEntity::find()
            .select_only()
            .column(Column::Id)
            .column(Column::DeletedAt)
            .filter(Column::DeletedAt.is_not_null())
            .order_by_asc(Column::Id)
            .into_tuple::<(AccountId, OffsetDateTime)>()
            .all(conn)
            .await
            .map_err(db_err)?;

        Ok(trashed
            .into_iter()
            .filter(|(_, deleted_at)| *deleted_at < cutoff)
            .map(|(id, _)| id)
            .collect())
    }

    async fn list_by_company<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: CompanyId,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Account>, DomainError> {
        let rows = AccountEntity::find()
            .filter(
                lifecycle_condition(LifecycleFilter::Active).add(Column::CompanyId.eq(company_id)),
            )
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_company<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        company_id: CompanyId,
        active_only: bool,
    ) -> Result<u64, DomainError> {
        let mut cond = Condition::all().add(Column::CompanyId.eq(company_id));
        if active_only {
            cond = cond.add(Column::DeletedAt.is_null());
        }
        AccountEntity::find()
            .filter(cond)
            .count(conn)
            .await
            .map_err(db_err)
    }
}
