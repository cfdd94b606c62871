use async_trait::async_trait;
use contacts_sdk::{Company, CompanyId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::domain::error::DomainError;
use crate::domain::repos::{CompaniesRepository, CompanyFields};
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::company::{
    ActiveModel as CompanyAM, Column, Entity as CompanyEntity,
};

/// ORM-based implementation of the `CompaniesRepository` trait.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrmCompaniesRepository;

impl OrmCompaniesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn active_model(fields: &CompanyFields) -> CompanyAM {
    CompanyAM {
        id: NotSet,
        name: Set(fields.name.clone()),
        address: Set(fields.address.clone()),
    }
}

#[async_trait]
impl CompaniesRepository for OrmCompaniesRepository {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: CompanyId,
    ) -> Result<Option<Company>, DomainError> {
        let found = CompanyEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn name_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name: &str,
        exclude: Option<CompanyId>,
    ) -> Result<bool, DomainError> {
        let mut cond = Condition::all().add(Column::Name.eq(name));
        if let Some(id) = exclude {
            cond = cond.add(Column::Id.ne(id));
        }
        let count = CompanyEntity::find()
            .filter(cond)
            .count(conn)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        fields: &CompanyFields,
    ) -> Result<CompanyId, DomainError> {
        let inserted = active_model(fields).insert(conn).await.map_err(db_err)?;
        Ok(inserted.id)
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: CompanyId,
        fields: &CompanyFields,
    ) -> Result<bool, DomainError> {
        let result = CompanyEntity::update_many()
            .set(active_model(fields))
            .filter(Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: CompanyId,
    ) -> Result<bool, DomainError> {
        let result = CompanyEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Company>, DomainError> {
        let rows = CompanyEntity::find()
            .order_by_asc(Column::Id)
            .offset(offset)
            .limit(limit)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count<C: ConnectionTrait + Send + Sync>(&self, conn: &C) -> Result<u64, DomainError> {
        CompanyEntity::find().count(conn).await.map_err(db_err)
    }
}
