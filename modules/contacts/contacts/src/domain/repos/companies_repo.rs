use async_trait::async_trait;
use contacts_sdk::{Company, CompanyId};
use sea_orm::ConnectionTrait;

use crate::domain::error::DomainError;

/// Mutable company columns, already sanitized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFields {
    pub name: String,
    pub address: Option<String>,
}

/// Repository trait for Company persistence operations.
#[async_trait]
pub trait CompaniesRepository: Send + Sync {
    async fn find_by_id<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: CompanyId,
    ) -> Result<Option<Company>, DomainError>;

    /// Whether a company other than `exclude` already uses this name.
    async fn name_exists<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        name: &str,
        exclude: Option<CompanyId>,
    ) -> Result<bool, DomainError>;

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        fields: &CompanyFields,
    ) -> Result<CompanyId, DomainError>;

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: CompanyId,
        fields: &CompanyFields,
    ) -> Result<bool, DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: CompanyId,
    ) -> Result<bool, DomainError>;

    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Company>, DomainError>;

    async fn count<C: ConnectionTrait + Send + Sync>(&self, conn: &C) -> Result<u64, DomainError>;
}
