use std::sync::Arc;

use contacts_sdk::{Account, Company, CompanyId, CompanyPatch, NewCompany, Page, PageRequest};
use sea_orm::{DatabaseConnection, TransactionTrait};

use super::{bounded, ServiceConfig};
use crate::domain::error::{DomainError, UniqueTarget};
use crate::domain::normalize::{sanitize_optional, sanitize_text};
use crate::domain::repos::{AccountsRepository, CompaniesRepository, CompanyFields};

/// Company CRUD. Names are unique; a company cannot be deleted while any
/// account, active or soft-deleted, still references it.
pub struct CompaniesService<CR, AR> {
    repo: Arc<CR>,
    accounts: Arc<AR>,
    db: DatabaseConnection,
    config: ServiceConfig,
}

impl<CR, AR> CompaniesService<CR, AR>
where
    CR: CompaniesRepository,
    AR: AccountsRepository,
{
    pub fn new(
        repo: Arc<CR>,
        accounts: Arc<AR>,
        db: DatabaseConnection,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            accounts,
            db,
            config,
        }
    }

    /// # Errors
    /// `CompanyNotFound`, or a storage failure.
    pub async fn get(&self, id: CompanyId) -> Result<Company, DomainError> {
        tracing::debug!(company_id = id, "Getting company by id");
        bounded(self.config.store_timeout, "get_company", async {
            self.repo
                .find_by_id(&self.db, id)
                .await?
                .ok_or_else(|| DomainError::company_not_found(id))
        })
        .await
    }

    /// # Errors
    /// `EmptyRequiredFields`, `CompanyNameExists`, or a storage failure.
    pub async fn create(&self, new_company: NewCompany) -> Result<Company, DomainError> {
        tracing::info!("Creating new company");

        let fields = validate_fields(CompanyFields {
            name: sanitize_text(&new_company.name),
            address: sanitize_optional(new_company.address.as_deref()),
        })?;

        let company = bounded(self.config.store_timeout, "create_company", async {
            let txn = self.db.begin().await?;
            if self.repo.name_exists(&txn, &fields.name, None).await? {
                return Err(name_taken(&fields));
            }
            let id = self
                .repo
                .insert(&txn, &fields)
                .await
                .map_err(|e| remap_conflict(e, &fields))?;
            txn.commit()
                .await
                .map_err(|e| remap_conflict(e.into(), &fields))?;
            Ok(Company {
                id,
                name: fields.name.clone(),
                address: fields.address.clone(),
            })
        })
        .await?;

        tracing::info!(company_id = company.id, "Successfully created company");
        Ok(company)
    }

    /// # Errors
    /// `CompanyNotFound`, `EmptyRequiredFields`, `CompanyNameExists`, or a
    /// storage failure.
    pub async fn update(&self, id: CompanyId, patch: CompanyPatch) -> Result<Company, DomainError> {
        tracing::info!(company_id = id, "Updating company");

        let company = bounded(self.config.store_timeout, "update_company", async {
            let txn = self.db.begin().await?;
            let current = self
                .repo
                .find_by_id(&txn, id)
                .await?
                .ok_or_else(|| DomainError::company_not_found(id))?;

            let fields = validate_fields(CompanyFields {
                name: patch.name.map_or(current.name, |v| sanitize_text(&v)),
                address: match patch.address {
                    Some(value) => sanitize_optional(value.as_deref()),
                    None => current.address,
                },
            })?;

            if self.repo.name_exists(&txn, &fields.name, Some(id)).await? {
                return Err(name_taken(&fields));
            }
            if !self
                .repo
                .update(&txn, id, &fields)
                .await
                .map_err(|e| remap_conflict(e, &fields))?
            {
                return Err(DomainError::company_not_found(id));
            }
            txn.commit()
                .await
                .map_err(|e| remap_conflict(e.into(), &fields))?;
            Ok(Company {
                id,
                name: fields.name,
                address: fields.address,
            })
        })
        .await?;

        tracing::info!(company_id = id, "Successfully updated company");
        Ok(company)
    }

    /// # Errors
    /// `CompanyNotFound`, `CompanyInUse`, or a storage failure.
    pub async fn delete(&self, id: CompanyId) -> Result<(), DomainError> {
        tracing::info!(company_id = id, "Deleting company");

        bounded(self.config.store_timeout, "delete_company", async {
            let txn = self.db.begin().await?;
            if self.repo.find_by_id(&txn, id).await?.is_none() {
                return Err(DomainError::company_not_found(id));
            }
            let accounts = self.accounts.count_by_company(&txn, id, false).await?;
            if accounts > 0 {
                return Err(DomainError::CompanyInUse { id, accounts });
            }
            if !self.repo.delete(&txn, id).await? {
                return Err(DomainError::company_not_found(id));
            }
            txn.commit().await.map_err(DomainError::from)
        })
        .await?;

        tracing::info!(company_id = id, "Successfully deleted company");
        Ok(())
    }

    /// # Errors
    /// `InvalidPagination`, or a storage failure.
    pub async fn list(&self, req: PageRequest) -> Result<Page<Company>, DomainError> {
        tracing::debug!(page = req.page, "Listing companies");
        let window = self.config.page_window(req)?;

        bounded(self.config.store_timeout, "list_companies", async {
            let items = self
                .repo
                .list_page(&self.db, window.offset, window.limit)
                .await?;
            let total_items = self.repo.count(&self.db).await?;
            Ok(Page {
                items,
                current_page: window.page,
                total_pages: window.total_pages(total_items),
                total_items,
            })
        })
        .await
    }

    /// Active accounts affiliated with a company.
    ///
    /// # Errors
    /// `InvalidPagination`, `CompanyNotFound`, or a storage failure.
    pub async fn employees(
        &self,
        id: CompanyId,
        req: PageRequest,
    ) -> Result<Page<Account>, DomainError> {
        tracing::debug!(company_id = id, page = req.page, "Listing employees");
        let window = self.config.page_window(req)?;

        bounded(self.config.store_timeout, "list_employees", async {
            if self.repo.find_by_id(&self.db, id).await?.is_none() {
                return Err(DomainError::company_not_found(id));
            }
            let items = self
                .accounts
                .list_by_company(&self.db, id, window.offset, window.limit)
                .await?;
            let total_items = self.accounts.count_by_company(&self.db, id, true).await?;
            Ok(Page {
                items,
                current_page: window.page,
                total_pages: window.total_pages(total_items),
                total_items,
            })
        })
        .await
    }
}

fn validate_fields(fields: CompanyFields) -> Result<CompanyFields, DomainError> {
    if fields.name.is_empty() {
        return Err(DomainError::EmptyRequiredFields {
            fields: vec!["name"],
        });
    }
    Ok(fields)
}

fn name_taken(fields: &CompanyFields) -> DomainError {
    DomainError::CompanyNameExists {
        name: fields.name.clone(),
    }
}

fn remap_conflict(err: DomainError, fields: &CompanyFields) -> DomainError {
    match err {
        DomainError::UniqueViolation {
            target: UniqueTarget::CompanyName,
            ..
        } => name_taken(fields),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_rejected() {
        let err = validate_fields(CompanyFields {
            name: String::new(),
            address: None,
        })
        .unwrap_err();
        assert!(matches!(err, DomainError::EmptyRequiredFields { fields } if fields == ["name"]));
    }

    #[test]
    fn name_violation_remapped() {
        let fields = CompanyFields {
            name: "Acme".to_owned(),
            address: None,
        };
        let err = remap_conflict(
            DomainError::UniqueViolation {
                target: UniqueTarget::CompanyName,
                constraint: "companies.name".to_owned(),
            },
            &fields,
        );
        assert!(matches!(err, DomainError::CompanyNameExists { name } if name == "Acme"));
    }
}
