use contacts_sdk::{
    Account, AccountId, AccountPatch, Company, CompanyId, CompanyPatch, NewAccount, NewCompany,
    Page,
};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

/// Distinguish an absent key (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

/// REST DTO for account representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountDto {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company_id: Option<CompanyId>,
    pub position: Option<String>,
    pub phone_1: Option<String>,
    pub phone_2: Option<String>,
    pub phone_3: Option<String>,
    /// `active` or `soft_deleted`
    pub state: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

/// REST DTO for creating an account. Missing text fields count as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAccountReq {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone_1: Option<String>,
    #[serde(default)]
    pub phone_2: Option<String>,
    #[serde(default)]
    pub phone_3: Option<String>,
}

/// REST DTO for updating an account (partial). `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAccountReq {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub company_id: Option<Option<CompanyId>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub position: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_1: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_2: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone_3: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyDto {
    pub id: CompanyId,
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCompanyReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateCompanyReq {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
}

/// Id of a newly created resource.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedDto {
    pub id: i32,
}

/// Outcome of a lifecycle action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusDto {
    pub success: bool,
    pub message: String,
}

impl StatusDto {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationDto {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AccountPageDto {
    pub items: Vec<AccountDto>,
    pub pagination: PaginationDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyPageDto {
    pub items: Vec<CompanyDto>,
    pub pagination: PaginationDto,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDto {
    pub success: bool,
    pub error: String,
    pub error_code: u16,
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default and maximum come from configuration)
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// List soft-deleted accounts instead of active ones
    pub deleted: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteQuery {
    /// Purge instead of soft delete; only allowed on soft-deleted accounts
    pub permanent: Option<bool>,
}

// Conversion implementations between REST DTOs and contract models
impl From<Account> for AccountDto {
    fn from(a: Account) -> Self {
        let state = a.state().as_str().to_owned();
        Self {
            id: a.id,
            first_name: a.first_name,
            last_name: a.last_name,
            email: a.email,
            company_id: a.company_id,
            position: a.position,
            phone_1: a.phone_1,
            phone_2: a.phone_2,
            phone_3: a.phone_3,
            state,
            deleted_at: a.deleted_at,
        }
    }
}

impl From<CreateAccountReq> for NewAccount {
    fn from(req: CreateAccountReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            company_id: req.company_id,
            position: req.position,
            phone_1: req.phone_1,
            phone_2: req.phone_2,
            phone_3: req.phone_3,
        }
    }
}

impl From<UpdateAccountReq> for AccountPatch {
    fn from(req: UpdateAccountReq) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            company_id: req.company_id,
            position: req.position,
            phone_1: req.phone_1,
            phone_2: req.phone_2,
            phone_3: req.phone_3,
        }
    }
}

impl From<Company> for CompanyDto {
    fn from(c: Company) -> Self {
        Self {
            id: c.id,
            name: c.name,
            address: c.address,
        }
    }
}

impl From<CreateCompanyReq> for NewCompany {
    fn from(req: CreateCompanyReq) -> Self {
        Self {
            name: req.name,
            address: req.address,
        }
    }
}

impl From<UpdateCompanyReq> for CompanyPatch {
    fn from(req: UpdateCompanyReq) -> Self {
        Self {
            name: req.name,
            address: req.address,
        }
    }
}

fn pagination<T>(page: &Page<T>) -> PaginationDto {
    PaginationDto {
        current_page: page.current_page,
        total_pages: page.total_pages,
        total_items: page.total_items,
    }
}

impl From<Page<Account>> for AccountPageDto {
    fn from(page: Page<Account>) -> Self {
        let pagination = pagination(&page);
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}

impl From<Page<Company>> for CompanyPageDto {
    fn from(page: Page<Company>) -> Self {
        let pagination = pagination(&page);
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            pagination,
        }
    }
}
