//! REST transport: thin axum handlers over the domain services.
//!
//! Errors render as `{success:false, error, errorCode, kind}` using the
//! catalog in `crate::errors`.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Contacts directory API"),
    paths(
        handlers::list_accounts,
        handlers::create_account,
        handlers::get_account,
        handlers::update_account,
        handlers::delete_account,
        handlers::restore_account,
        handlers::list_companies,
        handlers::create_company,
        handlers::get_company,
        handlers::update_company,
        handlers::delete_company,
        handlers::list_employees,
    ),
    components(schemas(
        dto::AccountDto,
        dto::CreateAccountReq,
        dto::UpdateAccountReq,
        dto::AccountPageDto,
        dto::CompanyDto,
        dto::CreateCompanyReq,
        dto::UpdateCompanyReq,
        dto::CompanyPageDto,
        dto::PaginationDto,
        dto::CreatedDto,
        dto::StatusDto,
        dto::ErrorDto,
    )),
    tags((name = "Accounts"), (name = "Companies"))
)]
pub struct ApiDoc;
