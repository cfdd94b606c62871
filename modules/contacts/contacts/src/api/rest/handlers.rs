use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use contacts_sdk::{AccountId, CompanyId, LifecycleFilter, PageRequest};
use utoipa::OpenApi;

use super::dto::{
    AccountDto, AccountListQuery, AccountPageDto, CompanyDto, CompanyPageDto, CreateAccountReq,
    CreateCompanyReq, CreatedDto, DeleteQuery, ErrorDto, PageQuery, StatusDto, UpdateAccountReq,
    UpdateCompanyReq,
};
use super::error::ApiResult;
use super::ApiDoc;
use crate::module::ConcreteAppServices;

fn page_request(page: Option<u64>, limit: Option<u64>) -> PageRequest {
    PageRequest {
        page: page.unwrap_or(1),
        limit,
    }
}

// Accounts

#[utoipa::path(
    get,
    path = "/contacts/v1/accounts",
    params(AccountListQuery),
    responses((status = 200, body = AccountPageDto), (status = 400, body = ErrorDto)),
    tag = "Accounts",
)]
pub async fn list_accounts(
    Extension(svc): Extension<ConcreteAppServices>,
    query: Result<Query<AccountListQuery>, QueryRejection>,
) -> ApiResult<Json<AccountPageDto>> {
    let Query(q) = query?;
    let filter = LifecycleFilter::from_include_deleted(q.deleted.unwrap_or(false));
    let page = svc
        .accounts
        .list(page_request(q.page, q.limit), filter)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/contacts/v1/accounts",
    request_body = CreateAccountReq,
    responses((status = 201, body = CreatedDto), (status = 400, body = ErrorDto), (status = 409, body = ErrorDto)),
    tag = "Accounts",
)]
pub async fn create_account(
    Extension(svc): Extension<ConcreteAppServices>,
    body: Result<Json<CreateAccountReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body?;
    let account = svc.accounts.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(CreatedDto { id: account.id })))
}

#[utoipa::path(
    get,
    path = "/contacts/v1/accounts/{id}",
    params(("id" = i32, Path, description = "Account id")),
    responses((status = 200, body = AccountDto), (status = 404, body = ErrorDto)),
    tag = "Accounts",
)]
pub async fn get_account(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<AccountId>, PathRejection>,
) -> ApiResult<Json<AccountDto>> {
    let Path(id) = id?;
    let account = svc.accounts.get(id).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    put,
    path = "/contacts/v1/accounts/{id}",
    params(("id" = i32, Path, description = "Account id")),
    request_body = UpdateAccountReq,
    responses((status = 200, body = AccountDto), (status = 400, body = ErrorDto), (status = 404, body = ErrorDto), (status = 409, body = ErrorDto)),
    tag = "Accounts",
)]
pub async fn update_account(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<AccountId>, PathRejection>,
    body: Result<Json<UpdateAccountReq>, JsonRejection>,
) -> ApiResult<Json<AccountDto>> {
    let Path(id) = id?;
    let Json(req) = body?;
    let account = svc.accounts.update(id, req.into()).await?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    delete,
    path = "/contacts/v1/accounts/{id}",
    params(("id" = i32, Path, description = "Account id"), DeleteQuery),
    responses((status = 200, body = StatusDto), (status = 404, body = ErrorDto), (status = 409, body = ErrorDto)),
    tag = "Accounts",
)]
pub async fn delete_account(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<AccountId>, PathRejection>,
    query: Result<Query<DeleteQuery>, QueryRejection>,
) -> ApiResult<Json<StatusDto>> {
    let Path(id) = id?;
    let Query(q) = query?;
    let permanent = q.permanent.unwrap_or(false);
    svc.accounts.delete(id, permanent).await?;
    let message = if permanent {
        "Account permanently deleted"
    } else {
        "Account moved to trash"
    };
    Ok(Json(StatusDto::ok(message)))
}

#[utoipa::path(
    post,
    path = "/contacts/v1/accounts/{id}/restore",
    params(("id" = i32, Path, description = "Account id")),
    responses((status = 200, body = StatusDto), (status = 404, body = ErrorDto), (status = 409, body = ErrorDto)),
    tag = "Accounts",
)]
pub async fn restore_account(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<AccountId>, PathRejection>,
) -> ApiResult<Json<StatusDto>> {
    let Path(id) = id?;
    svc.accounts.restore(id).await?;
    Ok(Json(StatusDto::ok("Account restored")))
}

// Companies

#[utoipa::path(
    get,
    path = "/contacts/v1/companies",
    params(PageQuery),
    responses((status = 200, body = CompanyPageDto), (status = 400, body = ErrorDto)),
    tag = "Companies",
)]
pub async fn list_companies(
    Extension(svc): Extension<ConcreteAppServices>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<CompanyPageDto>> {
    let Query(q) = query?;
    let page = svc.companies.list(page_request(q.page, q.limit)).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    post,
    path = "/contacts/v1/companies",
    request_body = CreateCompanyReq,
    responses((status = 201, body = CreatedDto), (status = 400, body = ErrorDto), (status = 409, body = ErrorDto)),
    tag = "Companies",
)]
pub async fn create_company(
    Extension(svc): Extension<ConcreteAppServices>,
    body: Result<Json<CreateCompanyReq>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body?;
    let company = svc.companies.create(req.into()).await?;
    Ok((StatusCode::CREATED, Json(CreatedDto { id: company.id })))
}

#[utoipa::path(
    get,
    path = "/contacts/v1/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    responses((status = 200, body = CompanyDto), (status = 404, body = ErrorDto)),
    tag = "Companies",
)]
pub async fn get_company(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<CompanyId>, PathRejection>,
) -> ApiResult<Json<CompanyDto>> {
    let Path(id) = id?;
    let company = svc.companies.get(id).await?;
    Ok(Json(company.into()))
}

#[utoipa::path(
    put,
    path = "/contacts/v1/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    request_body = UpdateCompanyReq,
    responses((status = 200, body = CompanyDto), (status = 400, body = ErrorDto), (status = 404, body = ErrorDto), (status = 409, body = ErrorDto)),
    tag = "Companies",
)]
pub async fn update_company(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<CompanyId>, PathRejection>,
    body: Result<Json<UpdateCompanyReq>, JsonRejection>,
) -> ApiResult<Json<CompanyDto>> {
    let Path(id) = id?;
    let Json(req) = body?;
    let company = svc.companies.update(id, req.into()).await?;
    Ok(Json(company.into()))
}

#[utoipa::path(
    delete,
    path = "/contacts/v1/companies/{id}",
    params(("id" = i32, Path, description = "Company id")),
    responses((status = 200, body = StatusDto), (status = 404, body = ErrorDto), (status = 409, body = ErrorDto)),
    tag = "Companies",
)]
pub async fn delete_company(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<CompanyId>, PathRejection>,
) -> ApiResult<Json<StatusDto>> {
    let Path(id) = id?;
    svc.companies.delete(id).await?;
    Ok(Json(StatusDto::ok("Company deleted")))
}

#[utoipa::path(
    get,
    path = "/contacts/v1/companies/{id}/employees",
    params(("id" = i32, Path, description = "Company id"), PageQuery),
    responses((status = 200, body = AccountPageDto), (status = 404, body = ErrorDto)),
    tag = "Companies",
)]
pub async fn list_employees(
    Extension(svc): Extension<ConcreteAppServices>,
    id: Result<Path<CompanyId>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<AccountPageDto>> {
    let Path(id) = id?;
    let Query(q) = query?;
    let page = svc
        .companies
        .employees(id, page_request(q.page, q.limit))
        .await?;
    Ok(Json(page.into()))
}

#[allow(clippy::unused_async)]
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
