use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers;
use crate::module::ConcreteAppServices;

pub const BASE_PATH: &str = "/contacts/v1";

/// All contacts endpoints under `/contacts/v1`, with the services attached.
pub fn register_routes(router: Router, services: ConcreteAppServices) -> Router {
    let api = Router::new()
        .route(
            "/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/accounts/{id}",
            get(handlers::get_account)
                .put(handlers::update_account)
                .delete(handlers::delete_account),
        )
        .route("/accounts/{id}/restore", post(handlers::restore_account))
        .route(
            "/companies",
            get(handlers::list_companies).post(handlers::create_company),
        )
        .route(
            "/companies/{id}",
            get(handlers::get_company)
                .put(handlers::update_company)
                .delete(handlers::delete_company),
        )
        .route("/companies/{id}/employees", get(handlers::list_employees))
        .route("/openapi.json", get(handlers::openapi_json))
        .layer(Extension(services));

    router.nest(BASE_PATH, api)
}
