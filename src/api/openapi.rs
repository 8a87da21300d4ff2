//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library App API",
        version = "1.0.0",
        description = "Book registration, loans and user loan history REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::save_book,
        books::loan_book,
        books::return_book,
        books::count_loaned_books,
        books::get_book_statistics,
        // Users
        users::get_users,
        users::get_user,
        users::save_user,
        users::update_user,
        users::delete_user,
        users::get_user_loan_histories,
        users::get_user_loan_history,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::BookCategory,
            crate::models::book::BookStat,
            crate::models::book::CreateBook,
            // Loans
            crate::models::loan_history::LoanHistory,
            crate::models::loan_history::LoanStatus,
            crate::models::loan_history::BookLoanRequest,
            crate::models::loan_history::BookReturnRequest,
            crate::models::loan_history::BookHistoryResponse,
            crate::models::loan_history::UserLoanHistoryResponse,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book registration and loans"),
        (name = "users", description = "User management and loan history")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
