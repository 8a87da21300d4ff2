//! API handlers for the library app REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
pub mod users;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books
        .route("/books", get(books::list_books).post(books::save_book))
        .route("/books/loan", get(books::count_loaned_books).post(books::loan_book))
        .route("/books/return", put(books::return_book))
        .route("/books/stat", get(books::get_book_statistics))
        // Users
        .route(
            "/users",
            get(users::get_users)
                .post(users::save_user)
                .delete(users::delete_user),
        )
        .route("/users/loan", get(users::get_user_loan_histories))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        .route("/users/:id/loans", get(users::get_user_loan_history))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

