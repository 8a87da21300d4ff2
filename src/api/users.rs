//! User management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{CreateUser, DeleteUserQuery, UpdateUser, User, UserLoanHistoryResponse},
    AppState,
};

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "List of users", body = Vec<User>)
    )
)]
pub async fn get_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.get_users().await?;
    Ok(Json(users))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = state.services.users.get_user(id).await?;
    Ok(Json(user))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn save_user(
    State(state): State<AppState>,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let created = state.services.users.save_user(user).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<UpdateUser>,
) -> AppResult<Json<User>> {
    let updated = state.services.users.update_user(id, update).await?;
    Ok(Json(updated))
}

/// Delete a user by name
#[utoipa::path(
    delete,
    path = "/users",
    tag = "users",
    params(DeleteUserQuery),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Query(query): Query<DeleteUserQuery>,
) -> AppResult<StatusCode> {
    state.services.users.delete_user(&query.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Loan history of every user
#[utoipa::path(
    get,
    path = "/users/loan",
    tag = "users",
    responses(
        (status = 200, description = "Loan history per user", body = Vec<UserLoanHistoryResponse>)
    )
)]
pub async fn get_user_loan_histories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserLoanHistoryResponse>>> {
    let reports = state.services.users.get_user_loan_histories().await?;
    Ok(Json(reports))
}

/// Loan history of one user
#[utoipa::path(
    get,
    path = "/users/{id}/loans",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's loan history", body = UserLoanHistoryResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user_loan_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserLoanHistoryResponse>> {
    let report = state.services.users.get_user_loan_history(id).await?;
    Ok(Json(report))
}
