//! Book registration and loan endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{Book, BookLoanRequest, BookReturnRequest, BookStat, CreateBook, LoanHistory},
    AppState,
};

/// List registered books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "Registered books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list_books().await?;
    Ok(Json(books))
}

/// Register a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book registered", body = Book),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn save_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state.services.books.save_book(request).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Loan a book to a user
#[utoipa::path(
    post,
    path = "/books/loan",
    tag = "books",
    request_body = BookLoanRequest,
    responses(
        (status = 201, description = "Book loaned", body = LoanHistory),
        (status = 400, description = "Book already loaned", body = ErrorResponse),
        (status = 404, description = "User or book not found", body = ErrorResponse)
    )
)]
pub async fn loan_book(
    State(state): State<AppState>,
    Json(request): Json<BookLoanRequest>,
) -> AppResult<(StatusCode, Json<LoanHistory>)> {
    let history = state.services.books.loan_book(request).await?;
    Ok((StatusCode::CREATED, Json(history)))
}

/// Return a loaned book
#[utoipa::path(
    put,
    path = "/books/return",
    tag = "books",
    request_body = BookReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = LoanHistory),
        (status = 404, description = "User or outstanding loan not found", body = ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    Json(request): Json<BookReturnRequest>,
) -> AppResult<Json<LoanHistory>> {
    let history = state.services.books.return_book(request).await?;
    Ok(Json(history))
}

/// Number of books currently on loan
#[utoipa::path(
    get,
    path = "/books/loan",
    tag = "books",
    responses(
        (status = 200, description = "Count of outstanding loans", body = i64)
    )
)]
pub async fn count_loaned_books(State(state): State<AppState>) -> AppResult<Json<i64>> {
    let count = state.services.books.count_loaned_books().await?;
    Ok(Json(count))
}

/// Book count per category
#[utoipa::path(
    get,
    path = "/books/stat",
    tag = "books",
    responses(
        (status = 200, description = "Categories with their book count", body = Vec<BookStat>)
    )
)]
pub async fn get_book_statistics(State(state): State<AppState>) -> AppResult<Json<Vec<BookStat>>> {
    let stats = state.services.books.get_book_statistics().await?;
    Ok(Json(stats))
}
