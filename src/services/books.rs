//! Book registration and loan service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        Book, BookLoanRequest, BookReturnRequest, BookStat, CreateBook, LoanHistory, LoanStatus,
        NewLoanHistory,
    },
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn LibraryStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Register a new book
    pub async fn save_book(&self, request: CreateBook) -> AppResult<Book> {
        request.validate()?;

        let mut uow = self.store.begin().await?;
        let book = uow.insert_book(&request).await?;
        uow.commit().await?;

        tracing::info!("Registered book id={} category={}", book.id, book.category);
        Ok(book)
    }

    /// List every registered book
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        let mut uow = self.store.begin().await?;
        uow.list_books().await
    }

    /// Loan a book to a user.
    ///
    /// The "already loaned" check and the insert run in one unit of work but
    /// nothing locks the book in between. On PostgreSQL two concurrent loans
    /// of the same book may both succeed.
    pub async fn loan_book(&self, request: BookLoanRequest) -> AppResult<LoanHistory> {
        request.validate()?;

        let mut uow = self.store.begin().await?;

        let book = uow
            .find_book_by_name(&request.book_name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Book with name {} not found", request.book_name))
            })?;

        if uow.loan_history_exists(&book.name, LoanStatus::Loaned).await? {
            return Err(AppError::Validation(format!(
                "Book {} is already loaned",
                book.name
            )));
        }

        let user = uow
            .find_user_by_name(&request.user_name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with name {} not found", request.user_name))
            })?;

        let history = uow
            .insert_loan_history(&NewLoanHistory::loaned(user.id, book.name))
            .await?;
        uow.commit().await?;

        tracing::info!(
            "Book {:?} loaned to user id={} (history id={})",
            history.book_name,
            user.id,
            history.id
        );
        Ok(history)
    }

    /// Return a book loaned by a user
    pub async fn return_book(&self, request: BookReturnRequest) -> AppResult<LoanHistory> {
        request.validate()?;

        let mut uow = self.store.begin().await?;

        let user = uow
            .find_user_by_name(&request.user_name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with name {} not found", request.user_name))
            })?;

        let loan = uow
            .find_loan_history(user.id, &request.book_name, LoanStatus::Loaned)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "No outstanding loan of {} for user {}",
                    request.book_name, request.user_name
                ))
            })?;

        let history = uow.update_loan_status(loan.id, LoanStatus::Returned).await?;
        uow.commit().await?;

        tracing::info!(
            "Book {:?} returned by user id={} (history id={})",
            history.book_name,
            user.id,
            history.id
        );
        Ok(history)
    }

    /// Count books currently out on loan
    pub async fn count_loaned_books(&self) -> AppResult<i64> {
        let mut uow = self.store.begin().await?;
        uow.count_loan_histories(LoanStatus::Loaned).await
    }

    /// Count registered books per category
    pub async fn get_book_statistics(&self) -> AppResult<Vec<BookStat>> {
        let mut uow = self.store.begin().await?;
        uow.count_books_by_category().await
    }
}
