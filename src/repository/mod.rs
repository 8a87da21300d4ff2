//! Repository layer for database operations
//!
//! Services never talk to a connection directly: they open a [`UnitOfWork`]
//! through a [`LibraryStore`], run every read and write of one operation on
//! it, then commit. Dropping a unit of work without committing discards its
//! writes.

pub mod books;
pub mod loan_histories;
pub mod memory;
pub mod postgres;
pub mod users;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, BookStat, CreateBook, LoanHistory, LoanStatus, NewLoanHistory, User},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Entry point to a storage backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Open a new unit of work
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}

/// One transaction against the store
#[async_trait]
pub trait UnitOfWork: Send {
    // Books

    async fn insert_book(&mut self, book: &CreateBook) -> AppResult<Book>;

    async fn insert_books(&mut self, books: &[CreateBook]) -> AppResult<Vec<Book>>;

    /// All books in id order
    async fn list_books(&mut self) -> AppResult<Vec<Book>>;

    /// First book (lowest id) with exactly this name
    async fn find_book_by_name(&mut self, name: &str) -> AppResult<Option<Book>>;

    /// Book count per category, only for categories that have books
    async fn count_books_by_category(&mut self) -> AppResult<Vec<BookStat>>;

    async fn delete_all_books(&mut self) -> AppResult<u64>;

    // Users

    async fn insert_user(&mut self, name: &str, age: Option<i32>) -> AppResult<User>;

    /// Fails with `NotFound` when no user has this id
    async fn get_user(&mut self, id: i64) -> AppResult<User>;

    /// First user (lowest id) with exactly this name
    async fn find_user_by_name(&mut self, name: &str) -> AppResult<Option<User>>;

    /// All users in id order
    async fn list_users(&mut self) -> AppResult<Vec<User>>;

    /// Overwrite name and age of an existing user
    async fn update_user(&mut self, user: &User) -> AppResult<User>;

    /// Delete a user and the loan histories it owns
    async fn delete_user(&mut self, id: i64) -> AppResult<()>;

    async fn delete_all_users(&mut self) -> AppResult<u64>;

    // Loan histories

    async fn insert_loan_history(&mut self, history: &NewLoanHistory) -> AppResult<LoanHistory>;

    async fn insert_loan_histories(
        &mut self,
        histories: &[NewLoanHistory],
    ) -> AppResult<Vec<LoanHistory>>;

    /// Whether any user holds a history for this book name with this status
    async fn loan_history_exists(&mut self, book_name: &str, status: LoanStatus) -> AppResult<bool>;

    async fn find_loan_history(
        &mut self,
        user_id: i64,
        book_name: &str,
        status: LoanStatus,
    ) -> AppResult<Option<LoanHistory>>;

    async fn update_loan_status(&mut self, id: i64, status: LoanStatus) -> AppResult<LoanHistory>;

    async fn count_loan_histories(&mut self, status: LoanStatus) -> AppResult<i64>;

    /// Histories owned by one user, in id order
    async fn list_user_loan_histories(&mut self, user_id: i64) -> AppResult<Vec<LoanHistory>>;

    /// Every history, in id order
    async fn list_loan_histories(&mut self) -> AppResult<Vec<LoanHistory>>;

    async fn delete_all_loan_histories(&mut self) -> AppResult<u64>;

    /// Make the writes of this unit of work visible to others
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
