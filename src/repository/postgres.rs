//! PostgreSQL storage backend

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::{books, loan_histories, users, LibraryStore, UnitOfWork};
use crate::{
    error::AppResult,
    models::{Book, BookStat, CreateBook, LoanHistory, LoanStatus, NewLoanHistory, User},
};

/// Store backed by a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LibraryStore for PgStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// A database transaction; rolled back by sqlx when dropped uncommitted
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_book(&mut self, book: &CreateBook) -> AppResult<Book> {
        books::insert(&mut self.tx, book).await
    }

    async fn insert_books(&mut self, new_books: &[CreateBook]) -> AppResult<Vec<Book>> {
        let mut saved = Vec::with_capacity(new_books.len());
        for book in new_books {
            saved.push(books::insert(&mut self.tx, book).await?);
        }
        Ok(saved)
    }

    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        books::list(&mut self.tx).await
    }

    async fn find_book_by_name(&mut self, name: &str) -> AppResult<Option<Book>> {
        books::find_by_name(&mut self.tx, name).await
    }

    async fn count_books_by_category(&mut self) -> AppResult<Vec<BookStat>> {
        books::count_by_category(&mut self.tx).await
    }

    async fn delete_all_books(&mut self) -> AppResult<u64> {
        books::delete_all(&mut self.tx).await
    }

    async fn insert_user(&mut self, name: &str, age: Option<i32>) -> AppResult<User> {
        users::insert(&mut self.tx, name, age).await
    }

    async fn get_user(&mut self, id: i64) -> AppResult<User> {
        users::get_by_id(&mut self.tx, id).await
    }

    async fn find_user_by_name(&mut self, name: &str) -> AppResult<Option<User>> {
        users::find_by_name(&mut self.tx, name).await
    }

    async fn list_users(&mut self) -> AppResult<Vec<User>> {
        users::list(&mut self.tx).await
    }

    async fn update_user(&mut self, user: &User) -> AppResult<User> {
        users::update(&mut self.tx, user).await
    }

    async fn delete_user(&mut self, id: i64) -> AppResult<()> {
        users::delete(&mut self.tx, id).await
    }

    async fn delete_all_users(&mut self) -> AppResult<u64> {
        users::delete_all(&mut self.tx).await
    }

    async fn insert_loan_history(&mut self, history: &NewLoanHistory) -> AppResult<LoanHistory> {
        loan_histories::insert(&mut self.tx, history).await
    }

    async fn insert_loan_histories(
        &mut self,
        histories: &[NewLoanHistory],
    ) -> AppResult<Vec<LoanHistory>> {
        let mut saved = Vec::with_capacity(histories.len());
        for history in histories {
            saved.push(loan_histories::insert(&mut self.tx, history).await?);
        }
        Ok(saved)
    }

    async fn loan_history_exists(&mut self, book_name: &str, status: LoanStatus) -> AppResult<bool> {
        loan_histories::exists(&mut self.tx, book_name, status).await
    }

    async fn find_loan_history(
        &mut self,
        user_id: i64,
        book_name: &str,
        status: LoanStatus,
    ) -> AppResult<Option<LoanHistory>> {
        loan_histories::find(&mut self.tx, user_id, book_name, status).await
    }

    async fn update_loan_status(&mut self, id: i64, status: LoanStatus) -> AppResult<LoanHistory> {
        loan_histories::update_status(&mut self.tx, id, status).await
    }

    async fn count_loan_histories(&mut self, status: LoanStatus) -> AppResult<i64> {
        loan_histories::count_by_status(&mut self.tx, status).await
    }

    async fn list_user_loan_histories(&mut self, user_id: i64) -> AppResult<Vec<LoanHistory>> {
        loan_histories::list_for_user(&mut self.tx, user_id).await
    }

    async fn list_loan_histories(&mut self) -> AppResult<Vec<LoanHistory>> {
        loan_histories::list(&mut self.tx).await
    }

    async fn delete_all_loan_histories(&mut self) -> AppResult<u64> {
        loan_histories::delete_all(&mut self.tx).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
