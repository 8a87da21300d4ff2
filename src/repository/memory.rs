//! In-process storage backend
//!
//! A unit of work holds the store lock from `begin` until it is committed
//! or dropped, so units of work run one after another. Writes go to a
//! private copy of the tables that replaces the shared tables on `commit`
//! and is thrown away on drop.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{LibraryStore, UnitOfWork};
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookStat, CreateBook, LoanHistory, LoanStatus, NewLoanHistory, User},
};

#[derive(Debug, Clone, Default)]
struct Tables {
    books: Vec<Book>,
    users: Vec<User>,
    loan_histories: Vec<LoanHistory>,
    next_book_id: i64,
    next_user_id: i64,
    next_loan_history_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Store keeping its tables in memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibraryStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        let tables = (*guard).clone();
        Ok(Box::new(MemoryUnitOfWork { guard, tables }))
    }
}

pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    tables: Tables,
}

impl MemoryUnitOfWork {
    fn push_book(&mut self, book: &CreateBook) -> Book {
        let book = Book {
            id: Tables::next_id(&mut self.tables.next_book_id),
            name: book.name.clone(),
            category: book.category,
        };
        self.tables.books.push(book.clone());
        book
    }

    fn push_loan_history(&mut self, history: &NewLoanHistory) -> AppResult<LoanHistory> {
        if !self.tables.users.iter().any(|u| u.id == history.user_id) {
            return Err(AppError::NotFound(format!(
                "User with id {} not found",
                history.user_id
            )));
        }

        let history = LoanHistory {
            id: Tables::next_id(&mut self.tables.next_loan_history_id),
            user_id: history.user_id,
            book_name: history.book_name.clone(),
            status: history.status,
        };
        self.tables.loan_histories.push(history.clone());
        Ok(history)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_book(&mut self, book: &CreateBook) -> AppResult<Book> {
        Ok(self.push_book(book))
    }

    async fn insert_books(&mut self, books: &[CreateBook]) -> AppResult<Vec<Book>> {
        Ok(books.iter().map(|book| self.push_book(book)).collect())
    }

    async fn list_books(&mut self) -> AppResult<Vec<Book>> {
        Ok(self.tables.books.clone())
    }

    async fn find_book_by_name(&mut self, name: &str) -> AppResult<Option<Book>> {
        Ok(self.tables.books.iter().find(|b| b.name == name).cloned())
    }

    async fn count_books_by_category(&mut self) -> AppResult<Vec<BookStat>> {
        let mut stats: Vec<BookStat> = Vec::new();
        for book in &self.tables.books {
            match stats.iter_mut().find(|s| s.category == book.category) {
                Some(stat) => stat.count += 1,
                None => stats.push(BookStat {
                    category: book.category,
                    count: 1,
                }),
            }
        }
        Ok(stats)
    }

    async fn delete_all_books(&mut self) -> AppResult<u64> {
        let count = self.tables.books.len() as u64;
        self.tables.books.clear();
        Ok(count)
    }

    async fn insert_user(&mut self, name: &str, age: Option<i32>) -> AppResult<User> {
        let user = User {
            id: Tables::next_id(&mut self.tables.next_user_id),
            name: name.to_string(),
            age,
        };
        self.tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&mut self, id: i64) -> AppResult<User> {
        self.tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn find_user_by_name(&mut self, name: &str) -> AppResult<Option<User>> {
        Ok(self.tables.users.iter().find(|u| u.name == name).cloned())
    }

    async fn list_users(&mut self) -> AppResult<Vec<User>> {
        Ok(self.tables.users.clone())
    }

    async fn update_user(&mut self, user: &User) -> AppResult<User> {
        let stored = self
            .tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id)))?;
        stored.name = user.name.clone();
        stored.age = user.age;
        Ok(stored.clone())
    }

    async fn delete_user(&mut self, id: i64) -> AppResult<()> {
        let before = self.tables.users.len();
        self.tables.users.retain(|u| u.id != id);
        if self.tables.users.len() == before {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        self.tables.loan_histories.retain(|h| h.user_id != id);
        Ok(())
    }

    async fn delete_all_users(&mut self) -> AppResult<u64> {
        let count = self.tables.users.len() as u64;
        self.tables.users.clear();
        self.tables.loan_histories.clear();
        Ok(count)
    }

    async fn insert_loan_history(&mut self, history: &NewLoanHistory) -> AppResult<LoanHistory> {
        self.push_loan_history(history)
    }

    async fn insert_loan_histories(
        &mut self,
        histories: &[NewLoanHistory],
    ) -> AppResult<Vec<LoanHistory>> {
        histories
            .iter()
            .map(|history| self.push_loan_history(history))
            .collect()
    }

    async fn loan_history_exists(&mut self, book_name: &str, status: LoanStatus) -> AppResult<bool> {
        Ok(self
            .tables
            .loan_histories
            .iter()
            .any(|h| h.book_name == book_name && h.status == status))
    }

    async fn find_loan_history(
        &mut self,
        user_id: i64,
        book_name: &str,
        status: LoanStatus,
    ) -> AppResult<Option<LoanHistory>> {
        Ok(self
            .tables
            .loan_histories
            .iter()
            .find(|h| h.user_id == user_id && h.book_name == book_name && h.status == status)
            .cloned())
    }

    async fn update_loan_status(&mut self, id: i64, status: LoanStatus) -> AppResult<LoanHistory> {
        let history = self
            .tables
            .loan_histories
            .iter_mut()
            .find(|h| h.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Loan history with id {} not found", id)))?;
        history.status = status;
        Ok(history.clone())
    }

    async fn count_loan_histories(&mut self, status: LoanStatus) -> AppResult<i64> {
        let count = self
            .tables
            .loan_histories
            .iter()
            .filter(|h| h.status == status)
            .count();
        Ok(count as i64)
    }

    async fn list_user_loan_histories(&mut self, user_id: i64) -> AppResult<Vec<LoanHistory>> {
        Ok(self
            .tables
            .loan_histories
            .iter()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_loan_histories(&mut self) -> AppResult<Vec<LoanHistory>> {
        Ok(self.tables.loan_histories.clone())
    }

    async fn delete_all_loan_histories(&mut self) -> AppResult<u64> {
        let count = self.tables.loan_histories.len() as u64;
        self.tables.loan_histories.clear();
        Ok(count)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryUnitOfWork { mut guard, tables } = *self;
        *guard = tables;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookCategory;

    #[tokio::test]
    async fn uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        uow.insert_book(&CreateBook::fixture("Dune")).await.unwrap();
        drop(uow);

        let mut uow = store.begin().await.unwrap();
        assert!(uow.list_books().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = MemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        uow.insert_books(&[
            CreateBook::new("A", BookCategory::Computer),
            CreateBook::new("B", BookCategory::Science),
        ])
        .await
        .unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let books = uow.list_books().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].id, 1);
        assert_eq!(books[1].id, 2);
    }

    #[tokio::test]
    async fn deleting_a_user_removes_its_histories() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let alice = uow.insert_user("Alice", None).await.unwrap();
        let bob = uow.insert_user("Bob", None).await.unwrap();
        uow.insert_loan_histories(&[
            NewLoanHistory::loaned(alice.id, "Dune"),
            NewLoanHistory::loaned(bob.id, "Emma"),
        ])
        .await
        .unwrap();

        uow.delete_user(alice.id).await.unwrap();

        let remaining = uow.list_loan_histories().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, bob.id);
    }

    #[tokio::test]
    async fn overlapping_units_of_work_keep_both_writes() {
        let store = MemoryStore::new();

        let mut first = store.begin().await.unwrap();
        let a = first
            .insert_book(&CreateBook::new("A", BookCategory::Computer))
            .await
            .unwrap();

        let other = store.clone();
        let second = tokio::spawn(async move {
            let mut uow = other.begin().await.unwrap();
            let book = uow
                .insert_book(&CreateBook::new("B", BookCategory::Science))
                .await
                .unwrap();
            uow.commit().await.unwrap();
            book
        });
        tokio::task::yield_now().await;

        first.commit().await.unwrap();
        let b = second.await.unwrap();

        assert_ne!(a.id, b.id);
        let mut uow = store.begin().await.unwrap();
        let books = uow.list_books().await.unwrap();
        assert_eq!(books, vec![a, b]);
    }

    #[tokio::test]
    async fn deleted_user_stays_deleted_after_a_later_commit() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let alice = uow.insert_user("Alice", None).await.unwrap();
        uow.commit().await.unwrap();

        let mut deleting = store.begin().await.unwrap();
        deleting.delete_user(alice.id).await.unwrap();

        let other = store.clone();
        let writer = tokio::spawn(async move {
            let mut uow = other.begin().await.unwrap();
            uow.insert_user("Bob", Some(40)).await.unwrap();
            uow.commit().await.unwrap();
        });
        tokio::task::yield_now().await;

        deleting.commit().await.unwrap();
        writer.await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let users = uow.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Bob");
        assert_ne!(users[0].id, alice.id);
    }

    #[tokio::test]
    async fn delete_all_reports_counts_and_cascades() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.insert_books(&[CreateBook::fixture("Dune"), CreateBook::fixture("Emma")])
            .await
            .unwrap();
        let alice = uow.insert_user("Alice", None).await.unwrap();
        let bob = uow.insert_user("Bob", None).await.unwrap();
        uow.insert_loan_histories(&[
            NewLoanHistory::loaned(alice.id, "Dune"),
            NewLoanHistory::new(bob.id, "Emma", LoanStatus::Returned),
        ])
        .await
        .unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.delete_all_users().await.unwrap(), 2);
        assert!(uow.list_loan_histories().await.unwrap().is_empty());
        assert_eq!(uow.delete_all_loan_histories().await.unwrap(), 0);
        assert_eq!(uow.delete_all_books().await.unwrap(), 2);
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert!(uow.list_books().await.unwrap().is_empty());
        assert!(uow.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn histories_require_an_existing_owner() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();

        let err = uow
            .insert_loan_history(&NewLoanHistory::loaned(42, "Dune"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
