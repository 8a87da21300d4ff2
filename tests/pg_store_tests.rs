//! PostgreSQL store tests
//!
//! These need a database: set DATABASE_URL and run with
//! `cargo test -- --ignored`.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::Mutex;

use library_app_server::{
    models::{
        BookCategory, BookLoanRequest, BookReturnRequest, BookStat, CreateBook, CreateUser,
        LoanStatus, NewLoanHistory, UpdateUser,
    },
    repository::{LibraryStore, PgStore, UnitOfWork},
    services::{books::BookService, users::UserService},
    AppError,
};

// Tests share one database and wipe it between runs
static DB_LOCK: Mutex<()> = Mutex::const_new(());

async fn setup_store() -> PgStore {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let store = PgStore::new(pool);
    clean(&store).await;
    store
}

async fn clean(store: &PgStore) {
    let mut uow = store.begin().await.expect("Failed to begin transaction");
    uow.delete_all_loan_histories().await.expect("Failed to clean loan histories");
    uow.delete_all_users().await.expect("Failed to clean users");
    uow.delete_all_books().await.expect("Failed to clean books");
    uow.commit().await.expect("Failed to commit cleanup");
}

fn loan(user_name: &str, book_name: &str) -> BookLoanRequest {
    BookLoanRequest {
        user_name: user_name.to_string(),
        book_name: book_name.to_string(),
    }
}

fn give_back(user_name: &str, book_name: &str) -> BookReturnRequest {
    BookReturnRequest {
        user_name: user_name.to_string(),
        book_name: book_name.to_string(),
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_uncommitted_writes_roll_back() {
    let _lock = DB_LOCK.lock().await;
    let store = setup_store().await;

    let mut uow = store.begin().await.unwrap();
    uow.insert_book(&CreateBook::fixture("Dune")).await.unwrap();
    uow.insert_user("Paul", Some(15)).await.unwrap();
    drop(uow);

    let mut uow = store.begin().await.unwrap();
    assert!(uow.list_books().await.unwrap().is_empty());
    assert!(uow.list_users().await.unwrap().is_empty());
    drop(uow);

    clean(&store).await;
}

#[tokio::test]
#[ignore]
async fn test_category_statistics_and_counts_decode() {
    let _lock = DB_LOCK.lock().await;
    let store = setup_store().await;
    let books = BookService::new(Arc::new(store.clone()));

    for (name, category) in [
        ("A", BookCategory::Computer),
        ("B", BookCategory::Computer),
        ("C", BookCategory::Science),
    ] {
        books.save_book(CreateBook::new(name, category)).await.unwrap();
    }

    let mut stats = books.get_book_statistics().await.unwrap();
    stats.sort_by_key(|stat| stat.category);
    assert_eq!(
        stats,
        vec![
            BookStat { category: BookCategory::Computer, count: 2 },
            BookStat { category: BookCategory::Science, count: 1 },
        ]
    );

    let listed = books.list_books().await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
    assert_eq!(listed[2].category, BookCategory::Science);

    clean(&store).await;
}

#[tokio::test]
#[ignore]
async fn test_loan_and_return_round_trip() {
    let _lock = DB_LOCK.lock().await;
    let store = setup_store().await;
    let books = BookService::new(Arc::new(store.clone()));
    let users = UserService::new(Arc::new(store.clone()));

    books.save_book(CreateBook::fixture("Dune")).await.unwrap();
    users.save_user(CreateUser::new("Paul", Some(15))).await.unwrap();

    let loaned = books.loan_book(loan("Paul", "Dune")).await.unwrap();
    assert_eq!(loaned.status, LoanStatus::Loaned);
    assert_eq!(books.count_loaned_books().await.unwrap(), 1);

    let err = books.loan_book(loan("Paul", "Dune")).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let returned = books.return_book(give_back("Paul", "Dune")).await.unwrap();
    assert_eq!(returned.id, loaned.id);
    assert_eq!(returned.status, LoanStatus::Returned);
    assert_eq!(books.count_loaned_books().await.unwrap(), 0);

    let err = books.return_book(give_back("Paul", "Dune")).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    clean(&store).await;
}

#[tokio::test]
#[ignore]
async fn test_user_update_and_delete_cascade() {
    let _lock = DB_LOCK.lock().await;
    let store = setup_store().await;
    let users = UserService::new(Arc::new(store.clone()));

    let paul = users.save_user(CreateUser::new("Paul", Some(15))).await.unwrap();
    let jane = users.save_user(CreateUser::new("Jane", None)).await.unwrap();

    let updated = users
        .update_user(
            paul.id,
            UpdateUser {
                name: None,
                age: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.age, None);
    assert_eq!(users.get_user(paul.id).await.unwrap(), updated);

    let mut uow = store.begin().await.unwrap();
    uow.insert_loan_histories(&[
        NewLoanHistory::new(paul.id, "Dune", LoanStatus::Returned),
        NewLoanHistory::loaned(paul.id, "Emma"),
        NewLoanHistory::loaned(jane.id, "Beloved"),
    ])
    .await
    .unwrap();
    uow.commit().await.unwrap();

    let report = users.get_user_loan_history(paul.id).await.unwrap();
    assert_eq!(report.name, "Paul");
    assert_eq!(report.books.len(), 2);
    assert!(report.books[0].is_return);
    assert!(!report.books[1].is_return);

    users.delete_user("Paul").await.unwrap();

    let mut uow = store.begin().await.unwrap();
    let remaining = uow.list_loan_histories().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, jane.id);
    drop(uow);

    let err = users.get_user(paul.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    clean(&store).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_all_reports_counts_and_cascades() {
    let _lock = DB_LOCK.lock().await;
    let store = setup_store().await;

    let mut uow = store.begin().await.unwrap();
    uow.insert_books(&[CreateBook::fixture("Dune"), CreateBook::fixture("Emma")])
        .await
        .unwrap();
    let paul = uow.insert_user("Paul", None).await.unwrap();
    uow.insert_loan_histories(&[
        NewLoanHistory::loaned(paul.id, "Dune"),
        NewLoanHistory::loaned(paul.id, "Emma"),
    ])
    .await
    .unwrap();
    uow.commit().await.unwrap();

    let mut uow = store.begin().await.unwrap();
    assert_eq!(uow.delete_all_users().await.unwrap(), 1);
    assert_eq!(uow.count_loan_histories(LoanStatus::Loaned).await.unwrap(), 0);
    assert_eq!(uow.delete_all_loan_histories().await.unwrap(), 0);
    assert_eq!(uow.delete_all_books().await.unwrap(), 2);
    uow.commit().await.unwrap();
}
