//! Books queries

use sqlx::PgConnection;

use crate::{
    error::AppResult,
    models::{Book, BookStat, CreateBook},
};

/// Insert a new book
pub async fn insert(conn: &mut PgConnection, book: &CreateBook) -> AppResult<Book> {
    let book = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books (name, category)
        VALUES ($1, $2)
        RETURNING id, name, category
        "#,
    )
    .bind(&book.name)
    .bind(book.category)
    .fetch_one(&mut *conn)
    .await?;

    Ok(book)
}

/// List all books
pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<Book>> {
    let books = sqlx::query_as::<_, Book>("SELECT id, name, category FROM books ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(books)
}

/// Get the first book registered under a name
pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> AppResult<Option<Book>> {
    let book = sqlx::query_as::<_, Book>(
        "SELECT id, name, category FROM books WHERE name = $1 ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(book)
}

/// Count books per category
pub async fn count_by_category(conn: &mut PgConnection) -> AppResult<Vec<BookStat>> {
    let stats = sqlx::query_as::<_, BookStat>(
        "SELECT category, COUNT(*) AS count FROM books GROUP BY category",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(stats)
}

/// Delete every book
pub async fn delete_all(conn: &mut PgConnection) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM books").execute(&mut *conn).await?;
    Ok(result.rows_affected())
}
