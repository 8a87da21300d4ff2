//! Loan histories queries

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::{LoanHistory, LoanStatus, NewLoanHistory},
};

/// Insert a new loan history
pub async fn insert(conn: &mut PgConnection, history: &NewLoanHistory) -> AppResult<LoanHistory> {
    let history = sqlx::query_as::<_, LoanHistory>(
        r#"
        INSERT INTO user_loan_histories (user_id, book_name, status)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, book_name, status
        "#,
    )
    .bind(history.user_id)
    .bind(&history.book_name)
    .bind(history.status)
    .fetch_one(&mut *conn)
    .await?;

    Ok(history)
}

/// Check whether a history exists for a book name in the given status
pub async fn exists(conn: &mut PgConnection, book_name: &str, status: LoanStatus) -> AppResult<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM user_loan_histories WHERE book_name = $1 AND status = $2)",
    )
    .bind(book_name)
    .bind(status)
    .fetch_one(&mut *conn)
    .await?;

    Ok(exists)
}

/// Get a user's history for a book name in the given status
pub async fn find(
    conn: &mut PgConnection,
    user_id: i64,
    book_name: &str,
    status: LoanStatus,
) -> AppResult<Option<LoanHistory>> {
    let history = sqlx::query_as::<_, LoanHistory>(
        r#"
        SELECT id, user_id, book_name, status
        FROM user_loan_histories
        WHERE user_id = $1 AND book_name = $2 AND status = $3
        ORDER BY id
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(book_name)
    .bind(status)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(history)
}

/// Change the status of a history
pub async fn update_status(
    conn: &mut PgConnection,
    id: i64,
    status: LoanStatus,
) -> AppResult<LoanHistory> {
    sqlx::query_as::<_, LoanHistory>(
        r#"
        UPDATE user_loan_histories SET status = $1
        WHERE id = $2
        RETURNING id, user_id, book_name, status
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Loan history with id {} not found", id)))
}

/// Count histories in the given status
pub async fn count_by_status(conn: &mut PgConnection, status: LoanStatus) -> AppResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_loan_histories WHERE status = $1")
        .bind(status)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// List the histories owned by a user
pub async fn list_for_user(conn: &mut PgConnection, user_id: i64) -> AppResult<Vec<LoanHistory>> {
    let histories = sqlx::query_as::<_, LoanHistory>(
        r#"
        SELECT id, user_id, book_name, status
        FROM user_loan_histories
        WHERE user_id = $1
        ORDER BY id
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(histories)
}

/// List all histories
pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<LoanHistory>> {
    let histories = sqlx::query_as::<_, LoanHistory>(
        "SELECT id, user_id, book_name, status FROM user_loan_histories ORDER BY id",
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(histories)
}

/// Delete every history
pub async fn delete_all(conn: &mut PgConnection) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM user_loan_histories")
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}
