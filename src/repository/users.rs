//! Users queries

use sqlx::PgConnection;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

/// Insert a new user
pub async fn insert(conn: &mut PgConnection, name: &str, age: Option<i32>) -> AppResult<User> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (name, age)
        VALUES ($1, $2)
        RETURNING id, name, age
        "#,
    )
    .bind(name)
    .bind(age)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_by_id(conn: &mut PgConnection, id: i64) -> AppResult<User> {
    sqlx::query_as::<_, User>("SELECT id, name, age FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
}

/// Get the first user registered under a name
pub async fn find_by_name(conn: &mut PgConnection, name: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, age FROM users WHERE name = $1 ORDER BY id LIMIT 1",
    )
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user)
}

/// List all users
pub async fn list(conn: &mut PgConnection) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>("SELECT id, name, age FROM users ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    Ok(users)
}

/// Update name and age of a user
pub async fn update(conn: &mut PgConnection, user: &User) -> AppResult<User> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET name = $1, age = $2
        WHERE id = $3
        RETURNING id, name, age
        "#,
    )
    .bind(&user.name)
    .bind(user.age)
    .bind(user.id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id)))
}

/// Delete a user (loan histories go with it through ON DELETE CASCADE)
pub async fn delete(conn: &mut PgConnection, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User with id {} not found", id)));
    }

    Ok(())
}

/// Delete every user
pub async fn delete_all(conn: &mut PgConnection) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM users").execute(&mut *conn).await?;
    Ok(result.rows_affected())
}
