//! User management and loan history reporting service

use std::{collections::HashMap, sync::Arc};

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{CreateUser, LoanHistory, UpdateUser, User, UserLoanHistoryResponse},
    repository::LibraryStore,
};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn LibraryStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self { store }
    }

    /// Register a new user
    pub async fn save_user(&self, request: CreateUser) -> AppResult<User> {
        request.validate()?;

        let mut uow = self.store.begin().await?;
        let user = uow.insert_user(&request.name, request.age).await?;
        uow.commit().await?;

        tracing::info!("Registered user id={}", user.id);
        Ok(user)
    }

    /// List every user
    pub async fn get_users(&self) -> AppResult<Vec<User>> {
        let mut uow = self.store.begin().await?;
        uow.list_users().await
    }

    /// Get user by ID
    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        let mut uow = self.store.begin().await?;
        uow.get_user(id).await
    }

    /// Update name and/or age of a user
    pub async fn update_user(&self, id: i64, update: UpdateUser) -> AppResult<User> {
        update.validate()?;

        let mut uow = self.store.begin().await?;
        let mut user = uow.get_user(id).await?;
        update.apply_to(&mut user);
        let user = uow.update_user(&user).await?;
        uow.commit().await?;

        tracing::info!("Updated user id={}", user.id);
        Ok(user)
    }

    /// Delete a user by name, together with its loan histories
    pub async fn delete_user(&self, name: &str) -> AppResult<()> {
        let mut uow = self.store.begin().await?;
        let user = uow
            .find_user_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with name {} not found", name)))?;
        uow.delete_user(user.id).await?;
        uow.commit().await?;

        tracing::info!("Deleted user id={}", user.id);
        Ok(())
    }

    /// Loan history report of one user
    pub async fn get_user_loan_history(&self, id: i64) -> AppResult<UserLoanHistoryResponse> {
        let mut uow = self.store.begin().await?;
        let user = uow.get_user(id).await?;
        let histories = uow.list_user_loan_histories(user.id).await?;
        Ok(UserLoanHistoryResponse::new(user.name, &histories))
    }

    /// Loan history reports of all users, in user id order
    pub async fn get_user_loan_histories(&self) -> AppResult<Vec<UserLoanHistoryResponse>> {
        let mut uow = self.store.begin().await?;
        let users = uow.list_users().await?;

        let mut by_user: HashMap<i64, Vec<LoanHistory>> = HashMap::new();
        for history in uow.list_loan_histories().await? {
            by_user.entry(history.user_id).or_default().push(history);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let owned = by_user.remove(&user.id).unwrap_or_default();
                UserLoanHistoryResponse::new(user.name, &owned)
            })
            .collect())
    }
}
