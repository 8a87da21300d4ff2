//! Business logic services

pub mod books;
pub mod users;

use std::sync::Arc;

use crate::{error::AppResult, repository::LibraryStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BookService,
    pub users: users::UserService,
    store: Arc<dyn LibraryStore>,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self {
            books: books::BookService::new(store.clone()),
            users: users::UserService::new(store.clone()),
            store,
        }
    }

    /// Check that the store accepts new units of work
    pub async fn ping(&self) -> AppResult<()> {
        self.store.begin().await?;
        Ok(())
    }
}
