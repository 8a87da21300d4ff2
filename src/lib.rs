//! Library App Server
//!
//! A small library-management backend: books are registered under a
//! category, users loan and return them, and the server reports loan
//! counts, per-category statistics and per-user loan histories through a
//! REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Build the state on top of a storage backend
    pub fn new(config: AppConfig, store: Arc<dyn repository::LibraryStore>) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(store)),
        }
    }
}
