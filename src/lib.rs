//! Bibliotheca Library Catalog Server
//!
//! A REST JSON API for a library catalog: books, authors, physical copies,
//! patron loans, and librarian-side loan renewals.

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
