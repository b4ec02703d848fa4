//! Trivia API
//!
//! A REST backend for a trivia question bank: categories, paginated question
//! listings, search, creation and deletion, and a quiz endpoint that serves
//! random unseen questions.

pub mod api;
pub mod config;
pub mod error;
pub mod quiz;
pub mod store;

pub use error::{AppError, Result};

use std::sync::Arc;
use tokio::sync::RwLock;

use store::TriviaStore;

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<RwLock<config::Settings>>,
    pub store: Arc<dyn TriviaStore>,
}

impl AppState {
    pub fn new(settings: config::Settings, store: Arc<dyn TriviaStore>) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            store,
        }
    }
}
