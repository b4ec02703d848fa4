//! YAML seed data for the in-memory store

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::store::{Category, StoreError, StoreResult};

/// Contents of a seed file
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub questions: Vec<SeedQuestion>,
}

/// A seeded question; rows without an id get the next free one
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedQuestion {
    #[serde(default)]
    pub id: Option<i32>,
    pub question: String,
    pub answer: String,
    pub category: i32,
    pub difficulty: i32,
}

impl SeedData {
    /// Load seed data from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| StoreError::Seed(format!("Failed to read seed file: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// Parse seed data from a YAML string
    pub fn from_yaml(content: &str) -> StoreResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| StoreError::Seed(format!("Failed to parse seed file: {}", e)))
    }
}
