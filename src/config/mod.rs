//! Configuration module

pub mod settings;

pub use settings::{
    CorsConfig, DatabaseConfig, LoggingConfig, ServerConfig, Settings, StoreBackend,
};
