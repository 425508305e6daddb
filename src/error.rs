//! Unified error types for the estate-finder application.

use crate::domain::{FavoriteId, PropertyId};
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Favorite error: {0}")]
    Favorite(#[from] FavoriteError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Property repository errors
#[derive(Debug, Error)]
pub enum PropertyError {
    #[error("Property not found: {0}")]
    NotFound(PropertyId),

    #[error("Duplicate property id: {0}")]
    DuplicateId(PropertyId),

    #[error("Invalid property record {id}: {reason}")]
    InvalidRecord { id: PropertyId, reason: String },

    #[error("Failed to read property fixtures: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Favorite store and synchronizer errors
#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("Property already in favorites: {0}")]
    AlreadyExists(PropertyId),

    #[error("Favorite not found for property: {0}")]
    NotFound(PropertyId),

    #[error("Favorite not found: {0}")]
    UnknownId(FavoriteId),

    #[error("A favorite update is already in progress for property: {0}")]
    Pending(PropertyId),

    #[error("Duplicate favorite id: {0}")]
    DuplicateId(FavoriteId),

    #[error("Failed to read favorite fixtures: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filter input errors.
///
/// These never leave the query module: an invalid value is logged and the
/// dimension is treated as unconstrained.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid value for filter {field}: {input:?}")]
    InvalidValue { field: &'static str, input: String },
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for property repository operations
pub type PropertyResult<T> = std::result::Result<T, PropertyError>;

/// Result type alias for favorite operations
pub type FavoriteResult<T> = std::result::Result<T, FavoriteError>;
