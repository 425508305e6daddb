//! estate-finder: property listing search, sorting and favorites
//!
//! This crate provides the core of a real-estate browsing application:
//! a filter predicate and sort engine over property listings, async
//! repositories for properties and favorites, and a favorites synchronizer
//! that keeps UI-visible state consistent with the store.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod query;
pub mod services;

pub use app::App;
pub use config::AppConfig;
pub use error::{AppError, Result};
