//! Data services for estate-finder.
//!
//! This module contains:
//! - PropertySource / InMemoryPropertyRepository: the listing collection
//! - FavoriteStore / InMemoryFavoriteRepository: saved favorites
//! - FavoritesSync: favorite toggling and UI-visible favorite state

mod favorite_repository;
mod favorites;
mod property_repository;

pub use favorite_repository::{FavoriteStore, InMemoryFavoriteRepository};
pub use favorites::FavoritesSync;
pub use property_repository::{InMemoryPropertyRepository, PropertySource};
