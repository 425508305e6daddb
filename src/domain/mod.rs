//! Domain entities for estate-finder.
//!
//! This module contains the core business entities:
//! - Property: A listing with its attributes
//! - Favorite: A saved reference to a property

mod favorite;
mod property;
mod timestamp;

pub use favorite::{Favorite, FavoriteId, FavoriteState};
pub use property::{Property, PropertyId, PropertyType, DEFAULT_LOT_SIZE, DEFAULT_YEAR_BUILT};

#[cfg(test)]
pub(crate) use property::fixtures;
