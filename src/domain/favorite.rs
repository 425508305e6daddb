//! Favorite entity and favorite state.

use super::PropertyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a saved favorite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteId(pub u32);

impl std::fmt::Display for FavoriteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A saved reference to a property.
///
/// The referenced property is not required to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "Id")]
    pub id: FavoriteId,
    pub property_id: PropertyId,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub saved_date: DateTime<Utc>,
}

impl Favorite {
    /// Create a favorite saved now
    pub fn new(id: FavoriteId, property_id: PropertyId) -> Self {
        Self {
            id,
            property_id,
            saved_date: Utc::now(),
        }
    }
}

/// UI-visible favorite state of a single property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FavoriteState {
    NotFavorited,
    Favorited,
    /// A toggle is in flight
    Pending,
}

impl FavoriteState {
    /// Whether the property counts as saved
    pub fn is_favorited(&self) -> bool {
        matches!(self, Self::Favorited)
    }

    /// State after a successful toggle from this one
    pub fn toggled(&self) -> Self {
        match self {
            Self::NotFavorited => Self::Favorited,
            Self::Favorited => Self::NotFavorited,
            Self::Pending => Self::Pending,
        }
    }
}

impl std::fmt::Display for FavoriteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NotFavorited => "Not saved",
            Self::Favorited => "Saved",
            Self::Pending => "Saving...",
        };
        write!(f, "{}", label)
    }
}
