//! Favorite store trait and the in-memory repository.

use crate::domain::{Favorite, FavoriteId, PropertyId};
use crate::error::{FavoriteError, FavoriteResult};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;

/// Storage for saved favorites
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// All favorites in the order they were saved
    async fn get_all(&self) -> FavoriteResult<Vec<Favorite>>;

    /// Look up a favorite by its own id
    async fn get_by_id(&self, id: FavoriteId) -> FavoriteResult<Favorite>;

    /// Save a property. Fails with `AlreadyExists` if it is already saved.
    async fn add_favorite(&self, property_id: PropertyId) -> FavoriteResult<Favorite>;

    /// Unsave a property. Fails with `NotFound` if it is not saved.
    async fn remove_favorite(&self, property_id: PropertyId) -> FavoriteResult<()>;

    /// Ids of all saved properties
    async fn get_favorite_property_ids(&self) -> FavoriteResult<HashSet<PropertyId>>;

    /// Whether a property is saved
    async fn is_favorite(&self, property_id: PropertyId) -> FavoriteResult<bool> {
        Ok(self
            .get_favorite_property_ids()
            .await?
            .contains(&property_id))
    }
}

/// Favorite repository held in memory, with optional simulated latency
#[derive(Default)]
pub struct InMemoryFavoriteRepository {
    favorites: RwLock<Vec<Favorite>>,
    latency: Duration,
}

impl InMemoryFavoriteRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding existing favorites, rejecting duplicate
    /// favorite ids and more than one favorite per property
    pub fn with_favorites(favorites: Vec<Favorite>) -> FavoriteResult<Self> {
        let mut ids = HashSet::new();
        let mut properties = HashSet::new();
        for favorite in &favorites {
            if !ids.insert(favorite.id) {
                return Err(FavoriteError::DuplicateId(favorite.id));
            }
            if !properties.insert(favorite.property_id) {
                return Err(FavoriteError::AlreadyExists(favorite.property_id));
            }
        }

        Ok(Self {
            favorites: RwLock::new(favorites),
            latency: Duration::ZERO,
        })
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Load a JSON fixture file
    pub fn from_json_file(path: &Path) -> FavoriteResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let favorites: Vec<Favorite> = serde_json::from_str(&json)?;
        tracing::info!("Loaded {} favorites from {:?}", favorites.len(), path);
        Self::with_favorites(favorites)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl FavoriteStore for InMemoryFavoriteRepository {
    async fn get_all(&self) -> FavoriteResult<Vec<Favorite>> {
        self.simulate_latency().await;
        Ok(self.favorites.read().await.clone())
    }

    async fn get_by_id(&self, id: FavoriteId) -> FavoriteResult<Favorite> {
        self.simulate_latency().await;
        self.favorites
            .read()
            .await
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(FavoriteError::UnknownId(id))
    }

    async fn add_favorite(&self, property_id: PropertyId) -> FavoriteResult<Favorite> {
        self.simulate_latency().await;
        let mut favorites = self.favorites.write().await;

        if favorites.iter().any(|f| f.property_id == property_id) {
            return Err(FavoriteError::AlreadyExists(property_id));
        }

        let next_id = favorites.iter().map(|f| f.id.0).max().unwrap_or(0) + 1;
        let favorite = Favorite::new(FavoriteId(next_id), property_id);
        favorites.push(favorite.clone());
        tracing::debug!("Saved property {} as favorite {}", property_id, favorite.id);
        Ok(favorite)
    }

    async fn remove_favorite(&self, property_id: PropertyId) -> FavoriteResult<()> {
        self.simulate_latency().await;
        let mut favorites = self.favorites.write().await;

        let index = favorites
            .iter()
            .position(|f| f.property_id == property_id)
            .ok_or(FavoriteError::NotFound(property_id))?;
        favorites.remove(index);
        tracing::debug!("Removed favorite for property {}", property_id);
        Ok(())
    }

    async fn get_favorite_property_ids(&self) -> FavoriteResult<HashSet<PropertyId>> {
        self.simulate_latency().await;
        Ok(self
            .favorites
            .read()
            .await
            .iter()
            .map(|f| f.property_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_add_and_remove() {
        let repo = InMemoryFavoriteRepository::new();

        let fav = repo.add_favorite(PropertyId(1)).await.unwrap();
        assert_eq!(fav.id, FavoriteId(1));
        assert_eq!(fav.property_id, PropertyId(1));
        assert!(repo.is_favorite(PropertyId(1)).await.unwrap());

        let second = repo.add_favorite(PropertyId(8)).await.unwrap();
        assert_eq!(second.id, FavoriteId(2));

        repo.remove_favorite(PropertyId(1)).await.unwrap();
        assert!(!repo.is_favorite(PropertyId(1)).await.unwrap());
        assert_eq!(
            repo.get_favorite_property_ids().await.unwrap(),
            HashSet::from([PropertyId(8)])
        );
    }

    #[tokio::test]
    async fn test_duplicate_add_fails() {
        let repo = InMemoryFavoriteRepository::new();
        repo.add_favorite(PropertyId(3)).await.unwrap();
        assert!(matches!(
            repo.add_favorite(PropertyId(3)).await,
            Err(FavoriteError::AlreadyExists(PropertyId(3)))
        ));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_fails() {
        let repo = InMemoryFavoriteRepository::new();
        assert!(matches!(
            repo.remove_favorite(PropertyId(3)).await,
            Err(FavoriteError::NotFound(PropertyId(3)))
        ));
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = InMemoryFavoriteRepository::new();
        let fav = repo.add_favorite(PropertyId(10)).await.unwrap();
        assert_eq!(repo.get_by_id(fav.id).await.unwrap(), fav);
        assert!(matches!(
            repo.get_by_id(FavoriteId(42)).await,
            Err(FavoriteError::UnknownId(FavoriteId(42)))
        ));
    }

    #[tokio::test]
    async fn test_ids_continue_after_loaded_favorites() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"Id": 4, "propertyId": 2, "savedDate": "2024-01-20T08:00:00Z"}}]"#
        )
        .unwrap();

        let repo = InMemoryFavoriteRepository::from_json_file(file.path()).unwrap();
        assert!(repo.is_favorite(PropertyId(2)).await.unwrap());
        let added = repo.add_favorite(PropertyId(5)).await.unwrap();
        assert_eq!(added.id, FavoriteId(5));
    }

    #[test]
    fn test_duplicate_property_in_fixture_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"Id": 1, "propertyId": 2, "savedDate": "2024-01-20T08:00:00Z"}},
                {{"Id": 2, "propertyId": 2, "savedDate": "2024-01-21T08:00:00Z"}}]"#
        )
        .unwrap();

        assert!(matches!(
            InMemoryFavoriteRepository::from_json_file(file.path()),
            Err(FavoriteError::AlreadyExists(PropertyId(2)))
        ));
    }

    #[test]
    fn test_duplicate_favorite_id_is_rejected() {
        let favorites = vec![
            Favorite::new(FavoriteId(3), PropertyId(1)),
            Favorite::new(FavoriteId(3), PropertyId(2)),
        ];
        assert!(matches!(
            InMemoryFavoriteRepository::with_favorites(favorites),
            Err(FavoriteError::DuplicateId(FavoriteId(3)))
        ));
    }
}
