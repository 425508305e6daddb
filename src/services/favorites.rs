//! Keeps UI-visible favorite state in step with the favorite store.
//!
//! Each property is `NotFavorited`, `Favorited` or `Pending`. A toggle marks
//! the property pending, performs the store call, and only then commits the
//! new membership. While a property is pending, further toggles for it are
//! rejected rather than queued, so at most one store call per property is
//! ever in flight. A failed store call leaves the previous state in place.
//!
//! Every committed toggle bumps a generation counter. A `load` whose snapshot
//! was taken before a toggle committed keeps the toggle's result for that
//! property instead of the stale snapshot value.

use super::{FavoriteStore, PropertySource};
use crate::domain::{FavoriteState, Property, PropertyId};
use crate::error::{FavoriteError, FavoriteResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct SyncState {
    favorited: HashSet<PropertyId>,
    pending: HashSet<PropertyId>,
    /// Bumped on every committed toggle
    generation: u64,
    /// Generation at which each property's last toggle committed
    committed: HashMap<PropertyId, u64>,
}

impl SyncState {
    /// Whether local state for a property is newer than a snapshot taken at `since`
    fn is_newer(&self, property_id: PropertyId, since: u64) -> bool {
        self.pending.contains(&property_id)
            || self
                .committed
                .get(&property_id)
                .is_some_and(|generation| *generation > since)
    }
}

/// Clears the pending mark when the toggle settles or is dropped mid-flight
struct PendingGuard<'a> {
    state: &'a Mutex<SyncState>,
    property_id: PropertyId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .remove(&self.property_id);
    }
}

/// Favorites synchronizer over an injected store
pub struct FavoritesSync {
    store: Arc<dyn FavoriteStore>,
    state: Mutex<SyncState>,
}

impl FavoritesSync {
    /// Create a synchronizer. Call [`load`](Self::load) to populate it.
    pub fn new(store: Arc<dyn FavoriteStore>) -> Self {
        Self {
            store,
            state: Mutex::new(SyncState::default()),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn FavoriteStore> {
        &self.store
    }

    /// Re-derive membership from the store.
    ///
    /// Also the retry path after a failed load. Pending marks are kept, and
    /// properties that are pending or whose toggle committed while the
    /// snapshot was in flight keep their local state.
    pub async fn load(&self) -> FavoriteResult<usize> {
        let started = self.lock().generation;
        let ids = self.store.get_favorite_property_ids().await?;

        let mut state = self.lock();
        let mut favorited: HashSet<PropertyId> = ids
            .into_iter()
            .filter(|id| !state.is_newer(*id, started))
            .collect();
        let kept: Vec<PropertyId> = state
            .favorited
            .iter()
            .copied()
            .filter(|id| state.is_newer(*id, started))
            .collect();
        if !kept.is_empty() {
            tracing::debug!("Keeping local state for {} favorites", kept.len());
        }
        favorited.extend(kept);

        let count = favorited.len();
        state.favorited = favorited;
        tracing::info!("Loaded {} favorites", count);
        Ok(count)
    }

    /// Flip a property's favorite state.
    ///
    /// Returns the settled state on success. On error the previous state is
    /// unchanged.
    pub async fn toggle(&self, property_id: PropertyId) -> FavoriteResult<FavoriteState> {
        let (current, _pending) = {
            let mut state = self.lock();
            if state.pending.contains(&property_id) {
                tracing::debug!("Rejecting toggle for {}: already pending", property_id);
                return Err(FavoriteError::Pending(property_id));
            }
            state.pending.insert(property_id);
            let current = if state.favorited.contains(&property_id) {
                FavoriteState::Favorited
            } else {
                FavoriteState::NotFavorited
            };
            (
                current,
                PendingGuard {
                    state: &self.state,
                    property_id,
                },
            )
        };

        let target = current.toggled();
        let outcome = if target.is_favorited() {
            self.store.add_favorite(property_id).await.map(|_| target)
        } else {
            self.store.remove_favorite(property_id).await.map(|()| target)
        };

        match &outcome {
            Ok(new_state) => {
                let mut state = self.lock();
                if new_state.is_favorited() {
                    state.favorited.insert(property_id);
                } else {
                    state.favorited.remove(&property_id);
                }
                state.generation += 1;
                let generation = state.generation;
                state.committed.insert(property_id, generation);
                tracing::debug!("Property {} is now {:?}", property_id, new_state);
            }
            Err(e) => {
                tracing::warn!("Favorite toggle for {} failed: {}", property_id, e);
            }
        }

        outcome
    }

    /// Whether the property is saved, as of the last settled toggle or load
    pub fn is_favorite(&self, property_id: PropertyId) -> bool {
        self.lock().favorited.contains(&property_id)
    }

    /// Current state including in-flight toggles
    pub fn state(&self, property_id: PropertyId) -> FavoriteState {
        let state = self.lock();
        if state.pending.contains(&property_id) {
            FavoriteState::Pending
        } else if state.favorited.contains(&property_id) {
            FavoriteState::Favorited
        } else {
            FavoriteState::NotFavorited
        }
    }

    /// Saved property ids in ascending order
    pub fn favorite_ids(&self) -> Vec<PropertyId> {
        let mut ids: Vec<PropertyId> = self.lock().favorited.iter().copied().collect();
        ids.sort();
        ids
    }

    /// Resolve saved favorites to properties, in the order they were saved.
    ///
    /// Favorites pointing at properties that no longer resolve are skipped.
    pub async fn saved_properties(
        &self,
        source: &dyn PropertySource,
    ) -> FavoriteResult<Vec<Property>> {
        let favorites = self.store.get_all().await?;
        let mut properties = Vec::with_capacity(favorites.len());

        for favorite in favorites {
            match source.get_by_id(favorite.property_id).await {
                Ok(property) => properties.push(property),
                Err(e) => {
                    tracing::warn!(
                        "Failed to load property {} for favorite {}: {}",
                        favorite.property_id,
                        favorite.id,
                        e
                    );
                }
            }
        }

        Ok(properties)
    }

    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
