//! Listings session state and page-level operations.
//!
//! `App` is what UI collaborators drive: it owns the current view state
//! (filters, sort, results), delegates queries to the orchestrator and
//! favorite toggles to the synchronizer, and turns repository failures into
//! a user-visible `error_message` without disturbing prior state.

use crate::config::AppConfig;
use crate::domain::{FavoriteState, Property, PropertyId};
use crate::error::{AppError, Result};
use crate::query::{FilterSpec, QueryOrchestrator, QueryOutcome, SortKey};
use crate::services::{
    FavoriteStore, FavoritesSync, InMemoryFavoriteRepository, InMemoryPropertyRepository,
    PropertySource,
};
use std::sync::Arc;

/// Main application state
pub struct App {
    /// Loaded configuration
    pub config: AppConfig,

    // View state
    /// Active filters
    pub filters: FilterSpec,
    /// Active sort order
    pub sort: SortKey,
    /// Filtered and sorted listings currently shown
    pub results: Vec<Property>,
    /// Size of the unfiltered collection
    pub total: usize,

    // Async state
    /// Error message to display
    pub error_message: Option<String>,
    /// Loading state
    pub is_loading: bool,

    // Services
    properties: Arc<dyn PropertySource>,
    orchestrator: QueryOrchestrator,
    favorites: FavoritesSync,
}

impl App {
    /// Create a session over injected repositories
    pub fn new(
        config: AppConfig,
        properties: Arc<dyn PropertySource>,
        favorites: Arc<dyn FavoriteStore>,
    ) -> Self {
        let sort = config.listings.default_sort;
        Self {
            config,
            filters: FilterSpec::default(),
            sort,
            results: Vec::new(),
            total: 0,
            error_message: None,
            is_loading: false,
            orchestrator: QueryOrchestrator::new(properties.clone()),
            properties,
            favorites: FavoritesSync::new(favorites),
        }
    }

    /// Build the in-memory repositories described by the configuration
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let latency = config.data.simulated_latency();

        let properties = match &config.data.properties_path {
            Some(path) => InMemoryPropertyRepository::from_json_file(path)?,
            None => InMemoryPropertyRepository::sample()?,
        }
        .with_latency(latency);

        let favorites = match &config.data.favorites_path {
            Some(path) => InMemoryFavoriteRepository::from_json_file(path)?,
            None => InMemoryFavoriteRepository::new(),
        }
        .with_latency(latency);

        Ok(Self::new(config, Arc::new(properties), Arc::new(favorites)))
    }

    /// Initialize the session (load listings and favorites)
    pub async fn init(&mut self) -> Result<()> {
        self.is_loading = true;
        let favorites = self.favorites.load().await;
        let listings = self.orchestrator.properties().await;
        self.is_loading = false;

        if let Err(e) = favorites {
            self.error_message = Some(format!("Failed to load favorites: {}", e));
        }
        listings?;

        self.refresh_results().await;
        Ok(())
    }

    /// Re-run the current query
    pub async fn refresh_results(&mut self) {
        match self.orchestrator.submit(&self.filters, self.sort).await {
            Ok(QueryOutcome::Applied(result)) => {
                self.results = result.properties;
                self.total = result.total;
            }
            Ok(QueryOutcome::Superseded { request, latest }) => {
                tracing::debug!("Ignoring results of request {} (latest {})", request, latest);
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to load properties: {}", e));
            }
        }
    }

    /// Replace the active filters wholesale
    pub async fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
        self.refresh_results().await;
    }

    /// Change the sort order
    pub async fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.refresh_results().await;
    }

    /// Search-bar input: updates the location filter on every keystroke
    pub async fn search(&mut self, text: &str) {
        let location = text.trim();
        self.filters = FilterSpec {
            location: (!location.is_empty()).then(|| location.to_string()),
            ..self.filters.clone()
        };
        self.refresh_results().await;
    }

    /// Remove all filters
    pub async fn clear_filters(&mut self) {
        self.set_filters(FilterSpec::default()).await;
    }

    /// Reload listings from the repository, e.g. after a retry
    pub async fn reload(&mut self) -> Result<()> {
        self.error_message = None;
        self.orchestrator.invalidate();
        self.init().await
    }

    /// Toggle a favorite. On failure the notice is set and `None` returned.
    pub async fn toggle_favorite(&mut self, property_id: PropertyId) -> Option<FavoriteState> {
        match self.favorites.toggle(property_id).await {
            Ok(state) => {
                self.error_message = None;
                Some(state)
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to update favorites: {}", e));
                None
            }
        }
    }

    /// Whether a property is saved
    pub fn is_favorite(&self, property_id: PropertyId) -> bool {
        self.favorites.is_favorite(property_id)
    }

    /// Favorite state including in-flight toggles
    pub fn favorite_state(&self, property_id: PropertyId) -> FavoriteState {
        self.favorites.state(property_id)
    }

    /// Properties on the favorites page
    pub async fn favorite_properties(&mut self) -> Vec<Property> {
        match self.favorites.saved_properties(self.properties.as_ref()).await {
            Ok(properties) => properties,
            Err(e) => {
                self.error_message = Some(format!("Failed to load favorites: {}", e));
                Vec::new()
            }
        }
    }

    /// Property detail page lookup
    pub async fn property_detail(&mut self, property_id: PropertyId) -> Option<Property> {
        match self.properties.get_by_id(property_id).await {
            Ok(property) => Some(property),
            Err(e) => {
                let err = AppError::from(e);
                self.error_message = Some(err.to_string());
                None
            }
        }
    }

    /// Header line for the results list
    pub fn results_summary(&self) -> String {
        let active = self.filters.active_count();
        let filters = match active {
            0 => String::new(),
            1 => " (1 filter)".to_string(),
            n => format!(" ({} filters)", n),
        };
        format!(
            "{} of {} properties, {}{}",
            self.results.len(),
            self.total,
            self.sort.label(),
            filters
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::property;

    fn app() -> App {
        let mut a = property(1, 200_000.0, 2, (2023, 1, 1));
        a.address = "10 Lake Shore Drive, Chicago, IL".to_string();
        a.features = vec!["Rooftop Pool Access".to_string()];
        let mut b = property(2, 500_000.0, 4, (2024, 1, 1));
        b.address = "22 Pine Street, Denver, CO".to_string();
        b.features = vec!["Garden".to_string()];

        let properties = InMemoryPropertyRepository::new(vec![a, b]).unwrap();
        App::new(
            AppConfig::default(),
            Arc::new(properties),
            Arc::new(InMemoryFavoriteRepository::new()),
        )
    }

    fn shown(app: &App) -> Vec<u32> {
        app.results.iter().map(|p| p.id.get()).collect()
    }

    #[tokio::test]
    async fn test_init_shows_all_newest_first() {
        let mut app = app();
        app.init().await.unwrap();
        assert_eq!(shown(&app), [2, 1]);
        assert_eq!(app.total, 2);
        assert!(!app.is_loading);
        assert!(app.error_message.is_none());
    }

    #[tokio::test]
    async fn test_filters_sort_and_search() {
        let mut app = app();
        app.init().await.unwrap();

        app.set_sort(SortKey::PriceLow).await;
        assert_eq!(shown(&app), [1, 2]);

        app.set_filters(FilterSpec {
            amenities: vec!["pool".to_string()],
            ..Default::default()
        })
        .await;
        assert_eq!(shown(&app), [1]);

        app.search("denver").await;
        assert!(app.results.is_empty());
        assert_eq!(app.filters.amenities, vec!["pool".to_string()]);

        app.clear_filters().await;
        app.search("  denver ").await;
        assert_eq!(shown(&app), [2]);
        assert_eq!(app.filters.location.as_deref(), Some("denver"));

        app.search("").await;
        assert_eq!(app.filters.location, None);
        assert_eq!(shown(&app), [1, 2]);
    }

    #[tokio::test]
    async fn test_toggle_favorite_sets_notice_on_failure() {
        let mut app = app();
        app.init().await.unwrap();
        let id = PropertyId(1);

        assert_eq!(app.toggle_favorite(id).await, Some(FavoriteState::Favorited));
        assert!(app.is_favorite(id));

        // Remove behind the session's back, then toggle again
        app.favorites.store().remove_favorite(id).await.unwrap();
        assert_eq!(app.toggle_favorite(id).await, None);
        assert!(app.error_message.as_deref().unwrap().contains("Favorite not found"));
        assert_eq!(app.favorite_state(id), FavoriteState::Favorited);
    }

    #[tokio::test]
    async fn test_favorite_properties_and_detail() {
        let mut app = app();
        app.init().await.unwrap();
        app.toggle_favorite(PropertyId(2)).await;

        let saved = app.favorite_properties().await;
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, PropertyId(2));

        assert!(app.property_detail(PropertyId(1)).await.is_some());
        assert!(app.property_detail(PropertyId(9)).await.is_none());
        insta::assert_snapshot!(
            app.error_message.as_deref().unwrap(),
            @"Property error: Property not found: 9"
        );
    }

    #[tokio::test]
    async fn test_results_summary() {
        let mut app = app();
        app.init().await.unwrap();
        app.set_filters(FilterSpec {
            price_max: Some(300_000.0),
            bedrooms_min: Some(2),
            ..Default::default()
        })
        .await;
        insta::assert_snapshot!(
            app.results_summary(),
            @"1 of 2 properties, Newest First (2 filters)"
        );
    }

    #[tokio::test]
    async fn test_from_config_uses_sample_data() {
        let mut app = App::from_config(AppConfig::default()).unwrap();
        app.init().await.unwrap();
        assert!(app.total > 0);
        assert_eq!(app.results.len(), app.total);
    }
}
