//! Property source trait and the in-memory repository.

use crate::domain::{Property, PropertyId};
use crate::error::{PropertyError, PropertyResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tokio::sync::RwLock;

const SAMPLE_PROPERTIES: &str = include_str!("../../fixtures/properties.json");

/// Read access to the canonical property collection
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// All properties in repository order
    async fn get_all(&self) -> PropertyResult<Vec<Property>>;

    /// Look up a single property
    async fn get_by_id(&self, id: PropertyId) -> PropertyResult<Property>;
}

/// Property repository held in memory, with optional simulated latency
pub struct InMemoryPropertyRepository {
    properties: RwLock<Vec<Property>>,
    latency: Duration,
}

impl InMemoryPropertyRepository {
    /// Create a repository from records, rejecting duplicate ids and
    /// invalid records
    pub fn new(records: Vec<Property>) -> PropertyResult<Self> {
        let mut seen = HashSet::new();
        for record in &records {
            record
                .validate()
                .map_err(|reason| PropertyError::InvalidRecord {
                    id: record.id,
                    reason,
                })?;
            if !seen.insert(record.id) {
                return Err(PropertyError::DuplicateId(record.id));
            }
        }

        Ok(Self {
            properties: RwLock::new(records),
            latency: Duration::ZERO,
        })
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Parse a JSON array of property records
    pub fn from_json_str(json: &str) -> PropertyResult<Self> {
        let records: Vec<Property> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load a JSON fixture file
    pub fn from_json_file(path: &Path) -> PropertyResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let repo = Self::from_json_str(&json)?;
        tracing::info!("Loaded property fixtures from {:?}", path);
        Ok(repo)
    }

    /// Repository seeded with the bundled sample listings
    pub fn sample() -> PropertyResult<Self> {
        Self::from_json_str(SAMPLE_PROPERTIES)
    }

    /// Add a listing. The id is assigned by the repository and the listed
    /// date is set to now.
    pub async fn create(&self, mut property: Property) -> PropertyResult<Property> {
        self.simulate_latency().await;
        let mut properties = self.properties.write().await;

        property.id = PropertyId(properties.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1);
        property.listed_date = Utc::now();
        property
            .validate()
            .map_err(|reason| PropertyError::InvalidRecord {
                id: property.id,
                reason,
            })?;

        properties.push(property.clone());
        tracing::debug!("Created property {}", property.id);
        Ok(property)
    }

    /// Replace a listing's attributes. The stored id is kept.
    pub async fn update(&self, id: PropertyId, mut property: Property) -> PropertyResult<Property> {
        self.simulate_latency().await;
        let mut properties = self.properties.write().await;

        let slot = properties
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PropertyError::NotFound(id))?;

        property.id = id;
        property
            .validate()
            .map_err(|reason| PropertyError::InvalidRecord { id, reason })?;
        *slot = property.clone();
        Ok(property)
    }

    /// Remove a listing
    pub async fn delete(&self, id: PropertyId) -> PropertyResult<()> {
        self.simulate_latency().await;
        let mut properties = self.properties.write().await;

        let index = properties
            .iter()
            .position(|p| p.id == id)
            .ok_or(PropertyError::NotFound(id))?;
        properties.remove(index);
        tracing::debug!("Deleted property {}", id);
        Ok(())
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl PropertySource for InMemoryPropertyRepository {
    async fn get_all(&self) -> PropertyResult<Vec<Property>> {
        self.simulate_latency().await;
        Ok(self.properties.read().await.clone())
    }

    async fn get_by_id(&self, id: PropertyId) -> PropertyResult<Property> {
        self.simulate_latency().await;
        self.properties
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(PropertyError::NotFound(id))
    }
}
