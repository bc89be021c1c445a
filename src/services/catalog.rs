use std::path::Path;
use thiserror::Error;

use crate::core::fits_capacity;
use crate::models::Venue;
use crate::services::{PostgresClient, PostgresError, RestCatalogClient, RestError};

/// Errors that can occur when loading the in-memory catalog
#[derive(Debug, Error)]
pub enum MemoryCatalogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid catalog file: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Errors surfaced by any catalog backend
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("PostgreSQL catalog error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("REST catalog error: {0}")]
    Rest(#[from] RestError),

    #[error("Memory catalog error: {0}")]
    Memory(#[from] MemoryCatalogError),
}

/// Venue catalog held in process
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    venues: Vec<Venue>,
}

impl MemoryCatalog {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues }
    }

    /// Load a JSON array of venues from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MemoryCatalogError> {
        let bytes = std::fs::read(path.as_ref())?;
        let venues: Vec<Venue> = serde_json::from_slice(&bytes)?;

        tracing::info!(
            "Loaded {} venues from {}",
            venues.len(),
            path.as_ref().display()
        );

        Ok(Self::new(venues))
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn venues_for_group(&self, participant_count: u32) -> Vec<Venue> {
        self.venues
            .iter()
            .filter(|venue| fits_capacity(venue, participant_count))
            .cloned()
            .collect()
    }
}

/// Where venues come from
///
/// Every backend pushes the capacity filter down, so callers only receive
/// venues that can host the group.
pub enum VenueCatalog {
    Postgres(PostgresClient),
    Rest(RestCatalogClient),
    Memory(MemoryCatalog),
}

impl VenueCatalog {
    pub fn backend_name(&self) -> &'static str {
        match self {
            VenueCatalog::Postgres(_) => "postgres",
            VenueCatalog::Rest(_) => "rest",
            VenueCatalog::Memory(_) => "memory",
        }
    }

    /// Fetch the venues that can host a group of the given size
    pub async fn venues_for_group(&self, participant_count: u32) -> Result<Vec<Venue>, CatalogError> {
        match self {
            VenueCatalog::Postgres(client) => Ok(client.venues_for_group(participant_count).await?),
            VenueCatalog::Rest(client) => Ok(client.venues_for_group(participant_count).await?),
            VenueCatalog::Memory(catalog) => Ok(catalog.venues_for_group(participant_count)),
        }
    }

    /// Whether the backing store answers
    pub async fn health_check(&self) -> bool {
        let result = match self {
            VenueCatalog::Postgres(client) => client.health_check().await.map_err(CatalogError::from),
            VenueCatalog::Rest(client) => client.health_check().await.map_err(CatalogError::from),
            VenueCatalog::Memory(_) => Ok(true),
        };

        match result {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Catalog health check failed ({}): {}", self.backend_name(), e);
                false
            }
        }
    }
}
