use serde::{Deserialize, Serialize};
use crate::models::domain::MatchResult;
use crate::services::CacheStats;

/// Response for the match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchLocationsResponse {
    pub matches: Vec<MatchResult>,
    pub total_found: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Response for the cache invalidation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheInvalidatedResponse {
    /// Key or pattern that was dropped, `None` when caching is disabled
    pub invalidated: Option<String>,
    pub cache: Option<CacheStats>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
