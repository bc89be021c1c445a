// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Venue, MatchRequest, MatchResult, ScoringWeights, MatchConfig};
pub use requests::{MatchLocationsRequest, InvalidateCacheRequest};
pub use responses::{MatchLocationsResponse, HealthResponse, CacheInvalidatedResponse, ErrorResponse};
