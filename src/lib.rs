//! Venue Match - budget and headcount venue matching for team event planning
//!
//! Ranks bookable venues and activities against an event budget and a group
//! size, and serves the ranking over HTTP in front of a venue catalog store.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, MatchOutcome, score_venue};
pub use models::{Venue, MatchRequest, MatchResult, MatchConfig, ScoringWeights, MatchLocationsRequest, MatchLocationsResponse};
