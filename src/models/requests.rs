use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::MatchError;
use crate::models::MatchRequest;

/// Request to match venues against a budget and headcount
///
/// Used for both the JSON body and the query string of the match endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct MatchLocationsRequest {
    #[validate(required, range(exclusive_min = 0.0))]
    #[serde(default)]
    pub budget: Option<f64>,
    #[validate(required, range(min = 1))]
    #[serde(default, alias = "participant_count", rename = "participantCount")]
    pub participant_count: Option<i64>,
}

impl MatchLocationsRequest {
    pub fn to_match_request(&self) -> Result<MatchRequest, MatchError> {
        MatchRequest::from_parts(self.budget, self.participant_count)
    }
}

/// Query for dropping cached catalog reads
///
/// Without a headcount every cached group is dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvalidateCacheRequest {
    #[serde(default, alias = "participant_count", rename = "participantCount")]
    pub participant_count: Option<u32>,
}
