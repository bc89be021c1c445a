use thiserror::Error;

use crate::models::{MatchConfig, MatchRequest, MatchResult, Venue};
use crate::core::{
    filters::{fits_capacity, is_relevant},
    scoring::score_venue,
};

/// Errors the matching engine can signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Budget and participant count required")]
    MissingParameter,
}

/// Result of the matching process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    /// Number of matches returned, after truncation
    pub total_found: usize,
    /// Catalog size the ranking started from
    pub candidates_considered: usize,
}

/// Venue matching engine
///
/// # Pipeline Stages
/// 1. Capacity eligibility filter
/// 2. Price, capacity and budget scoring
/// 3. Relevance threshold
/// 4. Ranking and truncation
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Rank venues for a budget and headcount
    ///
    /// Fails with [`MatchError::MissingParameter`] before touching the
    /// catalog if either value is not positive.
    pub fn find_matches(
        &self,
        budget: f64,
        participant_count: i64,
        venues: &[Venue],
    ) -> Result<MatchOutcome, MatchError> {
        let request = MatchRequest::new(budget, participant_count)?;
        Ok(self.rank(&request, venues))
    }

    /// Rank venues for an already validated request
    pub fn rank(&self, request: &MatchRequest, venues: &[Venue]) -> MatchOutcome {
        let participant_count = request.participant_count();
        let budget_per_person = request.budget_per_person();

        let mut matches: Vec<MatchResult> = venues
            .iter()
            // Stage 1: Capacity gate
            .filter(|venue| fits_capacity(venue, participant_count))
            // Stage 2 & 3: Score and drop irrelevant venues
            .filter_map(|venue| {
                let score = score_venue(venue, request, &self.config.weights);

                if !is_relevant(score.total, self.config.relevance_threshold) {
                    return None;
                }

                let total_cost = venue.price_per_person * participant_count as f64;

                Some(MatchResult::new(
                    venue.clone(),
                    score.total,
                    total_cost,
                    budget_per_person,
                    total_cost <= request.budget(),
                ))
            })
            .collect();

        // Stable sort: equal scores keep catalog order
        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        matches.truncate(self.config.max_results);

        MatchOutcome {
            total_found: matches.len(),
            matches,
            candidates_considered: venues.len(),
        }
    }
}
