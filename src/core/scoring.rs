use crate::models::{MatchRequest, ScoringWeights, Venue};

/// Per-component contributions to a venue's match score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub price_fit: f64,
    pub capacity_fit: f64,
    pub budget_fit: f64,
    /// Rounded sum of the components, clamped to 0-100
    pub total: u32,
}

/// Calculate a match score (0-100) for a venue against a request
///
/// Scoring formula, with the default weights:
/// score = round(
///     price_fit      (max 40)   # per-person price close to budget per person
///   + capacity_fit   (max 30)   # group size close to the capacity midpoint
///   + budget_fit     (0 or 30)  # total cost within budget
/// )
pub fn score_venue(
    venue: &Venue,
    request: &MatchRequest,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let participants = request.participant_count() as f64;

    let price_fit = price_fit_score(
        request.budget_per_person(),
        venue.price_per_person,
        weights.price_fit,
    );

    let capacity_fit = capacity_fit_score(
        venue.capacity_midpoint(),
        participants,
        weights.capacity_fit,
    );

    let budget_fit = budget_fit_score(
        venue.price_per_person * participants,
        request.budget(),
        weights.budget_fit,
    );

    let total = (price_fit + capacity_fit + budget_fit).round().clamp(0.0, 100.0) as u32;

    ScoreBreakdown {
        price_fit,
        capacity_fit,
        budget_fit,
        total,
    }
}

/// Price-fit contribution
/// Decays linearly with the price gap relative to the budget per person
#[inline]
pub fn price_fit_score(budget_per_person: f64, price_per_person: f64, weight: f64) -> f64 {
    relative_decay(budget_per_person, price_per_person, weight)
}

/// Capacity-fit contribution
/// Decays linearly with the distance from the capacity midpoint relative to the midpoint
#[inline]
pub fn capacity_fit_score(capacity_midpoint: f64, participants: f64, weight: f64) -> f64 {
    relative_decay(capacity_midpoint, participants, weight)
}

/// Budget-adequacy contribution: all or nothing
#[inline]
pub fn budget_fit_score(total_cost: f64, budget: f64, weight: f64) -> f64 {
    if total_cost <= budget {
        weight
    } else {
        0.0
    }
}

/// `max(0, weight - |target - actual| / target * weight)`
///
/// A zero target scores nothing.
#[inline]
fn relative_decay(target: f64, actual: f64, weight: f64) -> f64 {
    if target == 0.0 {
        return 0.0;
    }

    let deviation = (target - actual).abs() / target;

    (weight - deviation * weight).max(0.0)
}
