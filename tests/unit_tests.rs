// Unit tests for Venue Match

use venue_match::core::{
    filters::{fits_capacity, is_relevant},
    scoring::{budget_fit_score, capacity_fit_score, price_fit_score, score_venue},
};
use venue_match::models::{MatchRequest, ScoringWeights, Venue};

#[test]
fn test_price_fit_full_points_at_budget_per_person() {
    assert_eq!(price_fit_score(250.0, 250.0, 40.0), 40.0);
}

#[test]
fn test_price_fit_zero_at_double_budget() {
    // Twice the budget per person is a relative error of one
    assert_eq!(price_fit_score(250.0, 500.0, 40.0), 0.0);
    assert_eq!(price_fit_score(0.5, 1.0, 40.0), 0.0);
}

#[test]
fn test_price_fit_symmetric() {
    let under = price_fit_score(100.0, 75.0, 40.0);
    let over = price_fit_score(100.0, 125.0, 40.0);
    assert_eq!(under, over);
    assert_eq!(under, 30.0);
}

#[test]
fn test_capacity_fit_at_midpoint() {
    let venue = Venue::new("v", 10.0, 10, 30);
    assert_eq!(capacity_fit_score(venue.capacity_midpoint(), 20.0, 30.0), 30.0);
}

#[test]
fn test_capacity_fit_at_bounds() {
    let venue = Venue::new("v", 10.0, 10, 30);
    let mid = venue.capacity_midpoint();

    assert_eq!(capacity_fit_score(mid, 10.0, 30.0), 15.0);
    assert_eq!(capacity_fit_score(mid, 30.0, 30.0), 15.0);
}

#[test]
fn test_capacity_fit_never_negative() {
    // Wide venue, tiny group far from the midpoint
    let venue = Venue::new("v", 10.0, 1, 1000);
    let score = capacity_fit_score(venue.capacity_midpoint(), 1.0, 30.0);
    assert!(score >= 0.0 && score < 1.0);
}

#[test]
fn test_budget_fit_is_binary() {
    assert_eq!(budget_fit_score(100.0, 100.0, 30.0), 30.0);
    assert_eq!(budget_fit_score(0.0, 100.0, 30.0), 30.0);
    assert_eq!(budget_fit_score(100.5, 100.0, 30.0), 0.0);
}

#[test]
fn test_zero_capacity_venue_gets_no_capacity_points() {
    let venue = Venue::new("v", 10.0, 0, 0);
    assert_eq!(capacity_fit_score(venue.capacity_midpoint(), 1.0, 30.0), 0.0);
}

#[test]
fn test_score_venue_breakdown_sums() {
    let venue = Venue::new("v", 200.0, 10, 50);
    let request = MatchRequest::new(5000.0, 20).unwrap();
    let breakdown = score_venue(&venue, &request, &ScoringWeights::default());

    // bpp 250: price gap 50 -> 40 - 8 = 32; midpoint 30: gap 10 -> 30 - 10 = 20; fits budget
    assert!((breakdown.price_fit - 32.0).abs() < 1e-9);
    assert!((breakdown.capacity_fit - 20.0).abs() < 1e-9);
    assert_eq!(breakdown.budget_fit, 30.0);
    assert_eq!(breakdown.total, 82);
}

#[test]
fn test_capacity_filter() {
    let venue = Venue::new("v", 10.0, 10, 30);

    assert!(fits_capacity(&venue, 10));
    assert!(fits_capacity(&venue, 30));
    assert!(!fits_capacity(&venue, 9));
    assert!(!fits_capacity(&venue, 31));
}

#[test]
fn test_relevance_threshold() {
    assert!(!is_relevant(30, 30));
    assert!(is_relevant(31, 30));
}
