use crate::models::Venue;

/// Check if a venue supports the group size
///
/// Hard eligibility gate: bounds are inclusive, and a venue outside them is
/// never scored.
#[inline]
pub fn fits_capacity(venue: &Venue, participant_count: u32) -> bool {
    venue.capacity_min <= participant_count && participant_count <= venue.capacity_max
}

/// Check if a score clears the relevance threshold (strictly above)
#[inline]
pub fn is_relevant(score: u32, threshold: u32) -> bool {
    score > threshold
}
