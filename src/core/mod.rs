// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::{fits_capacity, is_relevant};
pub use matcher::{Matcher, MatchError, MatchOutcome};
pub use scoring::{score_venue, ScoreBreakdown};
