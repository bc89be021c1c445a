use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::core::MatchError;

/// A bookable place or activity, priced per participant
///
/// Only the price and capacity bounds take part in scoring. Everything else
/// a store returns (name, category, city, amenities, ...) is carried through
/// untouched in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "pricePerPerson", alias = "price_per_person")]
    pub price_per_person: f64,
    #[serde(rename = "capacityMin", alias = "capacity_min")]
    pub capacity_min: u32,
    #[serde(rename = "capacityMax", alias = "capacity_max")]
    pub capacity_max: u32,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Venue {
    pub fn new(id: impl Into<String>, price_per_person: f64, capacity_min: u32, capacity_max: u32) -> Self {
        Self {
            id: id.into(),
            price_per_person,
            capacity_min,
            capacity_max,
            attributes: Map::new(),
        }
    }

    /// Attach a passthrough attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    /// Arithmetic mean of the supported group sizes
    #[inline]
    pub fn capacity_midpoint(&self) -> f64 {
        (self.capacity_min as f64 + self.capacity_max as f64) / 2.0
    }
}

/// Stores hand out ids as strings, UUIDs or integers
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// A validated match request: positive budget and headcount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRequest {
    budget: f64,
    participant_count: u32,
}

impl MatchRequest {
    pub fn new(budget: f64, participant_count: i64) -> Result<Self, MatchError> {
        if !budget.is_finite() || budget <= 0.0 || participant_count <= 0 {
            return Err(MatchError::MissingParameter);
        }

        let participant_count =
            u32::try_from(participant_count).map_err(|_| MatchError::MissingParameter)?;

        Ok(Self {
            budget,
            participant_count,
        })
    }

    /// Build from possibly-absent request fields
    pub fn from_parts(budget: Option<f64>, participant_count: Option<i64>) -> Result<Self, MatchError> {
        match (budget, participant_count) {
            (Some(budget), Some(count)) => Self::new(budget, count),
            _ => Err(MatchError::MissingParameter),
        }
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn participant_count(&self) -> u32 {
        self.participant_count
    }

    /// Total budget split evenly over the group
    #[inline]
    pub fn budget_per_person(&self) -> f64 {
        self.budget / self.participant_count as f64
    }
}

/// A venue that survived filtering, with its score and derived cost fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub venue: Venue,
    #[serde(rename = "matchScore")]
    pub match_score: u32,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
    #[serde(rename = "budgetPerPerson")]
    pub budget_per_person: f64,
    #[serde(rename = "fitsBudget")]
    pub fits_budget: bool,
}

impl MatchResult {
    /// Keys the result writes next to the flattened venue
    pub const RESERVED_KEYS: [&'static str; 4] =
        ["matchScore", "totalCost", "budgetPerPerson", "fitsBudget"];

    /// Wrap a scored venue
    ///
    /// Passthrough attributes named like a result field are dropped, so the
    /// serialized object never carries a key twice.
    pub fn new(
        mut venue: Venue,
        match_score: u32,
        total_cost: f64,
        budget_per_person: f64,
        fits_budget: bool,
    ) -> Self {
        for key in Self::RESERVED_KEYS {
            venue.attributes.remove(key);
        }

        Self {
            venue,
            match_score,
            total_cost,
            budget_per_person,
            fits_budget,
        }
    }
}

/// Maximum points for each score component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub price_fit: f64,
    pub capacity_fit: f64,
    pub budget_fit: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            price_fit: 40.0,
            capacity_fit: 30.0,
            budget_fit: 30.0,
        }
    }
}

/// Engine parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    pub weights: ScoringWeights,
    /// A venue must score strictly above this to be returned
    pub relevance_threshold: u32,
    pub max_results: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            relevance_threshold: 30,
            max_results: 5,
        }
    }
}
