use crate::models::Venue;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the hosted backend
#[derive(Debug, Error)]
pub enum RestError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Hosted backend REST client for the venue catalog
///
/// Talks to a PostgREST-style row API: filters are passed as
/// `column=op.value` query parameters and rows come back as a JSON array.
pub struct RestCatalogClient {
    base_url: String,
    api_key: String,
    table: String,
    client: Client,
}

impl RestCatalogClient {
    /// Create a new REST catalog client
    pub fn new(
        base_url: String,
        api_key: String,
        table: String,
        timeout: Duration,
    ) -> Result<Self, RestError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            table,
            client,
        })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.table)
        )
    }

    async fn get_rows(&self, query: &[(&str, String)]) -> Result<Vec<Value>, RestError> {
        let url = self.table_url();

        tracing::debug!("Querying venue catalog at {} with {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RestError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Venue catalog query failed: {} - {}", status, body);
            return Err(RestError::ApiError(format!(
                "Failed to query venues: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        match json {
            Value::Array(rows) => Ok(rows),
            _ => Err(RestError::InvalidResponse("Expected an array of rows".into())),
        }
    }

    /// Fetch every venue whose capacity range includes the group size
    pub async fn venues_for_group(&self, participant_count: u32) -> Result<Vec<Venue>, RestError> {
        let rows = self
            .get_rows(&[
                ("select", "*".to_string()),
                ("capacity_min", format!("lte.{}", participant_count)),
                ("capacity_max", format!("gte.{}", participant_count)),
            ])
            .await?;

        let total = rows.len();

        let venues: Vec<Venue> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Venue>(row) {
                Ok(venue) => Some(venue),
                Err(e) => {
                    tracing::warn!("Skipping malformed venue row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Queried {} venues (rows: {})", venues.len(), total);

        Ok(venues)
    }

    /// Health check: a one-row read of the table
    pub async fn health_check(&self) -> Result<bool, RestError> {
        self.get_rows(&[("select", "id".to_string()), ("limit", "1".to_string())])
            .await
            .map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_client_creation() {
        let client = RestCatalogClient::new(
            "https://backend.test/".to_string(),
            "test_key".to_string(),
            "locations".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.table_url(), "https://backend.test/rest/v1/locations");
    }
}
