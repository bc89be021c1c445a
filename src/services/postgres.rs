use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::Venue;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// PostgreSQL venue catalog
///
/// Reads venues straight from the locations table. Each row is turned into
/// JSON on the server side so that descriptive columns travel through to the
/// response without the client knowing the table layout.
pub struct PostgresClient {
    pool: PgPool,
    table: String,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        table: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let table = validate_table_name(table)?;

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool, table })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        table: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL (table: {})", table);

        Self::new(
            url,
            table,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch every venue whose capacity range includes the group size
    pub async fn venues_for_group(&self, participant_count: u32) -> Result<Vec<Venue>, PostgresError> {
        let query = format!(
            r#"
            SELECT to_jsonb(l) AS doc
            FROM {} l
            WHERE l.capacity_min <= $1 AND l.capacity_max >= $1
            "#,
            self.table
        );

        let rows = sqlx::query(&query)
            .bind(participant_count as i64)
            .fetch_all(&self.pool)
            .await?;

        let docs: Vec<Value> = rows
            .iter()
            .map(|row| row.try_get("doc"))
            .collect::<Result<_, _>>()?;

        let venues = decode_rows(docs);

        tracing::debug!(
            "PostgreSQL returned {} venues for a group of {}",
            venues.len(),
            participant_count
        );

        Ok(venues)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Decode row documents, skipping rows that don't describe a venue
fn decode_rows(docs: Vec<Value>) -> Vec<Venue> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value::<Venue>(doc) {
            Ok(venue) => Some(venue),
            Err(e) => {
                tracing::warn!("Skipping malformed venue row: {}", e);
                None
            }
        })
        .collect()
}

/// The table name is interpolated into SQL, so only plain identifiers pass
fn validate_table_name(table: &str) -> Result<String, PostgresError> {
    let valid = !table.is_empty()
        && table
            .split('.')
            .all(|part| {
                !part.is_empty()
                    && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    && !part.starts_with(|c: char| c.is_ascii_digit())
            });

    if valid {
        Ok(table.to_string())
    } else {
        Err(PostgresError::InvalidInput(format!("invalid table name: {:?}", table)))
    }
}
