use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

use crate::core::{MatchError, Matcher};
use crate::models::{
    CacheInvalidatedResponse, ErrorResponse, HealthResponse, InvalidateCacheRequest,
    MatchLocationsRequest, MatchLocationsResponse, MatchRequest, Venue,
};
use crate::services::{CacheKey, CacheManager, CatalogError, VenueCatalog};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<VenueCatalog>,
    pub cache: Option<Arc<CacheManager>>,
    pub matcher: Matcher,
}

impl AppState {
    /// Venues for a group size, read through the cache when there is one
    async fn venues_for_group(&self, participant_count: u32) -> Result<Vec<Venue>, CatalogError> {
        let Some(cache) = &self.cache else {
            return self.catalog.venues_for_group(participant_count).await;
        };

        let key = CacheKey::venues_for_group(participant_count);

        match cache.get::<Vec<Venue>>(&key).await {
            Ok(venues) => return Ok(venues),
            Err(crate::services::CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
        }

        let venues = self.catalog.venues_for_group(participant_count).await?;

        if let Err(e) = cache.set(&key, &venues).await {
            tracing::warn!("Failed to cache venues for {}: {}", key, e);
        }

        Ok(venues)
    }
}

/// Configure location routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/locations/match", web::post().to(match_locations))
        .route("/locations/match", web::get().to(match_locations_query))
        .route("/locations/cache", web::delete().to(invalidate_cache));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = state.catalog.health_check().await;

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog: state.catalog.backend_name().to_string(),
        cache: state.cache.as_ref().map(|cache| cache.stats()),
        timestamp: chrono::Utc::now(),
    })
}

/// Match locations endpoint
///
/// POST /api/locations/match
///
/// Request body:
/// ```json
/// {
///   "budget": 5000,
///   "participantCount": 20
/// }
/// ```
async fn match_locations(
    state: web::Data<AppState>,
    req: web::Json<MatchLocationsRequest>,
) -> impl Responder {
    run_match(&state, &req).await
}

/// Match locations endpoint, query-string flavour
///
/// GET /api/locations/match?budget=5000&participantCount=20
async fn match_locations_query(
    state: web::Data<AppState>,
    req: web::Query<MatchLocationsRequest>,
) -> impl Responder {
    run_match(&state, &req).await
}

/// Drop cached catalog reads
///
/// DELETE /api/locations/cache?participantCount=20
///
/// Without `participantCount` every cached group is dropped.
async fn invalidate_cache(
    state: web::Data<AppState>,
    req: web::Query<InvalidateCacheRequest>,
) -> impl Responder {
    let Some(cache) = &state.cache else {
        return HttpResponse::Ok().json(CacheInvalidatedResponse {
            invalidated: None,
            cache: None,
        });
    };

    let (target, result) = match req.participant_count {
        Some(count) => {
            let key = CacheKey::venues_for_group(count);
            let result = cache.delete(&key).await;
            (key, result)
        }
        None => {
            let pattern = CacheKey::all_venues();
            (pattern.to_string(), cache.invalidate_pattern(pattern).await)
        }
    };

    if let Err(e) = result {
        tracing::error!("Failed to invalidate {}: {}", target, e);
        return HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Failed to invalidate cache".to_string(),
            message: e.to_string(),
            status_code: 500,
        });
    }

    tracing::info!("Invalidated cached venues: {}", target);

    HttpResponse::Ok().json(CacheInvalidatedResponse {
        invalidated: Some(target),
        cache: Some(cache.stats()),
    })
}

async fn run_match(state: &AppState, req: &MatchLocationsRequest) -> HttpResponse {
    let request = match validate_request(req) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let request_id = uuid::Uuid::new_v4();

    tracing::info!(
        %request_id,
        "Matching locations: budget={}, participants={}",
        request.budget(),
        request.participant_count()
    );

    let venues = match state.venues_for_group(request.participant_count()).await {
        Ok(venues) => venues,
        Err(e) => {
            tracing::error!(%request_id, "Failed to load venue catalog: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load venue catalog".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let outcome = state.matcher.rank(&request, &venues);

    tracing::info!(
        %request_id,
        "Returning {} matches (from {} candidates)",
        outcome.total_found,
        outcome.candidates_considered
    );

    HttpResponse::Ok().json(MatchLocationsResponse {
        matches: outcome.matches,
        total_found: outcome.total_found,
    })
}

fn validate_request(req: &MatchLocationsRequest) -> Result<MatchRequest, HttpResponse> {
    let missing = |message: String| {
        HttpResponse::BadRequest().json(ErrorResponse {
            error: MatchError::MissingParameter.to_string(),
            message,
            status_code: 400,
        })
    };

    if let Err(errors) = req.validate() {
        tracing::info!(
            "Validation failed for match request: budget={:?}, participantCount={:?}",
            req.budget,
            req.participant_count
        );
        return Err(missing(errors.to_string()));
    }

    req.to_match_request().map_err(|e| missing(e.to_string()))
}
