//! CyRide route handlers
//!
//! Route, stop, and vehicle listings are public; rider-specific endpoints
//! require a session.

use axum::extract::{Extension, Json, Query};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::extractors::AuthedSession;
use crate::common::{response, ApiError, AppState};

use super::models::{Coord, PlanRequest};

const DEFAULT_NEARBY_RADIUS_MILES: f64 = 0.5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopsQuery {
    route_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclesQuery {
    route_id: Option<String>,
}

fn require_coord(coord: Option<Coord>, field: &str) -> Result<(f64, f64), ApiError> {
    let missing = || {
        ApiError::Validation(format!(
            "{} with lat/lng coordinates is required",
            field
        ))
    };
    let coord = coord.ok_or_else(missing)?;
    match (coord.lat, coord.lng) {
        (Some(lat), Some(lng)) => Ok((lat, lng)),
        _ => Err(missing()),
    }
}

/// GET /api/cyride/routes
pub async fn list_routes(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(state.cyride.routes().await))
}

/// GET /api/cyride/routes/favorites
pub async fn favorite_routes(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state.cyride.favorite_routes(&session.user).await,
    ))
}

/// GET /api/cyride/stops?routeId=
pub async fn list_stops(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<StopsQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state.cyride.stops(query.route_id.as_deref()).await,
    ))
}

/// GET /api/cyride/stops/nearby?radius=
pub async fn nearby_stops(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Value>, ApiError> {
    let radius = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_MILES);
    Ok(response::ok(
        state.cyride.nearby_stops(&session.user, radius).await,
    ))
}

/// GET /api/cyride/trips/upcoming
pub async fn upcoming_trips(
    Extension(state): Extension<Arc<AppState>>,
    session: AuthedSession,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state.cyride.upcoming_trips(&session.user).await,
    ))
}

/// GET /api/cyride/vehicles?routeId=
pub async fn list_vehicles(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<VehiclesQuery>,
) -> Result<Json<Value>, ApiError> {
    Ok(response::ok(
        state.cyride.vehicles(query.route_id.as_deref()).await,
    ))
}

/// POST /api/cyride/route-plan
pub async fn plan_route(
    Extension(state): Extension<Arc<AppState>>,
    _session: AuthedSession,
    Json(request): Json<PlanRequest>,
) -> Result<Json<Value>, ApiError> {
    let origin = require_coord(request.origin, "Origin")?;
    let destination = require_coord(request.destination, "Destination")?;
    Ok(response::ok(
        state
            .cyride
            .plan_route(origin, destination, request.departure_time)
            .await,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_are_required() {
        assert!(matches!(
            require_coord(None, "Origin"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            require_coord(
                Some(Coord {
                    lat: Some(42.0),
                    lng: None
                }),
                "Origin"
            ),
            Err(ApiError::Validation(_))
        ));
        assert_eq!(
            require_coord(
                Some(Coord {
                    lat: Some(42.0),
                    lng: Some(-93.6)
                }),
                "Origin"
            )
            .unwrap(),
            (42.0, -93.6)
        );
    }
}
