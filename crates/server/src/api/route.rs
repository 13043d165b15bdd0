use crate::{dto::RouteDto, state::AppState};
use albion_transit::pathfinder::RoutePreferences;
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::{collections::HashMap, sync::Arc};

fn preferences_from_params(params: &HashMap<String, String>) -> RoutePreferences {
    let flag = |key: &str| params.get(key).is_some_and(|v| v == "true" || v == "1");
    RoutePreferences {
        avoid_walking: flag("avoid_walking"),
        prefer_direct: flag("prefer_direct"),
        avoid_london: flag("avoid_london"),
        max_walking_distance_km: params
            .get("max_walking_distance_km")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1.0),
        ..RoutePreferences::default()
    }
}

pub async fn route(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let from = params.get("from").ok_or(StatusCode::BAD_REQUEST)?;
    let to = params.get("to").ok_or(StatusCode::BAD_REQUEST)?;
    let max_changes = params.get("max_changes").and_then(|v| v.parse().ok());
    let preferences = preferences_from_params(&params);

    let service = state.service.write().await;
    match service.calculate_route(from, to, max_changes, &preferences) {
        Some(found) => Ok(Json(RouteDto::from(&found)).into_response()),
        None => Err(StatusCode::NOT_FOUND),
    }
}

pub async fn routes(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let from = params.get("from").ok_or(StatusCode::BAD_REQUEST)?;
    let to = params.get("to").ok_or(StatusCode::BAD_REQUEST)?;
    let preferences = preferences_from_params(&params);

    let service = state.service.write().await;
    let found = service.calculate_multiple_routes(from, to, &preferences);
    let dtos: Vec<RouteDto> = found.iter().map(RouteDto::from).collect();
    Ok(Json(dtos).into_response())
}

pub async fn destinations(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let from = params.get("from").ok_or(StatusCode::BAD_REQUEST)?;
    let max_changes: u32 = match params.get("max_changes") {
        Some(value) => value.parse().map_err(|_| StatusCode::BAD_REQUEST)?,
        None => 2,
    };

    let service = state.service.write().await;
    let result: Vec<String> = service
        .get_possible_destinations(from, max_changes)
        .into_iter()
        .map(|s| s.to_string())
        .collect();
    Ok(Json(result).into_response())
}

/// Drops the graph and route caches -- explicit invalidation, no TTL
/// (SPEC_FULL.md §5).
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<Response, StatusCode> {
    let service = state.service.write().await;
    service.clear_caches();
    Ok(().into_response())
}
