use crate::{dto::StationDto, state::AppState};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::{collections::HashMap, sync::Arc};

pub async fn search(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let Some(query) = params.get("q") else {
        return Err(StatusCode::BAD_REQUEST);
    };
    let limit: usize = match params.get("count") {
        Some(value) => value.parse().map_err(|_| StatusCode::BAD_REQUEST)?,
        None => 5,
    };

    let service = state.service.write().await;
    let result: Vec<StationDto> = service
        .repository()
        .search_stations(query, limit)
        .into_iter()
        .map(StationDto::from)
        .collect();
    Ok(Json(result).into_response())
}
