use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    routes::{parse_date_param, Error},
    AppState, TemperatureStats,
};

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
         ("start" = String, Path, description = "First day to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature from start onwards, null when nothing matches", body = Vec<TemperatureStats>),
        (status = BAD_REQUEST, description = "Malformed start date", body = crate::routes::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = crate::routes::ErrorBody)
    ))]
pub async fn stats_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>, Error> {
    let start = parse_date_param("start", &start)?;
    let stats = state.climate_db.temperature_stats(start, None).await?;
    Ok(Json(vec![stats]))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
         ("start" = String, Path, description = "First day to include, YYYY-MM-DD"),
         ("end" = String, Path, description = "Last day to include, YYYY-MM-DD"),
    ),
    responses(
        (status = OK, description = "Min, average and max temperature between start and end inclusive, null when nothing matches", body = Vec<TemperatureStats>),
        (status = BAD_REQUEST, description = "Malformed start or end date", body = crate::routes::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = crate::routes::ErrorBody)
    ))]
pub async fn stats_between(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStats>>, Error> {
    let start = parse_date_param("start", &start)?;
    let end = parse_date_param("end", &end)?;
    let stats = state.climate_db.temperature_stats(start, Some(end)).await?;
    Ok(Json(vec![stats]))
}
