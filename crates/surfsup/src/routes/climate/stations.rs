use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{routes::Error, AppState};

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Every station id in the dataset", body = Vec<String>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = crate::routes::ErrorBody)
    ))]
pub async fn stations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, Error> {
    let station_ids = state.climate_db.station_ids().await?;
    Ok(Json(station_ids))
}
