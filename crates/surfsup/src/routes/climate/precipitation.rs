use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{routes::Error, AppState, PrecipitationByDate};

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation by date for the last year of data, last station reading wins per date", body = PrecipitationByDate),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = crate::routes::ErrorBody)
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationByDate>, Error> {
    let readings = state.climate_db.precipitation_since(state.cutoff).await?;
    Ok(Json(readings.into_iter().collect()))
}
