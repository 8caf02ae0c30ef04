use axum::{extract::State, Json};
use log::debug;
use std::sync::Arc;

use crate::{routes::Error, AppState, TemperatureObservation};

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Last year of temperature observations for the most active station", body = Vec<TemperatureObservation>),
        (status = NOT_FOUND, description = "No measurements in the dataset", body = crate::routes::ErrorBody),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query climate data", body = crate::routes::ErrorBody)
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, Error> {
    let station = state
        .climate_db
        .most_active_station()
        .await?
        .ok_or(Error::NoData)?;
    debug!("most active station: {}", station);

    let observations = state
        .climate_db
        .temperature_observations(station, state.cutoff)
        .await?;
    Ok(Json(observations))
}
