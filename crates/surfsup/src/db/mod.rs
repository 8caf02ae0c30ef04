mod climate;
mod dates;

pub use climate::*;
pub use dates::*;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, time::Duration};
use time::Date;
use utoipa::ToSchema;

/// Columns the measurement table must expose
pub const MEASUREMENT_COLUMNS: &[&str] = &["station", "date", "prcp", "tobs"];
/// Columns the station table must expose
pub const STATION_COLUMNS: &[&str] = &["station", "name", "latitude", "longitude", "elevation"];

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Query did not finish within {0:?}")]
    Timeout(Duration),
    #[error("Table `{table}` is missing required columns: {}", .missing.join(", "))]
    Schema { table: String, missing: Vec<String> },
    #[error("Invalid table name: {0:?}")]
    TableName(String),
    #[error("Failed to parse stored date {value:?}: {source}")]
    DateParse {
        value: String,
        source: time::error::Parse,
    },
    #[error("Date arithmetic out of range for {0}")]
    DateRange(Date),
    #[error("No measurements found")]
    EmptyDataset,
}

/// Read-only access to the climate dataset
#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Most recent observation date in the measurement table
    async fn latest_date(&self) -> Result<Date, Error>;
    /// `(date, prcp)` rows on or after `since`, ordered by date then station
    async fn precipitation_since(&self, since: Date) -> Result<Vec<PrecipitationReading>, Error>;
    /// Every station id in table order, duplicates included
    async fn station_ids(&self) -> Result<Vec<String>, Error>;
    /// Station with the most measurement rows, ties going to the smallest id
    async fn most_active_station(&self) -> Result<Option<String>, Error>;
    async fn temperature_observations(
        &self,
        station: String,
        since: Date,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// Min/avg/max tobs over `start..=end` (open ended when `end` is None)
    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error>;
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: Option<f64>,
}

/// Precipitation keyed by date. When several stations report on the same day
/// the last reading in `(date, station)` order is kept.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PrecipitationByDate(pub BTreeMap<String, Option<f64>>);

impl FromIterator<PrecipitationReading> for PrecipitationByDate {
    fn from_iter<I: IntoIterator<Item = PrecipitationReading>>(iter: I) -> Self {
        Self(iter.into_iter().map(|r| (r.date, r.prcp)).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct TemperatureStats {
    #[serde(rename = "TMIN")]
    pub tmin: Option<f64>,
    #[serde(rename = "TAVG")]
    pub tavg: Option<f64>,
    #[serde(rename = "TMAX")]
    pub tmax: Option<f64>,
}
