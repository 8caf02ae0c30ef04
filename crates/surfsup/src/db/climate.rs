use async_trait::async_trait;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{future::Future, time::Duration};
use time::Date;

use super::{
    format_date, parse_date, ClimateData, Error, PrecipitationReading, TemperatureObservation,
    TemperatureStats, MEASUREMENT_COLUMNS, STATION_COLUMNS,
};

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub path: String,
    pub measurement_table: String,
    pub station_table: String,
    pub max_connections: u32,
    pub query_timeout: Duration,
}

pub struct ClimateAccess {
    pool: SqlitePool,
    measurement_table: String,
    station_table: String,
    query_timeout: Duration,
}

impl ClimateAccess {
    /// Opens the dataset read-only and checks both tables carry the columns
    /// the API reads. The file is never created.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, Error> {
        let measurement_table = checked_table_name(&settings.measurement_table)?;
        let station_table = checked_table_name(&settings.station_table)?;

        let options = SqliteConnectOptions::new()
            .filename(&settings.path)
            .create_if_missing(false)
            .read_only(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.query_timeout)
            .connect_with(options)
            .await?;

        let access = Self {
            pool,
            measurement_table,
            station_table,
            query_timeout: settings.query_timeout,
        };

        access
            .validate_table(&access.measurement_table, MEASUREMENT_COLUMNS)
            .await?;
        access
            .validate_table(&access.station_table, STATION_COLUMNS)
            .await?;
        info!("Climate dataset opened read-only at: {}", settings.path);

        Ok(access)
    }

    async fn validate_table(&self, table: &str, required: &[&str]) -> Result<(), Error> {
        let columns = self
            .timed(
                sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info(?)")
                    .bind(table)
                    .fetch_all(&self.pool),
            )
            .await?;

        let missing: Vec<String> = required
            .iter()
            .filter(|col| !columns.iter().any(|c| c.eq_ignore_ascii_case(col)))
            .map(|col| col.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(Error::Schema {
                table: table.to_string(),
                missing,
            });
        }
        debug!("table {} has columns {:?}", table, columns);
        Ok(())
    }

    async fn timed<T, F>(&self, query: F) -> Result<T, Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| Error::Timeout(self.query_timeout))?
            .map_err(Error::from)
    }
}

/// Table names are interpolated into SQL, so only plain identifiers pass.
fn checked_table_name(name: &str) -> Result<String, Error> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(name.to_string())
    } else {
        Err(Error::TableName(name.to_string()))
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn latest_date(&self) -> Result<Date, Error> {
        let query = format!("SELECT MAX(date) FROM \"{}\"", self.measurement_table);
        let latest = self
            .timed(sqlx::query_scalar::<_, Option<String>>(&query).fetch_one(&self.pool))
            .await?;

        let value = latest.ok_or(Error::EmptyDataset)?;
        parse_date(&value).map_err(|source| Error::DateParse { value, source })
    }

    async fn precipitation_since(&self, since: Date) -> Result<Vec<PrecipitationReading>, Error> {
        let query = format!(
            "SELECT date, prcp FROM \"{}\" WHERE date >= ? ORDER BY date, station",
            self.measurement_table
        );
        self.timed(
            sqlx::query_as::<_, PrecipitationReading>(&query)
                .bind(format_date(since))
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn station_ids(&self) -> Result<Vec<String>, Error> {
        let query = format!("SELECT station FROM \"{}\" ORDER BY rowid", self.station_table);
        self.timed(sqlx::query_scalar::<_, String>(&query).fetch_all(&self.pool))
            .await
    }

    async fn most_active_station(&self) -> Result<Option<String>, Error> {
        let query = format!(
            "SELECT station FROM \"{}\"
             WHERE station IS NOT NULL
             GROUP BY station
             ORDER BY COUNT(station) DESC, station ASC
             LIMIT 1",
            self.measurement_table
        );
        self.timed(sqlx::query_scalar::<_, String>(&query).fetch_optional(&self.pool))
            .await
    }

    async fn temperature_observations(
        &self,
        station: String,
        since: Date,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        let query = format!(
            "SELECT date, tobs FROM \"{}\" WHERE station = ? AND date >= ? ORDER BY date",
            self.measurement_table
        );
        self.timed(
            sqlx::query_as::<_, TemperatureObservation>(&query)
                .bind(station)
                .bind(format_date(since))
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn temperature_stats(
        &self,
        start: Date,
        end: Option<Date>,
    ) -> Result<TemperatureStats, Error> {
        let mut query = format!(
            "SELECT CAST(MIN(tobs) AS REAL) AS tmin,
                    CAST(AVG(tobs) AS REAL) AS tavg,
                    CAST(MAX(tobs) AS REAL) AS tmax
             FROM \"{}\"
             WHERE date >= ?",
            self.measurement_table
        );
        if end.is_some() {
            query.push_str(" AND date <= ?");
        }

        let mut q = sqlx::query_as::<_, TemperatureStats>(&query).bind(format_date(start));
        if let Some(end) = end {
            q = q.bind(format_date(end));
        }
        self.timed(q.fetch_one(&self.pool)).await
    }
}
