use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid {param} date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { param: &'static str, value: String },
    #[error("no measurements available")]
    NoData,
    #[error(transparent)]
    Store(#[from] db::Error),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            Error::NoData | Error::Store(db::Error::EmptyDataset) => StatusCode::NOT_FOUND,
            Error::Store(db::Error::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("error handling request: {}", self);
            match status {
                StatusCode::GATEWAY_TIMEOUT => String::from("climate data query timed out"),
                _ => String::from("failed to query climate data"),
            }
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Parse a `YYYY-MM-DD` path segment, naming the parameter on failure
pub fn parse_date_param(param: &'static str, value: &str) -> Result<time::Date, Error> {
    db::parse_date(value).map_err(|_| Error::InvalidDate {
        param,
        value: value.to_string(),
    })
}
