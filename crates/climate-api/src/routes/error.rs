use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::error;

use crate::db;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid date '{value}', expected MMDDYYYY (e.g. 01012017)")]
    InvalidDate { value: String },
    #[error("Failed to read climate data: {0}")]
    Storage(#[from] db::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidDate { .. } => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            Error::Storage(err) => {
                error!("error reading climate data: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
                    .into_response()
            }
        }
    }
}
