//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::pricing::calculators::{DayType, TimeSlot};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("No active rate for {day_type}/{time_slot}")]
    MissingRate {
        day_type: DayType,
        time_slot: TimeSlot,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("Reservation is {status} and cannot change status")]
    InvalidTransition { status: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body returned to clients
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{} not found", what),
            ),
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::MissingRate { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "missing_rate",
                self.to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            AppError::InvalidTransition { .. } => (
                StatusCode::CONFLICT,
                "invalid_transition",
                self.to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: kind,
            message,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
