//! Request errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rps_game_core::{GameError, RoundId};
use serde::Serialize;
use tracing::warn;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    RoundNotFound(RoundId),
    /// The oracle already holds its maximum number of rounds
    AtCapacity(usize),
    Game(GameError),
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        AppError::Game(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::RoundNotFound(id) => (StatusCode::NOT_FOUND, format!("round {id} not found")),
            AppError::AtCapacity(limit) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("oracle is holding its limit of {limit} rounds, try again later"),
            ),
            AppError::Game(err) => {
                let status = match err {
                    GameError::WrongStage { .. } => StatusCode::CONFLICT,
                    GameError::InsufficientEntropy(_) => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
        };
        warn!(%status, %message, "request failed");
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
