//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use rps_game_core::{
    verify_commitment, CommitMessage, Commitment, HmacKey, Outcome, RevealMessage, RoundId,
    RoundStage,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::{OracleState, RoundRng};

// ============ Request/Response types ============

#[derive(Serialize, Deserialize)]
pub struct RulesResponse {
    pub moves: Vec<String>,
    /// `matrix[a][b]` is move `a` against move `b`
    pub matrix: Vec<Vec<Outcome>>,
}

#[derive(Serialize, Deserialize)]
pub struct PlayRequest {
    pub human_move: String,
}

#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub round_id: RoundId,
    pub stage: RoundStage,
    pub commitment: Option<Commitment>,
    pub reveal: Option<RevealMessage>,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyRequest {
    pub secret_move: String,
    pub key: HmacKey,
    pub commitment: Commitment,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

// ============ Route handlers ============

async fn health() -> &'static str {
    "ok"
}

async fn get_rules<R: RoundRng>(State(state): State<Arc<OracleState<R>>>) -> Json<RulesResponse> {
    let table = state.table();
    Json(RulesResponse {
        moves: table.moves().as_slice().to_vec(),
        matrix: table.rows().map(|(_, row)| row.to_vec()).collect(),
    })
}

async fn create_round<R: RoundRng>(
    State(state): State<Arc<OracleState<R>>>,
) -> Result<Json<CommitMessage>, AppError> {
    Ok(Json(state.open_round()?))
}

async fn get_status<R: RoundRng>(
    State(state): State<Arc<OracleState<R>>>,
    Path(round_id): Path<RoundId>,
) -> Result<Json<StatusResponse>, AppError> {
    let status = state.inspect(round_id, |referee| StatusResponse {
        round_id,
        stage: referee.stage(),
        commitment: referee.commitment(),
        reveal: referee.record().map(RevealMessage::from),
    })?;
    Ok(Json(status))
}

async fn play_round<R: RoundRng>(
    State(state): State<Arc<OracleState<R>>>,
    Path(round_id): Path<RoundId>,
    Json(req): Json<PlayRequest>,
) -> Result<Json<RevealMessage>, AppError> {
    Ok(Json(state.play(round_id, &req.human_move)?))
}

async fn verify(Json(req): Json<VerifyRequest>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: verify_commitment(&req.secret_move, &req.key, &req.commitment),
    })
}

pub fn create_router<R: RoundRng>(state: Arc<OracleState<R>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/rules", get(get_rules::<R>))
        .route("/round/create", post(create_round::<R>))
        .route("/round/:round_id/status", get(get_status::<R>))
        .route("/round/:round_id/play", post(play_round::<R>))
        .route("/verify", post(verify))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
