use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

pub type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(DuplicateVotes),
    ServerError,
}

/// Body of the 409 returned when a judge resubmits votes for a team without
/// confirming the overwrite. Carries enough context for the caller to prompt
/// for confirmation.
#[derive(Debug, Serialize)]
pub struct DuplicateVotes {
    pub error: &'static str,
    pub message: &'static str,
    pub existing_votes_count: usize,
    pub existing_votes_date: Option<chrono::NaiveDateTime>,
    pub requires_confirmation: bool,
}

impl DuplicateVotes {
    pub fn new(
        existing_votes_count: usize,
        existing_votes_date: Option<chrono::NaiveDateTime>,
    ) -> Self {
        Self {
            error: "duplicate_votes",
            message: "You have already voted for this team",
            existing_votes_count,
            existing_votes_date,
            requires_confirmation: true,
        }
    }
}

pub fn bad_request(msg: impl Into<String>) -> ApiError {
    ApiError::BadRequest(msg.into())
}

pub fn not_found(msg: impl Into<String>) -> ApiError {
    ApiError::NotFound(msg.into())
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        error!("database error: {e}");
        ApiError::ServerError
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
                    .into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg })))
                    .into_response()
            }
            ApiError::Conflict(dup) => {
                (StatusCode::CONFLICT, Json(dup)).into_response()
            }
            ApiError::ServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}
