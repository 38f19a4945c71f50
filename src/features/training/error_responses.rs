use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::error::TrainingError;

impl TrainingError {
    pub fn status(&self) -> StatusCode {
        match self {
            TrainingError::Unauthenticated => StatusCode::UNAUTHORIZED,
            TrainingError::Forbidden(_) => StatusCode::FORBIDDEN,
            TrainingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TrainingError::NotFound(_) => StatusCode::NOT_FOUND,
            TrainingError::Conflict(_) => StatusCode::CONFLICT,
            TrainingError::DatabaseError(_)
            | TrainingError::CorruptData(_)
            | TrainingError::PoolError(_)
            | TrainingError::TaskFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TrainingError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            TrainingError::DatabaseError(e) => {
                log::error!("Training storage failure: {}", e);
                format!("Database error: {}", e)
            }
            TrainingError::CorruptData(e) => {
                log::error!("Training storage holds corrupt data: {}", e);
                self.to_string()
            }
            TrainingError::PoolError(e) => {
                log::error!("Training connection pool failure: {}", e);
                format!("Connection pool error: {}", e)
            }
            TrainingError::TaskFailed(e) => {
                log::error!("Training task failure: {}", e);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = json!({
            "error": message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}
