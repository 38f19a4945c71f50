use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::data::models::{NodeId, TrainingType, TranscriptionTypeId};

/// Request payload for creating (or reusing) a training
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTrainingRequest {
    #[serde(rename = "type")]
    pub kind: TrainingType,
    #[validate(length(min = 1, max = 500, message = "Scope must contain between 1 and 500 nodes"))]
    pub scope: Vec<NodeId>,
    #[serde(default, rename = "transcriptionType")]
    #[validate(range(min = 1, message = "Transcription type must be a positive id"))]
    pub transcription_type: Option<TranscriptionTypeId>,
}

/// Standard API response format
#[derive(Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: message.into(),
        }
    }
}
