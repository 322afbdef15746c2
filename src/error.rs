use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a single stage of the prediction pipeline.
#[derive(Error, Debug, Clone)]
pub enum PredictionError {
    #[error("Invalid request: {0}")]
    InputValidation(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),
    #[error("Prediction error: {0}")]
    Prediction(String),
}

impl PredictionError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::InputValidation(_) => "input_validation",
            PredictionError::Decode(_) => "decode",
            PredictionError::ModelUnavailable(_) => "model_unavailable",
            PredictionError::Prediction(_) => "prediction",
        }
    }
}

impl IntoResponse for PredictionError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), "{}", self);
        let body = Json(json!({ "detail": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
