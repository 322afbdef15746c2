use crate::{error::PredictionError, labels::Prediction, server::SharedState, telemetry::Metrics};
use axum::{
    routing::{get, post},
    Json, Router,
};
use std::{future::Future, time::Instant};

mod metrics;
mod model_status;
mod predict_base64;
mod predict_file;

pub use metrics::metrics_handler;
pub use model_status::model_status;
pub use predict_base64::predict_base64;
pub use predict_file::predict_file;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/model-status", get(model_status))
        .route("/predict-base64", post(predict_base64))
        .route("/predict-file", post(predict_file))
        .route("/metrics", get(metrics_handler))
}

/// Runs one prediction request and records its outcome.
async fn observed<F>(
    metrics: &Metrics,
    route: &str,
    prediction: F,
) -> Result<Json<Prediction>, PredictionError>
where
    F: Future<Output = Result<Prediction, PredictionError>>,
{
    metrics.record_request(route);
    let start = Instant::now();

    match prediction.await {
        Ok(prediction) => {
            metrics.record_prediction_duration(start.elapsed().as_millis() as u64, route);
            Ok(Json(prediction))
        }
        Err(e) => {
            metrics.record_failure(route, e.kind());
            Err(e)
        }
    }
}
