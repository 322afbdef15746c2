use crate::server::SharedState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ModelStatus {
    model_loaded: bool,
}

pub async fn model_status(State(state): State<SharedState>) -> Json<ModelStatus> {
    let model_loaded = state.inference_service.is_loaded();
    tracing::info!(
        "Model status requested: {}",
        if model_loaded { "Loaded" } else { "Not loaded" }
    );
    Json(ModelStatus { model_loaded })
}
