use super::observed;
use crate::{error::PredictionError, labels::Prediction, pipeline, server::SharedState};
use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::instrument;

const FILE_FIELD: &str = "file";

#[instrument(skip(state, multipart))]
pub async fn predict_file(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<Prediction>, PredictionError> {
    observed(&state.metrics, "/predict-file", async {
        let model = state.inference_service.model(state.reload.file).await?;
        let image_data = read_file_field(&mut multipart).await?;
        pipeline::classify(model, image_data).await
    })
    .await
}

/// Returns the bytes of the first `file` field, skipping any other fields.
async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>, PredictionError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PredictionError::InputValidation(e.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| PredictionError::InputValidation(e.to_string()))?;
            tracing::debug!("Received {} bytes in `{}` field", bytes.len(), FILE_FIELD);
            return Ok(bytes.to_vec());
        }
    }

    Err(PredictionError::InputValidation(format!(
        "missing `{}` field in form data",
        FILE_FIELD
    )))
}
