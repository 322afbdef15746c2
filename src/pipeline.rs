use crate::{
    decoder::decode_image, error::PredictionError, labels::Prediction,
    model_service::Classifier, preprocess::to_input_tensor,
};
use std::sync::Arc;

/// Decode, preprocess, predict and label one image. CPU bound.
pub fn run(model: &dyn Classifier, image_data: &[u8]) -> Result<Prediction, PredictionError> {
    let image = decode_image(image_data)?;
    let input = to_input_tensor(&image);
    let probabilities = model.predict(input.view())?;
    let prediction = Prediction::from_probabilities(&probabilities)?;

    tracing::debug!(
        "Predicted letter={}, confidence={:.3}",
        prediction.letter,
        prediction.confidence
    );
    Ok(prediction)
}

/// Runs [`run`] on the blocking thread pool.
pub async fn classify(
    model: Arc<dyn Classifier>,
    image_data: Vec<u8>,
) -> Result<Prediction, PredictionError> {
    tokio::task::spawn_blocking(move || run(model.as_ref(), &image_data))
        .await
        .map_err(|e| PredictionError::Prediction(format!("prediction task failed: {}", e)))?
}
