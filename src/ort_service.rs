use crate::{
    config::ModelConfig,
    error::PredictionError,
    model_service::{Classifier, ModelLoader},
};
use ndarray::ArrayView4;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::TensorRef,
};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

pub struct OrtClassifier {
    sessions: Vec<Mutex<Session>>,
    counter: AtomicUsize,
}

impl Classifier for OrtClassifier {
    fn predict(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictionError> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst) % self.sessions.len();
        let mut session = self.sessions[index]
            .lock()
            .map_err(|e| PredictionError::Prediction(format!("session mutex poisoned: {}", e)))?;

        tracing::debug!("Handling request with session {}", index);
        let owned_buffer;
        let input_view = if input.is_standard_layout() {
            input.view()
        } else {
            owned_buffer = input.to_owned();
            owned_buffer.view()
        };

        let tensor_ref = TensorRef::from_array_view(input_view)
            .map_err(|e| PredictionError::Prediction(format!("failed to build tensor: {}", e)))?;

        let outputs = session
            .run(ort::inputs![tensor_ref])
            .map_err(|e| PredictionError::Prediction(format!("inference failed: {}", e)))?;

        // Batch size is 1, so the flattened output is the single probability row.
        let (_, data) = outputs[0].try_extract_tensor::<f32>().map_err(|e| {
            PredictionError::Prediction(format!("failed to extract tensor: {}", e))
        })?;

        Ok(data.to_vec())
    }
}

#[derive(Debug, Clone)]
pub struct OrtModelLoader {
    model_path: PathBuf,
    num_instances: usize,
}

impl OrtModelLoader {
    pub fn new(model_config: &ModelConfig) -> Self {
        Self {
            model_path: model_config.get_path(),
            num_instances: model_config.num_instances.max(1),
        }
    }
}

impl ModelLoader for OrtModelLoader {
    fn load(&self) -> Result<Arc<dyn Classifier>, PredictionError> {
        if !self.model_path.exists() {
            return Err(PredictionError::ModelUnavailable(format!(
                "model file not found: {:?}",
                self.model_path
            )));
        }

        let sessions = (0..self.num_instances)
            .map(|_| {
                let session = Session::builder()?
                    .with_optimization_level(GraphOptimizationLevel::Level3)?
                    .commit_from_file(&self.model_path)?;
                Ok(Mutex::new(session))
            })
            .collect::<Result<Vec<_>, ort::Error>>()
            .map_err(|e| PredictionError::ModelUnavailable(e.to_string()))?;

        tracing::info!(
            "Created {} ONNX sessions from {:?}",
            sessions.len(),
            self.model_path
        );

        Ok(Arc::new(OrtClassifier {
            sessions,
            counter: AtomicUsize::new(0),
        }))
    }
}
