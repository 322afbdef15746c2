use crate::{
    error::PredictionError,
    model_service::{Classifier, ModelLoader},
};
use image::RgbImage;
use ndarray::ArrayView4;
use std::{
    io::Cursor,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

pub fn encode_png(img: &RgbImage) -> Vec<u8> {
    let mut image_data = Vec::new();
    img.write_to(&mut Cursor::new(&mut image_data), image::ImageFormat::Png)
        .unwrap();
    image_data
}

/// Returns the same probabilities for every input and counts calls.
#[derive(Clone)]
pub struct FixedClassifier {
    pub probabilities: Vec<f32>,
    pub calls: Arc<AtomicUsize>,
    pub last_input_shape: Arc<std::sync::Mutex<Option<Vec<usize>>>>,
}

impl FixedClassifier {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self {
            probabilities,
            calls: Arc::new(AtomicUsize::new(0)),
            last_input_shape: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Puts most of the probability mass on the class at `index`.
    pub fn letter(index: usize) -> Self {
        let mut probabilities = vec![0.1 / 25.0; 26];
        probabilities[index] = 0.9;
        Self::new(probabilities)
    }
}

impl Classifier for FixedClassifier {
    fn predict(&self, input: ArrayView4<'_, f32>) -> Result<Vec<f32>, PredictionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input_shape.lock().unwrap() = Some(input.shape().to_vec());
        Ok(self.probabilities.clone())
    }
}

pub struct MockLoader {
    classifier: FixedClassifier,
    failures_before_success: usize,
    delay: Duration,
    pub attempts: Arc<AtomicUsize>,
}

impl MockLoader {
    pub fn succeeding(classifier: FixedClassifier) -> Self {
        Self::failing_first(0, classifier)
    }

    pub fn failing_first(failures_before_success: usize, classifier: FixedClassifier) -> Self {
        Self {
            classifier,
            failures_before_success,
            delay: Duration::ZERO,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_first(usize::MAX, FixedClassifier::letter(0))
    }

    /// Makes every load block for `delay`, like reading a large artifact.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl ModelLoader for MockLoader {
    fn load(&self) -> Result<Arc<dyn Classifier>, PredictionError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        if attempt < self.failures_before_success {
            return Err(PredictionError::ModelUnavailable(
                "model file not found: \"models/model.onnx\"".to_string(),
            ));
        }
        Ok(Arc::new(self.classifier.clone()))
    }
}
