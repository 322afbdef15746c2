use crate::{
    config::ReloadPolicy,
    error::PredictionError,
    model_service::{Classifier, ModelLoader},
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::{Mutex, OnceCell};

/// Owns the model handle. Loads are serialized: callers that queue behind an
/// in-flight attempt receive that attempt's result, and a failed attempt
/// leaves the handle empty so a later caller may try again.
pub struct InferenceService {
    loader: Arc<dyn ModelLoader>,
    model: OnceCell<Arc<dyn Classifier>>,
    // Guards load attempts and holds the error of the latest one.
    last_error: Mutex<Option<PredictionError>>,
    attempts: AtomicU64,
}

impl InferenceService {
    pub fn new(loader: impl ModelLoader) -> Self {
        Self {
            loader: Arc::new(loader),
            model: OnceCell::new(),
            last_error: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    /// Never triggers a load.
    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    pub async fn load(&self) -> Result<Arc<dyn Classifier>, PredictionError> {
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }

        let seen = self.attempts.load(Ordering::SeqCst);
        let mut last_error = self.last_error.lock().await;

        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }
        // An attempt finished while we waited for the lock: share its outcome.
        if self.attempts.load(Ordering::SeqCst) != seen {
            if let Some(err) = last_error.as_ref() {
                return Err(err.clone());
            }
        }

        let loader = self.loader.clone();
        tracing::info!("Loading model");
        let result = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| {
                PredictionError::ModelUnavailable(format!("model load task failed: {}", e))
            })
            .and_then(|model| model);
        self.attempts.fetch_add(1, Ordering::SeqCst);

        match result {
            Ok(model) => {
                tracing::info!("Model loaded successfully");
                // Only the lock holder sets the cell, so it is still empty here.
                let _ = self.model.set(model.clone());
                *last_error = None;
                Ok(model)
            }
            Err(e) => {
                tracing::error!("Failed to load model: {}", e);
                *last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Returns the loaded model, loading it first only if `policy` allows.
    pub async fn model(
        &self,
        policy: ReloadPolicy,
    ) -> Result<Arc<dyn Classifier>, PredictionError> {
        if let Some(model) = self.model.get() {
            return Ok(model.clone());
        }

        match policy {
            ReloadPolicy::Retry => {
                tracing::warn!("Model not loaded, attempting inline load");
                self.load().await
            }
            ReloadPolicy::FailFast => Err(PredictionError::ModelUnavailable(
                "model is not loaded".to_string(),
            )),
        }
    }
}
