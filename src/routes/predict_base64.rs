use super::observed;
use crate::{
    decoder::decode_base64, error::PredictionError, labels::Prediction, pipeline,
    server::SharedState,
};
use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::instrument;

#[derive(Deserialize)]
pub struct ImageRequest {
    pub image: String,
}

#[instrument(skip(state, request))]
pub async fn predict_base64(
    State(state): State<SharedState>,
    Json(request): Json<ImageRequest>,
) -> Result<Json<Prediction>, PredictionError> {
    observed(&state.metrics, "/predict-base64", async {
        let model = state.inference_service.model(state.reload.base64).await?;
        let image_data = decode_base64(&request.image)?;
        pipeline::classify(model, image_data).await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::super::tests::{json_body, test_router, test_state};
    use crate::test_utils::{encode_png, FixedClassifier, MockLoader};
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use base64::{engine::general_purpose, Engine as _};
    use image::{ImageBuffer, Rgb};
    use std::sync::atomic::Ordering;
    use tower::ServiceExt;

    fn predict_request(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict-base64")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn solid_png_base64() -> String {
        let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(100, 100, Rgb([200, 30, 30]));
        general_purpose::STANDARD.encode(encode_png(&img))
    }

    #[tokio::test]
    async fn test_predicts_letter_for_solid_image() {
        let classifier = FixedClassifier::letter(1);
        let calls = classifier.calls.clone();
        let state = test_state(MockLoader::succeeding(classifier));

        let response = test_router(state)
            .oneshot(predict_request(
                serde_json::json!({ "image": solid_png_base64() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["letter"], "b");
        let confidence = body["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loads_model_inline_after_failed_startup() {
        let loader = MockLoader::failing_first(1, FixedClassifier::letter(4));
        let attempts = loader.attempts.clone();
        let state = test_state(loader);
        assert!(state.inference_service.load().await.is_err());

        let response = test_router(state.clone())
            .oneshot(predict_request(
                serde_json::json!({ "image": solid_png_base64() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["letter"], "e");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(state.inference_service.is_loaded());
    }

    #[tokio::test]
    async fn test_unavailable_model_is_server_error() {
        let state = test_state(MockLoader::always_failing());

        let response = test_router(state)
            .oneshot(predict_request(
                serde_json::json!({ "image": solid_png_base64() }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Model not loaded"));
    }

    #[tokio::test]
    async fn test_non_base64_payload_is_decode_error() {
        let classifier = FixedClassifier::letter(0);
        let calls = classifier.calls.clone();
        let state = test_state(MockLoader::succeeding(classifier));

        let response = test_router(state)
            .oneshot(predict_request(
                serde_json::json!({ "image": "%%% not base64 %%%" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Failed to decode image"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_base64_of_non_image_is_decode_error() {
        let state = test_state(MockLoader::succeeding(FixedClassifier::letter(0)));
        let payload = general_purpose::STANDARD.encode(b"plain text, not pixels");

        let response = test_router(state)
            .oneshot(predict_request(serde_json::json!({ "image": payload })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = json_body(response).await["detail"].as_str().unwrap().to_string();
        assert!(detail.starts_with("Failed to decode image"));
    }

    #[tokio::test]
    async fn test_missing_image_field_is_client_error() {
        let state = test_state(MockLoader::succeeding(FixedClassifier::letter(0)));

        let response = test_router(state)
            .oneshot(predict_request(serde_json::json!({ "picture": "abc" })))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
