use crate::error::PredictionError;
use base64::{
    alphabet,
    engine::{general_purpose, DecodePaddingMode, GeneralPurpose},
    Engine as _,
};
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    general_purpose::PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes a base64 image payload. Whitespace and a leading
/// `data:<mime>;base64,` prefix are tolerated.
pub fn decode_base64(encoded: &str) -> Result<Vec<u8>, PredictionError> {
    let payload = match encoded.trim_start().strip_prefix("data:") {
        Some(data_url) => data_url
            .split_once(',')
            .map(|(_, data)| data)
            .ok_or_else(|| PredictionError::Decode("malformed data URL".to_string()))?,
        None => encoded,
    };

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    LENIENT_BASE64
        .decode(compact.as_bytes())
        .map_err(|e| PredictionError::Decode(format!("invalid base64 payload: {}", e)))
}

/// Decodes raw image bytes, sniffing the encoding from the content.
pub fn decode_image(image_data: &[u8]) -> Result<DynamicImage, PredictionError> {
    if image_data.is_empty() {
        return Err(PredictionError::Decode("empty image payload".to_string()));
    }

    let image_reader = image::ImageReader::new(Cursor::new(image_data))
        .with_guessed_format()
        .map_err(|e| PredictionError::Decode(e.to_string()))?;

    let image = image_reader
        .decode()
        .map_err(|e| PredictionError::Decode(e.to_string()))?;

    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(PredictionError::Decode(format!(
            "image has no pixels ({}x{})",
            width, height
        )));
    }

    tracing::debug!(width, height, color = ?image.color(), "Decoded image");
    Ok(image)
}
