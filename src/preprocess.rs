use image::{imageops, imageops::FilterType, DynamicImage};
use ndarray::{Array, Ix4};

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 224;
pub const INPUT_CHANNELS: usize = 3;

/// Builds the `(1, 224, 224, 3)` RGB input tensor with values in `[0, 1]`.
///
/// The image is stretched to 224x224 with bilinear filtering. Aspect ratio
/// is not preserved, matching how the model was trained.
pub fn to_input_tensor(image: &DynamicImage) -> Array<f32, Ix4> {
    let rgb = image.to_rgb8();
    let resized = imageops::resize(&rgb, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);

    let side = INPUT_SIZE as usize;
    let mut input = Array::zeros((1, side, side, INPUT_CHANNELS));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let x = x as usize;
        let y = y as usize;
        let [r, g, b] = pixel.0;
        input[[0, y, x, 0]] = (r as f32) / 255.;
        input[[0, y, x, 1]] = (g as f32) / 255.;
        input[[0, y, x, 2]] = (b as f32) / 255.;
    }

    input
}
