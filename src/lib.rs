mod decoder;
mod error;
mod inference_service;
mod labels;
mod model_service;
mod ort_service;
mod pipeline;
mod preprocess;
mod routes;
mod server;
mod telemetry;
#[cfg(test)]
mod test_utils;

pub mod app;
pub mod config;

pub use app::start_app;
