//! Image-generation remote: HTTP client, the [`generator::ImageGenerator`]
//! seam, and the batch orchestrator that issues one call per variation.

pub mod client;
pub mod generator;
pub mod orchestrator;
