// Document layout: font metrics, page geometry, the drawing surface and the composer.
// Rendering is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod composer;
pub mod font_metrics;
pub mod pdf;
pub mod style;
pub mod surface;

// Re-export the public API consumed by other modules (pipeline, errors).
pub use composer::{render, DocumentInput};
pub use surface::RenderError;
