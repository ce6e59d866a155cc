use thiserror::Error;

use super::style::{Rgb, TextStyle};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page {0} does not exist")]
    MissingPage(usize),

    #[error("no page has been added yet")]
    NoPage,

    #[error("PDF serialization failed: {0}")]
    Serialize(String),
}

/// Drawing target for the composer.
///
/// Pages are addressed by zero-based index and coordinates are points from the
/// top-left corner. Drawing goes to the selected page; `add_page` selects the new page.
pub trait DocumentSurface {
    fn add_page(&mut self) -> usize;

    fn select_page(&mut self, index: usize) -> Result<(), RenderError>;

    fn page_count(&self) -> usize;

    /// Draws a single line of text with its baseline at `y`.
    fn text(&mut self, x: f32, y: f32, style: &TextStyle, text: &str) -> Result<(), RenderError>;

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb)
        -> Result<(), RenderError>;

    fn line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
        color: Rgb,
    ) -> Result<(), RenderError>;

    fn finish(self) -> Result<Vec<u8>, RenderError>
    where
        Self: Sized;
}
