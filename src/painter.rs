//! Drawing-surface abstraction.
//!
//! Renderers never touch a real canvas; they issue calls through
//! [`SurfacePainter`] so the same code drives the browser canvas and the
//! recording double in [`crate::testing`].

use crate::color::Rgba;
use crate::error::BackdropError;

/// A point in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Font used for glyph text. Text is always centered on its anchor point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub size_px: f64,
    pub family: &'static str,
}

impl Font {
    #[must_use]
    pub const fn monospace(size_px: f64) -> Self {
        Self {
            size_px,
            family: "monospace",
        }
    }

    /// CSS shorthand, e.g. `16px monospace`.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("{}px {}", self.size_px, self.family)
    }
}

/// Primitive drawing operations a backdrop needs.
///
/// Every call may fail on a real surface (a rejected canvas call); renderers
/// propagate the error, which stops the frame loop.
pub trait SurfacePainter {
    /// Clear the whole surface to transparent.
    fn clear(&mut self) -> Result<(), BackdropError>;

    /// Stroke an open polyline through `points`.
    fn stroke_path(&mut self, points: &[Point], color: Rgba, width: f64)
        -> Result<(), BackdropError>;

    /// Draw `text` centered on `(x, y)`.
    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        color: Rgba,
        font: Font,
    ) -> Result<(), BackdropError>;

    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), BackdropError>;

    /// Resize the backing store. Any prior content is discarded.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackdropError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_shorthand() {
        assert_eq!(Font::monospace(16.0).to_css(), "16px monospace");
        assert_eq!(Font::monospace(12.5).to_css(), "12.5px monospace");
    }
}
