use std::fmt;

/// An sRGB color with straight alpha, formatted as a CSS `rgba()` string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same channels, different alpha (clamped to `0..=1`).
    #[must_use]
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    #[must_use]
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Fixed colors shared by both backdrops.
pub mod palette {
    use super::Rgba;

    pub const WAVE_CYAN: Rgba = Rgba::new(0, 240, 255, 0.15);
    pub const WAVE_PURPLE: Rgba = Rgba::new(112, 0, 255, 0.15);

    /// `#050510`
    pub const GRID_BACKGROUND: Rgba = Rgba::opaque(5, 5, 16);
    pub const GLYPH_DIM: Rgba = Rgba::new(0, 50, 20, 0.1);
    pub const GLYPH_LIT: Rgba = Rgba::opaque(0, 255, 128);
    pub const GLYPH_HOT: Rgba = Rgba::opaque(220, 255, 230);
}
