use crate::error::BackdropError;

/// Live surface dimensions in CSS pixels. Both dimensions are positive and finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSize {
    width: f64,
    height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Result<Self, BackdropError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(width) && valid(height) {
            Ok(Self { width, height })
        } else {
            Err(BackdropError::InvalidViewport { width, height })
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.height
    }

    /// Backing-store size in whole pixels, never below 1x1.
    #[must_use]
    pub fn pixels(self) -> (u32, u32) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let px = |v: f64| (v.round() as u32).max(1);
        (px(self.width), px(self.height))
    }
}

/// The size every derived layout was last built for.
///
/// Only the resize path writes it; each frame reads it.
#[derive(Clone, Copy, Debug)]
pub struct ViewportState {
    size: ViewportSize,
    rebuilds: u64,
}

impl ViewportState {
    #[must_use]
    pub fn new(size: ViewportSize) -> Self {
        Self { size, rebuilds: 0 }
    }

    #[must_use]
    pub fn size(&self) -> ViewportSize {
        self.size
    }

    /// Number of rebuilds applied since construction (the initial one included).
    #[must_use]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub(crate) fn record_rebuild(&mut self, size: ViewportSize) {
        self.size = size;
        self.rebuilds += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(ViewportSize::new(0.0, 600.0).is_err());
        assert!(ViewportSize::new(800.0, -1.0).is_err());
        assert!(ViewportSize::new(f64::NAN, 600.0).is_err());
        assert!(ViewportSize::new(f64::INFINITY, 600.0).is_err());
        assert!(ViewportSize::new(800.0, 600.0).is_ok());
    }

    #[test]
    fn pixel_size_rounds_and_never_collapses() {
        let size = ViewportSize::new(800.4, 599.6).unwrap();
        assert_eq!(size.pixels(), (800, 600));
        let tiny = ViewportSize::new(0.2, 0.3).unwrap();
        assert_eq!(tiny.pixels(), (1, 1));
    }

    #[test]
    fn rebuilds_replace_the_size() {
        let mut state = ViewportState::new(ViewportSize::new(800.0, 600.0).unwrap());
        assert_eq!(state.rebuilds(), 0);
        state.record_rebuild(ViewportSize::new(1024.0, 768.0).unwrap());
        assert_eq!(state.size().width(), 1024.0);
        assert_eq!(state.rebuilds(), 1);
    }
}
