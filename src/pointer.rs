/// Pointer location in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// Last known pointer position. Last write wins; no smoothing or queueing.
///
/// Before the first pointer event there is no position at all, and scenes
/// treat that as "nothing lit, nothing distorted" whatever their tunables.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerTracker {
    position: Option<PointerPosition>,
}

impl PointerTracker {
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.position = Some(PointerPosition::new(x, y));
    }

    /// `None` until the first pointer event arrives.
    #[must_use]
    pub fn position(&self) -> Option<PointerPosition> {
        self.position
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.position.is_none()
    }
}
