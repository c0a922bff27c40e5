use crate::error::BackdropError;
use crate::painter::SurfacePainter;
use crate::pointer::PointerPosition;
use crate::viewport::ViewportSize;

/// Inputs shared by every element drawn in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub size: ViewportSize,
    /// `None` before the first pointer event.
    pub pointer: Option<PointerPosition>,
    /// Scheduler timestamp in milliseconds; monotonic across frames.
    pub timestamp_ms: f64,
}

/// A procedural backdrop: derived layout rebuilt per viewport size, plus a
/// full repaint per frame.
pub trait Scene {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Regenerate all derived layout for `size`. Always complete; never partial.
    fn rebuild(&mut self, size: ViewportSize);

    /// Repaint the whole surface for one frame.
    fn draw<P: SurfacePainter + ?Sized>(
        &mut self,
        painter: &mut P,
        frame: &FrameContext,
    ) -> Result<(), BackdropError>;
}
