use tracing::debug;

use crate::error::BackdropError;
use crate::painter::SurfacePainter;
use crate::pointer::{PointerPosition, PointerTracker};
use crate::scene::{FrameContext, Scene};
use crate::viewport::{ViewportSize, ViewportState};

/// Everything one backdrop instance owns: its surface, its scene and the
/// viewport/pointer state the scene reads each frame.
#[derive(Debug)]
pub struct Renderer<P, S> {
    painter: P,
    scene: S,
    viewport: ViewportState,
    pointer: PointerTracker,
}

impl<P: SurfacePainter, S: Scene> Renderer<P, S> {
    /// Builds the initial layout for `size`.
    pub fn new(painter: P, scene: S, size: ViewportSize) -> Result<Self, BackdropError> {
        let mut renderer = Self {
            painter,
            scene,
            viewport: ViewportState::new(size),
            pointer: PointerTracker::default(),
        };
        renderer.rebuild(size)?;
        Ok(renderer)
    }

    /// Resize the surface and regenerate the scene layout for `size`.
    ///
    /// Runs to completion before returning, so the next frame never sees a
    /// layout built for a stale size. If the surface refuses the resize the
    /// previous layout is left untouched.
    pub fn rebuild(&mut self, size: ViewportSize) -> Result<(), BackdropError> {
        let (width, height) = size.pixels();
        self.painter.resize(width, height)?;
        self.viewport.record_rebuild(size);
        self.scene.rebuild(size);
        debug!(
            scene = self.scene.name(),
            width = size.width(),
            height = size.height(),
            rebuilds = self.viewport.rebuilds(),
            "rebuilt layout"
        );
        Ok(())
    }

    pub fn on_pointer_move(&mut self, position: PointerPosition) {
        self.pointer.on_pointer_move(position.x, position.y);
    }

    /// Repaint the surface for the frame at `timestamp_ms`.
    pub fn draw_frame(&mut self, timestamp_ms: f64) -> Result<(), BackdropError> {
        let frame = FrameContext {
            size: self.viewport.size(),
            pointer: self.pointer.position(),
            timestamp_ms,
        };
        self.scene.draw(&mut self.painter, &frame)
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    #[must_use]
    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlyphConfig;
    use crate::glyph::GlyphGrid;
    use crate::testing::{CyclingSymbols, PaintCall, RecordingPainter};

    fn size(width: f64, height: f64) -> ViewportSize {
        ViewportSize::new(width, height).unwrap()
    }

    #[test]
    fn new_resizes_the_surface_and_builds_layout() {
        let painter = RecordingPainter::default();
        let scene = GlyphGrid::new(GlyphConfig::default(), CyclingSymbols::default());
        let renderer = Renderer::new(painter.clone(), scene, size(95.5, 60.0)).unwrap();

        assert_eq!(
            painter.calls(),
            vec![PaintCall::Resize {
                width: 96,
                height: 60
            }]
        );
        assert_eq!(renderer.scene().dimensions(), (4, 2));
        assert_eq!(renderer.viewport().rebuilds(), 1);
    }

    #[test]
    fn refused_resize_keeps_previous_layout() {
        let painter = RecordingPainter::default();
        let scene = GlyphGrid::new(GlyphConfig::default(), CyclingSymbols::default());
        let mut renderer = Renderer::new(painter.clone(), scene, size(90.0, 30.0)).unwrap();

        painter.fail_after(0);
        assert!(renderer.rebuild(size(300.0, 300.0)).is_err());
        assert_eq!(renderer.scene().cells().len(), 3);
        assert_eq!(renderer.viewport().size(), size(90.0, 30.0));
    }

    #[test]
    fn frames_see_the_latest_pointer() {
        let painter = RecordingPainter::default();
        let scene = GlyphGrid::new(GlyphConfig::default(), CyclingSymbols::default());
        let mut renderer = Renderer::new(painter.clone(), scene, size(30.0, 30.0)).unwrap();
        painter.take_calls();

        renderer.on_pointer_move(PointerPosition::new(0.0, 0.0));
        renderer.draw_frame(16.0).unwrap();
        match &painter.calls()[1] {
            PaintCall::FillText { color, .. } => assert_eq!(color.a, 1.0),
            other => panic!("unexpected call {other:?}"),
        }
    }
}
