//! Layered sine curves bent towards the pointer.

use crate::color::{palette, Rgba};
use crate::config::WaveConfig;
use crate::error::BackdropError;
use crate::painter::{Point, SurfacePainter};
use crate::pointer::PointerPosition;
use crate::scene::{FrameContext, Scene};
use crate::viewport::ViewportSize;

/// Parameters of one curve, fixed until the next rebuild.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveLayer {
    pub base_y: f64,
    pub spatial_frequency: f64,
    pub amplitude: f64,
    pub temporal_speed: f64,
    pub phase_offset: f64,
    pub color: Rgba,
}

impl WaveLayer {
    /// Layer `index` for a viewport of the given height. Layers fan out
    /// around the vertical center, each one wider, taller and faster than the last.
    #[must_use]
    pub fn for_index(index: usize, height: f64) -> Self {
        let i = index as f64;
        Self {
            base_y: height / 2.0 + (i * 20.0 - 40.0),
            spatial_frequency: 0.01 + i * 0.002,
            amplitude: 50.0 + i * 15.0,
            temporal_speed: 0.02 + i * 0.005,
            phase_offset: i * 2.0,
            color: if index % 2 == 0 {
                palette::WAVE_CYAN
            } else {
                palette::WAVE_PURPLE
            },
        }
    }

    /// Undistorted vertical offset from `base_y` at column `x` and time `t` (seconds).
    #[must_use]
    pub fn sine_offset(&self, x: f64, t: f64) -> f64 {
        (x * self.spatial_frequency + t * self.temporal_speed + self.phase_offset).sin()
            * self.amplitude
    }
}

#[derive(Debug)]
pub struct WaveField {
    config: WaveConfig,
    layers: Vec<WaveLayer>,
    path: Vec<Point>,
}

impl WaveField {
    /// An empty field; layers appear on the first [`Scene::rebuild`].
    #[must_use]
    pub fn new(config: WaveConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
            path: Vec::new(),
        }
    }

    #[must_use]
    pub fn layers(&self) -> &[WaveLayer] {
        &self.layers
    }

    #[must_use]
    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Pointer distortion at column `x`.
    ///
    /// Falls off linearly with horizontal distance and scales with how far
    /// down the viewport the pointer sits. Zero while the pointer is idle.
    #[must_use]
    pub fn mouse_effect(&self, x: f64, pointer: Option<PointerPosition>, height: f64) -> f64 {
        let Some(pointer) = pointer else {
            return 0.0;
        };
        let range = self.config.proximity_range;
        let proximity = (range - (x - pointer.x).abs()).max(0.0) / range;
        proximity * self.config.max_distortion * (pointer.y / height)
    }

    /// Sampled columns, from 0 up to (not including) the viewport width.
    pub fn sample_xs(&self, width: f64) -> impl Iterator<Item = f64> {
        let step = self.config.sample_step;
        (0_u32..)
            .map(move |k| f64::from(k) * step)
            .take_while(move |&x| x < width)
    }

    /// Sampled points of `layer` for one frame, without the path anchor.
    #[must_use]
    pub fn sample_layer(&self, layer: &WaveLayer, frame: &FrameContext) -> Vec<Point> {
        let mut out = Vec::new();
        self.trace(layer, frame, &mut out);
        out
    }

    fn trace(&self, layer: &WaveLayer, frame: &FrameContext, out: &mut Vec<Point>) {
        let t = frame.timestamp_ms * self.config.time_scale;
        let height = frame.size.height();
        out.extend(self.sample_xs(frame.size.width()).map(|x| {
            let y = layer.base_y
                + layer.sine_offset(x, t)
                + self.mouse_effect(x, frame.pointer, height);
            Point::new(x, y)
        }));
    }
}

impl Scene for WaveField {
    fn name(&self) -> &'static str {
        "wave-field"
    }

    fn rebuild(&mut self, size: ViewportSize) {
        self.layers = (0..self.config.layers)
            .map(|i| WaveLayer::for_index(i, size.height()))
            .collect();
        self.path = Vec::with_capacity(self.sample_xs(size.width()).count() + 1);
    }

    fn draw<P: SurfacePainter + ?Sized>(
        &mut self,
        painter: &mut P,
        frame: &FrameContext,
    ) -> Result<(), BackdropError> {
        painter.clear()?;

        let mut path = std::mem::take(&mut self.path);
        let anchor = Point::new(0.0, frame.size.height() / 2.0);
        let result = self.layers.iter().try_for_each(|layer| {
            path.clear();
            path.push(anchor);
            self.trace(layer, frame, &mut path);
            painter.stroke_path(&path, layer.color, self.config.stroke_width)
        });
        self.path = path;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PaintCall, RecordingPainter};

    fn frame(
        width: f64,
        height: f64,
        pointer: Option<PointerPosition>,
        timestamp_ms: f64,
    ) -> FrameContext {
        FrameContext {
            size: ViewportSize::new(width, height).unwrap(),
            pointer,
            timestamp_ms,
        }
    }

    fn field(width: f64, height: f64) -> WaveField {
        let mut field = WaveField::new(WaveConfig::default());
        field.rebuild(ViewportSize::new(width, height).unwrap());
        field
    }

    #[test]
    fn layer_parameters() {
        let field = field(800.0, 600.0);
        let layers = field.layers();
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[0].base_y, 260.0);
        assert_eq!(layers[4].base_y, 340.0);
        assert!((layers[3].spatial_frequency - 0.016).abs() < 1e-12);
        assert_eq!(layers[2].amplitude, 80.0);
        assert!((layers[1].temporal_speed - 0.025).abs() < 1e-12);
        assert_eq!(layers[4].phase_offset, 8.0);
        assert_eq!(layers[0].color, palette::WAVE_CYAN);
        assert_eq!(layers[1].color, palette::WAVE_PURPLE);
        assert_eq!(layers[2].color, palette::WAVE_CYAN);
    }

    #[test]
    fn first_sample_at_rest_sits_on_base_line() {
        let field = field(800.0, 600.0);
        let layer = field.layers()[0];
        let points = field.sample_layer(&layer, &frame(800.0, 600.0, None, 0.0));
        assert_eq!(points[0], Point::new(0.0, layer.base_y));
    }

    #[test]
    fn samples_stop_before_the_right_edge() {
        let field = field(805.0, 600.0);
        let xs: Vec<f64> = field.sample_xs(805.0).collect();
        assert_eq!(xs.len(), 81);
        assert_eq!(xs.last().copied(), Some(800.0));
        assert_eq!(field.sample_xs(800.0).count(), 80);
    }

    #[test]
    fn idle_pointer_has_no_effect() {
        let field = field(1920.0, 1080.0);
        for x in field.sample_xs(1920.0) {
            assert_eq!(field.mouse_effect(x, None, 1080.0), 0.0);
        }
    }

    #[test]
    fn distortion_scales_with_proximity_and_depth() {
        let field = field(800.0, 600.0);
        let pointer = Some(PointerPosition::new(400.0, 600.0));
        assert_eq!(field.mouse_effect(400.0, pointer, 600.0), 50.0);
        assert_eq!(field.mouse_effect(900.0, pointer, 600.0), 25.0);

        let halfway = Some(PointerPosition::new(400.0, 300.0));
        assert_eq!(field.mouse_effect(400.0, halfway, 600.0), 25.0);

        let top = Some(PointerPosition::new(400.0, 0.0));
        assert_eq!(field.mouse_effect(400.0, top, 600.0), 0.0);
    }

    #[test]
    fn time_is_scaled_to_seconds() {
        let field = field(800.0, 600.0);
        let layer = field.layers()[0];
        let points = field.sample_layer(&layer, &frame(800.0, 600.0, None, 1000.0));
        let expected = layer.base_y + (0.02_f64).sin() * layer.amplitude;
        assert!((points[0].y - expected).abs() < 1e-9);
    }

    #[test]
    fn draw_clears_then_strokes_each_layer() {
        let mut field = field(100.0, 200.0);
        let mut painter = RecordingPainter::default();
        field
            .draw(&mut painter, &frame(100.0, 200.0, None, 0.0))
            .unwrap();

        let calls = painter.calls();
        assert_eq!(calls[0], PaintCall::Clear);
        let strokes: Vec<_> = calls[1..]
            .iter()
            .map(|call| match call {
                PaintCall::StrokePath { points, color, width } => (points, *color, *width),
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(strokes.len(), 5);
        for (points, _, width) in &strokes {
            assert_eq!(*width, 2.0);
            // anchor plus ten samples
            assert_eq!(points.len(), 11);
            assert_eq!(points[0], Point::new(0.0, 100.0));
        }
        assert_eq!(strokes[1].1, palette::WAVE_PURPLE);
    }

    #[test]
    fn rebuild_follows_the_new_height() {
        let mut field = field(800.0, 600.0);
        field.rebuild(ViewportSize::new(800.0, 1000.0).unwrap());
        assert_eq!(field.layers()[0].base_y, 460.0);
        assert_eq!(field.layers().len(), 5);
    }
}
