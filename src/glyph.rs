//! A grid of random glyphs revealed by a flashlight around the pointer.

use std::fmt;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::color::{palette, Rgba};
use crate::config::GlyphConfig;
use crate::error::BackdropError;
use crate::painter::{Font, SurfacePainter};
use crate::pointer::PointerPosition;
use crate::scene::{FrameContext, Scene};
use crate::viewport::ViewportSize;

/// Symbols a cell can hold: `A-Z`, `0-9` and nine punctuation marks.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789$#@&%<>*+";

/// Picks alphabet indices for new cells.
pub trait SymbolSource {
    /// An index in `0..len`.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Uniform picks from any [`rand::Rng`].
#[derive(Debug, Default)]
pub struct RngSymbols<R>(pub R);

impl RngSymbols<ThreadRng> {
    #[must_use]
    pub fn thread_local() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> SymbolSource for RngSymbols<R> {
    fn next_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphCell {
    pub x: f64,
    pub y: f64,
    /// Assigned once at creation; only the derived color changes per frame.
    pub symbol: char,
}

/// How a cell is lit for the current pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Illumination {
    /// Outside the flashlight.
    Dim,
    Lit { intensity: f64, opacity: f64 },
}

pub struct GlyphGrid {
    config: GlyphConfig,
    cells: Vec<GlyphCell>,
    columns: usize,
    rows: usize,
    source: Box<dyn SymbolSource>,
}

impl fmt::Debug for GlyphGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphGrid")
            .field("config", &self.config)
            .field("columns", &self.columns)
            .field("rows", &self.rows)
            .field("cells", &self.cells.len())
            .finish_non_exhaustive()
    }
}

impl GlyphGrid {
    /// An empty grid; cells appear on the first [`Scene::rebuild`].
    #[must_use]
    pub fn new(config: GlyphConfig, source: impl SymbolSource + 'static) -> Self {
        Self {
            config,
            cells: Vec::new(),
            columns: 0,
            rows: 0,
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn with_thread_rng(config: GlyphConfig) -> Self {
        Self::new(config, RngSymbols::thread_local())
    }

    #[must_use]
    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }

    /// `(columns, rows)` of the current layout.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    #[must_use]
    pub fn config(&self) -> &GlyphConfig {
        &self.config
    }

    /// Lighting of a cell at `(x, y)` for the given pointer. Everything is
    /// dim while the pointer is idle.
    #[must_use]
    pub fn illumination(&self, x: f64, y: f64, pointer: Option<PointerPosition>) -> Illumination {
        let Some(pointer) = pointer else {
            return Illumination::Dim;
        };
        let radius = self.config.light_radius;
        let (dx, dy) = (x - pointer.x, y - pointer.y);
        // Cheap reject before the square root; most cells are dark.
        if dx * dx + dy * dy >= radius * radius {
            return Illumination::Dim;
        }
        let distance = pointer.distance_to(x, y);
        if distance >= radius {
            return Illumination::Dim;
        }
        let intensity = 1.0 - distance / radius;
        Illumination::Lit {
            intensity,
            opacity: 0.1 + intensity * 0.9,
        }
    }

    #[must_use]
    pub fn color_for(&self, illumination: Illumination) -> Rgba {
        let threshold = self.config.bright_threshold;
        match illumination {
            Illumination::Dim => palette::GLYPH_DIM,
            Illumination::Lit { intensity, opacity } if intensity > threshold => {
                palette::GLYPH_HOT.with_alpha(opacity)
            }
            Illumination::Lit { opacity, .. } => palette::GLYPH_LIT.with_alpha(opacity),
        }
    }

    #[must_use]
    pub fn cell_color(&self, cell: &GlyphCell, pointer: Option<PointerPosition>) -> Rgba {
        self.color_for(self.illumination(cell.x, cell.y, pointer))
    }

    fn font(&self) -> Font {
        Font::monospace(self.config.font_size)
    }
}

impl Scene for GlyphGrid {
    fn name(&self) -> &'static str {
        "glyph-grid"
    }

    fn rebuild(&mut self, size: ViewportSize) {
        let spacing = self.config.spacing;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = |extent: f64| (extent / spacing).ceil() as usize;
        self.columns = count(size.width());
        self.rows = count(size.height());

        let alphabet = ALPHABET.as_bytes();
        let mut cells = Vec::with_capacity(self.columns * self.rows);
        for row in 0..self.rows {
            for column in 0..self.columns {
                let pick = self.source.next_index(alphabet.len()) % alphabet.len();
                cells.push(GlyphCell {
                    x: column as f64 * spacing,
                    y: row as f64 * spacing,
                    symbol: char::from(alphabet[pick]),
                });
            }
        }
        self.cells = cells;
    }

    fn draw<P: SurfacePainter + ?Sized>(
        &mut self,
        painter: &mut P,
        frame: &FrameContext,
    ) -> Result<(), BackdropError> {
        painter.fill_rect(
            0.0,
            0.0,
            frame.size.width(),
            frame.size.height(),
            palette::GRID_BACKGROUND,
        )?;

        let font = self.font();
        let mut buf = [0_u8; 4];
        for cell in &self.cells {
            let color = self.cell_color(cell, frame.pointer);
            painter.fill_text(cell.symbol.encode_utf8(&mut buf), cell.x, cell.y, color, font)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CyclingSymbols, PaintCall, RecordingPainter};

    fn grid(width: f64, height: f64) -> GlyphGrid {
        let mut grid = GlyphGrid::new(GlyphConfig::default(), CyclingSymbols::default());
        grid.rebuild(ViewportSize::new(width, height).unwrap());
        grid
    }

    #[test]
    fn alphabet_has_45_symbols() {
        assert_eq!(ALPHABET.chars().count(), 45);
        assert!(ALPHABET.is_ascii());
    }

    #[test]
    fn layout_is_row_major_at_fixed_spacing() {
        let grid = grid(100.0, 60.0);
        assert_eq!(grid.dimensions(), (4, 2));
        let cells = grid.cells();
        assert_eq!(cells.len(), 8);
        assert_eq!((cells[0].x, cells[0].y), (0.0, 0.0));
        assert_eq!((cells[1].x, cells[1].y), (30.0, 0.0));
        assert_eq!((cells[4].x, cells[4].y), (0.0, 30.0));
        assert_eq!((cells[7].x, cells[7].y), (90.0, 30.0));
    }

    #[test]
    fn symbols_come_from_the_source_in_order() {
        let grid = grid(90.0, 30.0);
        let symbols: String = grid.cells().iter().map(|c| c.symbol).collect();
        assert_eq!(symbols, "ABC");
    }

    #[test]
    fn seeded_rng_stays_in_alphabet() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let source = RngSymbols(StdRng::seed_from_u64(7));
        let mut grid = GlyphGrid::new(GlyphConfig::default(), source);
        grid.rebuild(ViewportSize::new(1280.0, 720.0).unwrap());
        assert!(grid.cells().iter().all(|c| ALPHABET.contains(c.symbol)));
    }

    #[test]
    fn pointer_on_a_cell_is_fully_bright() {
        let grid = grid(800.0, 600.0);
        let pointer = Some(PointerPosition::new(400.0, 300.0));
        let lit = grid.illumination(400.0, 300.0, pointer);
        assert_eq!(
            lit,
            Illumination::Lit {
                intensity: 1.0,
                opacity: 1.0
            }
        );
        assert_eq!(grid.color_for(lit), palette::GLYPH_HOT.with_alpha(1.0));
    }

    #[test]
    fn mid_range_cells_use_the_green() {
        let grid = grid(800.0, 600.0);
        let pointer = Some(PointerPosition::new(0.0, 0.0));
        // d = 75, intensity 0.5, opacity 0.55
        let color = grid.color_for(grid.illumination(75.0, 0.0, pointer));
        assert_eq!((color.r, color.g, color.b), (0, 255, 128));
        assert!((color.a - 0.55).abs() < 1e-12);
    }

    #[test]
    fn edge_of_the_light_is_dim() {
        let grid = grid(800.0, 600.0);
        let pointer = Some(PointerPosition::new(0.0, 0.0));
        assert_eq!(grid.illumination(150.0, 0.0, pointer), Illumination::Dim);
        assert_eq!(grid.illumination(90.0, 120.0, pointer), Illumination::Dim);
        assert!(matches!(
            grid.illumination(149.0, 0.0, pointer),
            Illumination::Lit { .. }
        ));
    }

    #[test]
    fn idle_pointer_leaves_everything_dim() {
        let grid = grid(1280.0, 720.0);
        for cell in grid.cells() {
            assert_eq!(grid.cell_color(cell, None), palette::GLYPH_DIM);
        }
    }

    #[test]
    fn draw_paints_background_then_every_cell() {
        let mut grid = grid(60.0, 30.0);
        let mut painter = RecordingPainter::default();
        let frame = FrameContext {
            size: ViewportSize::new(60.0, 30.0).unwrap(),
            pointer: Some(PointerPosition::new(0.0, 0.0)),
            timestamp_ms: 16.0,
        };
        grid.draw(&mut painter, &frame).unwrap();

        let calls = painter.calls();
        assert_eq!(
            calls[0],
            PaintCall::FillRect {
                x: 0.0,
                y: 0.0,
                width: 60.0,
                height: 30.0,
                color: palette::GRID_BACKGROUND,
            }
        );
        assert_eq!(
            calls[1],
            PaintCall::FillText {
                text: "A".into(),
                x: 0.0,
                y: 0.0,
                color: palette::GLYPH_HOT.with_alpha(1.0),
                font: Font::monospace(16.0),
            }
        );
        match &calls[2] {
            PaintCall::FillText { text, x, color, .. } => {
                assert_eq!(text, "B");
                assert_eq!(*x, 30.0);
                assert_eq!((color.r, color.g, color.b), (0, 255, 128));
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(calls.len(), 3);
    }
}
