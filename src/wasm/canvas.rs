use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::Rgba;
use crate::error::BackdropError;
use crate::painter::{Font, Point, SurfacePainter};

/// [`SurfacePainter`] over a Canvas2D context.
pub(crate) struct CanvasPainter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Font last applied to `ctx`. Resizing the canvas resets context state,
    /// so this is cleared on resize.
    font: Option<Font>,
}

impl CanvasPainter {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Result<Self, BackdropError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| BackdropError::unavailable(format!("getContext(2d): {e:?}")))?
            .ok_or_else(|| BackdropError::unavailable("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackdropError::unavailable("not a 2d context"))?;
        Ok(Self {
            canvas,
            ctx,
            font: None,
        })
    }

    fn apply_font(&mut self, font: Font) {
        if self.font != Some(font) {
            self.ctx.set_font(&font.to_css());
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            self.font = Some(font);
        }
    }
}

fn rejected(op: &str, err: &JsValue) -> BackdropError {
    BackdropError::fault(format!("{op}: {err:?}"))
}

impl SurfacePainter for CanvasPainter {
    fn clear(&mut self) -> Result<(), BackdropError> {
        self.ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        Ok(())
    }

    fn stroke_path(
        &mut self,
        points: &[Point],
        color: Rgba,
        width: f64,
    ) -> Result<(), BackdropError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
        Ok(())
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        color: Rgba,
        font: Font,
    ) -> Result<(), BackdropError> {
        self.apply_font(font);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_text(text, x, y)
            .map_err(|e| rejected("fillText", &e))
    }

    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), BackdropError> {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(x, y, width, height);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackdropError> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.font = None;
        Ok(())
    }
}
