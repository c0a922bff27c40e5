use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::browser::BrowserEnvironment;
use super::canvas::CanvasPainter;
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::glyph::GlyphGrid;
use crate::mount::Mount;
use crate::wave::WaveField;

type BrowserMount<S> = Mount<BrowserEnvironment, CanvasPainter, S>;

enum Mounted {
    Waves(BrowserMount<WaveField>),
    Glyphs(BrowserMount<GlyphGrid>),
}

/// A running backdrop. Call `unmount()` (or `free()`) to stop it.
#[wasm_bindgen]
pub struct BackdropHandle {
    mounted: Mounted,
}

#[wasm_bindgen]
impl BackdropHandle {
    /// Stop animating and remove listeners. Calling it again does nothing.
    pub fn unmount(&mut self) {
        match &mut self.mounted {
            Mounted::Waves(m) => m.unmount(),
            Mounted::Glyphs(m) => m.unmount(),
        }
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        match &self.mounted {
            Mounted::Waves(m) => m.is_mounted(),
            Mounted::Glyphs(m) => m.is_mounted(),
        }
    }

    /// `false` once unmounted or after a frame failed.
    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self) -> bool {
        match &self.mounted {
            Mounted::Waves(m) => m.scheduler().is_running(),
            Mounted::Glyphs(m) => m.scheduler().is_running(),
        }
    }
}

fn parse_config(options: JsValue) -> Result<BackdropConfig, BackdropError> {
    let config: BackdropConfig = if options.is_undefined() || options.is_null() {
        BackdropConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| BackdropError::InvalidConfig(e.to_string()))?
    };
    config.validate()?;
    Ok(config)
}

fn mount_on<S: crate::Scene + 'static>(
    canvas: HtmlCanvasElement,
    scene: S,
) -> Result<BrowserMount<S>, BackdropError> {
    let env = Rc::new(BrowserEnvironment::new(canvas.clone())?);
    let painter = CanvasPainter::new(canvas)?;
    Mount::mount(env, painter, scene)
}

/// Mount the layered wave backdrop on `canvas`.
#[wasm_bindgen(js_name = mountWaveField)]
pub fn mount_wave_field(
    canvas: HtmlCanvasElement,
    options: JsValue,
) -> Result<BackdropHandle, JsValue> {
    let config = parse_config(options)?;
    let mount = mount_on(canvas, WaveField::new(config.wave))?;
    Ok(BackdropHandle {
        mounted: Mounted::Waves(mount),
    })
}

/// Mount the flashlight glyph backdrop on `canvas`.
#[wasm_bindgen(js_name = mountGlyphGrid)]
pub fn mount_glyph_grid(
    canvas: HtmlCanvasElement,
    options: JsValue,
) -> Result<BackdropHandle, JsValue> {
    let config = parse_config(options)?;
    let mount = mount_on(canvas, GlyphGrid::with_thread_rng(config.glyph))?;
    Ok(BackdropHandle {
        mounted: Mounted::Glyphs(mount),
    })
}
