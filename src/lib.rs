//! Interactive full-viewport backgrounds for a canvas.
//!
//! Two scenes share one lifecycle: [`WaveField`], a stack of sine curves that
//! bend towards the pointer, and [`GlyphGrid`], a field of random glyphs lit
//! by a flashlight around the pointer. A [`Mount`] ties a scene to its host
//! (frame loop, resize and pointer listeners) and tears it all down again.
//!
//! The core is platform independent; the browser glue lives in `wasm` and is
//! only compiled for `wasm32`.

#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod color;
pub mod config;
pub mod env;
pub mod error;
pub mod glyph;
pub mod mount;
pub mod painter;
pub mod pointer;
pub mod renderer;
pub mod scene;
pub mod scheduler;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod viewport;
pub mod wave;

pub use config::{BackdropConfig, GlyphConfig, WaveConfig};
pub use error::BackdropError;
pub use glyph::GlyphGrid;
pub use mount::Mount;
pub use scene::Scene;
pub use wave::WaveField;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    mod browser;
    mod canvas;
    mod render;

    pub use render::{mount_glyph_grid, mount_wave_field, BackdropHandle};

    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();
    }
}
