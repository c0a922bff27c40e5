//! Tunables for both backdrops.
//!
//! Every field has a default matching the stock look, so an empty options
//! object (or none at all) reproduces it. Keys are camelCase to match the JS
//! side that passes them in.

use serde::Deserialize;

use crate::error::BackdropError;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackdropConfig {
    pub wave: WaveConfig,
    pub glyph: GlyphConfig,
}

impl BackdropConfig {
    pub fn validate(&self) -> Result<(), BackdropError> {
        self.wave.validate()?;
        self.glyph.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaveConfig {
    /// Number of stacked curves.
    pub layers: usize,
    /// Horizontal distance between sampled points, in pixels.
    pub sample_step: f64,
    pub stroke_width: f64,
    /// Horizontal reach of the pointer distortion, in pixels.
    pub proximity_range: f64,
    /// Vertical displacement at full proximity with the pointer at the bottom edge.
    pub max_distortion: f64,
    /// Multiplier turning scheduler timestamps (ms) into animation time.
    pub time_scale: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            layers: 5,
            sample_step: 10.0,
            stroke_width: 2.0,
            proximity_range: 1000.0,
            max_distortion: 50.0,
            time_scale: 0.001,
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), BackdropError> {
        if self.layers == 0 {
            return Err(invalid("wave.layers must be at least 1"));
        }
        at_least("wave.sampleStep", self.sample_step, 1.0)?;
        positive("wave.strokeWidth", self.stroke_width)?;
        positive("wave.proximityRange", self.proximity_range)?;
        finite("wave.maxDistortion", self.max_distortion)?;
        finite("wave.timeScale", self.time_scale)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlyphConfig {
    /// Distance between neighbouring cells, in pixels.
    pub spacing: f64,
    /// Flashlight radius around the pointer.
    pub light_radius: f64,
    pub font_size: f64,
    /// Intensity above which a lit glyph switches to the near-white color.
    pub bright_threshold: f64,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            spacing: 30.0,
            light_radius: 150.0,
            font_size: 16.0,
            bright_threshold: 0.8,
        }
    }
}

impl GlyphConfig {
    pub fn validate(&self) -> Result<(), BackdropError> {
        at_least("glyph.spacing", self.spacing, 1.0)?;
        positive("glyph.lightRadius", self.light_radius)?;
        positive("glyph.fontSize", self.font_size)?;
        if !(0.0..=1.0).contains(&self.bright_threshold) {
            return Err(invalid("glyph.brightThreshold must be within 0..=1"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> BackdropError {
    BackdropError::InvalidConfig(msg.to_owned())
}

fn positive(name: &str, value: f64) -> Result<(), BackdropError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be positive, got {value}")))
    }
}

/// Steps and spacings below one pixel would emit an unbounded number of points or cells.
fn at_least(name: &str, value: f64, min: f64) -> Result<(), BackdropError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be at least {min}, got {value}")))
    }
}

fn finite(name: &str, value: f64) -> Result<(), BackdropError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be finite, got {value}")))
    }
}
