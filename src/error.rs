use thiserror::Error;

/// Everything that can go wrong while mounting or animating a backdrop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackdropError {
    /// The drawing surface or the viewport measurement API is missing.
    #[error("environment unavailable: {0}")]
    EnvironmentUnavailable(String),

    /// A single frame failed; the loop stops rather than retrying.
    #[error("draw step fault: {0}")]
    DrawStepFault(String),

    /// A measured size had a zero, negative or non-finite dimension.
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl BackdropError {
    pub(crate) fn unavailable(what: impl Into<String>) -> Self {
        Self::EnvironmentUnavailable(what.into())
    }

    pub(crate) fn fault(what: impl Into<String>) -> Self {
        Self::DrawStepFault(what.into())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<BackdropError> for wasm_bindgen::JsValue {
    fn from(err: BackdropError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let err = BackdropError::InvalidViewport {
            width: 0.0,
            height: 600.0,
        };
        assert_eq!(err.to_string(), "invalid viewport 0x600");
        assert_eq!(
            BackdropError::unavailable("no 2d context").to_string(),
            "environment unavailable: no 2d context"
        );
    }
}
