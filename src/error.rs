//! Structured error types for lifeview.
//!
//! Camera and raster operations never fail; errors only come from
//! configuration input and from host-supplied cell lists.

/// All errors that can occur while configuring or feeding the renderer.
#[derive(Debug, thiserror::Error)]
pub enum LifeviewError {
    /// Malformed configuration value (e.g. a color string).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Cell coordinate list that cannot be turned into a universe.
    #[error("Invalid cell list: {0}")]
    InvalidCells(String),

    /// Presentation failure reported by the host surface.
    #[error("Render error: {0}")]
    Render(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LifeviewError>;

#[cfg(target_arch = "wasm32")]
impl From<LifeviewError> for wasm_bindgen::JsValue {
    fn from(e: LifeviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_message_names_the_value() {
        let err = LifeviewError::Configuration("bad color \"#12\"".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad color \"#12\"");
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: LifeviewError = parse.unwrap_err().into();
        assert!(matches!(err, LifeviewError::Json(_)));
    }
}
