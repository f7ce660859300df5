//! Error types for Tatter

use thiserror::Error;

/// The main error type for destruction operations
#[derive(Debug, Error)]
pub enum TatterError {
    #[error("Drawing surface is not ready yet, retry shortly")]
    SurfaceNotReady,

    #[error("A destruction session is already active")]
    AlreadyActive,

    #[error("Cut line crosses {crossings} polygon edge(s), expected exactly 2")]
    DegenerateSplit { crossings: usize },

    #[error("Cut would leave a sliver piece of {area} px^2")]
    SliverPiece { area: f32 },

    #[error("Polygon needs at least 3 vertices with non-zero area, got {vertices}")]
    DegeneratePolygon { vertices: usize },

    #[error("Input point ({x}, {y}) lies outside the card")]
    InputOutOfBounds { x: f32, y: f32 },

    #[error("Invalid card rect: {0}")]
    InvalidRect(String),

    #[error("Non-finite simulation state: {0}")]
    NonFinite(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Image error: {0}")]
    Image(String),
}

impl TatterError {
    /// Transient errors the caller is expected to retry after a short delay
    pub fn is_transient(&self) -> bool {
        matches!(self, TatterError::SurfaceNotReady)
    }
}

/// Result type alias for Tatter operations
pub type Result<T> = std::result::Result<T, TatterError>;

impl From<toml::de::Error> for TatterError {
    fn from(err: toml::de::Error) -> Self {
        TatterError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for TatterError {
    fn from(err: toml::ser::Error) -> Self {
        TatterError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_surface_not_ready_is_transient() {
        assert!(TatterError::SurfaceNotReady.is_transient());
        assert!(!TatterError::AlreadyActive.is_transient());
        assert!(!TatterError::DegenerateSplit { crossings: 1 }.is_transient());
        assert!(!TatterError::SliverPiece { area: 0.1 }.is_transient());
    }

    #[test]
    fn toml_errors_convert() {
        let err: TatterError = toml::from_str::<toml::Value>("= broken")
            .unwrap_err()
            .into();
        assert!(matches!(err, TatterError::TomlParseError(_)));
    }
}
