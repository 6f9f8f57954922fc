use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading maps and configuration.
#[derive(Debug, Error)]
pub enum MapError {
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The document is not valid JSON or does not have the expected shape.
    #[error("failed to parse {path}: {source}")]
    Json {
        /// Source of the document (`<inline>` for in-memory strings).
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// The file extension is not one we can decode.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    /// A layer record has no `type` discriminator.
    #[error("layer #{index} has no `type` field")]
    MissingLayerType {
        /// Position of the layer in the document's `layers` array.
        index: usize,
    },
    /// A tile layer's `data` does not cover the map grid exactly.
    #[error("tile layer '{layer}' has {actual} cells, expected {expected}")]
    InvalidLayerSize {
        /// Layer name.
        layer: String,
        /// `width * height` of the configured map.
        expected: usize,
        /// Length of the layer's `data` array.
        actual: usize,
    },
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MapError {
    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        MapError::Json {
            path: path.into(),
            source,
        }
    }
}
