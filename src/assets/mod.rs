// Asset store - Tile sheet and level map loading
//
// Tile sheets are indexed-color PNG images cut into fixed-size tiles and
// converted to bitplanes on load. Level maps are JSON grids of 1-based tile
// indices where 0 marks an empty cell.

mod level;
mod tilesheet;

pub use level::LevelMap;
pub use tilesheet::TileSheet;

use std::io;

/// Errors that can occur while loading assets
#[derive(Debug)]
pub enum AssetError {
    /// I/O error
    Io(io::Error),

    /// PNG decoding error
    PngDecoding(png::DecodingError),

    /// JSON parsing error
    Json(serde_json::Error),

    /// The file parsed but its contents are unusable
    Format(String),
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::Io(e) => write!(f, "I/O error: {}", e),
            AssetError::PngDecoding(e) => write!(f, "PNG decoding error: {}", e),
            AssetError::Json(e) => write!(f, "JSON error: {}", e),
            AssetError::Format(msg) => write!(f, "Invalid asset: {}", msg),
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io(e) => Some(e),
            AssetError::PngDecoding(e) => Some(e),
            AssetError::Json(e) => Some(e),
            AssetError::Format(_) => None,
        }
    }
}

impl From<io::Error> for AssetError {
    fn from(e: io::Error) -> Self {
        AssetError::Io(e)
    }
}

impl From<png::DecodingError> for AssetError {
    fn from(e: png::DecodingError) -> Self {
        AssetError::PngDecoding(e)
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(e: serde_json::Error) -> Self {
        AssetError::Json(e)
    }
}
