// Configuration management
//
// Handles scroller configuration and settings persistence.

use crate::display::DisplayMode;
use crate::input::{string_to_button, string_to_keycode, InputCode};
use crate::scroller::constants::{TILE_HEIGHT, TILE_WIDTH};
use crate::scroller::ScrollerConfig;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use winit::keyboard::KeyCode;

/// Default configuration file path
pub const CONFIG_FILE: &str = "scroller_config.toml";

/// Application configuration
///
/// Stores all user-configurable settings of the scroller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display settings
    pub display: DisplayConfig,

    /// Scroll parameters
    pub scroll: ScrollerConfig,

    /// Asset locations
    pub assets: AssetConfig,

    /// Input bindings
    pub input: InputConfig,

    /// Frame capture settings
    pub capture: CaptureConfig,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Output mode (pal or ntsc)
    pub mode: DisplayMode,

    /// Window scale (1-8)
    pub scale: u32,

    /// Enable VSync
    pub vsync: bool,
}

/// Asset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Indexed-color PNG tile sheet
    pub tile_sheet: PathBuf,

    /// JSON level map
    pub level: PathBuf,

    /// Tile width in pixels
    pub tile_width: usize,

    /// Tile height in pixels
    pub tile_height: usize,
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Key that ends the session (default: Escape)
    pub cancel_key: String,

    /// Gamepad button that ends the session (default: Start)
    pub cancel_button: String,

    /// Key that saves a frame capture (default: F12)
    pub capture_key: String,
}

/// Frame capture configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Capture directory
    pub directory: PathBuf,

    /// Include timestamp in filename
    pub include_timestamp: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            display: DisplayConfig {
                mode: DisplayMode::Pal,
                scale: 3,
                vsync: true,
            },
            scroll: ScrollerConfig::default(),
            assets: AssetConfig {
                tile_sheet: PathBuf::from("assets/tiles.png"),
                level: PathBuf::from("assets/level.json"),
                tile_width: TILE_WIDTH,
                tile_height: TILE_HEIGHT,
            },
            input: InputConfig {
                cancel_key: "Escape".to_string(),
                cancel_button: "Start".to_string(),
                capture_key: "F12".to_string(),
            },
            capture: CaptureConfig {
                directory: PathBuf::from("captures"),
                include_timestamp: true,
            },
        }
    }
}

impl InputConfig {
    /// Codes that raise the cancel flag, window close requests included
    pub fn cancel_codes(&self) -> Result<Vec<InputCode>, String> {
        Ok(vec![
            InputCode::Key(string_to_keycode(&self.cancel_key)?),
            InputCode::Button(string_to_button(&self.cancel_button)?),
            InputCode::CloseRequested,
        ])
    }

    /// Key that saves a frame capture
    pub fn capture_keycode(&self) -> Result<KeyCode, String> {
        string_to_keycode(&self.capture_key)
    }
}

impl AppConfig {
    /// Load configuration from file or create default
    ///
    /// If the configuration file doesn't exist, creates a default configuration
    /// and saves it to the file.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Ignoring {}: {}", path.display(), e);
            }
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            if !path.exists() {
                let _ = config.save(path);
            }
            config
        })
    }

    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}
