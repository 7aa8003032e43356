// Frame capture
//
// Saves the displayed frame as a PNG file.

use super::config::CaptureConfig;
use crate::display::Screen;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during capture operations
#[derive(Debug)]
pub enum ScreenshotError {
    /// I/O error
    Io(io::Error),

    /// PNG encoding error
    PngEncoding(png::EncodingError),

    /// Nothing has been displayed yet
    EmptyFrame,
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::Io(e) => write!(f, "I/O error: {}", e),
            ScreenshotError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
            ScreenshotError::EmptyFrame => write!(f, "No frame to capture"),
        }
    }
}

impl std::error::Error for ScreenshotError {}

impl From<io::Error> for ScreenshotError {
    fn from(e: io::Error) -> Self {
        ScreenshotError::Io(e)
    }
}

impl From<png::EncodingError> for ScreenshotError {
    fn from(e: png::EncodingError) -> Self {
        ScreenshotError::PngEncoding(e)
    }
}

/// Save the current screen contents
///
/// # Arguments
/// * `screen` - Screen to capture
/// * `config` - Capture directory and naming
///
/// # Returns
/// Path of the saved capture
pub fn save_screenshot(screen: &Screen, config: &CaptureConfig) -> Result<PathBuf, ScreenshotError> {
    if screen.width() == 0 || screen.height() == 0 {
        return Err(ScreenshotError::EmptyFrame);
    }

    fs::create_dir_all(&config.directory)?;
    let file_path = config.directory.join(capture_file_name(config.include_timestamp));

    save_png(
        &file_path,
        &screen.to_rgb(),
        screen.width() as u32,
        screen.height() as u32,
    )?;

    Ok(file_path)
}

/// File name of a capture
fn capture_file_name(include_timestamp: bool) -> String {
    if include_timestamp {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        format!("capture_{}.png", timestamp)
    } else {
        "capture.png".to_string()
    }
}

/// Save RGB data as a PNG file
fn save_png(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), ScreenshotError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(data)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{DisplayMode, OutputDevice, Palette};

    #[test]
    fn test_capture_file_name() {
        assert_eq!(capture_file_name(false), "capture.png");
        let name = capture_file_name(true);
        assert!(name.starts_with("capture_"));
        assert!(name.ends_with(".png"));
        // capture_YYYYMMDD_HHMMSS.png
        assert_eq!(name.len(), "capture_".len() + 15 + ".png".len());
    }

    #[test]
    fn test_unconfigured_screen_is_rejected() {
        let config = CaptureConfig {
            directory: std::env::temp_dir(),
            include_timestamp: false,
        };
        let result = save_screenshot(&Screen::new(), &config);
        assert!(matches!(result, Err(ScreenshotError::EmptyFrame)));
    }

    #[test]
    fn test_save_screenshot() {
        let mut screen = Screen::new();
        screen.configure(DisplayMode::Ntsc).expect("configure");
        screen
            .commit(&Palette::new(vec![0x000000, 0xFF8000]))
            .expect("commit");
        screen.set_pixel(2, 1, 1);

        let directory =
            std::env::temp_dir().join(format!("tile_scroll_captures_{}", std::process::id()));
        let config = CaptureConfig {
            directory: directory.clone(),
            include_timestamp: false,
        };
        let path = save_screenshot(&screen, &config).expect("save capture");

        let decoder = png::Decoder::new(io::BufReader::new(
            fs::File::open(&path).expect("open capture"),
        ));
        let mut reader = decoder.read_info().expect("read info");
        let mut data = vec![0u8; 320 * 192 * 3];
        reader.next_frame(&mut data).expect("decode");
        let _ = fs::remove_dir_all(&directory);

        assert_eq!(reader.info().width, 320);
        assert_eq!(reader.info().height, 192);
        let offset = (320 + 2) * 3;
        assert_eq!(&data[offset..offset + 3], &[0xFF, 0x80, 0x00]);
        assert_eq!(&data[..3], &[0, 0, 0]);
    }
}
