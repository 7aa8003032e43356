// Output device - Abstract display the scroller publishes to
//
// A device is configured once for a mode, takes the palette on commit,
// receives one address per bitplane every tick and releases the output on
// reset.

use super::mode::{DisplayGeometry, DisplayMode};
use super::palette::Palette;

/// Errors raised while acquiring or driving the display output
#[derive(Debug)]
pub enum DeviceError {
    /// The windowing event loop could not be created or failed
    EventLoop(winit::error::EventLoopError),

    /// The window could not be created
    Window(winit::error::OsError),

    /// The pixel surface could not be created or rendered
    Surface(pixels::Error),

    /// Operation needs a configured device
    NotConfigured,
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            DeviceError::Window(e) => write!(f, "Window error: {}", e),
            DeviceError::Surface(e) => write!(f, "Pixel surface error: {}", e),
            DeviceError::NotConfigured => write!(f, "Display device is not configured"),
        }
    }
}

impl std::error::Error for DeviceError {}

impl From<winit::error::EventLoopError> for DeviceError {
    fn from(e: winit::error::EventLoopError) -> Self {
        DeviceError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for DeviceError {
    fn from(e: winit::error::OsError) -> Self {
        DeviceError::Window(e)
    }
}

impl From<pixels::Error> for DeviceError {
    fn from(e: pixels::Error) -> Self {
        DeviceError::Surface(e)
    }
}

/// Display output the scroller drives
pub trait OutputDevice {
    /// Set up the output for `mode` and report its geometry
    fn configure(&mut self, mode: DisplayMode) -> Result<DisplayGeometry, DeviceError>;

    /// Take control of the output with the given palette
    fn commit(&mut self, palette: &Palette) -> Result<(), DeviceError>;

    /// Point `plane` at byte `address` of the scroll buffer
    fn publish_plane_address(&mut self, plane: usize, address: usize);

    /// Release the output
    fn reset(&mut self);
}
