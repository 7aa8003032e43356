// Display module - Output device abstraction and window presentation
//
// This module provides:
// - PAL and NTSC display modes with their beam timing
// - The `OutputDevice` trait the scroller publishes plane addresses to
// - A software `Screen` that scans the planar scroll buffer out to pixels
// - Palette conversion to RGBA
// - Window creation with scaling support using winit + pixels

pub mod device;
pub mod mode;
pub mod palette;
pub mod screen;
pub mod window;

pub use device::{DeviceError, OutputDevice};
pub use mode::{DisplayGeometry, DisplayMode};
pub use palette::{rgb_to_rgba, Palette};
pub use screen::Screen;
pub use window::{run_window, WindowConfig};
