// Window module - Presents the scroll session in a desktop window
//
// The window drives the session: every redraw runs one session step (which
// blocks on the frame sync), scans the buffer out to the screen and renders
// it with pixels. Keyboard input and close requests go through the session's
// input dispatcher, so the cancel listener sees them first.

use super::device::DeviceError;
use super::screen::Screen;
use crate::app::{save_screenshot, AppConfig, AppError, CaptureConfig, Session};
use crate::input::{key_event, InputCode, InputEvent};
use crate::sync::RefreshCounter;
use log::{error, info, warn};
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Scale factor (1x, 2x, 3x, 4x, etc.)
    pub scale: u32,
    /// Whether to enable VSync
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a new window configuration with default values
    ///
    /// Default: 3x scale, VSync enabled
    pub fn new() -> Self {
        Self {
            scale: 3,
            vsync: true,
        }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8); // Clamp between 1x and 8x
        self
    }

    /// Set VSync enabled or disabled
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Window size in pixels for a `width × height` screen
    pub fn window_size(&self, width: usize, height: usize) -> (u32, u32) {
        (width as u32 * self.scale, height as u32 * self.scale)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Window presenting a scroll session
struct ScrollWindow<C: RefreshCounter> {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: WindowConfig,
    session: Session<Screen, C>,
    capture: CaptureConfig,
    capture_key: KeyCode,
    error: Option<AppError>,
}

impl<C: RefreshCounter> ScrollWindow<C> {
    /// Create the window, its pixel surface and its scaled size
    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let (width, height) = (self.session.device().width(), self.session.device().height());
        let (window_width, window_height) = self.config.window_size(width, height);

        let window_attributes = Window::default_attributes()
            .with_title(format!("Tile Scroll - {}x{}", width, height))
            .with_inner_size(LogicalSize::new(window_width, window_height))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(DeviceError::from)?,
        );
        let window_size = window.inner_size();

        // Create surface texture using Arc<Window> for safe 'static lifetime
        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        let pixels = PixelsBuilder::new(width as u32, height as u32, surface_texture)
            .enable_vsync(self.config.vsync)
            .build()
            .map_err(DeviceError::from)?;

        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    /// Stop the event loop, keeping the first error
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
        event_loop.exit();
    }

    /// Run one session step and present the result
    ///
    /// # Returns
    /// Whether the session is still running
    fn frame(&mut self) -> Result<bool, AppError> {
        if self.session.step()?.is_none() {
            return Ok(false);
        }
        self.session.scan_out()?;

        if let Some(pixels) = &mut self.pixels {
            self.session.device().to_rgba(pixels.frame_mut());
            pixels
                .render()
                .map_err(DeviceError::from)?;
        }
        Ok(true)
    }

    /// Handle an event that passed the dispatcher
    fn handle_input(&mut self, event: InputEvent) {
        if event.pressed && event.code == InputCode::Key(self.capture_key) {
            match save_screenshot(self.session.device(), &self.capture) {
                Ok(path) => info!("Capture saved to {}", path.display()),
                Err(e) => warn!("Capture failed: {}", e),
            }
        }
    }
}

impl<C: RefreshCounter> ApplicationHandler for ScrollWindow<C> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                self.session
                    .dispatcher()
                    .dispatch(InputEvent::close_requested());
                if self.session.cancel_flag().is_raised() {
                    event_loop.exit();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                let passed = key_event(physical_key, state)
                    .and_then(|event| self.session.dispatcher().dispatch(event));
                if let Some(event) = passed {
                    self.handle_input(event);
                }
            }
            WindowEvent::RedrawRequested => match self.frame() {
                Ok(true) => {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
                Ok(false) => event_loop.exit(),
                Err(err) => self.fail(event_loop, err),
            },
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.cancel_flag().is_raised() {
            event_loop.exit();
        } else if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Present `session` in a window until it is cancelled
///
/// # Arguments
/// * `config` - Application configuration (window and capture settings)
/// * `session` - Started session driving a `Screen`
pub fn run_window<C: RefreshCounter>(
    config: &AppConfig,
    session: Session<Screen, C>,
) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(DeviceError::from)?;
    // Frame pacing comes from the session's frame sync
    event_loop.set_control_flow(ControlFlow::Poll);

    let window_config = WindowConfig::new()
        .with_scale(config.display.scale)
        .with_vsync(config.display.vsync);
    let capture_key = config
        .input
        .capture_keycode()
        .map_err(AppError::Config)?;

    let (width, height) = (session.device().width(), session.device().height());
    let (window_width, window_height) = window_config.window_size(width, height);
    println!("Starting display window...");
    println!("  Resolution: {}x{}", width, height);
    println!("  Window size: {}x{}", window_width, window_height);
    println!("  Scale: {}x", window_config.scale);
    println!("  VSync: {}", window_config.vsync);

    let mut app = ScrollWindow {
        window: None,
        pixels: None,
        config: window_config,
        session,
        capture: config.capture.clone(),
        capture_key,
        error: None,
    };
    event_loop
        .run_app(&mut app)
        .map_err(DeviceError::from)?;

    app.session.shutdown();
    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_config_scale_is_clamped() {
        assert_eq!(WindowConfig::new().with_scale(0).scale, 1);
        assert_eq!(WindowConfig::new().with_scale(20).scale, 8);
    }

    #[test]
    fn test_window_size() {
        let config = WindowConfig::new().with_scale(2);
        assert_eq!(config.window_size(320, 256), (640, 512));
    }
}
