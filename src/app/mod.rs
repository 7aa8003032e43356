// App module - Session lifecycle and main loop
//
// A session owns the scroller, the output device, the frame sync and the
// input wiring. Each step waits for the refresh boundary, advances the
// scroller and publishes the new plane addresses, until the cancel flag is
// raised.

pub mod config;
pub mod screenshot;

pub use config::{AppConfig, AssetConfig, CaptureConfig, DisplayConfig, InputConfig, CONFIG_FILE};
pub use screenshot::{save_screenshot, ScreenshotError};

use crate::assets::{AssetError, LevelMap, TileSheet};
use crate::display::{DeviceError, DisplayGeometry, OutputDevice, Screen};
use crate::input::{
    CancelFlag, CancelListener, GamepadWatcher, HandlerId, InputCode, InputDispatcher,
};
use crate::scroller::{ScrollError, Scroller, TickReport};
use crate::sync::{FrameSync, RefreshCounter, VirtualBeam};
use log::{debug, info, trace};
use std::path::PathBuf;

/// Errors that end a session
#[derive(Debug)]
pub enum AppError {
    /// An asset could not be loaded
    Asset { path: PathBuf, source: AssetError },

    /// The scroller rejected its assets or parameters
    Scroll(ScrollError),

    /// The display output could not be acquired
    Device(DeviceError),

    /// The configuration is unusable
    Config(String),

    /// A frame capture failed
    Screenshot(ScreenshotError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Asset { path, source } => {
                write!(f, "Failed to load {}: {}", path.display(), source)
            }
            AppError::Scroll(e) => write!(f, "{}", e),
            AppError::Device(e) => write!(f, "{}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Screenshot(e) => write!(f, "Capture failed: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Asset { source, .. } => Some(source),
            AppError::Scroll(e) => Some(e),
            AppError::Device(e) => Some(e),
            AppError::Config(_) => None,
            AppError::Screenshot(e) => Some(e),
        }
    }
}

impl From<ScrollError> for AppError {
    fn from(e: ScrollError) -> Self {
        AppError::Scroll(e)
    }
}

impl From<DeviceError> for AppError {
    fn from(e: DeviceError) -> Self {
        AppError::Device(e)
    }
}

impl From<ScreenshotError> for AppError {
    fn from(e: ScreenshotError) -> Self {
        AppError::Screenshot(e)
    }
}

/// Load the tile sheet and level map named in `config`
pub fn load_assets(config: &AssetConfig) -> Result<(TileSheet, LevelMap), AppError> {
    let sheet = TileSheet::load(&config.tile_sheet, config.tile_width, config.tile_height)
        .map_err(|source| AppError::Asset {
            path: config.tile_sheet.clone(),
            source,
        })?;
    let level = LevelMap::load(&config.level).map_err(|source| AppError::Asset {
        path: config.level.clone(),
        source,
    })?;
    info!(
        "Loaded {} tiles of {}x{} ({} planes) and a {}x{} level",
        sheet.num_tiles(),
        sheet.tile_width(),
        sheet.tile_height(),
        sheet.depth(),
        level.width(),
        level.height()
    );
    Ok((sheet, level))
}

/// A running scroll session
pub struct Session<D: OutputDevice, C: RefreshCounter = VirtualBeam> {
    scroller: Scroller,
    device: D,
    counter: C,
    sync: FrameSync,
    cancel: CancelFlag,
    dispatcher: InputDispatcher,
    cancel_handler: Option<HandlerId>,
    gamepad: Option<GamepadWatcher>,
    finished: bool,
}

impl<D: OutputDevice> Session<D, VirtualBeam> {
    /// Start a session from the configuration
    ///
    /// Loads the assets, configures `device`, pre-fills the scroll buffer,
    /// commits the palette and installs the cancel listener and gamepad
    /// watcher. A device that was configured is reset again if a later step
    /// fails.
    pub fn start(config: &AppConfig, mut device: D) -> Result<Self, AppError> {
        let cancel_codes = config.input.cancel_codes().map_err(AppError::Config)?;
        let (sheet, level) = load_assets(&config.assets)?;

        let geometry = device.configure(config.display.mode)?;
        let prepared = Scroller::new(sheet, level, &geometry, &config.scroll)
            .map_err(AppError::from)
            .and_then(|scroller| {
                device.commit(scroller.sheet().palette())?;
                Ok(scroller)
            });
        let scroller = match prepared {
            Ok(scroller) => scroller,
            Err(e) => {
                device.reset();
                return Err(e);
            }
        };

        let dispatcher = InputDispatcher::new();
        let mut session = Self::assemble(
            scroller,
            device,
            &geometry,
            VirtualBeam::new(&geometry),
            dispatcher.clone(),
            CancelFlag::new(),
            cancel_codes,
        );
        session.gamepad = Some(GamepadWatcher::spawn(dispatcher));
        Ok(session)
    }
}

impl<D: OutputDevice, C: RefreshCounter> Session<D, C> {
    /// Put a session together from ready parts
    ///
    /// The device must already be configured for `geometry` and committed.
    /// Installs a cancel listener for `cancel_codes` on `dispatcher` and
    /// publishes the starting plane addresses.
    pub fn assemble(
        scroller: Scroller,
        mut device: D,
        geometry: &DisplayGeometry,
        counter: C,
        dispatcher: InputDispatcher,
        cancel: CancelFlag,
        cancel_codes: Vec<InputCode>,
    ) -> Self {
        let cancel_handler =
            CancelListener::new(cancel.clone(), cancel_codes).install(&dispatcher);
        scroller.publish(&mut device);

        Self {
            scroller,
            device,
            counter,
            sync: FrameSync::new(geometry),
            cancel,
            dispatcher,
            cancel_handler: Some(cancel_handler),
            gamepad: None,
            finished: false,
        }
    }

    /// Run one frame
    ///
    /// # Returns
    /// The tick report, or `None` once the cancel flag is raised
    pub fn step(&mut self) -> Result<Option<TickReport>, ScrollError> {
        if self.finished || self.cancel.is_raised() {
            return Ok(None);
        }

        self.sync.wait(&mut self.counter);
        // The flag may have been raised while waiting
        if self.cancel.is_raised() {
            return Ok(None);
        }

        let report = self.scroller.tick()?;
        self.scroller.publish(&mut self.device);
        trace!(
            "tick {}: position {} offset {} blits {}",
            report.tick,
            report.motion.to,
            report.display_offset,
            report.blits.len()
        );
        Ok(Some(report))
    }

    /// Step until cancelled
    ///
    /// # Returns
    /// The number of ticks run
    pub fn run(&mut self) -> Result<u64, ScrollError> {
        while self.step()?.is_some() {}
        info!(
            "Stopped after {} ticks ({} frames dropped)",
            self.scroller.ticks(),
            self.sync.dropped()
        );
        Ok(self.scroller.ticks())
    }

    /// Release the input handler, the gamepad thread and the output
    ///
    /// Runs once; later calls do nothing. Also runs on drop.
    pub fn shutdown(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if let Some(id) = self.cancel_handler.take() {
            self.dispatcher.unregister_handler(id);
        }
        if let Some(mut gamepad) = self.gamepad.take() {
            gamepad.stop();
        }
        self.device.reset();
        debug!("Session shut down");
    }

    /// Whether `shutdown` has run
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The scroller
    pub fn scroller(&self) -> &Scroller {
        &self.scroller
    }

    /// The output device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the output device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The exit flag
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// The input dispatcher
    pub fn dispatcher(&self) -> &InputDispatcher {
        &self.dispatcher
    }

    /// The frame sync
    pub fn frame_sync(&self) -> &FrameSync {
        &self.sync
    }
}

impl<C: RefreshCounter> Session<Screen, C> {
    /// Scan the displayed window out to the screen
    pub fn scan_out(&mut self) -> Result<(), DeviceError> {
        self.device.scan_out(self.scroller.buffer())
    }
}

impl<D: OutputDevice, C: RefreshCounter> Drop for Session<D, C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
