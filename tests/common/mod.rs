// Common test utilities for scroll integration tests
//
// This module provides asset builders, a recording output device and a
// stepped refresh counter shared across the integration test suites.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use tile_scroll::display::{DeviceError, DisplayGeometry, DisplayMode, OutputDevice, Palette};
use tile_scroll::input::CancelFlag;
use tile_scroll::sync::RefreshCounter;
use tile_scroll::{LevelMap, TileSheet};

/// Tile sheet of `columns × rows` 16x16 tiles using 16 colors
pub fn test_sheet(columns: usize, rows: usize) -> TileSheet {
    let width = 16 * columns;
    let height = 16 * rows;
    let pixels: Vec<u8> = (0..width * height)
        .map(|i| {
            let (x, y) = (i % width, i / width);
            let tile = (y / 16) * columns + x / 16;
            ((tile + x + y) % 16) as u8
        })
        .collect();
    let palette = Palette::new((0..16u32).map(|c| c * 0x111111).collect());
    TileSheet::from_indexed(width, height, &pixels, palette, 16, 16).expect("valid sheet")
}

/// Level of the given size cycling through `0..=num_tiles`
pub fn test_level(width: usize, height: usize, num_tiles: usize) -> LevelMap {
    let tiles = (0..width * height)
        .map(|i| (i % (num_tiles + 1)) as u16)
        .collect();
    LevelMap::new(width, height, tiles).expect("valid level")
}

/// Everything a recording device has been asked to do
#[derive(Debug, Default)]
pub struct DeviceLog {
    pub configured: Option<DisplayMode>,
    pub committed_colors: Option<usize>,
    /// `(plane, address)` in publish order
    pub published: Vec<(usize, usize)>,
    pub resets: usize,
}

/// Output device that records every call
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    pub log: Arc<Mutex<DeviceLog>>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of publish calls so far
    pub fn publish_count(&self) -> usize {
        self.log.lock().unwrap().published.len()
    }
}

impl OutputDevice for RecordingDevice {
    fn configure(&mut self, mode: DisplayMode) -> Result<DisplayGeometry, DeviceError> {
        self.log.lock().unwrap().configured = Some(mode);
        Ok(mode.geometry())
    }

    fn commit(&mut self, palette: &Palette) -> Result<(), DeviceError> {
        self.log.lock().unwrap().committed_colors = Some(palette.len());
        Ok(())
    }

    fn publish_plane_address(&mut self, plane: usize, address: usize) {
        self.log.lock().unwrap().published.push((plane, address));
    }

    fn reset(&mut self) {
        self.log.lock().unwrap().resets += 1;
    }
}

/// Refresh counter that jumps straight to the requested line
///
/// Optionally raises a cancel flag the `n`-th time it is asked to idle.
#[derive(Debug, Default)]
pub struct SteppedCounter {
    pub line: u64,
    pub idles: u64,
    pub cancel_on_idle: Option<(u64, CancelFlag)>,
}

impl SteppedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise `flag` during idle call number `n` (1-based)
    pub fn cancelling_on(n: u64, flag: CancelFlag) -> Self {
        Self {
            cancel_on_idle: Some((n, flag)),
            ..Self::default()
        }
    }
}

impl RefreshCounter for SteppedCounter {
    fn line_count(&self) -> u64 {
        self.line
    }

    fn idle(&mut self, lines: u64) {
        self.line += lines;
        self.idles += 1;
        if let Some((n, flag)) = &self.cancel_on_idle {
            if self.idles == *n {
                flag.raise();
            }
        }
    }
}
