//! Scroller unit tests
//!
//! Tests for the scroll controller, the row scheduler and the full scroller,
//! organized by functionality.

use super::*;
use crate::display::{DisplayMode, Palette};

// ========================================
// Test Helper Functions
// ========================================

/// Tile sheet of `columns × rows` tiles of `tile × tile` pixels
///
/// Pixels of tile `k` follow a diagonal pattern shifted by `k`, so
/// neighbouring tiles never look alike.
pub(crate) fn patterned_sheet(tile: usize, columns: usize, rows: usize, colors: usize) -> TileSheet {
    let width = tile * columns;
    let height = tile * rows;
    let mut pixels = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let k = (y / tile) * columns + x / tile;
            pixels[y * width + x] = ((k + (x % tile) + 3 * (y % tile)) % colors) as u8;
        }
    }
    let palette = Palette::new((0..colors as u32).map(|c| c * 0x030507).collect());
    TileSheet::from_indexed(width, height, &pixels, palette, tile, tile).expect("valid sheet")
}

/// Level whose cells count up through `0..=num_tiles`, empty cells included
pub(crate) fn patterned_level(width: usize, height: usize, num_tiles: usize) -> LevelMap {
    let tiles = (0..width * height)
        .map(|i| (i % (num_tiles + 1)) as u16)
        .collect();
    LevelMap::new(width, height, tiles).expect("valid level")
}

/// Scroller over a 32-color, 16x16-tile sheet and a 70-row level
pub(crate) fn test_scroller(mode: DisplayMode, config: &ScrollerConfig) -> Scroller {
    let sheet = patterned_sheet(16, 16, 16, 32);
    let level = patterned_level(20, 70, sheet.num_tiles());
    Scroller::new(sheet, level, &mode.geometry(), config).expect("valid scroller")
}

/// Check every displayed line of every plane against `reference`
pub(crate) fn assert_same_window(actual: &Scroller, reference: &Scroller) {
    let position = actual.scroll().position();
    for plane in 0..actual.buffer().planes() {
        let got = actual
            .buffer()
            .plane_window(plane, position, actual.visible_lines());
        let want = reference
            .buffer()
            .plane_window(plane, position, reference.visible_lines());
        if got != want {
            let stride = actual.buffer().row_stride();
            let line = got
                .chunks(stride)
                .zip(want.chunks(stride))
                .position(|(g, w)| g != w)
                .unwrap_or(0);
            panic!(
                "plane {} differs at visible line {} (position {}, tick {})",
                plane,
                line,
                position,
                actual.ticks()
            );
        }
    }
}

// ========================================
// Test Modules
// ========================================
