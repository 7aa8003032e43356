// Scroller constants

/// Display width in pixels
pub const SCREEN_WIDTH: usize = 320;

/// Bytes per line of a single bitplane (8 pixels per byte)
pub const BYTES_PER_ROW: usize = SCREEN_WIDTH / 8;

/// Default tile width in pixels
pub const TILE_WIDTH: usize = 16;

/// Default tile height in pixels
pub const TILE_HEIGHT: usize = 16;

/// Extra tile rows kept below the visible window in each buffer half
///
/// PAL shows 256 lines (16 tiles) and keeps 18 rows per half, NTSC shows
/// 192 lines (12 tiles) and keeps 14.
pub const MARGIN_ROWS: usize = 2;

// ========================================
// Scroll Constants
// ========================================

/// Topmost logical scroll position (in lines)
pub const MIN_POS: i32 = 0;

/// Bottommost logical scroll position (in lines)
pub const MAX_POS: i32 = 832;

/// Lines advanced per tick
pub const SPEED: i32 = 1;

/// Line within a tile period at which the incoming top row is blitted
pub const TOP_TRIGGER: usize = 4;

/// Line within a tile period at which the incoming bottom row is blitted
pub const BOTTOM_TRIGGER: usize = 8;

// ========================================
// Display Mode Constants
// ========================================

/// Visible lines in PAL mode
pub const PAL_VISIBLE_LINES: usize = 256;

/// Visible lines in NTSC mode (a multiple of the 16 pixel tile height)
pub const NTSC_VISIBLE_LINES: usize = 192;

/// Beam line the frame sync waits for in PAL mode
pub const PAL_WAIT_LINE: u32 = 303;

/// Beam line the frame sync waits for in NTSC mode
pub const NTSC_WAIT_LINE: u32 = 262;

/// Lines per frame in PAL mode (long frame)
pub const PAL_LINES_PER_FRAME: u32 = 313;

/// Lines per frame in NTSC mode (long frame)
pub const NTSC_LINES_PER_FRAME: u32 = 263;

/// PAL refresh rate in Hz
pub const PAL_REFRESH_HZ: u32 = 50;

/// NTSC refresh rate in Hz
pub const NTSC_REFRESH_HZ: u32 = 60;
