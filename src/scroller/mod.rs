// Scroller module - Circular buffer vertical tile scrolling
//
// This module provides:
// - Tile blit primitive (sheet tile -> planar buffer)
// - Circular frame buffer holding two copies of the visible window
// - Scroll position controller bouncing between two bounds
// - Row update scheduler that refreshes only incoming rows
//
// `Scroller` owns all of the above plus the tile sheet and level map, and is
// the only writer of the buffer and scroll state.

pub mod blit;
pub mod buffer;
pub mod constants;
pub mod position;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use buffer::{BufferGeometry, PlanarBuffer};
pub use position::{ClampMode, Direction, ScrollMotion, ScrollState};
pub use scheduler::{blit_row, Edge, RowBlit, RowScheduler};

use crate::assets::{LevelMap, TileSheet};
use crate::display::{DisplayGeometry, OutputDevice};
use constants::{BOTTOM_TRIGGER, MARGIN_ROWS, MAX_POS, MIN_POS, SPEED, TOP_TRIGGER};
use log::debug;
use serde::{Deserialize, Serialize};

/// Errors raised by the scroller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollError {
    /// A level cell refers to a tile the sheet does not have
    TileIndexOutOfRange {
        row: usize,
        column: usize,
        index: u16,
        num_tiles: usize,
    },

    /// A level row outside the map was requested
    LevelRowOutOfRange { row: usize, height: usize },

    /// The level cannot cover the scroll range
    LevelTooShort { height: usize, required: usize },

    /// The level is narrower than the display
    LevelTooNarrow { width: usize, columns: usize },

    /// Scroll or tile parameters are inconsistent
    InvalidConfig(String),
}

impl std::fmt::Display for ScrollError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrollError::TileIndexOutOfRange {
                row,
                column,
                index,
                num_tiles,
            } => write!(
                f,
                "Tile index {} at row {}, column {} exceeds the {} tiles of the sheet",
                index, row, column, num_tiles
            ),
            ScrollError::LevelRowOutOfRange { row, height } => {
                write!(f, "Level row {} out of range (height {})", row, height)
            }
            ScrollError::LevelTooShort { height, required } => write!(
                f,
                "Level has {} rows but the scroll range needs {}",
                height, required
            ),
            ScrollError::LevelTooNarrow { width, columns } => write!(
                f,
                "Level is {} tiles wide but the display needs {}",
                width, columns
            ),
            ScrollError::InvalidConfig(msg) => write!(f, "Invalid scroll configuration: {}", msg),
        }
    }
}

impl std::error::Error for ScrollError {}

/// Scroll parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollerConfig {
    /// Topmost position in lines
    pub min_pos: i32,

    /// Bottommost position in lines
    pub max_pos: i32,

    /// Lines per tick
    pub speed: i32,

    /// Bound check order
    pub clamp: ClampMode,

    /// Top-row trigger line within a tile period
    pub top_trigger: usize,

    /// Bottom-row trigger line within a tile period
    pub bottom_trigger: usize,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        ScrollerConfig {
            min_pos: MIN_POS,
            max_pos: MAX_POS,
            speed: SPEED,
            clamp: ClampMode::Reference,
            top_trigger: TOP_TRIGGER,
            bottom_trigger: BOTTOM_TRIGGER,
        }
    }
}

/// Outcome of one scroller tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Position change
    pub motion: ScrollMotion,
    /// First displayed buffer line after the tick
    pub display_offset: usize,
    /// Rows refreshed during the tick
    pub blits: Vec<RowBlit>,
}

/// Scrolling renderer context
pub struct Scroller {
    sheet: TileSheet,
    level: LevelMap,
    buffer: PlanarBuffer,
    scroll: ScrollState,
    scheduler: RowScheduler,
    visible_lines: usize,
    ticks: u64,
}

impl Scroller {
    /// Create a scroller and pre-fill the buffer for the starting position
    ///
    /// # Arguments
    /// * `sheet` - Tile graphics
    /// * `level` - Level map
    /// * `geometry` - Geometry reported by the output device
    /// * `config` - Scroll parameters
    pub fn new(
        sheet: TileSheet,
        level: LevelMap,
        geometry: &DisplayGeometry,
        config: &ScrollerConfig,
    ) -> Result<Self, ScrollError> {
        let tile_height = sheet.tile_height();
        validate(&sheet, &level, geometry, config)?;

        let rows_per_half = geometry.visible_lines / tile_height + MARGIN_ROWS;
        let buffer = PlanarBuffer::new(BufferGeometry {
            width: geometry.width,
            tile_width: sheet.tile_width(),
            tile_height,
            rows_per_half,
            planes: sheet.depth(),
        });
        let scheduler = RowScheduler::new(
            tile_height,
            rows_per_half,
            config.top_trigger,
            config.bottom_trigger,
        );
        let scroll = ScrollState::new(config.min_pos, config.max_pos, config.speed, config.clamp);

        let mut scroller = Self {
            sheet,
            level,
            buffer,
            scroll,
            scheduler,
            visible_lines: geometry.visible_lines,
            ticks: 0,
        };
        scroller.prefill()?;
        Ok(scroller)
    }

    /// Fill the buffer from scratch for the current position
    ///
    /// Writes the `rows_per_half` level rows starting at the current one into
    /// both halves, then leaves each copy of the slot above the window in the
    /// state the triggers would have put it in at this position.
    pub fn prefill(&mut self) -> Result<(), ScrollError> {
        let tile_height = self.sheet.tile_height() as i32;
        let half = self.buffer.rows_per_half();
        let height = self.level.height() as i32;
        let first = self.scroll.position().div_euclid(tile_height);

        for offset in 0..half as i32 {
            let level_row = (first + offset).rem_euclid(height) as usize;
            let buffer_row = (first + offset).rem_euclid(half as i32) as usize;
            blit_row(
                &mut self.buffer,
                &self.sheet,
                &self.level,
                level_row,
                buffer_row,
            )?;
            blit_row(
                &mut self.buffer,
                &self.sheet,
                &self.level,
                level_row,
                buffer_row + half,
            )?;
        }

        let position = self.scroll.position();
        for blit in self.scheduler.unreached(position, self.level.height()) {
            blit_row(
                &mut self.buffer,
                &self.sheet,
                &self.level,
                blit.source_row,
                blit.dest_row,
            )?;
        }
        debug!(
            "prefilled {} rows per half at position {}",
            half,
            self.scroll.position()
        );
        Ok(())
    }

    /// Move the scroll to `position` and rebuild the buffer for it
    pub fn reset_to(&mut self, position: i32, direction: Direction) -> Result<(), ScrollError> {
        self.scroll.jump_to(position, direction);
        self.prefill()
    }

    /// Advance one tick: move the position, then refresh incoming rows
    pub fn tick(&mut self) -> Result<TickReport, ScrollError> {
        let motion = self.scroll.tick();
        let blits = self.scheduler.plan(&motion, self.level.height());

        for blit in &blits {
            blit_row(
                &mut self.buffer,
                &self.sheet,
                &self.level,
                blit.source_row,
                blit.dest_row,
            )?;
        }

        self.ticks += 1;
        Ok(TickReport {
            tick: self.ticks,
            motion,
            display_offset: self.display_offset(),
            blits,
        })
    }

    /// Hand the per-plane read addresses for the current position to `device`
    pub fn publish<D: OutputDevice + ?Sized>(&self, device: &mut D) {
        let position = self.scroll.position();
        for plane in 0..self.buffer.planes() {
            device.publish_plane_address(plane, self.buffer.plane_address(plane, position));
        }
    }

    /// First displayed buffer line
    pub fn display_offset(&self) -> usize {
        self.buffer.display_offset(self.scroll.position())
    }

    /// The circular buffer
    pub fn buffer(&self) -> &PlanarBuffer {
        &self.buffer
    }

    /// Scroll state
    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    /// Row scheduler
    pub fn scheduler(&self) -> &RowScheduler {
        &self.scheduler
    }

    /// Tile sheet
    pub fn sheet(&self) -> &TileSheet {
        &self.sheet
    }

    /// Level map
    pub fn level(&self) -> &LevelMap {
        &self.level
    }

    /// Visible lines of the display
    pub fn visible_lines(&self) -> usize {
        self.visible_lines
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Check that the assets and parameters can scroll without leaving the level
/// or the buffer
fn validate(
    sheet: &TileSheet,
    level: &LevelMap,
    geometry: &DisplayGeometry,
    config: &ScrollerConfig,
) -> Result<(), ScrollError> {
    let tile_width = sheet.tile_width();
    let tile_height = sheet.tile_height();

    if geometry.width % tile_width != 0 {
        return Err(ScrollError::InvalidConfig(format!(
            "display width {} is not a multiple of the tile width {}",
            geometry.width, tile_width
        )));
    }
    if geometry.visible_lines % tile_height != 0 {
        return Err(ScrollError::InvalidConfig(format!(
            "{} visible lines is not a multiple of the tile height {}",
            geometry.visible_lines, tile_height
        )));
    }
    if !(0 < config.top_trigger
        && config.top_trigger < config.bottom_trigger
        && config.bottom_trigger < tile_height)
    {
        return Err(ScrollError::InvalidConfig(format!(
            "triggers {} and {} must satisfy 0 < top < bottom < {}",
            config.top_trigger, config.bottom_trigger, tile_height
        )));
    }
    if config.speed < 1 || config.speed as usize > config.bottom_trigger {
        return Err(ScrollError::InvalidConfig(format!(
            "speed {} must be between 1 and the bottom trigger {}",
            config.speed, config.bottom_trigger
        )));
    }
    if config.min_pos < 0 || config.min_pos >= config.max_pos {
        return Err(ScrollError::InvalidConfig(format!(
            "scroll range {}..={} is empty or negative",
            config.min_pos, config.max_pos
        )));
    }

    let columns = geometry.width / tile_width;
    if level.width() < columns {
        return Err(ScrollError::LevelTooNarrow {
            width: level.width(),
            columns,
        });
    }

    // The deepest line ever shown, including a possible one-tick overshoot
    let overshoot = match config.clamp {
        ClampMode::Reference => config.speed as usize - 1,
        ClampMode::Strict => 0,
    };
    let deepest_line = config.max_pos as usize + overshoot + geometry.visible_lines;
    let required = deepest_line
        .div_ceil(tile_height)
        .max(geometry.visible_lines / tile_height + MARGIN_ROWS);
    if level.height() < required {
        return Err(ScrollError::LevelTooShort {
            height: level.height(),
            required,
        });
    }

    if let Some((row, column, index)) = level.find_index_above(sheet.num_tiles()) {
        return Err(ScrollError::TileIndexOutOfRange {
            row,
            column,
            index,
            num_tiles: sheet.num_tiles(),
        });
    }
    Ok(())
}
