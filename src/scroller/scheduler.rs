// Row update scheduler
//
// Each tile-height period of the scroll position has two trigger lines. When
// the position moves down across the top trigger the incoming row is written
// just above the displayed window; at the bottom trigger it is written just
// below it. The two destinations are one half apart, which keeps both buffer
// halves in step. Both triggers sit a few lines before the row can become
// visible, so the blit finishes ahead of the display.
//
// Moving up across a trigger line writes the row for the other direction into
// the same slot, so the buffer contents depend only on the position.

use super::blit::blit_index;
use super::buffer::PlanarBuffer;
use super::position::{Direction, ScrollMotion};
use super::ScrollError;
use crate::assets::{LevelMap, TileSheet};

/// Buffer edge a row is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Row above the displayed window
    Top,
    /// Row below the displayed window
    Bottom,
}

/// One scheduled row refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlit {
    /// Which trigger fired
    pub edge: Edge,
    /// Scroll line the trigger fired on
    pub line: i32,
    /// Level row copied
    pub source_row: usize,
    /// Buffer row written
    pub dest_row: usize,
}

/// Decides which rows to refresh as the position moves
#[derive(Debug, Clone)]
pub struct RowScheduler {
    tile_height: usize,
    rows_per_half: usize,
    top_trigger: usize,
    bottom_trigger: usize,
}

impl RowScheduler {
    /// Create a scheduler
    ///
    /// # Arguments
    /// * `tile_height` - Tile height in lines
    /// * `rows_per_half` - Tile rows in each buffer half
    /// * `top_trigger`, `bottom_trigger` - Trigger lines within a tile period
    pub fn new(
        tile_height: usize,
        rows_per_half: usize,
        top_trigger: usize,
        bottom_trigger: usize,
    ) -> Self {
        Self {
            tile_height,
            rows_per_half,
            top_trigger,
            bottom_trigger,
        }
    }

    /// Tile rows in the whole buffer
    pub fn total_rows(&self) -> usize {
        self.rows_per_half * 2
    }

    /// Trigger firing at `line`, if any
    pub fn trigger_at(&self, line: i32) -> Option<Edge> {
        let within = line.rem_euclid(self.tile_height as i32) as usize;
        if within == self.top_trigger {
            Some(Edge::Top)
        } else if within == self.bottom_trigger {
            Some(Edge::Bottom)
        } else {
            None
        }
    }

    /// Level row that enters the window when a trigger fires at `line`
    ///
    /// Scrolling down brings in the row below the window, scrolling up the row
    /// above it. The row wraps around the level's top and bottom.
    pub fn source_row(&self, line: i32, direction: Direction, level_height: usize) -> usize {
        let current = line.div_euclid(self.tile_height as i32);
        let row = match direction {
            Direction::Down => current + self.rows_per_half as i32 - 1,
            Direction::Up => current - 1,
        };
        row.rem_euclid(level_height as i32) as usize
    }

    /// Buffer row written for `edge` when a trigger fires at `line`
    pub fn dest_row(&self, line: i32, edge: Edge) -> usize {
        let half_lines = (self.rows_per_half * self.tile_height) as i32;
        let screen_row = (line.rem_euclid(half_lines) as usize / self.tile_height) as i32;
        let total = self.total_rows() as i32;

        let row = match edge {
            Edge::Top => {
                let row = screen_row - 1;
                // Window already at the top: use the far end of the buffer
                if row < 0 {
                    total + row
                } else {
                    row
                }
            }
            Edge::Bottom => {
                let row = screen_row + self.rows_per_half as i32 - 1;
                if row >= total {
                    row - total + 1
                } else {
                    row
                }
            }
        };
        row as usize
    }

    /// Refreshes that bring a freshly filled buffer in line with `position`
    ///
    /// A full fill leaves the incoming row of the current period in both
    /// copies of the slot above the window. Each copy whose trigger line lies
    /// below `position` must hold the row above the window instead.
    pub fn unreached(&self, position: i32, level_height: usize) -> Vec<RowBlit> {
        let period_start = position.div_euclid(self.tile_height as i32) * self.tile_height as i32;
        [(self.top_trigger, Edge::Top), (self.bottom_trigger, Edge::Bottom)]
            .into_iter()
            .map(|(trigger, edge)| (period_start + trigger as i32, edge))
            .filter(|&(line, _)| position < line)
            .map(|(line, edge)| RowBlit {
                edge,
                line,
                source_row: self.source_row(line, Direction::Up, level_height),
                dest_row: self.dest_row(line, edge),
            })
            .collect()
    }

    /// Row refreshes required by `motion`
    pub fn plan(&self, motion: &ScrollMotion, level_height: usize) -> Vec<RowBlit> {
        motion
            .reached_lines()
            .filter_map(|line| {
                self.trigger_at(line).map(|edge| RowBlit {
                    edge,
                    line,
                    source_row: self.source_row(line, motion.direction, level_height),
                    dest_row: self.dest_row(line, edge),
                })
            })
            .collect()
    }
}

/// Blit every tile column of level row `source_row` into buffer row `dest_row`
///
/// Index 0 clears the tile slot; index `n` blits sheet tile `n - 1`.
pub fn blit_row(
    buffer: &mut PlanarBuffer,
    sheet: &TileSheet,
    level: &LevelMap,
    source_row: usize,
    dest_row: usize,
) -> Result<(), ScrollError> {
    let tiles = level.row(source_row).ok_or(ScrollError::LevelRowOutOfRange {
        row: source_row,
        height: level.height(),
    })?;
    let columns = buffer.columns();
    if tiles.len() < columns {
        return Err(ScrollError::LevelTooNarrow {
            width: tiles.len(),
            columns,
        });
    }

    for (column, &index) in tiles[..columns].iter().enumerate() {
        if index as usize > sheet.num_tiles() {
            return Err(ScrollError::TileIndexOutOfRange {
                row: source_row,
                column,
                index,
                num_tiles: sheet.num_tiles(),
            });
        }

        let mut slot = buffer.tile_slot(dest_row, column);
        match index {
            0 => slot.clear(sheet),
            n => blit_index(sheet, &mut slot, n as usize - 1),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pal_scheduler() -> RowScheduler {
        RowScheduler::new(16, 18, 4, 8)
    }

    #[test]
    fn test_trigger_at() {
        let scheduler = pal_scheduler();
        assert_eq!(scheduler.trigger_at(4), Some(Edge::Top));
        assert_eq!(scheduler.trigger_at(8), Some(Edge::Bottom));
        assert_eq!(scheduler.trigger_at(20), Some(Edge::Top));
        assert_eq!(scheduler.trigger_at(0), None);
        assert_eq!(scheduler.trigger_at(-12), Some(Edge::Top));
    }

    #[test]
    fn test_source_row_wraps_at_level_edges() {
        let scheduler = pal_scheduler();
        assert_eq!(scheduler.source_row(4, Direction::Down, 68), 17);
        assert_eq!(scheduler.source_row(824, Direction::Down, 68), 0);
        assert_eq!(scheduler.source_row(8, Direction::Up, 68), 67);
        assert_eq!(scheduler.source_row(40, Direction::Up, 68), 1);
    }

    #[test]
    fn test_dest_row_top_wraps_to_far_end() {
        let scheduler = pal_scheduler();
        assert_eq!(scheduler.dest_row(4, Edge::Top), 35);
        assert_eq!(scheduler.dest_row(20, Edge::Top), 0);
        assert_eq!(scheduler.dest_row(288 + 4, Edge::Top), 35);
    }

    #[test]
    fn test_dest_rows_are_one_half_apart() {
        let scheduler = pal_scheduler();
        for period in 0..18 {
            let top = scheduler.dest_row(period * 16 + 4, Edge::Top);
            let bottom = scheduler.dest_row(period * 16 + 8, Edge::Bottom);
            assert_eq!(top % 18, bottom % 18, "period {}", period);
            assert_ne!(top, bottom);
        }
    }

    #[test]
    fn test_plan_fires_on_both_sides_of_a_bound_trigger() {
        let scheduler = pal_scheduler();
        let down = ScrollMotion {
            from: 647,
            to: 648,
            direction: Direction::Down,
        };
        let up = ScrollMotion {
            from: 648,
            to: 647,
            direction: Direction::Up,
        };

        let arrive = scheduler.plan(&down, 68);
        let leave = scheduler.plan(&up, 68);
        assert_eq!(arrive.len(), 1);
        assert_eq!(leave.len(), 1);
        assert_eq!(arrive[0].dest_row, leave[0].dest_row);
        assert_eq!(arrive[0].source_row, 40 + 17);
        assert_eq!(leave[0].source_row, 39);
    }

    #[test]
    fn test_unreached_depends_on_period_offset() {
        let scheduler = pal_scheduler();

        let start = scheduler.unreached(0, 68);
        assert_eq!(start.len(), 2);
        assert!(start.iter().all(|b| b.source_row == 67));

        let between = scheduler.unreached(20, 68);
        assert_eq!(between.len(), 1);
        assert_eq!(between[0].edge, Edge::Bottom);
        assert_eq!(between[0].line, 24);
        assert_eq!(between[0].source_row, 0);
        assert_eq!(between[0].dest_row, 18);

        assert!(scheduler.unreached(30, 68).is_empty());
    }

    #[test]
    fn test_bottom_row_stays_inside_buffer() {
        let scheduler = pal_scheduler();
        for line in 0..576 {
            assert!(scheduler.dest_row(line, Edge::Bottom) < scheduler.total_rows());
        }
        assert_eq!(scheduler.dest_row(17 * 16 + 8, Edge::Bottom), 34);
    }
}
