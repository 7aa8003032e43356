// Circular frame buffer - Two stacked copies of the visible window
//
// The buffer holds `2 × rows_per_half` tile rows. Each bitplane is a separate
// contiguous region of `row_stride × total_lines` bytes. Both halves carry the
// same tile rows, so the display can always read `visible_lines` lines in one
// linear run starting at `position mod half_lines` without wrapping.

use super::blit::TileSlot;

/// Size parameters of the circular buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferGeometry {
    /// Display width in pixels (multiple of 8)
    pub width: usize,
    /// Tile width in pixels (multiple of 8)
    pub tile_width: usize,
    /// Tile height in pixels
    pub tile_height: usize,
    /// Tile rows in each half of the buffer
    pub rows_per_half: usize,
    /// Number of bitplanes
    pub planes: usize,
}

/// Planar double-height scroll buffer
#[derive(Debug, Clone)]
pub struct PlanarBuffer {
    geometry: BufferGeometry,
    row_stride: usize,
    plane_size: usize,
    data: Vec<u8>,
}

impl PlanarBuffer {
    /// Allocate a zeroed buffer
    pub fn new(geometry: BufferGeometry) -> Self {
        let row_stride = geometry.width / 8;
        let plane_size = row_stride * geometry.rows_per_half * 2 * geometry.tile_height;
        Self {
            geometry,
            row_stride,
            plane_size,
            data: vec![0; plane_size * geometry.planes],
        }
    }

    /// Buffer geometry
    pub fn geometry(&self) -> &BufferGeometry {
        &self.geometry
    }

    /// Bytes per line of one plane
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Bytes per plane
    pub fn plane_size(&self) -> usize {
        self.plane_size
    }

    /// Number of bitplanes
    pub fn planes(&self) -> usize {
        self.geometry.planes
    }

    /// Tile columns across the display width
    pub fn columns(&self) -> usize {
        self.geometry.width / self.geometry.tile_width
    }

    /// Tile rows in each half
    pub fn rows_per_half(&self) -> usize {
        self.geometry.rows_per_half
    }

    /// Tile rows in the whole buffer
    pub fn total_rows(&self) -> usize {
        self.geometry.rows_per_half * 2
    }

    /// Lines in each half
    pub fn half_lines(&self) -> usize {
        self.geometry.rows_per_half * self.geometry.tile_height
    }

    /// Lines in the whole buffer
    pub fn total_lines(&self) -> usize {
        self.half_lines() * 2
    }

    /// Byte offset of `(line, plane, byte_column)`
    ///
    /// # Panics
    /// Panics if any coordinate is out of range
    #[inline]
    pub fn offset(&self, line: usize, plane: usize, byte_column: usize) -> usize {
        assert!(line < self.total_lines(), "line {} out of bounds", line);
        assert!(plane < self.planes(), "plane {} out of bounds", plane);
        assert!(
            byte_column < self.row_stride,
            "byte column {} out of bounds",
            byte_column
        );
        plane * self.plane_size + line * self.row_stride + byte_column
    }

    /// Byte offset of the first line of tile row `buffer_row` in `plane`
    pub fn row_address(&self, buffer_row: usize, plane: usize) -> usize {
        self.offset(buffer_row * self.geometry.tile_height, plane, 0)
    }

    /// First displayed line for a logical scroll position
    #[inline]
    pub fn display_offset(&self, position: i32) -> usize {
        position.rem_euclid(self.half_lines() as i32) as usize
    }

    /// Byte offset the display reads `plane` from at `position`
    pub fn plane_address(&self, plane: usize, position: i32) -> usize {
        self.offset(self.display_offset(position), plane, 0)
    }

    /// Writable tile slot at `(buffer_row, column)`
    pub fn tile_slot(&mut self, buffer_row: usize, column: usize) -> TileSlot<'_> {
        assert!(
            buffer_row < self.total_rows(),
            "buffer row {} out of bounds",
            buffer_row
        );
        assert!(column < self.columns(), "column {} out of bounds", column);

        let tile_bytes = self.geometry.tile_width / 8;
        let origin = self.offset(
            buffer_row * self.geometry.tile_height,
            0,
            column * tile_bytes,
        );
        TileSlot::new(&mut self.data, origin, self.row_stride, self.plane_size)
    }

    /// Bytes of one plane of one tile row
    pub fn row_plane(&self, buffer_row: usize, plane: usize) -> &[u8] {
        let start = self.row_address(buffer_row, plane);
        &self.data[start..start + self.row_stride * self.geometry.tile_height]
    }

    /// The linear run of `lines` lines the display reads for `plane` at `position`
    ///
    /// # Panics
    /// Panics if the run would pass the end of the buffer
    pub fn plane_window(&self, plane: usize, position: i32, lines: usize) -> &[u8] {
        let offset = self.display_offset(position);
        assert!(
            offset + lines <= self.total_lines(),
            "window of {} lines at line {} passes the end of the buffer",
            lines,
            offset
        );
        let start = self.offset(offset, plane, 0);
        &self.data[start..start + lines * self.row_stride]
    }

    /// Raw buffer contents
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
