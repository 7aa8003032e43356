// Tile blit primitive
//
// Copies one tile from the sheet into a planar destination. The destination
// is described by a byte slice, the offset of the tile's top-left byte in
// plane 0, the line stride and the plane stride.

use crate::assets::TileSheet;

/// Destination of a single tile blit
pub struct TileSlot<'a> {
    bytes: &'a mut [u8],
    origin: usize,
    row_stride: usize,
    plane_stride: usize,
}

impl<'a> TileSlot<'a> {
    /// Describe a tile-sized region of a planar byte buffer
    ///
    /// # Arguments
    /// * `bytes` - Whole destination buffer
    /// * `origin` - Offset of the tile's first byte in plane 0
    /// * `row_stride` - Bytes between consecutive lines of a plane
    /// * `plane_stride` - Bytes between consecutive planes
    pub fn new(bytes: &'a mut [u8], origin: usize, row_stride: usize, plane_stride: usize) -> Self {
        Self {
            bytes,
            origin,
            row_stride,
            plane_stride,
        }
    }

    #[inline]
    fn line_start(&self, plane: usize, line: usize) -> usize {
        self.origin + plane * self.plane_stride + line * self.row_stride
    }

    /// Zero the tile-sized region for every plane the sheet uses
    pub fn clear(&mut self, sheet: &TileSheet) {
        let width = sheet.tile_bytes();
        for plane in 0..sheet.depth() {
            for line in 0..sheet.tile_height() {
                let start = self.line_start(plane, line);
                self.bytes[start..start + width].fill(0);
            }
        }
    }
}

/// Copy tile `(column, row)` of the sheet into `slot`
///
/// # Panics
/// Panics if the tile coordinate is outside the sheet. Callers resolve and
/// validate level indices before reaching this point.
pub fn blit_tile(sheet: &TileSheet, slot: &mut TileSlot<'_>, column: usize, row: usize) {
    assert!(
        column < sheet.columns(),
        "tile column {} out of range ({} columns)",
        column,
        sheet.columns()
    );
    assert!(
        row < sheet.rows(),
        "tile row {} out of range ({} rows)",
        row,
        sheet.rows()
    );

    for plane in 0..sheet.depth() {
        for line in 0..sheet.tile_height() {
            let src = sheet.tile_line(column, row, plane, line);
            let start = slot.line_start(plane, line);
            slot.bytes[start..start + src.len()].copy_from_slice(src);
        }
    }
}

/// Copy the tile with 0-based sheet index `index` into `slot`
#[inline]
pub fn blit_index(sheet: &TileSheet, slot: &mut TileSlot<'_>, index: usize) {
    let (column, row) = sheet.locate(index);
    blit_tile(sheet, slot, column, row);
}
