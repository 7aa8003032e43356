// Tile sheet - Bitplane tile graphics with a palette
//
// The sheet is an image made of `columns × rows` tiles. Pixel data is kept
// as bitplanes: one contiguous region per plane, `row_stride` bytes per line,
// most significant bit = leftmost pixel. This is the same layout the scroll
// buffer uses, so a tile blit is a straight byte copy per plane and line.

use super::AssetError;
use crate::display::Palette;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Tile graphics loaded from an indexed-color image
#[derive(Debug, Clone)]
pub struct TileSheet {
    tile_width: usize,
    tile_height: usize,
    /// Number of bitplanes (bits per pixel)
    depth: usize,
    /// Tiles per sheet row
    columns: usize,
    /// Tiles per sheet column
    rows: usize,
    /// Bytes per line of one plane
    row_stride: usize,
    /// Bytes per plane
    plane_size: usize,
    data: Vec<u8>,
    palette: Palette,
}

impl TileSheet {
    /// Build a tile sheet from one palette index per pixel
    ///
    /// # Arguments
    /// * `width`, `height` - Image size in pixels
    /// * `pixels` - Palette indices, row-major
    /// * `palette` - Sheet colors; its size determines the bit depth
    /// * `tile_width`, `tile_height` - Tile size in pixels
    pub fn from_indexed(
        width: usize,
        height: usize,
        pixels: &[u8],
        palette: Palette,
        tile_width: usize,
        tile_height: usize,
    ) -> Result<Self, AssetError> {
        if tile_width == 0 || tile_height == 0 || tile_width % 8 != 0 {
            return Err(AssetError::Format(format!(
                "tile size {}x{} is not supported (width must be a non-zero multiple of 8)",
                tile_width, tile_height
            )));
        }
        if width == 0 || height == 0 || width % tile_width != 0 || height % tile_height != 0 {
            return Err(AssetError::Format(format!(
                "sheet size {}x{} is not a whole number of {}x{} tiles",
                width, height, tile_width, tile_height
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            AssetError::Format(format!("sheet size {}x{} is too large", width, height))
        })?;
        if pixels.len() != expected {
            return Err(AssetError::Format(format!(
                "expected {} pixels, found {}",
                expected,
                pixels.len()
            )));
        }
        if palette.is_empty() || palette.len() > 256 {
            return Err(AssetError::Format(format!(
                "palette must hold 1-256 colors, found {}",
                palette.len()
            )));
        }
        if let Some(&bad) = pixels.iter().find(|&&p| p as usize >= palette.len()) {
            return Err(AssetError::Format(format!(
                "pixel uses color {} but the palette has {} colors",
                bad,
                palette.len()
            )));
        }

        let depth = depth_for_colors(palette.len());
        let row_stride = width / 8;
        let plane_size = row_stride * height;
        let mut data = vec![0u8; plane_size * depth];

        for (i, &index) in pixels.iter().enumerate() {
            let (x, y) = (i % width, i / width);
            let byte = y * row_stride + x / 8;
            let mask = 0x80 >> (x % 8);
            for plane in 0..depth {
                if index & (1 << plane) != 0 {
                    data[plane * plane_size + byte] |= mask;
                }
            }
        }

        Ok(Self {
            tile_width,
            tile_height,
            depth,
            columns: width / tile_width,
            rows: height / tile_height,
            row_stride,
            plane_size,
            data,
            palette,
        })
    }

    /// Load a tile sheet from an indexed-color PNG file
    ///
    /// # Arguments
    /// * `path` - Path to the PNG image
    /// * `tile_width`, `tile_height` - Tile size in pixels
    pub fn load<P: AsRef<Path>>(
        path: P,
        tile_width: usize,
        tile_height: usize,
    ) -> Result<Self, AssetError> {
        let file = File::open(path)?;
        let mut decoder = png::Decoder::new(BufReader::new(file));
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info()?;

        let info = reader.info();
        if info.color_type != png::ColorType::Indexed {
            return Err(AssetError::Format(format!(
                "tile sheet must be an indexed-color PNG, found {:?}",
                info.color_type
            )));
        }
        let width = info.width as usize;
        let height = info.height as usize;
        let bits = match info.bit_depth {
            png::BitDepth::One => 1,
            png::BitDepth::Two => 2,
            png::BitDepth::Four => 4,
            png::BitDepth::Eight => 8,
            other => {
                return Err(AssetError::Format(format!(
                    "unsupported indexed bit depth {:?}",
                    other
                )))
            }
        };
        let palette = info
            .palette
            .as_ref()
            .map(|p| Palette::from_rgb_triples(p))
            .ok_or_else(|| AssetError::Format("indexed PNG has no palette".to_string()))?;

        let line_size = (width * bits).div_ceil(8);
        let mut packed = vec![0u8; line_size * height];
        reader.next_frame(&mut packed)?;

        let pixels = unpack_indices(&packed, width, height, bits, line_size);
        Self::from_indexed(width, height, &pixels, palette, tile_width, tile_height)
    }

    /// Save the sheet as an 8-bit indexed-color PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), png::EncodingError> {
        let file = File::create(path)?;
        let w = BufWriter::new(file);

        let mut encoder = png::Encoder::new(w, self.width() as u32, self.height() as u32);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        let plte: Vec<u8> = (0..self.palette.len())
            .flat_map(|i| self.palette.rgb(i as u8))
            .collect();
        encoder.set_palette(plte);

        let mut pixels = Vec::with_capacity(self.width() * self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                pixels.push(self.pixel(x, y));
            }
        }

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        Ok(())
    }

    /// Tile width in pixels
    pub fn tile_width(&self) -> usize {
        self.tile_width
    }

    /// Tile height in pixels
    pub fn tile_height(&self) -> usize {
        self.tile_height
    }

    /// Bytes per line of a single tile in one plane
    pub fn tile_bytes(&self) -> usize {
        self.tile_width / 8
    }

    /// Number of bitplanes
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Tiles per sheet row
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Tiles per sheet column
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of tiles in the sheet
    pub fn num_tiles(&self) -> usize {
        self.columns * self.rows
    }

    /// Sheet width in pixels
    pub fn width(&self) -> usize {
        self.columns * self.tile_width
    }

    /// Sheet height in pixels
    pub fn height(&self) -> usize {
        self.rows * self.tile_height
    }

    /// Sheet palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Resolve a 0-based tile index to its `(column, row)` in the sheet
    #[inline]
    pub fn locate(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }

    /// Bytes for one line of one plane of a tile
    ///
    /// # Panics
    /// Panics if any coordinate is out of range
    #[inline]
    pub fn tile_line(&self, column: usize, row: usize, plane: usize, line: usize) -> &[u8] {
        assert!(column < self.columns, "tile column {} out of range", column);
        assert!(row < self.rows, "tile row {} out of range", row);
        assert!(plane < self.depth, "plane {} out of range", plane);
        assert!(line < self.tile_height, "tile line {} out of range", line);

        let start = plane * self.plane_size
            + (row * self.tile_height + line) * self.row_stride
            + column * self.tile_bytes();
        &self.data[start..start + self.tile_bytes()]
    }

    /// Palette index of a sheet pixel, reassembled from the bitplanes
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width(), "X coordinate {} out of bounds", x);
        assert!(y < self.height(), "Y coordinate {} out of bounds", y);

        let byte = y * self.row_stride + x / 8;
        let shift = 7 - (x % 8);
        (0..self.depth).fold(0u8, |acc, plane| {
            let bit = (self.data[plane * self.plane_size + byte] >> shift) & 1;
            acc | (bit << plane)
        })
    }
}

/// Bits per pixel needed to address `colors` palette entries (1-8)
fn depth_for_colors(colors: usize) -> usize {
    let max_index = colors.max(2) - 1;
    (usize::BITS - max_index.leading_zeros()) as usize
}

/// Expand packed sub-byte indices to one byte per pixel
fn unpack_indices(
    packed: &[u8],
    width: usize,
    height: usize,
    bits: usize,
    line_size: usize,
) -> Vec<u8> {
    if bits == 8 {
        return packed[..width * height].to_vec();
    }

    let mask = (1u8 << bits) - 1;
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        let line = &packed[y * line_size..(y + 1) * line_size];
        for x in 0..width {
            let bit_offset = x * bits;
            let shift = 8 - bits - (bit_offset % 8);
            pixels.push((line[bit_offset / 8] >> shift) & mask);
        }
    }
    pixels
}
