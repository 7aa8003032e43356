// Screen - Software output device
//
// Stores one palette index per visible pixel. Each frame is scanned out of
// the scroll buffer through the plane addresses published by the scroller,
// reading `visible_lines` lines of every plane in one linear run.

use super::device::{DeviceError, OutputDevice};
use super::mode::{DisplayGeometry, DisplayMode};
use super::palette::Palette;
use crate::scroller::PlanarBuffer;
use log::{debug, info};

/// Software display fed by the scroll buffer
#[derive(Debug, Default)]
pub struct Screen {
    geometry: Option<DisplayGeometry>,
    palette: Palette,
    /// Read address of each plane, as last published
    plane_addresses: Vec<usize>,
    /// Pixel data stored as palette indices
    pixels: Vec<u8>,
    committed: bool,
}

impl Screen {
    /// Create an unconfigured screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Geometry set by `configure`
    pub fn geometry(&self) -> Option<&DisplayGeometry> {
        self.geometry.as_ref()
    }

    /// Width in pixels (0 until configured)
    pub fn width(&self) -> usize {
        self.geometry.map_or(0, |g| g.width)
    }

    /// Height in pixels (0 until configured)
    pub fn height(&self) -> usize {
        self.geometry.map_or(0, |g| g.visible_lines)
    }

    /// Whether the output is committed
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Active palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Last published address of every plane
    pub fn plane_addresses(&self) -> &[usize] {
        &self.plane_addresses
    }

    /// Set a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, palette_index: u8) {
        assert!(x < self.width(), "X coordinate {} out of bounds", x);
        assert!(y < self.height(), "Y coordinate {} out of bounds", y);

        let width = self.width();
        self.pixels[y * width + x] = palette_index;
    }

    /// Get the palette index of a pixel
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width(), "X coordinate {} out of bounds", x);
        assert!(y < self.height(), "Y coordinate {} out of bounds", y);

        self.pixels[y * self.width() + x]
    }

    /// Fill the screen with one palette index
    pub fn clear(&mut self, palette_index: u8) {
        self.pixels.fill(palette_index);
    }

    /// Raw pixel data as palette indices
    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    /// Rebuild the visible image from the scroll buffer
    ///
    /// Every pixel is assembled from one bit per plane, read at the published
    /// plane addresses.
    ///
    /// # Panics
    /// Panics if a published address leaves less than one window of data
    pub fn scan_out(&mut self, buffer: &PlanarBuffer) -> Result<(), DeviceError> {
        let geometry = self.geometry.ok_or(DeviceError::NotConfigured)?;
        let stride = buffer.row_stride();
        let window = stride * geometry.visible_lines;
        let data = buffer.as_slice();

        self.pixels.fill(0);
        for (plane, &address) in self.plane_addresses.iter().enumerate() {
            assert!(
                address + window <= data.len(),
                "plane {} address {} leaves less than one window",
                plane,
                address
            );
            let bytes = &data[address..address + window];
            for (i, &byte) in bytes.iter().enumerate() {
                if byte == 0 {
                    continue;
                }
                let (y, byte_column) = (i / stride, i % stride);
                let row = &mut self.pixels[y * geometry.width + byte_column * 8..][..8];
                for (bit, pixel) in row.iter_mut().enumerate() {
                    if byte & (0x80 >> bit) != 0 {
                        *pixel |= 1 << plane;
                    }
                }
            }
        }
        Ok(())
    }

    /// Convert the screen to RGBA format for display
    ///
    /// # Panics
    /// Panics if output buffer is too small
    pub fn to_rgba(&self, output: &mut [u8]) {
        assert!(
            output.len() >= self.pixels.len() * 4,
            "Output buffer too small for RGBA conversion"
        );

        for (pixel, out) in self.pixels.iter().zip(output.chunks_exact_mut(4)) {
            out.copy_from_slice(&self.palette.rgba(*pixel));
        }
    }

    /// Convert the screen to packed RGB bytes
    pub fn to_rgb(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&pixel| self.palette.rgb(pixel))
            .collect()
    }
}

impl OutputDevice for Screen {
    fn configure(&mut self, mode: DisplayMode) -> Result<DisplayGeometry, DeviceError> {
        let geometry = mode.geometry();
        self.pixels = vec![0; geometry.width * geometry.visible_lines];
        self.plane_addresses.clear();
        self.geometry = Some(geometry);
        info!(
            "Screen configured for {:?}: {}x{} at {} Hz",
            mode, geometry.width, geometry.visible_lines, geometry.refresh_hz
        );
        Ok(geometry)
    }

    fn commit(&mut self, palette: &Palette) -> Result<(), DeviceError> {
        if self.geometry.is_none() {
            return Err(DeviceError::NotConfigured);
        }
        self.palette = palette.clone();
        self.committed = true;
        debug!("Screen committed with {} colors", palette.len());
        Ok(())
    }

    fn publish_plane_address(&mut self, plane: usize, address: usize) {
        if plane >= self.plane_addresses.len() {
            self.plane_addresses.resize(plane + 1, 0);
        }
        self.plane_addresses[plane] = address;
    }

    fn reset(&mut self) {
        self.committed = false;
        self.plane_addresses.clear();
        self.clear(0);
        debug!("Screen released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroller::BufferGeometry;

    fn configured() -> Screen {
        let mut screen = Screen::new();
        screen.configure(DisplayMode::Ntsc).expect("configure");
        screen
    }

    #[test]
    fn test_configure_sizes_screen() {
        let screen = configured();
        assert_eq!(screen.width(), 320);
        assert_eq!(screen.height(), 192);
        assert_eq!(screen.as_slice().len(), 320 * 192);
    }

    #[test]
    fn test_commit_needs_configure() {
        let mut screen = Screen::new();
        let result = screen.commit(&Palette::new(vec![0]));
        assert!(matches!(result, Err(DeviceError::NotConfigured)));
    }

    #[test]
    fn test_set_get_pixel() {
        let mut screen = configured();
        screen.set_pixel(100, 100, 7);
        assert_eq!(screen.get_pixel(100, 100), 7);
        screen.clear(3);
        assert_eq!(screen.get_pixel(319, 191), 3);
    }

    #[test]
    #[should_panic(expected = "Y coordinate 192 out of bounds")]
    fn test_get_pixel_out_of_bounds() {
        let screen = configured();
        screen.get_pixel(0, 192);
    }

    #[test]
    fn test_scan_out_reads_published_addresses() {
        let mut screen = configured();
        let mut buffer = PlanarBuffer::new(BufferGeometry {
            width: 320,
            tile_width: 16,
            tile_height: 16,
            rows_per_half: 14,
            planes: 2,
        });

        // Mark line 20 of plane 1 through a tile slot, then read from line 20
        let sheet = {
            let pixels = vec![2u8; 16 * 16];
            let palette = Palette::new(vec![0, 1, 2, 3]);
            crate::assets::TileSheet::from_indexed(16, 16, &pixels, palette, 16, 16)
                .expect("valid sheet")
        };
        let mut slot = buffer.tile_slot(1, 0);
        crate::scroller::blit::blit_tile(&sheet, &mut slot, 0, 0);

        for plane in 0..2 {
            screen.publish_plane_address(plane, buffer.plane_address(plane, 20));
        }
        screen.scan_out(&buffer).expect("scan out");

        // Buffer lines 20..32 hold the tile, shown on screen lines 0..12
        assert_eq!(screen.get_pixel(0, 0), 2);
        assert_eq!(screen.get_pixel(15, 11), 2);
        assert_eq!(screen.get_pixel(16, 0), 0);
        assert_eq!(screen.get_pixel(0, 12), 0);
    }

    #[test]
    fn test_to_rgba_uses_palette() {
        let mut screen = configured();
        screen
            .commit(&Palette::new(vec![0x000000, 0x336699]))
            .expect("commit");
        screen.set_pixel(0, 0, 1);

        let mut rgba = vec![0u8; 320 * 192 * 4];
        screen.to_rgba(&mut rgba);
        assert_eq!(&rgba[..4], &[0x33, 0x66, 0x99, 0xFF]);
        assert_eq!(&rgba[4..8], &[0x00, 0x00, 0x00, 0xFF]);
        assert_eq!(&screen.to_rgb()[..3], &[0x33, 0x66, 0x99]);
    }

    #[test]
    fn test_reset_releases_output() {
        let mut screen = configured();
        screen.commit(&Palette::new(vec![0])).expect("commit");
        screen.publish_plane_address(0, 40);
        screen.reset();
        assert!(!screen.is_committed());
        assert!(screen.plane_addresses().is_empty());
    }
}
