// Color palette - RGB conversions for tile sheet colors
//
// A tile sheet carries its own palette of up to 256 colors. Each pixel in the
// bitplane buffer is a palette index assembled from one bit per plane.
//
// Colors are stored as 32-bit 0xRRGGBB values and expanded to RGBA for the
// pixels crate.

/// Palette attached to a tile sheet
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<u32>,
}

impl Palette {
    /// Create a palette from 0xRRGGBB colors
    pub fn new(colors: Vec<u32>) -> Self {
        Self { colors }
    }

    /// Create a palette from packed RGB triples (as found in a PNG `PLTE` chunk)
    ///
    /// Trailing bytes that do not form a full triple are ignored.
    pub fn from_rgb_triples(bytes: &[u8]) -> Self {
        let colors = bytes
            .chunks_exact(3)
            .map(|c| ((c[0] as u32) << 16) | ((c[1] as u32) << 8) | c[2] as u32)
            .collect();
        Self { colors }
    }

    /// Create a palette from 12-bit 0x0RGB colors
    ///
    /// Each 4-bit channel is widened by repeating the nibble, so 0xF becomes 0xFF.
    pub fn from_rgb4(colors: &[u16]) -> Self {
        let widen = |nibble: u16| -> u32 { (nibble as u32 & 0xF) * 0x11 };
        let colors = colors
            .iter()
            .map(|&c| (widen(c >> 8) << 16) | (widen(c >> 4) << 8) | widen(c))
            .collect();
        Self { colors }
    }

    /// Number of colors in the palette
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get a color by index
    pub fn get(&self, index: u8) -> Option<u32> {
        self.colors.get(index as usize).copied()
    }

    /// All colors in palette order
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    /// Convert a palette index to RGBA bytes
    ///
    /// Indices past the end of the palette render as opaque black.
    #[inline]
    pub fn rgba(&self, index: u8) -> [u8; 4] {
        rgb_to_rgba(self.get(index).unwrap_or(0))
    }

    /// Convert a palette index to RGB bytes
    #[inline]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        let [r, g, b, _] = self.rgba(index);
        [r, g, b]
    }
}

/// Convert RGB color to RGBA format expected by pixels crate
///
/// # Arguments
/// * `rgb` - 32-bit RGB color (0xRRGGBB)
///
/// # Returns
/// Array of [R, G, B, A] bytes
#[inline]
pub fn rgb_to_rgba(rgb: u32) -> [u8; 4] {
    [
        ((rgb >> 16) & 0xFF) as u8, // Red
        ((rgb >> 8) & 0xFF) as u8,  // Green
        (rgb & 0xFF) as u8,         // Blue
        0xFF,                       // Alpha (fully opaque)
    ]
}
