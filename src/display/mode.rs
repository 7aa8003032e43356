// Display modes - PAL and NTSC output timing

use crate::scroller::constants::{
    NTSC_LINES_PER_FRAME, NTSC_REFRESH_HZ, NTSC_VISIBLE_LINES, NTSC_WAIT_LINE,
    PAL_LINES_PER_FRAME, PAL_REFRESH_HZ, PAL_VISIBLE_LINES, PAL_WAIT_LINE, SCREEN_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output mode of the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// 50 Hz, 256 visible lines
    #[default]
    Pal,
    /// 60 Hz, 192 visible lines
    Ntsc,
}

impl DisplayMode {
    /// Timing and size of this mode
    pub fn geometry(self) -> DisplayGeometry {
        match self {
            DisplayMode::Pal => DisplayGeometry {
                mode: self,
                width: SCREEN_WIDTH,
                visible_lines: PAL_VISIBLE_LINES,
                wait_line: PAL_WAIT_LINE,
                lines_per_frame: PAL_LINES_PER_FRAME,
                refresh_hz: PAL_REFRESH_HZ,
            },
            DisplayMode::Ntsc => DisplayGeometry {
                mode: self,
                width: SCREEN_WIDTH,
                visible_lines: NTSC_VISIBLE_LINES,
                wait_line: NTSC_WAIT_LINE,
                lines_per_frame: NTSC_LINES_PER_FRAME,
                refresh_hz: NTSC_REFRESH_HZ,
            },
        }
    }
}

/// Result of configuring the output device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayGeometry {
    /// Mode this geometry belongs to
    pub mode: DisplayMode,
    /// Visible width in pixels
    pub width: usize,
    /// Visible lines
    pub visible_lines: usize,
    /// Beam line the frame sync waits for
    pub wait_line: u32,
    /// Beam lines per frame
    pub lines_per_frame: u32,
    /// Frames per second
    pub refresh_hz: u32,
}

impl DisplayGeometry {
    /// Duration of one frame
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.refresh_hz as u64)
    }

    /// Duration of one beam line
    pub fn line_duration(&self) -> Duration {
        Duration::from_nanos(
            1_000_000_000 / (self.refresh_hz as u64 * self.lines_per_frame as u64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pal_geometry() {
        let geometry = DisplayMode::Pal.geometry();
        assert_eq!(geometry.visible_lines, 256);
        assert_eq!(geometry.wait_line, 303);
        assert_eq!(geometry.frame_duration().as_micros(), 20000);
    }

    #[test]
    fn test_ntsc_geometry() {
        let geometry = DisplayMode::Ntsc.geometry();
        assert_eq!(geometry.visible_lines, 192);
        assert_eq!(geometry.wait_line, 262);
        assert_eq!(geometry.frame_duration().as_micros(), 16666);
        assert!(geometry.wait_line < geometry.lines_per_frame);
    }

    #[test]
    fn test_mode_from_toml_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: DisplayMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"ntsc\"").expect("parse mode");
        assert_eq!(parsed.mode, DisplayMode::Ntsc);
    }
}
