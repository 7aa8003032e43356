// Frame sync - Paces the main loop on the display refresh
//
// A refresh counter reports the beam position as a monotonically increasing
// line count. `FrameSync` blocks until the count reaches the wait line of the
// next frame. Boundaries that have already passed by more than a frame are
// skipped and counted as dropped.

use crate::display::DisplayGeometry;
use log::warn;
use std::thread;
use std::time::{Duration, Instant};

/// Monotonic beam line counter
pub trait RefreshCounter {
    /// Lines elapsed since the counter started
    fn line_count(&self) -> u64;

    /// Block for roughly `lines` beam lines
    fn idle(&mut self, lines: u64);
}

/// Beam counter derived from wall-clock time
#[derive(Debug, Clone)]
pub struct VirtualBeam {
    start: Instant,
    line_duration: Duration,
}

impl VirtualBeam {
    /// Start a beam running at the line rate of `geometry`
    pub fn new(geometry: &DisplayGeometry) -> Self {
        Self {
            start: Instant::now(),
            line_duration: geometry.line_duration(),
        }
    }

    /// Duration of one beam line
    pub fn line_duration(&self) -> Duration {
        self.line_duration
    }
}

impl RefreshCounter for VirtualBeam {
    fn line_count(&self) -> u64 {
        let nanos = self.line_duration.as_nanos().max(1);
        (self.start.elapsed().as_nanos() / nanos) as u64
    }

    fn idle(&mut self, lines: u64) {
        thread::sleep(self.line_duration * lines.min(u32::MAX as u64) as u32);
    }
}

/// Waits for the refresh boundary of each frame
#[derive(Debug, Clone)]
pub struct FrameSync {
    wait_line: u64,
    lines_per_frame: u64,
    next_boundary: Option<u64>,
    frames: u64,
    dropped: u64,
}

impl FrameSync {
    /// Create a frame sync for the wait line of `geometry`
    pub fn new(geometry: &DisplayGeometry) -> Self {
        Self::with_timing(geometry.wait_line as u64, geometry.lines_per_frame as u64)
    }

    /// Create a frame sync from raw beam timing
    ///
    /// # Panics
    /// Panics if `wait_line` is not inside the frame
    pub fn with_timing(wait_line: u64, lines_per_frame: u64) -> Self {
        assert!(
            wait_line < lines_per_frame,
            "wait line {} outside a {}-line frame",
            wait_line,
            lines_per_frame
        );
        Self {
            wait_line,
            lines_per_frame,
            next_boundary: None,
            frames: 0,
            dropped: 0,
        }
    }

    /// Frames waited for so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Boundaries skipped because the loop ran late
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Line count of the next boundary, once known
    pub fn next_boundary(&self) -> Option<u64> {
        self.next_boundary
    }

    /// First boundary at or after `line`
    fn boundary_from(&self, line: u64) -> u64 {
        let boundary = (line / self.lines_per_frame) * self.lines_per_frame + self.wait_line;
        if boundary < line {
            boundary + self.lines_per_frame
        } else {
            boundary
        }
    }

    /// Block until the next refresh boundary
    ///
    /// # Returns
    /// The number of frames waited for, this one included
    pub fn wait<C: RefreshCounter + ?Sized>(&mut self, counter: &mut C) -> u64 {
        let mut now = counter.line_count();
        let target = self
            .next_boundary
            .unwrap_or_else(|| self.boundary_from(now));

        let reached = if now >= target {
            let skipped = (now - target) / self.lines_per_frame;
            if skipped > 0 {
                self.dropped += skipped;
                warn!(
                    "Frame sync ran {} frame(s) late at line {}",
                    skipped, now
                );
            }
            target + skipped * self.lines_per_frame
        } else {
            while now < target {
                counter.idle(target - now);
                now = counter.line_count();
            }
            target
        };

        self.next_boundary = Some(reached + self.lines_per_frame);
        self.frames += 1;
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayMode;

    /// Counter that moves only when idled or nudged
    struct SteppedCounter {
        line: u64,
        idled: u64,
    }

    impl RefreshCounter for SteppedCounter {
        fn line_count(&self) -> u64 {
            self.line
        }

        fn idle(&mut self, lines: u64) {
            self.line += lines;
            self.idled += lines;
        }
    }

    #[test]
    fn test_waits_for_pal_wait_line() {
        let mut sync = FrameSync::new(&DisplayMode::Pal.geometry());
        let mut counter = SteppedCounter { line: 0, idled: 0 };

        assert_eq!(sync.wait(&mut counter), 1);
        assert_eq!(counter.line, 303);

        assert_eq!(sync.wait(&mut counter), 2);
        assert_eq!(counter.line, 303 + 313);
        assert_eq!(sync.dropped(), 0);
    }

    #[test]
    fn test_first_wait_picks_next_frame_when_past_wait_line() {
        let mut sync = FrameSync::new(&DisplayMode::Ntsc.geometry());
        let mut counter = SteppedCounter { line: 270, idled: 0 };

        sync.wait(&mut counter);
        assert_eq!(counter.line, 263 + 262);
    }

    #[test]
    fn test_boundary_already_reached_does_not_block() {
        let mut sync = FrameSync::with_timing(10, 100);
        let mut counter = SteppedCounter { line: 0, idled: 0 };
        sync.wait(&mut counter);

        // Work took 150 lines: boundary 110 passed, but less than a frame ago
        counter.line += 150;
        counter.idled = 0;
        sync.wait(&mut counter);
        assert_eq!(counter.idled, 0);
        assert_eq!(sync.dropped(), 0);
        assert_eq!(sync.next_boundary(), Some(210));
    }

    #[test]
    fn test_late_frames_are_skipped() {
        let mut sync = FrameSync::with_timing(10, 100);
        let mut counter = SteppedCounter { line: 0, idled: 0 };
        sync.wait(&mut counter);

        // Stall past three more boundaries (110, 210, 310)
        counter.line = 345;
        sync.wait(&mut counter);
        assert_eq!(sync.dropped(), 2);
        assert_eq!(sync.next_boundary(), Some(410));

        sync.wait(&mut counter);
        assert_eq!(counter.line, 410);
        assert_eq!(sync.frames(), 3);
    }

    #[test]
    #[should_panic(expected = "outside a 100-line frame")]
    fn test_wait_line_outside_frame() {
        FrameSync::with_timing(100, 100);
    }

    #[test]
    fn test_virtual_beam_line_duration() {
        let beam = VirtualBeam::new(&DisplayMode::Pal.geometry());
        // 50 Hz × 313 lines
        assert_eq!(beam.line_duration().as_nanos(), 1_000_000_000 / 15650);
    }
}
