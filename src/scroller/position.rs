// Scroll position controller
//
// Moves the logical position by a signed step every tick and bounces between
// the two bounds. In `ClampMode::Reference` the bound check looks at the
// position left by the previous tick and runs before the increment, so a step
// that does not divide the scroll range can overshoot a bound for one tick.
// `ClampMode::Strict` increments first and clamps the result.

use serde::{Deserialize, Serialize};

/// Order of the bound check relative to the increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClampMode {
    /// Check the previous position, then increment
    #[default]
    Reference,
    /// Increment, then clamp the new position
    Strict,
}

/// Scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Position increasing: new rows enter at the bottom
    Down,
    /// Position decreasing: new rows enter at the top
    Up,
}

impl Direction {
    fn sign(self) -> i32 {
        match self {
            Direction::Down => 1,
            Direction::Up => -1,
        }
    }
}

/// Movement performed by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollMotion {
    /// Position before the tick, ahead of any clamping
    pub from: i32,
    /// Position after the tick
    pub to: i32,
    /// Direction the position moved in
    pub direction: Direction,
}

impl ScrollMotion {
    /// Lines crossed by this motion, lowest first
    ///
    /// Line `l` is crossed when the position passes between `l - 1` and `l`,
    /// in either direction. Moving down from 4 to 6 and moving up from 6 to 4
    /// both cross lines 5 and 6.
    pub fn reached_lines(&self) -> std::ops::Range<i32> {
        let low = self.from.min(self.to);
        let high = self.from.max(self.to);
        (low + 1)..(high + 1)
    }
}

/// Scroll state machine
#[derive(Debug, Clone)]
pub struct ScrollState {
    position: i32,
    step: i32,
    speed: i32,
    min_pos: i32,
    max_pos: i32,
    clamp_mode: ClampMode,
}

impl ScrollState {
    /// Create a scroll state at `min_pos`, scrolling down
    pub fn new(min_pos: i32, max_pos: i32, speed: i32, clamp_mode: ClampMode) -> Self {
        Self {
            position: min_pos,
            step: speed,
            speed,
            min_pos,
            max_pos,
            clamp_mode,
        }
    }

    /// Current logical position in lines
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Signed step applied by the next increment
    pub fn step(&self) -> i32 {
        self.step
    }

    /// Current direction
    pub fn direction(&self) -> Direction {
        if self.step >= 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Step magnitude
    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Lower bound
    pub fn min_pos(&self) -> i32 {
        self.min_pos
    }

    /// Upper bound
    pub fn max_pos(&self) -> i32 {
        self.max_pos
    }

    /// Bound check order
    pub fn clamp_mode(&self) -> ClampMode {
        self.clamp_mode
    }

    /// Place the scroll at `position` moving in `direction`
    ///
    /// No clamping happens here; the next tick applies the bounds.
    pub fn jump_to(&mut self, position: i32, direction: Direction) {
        self.position = position;
        self.step = direction.sign() * self.speed;
    }

    /// Apply the bounds: clamp the position and force the direction away
    /// from the bound it reached
    pub fn clamp(&mut self) {
        if self.position <= self.min_pos {
            self.position = self.min_pos;
            self.step = self.speed;
        } else if self.position >= self.max_pos {
            self.position = self.max_pos;
            self.step = -self.speed;
        }
    }

    /// Move the position by one step
    pub fn advance(&mut self) {
        self.position += self.step;
    }

    /// Run one tick of the controller
    ///
    /// The motion spans the whole move, clamp jump included, so a reversal
    /// hands back the lines the clamp skipped.
    pub fn tick(&mut self) -> ScrollMotion {
        let from = self.position;
        match self.clamp_mode {
            ClampMode::Reference => {
                self.clamp();
                self.advance();
            }
            ClampMode::Strict => {
                self.advance();
                self.clamp();
            }
        }

        let direction = if self.position < from {
            Direction::Up
        } else {
            Direction::Down
        };
        ScrollMotion {
            from,
            to: self.position,
            direction,
        }
    }
}
