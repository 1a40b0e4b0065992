//! Primitive event-line construction
//!
//! Pure formatting and geometry: gesture parameters in, injector event
//! lines out. The line grammar is the compatibility surface with the
//! on-device injector and must match it token for token:
//!
//! ```text
//! drag <x1> <y1> <x2> <y2> <steps> <duration_ms>
//! sleep <ms>
//! tap <x> <y> <times> <pressure>
//! pinch <t1x1> <t1y1> <t1x2> <t1y2> <t2x1> <t2y1> <t2x2> <t2y2> <steps> <duration_ms>
//! keydown <code>
//! keyup <code>
//! ```

use std::fmt;

use crate::config::{ScreenDimensions, SwipePadding};

/// Fixed pressure field appended to every tap line
pub const TAP_PRESSURE: i64 = 100;

/// A single formatted instruction for the on-device injector.
///
/// Immutable once built; a gesture expands to an ordered sequence of
/// these, replayed in order on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLine(String);

impl EventLine {
    /// The line text, without terminator
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Vertical scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Content scrolls up (finger drags top to bottom)
    Up,
    /// Content scrolls down (finger drags bottom to top)
    Down,
}

/// Horizontal swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger travels right to left
    Left,
    /// Finger travels left to right
    Right,
}

/// Build a drag line. The injector reads the step count before the
/// duration, the reverse of the argument order here.
pub fn drag(x1: i64, y1: i64, x2: i64, y2: i64, duration_ms: i64, steps: i64) -> EventLine {
    EventLine(format!("drag {x1} {y1} {x2} {y2} {steps} {duration_ms}"))
}

/// Build a sleep line. Seconds are converted to whole milliseconds by
/// truncation.
pub fn sleep(duration_secs: f64) -> EventLine {
    EventLine(format!("sleep {}", (duration_secs * 1000.0) as i64))
}

/// Build a tap line with the fixed trailing pressure value.
pub fn tap(x: i64, y: i64, times: i64) -> EventLine {
    EventLine(format!("tap {x} {y} {times} {TAP_PRESSURE}"))
}

/// Build a pinch line: two simultaneous two-point drag paths.
#[allow(clippy::too_many_arguments)]
pub fn pinch(
    touch1_x1: i64,
    touch1_y1: i64,
    touch1_x2: i64,
    touch1_y2: i64,
    touch2_x1: i64,
    touch2_y1: i64,
    touch2_x2: i64,
    touch2_y2: i64,
    steps: i64,
    duration_ms: i64,
) -> EventLine {
    EventLine(format!(
        "pinch {touch1_x1} {touch1_y1} {touch1_x2} {touch1_y2} \
         {touch2_x1} {touch2_y1} {touch2_x2} {touch2_y2} {steps} {duration_ms}"
    ))
}

/// Build a keydown line. The key code is passed through unmodified.
pub fn key_down(code: &str) -> EventLine {
    EventLine(format!("keydown {code}"))
}

/// Build a keyup line. The key code is passed through unmodified.
pub fn key_up(code: &str) -> EventLine {
    EventLine(format!("keyup {code}"))
}

/// Vertical scroll: `times` identical drags along the horizontal center
/// line, between `padding[0]` from the top and `padding[3]` from the
/// bottom. The default orientation drags bottom to top, which scrolls
/// content down; `Up` swaps start and end.
pub fn scroll(
    direction: ScrollDirection,
    dims: &ScreenDimensions,
    padding: &SwipePadding,
    times: i64,
    steps: i64,
    duration_ms: i64,
) -> Vec<EventLine> {
    let x = dims.width / 2;
    let y_bottom = dims.height - padding.get(3);
    let y_top = padding.get(0);

    let (start, end) = match direction {
        ScrollDirection::Down => ((x, y_bottom), (x, y_top)),
        ScrollDirection::Up => ((x, y_top), (x, y_bottom)),
    };

    (0..times.max(0))
        .map(|_| drag(start.0, start.1, end.0, end.1, duration_ms, steps))
        .collect()
}

/// Horizontal swipe: `times` identical drags along the vertical center
/// line, between `padding[2]` from the left and `padding[0]` from the
/// right. `Left` swaps start and end.
///
/// The padding indices differ from the scroll axis ([0]/[3] vertical,
/// [2]/[0] horizontal); the layout is calibration data carried as-is
/// from the device profile.
pub fn swipe(
    direction: SwipeDirection,
    dims: &ScreenDimensions,
    padding: &SwipePadding,
    times: i64,
    steps: i64,
    duration_ms: i64,
) -> Vec<EventLine> {
    let y = dims.height / 2;
    let (near, far) = (padding.get(2), dims.width - padding.get(0));

    let (x1, x2) = match direction {
        SwipeDirection::Right => (near, far),
        SwipeDirection::Left => (far, near),
    };

    (0..times.max(0))
        .map(|_| drag(x1, y, x2, y, duration_ms, steps))
        .collect()
}
