//! Gesture command model and dispatch
//!
//! Parses one input line's command name and positional arguments into a
//! typed [`GestureCommand`], then expands it into injector event lines.
//! Arity and numeric validation happen here, once, instead of surfacing
//! as formatting failures later.

use crate::config::{ScreenDimensions, SwipePadding};

use super::error::{GestureError, Result};
use super::events::{self, EventLine, ScrollDirection, SwipeDirection};

const DEFAULT_DRAG_DURATION_MS: i64 = 1000;
const DEFAULT_DRAG_STEPS: i64 = 5;
const DEFAULT_TAP_TIMES: i64 = 1;
// Shared by scroll and swipe
const DEFAULT_SWEEP_TIMES: i64 = 1;
const DEFAULT_SWEEP_STEPS: i64 = 10;
const DEFAULT_SWEEP_DURATION_MS: i64 = 100;
const DEFAULT_PINCH_STEPS: i64 = 10;
const DEFAULT_PINCH_DURATION_MS: i64 = 1000;
const DEFAULT_SLEEP_SECS: f64 = 1.0;

/// Repetition parameters shared by the scroll and swipe commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepParams {
    /// Number of identical drag lines to emit
    pub times: i64,
    /// Step count per drag
    pub steps: i64,
    /// Duration per drag in milliseconds
    pub duration_ms: i64,
}

impl SweepParams {
    fn parse(command: &'static str, args: &[&str]) -> Result<Self> {
        let mut cursor = ArgCursor::new(command, args);
        let params = Self {
            times: cursor.optional_int("times", DEFAULT_SWEEP_TIMES)?,
            steps: cursor.optional_int("steps", DEFAULT_SWEEP_STEPS)?,
            duration_ms: cursor.optional_int("duration", DEFAULT_SWEEP_DURATION_MS)?,
        };
        cursor.finish()?;
        Ok(params)
    }
}

/// Parameters of an explicit drag command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragParams {
    /// Start x
    pub x1: i64,
    /// Start y
    pub y1: i64,
    /// End x
    pub x2: i64,
    /// End y
    pub y2: i64,
    /// Drag duration in milliseconds
    pub duration_ms: i64,
    /// Number of interpolation steps
    pub steps: i64,
}

/// Parameters of a pinch command: two touch paths moved simultaneously,
/// each from its (x1, y1) to its (x2, y2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinchParams {
    pub touch1_x1: i64,
    pub touch1_y1: i64,
    pub touch1_x2: i64,
    pub touch1_y2: i64,
    pub touch2_x1: i64,
    pub touch2_y1: i64,
    pub touch2_x2: i64,
    pub touch2_y2: i64,
    pub steps: i64,
    pub duration_ms: i64,
}

/// A parsed input-line command.
///
/// Created per incoming line, consumed immediately, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureCommand {
    /// `scroll_down [times] [steps] [duration]`
    ScrollDown(SweepParams),
    /// `scroll_up [times] [steps] [duration]`
    ScrollUp(SweepParams),
    /// `swipe_left [times] [steps] [duration]`
    SwipeLeft(SweepParams),
    /// `swipe_right [times] [steps] [duration]`
    SwipeRight(SweepParams),
    /// `drag x1 y1 x2 y2 [duration] [steps]`
    Drag(DragParams),
    /// `tap x y [times]`
    Tap {
        /// Tap x
        x: i64,
        /// Tap y
        y: i64,
        /// Repeat count
        times: i64,
    },
    /// `double_tap x y`
    DoubleTap {
        /// Tap x
        x: i64,
        /// Tap y
        y: i64,
    },
    /// `pinch` with eight coordinates plus optional steps and duration
    Pinch(PinchParams),
    /// `keydown code`
    KeyDown {
        /// Key code, passed through unmodified
        code: String,
    },
    /// `keyup code`
    KeyUp {
        /// Key code, passed through unmodified
        code: String,
    },
    /// `sleep [duration]` in seconds
    Sleep {
        /// Sleep duration in seconds
        duration_secs: f64,
    },
}

impl GestureCommand {
    /// Parse a command name and its positional argument tokens.
    pub fn parse(command: &str, args: &[&str]) -> Result<Self> {
        match command {
            "scroll_down" => Ok(Self::ScrollDown(SweepParams::parse("scroll_down", args)?)),
            "scroll_up" => Ok(Self::ScrollUp(SweepParams::parse("scroll_up", args)?)),
            "swipe_left" => Ok(Self::SwipeLeft(SweepParams::parse("swipe_left", args)?)),
            "swipe_right" => Ok(Self::SwipeRight(SweepParams::parse("swipe_right", args)?)),
            "drag" => {
                let mut cursor = ArgCursor::new("drag", args);
                let params = DragParams {
                    x1: cursor.required_int("x1")?,
                    y1: cursor.required_int("y1")?,
                    x2: cursor.required_int("x2")?,
                    y2: cursor.required_int("y2")?,
                    duration_ms: cursor.optional_int("duration", DEFAULT_DRAG_DURATION_MS)?,
                    steps: cursor.optional_int("steps", DEFAULT_DRAG_STEPS)?,
                };
                cursor.finish()?;
                Ok(Self::Drag(params))
            }
            "tap" => {
                let mut cursor = ArgCursor::new("tap", args);
                let tap = Self::Tap {
                    x: cursor.required_int("x")?,
                    y: cursor.required_int("y")?,
                    times: cursor.optional_int("times", DEFAULT_TAP_TIMES)?,
                };
                cursor.finish()?;
                Ok(tap)
            }
            "double_tap" => {
                let mut cursor = ArgCursor::new("double_tap", args);
                let tap = Self::DoubleTap {
                    x: cursor.required_int("x")?,
                    y: cursor.required_int("y")?,
                };
                cursor.finish()?;
                Ok(tap)
            }
            "pinch" => {
                let mut cursor = ArgCursor::new("pinch", args);
                let params = PinchParams {
                    touch1_x1: cursor.required_int("touch1_x1")?,
                    touch1_y1: cursor.required_int("touch1_y1")?,
                    touch1_x2: cursor.required_int("touch1_x2")?,
                    touch1_y2: cursor.required_int("touch1_y2")?,
                    touch2_x1: cursor.required_int("touch2_x1")?,
                    touch2_y1: cursor.required_int("touch2_y1")?,
                    touch2_x2: cursor.required_int("touch2_x2")?,
                    touch2_y2: cursor.required_int("touch2_y2")?,
                    steps: cursor.optional_int("steps", DEFAULT_PINCH_STEPS)?,
                    duration_ms: cursor.optional_int("duration", DEFAULT_PINCH_DURATION_MS)?,
                };
                cursor.finish()?;
                Ok(Self::Pinch(params))
            }
            "keydown" => {
                let mut cursor = ArgCursor::new("keydown", args);
                let code = cursor.required_token("code")?.to_string();
                cursor.finish()?;
                Ok(Self::KeyDown { code })
            }
            "keyup" => {
                let mut cursor = ArgCursor::new("keyup", args);
                let code = cursor.required_token("code")?.to_string();
                cursor.finish()?;
                Ok(Self::KeyUp { code })
            }
            "sleep" => {
                let mut cursor = ArgCursor::new("sleep", args);
                let duration_secs = cursor.optional_float("duration", DEFAULT_SLEEP_SECS)?;
                cursor.finish()?;
                Ok(Self::Sleep { duration_secs })
            }
            other => Err(GestureError::UnknownCommand(other.to_string())),
        }
    }

    /// Expand into the ordered event lines the injector will replay.
    pub fn expand(&self, dims: &ScreenDimensions, padding: &SwipePadding) -> Vec<EventLine> {
        match self {
            Self::ScrollDown(p) => events::scroll(
                ScrollDirection::Down,
                dims,
                padding,
                p.times,
                p.steps,
                p.duration_ms,
            ),
            Self::ScrollUp(p) => events::scroll(
                ScrollDirection::Up,
                dims,
                padding,
                p.times,
                p.steps,
                p.duration_ms,
            ),
            Self::SwipeLeft(p) => events::swipe(
                SwipeDirection::Left,
                dims,
                padding,
                p.times,
                p.steps,
                p.duration_ms,
            ),
            Self::SwipeRight(p) => events::swipe(
                SwipeDirection::Right,
                dims,
                padding,
                p.times,
                p.steps,
                p.duration_ms,
            ),
            Self::Drag(p) => vec![events::drag(p.x1, p.y1, p.x2, p.y2, p.duration_ms, p.steps)],
            Self::Tap { x, y, times } => vec![events::tap(*x, *y, *times)],
            Self::DoubleTap { x, y } => vec![events::tap(*x, *y, 2)],
            Self::Pinch(p) => vec![events::pinch(
                p.touch1_x1,
                p.touch1_y1,
                p.touch1_x2,
                p.touch1_y2,
                p.touch2_x1,
                p.touch2_y1,
                p.touch2_x2,
                p.touch2_y2,
                p.steps,
                p.duration_ms,
            )],
            Self::KeyDown { code } => vec![events::key_down(code)],
            Self::KeyUp { code } => vec![events::key_up(code)],
            Self::Sleep { duration_secs } => vec![events::sleep(*duration_secs)],
        }
    }
}

/// Positional argument reader for one command's token list.
struct ArgCursor<'a> {
    command: &'static str,
    tokens: &'a [&'a str],
    index: usize,
}

impl<'a> ArgCursor<'a> {
    fn new(command: &'static str, tokens: &'a [&'a str]) -> Self {
        Self {
            command,
            tokens,
            index: 0,
        }
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.index).copied();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn required_token(&mut self, name: &'static str) -> Result<&'a str> {
        self.next().ok_or(GestureError::MissingArgument {
            command: self.command,
            name,
        })
    }

    fn required_int(&mut self, name: &'static str) -> Result<i64> {
        let token = self.required_token(name)?;
        parse_int(self.command, name, token)
    }

    fn optional_int(&mut self, name: &'static str, default: i64) -> Result<i64> {
        match self.next() {
            Some(token) => parse_int(self.command, name, token),
            None => Ok(default),
        }
    }

    fn optional_float(&mut self, name: &'static str, default: f64) -> Result<f64> {
        match self.next() {
            Some(token) => parse_float(self.command, name, token),
            None => Ok(default),
        }
    }

    fn finish(self) -> Result<()> {
        match self.tokens.get(self.index) {
            Some(token) => Err(GestureError::UnexpectedArgument {
                command: self.command,
                token: (*token).to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn parse_float(command: &'static str, name: &'static str, token: &str) -> Result<f64> {
    let value: f64 = token.parse().map_err(|_| GestureError::InvalidArgument {
        command,
        name,
        token: token.to_string(),
    })?;
    if !value.is_finite() {
        return Err(GestureError::InvalidArgument {
            command,
            name,
            token: token.to_string(),
        });
    }
    Ok(value)
}

// Numeric tokens are accepted in float form and truncated, matching the
// injector's integer fields.
fn parse_int(command: &'static str, name: &'static str, token: &str) -> Result<i64> {
    Ok(parse_float(command, name, token)? as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> ScreenDimensions {
        ScreenDimensions {
            width: 320,
            height: 480,
        }
    }

    fn padding() -> SwipePadding {
        SwipePadding([40, 40, 40, 40])
    }

    fn expand(command: &str, args: &[&str]) -> Vec<EventLine> {
        GestureCommand::parse(command, args)
            .unwrap()
            .expand(&dims(), &padding())
    }

    #[test]
    fn test_unknown_command() {
        let err = GestureCommand::parse("frobnicate", &[]).unwrap_err();
        assert_eq!(err, GestureError::UnknownCommand("frobnicate".to_string()));
    }

    #[test]
    fn test_tap_defaults() {
        let lines = expand("tap", &["10", "20"]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "tap 10 20 1 100");
    }

    #[test]
    fn test_tap_with_times() {
        let lines = expand("tap", &["10", "20", "3"]);
        assert_eq!(lines[0].as_str(), "tap 10 20 3 100");
    }

    #[test]
    fn test_double_tap_is_tap_twice() {
        assert_eq!(expand("double_tap", &["10", "20"]), expand("tap", &["10", "20", "2"]));
    }

    #[test]
    fn test_scroll_down_defaults() {
        let lines = expand("scroll_down", &[]);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].as_str(), "drag 160 440 160 40 10 100");
    }

    #[test]
    fn test_scroll_up_swaps_endpoints() {
        let lines = expand("scroll_up", &[]);
        assert_eq!(lines[0].as_str(), "drag 160 40 160 440 10 100");
    }

    #[test]
    fn test_sweep_args_are_positional() {
        let lines = expand("scroll_down", &["2", "20", "250"]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_str(), "drag 160 440 160 40 20 250");
    }

    #[test]
    fn test_swipe_directions() {
        assert_eq!(expand("swipe_right", &[])[0].as_str(), "drag 40 240 280 240 10 100");
        assert_eq!(expand("swipe_left", &[])[0].as_str(), "drag 280 240 40 240 10 100");
    }

    #[test]
    fn test_drag_defaults_and_field_order() {
        let lines = expand("drag", &["1", "2", "3", "4"]);
        assert_eq!(lines[0].as_str(), "drag 1 2 3 4 5 1000");

        let lines = expand("drag", &["1", "2", "3", "4", "500", "25"]);
        assert_eq!(lines[0].as_str(), "drag 1 2 3 4 25 500");
    }

    #[test]
    fn test_pinch() {
        let lines = expand("pinch", &["1", "2", "3", "4", "5", "6", "7", "8"]);
        assert_eq!(lines[0].as_str(), "pinch 1 2 3 4 5 6 7 8 10 1000");

        let lines = expand("pinch", &["1", "2", "3", "4", "5", "6", "7", "8", "20", "500"]);
        assert_eq!(lines[0].as_str(), "pinch 1 2 3 4 5 6 7 8 20 500");
    }

    #[test]
    fn test_key_events_pass_code_through() {
        assert_eq!(expand("keydown", &["KEY_POWER"])[0].as_str(), "keydown KEY_POWER");
        assert_eq!(expand("keyup", &["116"])[0].as_str(), "keyup 116");
    }

    #[test]
    fn test_sleep_default_and_explicit() {
        assert_eq!(expand("sleep", &[])[0].as_str(), "sleep 1000");
        assert_eq!(expand("sleep", &["0.25"])[0].as_str(), "sleep 250");
    }

    #[test]
    fn test_numeric_tokens_truncate() {
        assert_eq!(expand("tap", &["10.9", "20.1"])[0].as_str(), "tap 10 20 1 100");
    }

    #[test]
    fn test_missing_required_argument() {
        let err = GestureCommand::parse("tap", &["10"]).unwrap_err();
        assert_eq!(
            err,
            GestureError::MissingArgument {
                command: "tap",
                name: "y"
            }
        );
    }

    #[test]
    fn test_invalid_argument_names_token() {
        let err = GestureCommand::parse("tap", &["10", "north"]).unwrap_err();
        assert_eq!(
            err,
            GestureError::InvalidArgument {
                command: "tap",
                name: "y",
                token: "north".to_string()
            }
        );
    }

    #[test]
    fn test_non_finite_tokens_rejected() {
        assert!(GestureCommand::parse("sleep", &["nan"]).is_err());
        assert!(GestureCommand::parse("tap", &["inf", "0"]).is_err());
    }

    #[test]
    fn test_surplus_arguments_rejected() {
        let err = GestureCommand::parse("double_tap", &["1", "2", "3"]).unwrap_err();
        assert_eq!(
            err,
            GestureError::UnexpectedArgument {
                command: "double_tap",
                token: "3".to_string()
            }
        );
        assert!(GestureCommand::parse("scroll_down", &["1", "2", "3", "4"]).is_err());
    }
}
