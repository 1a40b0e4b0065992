//! Configuration value types
//!
//! Screen geometry and swipe padding for the target device. CLI values
//! arrive as bracketed integer lists (e.g. `"[320,480]"`) and are parsed
//! structurally - never evaluated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing or validating configuration values
#[derive(Error, Debug)]
pub enum ValueError {
    /// Input was not a bracketed list
    #[error("expected a bracketed integer list like \"[320,480]\", got {0:?}")]
    Syntax(String),

    /// Wrong number of elements
    #[error("expected {expected} comma-separated integers, got {actual}")]
    Arity { expected: usize, actual: usize },

    /// Element was not an integer
    #[error("invalid integer {token:?}")]
    Integer { token: String },

    /// Dimensions must be positive
    #[error("screen dimensions must be positive, got {0}x{1}")]
    NonPositiveDimensions(i64, i64),

    /// Padding values must be non-negative
    #[error("swipe padding values must be non-negative, got {0}")]
    NegativePadding(i64),
}

fn parse_int_list(input: &str, expected: usize) -> Result<Vec<i64>, ValueError> {
    let inner = input
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ValueError::Syntax(input.to_string()))?;

    let values = inner
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<i64>().map_err(|_| ValueError::Integer {
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() != expected {
        return Err(ValueError::Arity {
            expected,
            actual: values.len(),
        });
    }
    Ok(values)
}

/// Screen dimensions of the target device in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct ScreenDimensions {
    /// Width in pixels
    pub width: i64,
    /// Height in pixels
    pub height: i64,
}

impl ScreenDimensions {
    /// Create validated dimensions
    pub fn new(width: i64, height: i64) -> Result<Self, ValueError> {
        if width <= 0 || height <= 0 {
            return Err(ValueError::NonPositiveDimensions(width, height));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<Vec<i64>> for ScreenDimensions {
    type Error = ValueError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [width, height] => Self::new(*width, *height),
            other => Err(ValueError::Arity {
                expected: 2,
                actual: other.len(),
            }),
        }
    }
}

impl From<ScreenDimensions> for Vec<i64> {
    fn from(dims: ScreenDimensions) -> Self {
        vec![dims.width, dims.height]
    }
}

impl FromStr for ScreenDimensions {
    type Err = ValueError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::try_from(parse_int_list(input, 2)?)
    }
}

impl fmt::Display for ScreenDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.width, self.height)
    }
}

/// Swipe padding margins in pixels.
///
/// The four values are consumed positionally by the scroll and swipe
/// geometry: indices 0 and 3 bound the vertical scroll axis, indices 2
/// and 0 bound the horizontal swipe axis. The layout comes from the
/// device calibration profile and is kept as an indexed tuple on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct SwipePadding(pub [i64; 4]);

impl SwipePadding {
    /// Create validated padding
    pub fn new(values: [i64; 4]) -> Result<Self, ValueError> {
        for value in values {
            if value < 0 {
                return Err(ValueError::NegativePadding(value));
            }
        }
        Ok(Self(values))
    }

    /// Padding value at the given tuple index
    pub fn get(&self, index: usize) -> i64 {
        self.0[index]
    }
}

impl TryFrom<Vec<i64>> for SwipePadding {
    type Error = ValueError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        let values: [i64; 4] = values.try_into().map_err(|v: Vec<i64>| ValueError::Arity {
            expected: 4,
            actual: v.len(),
        })?;
        Self::new(values)
    }
}

impl From<SwipePadding> for Vec<i64> {
    fn from(padding: SwipePadding) -> Self {
        padding.0.to_vec()
    }
}

impl FromStr for SwipePadding {
    type Err = ValueError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::try_from(parse_int_list(input, 4)?)
    }
}

impl fmt::Display for SwipePadding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "[{a},{b},{c},{d}]")
    }
}
