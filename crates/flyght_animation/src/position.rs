//! Timeline positions
//!
//! Where an entry lands on a timeline, relative to what was added before it.
//! Tokens are parsed once when the entry is added:
//!
//! | token | position |
//! |---|---|
//! | `1.5` | absolute, 1.5s |
//! | `+=0.3`, `-=0.3` | previous entry's end, shifted |
//! | `>`, `>-0.2`, `>+=0.2` | previous entry's end, shifted |
//! | `<`, `<0.5`, `<+=0.5`, `<-0.1` | previous entry's start, shifted |

use std::str::FromStr;

use crate::error::{AnimationError, Result};

/// Resolved placement rule for a timeline entry
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Seconds from the start of the timeline
    Absolute(f32),
    /// Offset from the end of the most recently added entry
    AfterPrevious(f32),
    /// Offset from the start of the most recently added entry
    WithPrevious(f32),
    /// Offset from the end of the timeline so far (the latest end of any entry)
    AtEnd(f32),
}

impl Default for Position {
    /// Plain sequencing: after everything added so far
    fn default() -> Self {
        Position::AtEnd(0.0)
    }
}

impl Position {
    /// Resolve against the previous entry's span and the timeline's current end
    pub(crate) fn resolve(self, previous: Option<(f32, f32)>, end: f32) -> f32 {
        let (prev_start, prev_end) = previous.unwrap_or((0.0, 0.0));
        match self {
            Position::Absolute(at) => at,
            Position::AfterPrevious(offset) => prev_end + offset,
            Position::WithPrevious(offset) => prev_start + offset,
            Position::AtEnd(offset) => end + offset,
        }
    }

    fn offset(self) -> f32 {
        match self {
            Position::Absolute(v)
            | Position::AfterPrevious(v)
            | Position::WithPrevious(v)
            | Position::AtEnd(v) => v,
        }
    }
}

/// Parse a signed offset: `""`, `0.5`, `+0.5`, `-0.5`, `+=0.5`, `-=0.5`
fn parse_offset(raw: &str) -> Option<f32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    let (sign, rest) = match raw.as_bytes()[0] {
        b'+' => (1.0, &raw[1..]),
        b'-' => (-1.0, &raw[1..]),
        _ => (1.0, raw),
    };
    let rest = rest.strip_prefix('=').unwrap_or(rest);
    if rest.is_empty() || rest.starts_with(|c: char| c == '+' || c == '-') {
        return None;
    }
    rest.trim().parse::<f32>().ok().map(|v| sign * v)
}

impl FromStr for Position {
    type Err = AnimationError;

    fn from_str(token: &str) -> Result<Self> {
        let malformed = || AnimationError::MalformedPosition(token.to_string());
        let trimmed = token.trim();

        let position = if let Some(rest) = trimmed.strip_prefix('<') {
            Position::WithPrevious(parse_offset(rest).ok_or_else(malformed)?)
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            Position::AfterPrevious(parse_offset(rest).ok_or_else(malformed)?)
        } else if trimmed.starts_with("+=") || trimmed.starts_with("-=") {
            Position::AfterPrevious(parse_offset(trimmed).ok_or_else(malformed)?)
        } else if trimmed.is_empty() {
            return Err(malformed());
        } else {
            Position::Absolute(trimmed.parse::<f32>().map_err(|_| malformed())?)
        };

        if !position.offset().is_finite() {
            return Err(malformed());
        }
        Ok(position)
    }
}

/// Anything that can name a timeline position
pub trait IntoPosition {
    fn into_position(self) -> Result<Position>;
}

impl IntoPosition for Position {
    fn into_position(self) -> Result<Position> {
        Ok(self)
    }
}

impl IntoPosition for f32 {
    fn into_position(self) -> Result<Position> {
        if self.is_finite() {
            Ok(Position::Absolute(self))
        } else {
            Err(AnimationError::MalformedPosition(self.to_string()))
        }
    }
}

impl IntoPosition for &str {
    fn into_position(self) -> Result<Position> {
        self.parse()
    }
}
