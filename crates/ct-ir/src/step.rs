//! Sequencer steps and the compact text notation used to author them.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::error::TrackError;

/// One slot in a voice line: a pitch or a rest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Step {
    /// Nothing sounds on this step.
    #[default]
    Rest,
    /// Pitch number (69 = A4).
    Note(u8),
}

impl Step {
    /// The pitch if this step sounds.
    pub const fn pitch(self) -> Option<u8> {
        match self {
            Step::Note(p) => Some(p),
            Step::Rest => None,
        }
    }

    /// Returns true for a rest.
    pub const fn is_rest(self) -> bool {
        matches!(self, Step::Rest)
    }

    /// Apply `f` to the pitch; rests stay rests.
    pub fn map_pitch(self, f: impl FnOnce(u8) -> u8) -> Self {
        match self {
            Step::Note(p) => Step::Note(f(p)),
            Step::Rest => Step::Rest,
        }
    }
}

/// Parse a single note token into a pitch number.
///
/// Accepts raw pitch numbers (`"72"`) and note names with an optional
/// sharp or flat and an octave (`"C5"`, `"F#3"`, `"Bb2"`), where `C4` is 60.
pub fn parse_note(token: &str) -> Option<u8> {
    if let Ok(pitch) = token.parse::<u8>() {
        return (pitch <= 127).then_some(pitch);
    }

    let mut chars = token.chars();
    let base: i16 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };
    let rest = chars.as_str();
    let (accidental, octave) = if let Some(r) = rest.strip_prefix('#') {
        (1, r)
    } else if let Some(r) = rest.strip_prefix('b') {
        (-1, r)
    } else {
        (0, rest)
    };
    let octave: i16 = octave.parse().ok()?;
    let pitch = (octave + 1) * 12 + base + accidental;
    u8::try_from(pitch).ok().filter(|p| *p <= 127)
}

/// Parse a whitespace-separated line of steps.
///
/// `.`, `-`, `_` and `r` are rests; `|` marks bar lines and is skipped.
pub fn parse_steps(line: &str) -> Result<Vec<Step>, TrackError> {
    line.split_whitespace()
        .filter(|token| *token != "|")
        .map(|token| match token {
            "." | "-" | "_" | "r" => Ok(Step::Rest),
            _ => parse_note(token)
                .map(Step::Note)
                .ok_or_else(|| TrackError::BadStep(token.to_string())),
        })
        .collect()
}
