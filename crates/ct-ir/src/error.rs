use alloc::string::String;
use thiserror::Error;

use crate::track::Part;

/// Malformed track data caught while building a track.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TrackError {
    /// A step token is neither a note name, a pitch number, nor a rest.
    #[error("unrecognized step token `{0}`")]
    BadStep(String),
    /// The melody line has no steps.
    #[error("track `{0}` has no steps")]
    Empty(String),
    /// The melody, harmony, and bass lines are all required.
    #[error("track `{track}` is missing its {part} line")]
    MissingLine { track: String, part: Part },
    /// All lines of a track must have the melody's length.
    #[error("{part} line of `{track}` has {len} steps, expected {expected}")]
    LengthMismatch {
        track: String,
        part: Part,
        len: usize,
        expected: usize,
    },
    /// Tempo must be a positive, finite number of beats per minute.
    #[error("track `{0}` has a non-positive tempo")]
    Tempo(String),
    /// Steps per beat and beats per bar must be non-zero.
    #[error("track `{0}` has an empty bar")]
    Meter(String),
    /// A derived track names a base that is not in the library.
    #[error("base track for `{0}` is not in the library")]
    UnknownBase(String),
    /// Grooves are laid out on an 8-step bar.
    #[error("track `{track}` has {steps_per_bar} steps per bar; its groove needs 8")]
    GrooveMeter { track: String, steps_per_bar: usize },
}
