//! Content model for the chiptide audio engine.
//!
//! Everything the engine plays is described here as immutable data:
//! step-sequenced music tracks, percussion grooves, and one-shot effect
//! specs. Nothing in this crate touches a clock or a renderer.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod content;
mod derive;
mod effect;
mod error;
mod groove;
mod library;
mod pitch;
mod step;
mod timbre;
mod track;

pub use derive::{derive_track, PitchMap, TimbreOverride, TrackTransform};
pub use effect::{EffectSpec, Frequency, JingleNote, ToneSpec, MAX_JINGLE_NOTES};
pub use error::TrackError;
pub use groove::{DrumHits, Groove, GROOVE_STEPS};
pub use library::{EffectLibrary, TrackKey, TrackLibrary};
pub use pitch::{pitch_to_freq, REFERENCE_FREQ, REFERENCE_PITCH};
pub use step::{parse_note, parse_steps, Step};
pub use timbre::{Timbre, Waveform};
pub use track::{Part, Track, TrackBuilder, VoiceLine, DEFAULT_BEATS_PER_BAR};
