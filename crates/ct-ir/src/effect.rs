//! One-shot sound effect descriptions.

use arrayvec::ArrayVec;

use crate::pitch::pitch_to_freq;
use crate::timbre::Waveform;

/// Maximum notes in one jingle.
pub const MAX_JINGLE_NOTES: usize = 8;

/// A frequency given either as a pitch number or directly in Hz.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frequency {
    Pitch(u8),
    Hz(f64),
}

impl Frequency {
    pub fn hz(self) -> f64 {
        match self {
            Frequency::Pitch(p) => pitch_to_freq(p),
            Frequency::Hz(hz) => hz,
        }
    }
}

/// Parameters for a single tone burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSpec {
    pub waveform: Waveform,
    pub freq: Frequency,
    /// Glide target; the pitch is constant when absent.
    pub end_freq: Option<Frequency>,
    /// Seconds.
    pub duration: f64,
    pub gain: f32,
}

impl ToneSpec {
    pub const fn new(waveform: Waveform, freq: Frequency, duration: f64, gain: f32) -> Self {
        Self {
            waveform,
            freq,
            end_freq: None,
            duration,
            gain,
        }
    }

    pub const fn glide_to(mut self, end: Frequency) -> Self {
        self.end_freq = Some(end);
        self
    }
}

/// One note of a jingle, offset in seconds from the trigger time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JingleNote {
    pub offset: f64,
    pub tone: ToneSpec,
}

/// What a named effect plays.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectSpec {
    Tone(ToneSpec),
    Jingle(ArrayVec<JingleNote, MAX_JINGLE_NOTES>),
}

impl EffectSpec {
    /// Build a jingle from `(offset, tone)` pairs, keeping at most
    /// [`MAX_JINGLE_NOTES`].
    pub fn jingle(notes: impl IntoIterator<Item = (f64, ToneSpec)>) -> Self {
        EffectSpec::Jingle(
            notes
                .into_iter()
                .take(MAX_JINGLE_NOTES)
                .map(|(offset, tone)| JingleNote { offset, tone })
                .collect(),
        )
    }

    /// Notes in trigger order. A single tone is one note at offset 0.
    pub fn notes(&self) -> impl Iterator<Item = JingleNote> + '_ {
        let (single, many) = match self {
            EffectSpec::Tone(tone) => (Some(JingleNote { offset: 0.0, tone: *tone }), &[][..]),
            EffectSpec::Jingle(notes) => (None, notes.as_slice()),
        };
        single.into_iter().chain(many.iter().copied())
    }

    /// Seconds from trigger until the last note ends.
    pub fn length(&self) -> f64 {
        self.notes()
            .map(|n| n.offset + n.tone.duration)
            .fold(0.0, f64::max)
    }
}
