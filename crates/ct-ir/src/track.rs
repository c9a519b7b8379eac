//! Step-sequenced music tracks.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::TrackError;
use crate::groove::{Groove, GROOVE_STEPS};
use crate::step::{parse_steps, Step};
use crate::timbre::Timbre;

/// Beats per bar unless a track says otherwise.
pub const DEFAULT_BEATS_PER_BAR: u8 = 4;

const DEFAULT_BPM: f64 = 120.0;
const DEFAULT_STEPS_PER_BEAT: u8 = 2;

/// One of the four pitched lines of a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Part {
    Melody,
    Harmony,
    Bass,
    Arp,
}

impl Part {
    /// All parts in scheduling order.
    pub const ALL: [Part; 4] = [Part::Melody, Part::Harmony, Part::Bass, Part::Arp];

    pub(crate) const fn index(self) -> usize {
        match self {
            Part::Melody => 0,
            Part::Harmony => 1,
            Part::Bass => 2,
            Part::Arp => 3,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Part::Melody => "melody",
            Part::Harmony => "harmony",
            Part::Bass => "bass",
            Part::Arp => "arp",
        })
    }
}

/// A voice line: its steps and how they sound.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceLine {
    pub steps: Vec<Step>,
    pub timbre: Timbre,
}

/// An immutable, validated music track.
///
/// Every line has the same number of steps and the step duration is
/// positive. Construct with [`TrackBuilder`] or [`derive_track`](crate::derive_track).
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub(crate) name: String,
    pub(crate) bpm: f64,
    pub(crate) steps_per_beat: u8,
    pub(crate) beats_per_bar: u8,
    pub(crate) lines: [Option<VoiceLine>; 4],
    pub(crate) dur_factor: Option<f32>,
    pub(crate) arp_dur_factor: Option<f32>,
    pub(crate) accent_strength: f32,
    pub(crate) groove: Groove,
}

impl Track {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn steps_per_beat(&self) -> u8 {
        self.steps_per_beat
    }

    pub fn beats_per_bar(&self) -> u8 {
        self.beats_per_bar
    }

    /// Steps in one bar; accents and grooves are laid out against this.
    pub fn steps_per_bar(&self) -> usize {
        self.steps_per_beat as usize * self.beats_per_bar as usize
    }

    /// Seconds per step: `60 / bpm / steps_per_beat`.
    pub fn step_duration(&self) -> f64 {
        60.0 / self.bpm / self.steps_per_beat as f64
    }

    /// Number of steps in every line.
    pub fn len(&self) -> usize {
        self.lines[0].as_ref().map_or(0, |l| l.steps.len())
    }

    /// Always false for a validated track.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The line for `part`, if the track has one.
    pub fn line(&self, part: Part) -> Option<&VoiceLine> {
        self.lines[part.index()].as_ref()
    }

    /// Iterate over the lines the track defines, in scheduling order.
    pub fn lines(&self) -> impl Iterator<Item = (Part, &VoiceLine)> {
        Part::ALL
            .into_iter()
            .filter_map(move |part| self.line(part).map(|line| (part, line)))
    }

    /// Note length as a fraction of the step, if the track overrides it.
    pub fn dur_factor(&self) -> Option<f32> {
        self.dur_factor
    }

    /// Arp note length as a fraction of the step, if the track overrides it.
    pub fn arp_dur_factor(&self) -> Option<f32> {
        self.arp_dur_factor
    }

    /// 0.0 flattens bar accents, 1.0 applies them fully.
    pub fn accent_strength(&self) -> f32 {
        self.accent_strength
    }

    pub fn groove(&self) -> Groove {
        self.groove
    }

    pub(crate) fn validate(&self) -> Result<(), TrackError> {
        let name = || self.name.clone();
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(TrackError::Tempo(name()));
        }
        if self.steps_per_beat == 0 || self.beats_per_bar == 0 {
            return Err(TrackError::Meter(name()));
        }
        for part in [Part::Melody, Part::Harmony, Part::Bass] {
            if self.line(part).is_none() {
                return Err(TrackError::MissingLine { track: name(), part });
            }
        }
        let expected = self.len();
        if expected == 0 {
            return Err(TrackError::Empty(name()));
        }
        for (part, line) in self.lines() {
            if line.steps.len() != expected {
                return Err(TrackError::LengthMismatch {
                    track: name(),
                    part,
                    len: line.steps.len(),
                    expected,
                });
            }
        }
        if !self.groove.is_silent() && self.steps_per_bar() != GROOVE_STEPS {
            return Err(TrackError::GrooveMeter {
                track: name(),
                steps_per_bar: self.steps_per_bar(),
            });
        }
        Ok(())
    }
}

/// Builder for [`Track`].
///
/// Parse errors from [`line`](Self::line) are held until [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct TrackBuilder {
    track: Track,
    error: Option<TrackError>,
}

impl TrackBuilder {
    /// Start a track at 120 BPM, two steps per beat, standard groove.
    pub fn new(name: &str) -> Self {
        Self {
            track: Track {
                name: name.to_string(),
                bpm: DEFAULT_BPM,
                steps_per_beat: DEFAULT_STEPS_PER_BEAT,
                beats_per_bar: DEFAULT_BEATS_PER_BAR,
                lines: [None, None, None, None],
                dur_factor: None,
                arp_dur_factor: None,
                accent_strength: 1.0,
                groove: Groove::Standard,
            },
            error: None,
        }
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.track.bpm = bpm;
        self
    }

    pub fn steps_per_beat(mut self, steps: u8) -> Self {
        self.track.steps_per_beat = steps;
        self
    }

    pub fn beats_per_bar(mut self, beats: u8) -> Self {
        self.track.beats_per_bar = beats;
        self
    }

    /// Set a line from step notation (see [`parse_steps`]).
    pub fn line(self, part: Part, notation: &str, timbre: Timbre) -> Self {
        match parse_steps(notation) {
            Ok(steps) => self.steps(part, steps, timbre),
            Err(e) => self.fail(e),
        }
    }

    /// Set a line from already-parsed steps.
    pub fn steps(mut self, part: Part, steps: Vec<Step>, timbre: Timbre) -> Self {
        self.track.lines[part.index()] = Some(VoiceLine { steps, timbre });
        self
    }

    pub fn dur_factor(mut self, factor: f32) -> Self {
        self.track.dur_factor = Some(factor);
        self
    }

    pub fn arp_dur_factor(mut self, factor: f32) -> Self {
        self.track.arp_dur_factor = Some(factor);
        self
    }

    pub fn accent_strength(mut self, strength: f32) -> Self {
        self.track.accent_strength = strength.clamp(0.0, 1.0);
        self
    }

    pub fn groove(mut self, groove: Groove) -> Self {
        self.track.groove = groove;
        self
    }

    /// Validate and return the finished track.
    pub fn build(self) -> Result<Track, TrackError> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.track.validate()?;
        Ok(self.track)
    }

    fn fail(mut self, e: TrackError) -> Self {
        self.error.get_or_insert(e);
        self
    }
}
