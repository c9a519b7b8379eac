//! Deterministic track derivation.
//!
//! A [`TrackTransform`] describes how to turn a base track into a variant:
//! a pitch-class remap applied to every voice, then per-voice semitone
//! shifts and timbre overrides. [`derive_track`] never touches the base.

use alloc::string::{String, ToString};

use crate::error::TrackError;
use crate::groove::Groove;
use crate::step::Step;
use crate::timbre::{Timbre, Waveform};
use crate::track::{Part, Track, VoiceLine};

/// Semitone offsets above the tonic that minor color lowers by one.
const MINOR_COLOR_DEGREES: [u8; 3] = [4, 9, 11];

/// Pitch-class remap applied before per-voice shifts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PitchMap {
    #[default]
    Identity,
    /// Flatten the major third, sixth, and seventh of `tonic` (a pitch class, 0 = C).
    MinorColor { tonic: u8 },
}

impl PitchMap {
    pub fn apply(self, pitch: u8) -> u8 {
        match self {
            PitchMap::Identity => pitch,
            PitchMap::MinorColor { tonic } => {
                let degree = (pitch as i16 - tonic as i16).rem_euclid(12) as u8;
                if MINOR_COLOR_DEGREES.contains(&degree) {
                    pitch.saturating_sub(1)
                } else {
                    pitch
                }
            }
        }
    }
}

/// Per-voice timbre changes; `None` keeps the base value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TimbreOverride {
    pub waveform: Option<Waveform>,
    pub gain: Option<f32>,
}

impl TimbreOverride {
    fn apply(&self, timbre: Timbre) -> Timbre {
        Timbre {
            waveform: self.waveform.unwrap_or(timbre.waveform),
            gain: self.gain.unwrap_or(timbre.gain),
        }
    }
}

/// Recipe for a derived track.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackTransform {
    name: String,
    pitch_map: PitchMap,
    shifts: [i8; 4],
    timbres: [TimbreOverride; 4],
    bpm: Option<f64>,
    groove: Option<Groove>,
    accent_strength: Option<f32>,
    dur_factor: Option<f32>,
}

impl TrackTransform {
    /// An identity transform producing a track called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pitch_map: PitchMap::Identity,
            shifts: [0; 4],
            timbres: [TimbreOverride::default(); 4],
            bpm: None,
            groove: None,
            accent_strength: None,
            dur_factor: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pitch_map(mut self, map: PitchMap) -> Self {
        self.pitch_map = map;
        self
    }

    /// Transpose one voice by `semitones` after the pitch map.
    pub fn shift(mut self, part: Part, semitones: i8) -> Self {
        self.shifts[part.index()] = semitones;
        self
    }

    pub fn waveform(mut self, part: Part, waveform: Waveform) -> Self {
        self.timbres[part.index()].waveform = Some(waveform);
        self
    }

    pub fn gain(mut self, part: Part, gain: f32) -> Self {
        self.timbres[part.index()].gain = Some(gain);
        self
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = Some(bpm);
        self
    }

    pub fn groove(mut self, groove: Groove) -> Self {
        self.groove = Some(groove);
        self
    }

    pub fn accent_strength(mut self, strength: f32) -> Self {
        self.accent_strength = Some(strength.clamp(0.0, 1.0));
        self
    }

    pub fn dur_factor(mut self, factor: f32) -> Self {
        self.dur_factor = Some(factor);
        self
    }

    fn map_pitch(&self, part: Part, pitch: u8) -> u8 {
        let mapped = self.pitch_map.apply(pitch) as i16 + self.shifts[part.index()] as i16;
        mapped.clamp(0, 127) as u8
    }
}

/// Apply `transform` to `base`, returning a new track.
///
/// The result depends only on its inputs. Rests stay rests and pitches
/// saturate to 0..=127. Fails only if an override breaks a track
/// invariant, e.g. a groove on a bar that is not 8 steps long.
pub fn derive_track(base: &Track, transform: &TrackTransform) -> Result<Track, TrackError> {
    let mut lines: [Option<VoiceLine>; 4] = [None, None, None, None];
    for (part, line) in base.lines() {
        let steps = line
            .steps
            .iter()
            .map(|step: &Step| step.map_pitch(|p| transform.map_pitch(part, p)))
            .collect();
        lines[part.index()] = Some(VoiceLine {
            steps,
            timbre: transform.timbres[part.index()].apply(line.timbre),
        });
    }

    let track = Track {
        name: transform.name.clone(),
        bpm: transform.bpm.unwrap_or(base.bpm),
        steps_per_beat: base.steps_per_beat,
        beats_per_bar: base.beats_per_bar,
        lines,
        dur_factor: transform.dur_factor.or(base.dur_factor),
        arp_dur_factor: base.arp_dur_factor,
        accent_strength: transform.accent_strength.unwrap_or(base.accent_strength),
        groove: transform.groove.unwrap_or(base.groove),
    };
    track.validate()?;
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::TrackBuilder;

    const SQ: Timbre = Timbre::new(Waveform::Square, 0.2);
    const TRI: Timbre = Timbre::new(Waveform::Triangle, 0.3);

    fn base() -> Track {
        TrackBuilder::new("base")
            .bpm(168.0)
            .line(Part::Melody, "C5 D5 E5 F5 G5 A5 B5 .", SQ)
            .line(Part::Harmony, "E4 . G4 . A4 . B4 .", SQ)
            .line(Part::Bass, "C3 . . . G2 . . .", TRI)
            .line(Part::Arp, "C5 E5 G5 C6 . . . .", SQ)
            .build()
            .unwrap()
    }

    fn dark() -> TrackTransform {
        TrackTransform::new("dark")
            .pitch_map(PitchMap::MinorColor { tonic: 0 })
            .shift(Part::Bass, -12)
            .waveform(Part::Melody, Waveform::Triangle)
            .gain(Part::Harmony, 0.1)
            .bpm(150.0)
    }

    #[test]
    fn minor_color_flattens_three_degrees() {
        let map = PitchMap::MinorColor { tonic: 0 };
        // C major scale from C5
        let scale = [72, 74, 76, 77, 79, 81, 83];
        let colored: [u8; 7] = scale.map(|p| map.apply(p));
        assert_eq!(colored, [72, 74, 75, 77, 79, 80, 82]);
    }

    #[test]
    fn minor_color_respects_tonic() {
        // A major third above A is C#; in A it becomes C.
        let map = PitchMap::MinorColor { tonic: 9 };
        assert_eq!(map.apply(73), 72);
        assert_eq!(map.apply(69), 69);
    }

    #[test]
    fn derivation_is_deterministic() {
        let base = base();
        let a = derive_track(&base, &dark()).unwrap();
        let b = derive_track(&base, &dark()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rests_stay_rests() {
        let base = base();
        let derived = derive_track(&base, &dark()).unwrap();
        for (part, line) in base.lines() {
            let out = derived.line(part).unwrap();
            assert_eq!(line.steps.len(), out.steps.len());
            for (a, b) in line.steps.iter().zip(&out.steps) {
                assert_eq!(a.is_rest(), b.is_rest(), "{} line changed shape", part);
            }
        }
    }

    #[test]
    fn per_voice_overrides_apply_independently() {
        let derived = derive_track(&base(), &dark()).unwrap();
        assert_eq!(derived.name(), "dark");
        assert_eq!(derived.bpm(), 150.0);
        // C3 shifted down an octave
        assert_eq!(derived.line(Part::Bass).unwrap().steps[0], Step::Note(36));
        // E4 becomes Eb4 but is not shifted
        assert_eq!(derived.line(Part::Harmony).unwrap().steps[0], Step::Note(63));
        assert_eq!(derived.line(Part::Melody).unwrap().timbre.waveform, Waveform::Triangle);
        assert_eq!(derived.line(Part::Melody).unwrap().timbre.gain, 0.2);
        assert_eq!(derived.line(Part::Harmony).unwrap().timbre.gain, 0.1);
        assert_eq!(derived.line(Part::Arp).unwrap().timbre, SQ);
    }

    #[test]
    fn base_is_untouched() {
        let base = base();
        let before = base.clone();
        let _ = derive_track(&base, &dark()).unwrap();
        assert_eq!(base, before);
    }

    #[test]
    fn shifts_saturate() {
        let t = TrackTransform::new("up").shift(Part::Melody, 127);
        let derived = derive_track(&base(), &t).unwrap();
        assert_eq!(derived.line(Part::Melody).unwrap().steps[0], Step::Note(127));
    }
}
