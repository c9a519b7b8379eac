//! Voice events handed to a renderer.
//!
//! A [`VoiceEvent`] is a complete, immutable description of one short
//! sound: what produces it, which bus it feeds, how its gain moves, and
//! when it starts and stops in renderer time. Once handed over it is
//! never changed.

use ct_ir::Waveform;

/// One of the three gain buses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BusId {
    Master,
    Music,
    Effects,
}

impl BusId {
    pub const ALL: [BusId; 3] = [BusId::Master, BusId::Music, BusId::Effects];

    pub const fn index(self) -> usize {
        match self {
            BusId::Master => 0,
            BusId::Music => 1,
            BusId::Effects => 2,
        }
    }
}

/// Oscillator frequency over a voice's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreqCurve {
    pub start: f64,
    /// Exponential glide target reached at the end of the voice's nominal
    /// duration; constant pitch when `None`.
    pub end: Option<f64>,
}

impl FreqCurve {
    pub const fn constant(hz: f64) -> Self {
        Self { start: hz, end: None }
    }

    pub const fn glide(from: f64, to: f64) -> Self {
        Self { start: from, end: Some(to) }
    }

    /// Frequency `elapsed` seconds into a glide lasting `length` seconds.
    pub fn at(&self, elapsed: f64, length: f64) -> f64 {
        match self.end {
            Some(end) if length > 0.0 && self.start > 0.0 && end > 0.0 => {
                let frac = (elapsed / length).clamp(0.0, 1.0);
                self.start * (end / self.start).powf(frac)
            }
            _ => self.start,
        }
    }
}

/// Resonant filter applied to noise voices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterKind {
    Highpass,
    Bandpass,
}

/// What produces a voice's signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VoiceSource {
    Tone { waveform: Waveform, freq: FreqCurve },
    /// The renderer's shared noise buffer through a filter.
    Noise { filter: FilterKind, cutoff: f64, q: f64 },
}

/// Floor → peak → floor gain shape with exponential segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainEnvelope {
    pub floor: f32,
    pub peak: f32,
    pub start: f64,
    pub attack_end: f64,
    pub release_end: f64,
}

impl GainEnvelope {
    pub fn value_at(&self, t: f64) -> f32 {
        if t <= self.start || t >= self.release_end {
            self.floor
        } else if t < self.attack_end {
            exp_segment(self.floor, self.peak, (t - self.start) / (self.attack_end - self.start))
        } else {
            exp_segment(
                self.peak,
                self.floor,
                (t - self.attack_end) / (self.release_end - self.attack_end),
            )
        }
    }
}

fn exp_segment(from: f32, to: f32, frac: f64) -> f32 {
    let frac = if frac.is_finite() { frac.clamp(0.0, 1.0) } else { 1.0 };
    from * (to / from).powf(frac as f32)
}

/// A scheduled voice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceEvent {
    pub source: VoiceSource,
    pub bus: BusId,
    pub envelope: GainEnvelope,
    /// Absolute renderer time in seconds.
    pub start: f64,
    /// Past the envelope's end by a short tail so the release completes.
    pub stop: f64,
}

impl VoiceEvent {
    /// Nominal duration, from start to the end of the release.
    pub fn duration(&self) -> f64 {
        self.envelope.release_end - self.start
    }

    /// Oscillator frequency at absolute time `t`; `None` for noise.
    pub fn freq_at(&self, t: f64) -> Option<f64> {
        match self.source {
            VoiceSource::Tone { freq, .. } => Some(freq.at(t - self.start, self.duration())),
            VoiceSource::Noise { .. } => None,
        }
    }
}
