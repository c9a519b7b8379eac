//! Tone and noise burst construction.
//!
//! Both burst kinds start on the silent floor, rise exponentially to their
//! peak over a short attack, and fall exponentially back to the floor by
//! the end of their duration. Requested start times in the past are moved
//! to just after the current clock so they still sound.

use ct_ir::Waveform;

use crate::config::SynthConfig;
use crate::event::{BusId, FilterKind, FreqCurve, GainEnvelope, VoiceEvent, VoiceSource};
use crate::renderer::Renderer;

const ATTACK_FRACTION: f64 = 0.1;
const ATTACK_MIN: f64 = 0.003;
const ATTACK_MAX: f64 = 0.01;
/// Shortest burst the synth will build.
const MIN_DURATION: f64 = 0.01;

/// A tone burst request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneRequest {
    pub waveform: Waveform,
    pub freq: f64,
    pub end_freq: Option<f64>,
    pub start: f64,
    pub duration: f64,
    pub gain: f32,
    pub bus: BusId,
}

/// A filtered noise burst request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseRequest {
    pub filter: FilterKind,
    pub cutoff: f64,
    pub q: f64,
    pub start: f64,
    pub duration: f64,
    pub gain: f32,
    pub bus: BusId,
}

/// Builds voice events and hands them to a renderer. Holds no state
/// beyond its constants.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VoiceSynth {
    config: SynthConfig,
}

impl VoiceSynth {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Schedule a tone burst. Returns the event as handed to the renderer.
    pub fn tone<R: Renderer + ?Sized>(&self, out: &mut R, req: ToneRequest) -> VoiceEvent {
        let freq = match req.end_freq {
            Some(end) => FreqCurve::glide(req.freq, end),
            None => FreqCurve::constant(req.freq),
        };
        let source = VoiceSource::Tone {
            waveform: req.waveform,
            freq,
        };
        self.emit(out, source, req.bus, req.start, req.duration, req.gain)
    }

    /// Schedule a noise burst from the renderer's shared noise buffer.
    pub fn noise<R: Renderer + ?Sized>(&self, out: &mut R, req: NoiseRequest) -> VoiceEvent {
        let source = VoiceSource::Noise {
            filter: req.filter,
            cutoff: req.cutoff,
            q: req.q,
        };
        self.emit(out, source, req.bus, req.start, req.duration, req.gain)
    }

    fn emit<R: Renderer + ?Sized>(
        &self,
        out: &mut R,
        source: VoiceSource,
        bus: BusId,
        start: f64,
        duration: f64,
        gain: f32,
    ) -> VoiceEvent {
        let earliest = out.current_time() + self.config.start_epsilon;
        let start = if start > earliest { start } else { earliest };
        let duration = if duration > MIN_DURATION { duration } else { MIN_DURATION };
        let attack = attack_time(duration);
        let floor = self.config.silent_gain;

        let event = VoiceEvent {
            source,
            bus,
            envelope: GainEnvelope {
                floor,
                peak: clamp_gain(gain, floor),
                start,
                attack_end: start + attack,
                release_end: start + duration,
            },
            start,
            stop: start + duration + self.config.voice_tail,
        };
        out.play_voice(event);
        event
    }
}

/// Attack length for a burst of `duration` seconds.
pub fn attack_time(duration: f64) -> f64 {
    (duration * ATTACK_FRACTION)
        .clamp(ATTACK_MIN, ATTACK_MAX)
        .min(duration / 2.0)
}

/// Clamp to `[floor, 1]`; anything unusable lands on the floor.
fn clamp_gain(gain: f32, floor: f32) -> f32 {
    if gain > floor {
        gain.min(1.0)
    } else {
        floor
    }
}
