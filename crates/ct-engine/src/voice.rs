//! Voice: one sounding event inside the mixer.

use std::f64::consts::TAU;

use ct_ir::Waveform;

use crate::event::{BusId, VoiceEvent, VoiceSource};
use crate::filter::Biquad;
use crate::noise::NoiseBuffer;

/// A voice producing audio from an oscillator or the shared noise buffer.
#[derive(Clone, Debug)]
pub struct Voice {
    /// What this voice plays, exactly as scheduled.
    pub event: VoiceEvent,
    /// Oscillator phase in cycles, [0, 1).
    pub phase: f64,
    /// Read position in the noise buffer.
    pub noise_pos: usize,
    pub filter: Option<Biquad>,
    /// Is the voice still producing audio?
    pub playing: bool,
}

impl Voice {
    pub fn new(event: VoiceEvent, sample_rate: u32) -> Self {
        let filter = match event.source {
            VoiceSource::Noise { filter, cutoff, q } => {
                Some(Biquad::new(filter, cutoff, q, sample_rate))
            }
            VoiceSource::Tone { .. } => None,
        };
        Self {
            event,
            phase: 0.0,
            noise_pos: 0,
            filter,
            playing: true,
        }
    }

    pub fn bus(&self) -> BusId {
        self.event.bus
    }

    /// Render the sample at time `t`, `dt` seconds per sample.
    pub fn render(&mut self, t: f64, dt: f64, noise: &NoiseBuffer) -> f32 {
        if !self.playing {
            return 0.0;
        }
        if t >= self.event.stop {
            self.playing = false;
            return 0.0;
        }
        if t < self.event.start {
            return 0.0;
        }

        let raw = match self.event.source {
            VoiceSource::Tone { waveform, freq } => {
                let s = oscillator(waveform, self.phase);
                let hz = freq.at(t - self.event.start, self.event.duration());
                self.phase = (self.phase + hz * dt).fract();
                s
            }
            VoiceSource::Noise { .. } => {
                let x = noise.sample(self.noise_pos);
                self.noise_pos += 1;
                match self.filter.as_mut() {
                    Some(f) => f.process(x),
                    None => x,
                }
            }
        };
        raw * self.event.envelope.value_at(t)
    }
}

/// Naive oscillator output at `phase` cycles.
pub fn oscillator(waveform: Waveform, phase: f64) -> f32 {
    let v = match waveform {
        Waveform::Sine => (TAU * phase).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => 4.0 * (phase - 0.5).abs() - 1.0,
        Waveform::Sawtooth => 2.0 * phase - 1.0,
    };
    v as f32
}
