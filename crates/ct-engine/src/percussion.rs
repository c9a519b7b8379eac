//! Fixed drum voices.

use ct_ir::{DrumHits, Waveform};

use crate::event::{BusId, FilterKind, VoiceEvent};
use crate::renderer::Renderer;
use crate::synth::{NoiseRequest, ToneRequest, VoiceSynth};

/// A percussion instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Drum {
    /// Sine thump with a falling pitch.
    Kick,
    /// Bandpassed noise.
    Snare,
    /// Short highpassed noise.
    Hat,
}

impl Drum {
    /// Schedule one hit on the music bus.
    pub fn schedule<R: Renderer + ?Sized>(
        self,
        synth: &VoiceSynth,
        out: &mut R,
        start: f64,
    ) -> VoiceEvent {
        match self {
            Drum::Kick => synth.tone(
                out,
                ToneRequest {
                    waveform: Waveform::Sine,
                    freq: 150.0,
                    end_freq: Some(45.0),
                    start,
                    duration: 0.12,
                    gain: 0.55,
                    bus: BusId::Music,
                },
            ),
            Drum::Snare => synth.noise(
                out,
                NoiseRequest {
                    filter: FilterKind::Bandpass,
                    cutoff: 1800.0,
                    q: 0.9,
                    start,
                    duration: 0.09,
                    gain: 0.22,
                    bus: BusId::Music,
                },
            ),
            Drum::Hat => synth.noise(
                out,
                NoiseRequest {
                    filter: FilterKind::Highpass,
                    cutoff: 7000.0,
                    q: 0.7,
                    start,
                    duration: 0.03,
                    gain: 0.1,
                    bus: BusId::Music,
                },
            ),
        }
    }
}

/// The drums a groove position fires, in kick, snare, hat order.
pub fn drums(hits: DrumHits) -> impl Iterator<Item = Drum> {
    [
        (hits.kick, Drum::Kick),
        (hits.snare, Drum::Snare),
        (hits.hat, Drum::Hat),
    ]
    .into_iter()
    .filter_map(|(on, drum)| on.then_some(drum))
}
