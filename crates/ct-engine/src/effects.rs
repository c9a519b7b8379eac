//! One-shot effect playback.

use ct_ir::EffectLibrary;
use tracing::debug;

use crate::event::BusId;
use crate::renderer::Renderer;
use crate::synth::{ToneRequest, VoiceSynth};

/// Fires named effects on the effects bus relative to the current clock.
///
/// Each call schedules a fixed, small number of self-terminating voices,
/// so rapid repeated calls never build up pending work.
pub struct EffectPlayer {
    library: EffectLibrary,
}

impl EffectPlayer {
    pub fn new(library: EffectLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &EffectLibrary {
        &self.library
    }

    /// Schedule the effect called `name`. Returns the number of voices
    /// scheduled; unknown names schedule nothing.
    pub fn play<R: Renderer + ?Sized>(&self, synth: &VoiceSynth, out: &mut R, name: &str) -> usize {
        let Some(spec) = self.library.get(name) else {
            debug!(effect = name, "unknown effect");
            return 0;
        };
        let now = out.current_time();
        let mut count = 0;
        for note in spec.notes() {
            synth.tone(
                out,
                ToneRequest {
                    waveform: note.tone.waveform,
                    freq: note.tone.freq.hz(),
                    end_freq: note.tone.end_freq.map(|f| f.hz()),
                    start: now + note.offset,
                    duration: note.tone.duration,
                    gain: note.tone.gain,
                    bus: BusId::Effects,
                },
            );
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureRenderer;
    use ct_ir::content::builtin_effects;

    fn player() -> EffectPlayer {
        EffectPlayer::new(builtin_effects())
    }

    #[test]
    fn jingle_notes_are_offset_from_now() {
        let mut out = CaptureRenderer::new();
        out.set_time(3.0);
        let n = player().play(&VoiceSynth::default(), &mut out, "coin");
        assert_eq!(n, 2);
        let starts: Vec<f64> = out.voices().iter().map(|v| v.start).collect();
        assert!((starts[0] - 3.004).abs() < 1e-9);
        assert!((starts[1] - 3.07).abs() < 1e-9);
        assert!(out.voices().iter().all(|v| v.bus == BusId::Effects));
    }

    #[test]
    fn unknown_effect_is_silent() {
        let mut out = CaptureRenderer::new();
        assert_eq!(player().play(&VoiceSynth::default(), &mut out, "nope"), 0);
        assert!(out.voices().is_empty());
    }

    #[test]
    fn repeated_calls_are_independent() {
        let mut out = CaptureRenderer::new();
        let p = player();
        let synth = VoiceSynth::default();
        for i in 0..50 {
            out.set_time(i as f64 * 0.01);
            assert_eq!(p.play(&synth, &mut out, "menu_move"), 1);
        }
        assert_eq!(out.voices().len(), 50);
        // each voice ends on its own shortly after it starts
        assert!(out.voices().iter().all(|v| v.stop - v.start < 0.1));
    }
}
