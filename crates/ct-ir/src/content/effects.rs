use crate::effect::{EffectSpec, Frequency, ToneSpec};
use crate::library::EffectLibrary;
use crate::timbre::Waveform;

use Frequency::{Hz, Pitch};
use Waveform::{Sawtooth, Square, Triangle};

/// Evenly spaced notes of one waveform.
fn arpeggio(waveform: Waveform, pitches: &[u8], spacing: f64, duration: f64, gain: f32) -> EffectSpec {
    EffectSpec::jingle(pitches.iter().enumerate().map(|(i, &p)| {
        (i as f64 * spacing, ToneSpec::new(waveform, Pitch(p), duration, gain))
    }))
}

/// Build the library of built-in one-shot effects.
pub fn builtin_effects() -> EffectLibrary {
    let mut lib = EffectLibrary::new();

    lib.insert(
        "jump",
        EffectSpec::Tone(ToneSpec::new(Square, Hz(320.0), 0.12, 0.18).glide_to(Hz(720.0))),
    );
    lib.insert(
        "coin",
        EffectSpec::jingle([
            (0.0, ToneSpec::new(Square, Pitch(83), 0.07, 0.16)),
            (0.07, ToneSpec::new(Square, Pitch(88), 0.18, 0.16)),
        ]),
    );
    lib.insert(
        "hit",
        EffectSpec::Tone(ToneSpec::new(Sawtooth, Hz(220.0), 0.18, 0.22).glide_to(Hz(70.0))),
    );
    lib.insert("powerup", arpeggio(Square, &[72, 76, 79, 84], 0.06, 0.08, 0.16));
    lib.insert(
        "menu_move",
        EffectSpec::Tone(ToneSpec::new(Square, Pitch(84), 0.04, 0.1)),
    );
    lib.insert(
        "menu_select",
        EffectSpec::jingle([
            (0.0, ToneSpec::new(Square, Pitch(79), 0.05, 0.14)),
            (0.05, ToneSpec::new(Square, Pitch(84), 0.1, 0.14)),
        ]),
    );
    lib.insert(
        "toggle",
        EffectSpec::Tone(ToneSpec::new(Triangle, Pitch(81), 0.08, 0.2)),
    );
    lib.insert(
        "level_complete",
        arpeggio(Square, &[72, 76, 79, 84, 88], 0.1, 0.14, 0.16),
    );
    lib.insert(
        "game_over",
        arpeggio(Triangle, &[67, 66, 65, 64], 0.18, 0.24, 0.22),
    );

    lib
}
