//! Allocation-free render path tests.
//!
//! These tests verify that `Mixer::render_frame()` does not allocate once
//! voices and automation are queued, and that handing voices and
//! automation to a running mixer between render blocks does not allocate
//! either.
//!
//! Runs under plain `cargo test`; no feature flags needed.

use assert_no_alloc::{assert_no_alloc, AllocDisabler};

#[cfg(debug_assertions)]
#[global_allocator]
static A: AllocDisabler = AllocDisabler;

use ct_engine::{Automation, BusId, Drum, EngineConfig, Frame, Mixer, Renderer, VoiceSynth};
use ct_master::{AudioEngine, NullStore, Settings};

const SAMPLE_RATE: u32 = 44100;
const SECONDS: f64 = 4.0;

/// Queue `SECONDS` of a track (plus any effects) into a fresh mixer.
fn scheduled_mixer(track: &str, effects: &[&str]) -> Mixer {
    let mut config = EngineConfig::default();
    config.sequencer.schedule_ahead = SECONDS + 1.0;
    let mut engine = AudioEngine::builtin(
        &config,
        Mixer::new(SAMPLE_RATE),
        Settings::default(),
        NullStore,
    )
    .unwrap();
    engine.request_track(Some(track));
    for name in effects {
        engine.play_effect(name);
    }
    let (mixer, _) = engine.into_parts();
    mixer
}

/// Render `SECONDS` of audio, aborting on any heap allocation.
fn assert_render_alloc_free(mut mixer: Mixer) {
    let frames = (SAMPLE_RATE as f64 * SECONDS) as usize;
    let mut peak = 0;
    assert_no_alloc(|| {
        for _ in 0..frames {
            peak = peak.max(mixer.render_frame().peak());
        }
    });
    assert!(peak > 0);
}

#[test]
fn overworld_alloc_free() {
    assert_render_alloc_free(scheduled_mixer("overworld", &[]));
}

#[test]
fn title_with_arp_alloc_free() {
    assert_render_alloc_free(scheduled_mixer("title", &[]));
}

#[test]
fn boss_with_effects_alloc_free() {
    assert_render_alloc_free(scheduled_mixer(
        "boss",
        &["jump", "coin", "hit", "powerup", "level_complete"],
    ));
}

/// Hand over drums and bus automation between 256-frame blocks, the way
/// the streaming audio thread drains its command queue.
#[test]
fn interleaved_handover_alloc_free() {
    let synth = VoiceSynth::default();
    let mut mixer = Mixer::new(SAMPLE_RATE);
    let mut block = [Frame::silence(); 256];
    let blocks = (SAMPLE_RATE as f64 * SECONDS) as usize / block.len();
    let mut peak = 0;
    assert_no_alloc(|| {
        for i in 0..blocks {
            let start = mixer.current_time() + 0.05;
            for drum in [Drum::Kick, Drum::Snare, Drum::Hat] {
                drum.schedule(&synth, &mut mixer, start);
            }
            mixer.automate(BusId::Music, Automation::SetValueAt { value: 0.5, time: start });
            if i % 8 == 0 {
                mixer.automate(BusId::Master, Automation::CancelAndHold { at: start });
                mixer.automate(
                    BusId::Master,
                    Automation::ExponentialRampTo { value: 0.9, end: start + 0.08 },
                );
            }
            mixer.render(&mut block);
            peak = block.iter().fold(peak, |p, f| p.max(f.peak()));
        }
    });
    assert!(peak > 0);
}
