//! Sequencer timing under irregular ticks.

use ct_engine::{BusLevels, CaptureRenderer, Context, MixBus, Renderer, Sequencer, SequencerConfig, VoiceSynth};
use ct_ir::{Groove, Part, Timbre, TrackBuilder, TrackLibrary, Waveform};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const BPM: f64 = 168.0;
const STEP: f64 = 60.0 / BPM / 2.0;

struct Harness {
    out: CaptureRenderer,
    bus: MixBus,
    synth: VoiceSynth,
    seq: Sequencer,
}

impl Harness {
    fn new() -> Self {
        let tone = Timbre::new(Waveform::Square, 0.2);
        let mut tracks = TrackLibrary::new();
        tracks.insert(
            TrackBuilder::new("pulse")
                .bpm(BPM)
                .line(Part::Melody, "C5 D5 E5 F5 G5 A5 B5 C6", tone)
                .line(Part::Harmony, ". . . . . . . .", tone)
                .line(Part::Bass, ". . . . . . . .", tone)
                .groove(Groove::None)
                .build()
                .unwrap(),
        );
        let mut out = CaptureRenderer::new();
        let mut bus = MixBus::new(BusLevels::default());
        bus.install(&mut out, true);
        Self {
            out,
            bus,
            synth: VoiceSynth::default(),
            seq: Sequencer::new(SequencerConfig::default(), tracks),
        }
    }

    /// Tick without advancing the clock.
    fn tick(&mut self, enabled: bool) -> usize {
        let mut cx = Context {
            renderer: &mut self.out,
            bus: &mut self.bus,
            synth: &self.synth,
            enabled,
        };
        self.seq.tick(&mut cx)
    }

    fn start(&mut self) {
        let mut cx = Context {
            renderer: &mut self.out,
            bus: &mut self.bus,
            synth: &self.synth,
            enabled: true,
        };
        self.seq.request_track(&mut cx, Some("pulse"));
    }

    /// Advance the clock by `dt` and tick. Returns the starts of new voices.
    fn step(&mut self, dt: f64) -> Vec<f64> {
        self.out.advance(dt);
        let before = self.out.voices().len();
        let mut cx = Context {
            renderer: &mut self.out,
            bus: &mut self.bus,
            synth: &self.synth,
            enabled: true,
        };
        self.seq.tick(&mut cx);
        self.out.voices()[before..].iter().map(|v| v.start).collect()
    }
}

#[test]
fn random_tick_gaps_never_double_schedule() {
    let mut rng = Pcg32::seed_from_u64(7);
    let mut h = Harness::new();
    h.start();
    let mut starts: Vec<f64> = h.out.voices().iter().map(|v| v.start).collect();

    while h.out.current_time() < 20.0 {
        let gap = rng.random_range(5..60) as f64 / 1000.0;
        let now_before = h.out.current_time() + gap;
        let fresh = h.step(gap);
        for start in &fresh {
            assert!(*start >= now_before, "voice scheduled in the past: {start} < {now_before}");
        }
        starts.extend(fresh);
    }

    assert!(starts.len() > 100);
    for pair in starts.windows(2) {
        let gap = pair[1] - pair[0];
        assert!((gap - STEP).abs() < 1e-9, "uneven step spacing: {gap}");
    }
}

#[test]
fn stall_skips_backlog() {
    let mut h = Harness::new();
    h.start();
    for _ in 0..40 {
        h.step(0.025);
    }
    let cursor_before = h.seq.step_cursor();

    let fresh = h.step(3.0);
    let now = h.out.current_time();
    let config = SequencerConfig::default();
    let window_steps = ((config.schedule_ahead - config.safety_margin) / STEP).ceil() as usize;
    assert!(fresh.len() <= window_steps, "backlog fired: {} voices", fresh.len());
    assert!(!fresh.is_empty());
    assert!(fresh.iter().all(|s| *s >= now + config.safety_margin - 1e-9));
    assert!(h.seq.step_cursor() > cursor_before + (3.0 / STEP) as u64 - 2);

    // Cadence resumes on an even grid from the new position.
    let mut after = fresh;
    for _ in 0..40 {
        after.extend(h.step(0.025));
    }
    for pair in after.windows(2) {
        assert!((pair[1] - pair[0] - STEP).abs() < 1e-9);
    }
}

#[test]
fn disabled_context_schedules_nothing() {
    let mut h = Harness::new();
    h.start();
    let count = h.out.voices().len();
    h.out.advance(1.0);
    assert_eq!(h.tick(false), 0);
    assert_eq!(h.out.voices().len(), count);
}
