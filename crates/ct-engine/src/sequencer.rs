//! Lookahead music sequencer.
//!
//! The sequencer owns the track library and decides what music sounds.
//! A caller declares the track it wants with [`Sequencer::request_track`];
//! [`Sequencer::reconcile`] brings the playing track in line with that
//! wish and the enabled flag. While a track plays, a wall-clock tick
//! ([`Sequencer::poll`] or [`Sequencer::tick`]) schedules every step that
//! falls inside a short horizon past the renderer clock.
//!
//! # Drift correction
//!
//! If ticks stall (a busy host, a suspended process) the step cursor can
//! fall behind the clock. Rather than firing the backlog all at once, the
//! tick skips whole missed steps without sounding them, so at most one
//! step is ever scheduled late.

use std::time::Instant;

use ct_ir::{Part, Track, TrackKey, TrackLibrary};
use tracing::{debug, info};

use crate::bus::MixBus;
use crate::config::SequencerConfig;
use crate::event::{BusId, VoiceEvent};
use crate::percussion::drums;
use crate::renderer::Renderer;
use crate::synth::{ToneRequest, VoiceSynth};
use crate::tick_timer::TickTimer;

/// Most voices one step can produce: four lines and three drums.
pub const MAX_STEP_VOICES: usize = 7;

/// Accent gain at the start of a bar, at full strength.
const BAR_ACCENT: f32 = 0.35;
/// Accent gain at the middle of a bar, at full strength.
const HALF_BAR_ACCENT: f32 = 0.15;

/// Where the sequencer is in its start/stop lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    /// Nothing playing and no fade in flight.
    Stopped,
    /// Tick armed, music fade-in not yet complete.
    Starting,
    /// Tick armed, music at its level.
    Playing,
    /// Tick cancelled, fade-out still sounding.
    Stopping,
}

/// What a tick needs from its surroundings.
pub struct Context<'a, R: ?Sized> {
    pub renderer: &'a mut R,
    pub bus: &'a mut MixBus,
    pub synth: &'a VoiceSynth,
    pub enabled: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct StepCursor {
    /// Steps advanced since the track started.
    step: u64,
    /// Renderer time of the next unscheduled step.
    next_time: f64,
}

pub struct Sequencer {
    config: SequencerConfig,
    tracks: TrackLibrary,
    desired: Option<TrackKey>,
    playing: Option<TrackKey>,
    cursor: StepCursor,
    timer: Option<TickTimer>,
    fade_in_at: f64,
    fade_out_until: Option<f64>,
}

impl Sequencer {
    pub fn new(config: SequencerConfig, tracks: TrackLibrary) -> Self {
        Self {
            config,
            tracks,
            desired: None,
            playing: None,
            cursor: StepCursor::default(),
            timer: None,
            fade_in_at: 0.0,
            fade_out_until: None,
        }
    }

    pub fn tracks(&self) -> &TrackLibrary {
        &self.tracks
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Declare which track should play; `None` means no music.
    ///
    /// Unknown names count as no music.
    pub fn request_track<R: Renderer + ?Sized>(&mut self, cx: &mut Context<'_, R>, name: Option<&str>) {
        self.desired = name.and_then(|name| {
            let key = self.tracks.key(name);
            if key.is_none() {
                debug!(track = name, "unknown track; no music");
            }
            key
        });
        self.reconcile(cx);
    }

    /// Forget the desired track without touching playback.
    pub fn clear_desired(&mut self) {
        self.desired = None;
    }

    /// Bring playback in line with the desired track and the enabled flag.
    pub fn reconcile<R: Renderer + ?Sized>(&mut self, cx: &mut Context<'_, R>) {
        match self.desired {
            Some(key) if cx.enabled => {
                if self.playing != Some(key) || !self.is_ticking() {
                    self.start(cx, key);
                }
            }
            _ => self.stop(cx, None),
        }
    }

    /// Start `key` from step 0 with a fresh fade-in. No-op if it is
    /// already playing.
    pub fn start<R: Renderer + ?Sized>(&mut self, cx: &mut Context<'_, R>, key: TrackKey) {
        if self.playing == Some(key) && self.is_ticking() {
            return;
        }
        let Some(track) = self.tracks.get(key) else {
            return;
        };
        let name = track.name().to_owned();

        if self.playing.is_some() || self.is_ticking() {
            debug!(to = %name, "swapping track");
            self.stop(cx, Some(self.config.swap_fade));
        }

        let now = cx.renderer.current_time();
        let mut fade_in_at = now + self.config.start_delay;
        if let Some(fade_end) = self.fade_out_until {
            fade_in_at = fade_in_at.max(fade_end + self.config.settle_delay);
        }
        cx.bus.fade_music_in(cx.renderer, fade_in_at, self.config.fade_in);

        self.playing = Some(key);
        self.cursor = StepCursor {
            step: 0,
            next_time: fade_in_at,
        };
        self.fade_in_at = fade_in_at;
        self.timer = Some(TickTimer::new(self.config.tick_interval()));
        info!(track = %name, at = fade_in_at, "music start");

        self.tick(cx);
    }

    /// Cancel the tick and fade music out over `fade` seconds (default
    /// from config, never shorter than the configured minimum).
    ///
    /// Voices already scheduled still play out. No-op if already stopped.
    pub fn stop<R: Renderer + ?Sized>(&mut self, cx: &mut Context<'_, R>, fade: Option<f64>) {
        let was_ticking = self.timer.take().is_some();
        if self.playing.is_none() && !was_ticking {
            return;
        }
        let fade = fade
            .unwrap_or(self.config.stop_fade)
            .max(self.config.min_stop_fade);
        let now = cx.renderer.current_time();
        let end = cx.bus.fade_music_out(cx.renderer, now, fade);
        info!(fade, "music stop");

        self.fade_out_until = Some(end);
        self.playing = None;
        self.cursor = StepCursor::default();
    }

    /// Run the tick if its timer is due at `now`. Returns voices scheduled.
    pub fn poll<R: Renderer + ?Sized>(&mut self, cx: &mut Context<'_, R>, now: Instant) -> usize {
        let due = self.timer.as_mut().is_some_and(|timer| timer.poll(now));
        if due {
            self.tick(cx)
        } else {
            0
        }
    }

    /// Schedule every step inside the lookahead horizon. Returns voices scheduled.
    pub fn tick<R: Renderer + ?Sized>(&mut self, cx: &mut Context<'_, R>) -> usize {
        if !cx.enabled {
            return 0;
        }
        let Some(track) = self.playing.and_then(|key| self.tracks.get(key)) else {
            return 0;
        };
        let step_duration = track.step_duration();
        let now = cx.renderer.current_time();
        let schedule_from = now + self.config.safety_margin;

        if self.cursor.next_time < schedule_from - step_duration {
            let missed = ((schedule_from - self.cursor.next_time) / step_duration).floor();
            self.cursor.step += missed as u64;
            self.cursor.next_time += missed * step_duration;
            debug!(missed, step = self.cursor.step, "sequencer behind; skipping steps");
        }
        if self.cursor.next_time < schedule_from {
            self.cursor.next_time = schedule_from;
        }

        let horizon = now + self.config.schedule_ahead;
        let mut scheduled = 0;
        while self.cursor.next_time < horizon {
            let index = (self.cursor.step % track.len() as u64) as usize;
            let voices = schedule_step(
                &self.config,
                cx.synth,
                cx.renderer,
                track,
                index,
                self.cursor.next_time,
            );
            scheduled += voices.len();
            self.cursor.step += 1;
            self.cursor.next_time += step_duration;
        }
        scheduled
    }

    pub fn transport(&self, now: f64) -> Transport {
        match (&self.timer, self.fade_out_until) {
            (Some(_), _) if now < self.fade_in_at + self.config.fade_in => Transport::Starting,
            (Some(_), _) => Transport::Playing,
            (None, Some(end)) if now < end => Transport::Stopping,
            (None, _) => Transport::Stopped,
        }
    }

    /// Returns true while the lookahead tick is armed.
    pub fn is_ticking(&self) -> bool {
        self.timer.is_some()
    }

    pub fn desired_track(&self) -> Option<TrackKey> {
        self.desired
    }

    pub fn playing_track(&self) -> Option<TrackKey> {
        self.playing
    }

    /// Steps advanced since the current track started.
    pub fn step_cursor(&self) -> u64 {
        self.cursor.step
    }

    /// Renderer time of the next unscheduled step.
    pub fn next_step_time(&self) -> f64 {
        self.cursor.next_time
    }
}

/// Accent multiplier for the melody at `position` within a bar.
pub fn accent(position: usize, steps_per_bar: usize, strength: f32) -> f32 {
    if position == 0 {
        1.0 + BAR_ACCENT * strength
    } else if steps_per_bar % 2 == 0 && position == steps_per_bar / 2 {
        1.0 + HALF_BAR_ACCENT * strength
    } else {
        1.0
    }
}

/// Schedule all voices of one step at `time`.
fn schedule_step<R: Renderer + ?Sized>(
    config: &SequencerConfig,
    synth: &VoiceSynth,
    out: &mut R,
    track: &Track,
    index: usize,
    time: f64,
) -> heapless::Vec<VoiceEvent, MAX_STEP_VOICES> {
    let mut voices = heapless::Vec::new();
    let step_duration = track.step_duration();
    let note_length = track.dur_factor().unwrap_or(config.note_length) as f64;
    let arp_length = track.arp_dur_factor().unwrap_or(config.arp_note_length) as f64;
    let position = index % track.steps_per_bar();
    let accent = accent(position, track.steps_per_bar(), track.accent_strength());

    for (part, line) in track.lines() {
        let Some(pitch) = line.steps[index].pitch() else {
            continue;
        };
        let (length, gain) = match part {
            Part::Melody => (note_length, line.timbre.gain * accent),
            Part::Arp => (arp_length, line.timbre.gain),
            Part::Harmony | Part::Bass => (note_length, line.timbre.gain),
        };
        let event = synth.tone(
            out,
            ToneRequest {
                waveform: line.timbre.waveform,
                freq: ct_ir::pitch_to_freq(pitch),
                end_freq: None,
                start: time,
                duration: step_duration * length,
                gain,
                bus: BusId::Music,
            },
        );
        let _ = voices.push(event);
    }

    for drum in drums(track.groove().hits(position)) {
        let _ = voices.push(drum.schedule(synth, out, time));
    }
    voices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureRenderer;
    use crate::config::BusLevels;
    use ct_ir::content::builtin_tracks;
    use ct_ir::{Groove, Timbre, TrackBuilder, Waveform};
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    struct Rig {
        out: CaptureRenderer,
        bus: MixBus,
        synth: VoiceSynth,
        seq: Sequencer,
        enabled: bool,
    }

    impl Rig {
        fn new(tracks: TrackLibrary) -> Self {
            let mut out = CaptureRenderer::new();
            let mut bus = MixBus::new(BusLevels::default());
            bus.install(&mut out, true);
            Self {
                out,
                bus,
                synth: VoiceSynth::default(),
                seq: Sequencer::new(SequencerConfig::default(), tracks),
                enabled: true,
            }
        }

        fn builtin() -> Self {
            Self::new(builtin_tracks().unwrap())
        }

        fn with<T>(&mut self, f: impl FnOnce(&mut Sequencer, &mut Context<'_, CaptureRenderer>) -> T) -> T {
            let mut cx = Context {
                renderer: &mut self.out,
                bus: &mut self.bus,
                synth: &self.synth,
                enabled: self.enabled,
            };
            f(&mut self.seq, &mut cx)
        }

        fn request(&mut self, name: Option<&str>) {
            self.with(|seq, cx| seq.request_track(cx, name));
        }

        fn tick(&mut self) -> usize {
            self.with(|seq, cx| seq.tick(cx))
        }

        fn poll(&mut self, now: Instant) -> usize {
            self.with(|seq, cx| seq.poll(cx, now))
        }
    }

    fn melody_only(bpm: f64) -> TrackLibrary {
        let tone = Timbre::new(Waveform::Square, 0.2);
        let mut lib = TrackLibrary::new();
        lib.insert(
            TrackBuilder::new("m")
                .bpm(bpm)
                .line(Part::Melody, "C5 C5 C5 C5 C5 C5 C5 C5", tone)
                .line(Part::Harmony, ". . . . . . . .", tone)
                .line(Part::Bass, ". . . . . . . .", tone)
                .groove(Groove::None)
                .build()
                .unwrap(),
        );
        lib
    }

    #[test]
    fn accent_pattern() {
        assert!((accent(0, 8, 1.0) - 1.35).abs() < 1e-6);
        assert!((accent(4, 8, 1.0) - 1.15).abs() < 1e-6);
        assert_eq!(accent(3, 8, 1.0), 1.0);
        assert_eq!(accent(0, 8, 0.0), 1.0);
        assert!((accent(6, 12, 0.5) - 1.075).abs() < 1e-6);
    }

    #[test]
    fn first_tick_schedules_lookahead_window() {
        let mut rig = Rig::new(melody_only(168.0));
        rig.request(Some("m"));
        // 0.05 start, 0.1786 per step, 0.35 horizon: steps 0 and 1
        assert_eq!(rig.seq.step_cursor(), 2);
        let starts: Vec<f64> = rig.out.voices().iter().map(|v| v.start).collect();
        assert_eq!(starts.len(), 2);
        assert!((starts[1] - starts[0] - 60.0 / 168.0 / 2.0).abs() < 1e-9);
    }

    #[test]
    fn step_zero_gets_bar_accent() {
        let mut rig = Rig::new(melody_only(168.0));
        rig.request(Some("m"));
        let peaks: Vec<f32> = rig.out.voices().iter().map(|v| v.envelope.peak).collect();
        assert!((peaks[0] - 0.2 * 1.35).abs() < 1e-6);
        assert!((peaks[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn idempotent_start() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        let voices = rig.out.voices().len();
        let automation = rig.out.automation().len();
        rig.request(Some("overworld"));
        assert_eq!(rig.out.voices().len(), voices);
        assert_eq!(rig.out.automation().len(), automation);
    }

    #[test]
    fn unknown_track_stops_music() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        assert!(rig.seq.is_ticking());
        rig.request(Some("no_such_track"));
        assert!(!rig.seq.is_ticking());
        assert_eq!(rig.seq.desired_track(), None);
    }

    #[test]
    fn tick_without_track_is_noop() {
        let mut rig = Rig::builtin();
        assert_eq!(rig.tick(), 0);
        assert!(rig.out.voices().is_empty());
    }

    #[test]
    fn disabled_tick_does_not_advance() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        let cursor = rig.seq.step_cursor();
        rig.enabled = false;
        rig.out.advance(1.0);
        assert_eq!(rig.tick(), 0);
        assert_eq!(rig.seq.step_cursor(), cursor);
    }

    #[test]
    fn stall_skips_missed_steps() {
        let mut rig = Rig::new(melody_only(168.0));
        rig.request(Some("m"));
        let step = 60.0 / 168.0 / 2.0;
        rig.out.set_time(10.0);
        let before = rig.out.voices().len();
        rig.tick();
        let now = 10.0;
        // post-correction cursor lands within one step of the clock
        let first_new = rig.out.voices()[before].start;
        assert!(first_new >= now && first_new < now + step);
        // only the lookahead window is scheduled, not the backlog
        let new = rig.out.voices().len() - before;
        assert!(new <= 3, "scheduled {} voices after stall", new);
    }

    #[test]
    fn steps_advance_by_exact_duration() {
        let mut rig = Rig::new(melody_only(168.0));
        rig.request(Some("m"));
        for _ in 0..40 {
            rig.out.advance(0.025);
            rig.tick();
        }
        let starts: Vec<f64> = rig.out.voices().iter().map(|v| v.start).collect();
        let step = 60.0 / 168.0 / 2.0;
        for w in starts.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-9);
        }
    }

    #[test]
    fn poll_without_track_never_ticks() {
        let mut rig = Rig::builtin();
        let t0 = Instant::now();
        for i in 0..20 {
            rig.out.advance(0.025);
            assert_eq!(rig.poll(t0 + i * 25 * MS), 0);
        }
        assert!(rig.out.voices().is_empty());
    }

    #[test]
    fn poll_after_stop_never_ticks() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        rig.request(None);
        assert!(!rig.seq.is_ticking());
        let voices = rig.out.voices().len();
        let t0 = Instant::now();
        for i in 0..20 {
            rig.out.advance(0.025);
            assert_eq!(rig.poll(t0 + i * 25 * MS), 0);
        }
        assert_eq!(rig.out.voices().len(), voices);
        assert_eq!(rig.seq.step_cursor(), 0);
    }

    #[test]
    fn first_poll_after_start_does_not_reschedule() {
        let mut rig = Rig::new(melody_only(168.0));
        rig.request(Some("m"));
        let cursor = rig.seq.step_cursor();
        let voices = rig.out.voices().len();
        assert_eq!(rig.poll(Instant::now()), 0);
        assert_eq!(rig.seq.step_cursor(), cursor);
        assert_eq!(rig.out.voices().len(), voices);
    }

    #[test]
    fn polls_faster_than_interval_schedule_nothing() {
        let mut rig = Rig::new(melody_only(168.0));
        rig.request(Some("m"));
        let t0 = Instant::now();
        rig.poll(t0);
        let cursor = rig.seq.step_cursor();

        // the clock has moved far enough for a step, but the timer is not due
        rig.out.advance(0.2);
        assert_eq!(rig.poll(t0 + 10 * MS), 0);
        assert_eq!(rig.poll(t0 + 24 * MS), 0);
        assert_eq!(rig.seq.step_cursor(), cursor);

        assert!(rig.poll(t0 + 25 * MS) > 0);
        assert!(rig.seq.step_cursor() > cursor);
    }

    #[test]
    fn polled_steps_stay_evenly_spaced() {
        let mut rig = Rig::new(melody_only(168.0));
        rig.request(Some("m"));
        let t0 = Instant::now();
        // 5 ms polls against a 25 ms timer, clock following the wall clock
        for i in 0..400u32 {
            rig.out.set_time(i as f64 * 0.005);
            rig.poll(t0 + i * 5 * MS);
        }
        let starts: Vec<f64> = rig.out.voices().iter().map(|v| v.start).collect();
        assert!(starts.len() > 10);
        let step = 60.0 / 168.0 / 2.0;
        for w in starts.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-9);
        }
    }

    #[test]
    fn stop_is_idempotent() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        rig.with(|seq, cx| seq.stop(cx, None));
        let automation = rig.out.automation().len();
        rig.with(|seq, cx| seq.stop(cx, None));
        assert_eq!(rig.out.automation().len(), automation);
        assert_eq!(rig.seq.playing_track(), None);
        assert_eq!(rig.seq.step_cursor(), 0);
    }

    #[test]
    fn stop_fade_has_minimum() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        rig.out.set_time(1.0);
        rig.with(|seq, cx| seq.stop(cx, Some(0.0)));
        assert_eq!(rig.seq.transport(1.019), Transport::Stopping);
        assert_eq!(rig.seq.transport(1.021), Transport::Stopped);
    }

    #[test]
    fn transport_lifecycle() {
        let mut rig = Rig::builtin();
        assert_eq!(rig.seq.transport(0.0), Transport::Stopped);
        rig.request(Some("overworld"));
        assert_eq!(rig.seq.transport(0.0), Transport::Starting);
        assert_eq!(rig.seq.transport(0.5), Transport::Playing);
        rig.out.set_time(2.0);
        rig.request(None);
        assert_eq!(rig.seq.transport(2.05), Transport::Stopping);
        assert_eq!(rig.seq.transport(3.0), Transport::Stopped);
    }

    #[test]
    fn swap_waits_for_fade_to_settle() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        rig.out.set_time(2.0);
        rig.request(Some("cavern"));
        let cavern = rig.seq.tracks().key("cavern");
        assert_eq!(rig.seq.playing_track(), cavern);
        assert!(rig.seq.step_cursor() > 0);
        // swap fade 0.04 + settle 0.03 beats start delay 0.05
        let first_cavern = rig
            .out
            .voices()
            .iter()
            .map(|v| v.start)
            .filter(|&t| t > 2.0)
            .fold(f64::INFINITY, f64::min);
        assert!((first_cavern - 2.07).abs() < 1e-9);
    }

    #[test]
    fn grooves_add_percussion() {
        let mut rig = Rig::builtin();
        rig.request(Some("overworld"));
        let noise = rig
            .out
            .voices()
            .iter()
            .filter(|v| matches!(v.source, crate::event::VoiceSource::Noise { .. }))
            .count();
        assert!(noise > 0);
    }
}
