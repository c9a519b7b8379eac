//! Mixer: the reference renderer.
//!
//! Owns a sample clock, the pending voice queue, the voice pool, and one
//! gain timeline per bus. Each frame activates due voices, sums them per
//! bus, applies bus gains, and soft-clips to a 16-bit [`Frame`].
//!
//! Rendering never allocates. Handing over voices and automation does not
//! allocate either while the queue and bus timelines stay within their
//! reserved capacity; housekeeping drops consumed entries, so steady
//! playback stays far below it. A burst larger than the reservation grows
//! the storage once.

use crate::automation::{Automation, ParamTimeline};
use crate::event::{BusId, VoiceEvent};
use crate::event_queue::EventQueue;
use crate::frame::Frame;
use crate::noise::NoiseBuffer;
use crate::renderer::Renderer;
use crate::voice::Voice;
use crate::voice_pool::VoicePool;

/// Frames between housekeeping passes.
const HOUSEKEEPING_INTERVAL: u32 = 1024;
/// Pending voices the queue holds before it has to grow.
const QUEUE_CAPACITY: usize = 4096;
/// Automation points each bus holds before it has to grow.
const BUS_CAPACITY: usize = 256;

/// Software renderer producing interleaved-ready stereo frames.
pub struct Mixer {
    sample_rate: u32,
    /// Frames rendered so far; the clock.
    frame: u64,
    queue: EventQueue,
    pool: VoicePool,
    noise: NoiseBuffer,
    buses: [ParamTimeline; 3],
    since_housekeeping: u32,
}

impl Mixer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            frame: 0,
            queue: EventQueue::with_capacity(QUEUE_CAPACITY),
            pool: VoicePool::new(),
            noise: NoiseBuffer::new(sample_rate),
            buses: [
                ParamTimeline::with_capacity(1.0, BUS_CAPACITY),
                ParamTimeline::with_capacity(1.0, BUS_CAPACITY),
                ParamTimeline::with_capacity(1.0, BUS_CAPACITY),
            ],
            since_housekeeping: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Frames rendered since creation.
    pub fn frames_rendered(&self) -> u64 {
        self.frame
    }

    /// Voices currently occupying the pool.
    pub fn voice_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Voices handed over but not yet started.
    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    /// Gain of `bus` at time `t`.
    pub fn bus_gain(&self, bus: BusId, t: f64) -> f32 {
        self.buses[bus.index()].value_at(t)
    }

    /// Render a single frame and advance the clock.
    pub fn render_frame(&mut self) -> Frame {
        let dt = 1.0 / self.sample_rate as f64;
        let t = self.frame as f64 * dt;

        // 1. Activate voices whose start has arrived
        let due = self.queue.drain_until(t);
        for i in due {
            if let Some(event) = self.queue.get(i) {
                let voice = Voice::new(*event, self.sample_rate);
                self.pool.allocate(voice);
            }
        }

        // 2. Sum voices per bus and apply bus gains
        let (music, effects) = self.pool.render_all(t, dt, &self.noise);
        let master = self.buses[BusId::Master.index()].value_at(t);
        let music_gain = self.buses[BusId::Music.index()].value_at(t);
        let effects_gain = self.buses[BusId::Effects.index()].value_at(t);
        let mixed = (music * music_gain + effects * effects_gain) * master;

        // 3. Advance the clock
        self.frame += 1;
        self.since_housekeeping += 1;
        if self.since_housekeeping >= HOUSEKEEPING_INTERVAL {
            self.since_housekeeping = 0;
            self.housekeeping(t);
        }

        Frame::from_f32(mixed.tanh())
    }

    /// Fill `out` with rendered frames.
    pub fn render(&mut self, out: &mut [Frame]) {
        for frame in out {
            *frame = self.render_frame();
        }
    }

    /// Render `count` frames into a new buffer.
    pub fn render_frames(&mut self, count: usize) -> Vec<Frame> {
        let mut out = vec![Frame::silence(); count];
        self.render(&mut out);
        out
    }

    fn housekeeping(&mut self, t: f64) {
        self.queue.compact();
        self.pool.reap_finished();
        for bus in &mut self.buses {
            bus.prune_before(t);
        }
    }
}

impl Renderer for Mixer {
    fn current_time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    fn play_voice(&mut self, voice: VoiceEvent) {
        self.queue.push(voice);
    }

    fn automate(&mut self, bus: BusId, automation: Automation) {
        self.buses[bus.index()].apply(automation);
    }
}
