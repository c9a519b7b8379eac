//! Playback engine for the chiptide audio engine.
//!
//! Turns track and effect data into timed voices and bus automation,
//! hands them to a [`Renderer`], and provides [`Mixer`], a software
//! renderer that turns them into frames.

mod automation;
mod bus;
mod capture;
mod config;
mod effects;
mod event;
mod event_queue;
mod filter;
mod frame;
mod mixer;
mod noise;
mod percussion;
mod renderer;
pub mod sequencer;
mod synth;
mod tick_timer;
mod voice;
mod voice_pool;

pub use automation::{Automation, ParamTimeline};
pub use bus::MixBus;
pub use capture::CaptureRenderer;
pub use config::{BusLevels, EngineConfig, SequencerConfig, SynthConfig};
pub use effects::EffectPlayer;
pub use event::{BusId, FilterKind, FreqCurve, GainEnvelope, VoiceEvent, VoiceSource};
pub use event_queue::EventQueue;
pub use filter::Biquad;
pub use frame::Frame;
pub use mixer::Mixer;
pub use noise::{NoiseBuffer, NOISE_SEED};
pub use percussion::{drums, Drum};
pub use renderer::{RenderError, Renderer};
pub use sequencer::{accent, Context, Sequencer, Transport, MAX_STEP_VOICES};
pub use synth::{attack_time, NoiseRequest, ToneRequest, VoiceSynth};
pub use tick_timer::TickTimer;
pub use voice::{oscillator, Voice};
pub use voice_pool::{VoiceId, VoicePool, MAX_VOICES};
