//! Engine facade and host integration for the chiptide audio engine.
//!
//! [`AudioEngine`] is the one object game code talks to. It owns the mix
//! bus, the effect player, the sequencer, and the settings record, and
//! drives any [`Renderer`]: [`StreamRenderer`] for live output, `Mixer`
//! for offline rendering, `CaptureRenderer` for inspection.

mod engine;
mod offline;
mod settings;
mod stream;
mod wav;

// Re-export common types so callers don't need ct-ir/ct-engine directly.
pub use ct_engine::{CaptureRenderer, EngineConfig, Frame, Mixer, Renderer, Transport};
pub use ct_ir::{EffectLibrary, TrackError, TrackLibrary};

pub use engine::{AudioEngine, TOGGLE_EFFECT};
pub use offline::{render_track, render_track_to_wav, OfflineError};
pub use settings::{NullStore, Settings, SettingsError, SettingsStore, TomlSettingsStore};
pub use stream::StreamRenderer;
pub use wav::{frames_to_wav, save_wav, write_wav};
