//! AudioEngine: the facade game code calls.

use std::time::Instant;

use ct_engine::{
    Context, EffectPlayer, EngineConfig, MixBus, Renderer, Sequencer, Transport, VoiceSynth,
};
use ct_ir::content::{builtin_effects, builtin_tracks};
use ct_ir::{EffectLibrary, TrackError, TrackLibrary};
use tracing::{info, warn};

use crate::settings::{Settings, SettingsStore};

/// Effect played to acknowledge a toggle.
pub const TOGGLE_EFFECT: &str = "toggle";

/// The explicit engine context: everything the public operations touch.
///
/// None of the public operations return errors. Unknown names do nothing,
/// a clock that will not resume stays silent, and while audio is disabled
/// every request is dropped rather than queued.
pub struct AudioEngine<R: Renderer, S: SettingsStore> {
    renderer: R,
    bus: MixBus,
    synth: VoiceSynth,
    effects: EffectPlayer,
    sequencer: Sequencer,
    settings: Settings,
    store: S,
}

impl<R: Renderer, S: SettingsStore> AudioEngine<R, S> {
    /// Build an engine over the given content and install the bus levels.
    pub fn new(
        config: &EngineConfig,
        mut renderer: R,
        tracks: TrackLibrary,
        effects: EffectLibrary,
        settings: Settings,
        store: S,
    ) -> Self {
        let mut bus = MixBus::new(config.bus);
        bus.install(&mut renderer, settings.enabled);
        Self {
            renderer,
            bus,
            synth: VoiceSynth::new(config.synth),
            effects: EffectPlayer::new(effects),
            sequencer: Sequencer::new(config.sequencer.clone(), tracks),
            settings,
            store,
        }
    }

    /// Build an engine over the built-in tracks and effects.
    pub fn builtin(
        config: &EngineConfig,
        renderer: R,
        settings: Settings,
        store: S,
    ) -> Result<Self, TrackError> {
        let tracks = builtin_tracks()?;
        Ok(Self::new(config, renderer, tracks, builtin_effects(), settings, store))
    }

    // --- Public operations ---

    /// Try to wake a suspended clock. Failures are logged and dropped.
    pub fn ensure_ready(&mut self) {
        if !self.renderer.is_suspended() {
            return;
        }
        match self.renderer.resume() {
            Ok(()) => info!("audio clock resumed"),
            Err(err) => warn!(%err, "audio clock resume failed"),
        }
    }

    /// Fire a named one-shot effect. Unknown names and disabled audio do nothing.
    pub fn play_effect(&mut self, name: &str) {
        if !self.settings.enabled {
            return;
        }
        self.ensure_ready();
        self.effects.play(&self.synth, &mut self.renderer, name);
    }

    /// Declare the track that should play; `None` means no music.
    ///
    /// The wish is kept while audio is disabled and honored on re-enable.
    pub fn request_track(&mut self, name: Option<&str>) {
        if self.settings.enabled && name.is_some() {
            self.ensure_ready();
        }
        self.with_sequencer(|seq, cx| seq.request_track(cx, name));
    }

    /// Stop music with an optional fade in seconds, and forget the
    /// desired track so a later toggle does not restart it.
    pub fn stop_music(&mut self, fade: Option<f64>) {
        self.sequencer.clear_desired();
        self.with_sequencer(|seq, cx| seq.stop(cx, fade));
    }

    /// Flip audio on or off.
    ///
    /// Ramps the master bus, persists the flag, reconciles the sequencer,
    /// then plays the acknowledgement effect, in that order.
    pub fn toggle_enabled(&mut self) {
        self.settings.enabled = !self.settings.enabled;
        let enabled = self.settings.enabled;
        info!(enabled, "audio toggled");

        self.bus.set_master(&mut self.renderer, enabled);
        if let Err(err) = self.store.save(&self.settings) {
            warn!(%err, "failed to save settings");
        }
        if enabled {
            self.ensure_ready();
        }
        self.with_sequencer(|seq, cx| seq.reconcile(cx));
        self.play_effect(TOGGLE_EFFECT);
    }

    // --- Driving the tick ---

    /// Run the lookahead tick if it is due at `now`. Call often; at most
    /// one tick runs per call. Returns the number of voices scheduled.
    pub fn update(&mut self, now: Instant) -> usize {
        self.with_sequencer(|seq, cx| seq.poll(cx, now))
    }

    /// Run the lookahead tick unconditionally.
    pub fn tick(&mut self) -> usize {
        self.with_sequencer(|seq, cx| seq.tick(cx))
    }

    // --- Inspection ---

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn effects(&self) -> &EffectLibrary {
        self.effects.library()
    }

    pub fn bus(&self) -> &MixBus {
        &self.bus
    }

    pub fn transport(&self) -> Transport {
        self.sequencer.transport(self.renderer.current_time())
    }

    pub fn into_parts(self) -> (R, S) {
        (self.renderer, self.store)
    }

    fn with_sequencer<T>(
        &mut self,
        f: impl FnOnce(&mut Sequencer, &mut Context<'_, R>) -> T,
    ) -> T {
        let mut cx = Context {
            renderer: &mut self.renderer,
            bus: &mut self.bus,
            synth: &self.synth,
            enabled: self.settings.enabled,
        };
        f(&mut self.sequencer, &mut cx)
    }
}
