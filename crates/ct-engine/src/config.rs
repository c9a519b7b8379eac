//! Timing and level constants.
//!
//! Every value has a working default; a TOML file only needs to name the
//! fields it changes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// All tunable engine constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sequencer: SequencerConfig,
    pub synth: SynthConfig,
    pub bus: BusLevels,
}

/// Lookahead, fades, and note lengths for music playback. Times in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Wall-clock cadence of the lookahead tick, in milliseconds.
    pub tick_interval_ms: u64,
    /// How far past the clock each tick schedules.
    pub schedule_ahead: f64,
    /// Steps are never scheduled earlier than this past the clock.
    pub safety_margin: f64,
    /// Delay from a start request to the first step.
    pub start_delay: f64,
    /// Gap between the end of a stop fade and the next fade-in.
    pub settle_delay: f64,
    pub fade_in: f64,
    /// Fade-out used when one track replaces another.
    pub swap_fade: f64,
    /// Fade-out used by a stop without an explicit fade.
    pub stop_fade: f64,
    /// Shortest allowed stop fade.
    pub min_stop_fade: f64,
    /// Note length as a fraction of a step, unless the track overrides it.
    pub note_length: f32,
    /// Arp note length as a fraction of a step, unless the track overrides it.
    pub arp_note_length: f32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 25,
            schedule_ahead: 0.35,
            safety_margin: 0.006,
            start_delay: 0.05,
            settle_delay: 0.03,
            fade_in: 0.12,
            swap_fade: 0.04,
            stop_fade: 0.12,
            min_stop_fade: 0.02,
            note_length: 0.9,
            arp_note_length: 0.5,
        }
    }
}

/// Voice construction constants. Times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Gain every envelope starts and ends on; exponential ramps cannot reach zero.
    pub silent_gain: f32,
    /// Voices never start sooner than this past the clock.
    pub start_epsilon: f64,
    /// Extra time a voice runs after its envelope ends.
    pub voice_tail: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            silent_gain: 0.0001,
            start_epsilon: 0.004,
            voice_tail: 0.025,
        }
    }
}

/// Bus gain levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusLevels {
    /// Master gain while audio is enabled.
    pub master: f32,
    /// Master gain while muted.
    pub muted: f32,
    pub music: f32,
    pub effects: f32,
    /// Seconds the master bus takes to reach a new level when toggled.
    pub toggle_ramp: f64,
}

impl Default for BusLevels {
    fn default() -> Self {
        Self {
            master: 0.9,
            muted: 0.0001,
            music: 0.35,
            effects: 0.7,
            toggle_ramp: 0.08,
        }
    }
}

impl SequencerConfig {
    /// Wall-clock time between lookahead ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.sequencer.tick_interval(), Duration::from_millis(25));
        assert!((config.sequencer.schedule_ahead - 0.35).abs() < f64::EPSILON);
        assert!((config.bus.master - 0.9).abs() < f32::EPSILON);
        assert!(config.bus.muted > 0.0);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [sequencer]
            schedule_ahead = 0.5

            [bus]
            music = 0.2
            "#,
        )
        .unwrap();
        assert!((config.sequencer.schedule_ahead - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.sequencer.tick_interval_ms, 25);
        assert!((config.bus.music - 0.2).abs() < f32::EPSILON);
        assert!((config.bus.effects - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.synth, SynthConfig::default());
    }

    #[test]
    fn empty_toml_is_default() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
