//! Offline rendering of tracks to frames and WAV files.

use std::path::Path;

use ct_engine::{EngineConfig, Frame, Mixer};
use ct_ir::TrackError;
use thiserror::Error;
use tracing::info;

use crate::engine::AudioEngine;
use crate::settings::{NullStore, Settings};
use crate::wav::save_wav;

#[derive(Debug, Error)]
pub enum OfflineError {
    #[error("unknown track: {0}")]
    UnknownTrack(String),
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("failed to write WAV: {0}")]
    Io(#[from] std::io::Error),
}

/// Render `seconds` of a built-in track.
///
/// The engine runs against a [`Mixer`] whose clock is the frame count;
/// the lookahead tick fires once per tick interval of rendered audio.
pub fn render_track(
    config: &EngineConfig,
    track: &str,
    seconds: f64,
    sample_rate: u32,
) -> Result<Vec<Frame>, OfflineError> {
    let mut engine = AudioEngine::builtin(
        config,
        Mixer::new(sample_rate),
        Settings::default(),
        NullStore,
    )?;
    if engine.sequencer().tracks().key(track).is_none() {
        return Err(OfflineError::UnknownTrack(track.to_owned()));
    }
    engine.request_track(Some(track));

    let total = (seconds.max(0.0) * sample_rate as f64) as usize;
    let tick_frames =
        (config.sequencer.tick_interval().as_secs_f64() * sample_rate as f64).round().max(1.0) as usize;
    let mut frames = vec![Frame::silence(); total];
    for chunk in frames.chunks_mut(tick_frames) {
        engine.renderer_mut().render(chunk);
        engine.tick();
    }
    info!(track, frames = frames.len(), "rendered");
    Ok(frames)
}

/// Render a built-in track straight to a WAV file.
pub fn render_track_to_wav(
    config: &EngineConfig,
    track: &str,
    seconds: f64,
    sample_rate: u32,
    path: &Path,
) -> Result<(), OfflineError> {
    let frames = render_track(config, track, seconds, sample_rate)?;
    save_wav(path, &frames, sample_rate)?;
    Ok(())
}
