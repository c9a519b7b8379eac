//! chiptide CLI: list content, play live, render to WAV, trace scheduling.
//!
//! Usage:
//!   ct-cli list
//!   ct-cli play overworld --seconds 10
//!   ct-cli sfx coin
//!   ct-cli render boss --out boss.wav
//!   ct-cli trace title --seconds 2

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use ct_engine::{BusId, VoiceSource};
use ct_master::{
    AudioEngine, CaptureRenderer, EngineConfig, NullStore, Renderer, Settings, StreamRenderer,
    TomlSettingsStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ct-cli", version, about = "Procedural chiptune audio engine")]
struct Cli {
    /// TOML file overriding engine timing and level constants
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List built-in tracks and effects
    List,
    /// Play a track on the default output device
    Play {
        track: String,
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,
    },
    /// Play a one-shot effect on the default output device
    Sfx { name: String },
    /// Render a track to a WAV file
    Render {
        track: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 30.0)]
        seconds: f64,
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,
    },
    /// Print the voices a track schedules
    Trace {
        track: String,
        #[arg(long, default_value_t = 2.0)]
        seconds: f64,
    },
    /// Flip the persisted audio enabled flag
    Toggle,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::List => list(&config),
        Command::Play { track, seconds } => play(&config, &track, seconds),
        Command::Sfx { name } => sfx(&config, &name),
        Command::Render {
            track,
            out,
            seconds,
            sample_rate,
        } => {
            ct_master::render_track_to_wav(&config, &track, seconds, sample_rate, &out)?;
            println!("Wrote {}", out.display());
            Ok(())
        }
        Command::Trace { track, seconds } => trace(&config, &track, seconds),
        Command::Toggle => toggle(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))?;
    info!(path = %path.display(), "loaded config");
    Ok(config)
}

fn list(config: &EngineConfig) -> Result<()> {
    let engine = AudioEngine::builtin(config, CaptureRenderer::new(), Settings::default(), NullStore)?;
    println!("Tracks:");
    for name in engine.sequencer().tracks().names() {
        if let Some(track) = engine.sequencer().tracks().by_name(name) {
            println!(
                "  {:<16} {:>5.0} BPM  {:>2} steps  {:?}",
                name,
                track.bpm(),
                track.len(),
                track.groove()
            );
        }
    }
    println!("Effects:");
    for name in engine.effects().names() {
        println!("  {name}");
    }
    Ok(())
}

/// Open the live engine with the persisted settings.
fn live_engine(config: &EngineConfig) -> Result<AudioEngine<StreamRenderer, TomlSettingsStore>> {
    let store = TomlSettingsStore::default_location()?;
    let settings = store.load()?;
    if !settings.enabled {
        println!("Audio is disabled; run `ct-cli toggle` to enable it.");
    }
    let renderer = StreamRenderer::open()?;
    Ok(AudioEngine::builtin(config, renderer, settings, store)?)
}

fn play(config: &EngineConfig, track: &str, seconds: f64) -> Result<()> {
    let mut engine = live_engine(config)?;
    if engine.sequencer().tracks().key(track).is_none() {
        bail!("unknown track: {track}");
    }
    engine.ensure_ready();
    engine.request_track(Some(track));

    let deadline = Instant::now() + Duration::from_secs_f64(seconds.max(0.0));
    while Instant::now() < deadline {
        engine.update(Instant::now());
        std::thread::sleep(Duration::from_millis(5));
    }

    let fade = config.sequencer.stop_fade;
    engine.stop_music(None);
    std::thread::sleep(Duration::from_secs_f64(fade + 0.1));
    Ok(())
}

fn sfx(config: &EngineConfig, name: &str) -> Result<()> {
    let mut engine = live_engine(config)?;
    let Some(length) = engine.effects().get(name).map(|spec| spec.length()) else {
        bail!("unknown effect: {name}");
    };
    engine.play_effect(name);
    std::thread::sleep(Duration::from_secs_f64(length + 0.2));
    Ok(())
}

fn trace(config: &EngineConfig, track: &str, seconds: f64) -> Result<()> {
    let mut engine = AudioEngine::builtin(config, CaptureRenderer::new(), Settings::default(), NullStore)?;
    if engine.sequencer().tracks().key(track).is_none() {
        bail!("unknown track: {track}");
    }
    engine.request_track(Some(track));

    let dt = config.sequencer.tick_interval().as_secs_f64();
    while engine.renderer().current_time() < seconds {
        engine.renderer_mut().advance(dt);
        engine.tick();
    }

    println!("{:>9}  {:<7}  {:<24}  {:>6}  {:>6}", "start", "bus", "source", "peak", "dur");
    for voice in engine.renderer().voices() {
        let bus = match voice.bus {
            BusId::Master => "master",
            BusId::Music => "music",
            BusId::Effects => "effects",
        };
        let source = match voice.source {
            VoiceSource::Tone { waveform, freq } => format!("{waveform:?} {:.1} Hz", freq.start),
            VoiceSource::Noise { filter, cutoff, .. } => format!("noise {filter:?} {cutoff:.0} Hz"),
        };
        println!(
            "{:>9.4}  {:<7}  {:<24}  {:>6.3}  {:>6.3}",
            voice.start,
            bus,
            source,
            voice.envelope.peak,
            voice.duration()
        );
    }
    Ok(())
}

fn toggle(config: &EngineConfig) -> Result<()> {
    let store = TomlSettingsStore::default_location()?;
    let path = store.path().to_owned();
    let settings = store.load()?;
    let mut engine = AudioEngine::builtin(config, CaptureRenderer::new(), settings, store)?;
    engine.toggle_enabled();
    let enabled = TomlSettingsStore::new(&path).load()?.enabled;
    println!(
        "Audio {} ({})",
        if enabled { "enabled" } else { "disabled" },
        path.display()
    );
    Ok(())
}
