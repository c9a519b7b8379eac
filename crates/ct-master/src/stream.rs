//! StreamRenderer: live output through the CPAL backend.
//!
//! A dedicated audio thread owns a [`Mixer`] and the device output. The
//! control side hands voices and automation over through a lock-free ring
//! buffer and reads the clock from an atomic frame counter, so neither
//! side ever waits on a lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::Duration;

use ct_audio::{AudioError, AudioOutput, CpalOutput};
use ct_engine::{Automation, BusId, Frame, Mixer, RenderError, Renderer, VoiceEvent};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use tracing::{debug, error, info, warn};

/// Pending commands the control side can queue before blocking.
const COMMAND_CAPACITY: usize = 4096;
/// Frames rendered between command drains.
const BLOCK_FRAMES: usize = 256;
/// How long a suspended audio thread sleeps between checks.
const SUSPENDED_PARK: Duration = Duration::from_millis(5);

enum Command {
    Voice(VoiceEvent),
    Automate(BusId, Automation),
}

struct Shared {
    /// Frames rendered by the mixer; the clock.
    frames: AtomicU64,
    resumed: AtomicBool,
    shutdown: AtomicBool,
    /// Set once the audio thread has exited.
    exited: AtomicBool,
}

/// A [`Renderer`] backed by the default output device.
///
/// The clock starts suspended and stands still until [`Renderer::resume`]
/// is called.
pub struct StreamRenderer {
    commands: HeapProd<Command>,
    shared: Arc<Shared>,
    sample_rate: u32,
    thread: Option<JoinHandle<()>>,
}

impl StreamRenderer {
    /// Open the default output device and start the audio thread.
    pub fn open() -> Result<Self, AudioError> {
        let (commands, consumer) = HeapRb::<Command>::new(COMMAND_CAPACITY).split();
        let shared = Arc::new(Shared {
            frames: AtomicU64::new(0),
            resumed: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            exited: AtomicBool::new(false),
        });
        let (init_tx, init_rx) = mpsc::sync_channel(1);

        let thread_shared = shared.clone();
        let thread = std::thread::Builder::new()
            .name("ct-audio".into())
            .spawn(move || audio_thread(consumer, thread_shared, init_tx))
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let sample_rate = match init_rx.recv() {
            Ok(Ok(rate)) => rate,
            Ok(Err(err)) => {
                let _ = thread.join();
                return Err(err);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(AudioError::DeviceInit("audio thread exited".into()));
            }
        };
        info!(sample_rate, "audio stream opened");

        Ok(Self {
            commands,
            shared,
            sample_rate,
            thread: Some(thread),
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn send(&mut self, mut cmd: Command) {
        loop {
            match self.commands.try_push(cmd) {
                Ok(()) => {
                    self.wake();
                    return;
                }
                Err(back) => {
                    if self.shared.exited.load(Ordering::Acquire) {
                        warn!("audio thread gone; dropping command");
                        return;
                    }
                    cmd = back;
                    self.wake();
                    std::thread::yield_now();
                }
            }
        }
    }

    fn wake(&self) {
        if let Some(ref thread) = self.thread {
            thread.thread().unpark();
        }
    }
}

impl Renderer for StreamRenderer {
    fn current_time(&self) -> f64 {
        self.shared.frames.load(Ordering::Acquire) as f64 / self.sample_rate as f64
    }

    fn is_suspended(&self) -> bool {
        !self.shared.resumed.load(Ordering::Acquire) || self.shared.exited.load(Ordering::Acquire)
    }

    fn resume(&mut self) -> Result<(), RenderError> {
        if self.shared.exited.load(Ordering::Acquire) {
            return Err(RenderError::Resume("audio thread is not running".into()));
        }
        self.shared.resumed.store(true, Ordering::Release);
        self.wake();
        Ok(())
    }

    fn play_voice(&mut self, voice: VoiceEvent) {
        self.send(Command::Voice(voice));
    }

    fn automate(&mut self, bus: BusId, automation: Automation) {
        self.send(Command::Automate(bus, automation));
    }
}

impl Drop for StreamRenderer {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.wake();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

fn audio_thread(
    mut commands: HeapCons<Command>,
    shared: Arc<Shared>,
    init: mpsc::SyncSender<Result<u32, AudioError>>,
) {
    let mut output = match open_output() {
        Ok(output) => output,
        Err(err) => {
            shared.exited.store(true, Ordering::Release);
            let _ = init.send(Err(err));
            return;
        }
    };
    let sample_rate = output.sample_rate();
    let _ = init.send(Ok(sample_rate));

    let mut mixer = Mixer::new(sample_rate);
    let mut block = [Frame::silence(); BLOCK_FRAMES];
    let mut started = false;

    while !shared.shutdown.load(Ordering::Acquire) {
        while let Some(cmd) = commands.try_pop() {
            match cmd {
                Command::Voice(voice) => mixer.play_voice(voice),
                Command::Automate(bus, automation) => mixer.automate(bus, automation),
            }
        }

        if !shared.resumed.load(Ordering::Acquire) {
            std::thread::park_timeout(SUSPENDED_PARK);
            continue;
        }
        if !started {
            if let Err(err) = output.start() {
                error!(%err, "failed to start output stream");
                break;
            }
            started = true;
            debug!("output stream started");
        }

        mixer.render(&mut block);
        for frame in block {
            output.write_spin(frame);
        }
        shared.frames.store(mixer.frames_rendered(), Ordering::Release);
    }

    if started {
        let _ = output.stop();
    }
    shared.exited.store(true, Ordering::Release);
}

fn open_output() -> Result<CpalOutput, AudioError> {
    let (mut output, consumer) = CpalOutput::new()?;
    output.build_stream(consumer)?;
    Ok(output)
}
