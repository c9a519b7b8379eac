//! A renderer that records instead of sounding.

use crate::automation::{Automation, ParamTimeline};
use crate::event::{BusId, VoiceEvent};
use crate::renderer::{RenderError, Renderer};

/// Manually clocked renderer that keeps everything handed to it.
///
/// Useful for inspecting what the engine schedules and when.
#[derive(Clone, Debug, Default)]
pub struct CaptureRenderer {
    time: f64,
    suspended: bool,
    fail_resume: bool,
    no_hold: bool,
    resume_attempts: usize,
    voices: Vec<VoiceEvent>,
    automation: Vec<(BusId, Automation)>,
}

impl CaptureRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the clock suspended.
    pub fn suspended(mut self) -> Self {
        self.suspended = true;
        self
    }

    /// Make every resume attempt fail.
    pub fn failing_resume(mut self) -> Self {
        self.fail_resume = true;
        self
    }

    /// Behave like a renderer without a hold primitive.
    pub fn without_cancel_and_hold(mut self) -> Self {
        self.no_hold = true;
        self
    }

    /// Move the clock to `t`. The clock never goes backwards.
    pub fn set_time(&mut self, t: f64) {
        self.time = self.time.max(t);
    }

    pub fn advance(&mut self, dt: f64) {
        self.set_time(self.time + dt);
    }

    pub fn voices(&self) -> &[VoiceEvent] {
        &self.voices
    }

    /// Voices on `bus` starting at or after `t`.
    pub fn voices_from(&self, bus: BusId, t: f64) -> impl Iterator<Item = &VoiceEvent> {
        self.voices
            .iter()
            .filter(move |v| v.bus == bus && v.start >= t)
    }

    pub fn automation(&self) -> &[(BusId, Automation)] {
        &self.automation
    }

    pub fn resume_attempts(&self) -> usize {
        self.resume_attempts
    }

    /// Replay the automation sent to `bus`.
    pub fn bus_timeline(&self, bus: BusId) -> ParamTimeline {
        let mut timeline = ParamTimeline::new(0.0);
        for (_, cmd) in self.automation.iter().filter(|(b, _)| *b == bus) {
            timeline.apply(*cmd);
        }
        timeline
    }

    /// Drop recorded voices and automation, keeping the clock.
    pub fn clear(&mut self) {
        self.voices.clear();
        self.automation.clear();
    }
}

impl Renderer for CaptureRenderer {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) -> Result<(), RenderError> {
        self.resume_attempts += 1;
        if self.fail_resume {
            return Err(RenderError::Resume("capture renderer refuses to resume".into()));
        }
        self.suspended = false;
        Ok(())
    }

    fn play_voice(&mut self, voice: VoiceEvent) {
        self.voices.push(voice);
    }

    fn automate(&mut self, bus: BusId, automation: Automation) {
        self.automation.push((bus, automation));
    }

    fn supports_cancel_and_hold(&self) -> bool {
        !self.no_hold
    }
}
