//! The seam between the engine and whatever produces sound.

use thiserror::Error;

use crate::automation::Automation;
use crate::event::{BusId, VoiceEvent};

/// Failures a renderer can report.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The clock could not be woken.
    #[error("failed to resume audio clock: {0}")]
    Resume(String),
}

/// A synthesis clock plus a sink for voices and bus automation.
///
/// The renderer guarantees that voices and automation handed to it are
/// rendered at their requested times regardless of what the caller does
/// afterwards. Nothing handed over can be taken back.
pub trait Renderer {
    /// Seconds since the clock started; never decreases.
    fn current_time(&self) -> f64;

    /// Returns true while the clock is waiting to be woken.
    fn is_suspended(&self) -> bool {
        false
    }

    /// Try to wake a suspended clock.
    fn resume(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn play_voice(&mut self, voice: VoiceEvent);

    /// Append an automation command to one bus's gain.
    fn automate(&mut self, bus: BusId, automation: Automation);

    /// Returns true if [`Automation::CancelAndHold`] is understood.
    fn supports_cancel_and_hold(&self) -> bool {
        true
    }
}
