//! The master → {music, effects} gain hierarchy.
//!
//! Every change is a ramp or a hold, never an instant jump, once the bus
//! is installed. The bus mirrors every command it sends so it can answer
//! "what is the gain at time t" without asking the renderer.

use tracing::debug;

use crate::automation::{Automation, ParamTimeline};
use crate::config::BusLevels;
use crate::event::BusId;
use crate::renderer::Renderer;

pub struct MixBus {
    levels: BusLevels,
    mirror: [ParamTimeline; 3],
}

impl MixBus {
    pub fn new(levels: BusLevels) -> Self {
        Self {
            levels,
            mirror: [
                ParamTimeline::new(levels.master),
                ParamTimeline::new(levels.music),
                ParamTimeline::new(levels.effects),
            ],
        }
    }

    pub fn levels(&self) -> &BusLevels {
        &self.levels
    }

    /// Set the starting levels. Music starts silent until a track fades in.
    pub fn install<R: Renderer + ?Sized>(&mut self, out: &mut R, enabled: bool) {
        let now = out.current_time();
        let master = self.master_target(enabled);
        self.send(out, BusId::Master, Automation::SetValueAt { value: master, time: now });
        self.send(out, BusId::Music, Automation::SetValueAt { value: 0.0, time: now });
        self.send(
            out,
            BusId::Effects,
            Automation::SetValueAt { value: self.levels.effects, time: now },
        );
    }

    /// Gain of `bus` at time `t`, as last commanded.
    pub fn value_at(&self, bus: BusId, t: f64) -> f32 {
        self.mirror[bus.index()].value_at(t)
    }

    /// Freeze `bus` at its value at `at` and cancel anything scheduled after.
    ///
    /// Uses the renderer's hold primitive when it has one; otherwise reads
    /// the mirrored value, cancels, and reasserts it.
    pub fn hold<R: Renderer + ?Sized>(&mut self, out: &mut R, bus: BusId, at: f64) {
        if out.supports_cancel_and_hold() {
            self.send(out, bus, Automation::CancelAndHold { at });
        } else {
            let value = self.value_at(bus, at);
            self.send(out, bus, Automation::CancelScheduled { from: at });
            self.send(out, bus, Automation::SetValueAt { value, time: at });
        }
    }

    /// Ramp the master bus to its enabled or muted level.
    pub fn set_master<R: Renderer + ?Sized>(&mut self, out: &mut R, enabled: bool) {
        let now = out.current_time();
        self.prune(now);
        let target = self.master_target(enabled);
        debug!(enabled, target, "master ramp");
        self.hold(out, BusId::Master, now);
        self.send(
            out,
            BusId::Master,
            Automation::ExponentialRampTo {
                value: target,
                end: now + self.levels.toggle_ramp,
            },
        );
    }

    /// Ramp music from silence up to its level over `duration`, starting at `start`.
    pub fn fade_music_in<R: Renderer + ?Sized>(&mut self, out: &mut R, start: f64, duration: f64) {
        self.prune(out.current_time());
        let floor = self.levels.muted;
        self.send(out, BusId::Music, Automation::CancelScheduled { from: start });
        self.send(out, BusId::Music, Automation::SetValueAt { value: floor, time: start });
        self.send(
            out,
            BusId::Music,
            Automation::ExponentialRampTo {
                value: self.levels.music,
                end: start + duration,
            },
        );
    }

    /// Ramp music down to silence over `duration` from `now`. Returns when
    /// the fade ends.
    pub fn fade_music_out<R: Renderer + ?Sized>(&mut self, out: &mut R, now: f64, duration: f64) -> f64 {
        let end = now + duration;
        self.prune(now);
        self.hold(out, BusId::Music, now);
        self.send(
            out,
            BusId::Music,
            Automation::ExponentialRampTo { value: self.levels.muted, end },
        );
        self.send(out, BusId::Music, Automation::SetValueAt { value: 0.0, time: end });
        end
    }

    fn master_target(&self, enabled: bool) -> f32 {
        if enabled {
            self.levels.master
        } else {
            self.levels.muted
        }
    }

    /// Drop mirrored points that can no longer affect values at or after `now`.
    fn prune(&mut self, now: f64) {
        for timeline in &mut self.mirror {
            timeline.prune_before(now);
        }
    }

    fn send<R: Renderer + ?Sized>(&mut self, out: &mut R, bus: BusId, cmd: Automation) {
        self.mirror[bus.index()].apply(cmd);
        out.automate(bus, cmd);
    }
}
