//! VoicePool: fixed-size voice allocation for the mixer.

use crate::event::BusId;
use crate::noise::NoiseBuffer;
use crate::voice::Voice;

/// Identifier for a voice slot in the pool.
pub type VoiceId = usize;

/// Maximum number of simultaneous voices.
pub const MAX_VOICES: usize = 64;

/// Pool of voice slots. The slot vector is sized once and never grows.
pub struct VoicePool {
    /// Voice slots (None = free).
    pub(crate) slots: Vec<Option<Voice>>,
}

impl VoicePool {
    pub fn new() -> Self {
        Self {
            slots: (0..MAX_VOICES).map(|_| None).collect(),
        }
    }

    /// Allocate a voice slot, returning its ID.
    /// Steals the voice nearest its stop time if the pool is full.
    pub fn allocate(&mut self, voice: Voice) -> VoiceId {
        let id = self
            .slots
            .iter()
            .position(|s| s.is_none())
            .unwrap_or_else(|| self.find_steal_candidate());
        self.slots[id] = Some(voice);
        id
    }

    fn find_steal_candidate(&self) -> VoiceId {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v.event.stop)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    pub fn get(&self, id: VoiceId) -> Option<&Voice> {
        self.slots.get(id).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: VoiceId) -> Option<&mut Voice> {
        self.slots.get_mut(id).and_then(|s| s.as_mut())
    }

    /// Remove voices that have stopped playing.
    pub fn reap_finished(&mut self) {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|v| !v.playing) {
                *slot = None;
            }
        }
    }

    /// Count of occupied voice slots.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Render every voice at time `t`, returning (music, effects) sums.
    pub fn render_all(&mut self, t: f64, dt: f64, noise: &NoiseBuffer) -> (f32, f32) {
        let mut music = 0.0;
        let mut effects = 0.0;
        for voice in self.slots.iter_mut().flatten() {
            let s = voice.render(t, dt, noise);
            match voice.bus() {
                BusId::Music => music += s,
                BusId::Effects | BusId::Master => effects += s,
            }
        }
        (music, effects)
    }
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new()
    }
}
