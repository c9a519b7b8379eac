//! Name-addressed stores for tracks and effects.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use slotmap::{new_key_type, SlotMap};

use crate::derive::{derive_track, TrackTransform};
use crate::effect::EffectSpec;
use crate::error::TrackError;
use crate::track::Track;

new_key_type! {
    /// Stable handle to a track in a [`TrackLibrary`].
    pub struct TrackKey;
}

/// All music tracks, addressable by key or by name.
#[derive(Clone, Debug, Default)]
pub struct TrackLibrary {
    tracks: SlotMap<TrackKey, Track>,
    names: BTreeMap<String, TrackKey>,
}

impl TrackLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track. A track with the same name is replaced and its key reused.
    pub fn insert(&mut self, track: Track) -> TrackKey {
        if let Some(&key) = self.names.get(track.name()) {
            if let Some(slot) = self.tracks.get_mut(key) {
                *slot = track;
                return key;
            }
        }
        let name = track.name().to_string();
        let key = self.tracks.insert(track);
        self.names.insert(name, key);
        key
    }

    /// Derive a track from `base` and add it to the library.
    pub fn derive_from(
        &mut self,
        base: TrackKey,
        transform: &TrackTransform,
    ) -> Result<TrackKey, TrackError> {
        let base = self
            .tracks
            .get(base)
            .ok_or_else(|| TrackError::UnknownBase(transform.name().to_string()))?;
        let derived = derive_track(base, transform)?;
        Ok(self.insert(derived))
    }

    /// Look up a track's key by name.
    pub fn key(&self, name: &str) -> Option<TrackKey> {
        self.names.get(name).copied()
    }

    pub fn get(&self, key: TrackKey) -> Option<&Track> {
        self.tracks.get(key)
    }

    pub fn by_name(&self, name: &str) -> Option<&Track> {
        self.key(name).and_then(|k| self.get(k))
    }

    /// Track names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Effect specs by name.
#[derive(Clone, Debug, Default)]
pub struct EffectLibrary {
    effects: BTreeMap<String, EffectSpec>,
}

impl EffectLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, spec: EffectSpec) {
        self.effects.insert(name.to_string(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&EffectSpec> {
        self.effects.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::PitchMap;
    use crate::timbre::{Timbre, Waveform};
    use crate::track::{Part, TrackBuilder};

    const SQ: Timbre = Timbre::new(Waveform::Square, 0.2);

    fn track(name: &str, bpm: f64) -> Track {
        TrackBuilder::new(name)
            .bpm(bpm)
            .line(Part::Melody, "C5 . . . E5 . . .", SQ)
            .line(Part::Harmony, "E4 . . . G4 . . .", SQ)
            .line(Part::Bass, "C3 . . . C3 . . .", SQ)
            .build()
            .unwrap()
    }

    #[test]
    fn lookup_by_name() {
        let mut lib = TrackLibrary::new();
        let a = lib.insert(track("a", 120.0));
        let b = lib.insert(track("b", 140.0));
        assert_ne!(a, b);
        assert_eq!(lib.key("a"), Some(a));
        assert_eq!(lib.by_name("b").unwrap().bpm(), 140.0);
        assert!(lib.key("c").is_none());
        assert_eq!(lib.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn derive_from_missing_base_is_reported() {
        let mut other = TrackLibrary::new();
        let foreign = other.insert(track("a", 120.0));
        let mut lib = TrackLibrary::new();
        let err = lib
            .derive_from(foreign, &TrackTransform::new("a_dark"))
            .unwrap_err();
        assert_eq!(err, TrackError::UnknownBase("a_dark".to_string()));
        assert!(lib.is_empty());
    }

    #[test]
    fn insert_same_name_replaces() {
        let mut lib = TrackLibrary::new();
        let first = lib.insert(track("a", 120.0));
        let second = lib.insert(track("a", 90.0));
        assert_eq!(first, second);
        assert_eq!(lib.len(), 1);
        assert_eq!(lib.get(first).unwrap().bpm(), 90.0);
    }

    #[test]
    fn derive_from_adds_variant() {
        let mut lib = TrackLibrary::new();
        let base = lib.insert(track("a", 120.0));
        let dark = lib
            .derive_from(
                base,
                &TrackTransform::new("a_dark").pitch_map(PitchMap::MinorColor { tonic: 0 }),
            )
            .unwrap();
        assert_eq!(lib.len(), 2);
        // E5 flattened, base untouched
        assert_eq!(lib.get(dark).unwrap().line(Part::Melody).unwrap().steps[4].pitch(), Some(75));
        assert_eq!(lib.get(base).unwrap().line(Part::Melody).unwrap().steps[4].pitch(), Some(76));
    }
}
