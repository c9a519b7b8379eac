//! Percussion grooves.
//!
//! A groove maps each position of an 8-step bar (four beats of two
//! steps) to the drums that hit there.

/// Number of bar positions a groove pattern covers.
pub const GROOVE_STEPS: usize = 8;

const KICK: u8 = 1;
const SNARE: u8 = 2;
const HAT: u8 = 4;

const STANDARD: [u8; GROOVE_STEPS] = [
    KICK,
    HAT,
    SNARE,
    KICK | HAT,
    KICK,
    HAT,
    SNARE,
    HAT,
];

const TENSE: [u8; GROOVE_STEPS] = [KICK, 0, HAT, 0, SNARE, KICK, HAT, 0];

/// Named percussion pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Groove {
    /// No percussion.
    None,
    /// Driving kick/snare backbeat with offbeat hats.
    #[default]
    Standard,
    /// Sparse, syncopated pattern for tense tracks.
    Tense,
}

/// Which drums fire on a bar position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrumHits {
    pub kick: bool,
    pub snare: bool,
    pub hat: bool,
}

impl DrumHits {
    /// Returns true if no drum fires.
    pub fn is_empty(self) -> bool {
        !(self.kick || self.snare || self.hat)
    }
}

impl Groove {
    /// Drums hit at `position` within an 8-step bar (taken modulo 8).
    pub fn hits(self, position: usize) -> DrumHits {
        let mask = match self {
            Groove::None => 0,
            Groove::Standard => STANDARD[position % GROOVE_STEPS],
            Groove::Tense => TENSE[position % GROOVE_STEPS],
        };
        DrumHits {
            kick: mask & KICK != 0,
            snare: mask & SNARE != 0,
            hat: mask & HAT != 0,
        }
    }

    /// Returns true if the groove plays no drums.
    pub fn is_silent(self) -> bool {
        self == Groove::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_downbeat_is_kick() {
        let hits = Groove::Standard.hits(0);
        assert!(hits.kick && !hits.snare && !hits.hat);
    }

    #[test]
    fn standard_backbeat_snares() {
        assert!(Groove::Standard.hits(2).snare);
        assert!(Groove::Standard.hits(6).snare);
        assert!(!Groove::Standard.hits(4).snare);
    }

    #[test]
    fn standard_hats_on_offbeats() {
        for pos in [1, 3, 5, 7] {
            assert!(Groove::Standard.hits(pos).hat, "no hat at {}", pos);
        }
    }

    #[test]
    fn tense_is_sparser_than_standard() {
        let count = |g: Groove| (0..GROOVE_STEPS).filter(|&p| !g.hits(p).is_empty()).count();
        assert!(count(Groove::Tense) < count(Groove::Standard));
    }

    #[test]
    fn none_never_hits() {
        assert!((0..GROOVE_STEPS).all(|p| Groove::None.hits(p).is_empty()));
    }

    #[test]
    fn position_wraps() {
        assert_eq!(Groove::Tense.hits(9), Groove::Tense.hits(1));
    }
}
