use crate::derive::{PitchMap, TrackTransform};
use crate::error::TrackError;
use crate::groove::Groove;
use crate::library::TrackLibrary;
use crate::timbre::{Timbre, Waveform};
use crate::track::{Part, TrackBuilder};

const LEAD: Timbre = Timbre::new(Waveform::Square, 0.16);
const PAD: Timbre = Timbre::new(Waveform::Triangle, 0.1);
const BASS: Timbre = Timbre::new(Waveform::Triangle, 0.22);
const ARP: Timbre = Timbre::new(Waveform::Square, 0.05);

/// Build the library of built-in tracks.
pub fn builtin_tracks() -> Result<TrackLibrary, TrackError> {
    let mut lib = TrackLibrary::new();

    lib.insert(
        TrackBuilder::new("title")
            .bpm(132.0)
            .line(
                Part::Melody,
                "E5 . G5 . C6 . G5 . | A5 . F5 . A5 C6 . . | G5 . E5 . D5 . E5 . | C5 . . . G4 . . .",
                LEAD,
            )
            .line(
                Part::Harmony,
                "C5 . . . E5 . . . | F4 . . . A4 . . . | B4 . . . G4 . . . | E4 . . . . . . .",
                PAD,
            )
            .line(
                Part::Bass,
                "C3 . C3 . G2 . G2 . | F2 . F2 . F2 . A2 . | G2 . G2 . G2 . B2 . | C3 . G2 . C3 . . .",
                BASS,
            )
            .line(
                Part::Arp,
                "C5 E5 G5 E5 C5 E5 G5 E5 | F5 A5 C6 A5 F5 A5 C6 A5 | G5 B5 D6 B5 G5 B5 D6 B5 | C5 E5 G5 C6 G5 E5 C5 .",
                ARP,
            )
            .arp_dur_factor(0.5)
            .accent_strength(0.8)
            .build()?,
    );

    let overworld = lib.insert(
        TrackBuilder::new("overworld")
            .bpm(168.0)
            .line(
                Part::Melody,
                "C5 . E5 G5 . E5 C5 . | D5 . F5 A5 . F5 D5 . | E5 G5 C6 . B5 A5 G5 . | F5 E5 D5 . C5 . . .",
                LEAD,
            )
            .line(
                Part::Harmony,
                "E4 . . . G4 . . . | F4 . . . A4 . . . | G4 . . . E4 . . . | B4 . . . C5 . . .",
                PAD,
            )
            .line(
                Part::Bass,
                "C3 . G2 . C3 . G2 . | D3 . A2 . D3 . A2 . | E3 . C3 . A2 . E2 . | G2 . B2 . C3 . . .",
                BASS,
            )
            .build()?,
    );

    lib.derive_from(
        overworld,
        &TrackTransform::new("overworld_dark")
            .pitch_map(PitchMap::MinorColor { tonic: 0 })
            .shift(Part::Bass, -12)
            .waveform(Part::Melody, Waveform::Triangle)
            .gain(Part::Melody, 0.2)
            .bpm(150.0)
            .groove(Groove::Tense)
            .accent_strength(0.6),
    )?;

    let cavern = lib.insert(
        TrackBuilder::new("cavern")
            .bpm(120.0)
            .line(
                Part::Melody,
                "A4 . . C5 . . E5 . | D5 . . C5 . . B4 . | A4 . . E5 . . F5 . | E5 . . . . . . .",
                Timbre::new(Waveform::Triangle, 0.18),
            )
            .line(
                Part::Harmony,
                "E4 . . . . . . . | F4 . . . . . . . | C4 . . . . . . . | B3 . . . G#3 . . .",
                PAD,
            )
            .line(
                Part::Bass,
                "A2 . . . A2 . . . | D2 . . . D2 . . . | F2 . . . F2 . . . | E2 . . . E2 . . .",
                BASS,
            )
            .dur_factor(0.7)
            .accent_strength(0.5)
            .groove(Groove::Tense)
            .build()?,
    );

    lib.derive_from(
        cavern,
        &TrackTransform::new("boss")
            .shift(Part::Melody, 12)
            .waveform(Part::Melody, Waveform::Square)
            .gain(Part::Melody, 0.14)
            .waveform(Part::Bass, Waveform::Sawtooth)
            .gain(Part::Bass, 0.12)
            .bpm(176.0)
            .groove(Groove::Standard)
            .accent_strength(1.0),
    )?;

    lib.insert(
        TrackBuilder::new("victory")
            .bpm(150.0)
            .line(Part::Melody, "C5 E5 G5 C6 . G5 C6 . | D6 . C6 . . . . .", LEAD)
            .line(Part::Harmony, "E4 G4 C5 E5 . C5 E5 . | F5 . E5 . . . . .", PAD)
            .line(Part::Bass, "C3 . . . G2 . . . | C3 . . . C2 . . .", BASS)
            .line(Part::Arp, "C6 G5 E5 C5 C6 G5 E5 C5 | C6 . . . . . . .", ARP)
            .arp_dur_factor(0.5)
            .build()?,
    );

    Ok(lib)
}
