//! Equal-tempered pitch resolution.
//!
//! Pitches follow the piano-key numbering where 69 is the A above
//! middle C and each integer step is one semitone.

/// Pitch number of the reference tone.
pub const REFERENCE_PITCH: u8 = 69;

/// Frequency of the reference tone in Hz.
pub const REFERENCE_FREQ: f64 = 440.0;

/// Convert a pitch number to a frequency in Hz.
pub fn pitch_to_freq(pitch: u8) -> f64 {
    let semitones = pitch as f64 - REFERENCE_PITCH as f64;
    REFERENCE_FREQ * libm::exp2(semitones / 12.0)
}
