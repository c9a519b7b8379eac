//! Oscillator timbre descriptions.

/// Oscillator waveform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    #[default]
    Square,
    Triangle,
    Sawtooth,
}

/// Waveform and level of one voice line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timbre {
    pub waveform: Waveform,
    /// Peak gain of each note before bus attenuation.
    pub gain: f32,
}

impl Timbre {
    pub const fn new(waveform: Waveform, gain: f32) -> Self {
        Self { waveform, gain }
    }
}
