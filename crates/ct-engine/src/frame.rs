//! Audio frame type.

/// A stereo audio frame (16-bit integer).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    pub left: i16,
    pub right: i16,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self { left: 0, right: 0 }
    }

    /// Create a mono frame (same value for both channels).
    pub const fn mono(value: i16) -> Self {
        Self {
            left: value,
            right: value,
        }
    }

    /// Convert a sample in [-1, 1] to a mono frame, clamping overs.
    pub fn from_f32(sample: f32) -> Self {
        let scaled = (sample * 32767.0).round().clamp(-32768.0, 32767.0);
        Self::mono(scaled as i16)
    }

    /// Returns true if both channels are zero.
    pub fn is_silent(&self) -> bool {
        self.left == 0 && self.right == 0
    }

    /// Larger absolute channel value.
    pub fn peak(&self) -> u16 {
        self.left.unsigned_abs().max(self.right.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f32_scales_and_clamps() {
        assert_eq!(Frame::from_f32(0.0), Frame::silence());
        assert_eq!(Frame::from_f32(1.0), Frame::mono(32767));
        assert_eq!(Frame::from_f32(-2.0), Frame::mono(-32768));
    }

    #[test]
    fn peak_is_absolute() {
        let f = Frame { left: -300, right: 200 };
        assert_eq!(f.peak(), 300);
        assert!(!f.is_silent());
    }
}
