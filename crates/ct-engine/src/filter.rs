//! Resonant biquad filter for noise voices.

use std::f64::consts::PI;

use crate::event::FilterKind;

/// Second-order filter with RBJ cookbook coefficients, transposed
/// direct form II.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Biquad {
    pub fn new(kind: FilterKind, cutoff: f64, q: f64, sample_rate: u32) -> Self {
        let fs = sample_rate as f64;
        let f0 = cutoff.clamp(10.0, fs * 0.45);
        let q = q.max(0.05);
        let w0 = 2.0 * PI * f0 / fs;
        let (sin, cos) = w0.sin_cos();
        let alpha = sin / (2.0 * q);

        let (b0, b1, b2) = match kind {
            FilterKind::Highpass => ((1.0 + cos) / 2.0, -(1.0 + cos), (1.0 + cos) / 2.0),
            FilterKind::Bandpass => (alpha, 0.0, -alpha),
        };
        let a0 = 1.0 + alpha;
        Self {
            b0: (b0 / a0) as f32,
            b1: (b1 / a0) as f32,
            b2: (b2 / a0) as f32,
            a1: (-2.0 * cos / a0) as f32,
            a2: ((1.0 - alpha) / a0) as f32,
            z1: 0.0,
            z2: 0.0,
        }
    }

    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms_of_sine(filter: &mut Biquad, hz: f64, sample_rate: u32) -> f32 {
        let n = sample_rate as usize / 4;
        let mut sum = 0.0;
        for i in 0..n {
            let x = (2.0 * PI * hz * i as f64 / sample_rate as f64).sin() as f32;
            let y = filter.process(x);
            if i > n / 2 {
                sum += y * y;
            }
        }
        (sum / (n / 2) as f32).sqrt()
    }

    #[test]
    fn highpass_rejects_lows() {
        let mut low = Biquad::new(FilterKind::Highpass, 7000.0, 0.7, 44100);
        let mut high = Biquad::new(FilterKind::Highpass, 7000.0, 0.7, 44100);
        assert!(rms_of_sine(&mut low, 200.0, 44100) < 0.01);
        assert!(rms_of_sine(&mut high, 15000.0, 44100) > 0.5);
    }

    #[test]
    fn bandpass_passes_center() {
        let mut center = Biquad::new(FilterKind::Bandpass, 1800.0, 0.9, 44100);
        let mut far = Biquad::new(FilterKind::Bandpass, 1800.0, 0.9, 44100);
        let c = rms_of_sine(&mut center, 1800.0, 44100);
        let f = rms_of_sine(&mut far, 60.0, 44100);
        assert!(c > 0.6);
        assert!(f < c / 10.0);
    }
}
